mod tests {
    use heapless::Vec as FixedVec;
    use myrtio_pixel_engine::animation::{
        CollisionConfig, Conjunction, Convergent, Divergent, FIRE_PALETTE_MIN, Fire, FireConfig,
        Jitter, JitterConfig, LitBits, LitBitsConfig, NextGen, NextGenConfig, SideSwipe,
        SolidColor, default_palette,
    };
    use myrtio_pixel_engine::color::color_wheel;
    use myrtio_pixel_engine::rng::seeded;
    use myrtio_pixel_engine::stream::StripedWheel;
    use myrtio_pixel_engine::{
        Animation, AnimationSettings, ChannelOrder, Color, ColorMap, ConfigError, Error, FillMode,
        PixelBuffer, PixelBufferConfig, StreamSlot,
    };

    fn strip(len: usize) -> PixelBuffer {
        PixelBuffer::new(PixelBufferConfig::new(len).with_order(ChannelOrder::RGB)).unwrap()
    }

    fn pixels(buffer: &PixelBuffer) -> Vec<Color> {
        (0..buffer.len()).map(|i| buffer.get(i).unwrap()).collect()
    }

    fn lit(buffer: &PixelBuffer) -> Vec<usize> {
        (0..buffer.len())
            .filter(|&i| !buffer.get(i).unwrap().is_off())
            .collect()
    }

    fn run<A: Animation>(animation: &mut A, buffer: &mut PixelBuffer, frames: u32) {
        for frame in 1..=frames {
            animation.compute_frame(buffer, frame).unwrap();
        }
    }

    fn wheel(hue: u8) -> Color {
        Color::from(color_wheel(hue, 200))
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        let empty = strip(0);
        let settings = AnimationSettings::default();
        assert_eq!(
            NextGen::new(&empty, settings, NextGenConfig::default(), None).map(|_| ()),
            Err(Error::Config(ConfigError::InvalidBuffer))
        );
        assert!(Fire::new(&empty, settings, FireConfig::default(), None).is_err());
        let two = strip(2);
        assert!(Divergent::new(&two, settings, CollisionConfig::default(), None, None).is_err());
        assert!(Convergent::new(&two, settings, CollisionConfig::default(), None, None).is_ok());
    }

    #[test]
    fn test_setup_rejects_other_buffer() {
        let buffer = strip(10);
        let mut other = strip(12);
        let mut animation =
            NextGen::new(&buffer, AnimationSettings::default(), NextGenConfig::default(), None)
                .unwrap();
        assert!(animation.setup(&mut other).is_err());
    }

    #[test]
    fn test_solid_color_fills_once() {
        let mut buffer = strip(5);
        let red = Color::rgb(100, 0, 0);
        let mut animation =
            SolidColor::new(&buffer, AnimationSettings::default(), red, None).unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(pixels(&buffer), vec![red; 5]);
        buffer.set(2, Color::OFF).unwrap();
        run(&mut animation, &mut buffer, 3);
        assert!(buffer.get(2).unwrap().is_off());
    }

    #[test]
    fn test_solid_color_from_stream() {
        let mut buffer = strip(3);
        let stream = StreamSlot::Striped(StripedWheel::new(10, 1, 0, 200).unwrap());
        let mut animation =
            SolidColor::new(&buffer, AnimationSettings::default(), Color::OFF, Some(stream))
                .unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(pixels(&buffer), vec![wheel(0), wheel(10), wheel(20)]);
    }

    #[test]
    fn test_next_gen_injects_next_stripe() {
        let mut buffer = strip(10);
        let stream = StreamSlot::Striped(StripedWheel::new(0, 10, 0, 200).unwrap());
        let mut animation = NextGen::new(
            &buffer,
            AnimationSettings::default(),
            NextGenConfig::default(),
            Some(stream),
        )
        .unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(pixels(&buffer), vec![wheel(0); 10]);

        animation.compute_frame(&mut buffer, 1).unwrap();
        assert_eq!(buffer.get(0).unwrap(), wheel(1));
        assert!(pixels(&buffer)[1..].iter().all(|&c| c == wheel(0)));
    }

    #[test]
    fn test_next_gen_scrolls() {
        let mut buffer = strip(10);
        let mut animation =
            NextGen::new(&buffer, AnimationSettings::default(), NextGenConfig::default(), None)
                .unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(buffer.get(9).unwrap(), wheel(0));
        assert_eq!(buffer.get(0).unwrap(), wheel(90));
        let before = pixels(&buffer);

        animation.compute_frame(&mut buffer, 1).unwrap();
        let after = pixels(&buffer);
        assert_eq!(&after[1..], &before[..9]);
        assert_eq!(after[0], wheel(100));
    }

    #[test]
    fn test_next_gen_blanks_and_direction() {
        let mut buffer = strip(6);
        let config = NextGenConfig {
            blanks: 1,
            scroll_speed: -5,
        };
        let mut animation =
            NextGen::new(&buffer, AnimationSettings::default(), config, None).unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(animation.insert_point(), 5);
        assert_eq!(lit(&buffer), vec![0, 2, 4]);

        animation.compute_frame(&mut buffer, 1).unwrap();
        assert!(buffer.get(5).unwrap().is_off());
        animation.compute_frame(&mut buffer, 2).unwrap();
        assert!(!buffer.get(5).unwrap().is_off());
    }

    #[test]
    fn test_lit_bits_pattern_scrolls() {
        let mut buffer = strip(12);
        let mut animation =
            LitBits::new(&buffer, AnimationSettings::default(), LitBitsConfig::default(), None)
                .unwrap();
        assert_eq!(animation.palette().len(), 20);
        animation.setup(&mut buffer).unwrap();

        animation.compute_frame(&mut buffer, 1).unwrap();
        assert_eq!(lit(&buffer), vec![0, 1, 2, 4, 5, 6, 8, 9, 10]);

        // mask moved one step toward the start
        animation.compute_frame(&mut buffer, 2).unwrap();
        assert_eq!(lit(&buffer), vec![0, 1, 3, 4, 5, 7, 8, 9, 11]);
    }

    #[test]
    fn test_lit_bits_palette_rotates() {
        let mut buffer = strip(4);
        let mut palette = ColorMap::new(2, 3).unwrap();
        palette.set(0, Color::rgb(1, 0, 0)).unwrap();
        palette.set(1, Color::rgb(2, 0, 0)).unwrap();
        let config = LitBitsConfig {
            lit_scroll_speed: 0,
            ..LitBitsConfig::default()
        };
        let mut animation =
            LitBits::new(&buffer, AnimationSettings::default(), config, Some(palette)).unwrap();
        animation.setup(&mut buffer).unwrap();
        animation.compute_frame(&mut buffer, 1).unwrap();
        assert_eq!(buffer.get(0).unwrap(), Color::rgb(1, 0, 0));
        animation.compute_frame(&mut buffer, 2).unwrap();
        assert_eq!(buffer.get(0).unwrap(), Color::rgb(2, 0, 0));
        assert_eq!(buffer.get(1).unwrap(), Color::rgb(1, 0, 0));
    }

    #[test]
    fn test_lit_bits_random_density() {
        let mut buffer = strip(64);
        let config = LitBitsConfig {
            lit_percent: Some(50),
            ..LitBitsConfig::default()
        };
        let mut animation =
            LitBits::new(&buffer, AnimationSettings::default(), config, None).unwrap();
        animation.setup(&mut buffer).unwrap();
        let ones = animation.mask().count_ones();
        assert!(ones > 0 && ones < 64);
        assert!(
            LitBits::new(
                &buffer,
                AnimationSettings::default(),
                LitBitsConfig::default(),
                Some(ColorMap::new(0, 3).unwrap())
            )
            .is_err()
        );
    }

    #[test]
    fn test_jitter_fades_pattern_before_first_spark() {
        let mut buffer = strip(8);
        let config = JitterConfig {
            sparking: 0,
            ..JitterConfig::default()
        };
        let mut animation =
            Jitter::new(&buffer, AnimationSettings::default(), config, None).unwrap();
        animation.setup(&mut buffer).unwrap();
        let background = Color::rgb(10, 10, 10);

        // three on, one off: lit pixels fade in, the rest snap to background
        animation.compute_frame(&mut buffer, 1).unwrap();
        let lit_pixel = Color::rgb(4, 4, 4);
        assert_eq!(
            pixels(&buffer),
            vec![
                lit_pixel, lit_pixel, lit_pixel, background, lit_pixel, lit_pixel, lit_pixel,
                background,
            ]
        );

        animation.compute_frame(&mut buffer, 2).unwrap();
        animation.compute_frame(&mut buffer, 3).unwrap();
        assert_eq!(buffer.get(0).unwrap(), Color::rgb(7, 7, 7));
        assert_eq!(buffer.get(7).unwrap(), background);
    }

    #[test]
    fn test_jitter_solid_fill_is_uniform() {
        let mut buffer = strip(8);
        let config = JitterConfig {
            sparking: 255,
            lit_percent: 100,
            fill_mode: FillMode::Solid,
            ..JitterConfig::default()
        };
        let settings = AnimationSettings {
            seed: 21,
            ..AnimationSettings::default()
        };
        let mut animation = Jitter::new(&buffer, settings, config, None).unwrap();
        animation.setup(&mut buffer).unwrap();
        run(&mut animation, &mut buffer, 4);
        let first = buffer.get(0).unwrap();
        assert!(pixels(&buffer).iter().all(|&c| c == first));
    }

    #[test]
    fn test_side_swipe_bounces() {
        let mut buffer = strip(5);
        let mut animation =
            SideSwipe::new(&buffer, AnimationSettings::default(), FixedVec::new()).unwrap();
        animation.setup(&mut buffer).unwrap();

        run(&mut animation, &mut buffer, 5);
        assert_eq!(animation.cycle(), 1);
        assert_eq!(animation.location(), 4);
        assert_eq!(lit(&buffer).len(), 5);

        animation.compute_frame(&mut buffer, 6).unwrap();
        assert_eq!(animation.location(), 3);
    }

    #[test]
    fn test_side_swipe_switches_streams() {
        let mut buffer = strip(3);
        let mut streams = FixedVec::new();
        let _ = streams.push(StreamSlot::Striped(StripedWheel::new(0, 100, 0, 200).unwrap()));
        let _ = streams.push(StreamSlot::Striped(StripedWheel::new(0, 100, 85, 200).unwrap()));
        let mut animation =
            SideSwipe::new(&buffer, AnimationSettings::default(), streams).unwrap();
        animation.setup(&mut buffer).unwrap();
        run(&mut animation, &mut buffer, 4);
        assert_eq!(buffer.get(2).unwrap(), wheel(85));
        assert_eq!(buffer.get(0).unwrap(), wheel(0));
    }

    #[test]
    fn test_convergent_meets_in_the_middle() {
        let mut buffer = strip(10);
        let mut animation = Convergent::new(
            &buffer,
            AnimationSettings::default(),
            CollisionConfig::default(),
            None,
            None,
        )
        .unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(animation.insert_points(), [0, 9]);
        assert_eq!(lit(&buffer), vec![0, 9]);
        assert_eq!(animation.cycles(), 1);

        run(&mut animation, &mut buffer, 4);
        assert_eq!(animation.movers(), &[4, 5]);
        assert_eq!(lit(&buffer), vec![4, 5]);

        // the collision stays lit and the ends are re-seeded
        animation.compute_frame(&mut buffer, 5).unwrap();
        assert_eq!(lit(&buffer), vec![0, 4, 5, 9]);
    }

    #[test]
    fn test_convergent_starts_new_cycles() {
        let mut buffer = strip(10);
        let mut animation = Convergent::new(
            &buffer,
            AnimationSettings::default(),
            CollisionConfig::default(),
            None,
            None,
        )
        .unwrap();
        animation.setup(&mut buffer).unwrap();
        run(&mut animation, &mut buffer, 100);
        assert!(animation.cycles() > 1);
    }

    #[test]
    fn test_divergent_runs_apart() {
        let mut buffer = strip(10);
        let mut animation = Divergent::new(
            &buffer,
            AnimationSettings::default(),
            CollisionConfig {
                fill_mode: FillMode::Multi,
            },
            None,
            None,
        )
        .unwrap();
        animation.setup(&mut buffer).unwrap();
        assert_eq!(animation.insert_points(), [5, 6]);
        assert_eq!(lit(&buffer), vec![5, 6]);

        animation.compute_frame(&mut buffer, 1).unwrap();
        assert_eq!(lit(&buffer), vec![4, 7]);

        // never gets stuck
        run(&mut animation, &mut buffer, 50);
        assert!(!lit(&buffer).is_empty());
    }

    #[test]
    fn test_default_palette() {
        let palette = default_palette(20, 200, &mut seeded(1)).unwrap();
        assert_eq!(palette.len(), 20);
        for i in 0..20 {
            assert!(!palette.get(i).unwrap().is_off());
        }
        assert!(default_palette(0, 200, &mut seeded(1)).is_err());
    }

    #[test]
    fn test_fire_flash_points() {
        let mut buffer = strip(30);
        let settings = AnimationSettings::default();

        let mut rising = Fire::new(&buffer, settings, FireConfig::default(), None).unwrap();
        rising.setup(&mut buffer).unwrap();
        assert_eq!(rising.flash_points(), &[0]);
        let marked: Vec<bool> = rising.blend_map().iter().collect();
        assert!(!marked[0]);
        assert!(marked[1..=10].iter().all(|&m| m));
        assert!(!marked[11]);

        let falling_config = FireConfig {
            scroll_speed: -1,
            ..FireConfig::default()
        };
        let mut falling = Fire::new(&buffer, settings, falling_config, None).unwrap();
        falling.setup(&mut buffer).unwrap();
        assert_eq!(falling.flash_points(), &[29]);
        let marked: Vec<bool> = falling.blend_map().iter().collect();
        assert!(marked[19..=28].iter().all(|&m| m));
        assert!(!marked[18]);
        assert!(!marked[29]);
    }

    #[test]
    fn test_fire_sparks_and_colors() {
        let mut buffer = strip(30);
        let mut fire =
            Fire::new(&buffer, AnimationSettings::default(), FireConfig::default(), None)
                .unwrap();
        fire.setup(&mut buffer).unwrap();
        fire.compute_frame(&mut buffer, 1).unwrap();
        assert!(fire.heat()[0] >= 64 - 15);
        assert!(!buffer.get(0).unwrap().is_off());
        assert_eq!(fire.heat().len(), 30);
    }

    #[test]
    fn test_fire_without_sparks_stays_dark() {
        let mut buffer = strip(30);
        let config = FireConfig {
            sparking: 0,
            hotspots: 3,
            ..FireConfig::default()
        };
        let mut fire = Fire::new(&buffer, AnimationSettings::default(), config, None).unwrap();
        fire.setup(&mut buffer).unwrap();
        run(&mut fire, &mut buffer, 40);
        assert!(fire.heat().iter().all(|&h| h == 0));
        assert!(lit(&buffer).is_empty());
    }

    #[test]
    fn test_fire_palette_validation() {
        let buffer = strip(10);
        let settings = AnimationSettings::default();
        let short = ColorMap::new(10, 3).unwrap();
        assert!(matches!(
            Fire::new(&buffer, settings, FireConfig::default(), Some(short)),
            Err(Error::Config(ConfigError::PaletteTooShort {
                min: FIRE_PALETTE_MIN,
                len: 10
            }))
        ));
        let crowded = FireConfig {
            hotspots: 100,
            ..FireConfig::default()
        };
        assert!(Fire::new(&buffer, settings, crowded, None).is_err());
    }

    #[test]
    fn test_conjunction_cycle() {
        let mut buffer = strip(40);
        let mut animation = Conjunction::new(&buffer, AnimationSettings::default(), None).unwrap();
        animation.setup(&mut buffer).unwrap();
        assert!(animation.palette().get(0).unwrap().is_off());
        let points = animation.insert_points().to_vec();
        assert!(points.windows(2).all(|w| w[1] - w[0] == 32));
        assert!(*points.last().unwrap() >= 40);

        run(&mut animation, &mut buffer, 16);
        assert!(animation.heat().iter().all(|&h| h <= 31));
        assert!(!lit(&buffer).is_empty());

        // the 17th frame starts over
        animation.compute_frame(&mut buffer, 17).unwrap();
        assert!(animation.heat().iter().all(|&h| h == 0));
        assert!(lit(&buffer).is_empty());
    }
}
