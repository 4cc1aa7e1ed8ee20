mod tests {
    use myrtio_pixel_engine::stream::ColorStream;
    use myrtio_pixel_engine::{
        ChannelOp, ChannelOrder, Color, ColorMap, Error, FillDirection, Operand, Span,
    };

    /// Emits `1, 2, 3, ...` in the red channel
    struct Counter(u8);

    impl ColorStream for Counter {
        fn next_color(&mut self) -> Color {
            self.0 += 1;
            Color::rgb(self.0, 0, 0)
        }
    }

    fn numbered(len: usize) -> ColorMap {
        let mut map = ColorMap::new(len, 3).unwrap();
        for i in 0..len {
            map.set(i as isize, Color::rgb(i as u8, 0, 0)).unwrap();
        }
        map
    }

    #[test]
    fn test_new_rejects_bad_width() {
        assert!(ColorMap::new(4, 0).is_err());
        assert!(ColorMap::new(4, 5).is_err());
        let map = ColorMap::new(4, 1).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_negative_keys_count_from_the_end() {
        let map = numbered(5);
        assert_eq!(map.get(-1).unwrap(), map.get(4).unwrap());
        assert_eq!(map.get(-4).unwrap(), map.get(1).unwrap());
        assert_eq!(
            map.get(-5),
            Err(Error::IndexOutOfRange { index: -5, len: 5 })
        );
        assert!(map.get(5).is_err());
    }

    #[test]
    fn test_set_at_len_appends() {
        let mut map = numbered(5);
        map.set(5, Color::rgb(9, 9, 9)).unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map.get(-1).unwrap(), Color::rgb(9, 9, 9));
        assert!(map.set(7, Color::OFF).is_err());
        map.push(Color::rgb(1, 1, 1));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_fill_span() {
        let mut map = ColorMap::new(6, 3).unwrap();
        map.fill(Color::rgb(5, 6, 7), Span::new(1, 3)).unwrap();
        assert!(map.get(0).unwrap().is_off());
        for i in 1..=3 {
            assert_eq!(map.get(i).unwrap(), Color::rgb(5, 6, 7));
        }
        assert!(map.get(4).unwrap().is_off());

        // oversized end clamps to the last item
        map.fill(Color::rgb(1, 1, 1), Span::new(4, 100)).unwrap();
        assert_eq!(map.get(5).unwrap(), Color::rgb(1, 1, 1));

        assert!(map.fill(Color::OFF, Span::starting_at(6)).is_err());
        assert!(map.fill(Color::OFF, Span::new(3, 2)).is_err());
    }

    #[test]
    fn test_fill_gradient() {
        let mut map = ColorMap::new(5, 3).unwrap();
        map.fill_gradient(Color::OFF, Color::rgb(100, 200, 40), Span::ALL)
            .unwrap();
        assert_eq!(map.get(0).unwrap(), Color::OFF);
        assert_eq!(map.get(1).unwrap(), Color::rgb(25, 50, 10));
        assert_eq!(map.get(2).unwrap(), Color::rgb(50, 100, 20));
        assert_eq!(map.get(3).unwrap(), Color::rgb(75, 150, 30));
        assert_eq!(map.get(4).unwrap(), Color::rgb(100, 200, 40));
    }

    #[test]
    fn test_fill_from_stream_directions() {
        let mut map = ColorMap::new(4, 3).unwrap();
        map.fill_from_stream(&mut Counter(0), Span::ALL, FillDirection::Forward)
            .unwrap();
        assert_eq!(map.get(0).unwrap(), Color::rgb(1, 0, 0));
        assert_eq!(map.get(3).unwrap(), Color::rgb(4, 0, 0));

        map.fill_from_stream(
            &mut Counter(0),
            Span::starting_at(1),
            FillDirection::Reverse,
        )
        .unwrap();
        assert_eq!(map.get(0).unwrap(), Color::rgb(1, 0, 0));
        assert_eq!(map.get(3).unwrap(), Color::rgb(1, 0, 0));
        assert_eq!(map.get(1).unwrap(), Color::rgb(3, 0, 0));
    }

    #[test]
    fn test_scroll() {
        let mut map = numbered(5);
        map.scroll(1);
        assert_eq!(map.get(0).unwrap(), Color::rgb(4, 0, 0));
        assert_eq!(map.get(1).unwrap(), Color::rgb(0, 0, 0));
        map.scroll(-2);
        assert_eq!(map.get(0).unwrap(), Color::rgb(1, 0, 0));
        map.scroll(-1);
        map.scroll(10);
        assert_eq!(map.get(0).unwrap(), Color::rgb(2, 0, 0));
    }

    #[test]
    fn test_apply_saturates() {
        let mut map = ColorMap::new(2, 3).unwrap();
        map.fill(Color::rgb(10, 100, 250), Span::ALL).unwrap();
        map.apply(ChannelOp::Add, Operand::Scalar(10)).unwrap();
        assert_eq!(map.get(0).unwrap(), Color::rgb(20, 110, 255));
        map.apply(ChannelOp::Sub, Operand::PerChannel(&[30, 0, 5]))
            .unwrap();
        assert_eq!(map.get(1).unwrap(), Color::rgb(0, 110, 250));
        map.apply(ChannelOp::Mul, Operand::Scalar(3)).unwrap();
        assert_eq!(map.get(0).unwrap(), Color::rgb(0, 255, 255));
        map.apply(ChannelOp::Div, Operand::Scalar(5)).unwrap();
        assert_eq!(map.get(0).unwrap(), Color::rgb(0, 51, 51));
    }

    #[test]
    fn test_apply_rejects_bad_operands() {
        let mut map = numbered(3);
        let before = map.clone();
        assert!(map.apply(ChannelOp::Div, Operand::Scalar(0)).is_err());
        assert!(
            map.apply(ChannelOp::Div, Operand::PerChannel(&[1, 0, 1]))
                .is_err()
        );
        assert!(matches!(
            map.apply(ChannelOp::Add, Operand::PerChannel(&[1, 2])),
            Err(Error::InvalidValue { .. })
        ));
        assert_eq!(map, before);
    }

    #[test]
    fn test_scalar_add_sub() {
        let mut heat = ColorMap::new(3, 1).unwrap();
        heat.as_bytes_mut().copy_from_slice(&[0, 100, 250]);
        heat.add(10);
        assert_eq!(heat.as_bytes(), &[10, 110, 255]);
        heat.sub(20);
        assert_eq!(heat.as_bytes(), &[0, 90, 235]);
    }

    #[test]
    fn test_to_hardware_order() {
        let mut map = ColorMap::new(2, 3).unwrap();
        map.fill(Color::rgb(1, 2, 3), Span::ALL).unwrap();
        assert_eq!(
            map.to_hardware_order(ChannelOrder::GRB).unwrap(),
            vec![2, 1, 3, 2, 1, 3]
        );
        assert_eq!(
            map.to_hardware_order(ChannelOrder::RGB).unwrap(),
            vec![1, 2, 3, 1, 2, 3]
        );
        assert!(map.to_hardware_order(ChannelOrder::GRBW).is_err());
    }
}
