mod tests {
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Poll, Waker};

    use myrtio_pixel_engine::{
        Color, ConfigError, ControlRequest, ControlSignal, Duration, EffectConfig, EffectId,
        Error, FrameScheduler, HardwareError, HardwareSink, Instant, PixelBuffer,
        PixelBufferConfig, StopReason, TickOutcome,
    };

    #[derive(Default)]
    struct MockSink {
        writes: usize,
        last: Vec<u8>,
        fail: bool,
    }

    impl HardwareSink for MockSink {
        fn write(&mut self, bytes: &[u8]) -> Result<(), HardwareError> {
            if self.fail {
                return Err(HardwareError::WriteFailed);
            }
            self.writes += 1;
            self.last = bytes.to_vec();
            Ok(())
        }
    }

    fn scheduler(len: usize) -> FrameScheduler<MockSink> {
        let buffer = PixelBuffer::new(PixelBufferConfig::new(len)).unwrap();
        FrameScheduler::new(buffer, MockSink::default())
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn config(query: &str) -> EffectConfig {
        EffectConfig::parse_query(query).unwrap()
    }

    /// Poll `run` once; every case here finishes before the first timer
    fn run_until_first_await(
        scheduler: &mut FrameScheduler<MockSink>,
        signal: &ControlSignal,
    ) -> Poll<Result<StopReason, Error>> {
        let mut context = Context::from_waker(Waker::noop());
        let future = pin!(scheduler.run(signal));
        future.poll(&mut context)
    }

    #[test]
    fn test_idle_without_animation() {
        let mut scheduler = scheduler(4);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.tick(at(0)), Ok(TickOutcome::Idle));
        assert_eq!(scheduler.sink().writes, 0);
    }

    #[test]
    fn test_tick_flushes_frame() {
        let mut scheduler = scheduler(3);
        scheduler
            .apply(&config("effect=solid_color&rgb=010203"), at(0))
            .unwrap();
        assert_eq!(scheduler.animation().map(|a| a.id()), Some(EffectId::SolidColor));

        let TickOutcome::Frame(result) = scheduler.tick(at(0)).unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(result.frame, 1);
        assert_eq!(result.next_deadline, at(5000));
        assert_eq!(result.sleep_duration, Duration::from_millis(5000));
        assert_eq!(scheduler.sink().writes, 1);
        assert_eq!(scheduler.sink().last, vec![2, 1, 3, 2, 1, 3, 2, 1, 3]);
        assert_eq!(scheduler.buffer().get(0).unwrap(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_deadlines_advance_by_interval() {
        let mut scheduler = scheduler(8);
        scheduler
            .apply(&config("effect=next_gen&interval=50"), at(0))
            .unwrap();
        let mut deadlines = Vec::new();
        for now in [0, 50, 100] {
            if let TickOutcome::Frame(result) = scheduler.tick(at(now)).unwrap() {
                deadlines.push(result.next_deadline);
            }
        }
        assert_eq!(deadlines, vec![at(50), at(100), at(150)]);
        assert_eq!(scheduler.frame(), Some(3));
    }

    #[test]
    fn test_drift_correction() {
        let mut scheduler = scheduler(8);
        scheduler
            .apply(&config("effect=next_gen&interval=50"), at(0))
            .unwrap();
        scheduler.tick(at(0)).unwrap();
        // far behind: the schedule restarts from now instead of catching up
        let TickOutcome::Frame(result) = scheduler.tick(at(1000)).unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(result.next_deadline, at(1050));

        // slightly late: keep the cadence
        let TickOutcome::Frame(result) = scheduler.tick(at(1060)).unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(result.next_deadline, at(1100));
        assert_eq!(result.sleep_duration, Duration::from_millis(40));
    }

    #[test]
    fn test_frame_limit() {
        let mut scheduler = scheduler(8);
        scheduler
            .apply(&config("effect=fire&frames=3"), at(0))
            .unwrap();
        for _ in 0..3 {
            assert!(matches!(scheduler.tick(at(0)), Ok(TickOutcome::Frame(_))));
        }
        assert_eq!(
            scheduler.tick(at(0)),
            Ok(TickOutcome::Stopped(StopReason::FrameLimitReached))
        );
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.tick(at(0)), Ok(TickOutcome::Idle));
        assert_eq!(scheduler.sink().writes, 3);
    }

    #[test]
    fn test_signal_keeps_latest_request() {
        let signal = ControlSignal::new();
        assert!(!signal.is_pending());
        signal.apply(config("effect=fire"));
        signal.cancel();
        assert!(signal.is_pending());
        assert_eq!(signal.take(), Some(ControlRequest::Cancel));
        assert_eq!(signal.take(), None);
    }

    #[test]
    fn test_cancel_stops_run() {
        let mut scheduler = scheduler(8);
        let signal = ControlSignal::new();
        signal.apply(config("effect=conjunction"));
        let request = signal.take().unwrap();
        assert_eq!(scheduler.handle(request, at(0)), Ok(None));
        assert!(scheduler.is_running());
        scheduler.tick(at(0)).unwrap();

        signal.cancel();
        let request = signal.take().unwrap();
        assert_eq!(
            scheduler.handle(request, at(50)),
            Ok(Some(StopReason::Cancelled))
        );
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.tick(at(100)), Ok(TickOutcome::Idle));
    }

    #[test]
    fn test_apply_replaces_running_animation() {
        let mut scheduler = scheduler(8);
        scheduler.apply(&config("effect=fire"), at(0)).unwrap();
        scheduler.tick(at(0)).unwrap();
        scheduler.apply(&config("effect=lit_bits"), at(10)).unwrap();
        assert_eq!(scheduler.animation().map(|a| a.id()), Some(EffectId::LitBits));
        assert_eq!(scheduler.frame(), Some(0));
    }

    #[test]
    fn test_failed_build_keeps_current_run() {
        let mut scheduler = scheduler(2);
        scheduler.apply(&config("effect=fire"), at(0)).unwrap();
        scheduler.tick(at(0)).unwrap();
        assert!(scheduler.apply(&config("effect=divergent"), at(0)).is_err());
        assert_eq!(scheduler.animation().map(|a| a.id()), Some(EffectId::Fire));
        assert_eq!(scheduler.frame(), Some(1));
    }

    #[test]
    fn test_extreme_settings_do_not_panic() {
        for query in [
            "effect=next_gen&blanks=18446744073709551615",
            "effect=next_gen&blanks=18446744073709551615&scroll_speed=-1",
            "effect=lit_bits&lit_scroll_speed=-9223372036854775808&scroll_speed=9223372036854775807",
            "effect=fire&scroll_speed=-9223372036854775808",
        ] {
            let mut scheduler = scheduler(8);
            scheduler.apply(&config(query), at(0)).unwrap();
            for now in [0, 50, 100] {
                assert!(
                    matches!(scheduler.tick(at(now)), Ok(TickOutcome::Frame(_))),
                    "{query}"
                );
            }
        }
    }

    #[test]
    fn test_run_returns_on_pending_cancel() {
        let mut scheduler = scheduler(4);
        scheduler.apply(&config("effect=fire"), at(0)).unwrap();
        let signal = ControlSignal::new();
        signal.cancel();
        assert_eq!(
            run_until_first_await(&mut scheduler, &signal),
            Poll::Ready(Ok(StopReason::Cancelled))
        );
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_run_survives_rejected_request() {
        let mut scheduler = scheduler(4);
        scheduler
            .apply(&config("effect=next_gen&frames=1"), at(0))
            .unwrap();
        scheduler.tick(at(0)).unwrap();

        let signal = ControlSignal::new();
        signal.apply(config("effect=fading_color_wheel&stripe_size=1"));
        // the bad request is dropped; the current run goes on to its frame limit
        assert_eq!(
            run_until_first_await(&mut scheduler, &signal),
            Poll::Ready(Ok(StopReason::FrameLimitReached))
        );
        assert!(!signal.is_pending());
        assert_eq!(
            scheduler.apply(&config("effect=fading_color_wheel&stripe_size=1"), at(0)),
            Err(Error::Config(ConfigError::StripeTooShort { size: 1 }))
        );
    }

    #[test]
    fn test_run_stops_on_hardware_error() {
        let mut scheduler = scheduler(4);
        scheduler.sink_mut().fail = true;
        let signal = ControlSignal::new();
        signal.apply(config("effect=next_gen"));
        assert_eq!(
            run_until_first_await(&mut scheduler, &signal),
            Poll::Ready(Err(Error::Hardware(HardwareError::WriteFailed)))
        );
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_hardware_error_ends_run() {
        let mut scheduler = scheduler(4);
        scheduler.apply(&config("effect=next_gen"), at(0)).unwrap();
        scheduler.sink_mut().fail = true;
        assert_eq!(
            scheduler.tick(at(0)),
            Err(Error::Hardware(HardwareError::WriteFailed))
        );
        assert!(!scheduler.is_running());
    }
}
