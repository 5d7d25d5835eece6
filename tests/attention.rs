#[cfg(test)]
mod tests {
    use soma_rail::libs::attention::{AttentionConfig, AttentionMonitor, InteractionEvent, Position};
    use tokio::time::{Duration, Instant};

    const TICK: u64 = 16;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// A monitor created at `start` plus the first instant past its grace period.
    fn ready_monitor() -> (AttentionMonitor, Instant) {
        let start = Instant::now();
        let monitor = AttentionMonitor::new(AttentionConfig::default(), start);
        (monitor, start + ms(2000))
    }

    /// Drives the monitor with focus lost until the score saturates; returns the last tick time.
    fn saturate(monitor: &mut AttentionMonitor, from: Instant) -> Instant {
        monitor.on_focus_change(false);
        let mut now = from;
        for _ in 0..200 {
            now += ms(TICK);
            monitor.tick(now);
        }
        monitor.on_focus_change(true);
        now
    }

    #[test]
    fn test_score_stays_within_bounds() {
        let (mut monitor, mut now) = ready_monitor();
        let max = monitor.config().distraction_max;

        monitor.on_focus_change(false);
        for _ in 0..500 {
            now += ms(TICK);
            monitor.tick(now);
            assert!(monitor.distraction_score() >= 0.0 && monitor.distraction_score() <= max);
        }
        assert_eq!(monitor.distraction_score(), max);

        monitor.on_focus_change(true);
        for _ in 0..1000 {
            now += ms(TICK);
            monitor.tick(now);
            assert!(monitor.distraction_score() >= 0.0 && monitor.distraction_score() <= max);
        }
        assert_eq!(monitor.distraction_score(), 0.0);
    }

    #[test]
    fn test_pointer_ignored_during_grace_period() {
        let start = Instant::now();
        let mut monitor = AttentionMonitor::new(AttentionConfig::default(), start);
        let before = monitor.state().clone();

        monitor.on_pointer_move(Position::new(400.0, 300.0), start + ms(500));
        monitor.on_pointer_move(Position::new(800.0, 600.0), start + ms(1999));

        assert_eq!(monitor.state(), &before);
    }

    #[test]
    fn test_jitter_below_threshold_is_noise() {
        let (mut monitor, now) = ready_monitor();

        // (3, 4) is exactly 5px away from the origin: not more than the threshold.
        monitor.on_pointer_move(Position::new(3.0, 4.0), now);

        let state = monitor.state();
        assert!(!state.is_moving);
        assert_eq!(state.last_pointer_position, Position::default());
        assert_eq!(state.pointer_position, Position::new(3.0, 4.0));
        assert_eq!(state.last_pointer_sample, Some(now));
    }

    #[test]
    fn test_movement_above_threshold_is_accepted() {
        let (mut monitor, now) = ready_monitor();

        monitor.on_pointer_move(Position::new(6.0, 0.0), now);

        let state = monitor.state();
        assert!(state.is_moving);
        assert_eq!(state.last_movement, now);
        assert_eq!(state.last_pointer_position, Position::new(6.0, 0.0));
    }

    #[test]
    fn test_samples_are_throttled() {
        let (mut monitor, now) = ready_monitor();

        monitor.on_pointer_move(Position::new(2.0, 0.0), now);
        monitor.on_pointer_move(Position::new(50.0, 50.0), now + ms(10));
        assert!(!monitor.state().is_moving);
        assert_eq!(monitor.state().pointer_position, Position::new(2.0, 0.0));

        monitor.on_pointer_move(Position::new(50.0, 50.0), now + ms(TICK));
        assert!(monitor.state().is_moving);
    }

    #[test]
    fn test_jitter_measured_from_last_qualifying_position() {
        let (mut monitor, now) = ready_monitor();

        monitor.on_pointer_move(Position::new(100.0, 100.0), now);
        monitor.tick(now + ms(200));
        assert!(!monitor.state().is_moving);

        // Small steps never add up, each one is compared to (100, 100).
        monitor.on_pointer_move(Position::new(102.0, 100.0), now + ms(216));
        monitor.on_pointer_move(Position::new(104.0, 100.0), now + ms(232));
        assert!(!monitor.state().is_moving);
        assert_eq!(monitor.state().last_pointer_position, Position::new(100.0, 100.0));

        monitor.on_pointer_move(Position::new(106.0, 100.0), now + ms(248));
        assert!(monitor.state().is_moving);
    }

    #[test]
    fn test_moving_flag_demoted_by_tick() {
        let (mut monitor, now) = ready_monitor();

        monitor.on_pointer_move(Position::new(50.0, 0.0), now);
        monitor.tick(now + ms(100));
        assert!(monitor.state().is_moving);

        monitor.tick(now + ms(101));
        assert!(!monitor.state().is_moving);
    }

    #[test]
    fn test_focus_events_dispatch() {
        let (mut monitor, now) = ready_monitor();

        monitor.handle(InteractionEvent::Focus(false), now);
        assert!(!monitor.state().is_focused);

        monitor.handle(InteractionEvent::PointerMove { x: 40.0, y: 0.0 }, now);
        assert!(monitor.state().is_moving);

        monitor.handle(InteractionEvent::Focus(true), now);
        assert!(monitor.state().is_focused);
    }

    #[test]
    fn test_recovery_waits_for_calm_threshold() {
        let (mut monitor, now) = ready_monitor();
        let last_increase = saturate(&mut monitor, now);
        let max = monitor.config().distraction_max;

        let mut tick = last_increase;
        while tick + ms(TICK) <= last_increase + ms(2000) {
            tick += ms(TICK);
            monitor.tick(tick);
            assert_eq!(monitor.distraction_score(), max);
        }

        monitor.tick(last_increase + ms(2001));
        assert!(monitor.distraction_score() < max);
    }

    #[test]
    fn test_recovery_is_strictly_decreasing_then_zero() {
        let (mut monitor, now) = ready_monitor();
        let mut tick = saturate(&mut monitor, now) + ms(2000);

        let mut previous = monitor.distraction_score();
        while previous > 0.0 {
            tick += ms(TICK);
            monitor.tick(tick);
            let score = monitor.distraction_score();
            assert!(score < previous, "score must drop on every calm tick");
            previous = score;
        }

        for _ in 0..50 {
            tick += ms(TICK);
            monitor.tick(tick);
            assert_eq!(monitor.distraction_score(), 0.0);
        }
    }

    #[test]
    fn test_no_recovery_while_moving() {
        let (mut monitor, now) = ready_monitor();
        let mut tick = saturate(&mut monitor, now);
        let max = monitor.config().distraction_max;

        // Keep wiggling for longer than the calm threshold.
        for step in 0..250u64 {
            tick += ms(TICK);
            let x = if step % 2 == 0 { 0.0 } else { 20.0 };
            monitor.on_pointer_move(Position::new(x, 0.0), tick);
            monitor.tick(tick);
            assert_eq!(monitor.distraction_score(), max);
        }
    }

    #[test]
    fn test_full_decay_takes_recovery_duration() {
        let (mut monitor, now) = ready_monitor();
        let mut tick = saturate(&mut monitor, now);
        let config = monitor.config().clone();

        let mut recovery_start = None;
        loop {
            tick += ms(TICK);
            let before = monitor.distraction_score();
            monitor.tick(tick);
            if recovery_start.is_none() && monitor.distraction_score() < before {
                // The drop is accounted to the interval that ends at this tick.
                recovery_start = Some(tick - ms(TICK));
            }
            if monitor.distraction_score() == 0.0 {
                break;
            }
        }

        let elapsed = tick.duration_since(recovery_start.unwrap()).as_millis() as i64;
        assert!((elapsed - config.recovery_duration as i64).abs() <= TICK as i64, "elapsed {}ms", elapsed);
    }

    #[test]
    fn test_continuous_movement_saturates_score() {
        let (mut monitor, now) = ready_monitor();
        let mut tick = now;

        for step in 0..(1500 / TICK) {
            let x = (step as f64 + 1.0) * 10.0;
            monitor.on_pointer_move(Position::new(x, 0.0), tick);
            monitor.tick(tick);
            tick += ms(TICK);
        }

        // 93 ticks * 1.1 would exceed the maximum.
        assert_eq!(monitor.distraction_score(), 100.0);
    }

    #[test]
    fn test_reset_grace_period_rearms_window() {
        let (mut monitor, now) = ready_monitor();

        monitor.on_pointer_move(Position::new(30.0, 0.0), now);
        assert!(monitor.state().is_moving);

        let reset_at = now + ms(50);
        monitor.reset_grace_period(reset_at);
        assert_eq!(monitor.state().grace_period_end, reset_at + ms(2000));
        assert!(monitor.state().last_movement <= reset_at);

        // The stale movement no longer counts on the next tick.
        monitor.tick(reset_at + ms(TICK));
        assert!(!monitor.state().is_moving);

        monitor.on_pointer_move(Position::new(90.0, 0.0), reset_at + ms(1000));
        assert!(!monitor.state().is_moving);
        assert_eq!(monitor.state().last_pointer_position, Position::new(30.0, 0.0));

        monitor.on_pointer_move(Position::new(90.0, 0.0), reset_at + ms(2000));
        assert!(monitor.state().is_moving);
        assert_eq!(monitor.state().last_movement, reset_at + ms(2000));
    }
}
