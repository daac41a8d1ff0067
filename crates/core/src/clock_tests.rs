use super::*;

#[test]
fn fake_clock_starts_at_configured_value() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.epoch_ms(), 1_000);
}

#[test]
fn fake_clock_advances_deterministically() {
    let clock = FakeClock::new(0);
    clock.advance_ms(3_600_000);
    assert_eq!(clock.epoch_ms(), 3_600_000);
}

#[test]
fn fake_clock_set_overrides_current_value() {
    let clock = FakeClock::new(0);
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn system_clock_returns_plausible_epoch() {
    let clock = SystemClock;
    // Any time after this spec's teacher corpus was generated.
    assert!(clock.epoch_ms() > 1_700_000_000_000);
}
