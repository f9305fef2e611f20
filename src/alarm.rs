/*
 * The no-signal alarm blinker.
 *
 * An asymmetric blink: the period alternates between 350 ms and 700 ms on
 * every toggle, which reads as a distress pattern rather than a steady
 * blink. All time and delay functions stay outside this module; the caller
 * passes the current time in and applies the returned level, which keeps the
 * pattern testable without real timing.
 */

const SHORT_PERIOD_MS: u64 = 350;
const LONG_PERIOD_MS: u64 = 700;

#[derive(Debug)]
pub struct AlarmBlinker {
    level: bool,
    long_phase: bool,
    last_toggle_ms: u64,
}

impl AlarmBlinker {
    pub const fn new() -> Self {
        AlarmBlinker {
            level: false,
            long_phase: false,
            last_toggle_ms: 0,
        }
    }

    /// Advance the pattern to `now_ms`. Returns the new lamp level when a
    /// toggle fires, `None` while the current period is still running. A
    /// toggle fires only once the elapsed time strictly exceeds the period.
    pub fn tick(&mut self, now_ms: u64) -> Option<bool> {
        let period = if self.long_phase {
            LONG_PERIOD_MS
        } else {
            SHORT_PERIOD_MS
        };

        if now_ms.saturating_sub(self.last_toggle_ms) > period {
            self.last_toggle_ms = now_ms;
            self.level = !self.level;
            self.long_phase = !self.long_phase;
            Some(self.level)
        } else {
            None
        }
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl Default for AlarmBlinker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dark_and_silent() {
        let mut alarm = AlarmBlinker::new();
        assert!(!alarm.level());
        assert_eq!(alarm.tick(0), None);
        assert_eq!(alarm.tick(350), None);
    }

    #[test]
    fn first_toggle_after_short_period() {
        let mut alarm = AlarmBlinker::new();
        assert_eq!(alarm.tick(349), None);
        assert_eq!(alarm.tick(351), Some(true));
        assert!(alarm.level());
    }

    #[test]
    fn periods_alternate_short_long_short() {
        let mut alarm = AlarmBlinker::new();
        assert_eq!(alarm.tick(351), Some(true));

        // Now in the long phase: 700 ms must pass before the next toggle.
        assert_eq!(alarm.tick(1051), None);
        assert_eq!(alarm.tick(1052), Some(false));

        // Back to the short phase.
        assert_eq!(alarm.tick(1402), None);
        assert_eq!(alarm.tick(1403), Some(true));

        // And long again.
        assert_eq!(alarm.tick(2103), None);
        assert_eq!(alarm.tick(2104), Some(false));
    }

    #[test]
    fn level_flips_on_every_toggle() {
        let mut alarm = AlarmBlinker::new();
        let mut expected = false;
        let mut now = 0;
        for _ in 0..8 {
            now += 701;
            expected = !expected;
            assert_eq!(alarm.tick(now), Some(expected));
        }
    }

    #[test]
    fn time_standing_still_never_toggles() {
        let mut alarm = AlarmBlinker::new();
        for _ in 0..100 {
            assert_eq!(alarm.tick(100), None);
        }
    }
}
