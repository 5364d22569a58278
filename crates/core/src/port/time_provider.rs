// Time Provider Port (duration tracking, mockable in tests)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Milliseconds elapsed since `started_at` (a previous `now_millis`)
    fn elapsed_millis(&self, started_at: i64) -> i64 {
        (self.now_millis() - started_at).max(0)
    }
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(i64);

    impl TimeProvider for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_elapsed_millis() {
        let clock = FixedClock(1_250);

        assert_eq!(clock.elapsed_millis(1_000), 250);
        // Never negative, even if the clock moves backwards
        assert_eq!(clock.elapsed_millis(11_000), 0);
    }
}
