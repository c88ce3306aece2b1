//! Shop refresh schedule
//!
//! The in-game shop rotates its stock on a fixed 4-hour cadence. The
//! schedule is authoritative and stateless: every query recomputes the
//! next refresh instant from the wall clock, nothing is cached.

use chrono::Utc;

/// Seconds between shop rotations
pub const REFRESH_INTERVAL_SECS: i64 = 4 * 60 * 60;

/// Oracle for the next shop refresh instant
#[derive(Debug, Clone, Copy, Default)]
pub struct StockSchedule;

impl StockSchedule {
    pub fn new() -> Self {
        Self
    }

    /// Unix timestamp of the next refresh strictly after `now`.
    ///
    /// The cadence divides the day evenly, so refresh instants sit on the
    /// 4-hour UTC grid.
    pub fn next_timestamp_after(&self, now: i64) -> i64 {
        now - now.rem_euclid(REFRESH_INTERVAL_SECS) + REFRESH_INTERVAL_SECS
    }

    /// Next refresh instant from the current wall clock.
    pub fn next_timestamp(&self) -> i64 {
        self.next_timestamp_after(Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_in_the_future() {
        let schedule = StockSchedule::new();
        for now in [0, 1, 59, 14_399, 14_400, 1_700_000_000] {
            assert!(schedule.next_timestamp_after(now) > now, "now={now}");
        }
    }

    #[test]
    fn next_sits_on_the_four_hour_grid() {
        let schedule = StockSchedule::new();
        for now in [1, 7_200, 14_399, 1_700_000_123] {
            assert_eq!(schedule.next_timestamp_after(now) % REFRESH_INTERVAL_SECS, 0);
        }
    }

    #[test]
    fn next_is_at_most_one_interval_away() {
        let schedule = StockSchedule::new();
        for now in [0, 5, 14_399, 1_700_000_000] {
            let next = schedule.next_timestamp_after(now);
            assert!(next - now <= REFRESH_INTERVAL_SECS);
        }
    }

    #[test]
    fn boundary_instant_rolls_to_the_following_slot() {
        let schedule = StockSchedule::new();
        assert_eq!(
            schedule.next_timestamp_after(REFRESH_INTERVAL_SECS),
            2 * REFRESH_INTERVAL_SECS
        );
    }

    #[test]
    fn idempotent_within_a_window() {
        let schedule = StockSchedule::new();
        let next = schedule.next_timestamp_after(1_700_000_000);
        for offset in 0..60 {
            assert_eq!(schedule.next_timestamp_after(1_700_000_000 + offset), next);
        }
    }
}
