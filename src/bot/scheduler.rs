//! Self-rescheduling update loop
//!
//! Fires the pipeline once on startup, then perpetually: sleep until the
//! next refresh instant, fire, wait a fixed settle delay, re-query the
//! schedule. The settle delay keeps the loop from re-firing tightly when
//! the schedule advances to an instant very close to "now" right after an
//! update. One task owns this path, so timer-triggered runs never overlap
//! each other.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::info;

use super::Bot;
use crate::notify::format_countdown;
use crate::stock::StockSchedule;

/// Sleep duration until `next_refresh`. A past instant yields a zero
/// delay, which fires immediately.
pub fn arm_delay(now: i64, next_refresh: i64) -> Duration {
    Duration::from_secs((next_refresh - now).max(0) as u64)
}

/// Perpetual scrape-and-notify loop
pub struct SchedulerLoop {
    bot: Arc<Bot>,
    schedule: StockSchedule,
    settle_delay: Duration,
}

impl SchedulerLoop {
    pub fn new(bot: Arc<Bot>, schedule: StockSchedule, settle_delay: Duration) -> Self {
        Self {
            bot,
            schedule,
            settle_delay,
        }
    }

    /// Initial update, then the arm/fire/settle cycle. Never returns;
    /// pipeline failures are logged inside the pipeline and do not stop
    /// the loop.
    pub async fn run(self) {
        self.bot.run_pipeline().await;

        loop {
            let now = Utc::now().timestamp();
            let next_refresh = self.schedule.next_timestamp_after(now);
            let delay = arm_delay(now, next_refresh);
            info!(
                "Next update scheduled in {}",
                format_countdown(delay.as_secs() as i64)
            );

            sleep(delay).await;
            self.bot.run_pipeline().await;
            sleep(self.settle_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_delay_counts_whole_seconds() {
        assert_eq!(arm_delay(100, 105), Duration::from_secs(5));
        assert_eq!(arm_delay(0, 14_400), Duration::from_secs(14_400));
    }

    #[test]
    fn arm_delay_clamps_past_instants_to_zero() {
        assert_eq!(arm_delay(100, 100), Duration::ZERO);
        assert_eq!(arm_delay(100, 40), Duration::ZERO);
    }
}
