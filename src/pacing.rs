// Frame pacing: the input poll doubles as the loop's sleep.

use std::time::Duration;

/// 1000 ms / 25 fps.
pub const FRAME_BUDGET: Duration = Duration::from_millis(40);
/// Never poll for less than this, so the windows still get their events.
pub const MIN_WAIT: Duration = Duration::from_millis(2);

/// How long to wait for input after a tick that took `elapsed` to process.
///
/// `max(min_wait, budget - ceil(elapsed))` at millisecond resolution, so the
/// whole tick lands near the budget without ever asking for a negative wait.
pub fn wait_timeout(elapsed: Duration, budget: Duration, min_wait: Duration) -> Duration {
    let spent_ms = elapsed.as_nanos().div_ceil(1_000_000);
    let budget_ms = budget.as_millis();
    let wait_ms = budget_ms
        .saturating_sub(spent_ms)
        .max(min_wait.as_millis());
    Duration::from_millis(wait_ms as u64)
}
