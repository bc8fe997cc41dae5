use std::time::Duration;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_secs(5);

/// How many planned tasks one iteration claims, and how long the worker sleeps between iterations.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub limit: u32,
    pub refresh_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            refresh_delay: DEFAULT_REFRESH_DELAY,
        }
    }
}

impl SchedulerConfig {
    pub fn new(limit: u32, refresh_delay: Duration) -> Self {
        Self {
            limit,
            refresh_delay,
        }
    }
}
