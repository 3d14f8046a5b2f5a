/// Default idle time after the last page before an endpoint is finalized (5 seconds)
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 5_000;
/// Default cadence of the timer-driven finalization sweep (1 second)
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1_000;
/// Default bound of the inbound response event queue
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;
/// Identity field used when a record kind does not name one
pub const DEFAULT_IDENTITY_FIELD: &str = "id";
