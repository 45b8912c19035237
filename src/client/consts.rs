use std::time::Duration;

pub const SERVER_ADDRESS_ENV: &str = "DIATHEKE_SERVER_ADDRESS";

pub const DEFAULT_SERVER_ADDRESS: &str = "localhost:9002";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending items allowed in a stream's handoff queue.
pub const HANDOFF_CAPACITY: usize = 1;
