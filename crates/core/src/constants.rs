//! Constants used throughout the tripwire codebase

use std::time::Duration;

// Environment variable names
pub const TRIPWIRE_THRESHOLD_VAR: &str = "TRIPWIRE_THRESHOLD";
pub const TRIPWIRE_TIMEOUT_MS_VAR: &str = "TRIPWIRE_TIMEOUT_MS";
pub const TRIPWIRE_LOG_VAR: &str = "TRIPWIRE_LOG";

// Breaker defaults
pub const DEFAULT_THRESHOLD: u32 = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BREAKER_NAME: &str = "default";
