//! # Vantage Utilities
//!
//! Logging setup shared by the vantage crates and the hosts embedding them.

pub mod logging;

pub use logging::{init_logging, init_logging_for_file, init_logging_with_level, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
