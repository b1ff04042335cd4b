//! # Error Types
//!
//! General error handling for the context engine.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Most of these errors never leave the crate: configuration and lookup
//! failures are logged and the affected item is skipped. Only delivery
//! failures and the "no live process" case reach the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for context operations
///
/// ## Error Categories
///
/// 1. **Configuration errors**: Configuration
/// 2. **Lookup errors**: UnknownRegister, SymbolNotFound, SourceUnavailable
/// 3. **I/O errors**: Io, Delivery
/// 4. **Backend errors**: Backend, NotRunning
/// 5. **Command errors**: InvalidArgument
#[derive(Error, Debug)]
pub enum ContextError
{
    /// A configuration value was rejected
    ///
    /// The previous (or default) value stays in effect.
    #[error("Invalid configuration for {name}: {reason}")]
    Configuration
    {
        /// Setting name, e.g. `context-sections`
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The backend does not know a register with this name
    #[error("Unknown register: {0}")]
    UnknownRegister(String),

    /// No symbol covers the given address
    #[error("No symbol for address 0x{0:x}")]
    SymbolNotFound(u64),

    /// Source text for the current location could not be produced
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Writing a batch to an output destination failed
    ///
    /// Other destinations of the same refresh are still written.
    #[error("Failed to write context to {destination}: {source}")]
    Delivery
    {
        /// Destination that could not be written
        destination: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A single backend request failed (frame step, memory read, ...)
    ///
    /// Walks that hit this stop early and keep what they gathered.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The command needs a live inspected process
    #[error("The program is not being run")]
    NotRunning,

    /// Invalid argument passed to a command
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error (source files, primary stream, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContextError
{
    /// Build a [`ContextError::Configuration`] for the given setting.
    pub fn configuration(name: impl Into<String>, reason: impl Into<String>) -> Self
    {
        Self::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for `Result<T, ContextError>`
///
/// ```rust
/// use vantage_core::error::ContextResult;
/// fn foo() -> ContextResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type ContextResult<T> = std::result::Result<T, ContextError>;
