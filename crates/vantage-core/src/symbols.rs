//! Symbol name presentation.
//!
//! Backends hand out linkage names. Rust symbols (legacy `_ZN...h<hash>E` and
//! v0 `_R...`) are demangled with `rustc_demangle` and shown without the hash
//! suffix; everything else is shown as-is.

use rustc_demangle::try_demangle;
use tracing::trace;

use crate::error::ContextError;
use crate::inspector::Inspector;
use crate::types::Address;

/// Human-readable form of a raw symbol name.
///
/// ```rust
/// use vantage_core::symbols::display_name;
///
/// assert_eq!(display_name("_ZN4core3fmt5write17h0123456789abcdefE"), "core::fmt::write");
/// assert_eq!(display_name("main"), "main");
/// ```
pub fn display_name(raw: &str) -> String
{
    match try_demangle(raw) {
        Ok(demangled) => format!("{demangled:#}"),
        Err(_) => raw.to_string(),
    }
}

/// Resolve and demangle the symbol covering `address`.
pub fn symbol_at(inspector: &dyn Inspector, address: Address) -> Option<String>
{
    match inspector.symbol_for(address).filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(display_name(&raw)),
        None => {
            trace!("{}", ContextError::SymbolNotFound(address.value()));
            None
        }
    }
}
