//! Memory address type.

use std::fmt;

/// Strongly typed memory address
///
/// Program counters, stack pointers and fault addresses all travel through the
/// context engine as `Address` so they cannot be confused with register values
/// or line counts.
///
/// ## Example
///
/// ```rust
/// use vantage_core::types::Address;
///
/// let pc = Address::from(0x401136);
/// assert_eq!(pc.value(), 0x401136);
/// assert_eq!(pc.to_string(), "0x401136");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Fixed-width rendering used by the backtrace and stack columns
    ///
    /// ```rust
    /// use vantage_core::types::Address;
    ///
    /// assert_eq!(Address::from(0x1000).padded(), "0x0000000000001000");
    /// ```
    pub fn padded(self) -> String
    {
        format!("0x{:016x}", self.0)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
