//! Stack frame handles.

use std::fmt;

/// Opaque handle to one activation record in the backend's frame chain.
///
/// The context engine never owns frames. A `FrameId` is only meaningful to the
/// [`Inspector`](crate::inspector::Inspector) that produced it and only for the
/// duration of one refresh; two handles compare equal when they name the same
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId
{
    /// Wrap a backend-specific frame identifier.
    pub const fn from_raw(raw: u64) -> Self
    {
        Self(raw)
    }

    /// Raw identifier as handed out by the backend.
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

impl fmt::Display for FrameId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}

/// Source position of a frame as reported by the symbol tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation
{
    /// Absolute path of the source file.
    pub file: String,
    /// One-based line number.
    pub line: usize,
}

impl SourceLocation
{
    pub fn new(file: impl Into<String>, line: usize) -> Self
    {
        Self { file: file.into(), line }
    }
}
