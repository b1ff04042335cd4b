//! # Types
//!
//! Backend-agnostic types shared by the section producers.
//!
//! These types keep the context engine independent of how a particular
//! debugger backend represents addresses, frames and register files.

pub mod address;
pub mod frame;
pub mod registers;

// Re-export all public types
pub use address::Address;
pub use frame::{FrameId, SourceLocation};
pub use registers::{FlagBit, FlagRegister, RegisterLayout, RegisterSnapshot};
