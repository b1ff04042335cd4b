//! # vantage-core
//!
//! Context-view engine for interactive debuggers.
//!
//! Every time the inspected program stops, the engine assembles a dashboard of
//! the current machine state and prints it:
//! - Registers, with the ones that changed since the previous stop marked
//! - Disassembly and call arguments around the program counter
//! - Source code (or decompiled pseudocode) around the current line
//! - Stack words and a backtrace window around the selected frame
//! - The signal, breakpoint or exit that caused the stop
//!
//! Each section can be routed to its own output (a file, another terminal).
//! Sections aimed at the terminal the debugger itself runs in are folded back
//! into the main output.
//!
//! ## Backends
//!
//! The engine does not inspect processes itself. A host debugger implements
//! [`Inspector`] and drives a [`ContextSession`] from its event loop.
//!
//! ```rust,no_run
//! use vantage_core::{ContextConfig, ContextSession, DebuggerEvent, Inspector};
//!
//! fn on_stop(session: &mut ContextSession, inspector: &dyn Inspector)
//! {
//!     session.on_event(&DebuggerEvent::signal("SIGSEGV"), inspector);
//!     let report = session.refresh(inspector, None);
//!     for (destination, err) in &report.failures {
//!         eprintln!("{destination}: {err}");
//!     }
//! }
//!
//! let mut session = ContextSession::new(ContextConfig::default());
//! session.start();
//! ```

pub mod backtrace;
pub mod chain;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod inspector;
pub mod registers;
pub mod router;
pub mod sections;
pub mod signal;
pub mod source;
pub mod symbols;
pub mod theme;
pub mod types;

pub use commands::run_command;
pub use config::ContextConfig;
pub use context::{ContextSession, RefreshReport};
// Re-export commonly used types
pub use error::{ContextError, ContextResult};
pub use events::{DebuggerEvent, StopKind};
pub use inspector::{Decompiler, Inspector};
pub use router::{Destination, OutputRouter, SectionOutput, TerminalLocator};
pub use sections::SectionKey;
pub use source::Highlighter;
pub use types::{Address, FrameId, RegisterLayout, SourceLocation};
