//! Debugger lifecycle events and helpers.
//!
//! The host debugger reports continue/stop/exit notifications through these
//! types. They can be handed to the session directly from the host's event
//! callback, or queued on an [`event_channel`] when the notifications come from
//! another thread; queued events are folded in at the start of the next refresh.

use std::sync::mpsc;

/// Why the target stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopKind
{
    /// The kernel delivered a signal, e.g. `SIGSEGV`.
    Signal
    {
        /// Signal name as reported by the backend.
        name: String,
    },
    /// One or more breakpoints triggered.
    Breakpoint
    {
        /// Location description of every triggered breakpoint.
        locations: Vec<String>,
    },
    /// Any other stop (single step, finish, interrupt...).
    Other,
}

/// Event emitted by the host debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebuggerEvent
{
    /// Target resumed execution.
    Continued,
    /// Target stopped execution.
    Stopped(StopKind),
    /// Target exited.
    Exited
    {
        /// Exit status, when the host could obtain it.
        code: Option<i64>,
    },
}

impl DebuggerEvent
{
    /// Shorthand for a signal stop.
    pub fn signal(name: impl Into<String>) -> Self
    {
        Self::Stopped(StopKind::Signal { name: name.into() })
    }

    /// Shorthand for a breakpoint stop.
    pub fn breakpoints<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stopped(StopKind::Breakpoint {
            locations: locations.into_iter().map(Into::into).collect(),
        })
    }

    /// Short name used in log output.
    #[must_use]
    pub fn kind(&self) -> &'static str
    {
        match self {
            Self::Continued => "continued",
            Self::Stopped(_) => "stopped",
            Self::Exited { .. } => "exited",
        }
    }
}

/// Sender side of the debugger event channel.
pub type DebuggerEventSender = mpsc::Sender<DebuggerEvent>;
/// Receiver side of the debugger event channel.
pub type DebuggerEventReceiver = mpsc::Receiver<DebuggerEvent>;

/// Create a new debugger event channel.
#[must_use]
pub fn event_channel() -> (DebuggerEventSender, DebuggerEventReceiver)
{
    mpsc::channel()
}
