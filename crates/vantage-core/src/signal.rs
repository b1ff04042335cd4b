//! # Signal Event Cache
//!
//! Single-slot record of the most recent lifecycle event.
//!
//! The host calls [`SignalCache::record`] from its continue/stop/exit
//! callbacks; the context refresh appends [`SignalCache::drain`] to the main
//! batch. Reading does not consume the record: it stays until the next event
//! replaces it, and a continue event replaces it with nothing.

use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use crate::events::{DebuggerEvent, StopKind};
use crate::inspector::{Inspector, RECORD_REPLAY_EXTENSION};
use crate::theme::Palette;

/// Name of the segmentation fault signal.
const SIGSEGV: &str = "SIGSEGV";

/// Last lifecycle message, formatted for display
#[derive(Debug, Default)]
pub struct SignalCache
{
    lines: Vec<String>,
    replay: OnceCell<bool>,
}

impl SignalCache
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Replace the cached record with the message for `event`.
    pub fn record(&mut self, event: &DebuggerEvent, inspector: &dyn Inspector, palette: &Palette)
    {
        let mut lines = Vec::new();

        match event {
            DebuggerEvent::Exited { code: Some(code) } => {
                lines.push(palette.exit_message(&format!("Exited: {code}")));
            }
            DebuggerEvent::Stopped(StopKind::Signal { name }) => {
                let mut message = format!("Program received signal {name}");
                if name == SIGSEGV {
                    if self.replay_active(inspector) {
                        if let Ok(pc) = inspector.program_counter() {
                            message.push_str(&format!(" (current pc: {pc:#x})"));
                        }
                    } else if let Ok(Some(address)) = inspector.fault_address() {
                        message.push_str(&format!(" (fault address {address:#x})"));
                    }
                }
                lines.push(palette.signal_message(&message));
            }
            DebuggerEvent::Stopped(StopKind::Breakpoint { locations }) => {
                lines.extend(
                    locations
                        .iter()
                        .map(|location| palette.breakpoint_message(&format!("Breakpoint {location}"))),
                );
            }
            DebuggerEvent::Exited { code: None } | DebuggerEvent::Stopped(StopKind::Other) | DebuggerEvent::Continued => {}
        }

        debug!(event = event.kind(), lines = lines.len(), "recorded lifecycle event");
        self.lines = lines;
    }

    /// Current record; repeated calls return the same lines.
    pub fn drain(&self) -> Vec<String>
    {
        self.lines.clone()
    }

    /// Forget the record and the replay check (new debugging session).
    pub fn reset(&mut self)
    {
        self.lines.clear();
        self.replay = OnceCell::new();
    }

    /// Whether a record/replay tool drives the target, checked once per session.
    fn replay_active(&self, inspector: &dyn Inspector) -> bool
    {
        *self.replay.get_or_init(|| {
            let active = inspector.has_extension(RECORD_REPLAY_EXTENSION);
            trace!(active, "checked for record/replay extension");
            active
        })
    }
}
