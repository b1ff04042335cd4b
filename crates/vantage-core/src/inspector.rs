//! # Inspector Trait
//!
//! The interface the context engine needs from a live-process backend.
//!
//! The engine itself never talks to the kernel, parses debug info or
//! disassembles code. Everything it shows comes from an implementation of
//! [`Inspector`], which a host debugger (ptrace, Mach, gdbstub, a recorded
//! trace...) provides.
//!
//! ## Failure model
//!
//! Every call that touches the target may fail. Callers treat a failure as a
//! missing item: a register is skipped, a frame walk stops early, a section
//! renders empty. Nothing here is expected to panic.

use crate::error::ContextResult;
use crate::types::{Address, FlagRegister, FrameId, RegisterLayout, SourceLocation};

/// Extension name a record/replay tool registers with the backend.
///
/// Fault addresses cannot be introspected while replaying, so the signal
/// message falls back to the program counter when this extension is present.
pub const RECORD_REPLAY_EXTENSION: &str = "rr";

/// Optional decompiler used when no source file covers the current address.
pub trait Decompiler
{
    /// Pseudocode around `address`, `context_lines` lines on each side.
    ///
    /// `Ok(None)` means the decompiler has nothing for this address.
    fn decompile(&self, address: Address, context_lines: usize) -> ContextResult<Option<String>>;
}

/// Live-process inspection backend
///
/// ## Lifecycle
///
/// The host creates one inspector per inspected process and passes it by
/// reference into every refresh. Frame handles returned by it are only valid
/// until the process resumes.
///
/// ## Thread Safety
///
/// The inspector is used from the host's event loop only. It does not need to
/// be `Send` or `Sync`.
pub trait Inspector
{
    /// Whether an inspected process currently exists.
    fn is_alive(&self) -> bool;

    /// Register groups of the target architecture.
    fn register_layout(&self) -> RegisterLayout;

    /// Every register name the backend can read.
    ///
    /// The default implementation lists the groups of
    /// [`Inspector::register_layout`].
    fn known_registers(&self) -> Vec<String>
    {
        let layout = self.register_layout();
        let mut names = layout.general.clone();
        names.extend(layout.frame.iter().cloned());
        names.push(layout.stack.clone());
        names.extend(layout.return_address.iter().cloned());
        names.push(layout.pc.clone());
        names.extend(self.flag_registers().into_iter().map(|flags| flags.name));
        names
    }

    /// Flag registers and their bit layouts.
    fn flag_registers(&self) -> Vec<FlagRegister>
    {
        self.register_layout().flags
    }

    /// Current value of a register.
    ///
    /// ## Errors
    ///
    /// - `UnknownRegister`: the name is not part of the register file
    /// - `Backend`: the value could not be read
    fn register_value(&self, name: &str) -> ContextResult<u64>;

    /// Current program counter.
    fn program_counter(&self) -> ContextResult<Address>
    {
        let pc = self.register_layout().pc;
        self.register_value(&pc).map(Address::from)
    }

    /// Current stack pointer.
    fn stack_pointer(&self) -> ContextResult<Address>
    {
        let sp = self.register_layout().stack;
        self.register_value(&sp).map(Address::from)
    }

    /// Frame selected by the user (usually the innermost one).
    fn selected_frame(&self) -> ContextResult<FrameId>;

    /// Program counter of a frame.
    fn frame_pc(&self, frame: FrameId) -> ContextResult<Address>;

    /// Caller of `frame`, `None` at the outermost frame.
    ///
    /// ## Errors
    ///
    /// `Backend` when unwinding fails (unreadable stack memory, bad CFI, ...).
    fn older_frame(&self, frame: FrameId) -> ContextResult<Option<FrameId>>;

    /// Callee of `frame`, `None` at the innermost frame.
    fn newer_frame(&self, frame: FrameId) -> ContextResult<Option<FrameId>>;

    /// Symbol covering `address`, possibly still mangled.
    fn symbol_for(&self, address: Address) -> Option<String>;

    /// Source file and line associated with a frame's program counter.
    fn source_location(&self, frame: FrameId) -> Option<SourceLocation>;

    /// Read one pointer-sized word from target memory.
    fn read_pointer(&self, address: Address) -> ContextResult<u64>;

    /// Faulting address of the signal that stopped the target, if known.
    fn fault_address(&self) -> ContextResult<Option<Address>>
    {
        Ok(None)
    }

    /// Whether a named extension (plugin, script command) is registered.
    fn has_extension(&self, _name: &str) -> bool
    {
        false
    }

    /// Formatted instructions around `address`.
    ///
    /// `lines` is the number of instructions after the current one; `emulate`
    /// asks the backend to follow branches through emulation where it can.
    fn disassemble_near(&self, address: Address, lines: usize, emulate: bool) -> ContextResult<Vec<String>>;

    /// Formatted arguments of the call instruction at `address`.
    ///
    /// Empty when the instruction is not a call or no arguments are known.
    fn call_arguments(&self, address: Address) -> ContextResult<Vec<String>>;

    /// Formatted stack words starting at `address`.
    fn read_stack_window(&self, address: Address, count: usize) -> ContextResult<Vec<String>>;

    /// Decompiler capability, when one is attached.
    fn decompiler(&self) -> Option<&dyn Decompiler>
    {
        None
    }
}
