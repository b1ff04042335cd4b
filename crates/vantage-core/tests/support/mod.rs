//! Scripted inspector and output capture shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use vantage_core::error::{ContextError, ContextResult};
use vantage_core::router::{OutputRouter, TerminalLocator};
use vantage_core::types::{Address, FlagRegister, FrameId, RegisterLayout, SourceLocation};
use vantage_core::{ContextConfig, ContextSession, Decompiler, Inspector};

/// Banner width used by every test session.
pub const WIDTH: usize = 40;

/// Primary writer whose contents the test can read back.
#[derive(Clone, Default)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Write for Captured
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>
    {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}

impl Captured
{
    pub fn text(&self) -> String
    {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String>
    {
        self.text().lines().map(str::to_string).collect()
    }

    pub fn clear(&self)
    {
        self.0.borrow_mut().clear();
    }
}

/// Terminal lookup reporting a fixed device.
pub struct FixedTerminal(pub Option<PathBuf>);

impl TerminalLocator for FixedTerminal
{
    fn stdout_terminal(&self) -> Option<PathBuf>
    {
        self.0.clone()
    }
}

/// Session writing to a [`Captured`] buffer, without color, at [`WIDTH`].
pub fn session(config: ContextConfig, terminal: Option<PathBuf>) -> (ContextSession, Captured)
{
    let _ = vantage_utils::init_logging_with_level(vantage_utils::LogLevel::Debug, vantage_utils::LogFormat::Pretty);

    let captured = Captured::default();
    let router = OutputRouter::with_writer(Box::new(captured.clone())).with_terminal(Box::new(FixedTerminal(terminal)));
    let mut config = config;
    config.color = false;
    let session = ContextSession::with_router(config, router).with_banner_width(WIDTH);
    (session, captured)
}

pub struct CannedDecompiler(pub String);

impl Decompiler for CannedDecompiler
{
    fn decompile(&self, _address: Address, _context_lines: usize) -> ContextResult<Option<String>>
    {
        Ok(Some(self.0.clone()))
    }
}

/// In-memory process model.
///
/// Frames are numbered from the innermost (0) outwards; `frame_pcs[i]` is the
/// program counter of frame `i`.
pub struct MockInspector
{
    pub alive: bool,
    pub layout: RegisterLayout,
    pub registers: RefCell<HashMap<String, u64>>,
    pub unreadable: HashSet<String>,
    pub memory: HashMap<u64, u64>,
    pub symbols: HashMap<u64, String>,
    pub frame_pcs: Vec<u64>,
    pub older_links: HashMap<u64, u64>,
    pub failing_older: Option<u64>,
    pub selected: u64,
    pub sources: HashMap<u64, SourceLocation>,
    pub extensions: Vec<String>,
    pub fault: Option<u64>,
    pub disassembly: Vec<String>,
    pub arguments: Vec<String>,
    pub stack_words: Vec<String>,
    pub decompiler: Option<CannedDecompiler>,
    pub flag_override: Option<Vec<FlagRegister>>,
}

impl MockInspector
{
    /// x86-64 process stopped in `main` with a three-frame chain.
    pub fn x86_64() -> Self
    {
        let layout = RegisterLayout::x86_64();
        let mut registers = HashMap::new();
        for (index, name) in layout.general.iter().enumerate() {
            registers.insert(name.clone(), index as u64);
        }
        registers.insert("rbp".to_string(), 0x7ffe_0000_1000);
        registers.insert("rsp".to_string(), 0x7ffe_0000_0ff0);
        registers.insert("rip".to_string(), 0x40_1136);
        registers.insert("eflags".to_string(), 0x246);

        let frame_pcs = vec![0x40_1136, 0x40_1200, 0x40_1300];
        let symbols = HashMap::from([
            (0x40_1136, "main".to_string()),
            (0x40_1200, "__libc_start_call_main".to_string()),
            (0x40_1300, "_start".to_string()),
        ]);

        Self {
            alive: true,
            layout,
            registers: RefCell::new(registers),
            unreadable: HashSet::new(),
            memory: HashMap::new(),
            symbols,
            older_links: chain_links(frame_pcs.len()),
            frame_pcs,
            failing_older: None,
            selected: 0,
            sources: HashMap::new(),
            extensions: Vec::new(),
            fault: None,
            disassembly: vec![" ► 0x401136 <main+0>    push   rbp".to_string()],
            arguments: Vec::new(),
            stack_words: vec!["00:0000│ rsp 0x7ffe00000ff0 ◂— 0x1".to_string()],
            decompiler: None,
            flag_override: None,
        }
    }

    /// Process with `count` frames and no other state worth showing.
    pub fn with_frames(count: usize) -> Self
    {
        let mut inspector = Self::x86_64();
        inspector.frame_pcs = (0..count as u64).map(|index| 0x40_1000 + index * 0x10).collect();
        inspector.older_links = chain_links(count);
        inspector.symbols.clear();
        inspector
    }

    pub fn set_register(&self, name: &str, value: u64)
    {
        self.registers.borrow_mut().insert(name.to_string(), value);
    }
}

fn chain_links(count: usize) -> HashMap<u64, u64>
{
    (1..count as u64).map(|index| (index - 1, index)).collect()
}

impl Inspector for MockInspector
{
    fn is_alive(&self) -> bool
    {
        self.alive
    }

    fn register_layout(&self) -> RegisterLayout
    {
        self.layout.clone()
    }

    fn flag_registers(&self) -> Vec<FlagRegister>
    {
        self.flag_override.clone().unwrap_or_else(|| self.layout.flags.clone())
    }

    fn register_value(&self, name: &str) -> ContextResult<u64>
    {
        if self.unreadable.contains(name) {
            return Err(ContextError::Backend(format!("cannot read {name}")));
        }
        self.registers
            .borrow()
            .get(name)
            .copied()
            .ok_or_else(|| ContextError::UnknownRegister(name.to_string()))
    }

    fn selected_frame(&self) -> ContextResult<FrameId>
    {
        if self.frame_pcs.is_empty() {
            return Err(ContextError::Backend("no stack".to_string()));
        }
        Ok(FrameId::from_raw(self.selected))
    }

    fn frame_pc(&self, frame: FrameId) -> ContextResult<Address>
    {
        usize::try_from(frame.raw())
            .ok()
            .and_then(|index| self.frame_pcs.get(index))
            .map(|pc| Address::from(*pc))
            .ok_or_else(|| ContextError::Backend(format!("no frame {frame}")))
    }

    fn older_frame(&self, frame: FrameId) -> ContextResult<Option<FrameId>>
    {
        if self.failing_older == Some(frame.raw()) {
            return Err(ContextError::Backend("unwind failed".to_string()));
        }
        Ok(self.older_links.get(&frame.raw()).copied().map(FrameId::from_raw))
    }

    fn newer_frame(&self, frame: FrameId) -> ContextResult<Option<FrameId>>
    {
        Ok(self
            .older_links
            .iter()
            .find(|(_, older)| **older == frame.raw())
            .map(|(newer, _)| FrameId::from_raw(*newer)))
    }

    fn symbol_for(&self, address: Address) -> Option<String>
    {
        self.symbols.get(&address.value()).cloned()
    }

    fn source_location(&self, frame: FrameId) -> Option<SourceLocation>
    {
        self.sources.get(&frame.raw()).cloned()
    }

    fn read_pointer(&self, address: Address) -> ContextResult<u64>
    {
        self.memory
            .get(&address.value())
            .copied()
            .ok_or_else(|| ContextError::Backend(format!("cannot access memory at {address}")))
    }

    fn fault_address(&self) -> ContextResult<Option<Address>>
    {
        Ok(self.fault.map(Address::from))
    }

    fn has_extension(&self, name: &str) -> bool
    {
        self.extensions.iter().any(|extension| extension == name)
    }

    fn disassemble_near(&self, _address: Address, _lines: usize, _emulate: bool) -> ContextResult<Vec<String>>
    {
        Ok(self.disassembly.clone())
    }

    fn call_arguments(&self, _address: Address) -> ContextResult<Vec<String>>
    {
        Ok(self.arguments.clone())
    }

    fn read_stack_window(&self, _address: Address, count: usize) -> ContextResult<Vec<String>>
    {
        Ok(self.stack_words.iter().take(count).cloned().collect())
    }

    fn decompiler(&self) -> Option<&dyn Decompiler>
    {
        self.decompiler.as_ref().map(|decompiler| decompiler as &dyn Decompiler)
    }
}
