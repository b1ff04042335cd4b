//! # Sections
//!
//! The six parts of the context view and the producers that render them.
//!
//! Each section is addressed by a one-letter key (`r`, `d`, `a`, `c`, `s`,
//! `b`). Requests are reduced to their first character, so `stack`, `st` and
//! `s` all name the stack section. Anything else becomes
//! [`SectionKey::Unknown`] and renders nothing.
//!
//! Producers never fail: a backend error degrades the affected section to its
//! banner (or to nothing) and is logged.

use std::fmt;

use tracing::warn;

use crate::backtrace::{self, DEFAULT_FRAME_COUNT};
use crate::config::ContextConfig;
use crate::inspector::Inspector;
use crate::registers::RegisterTracker;
use crate::source::SourceCache;
use crate::theme::Palette;

/// Identifies one section of the context view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey
{
    /// `r`: register values with change markers
    Registers,
    /// `d`: disassembly around the program counter
    Disasm,
    /// `a`: arguments of the call at the program counter
    Args,
    /// `c`: source (or decompiled) code
    Code,
    /// `s`: stack words
    Stack,
    /// `b`: backtrace
    Backtrace,
    /// A key no section answers to
    Unknown(char),
}

impl SectionKey
{
    /// Number of real sections.
    pub const COUNT: usize = 6;

    /// Full names accepted in the `context-sections` setting, in key order.
    pub const NAMES: [&'static str; Self::COUNT] = ["regs", "disasm", "args", "code", "stack", "backtrace"];

    /// Key for a single character.
    pub fn from_char(key: char) -> Self
    {
        match key {
            'r' => Self::Registers,
            'd' => Self::Disasm,
            'a' => Self::Args,
            'c' => Self::Code,
            's' => Self::Stack,
            'b' => Self::Backtrace,
            other => Self::Unknown(other),
        }
    }

    /// Key for a request token, reduced to its first character.
    ///
    /// Returns `None` for an empty token.
    pub fn from_token(token: &str) -> Option<Self>
    {
        token.trim().chars().next().map(Self::from_char)
    }

    /// Key for a full section name as used in `context-sections`.
    pub fn from_name(name: &str) -> Option<Self>
    {
        Self::NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(Self::from_index)
    }

    fn from_index(index: usize) -> Self
    {
        match index {
            0 => Self::Registers,
            1 => Self::Disasm,
            2 => Self::Args,
            3 => Self::Code,
            4 => Self::Stack,
            _ => Self::Backtrace,
        }
    }

    /// Position in [`SectionKey::NAMES`]; `None` for unknown keys.
    pub fn index(self) -> Option<usize>
    {
        match self {
            Self::Registers => Some(0),
            Self::Disasm => Some(1),
            Self::Args => Some(2),
            Self::Code => Some(3),
            Self::Stack => Some(4),
            Self::Backtrace => Some(5),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_known(self) -> bool
    {
        self.index().is_some()
    }
}

impl fmt::Display for SectionKey
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.index() {
            Some(index) => write!(f, "{}", Self::NAMES[index]),
            None => match self {
                Self::Unknown(key) => write!(f, "{key}"),
                _ => Ok(()),
            },
        }
    }
}

/// Everything a producer may read, plus the two caches it may update.
pub struct SectionRenderer<'a>
{
    pub inspector: &'a dyn Inspector,
    pub config: &'a ContextConfig,
    pub palette: &'a Palette,
    pub registers: &'a mut RegisterTracker,
    pub sources: &'a mut SourceCache,
}

impl SectionRenderer<'_>
{
    /// Render one section.
    pub fn render(&mut self, key: SectionKey) -> Vec<String>
    {
        match key {
            SectionKey::Registers => self.registers(),
            SectionKey::Disasm => self.disasm(),
            SectionKey::Args => self.args(),
            SectionKey::Code => self.code(),
            SectionKey::Stack => self.stack(),
            SectionKey::Backtrace => {
                backtrace::render(self.inspector, self.config, self.palette, DEFAULT_FRAME_COUNT, true)
            }
            SectionKey::Unknown(_) => Vec::new(),
        }
    }

    fn registers(&mut self) -> Vec<String>
    {
        let mut lines = vec![self.palette.banner("registers")];
        lines.extend(self.registers.render(self.inspector, self.config, self.palette, None));
        lines
    }

    fn disasm(&self) -> Vec<String>
    {
        let mut lines = vec![self.palette.banner("disasm")];
        let code_lines = self.config.code_lines;

        let listing = self
            .inspector
            .program_counter()
            .and_then(|pc| self.inspector.disassemble_near(pc, code_lines / 2, self.config.emulate));
        match listing {
            Ok(listing) => lines.extend(listing),
            Err(err) => warn!("disassembly unavailable: {err}"),
        }

        // Keep the section height roughly constant when fewer lines came back.
        while lines.len() < code_lines + 2 {
            lines.push(String::new());
        }
        lines
    }

    fn args(&self) -> Vec<String>
    {
        let arguments = self
            .inspector
            .program_counter()
            .and_then(|pc| self.inspector.call_arguments(pc));
        match arguments {
            Ok(arguments) if !arguments.is_empty() => {
                let mut lines = vec![self.palette.banner("arguments")];
                lines.extend(arguments);
                lines
            }
            Ok(_) => Vec::new(),
            Err(err) => {
                warn!("call arguments unavailable: {err}");
                Vec::new()
            }
        }
    }

    fn code(&mut self) -> Vec<String>
    {
        if let Some(window) = self.sources.resolve_current(self.inspector, self.config, self.palette) {
            if !window.lines.is_empty() {
                let mut lines = vec![
                    self.palette.banner("Source (code)"),
                    format!("In file: {}", window.filename),
                ];
                lines.extend(window.lines);
                return lines;
            }
        }

        let Some(decompiler) = self.inspector.decompiler() else {
            return Vec::new();
        };
        let Ok(pc) = self.inspector.program_counter() else {
            return Vec::new();
        };

        match decompiler.decompile(pc, self.config.source_code_lines / 2) {
            Ok(Some(code)) if !code.trim().is_empty() => {
                let mut lines = vec![self.palette.banner("Decompiled pseudocode")];
                lines.extend(code.lines().map(str::to_string));
                lines
            }
            Ok(_) => Vec::new(),
            Err(err) => {
                warn!("decompiler failed at {pc:#x}: {err}");
                Vec::new()
            }
        }
    }

    fn stack(&self) -> Vec<String>
    {
        let mut lines = vec![self.palette.banner("stack")];
        let words = self
            .inspector
            .stack_pointer()
            .and_then(|sp| self.inspector.read_stack_window(sp, self.config.stack_lines));
        match words {
            Ok(mut words) => {
                if self.config.stack_reverse {
                    words.reverse();
                }
                lines.extend(words);
            }
            Err(err) => warn!("stack unavailable: {err}"),
        }
        lines
    }
}
