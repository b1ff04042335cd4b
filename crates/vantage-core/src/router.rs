//! # Output Router
//!
//! Writes assembled context batches to their destinations.
//!
//! A destination is either the primary stream (standard output unless the host
//! injects another writer) or a path. Paths are usually a terminal device such
//! as `/dev/pts/4` so a section can live in its own split pane, but any file
//! works.
//!
//! ## Delivery
//!
//! A batch is rendered to memory first and then written with a single
//! `write_all`, followed by a flush. Path destinations are opened in truncate
//! mode for the duration of one batch and closed when the handle drops, which
//! also happens on the error path.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tracing::trace;

use crate::error::{ContextError, ContextResult};

/// Where a batch of context lines is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination
{
    /// The primary stream (standard output by default).
    Primary,
    /// A file or terminal device, opened per batch.
    Path(PathBuf),
}

impl Destination
{
    /// Parse a destination setting.
    ///
    /// `""`, `stdout` and `primary` select the primary stream; anything else
    /// is taken as a path.
    pub fn parse(value: &str) -> Self
    {
        match value.trim() {
            "" | "stdout" | "primary" => Self::Primary,
            path => Self::Path(PathBuf::from(path)),
        }
    }

    /// Whether this destination names the given terminal device.
    pub fn is_terminal(&self, terminal: &Path) -> bool
    {
        matches!(self, Self::Path(path) if path == terminal)
    }
}

impl fmt::Display for Destination
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Primary => write!(f, "stdout"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Per-section output setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutput
{
    /// Merge into the main context batch.
    NoSplit,
    /// Write to a destination of its own.
    Split(Destination),
}

impl SectionOutput
{
    /// Parse a per-section setting; `nosplit` keeps the section in the main batch.
    pub fn parse(value: &str) -> Self
    {
        if value.trim() == "nosplit" {
            Self::NoSplit
        } else {
            Self::Split(Destination::parse(value))
        }
    }
}

/// Reports which terminal device standard output is attached to.
pub trait TerminalLocator
{
    /// Device path of the terminal on file descriptor 1, if it is one.
    fn stdout_terminal(&self) -> Option<PathBuf>;
}

/// [`TerminalLocator`] asking the OS through `ttyname_r`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutTerminal;

impl TerminalLocator for StdoutTerminal
{
    fn stdout_terminal(&self) -> Option<PathBuf>
    {
        terminal_name(1)
    }
}

#[cfg(unix)]
#[allow(unsafe_code)] // ttyname_r has no safe wrapper in std
fn terminal_name(fd: libc::c_int) -> Option<PathBuf>
{
    use std::ffi::CStr;

    let mut buffer = [0 as libc::c_char; 256];
    // SAFETY: the buffer is valid for its full length and ttyname_r
    // NUL-terminates it whenever it returns 0.
    let status = unsafe { libc::ttyname_r(fd, buffer.as_mut_ptr(), buffer.len()) };
    if status != 0 {
        return None;
    }
    // SAFETY: see above, the buffer holds a NUL-terminated string.
    let name = unsafe { CStr::from_ptr(buffer.as_ptr()) };
    Some(PathBuf::from(name.to_string_lossy().into_owned()))
}

#[cfg(not(unix))]
fn terminal_name(_fd: i32) -> Option<PathBuf>
{
    None
}

/// Writes line batches to destinations.
pub struct OutputRouter
{
    primary: Box<dyn Write>,
    terminal: Box<dyn TerminalLocator>,
}

impl Default for OutputRouter
{
    fn default() -> Self
    {
        Self::stdout()
    }
}

impl OutputRouter
{
    /// Router whose primary stream is the process's standard output.
    #[must_use]
    pub fn stdout() -> Self
    {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Router writing primary batches to `primary`.
    #[must_use]
    pub fn with_writer(primary: Box<dyn Write>) -> Self
    {
        Self {
            primary,
            terminal: Box::new(StdoutTerminal),
        }
    }

    /// Replace the terminal lookup used for split de-duplication.
    #[must_use]
    pub fn with_terminal(mut self, terminal: Box<dyn TerminalLocator>) -> Self
    {
        self.terminal = terminal;
        self
    }

    /// Terminal currently attached to standard output.
    pub fn stdout_terminal(&self) -> Option<PathBuf>
    {
        self.terminal.stdout_terminal()
    }

    /// Write one batch to a destination.
    ///
    /// `clear_screen` only applies to the primary stream.
    ///
    /// ## Errors
    ///
    /// - `Delivery`: a path destination could not be opened or written
    /// - `Io`: the primary stream rejected the write
    pub fn deliver(&mut self, destination: &Destination, lines: &[String], clear_screen: bool) -> ContextResult<()>
    {
        let clear = clear_screen && *destination == Destination::Primary;
        let batch = render_batch(lines, clear)?;
        trace!(%destination, lines = lines.len(), bytes = batch.len(), "delivering context batch");

        match destination {
            Destination::Primary => {
                if batch.is_empty() {
                    return Ok(());
                }
                self.primary.write_all(&batch)?;
                self.primary.flush()?;
                Ok(())
            }
            Destination::Path(path) => write_path(path, &batch).map_err(|source| ContextError::Delivery {
                destination: path.clone(),
                source,
            }),
        }
    }
}

fn render_batch(lines: &[String], clear: bool) -> io::Result<Vec<u8>>
{
    let mut batch = Vec::new();
    if clear {
        queue!(batch, MoveTo(0, 0), Clear(ClearType::FromCursorDown))?;
    }
    for line in lines {
        batch.extend_from_slice(line.as_bytes());
        batch.push(b'\n');
    }
    Ok(batch)
}

fn write_path(path: &Path, batch: &[u8]) -> io::Result<()>
{
    let mut file = File::create(path)?;
    file.write_all(batch)?;
    file.flush()
}
