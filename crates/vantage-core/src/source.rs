//! # Source Cache
//!
//! Resolves the source window around the current program counter.
//!
//! Files are read and highlighted once per debugging session and kept in
//! memory by path; later refreshes only slice the cached lines. The cache is
//! dropped when a new session starts so edited sources are picked up after a
//! restart.
//!
//! ## Window arithmetic
//!
//! For `n = context-source-code-lines` and a one-based current line `l`, the
//! window covers the zero-based range `max(l-1-n/2, 0) .. min(l-1+n/2+1, len)`.
//! With `n = 10` and `l = 50` that is lines 45 to 55: five before, the current
//! line, five after.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ContextConfig;
use crate::error::{ContextError, ContextResult};
use crate::inspector::Inspector;
use crate::theme::Palette;

/// Syntax highlighter applied to whole source files.
pub trait Highlighter
{
    /// Return `source` with highlighting escapes inserted.
    ///
    /// The line structure must be preserved.
    fn highlight(&self, source: &str, path: &Path) -> String;
}

/// [`Highlighter`] that leaves the text untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter
{
    fn highlight(&self, source: &str, _path: &Path) -> String
    {
        source.to_string()
    }
}

/// A formatted slice of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWindow
{
    /// Full path of the file the window was cut from.
    pub filename: String,
    /// Formatted, numbered lines.
    pub lines: Vec<String>,
}

/// Per-session cache of highlighted source files
pub struct SourceCache
{
    files: HashMap<PathBuf, Arc<[String]>>,
    highlighter: Box<dyn Highlighter>,
}

impl Default for SourceCache
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl std::fmt::Debug for SourceCache
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("SourceCache").field("files", &self.files.len()).finish()
    }
}

impl SourceCache
{
    /// Cache without syntax highlighting.
    #[must_use]
    pub fn new() -> Self
    {
        Self::with_highlighter(Box::new(PlainHighlighter))
    }

    /// Cache using `highlighter` when `syntax-highlight` is on.
    #[must_use]
    pub fn with_highlighter(highlighter: Box<dyn Highlighter>) -> Self
    {
        Self {
            files: HashMap::new(),
            highlighter,
        }
    }

    /// Drop every cached file.
    pub fn reset(&mut self)
    {
        self.files.clear();
    }

    /// Number of cached files.
    pub fn len(&self) -> usize
    {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.files.is_empty()
    }

    /// Highlighted, right-trimmed lines of a file.
    ///
    /// The first call for a path reads and highlights the file; later calls
    /// return the cached lines regardless of `highlight`.
    ///
    /// ## Errors
    ///
    /// `Io` when the file cannot be read. Failed reads are not cached.
    pub fn lines(&mut self, path: &Path, highlight: bool) -> ContextResult<Arc<[String]>>
    {
        if let Some(lines) = self.files.get(path) {
            return Ok(lines.clone());
        }

        let bytes = fs::read(path)?;
        let mut source = String::from_utf8_lossy(&bytes).into_owned();
        if highlight {
            source = self.highlighter.highlight(&source, path);
        }
        let lines: Arc<[String]> = source.lines().map(|line| line.trim_end().to_string()).collect();
        debug!(path = %path.display(), lines = lines.len(), "cached source file");

        self.files.insert(path.to_path_buf(), lines.clone());
        Ok(lines)
    }

    /// Source window around the selected frame's line.
    ///
    /// Returns `None` when the frame has no line information, the file cannot
    /// be read, or the file is empty.
    pub fn resolve_current(
        &mut self,
        inspector: &dyn Inspector,
        config: &ContextConfig,
        palette: &Palette,
    ) -> Option<SourceWindow>
    {
        let frame = inspector.selected_frame().ok()?;
        let location = inspector.source_location(frame)?;

        let source = match self.lines(Path::new(&location.file), config.syntax_highlight) {
            Ok(source) => source,
            Err(err) => {
                warn!("{}", ContextError::SourceUnavailable(format!("{}: {err}", location.file)));
                return None;
            }
        };
        if source.is_empty() {
            return None;
        }

        let lines = format_window(&source, location.line, config, palette);
        Some(SourceWindow {
            filename: location.file,
            lines,
        })
    }
}

/// Zero-based `start..end` range of the window around `closest_line`.
pub fn window_bounds(closest_line: usize, total: usize, lines: usize) -> (usize, usize)
{
    let current = closest_line.saturating_sub(1);
    let start = current.saturating_sub(lines / 2);
    let end = (current + lines / 2 + 1).min(total);
    (start.min(end), end)
}

fn format_window(source: &[String], closest_line: usize, config: &ContextConfig, palette: &Palette) -> Vec<String>
{
    let (start, end) = window_bounds(closest_line, source.len(), config.source_code_lines);
    let number_width = end.to_string().len();
    let prefix_width = config.code_prefix.chars().count();

    source[start..end]
        .iter()
        .enumerate()
        .map(|(offset, code)| {
            let number = start + offset + 1;
            let current = number == closest_line;
            let prefix = if current {
                palette.code_prefix(&config.code_prefix)
            } else {
                " ".repeat(prefix_width)
            };
            let line = format!(" {prefix} {number:>number_width$} {code}");
            if current && config.highlight_source {
                palette.highlight(&line)
            } else {
                line
            }
        })
        .collect()
}

#[cfg(test)]
mod tests
{
    use std::io::Write;

    use super::*;

    #[test]
    fn test_window_is_centered()
    {
        assert_eq!(window_bounds(50, 200, 10), (44, 55));
    }

    #[test]
    fn test_window_clamps_at_edges()
    {
        assert_eq!(window_bounds(1, 200, 10), (0, 6));
        assert_eq!(window_bounds(200, 200, 10), (194, 200));
        assert_eq!(window_bounds(3, 4, 10), (0, 4));
    }

    #[test]
    fn test_lines_are_cached_per_path()
    {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fn main() {{   ").unwrap();
        writeln!(file, "}}").unwrap();

        let mut cache = SourceCache::new();
        let first = cache.lines(file.path(), false).unwrap();
        assert_eq!(&*first, &["fn main() {".to_string(), "}".to_string()]);

        std::fs::write(file.path(), "changed\n").unwrap();
        let second = cache.lines(file.path(), false).unwrap();
        assert_eq!(first, second);

        cache.reset();
        let third = cache.lines(file.path(), false).unwrap();
        assert_eq!(&*third, &["changed".to_string()]);
    }

    #[test]
    fn test_missing_file_is_not_cached()
    {
        let mut cache = SourceCache::new();
        assert!(cache.lines(Path::new("/nonexistent/vantage/source.rs"), false).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_highlighter_applied_once()
    {
        struct Upper;
        impl Highlighter for Upper
        {
            fn highlight(&self, source: &str, _path: &Path) -> String
            {
                source.to_uppercase()
            }
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "let x = 1;").unwrap();

        let mut cache = SourceCache::with_highlighter(Box::new(Upper));
        let lines = cache.lines(file.path(), true).unwrap();
        assert_eq!(&*lines, &["LET X = 1;".to_string()]);
    }

    #[test]
    fn test_format_window_marks_current_line()
    {
        let source: Vec<String> = (1..=20).map(|n| format!("line {n}")).collect();
        let mut config = ContextConfig::default();
        config.source_code_lines = 4;
        let palette = Palette::new(false, 80);

        let lines = format_window(&source, 10, &config, &palette);
        assert_eq!(
            lines,
            vec![
                "    8 line 8".to_string(),
                "    9 line 9".to_string(),
                " ► 10 line 10".to_string(),
                "   11 line 11".to_string(),
                "   12 line 12".to_string(),
            ]
        );
    }
}
