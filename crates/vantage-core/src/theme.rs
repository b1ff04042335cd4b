//! Colors and fixed decorations of the context view.
//!
//! Styling goes through `crossterm`'s [`Stylize`] so the escape sequences match
//! whatever the rest of a crossterm based frontend emits. A palette with color
//! disabled returns its input unchanged, which keeps file destinations and
//! tests free of escape codes.

use crossterm::style::{StyledContent, Stylize};

/// Fallback banner width when the terminal size cannot be queried.
pub const DEFAULT_WIDTH: usize = 80;

const SEPARATOR: &str = "─";

/// Styling rules for context lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette
{
    color: bool,
    width: usize,
}

impl Palette
{
    /// Palette with an explicit banner width.
    pub fn new(color: bool, width: usize) -> Self
    {
        Self { color, width }
    }

    /// Palette sized to the current terminal.
    pub fn detect(color: bool) -> Self
    {
        let width = crossterm::terminal::size().map_or(DEFAULT_WIDTH, |(columns, _)| usize::from(columns));
        Self::new(color, width.max(1))
    }

    fn paint<'a>(&self, text: &'a str, style: impl FnOnce(StyledContent<&'a str>) -> StyledContent<&'a str>) -> String
    {
        if self.color {
            style(text.stylize()).to_string()
        } else {
            text.to_string()
        }
    }

    /// Full-width section banner, e.g. `────[ STACK ]────`.
    ///
    /// An empty title yields a plain separator line.
    pub fn banner(&self, title: &str) -> String
    {
        let title = title.to_uppercase();
        if title.is_empty() {
            return self.paint(&SEPARATOR.repeat(self.width), Stylize::blue);
        }

        let label = format!("[ {title} ]");
        let fill = self.width.saturating_sub(label.chars().count());
        let left = SEPARATOR.repeat(fill / 2);
        let right = SEPARATOR.repeat(fill - fill / 2);
        format!(
            "{}{}{}",
            self.paint(&left, Stylize::blue),
            self.paint(&label, Stylize::bold),
            self.paint(&right, Stylize::blue)
        )
    }

    /// Memory-kind legend printed above the main batch.
    pub fn legend(&self) -> String
    {
        format!(
            "LEGEND: {} | {} | {} | {} | {} | {}",
            self.paint("STACK", Stylize::yellow),
            self.paint("HEAP", Stylize::blue),
            self.paint("CODE", Stylize::red),
            self.paint("DATA", Stylize::magenta),
            self.paint("RWX", Stylize::underlined),
            "RODATA"
        )
    }

    pub fn register(&self, name: &str) -> String
    {
        self.paint(name, Stylize::bold)
    }

    pub fn register_changed(&self, marker: &str) -> String
    {
        self.paint(marker, Stylize::red)
    }

    pub fn flag_value(&self, value: &str) -> String
    {
        self.paint(value, Stylize::white)
    }

    pub fn flag_set(&self, name: &str) -> String
    {
        self.paint(name, |styled| styled.green().bold())
    }

    pub fn flag_unset(&self, name: &str) -> String
    {
        self.paint(name, Stylize::dark_grey)
    }

    /// Flags whose bit differs from the previous value.
    ///
    /// `name` may already carry set/unset styling; underlining wraps it.
    pub fn flag_changed(&self, name: &str) -> String
    {
        self.paint(name, Stylize::underlined)
    }

    pub fn pointer(&self, value: &str) -> String
    {
        self.paint(value, Stylize::cyan)
    }

    pub fn symbol(&self, name: &str) -> String
    {
        self.paint(name, Stylize::yellow)
    }

    pub fn code_prefix(&self, prefix: &str) -> String
    {
        self.paint(prefix, |styled| styled.green().bold())
    }

    pub fn highlight(&self, line: &str) -> String
    {
        self.paint(line, |styled| styled.yellow().bold())
    }

    pub fn backtrace_prefix(&self, prefix: &str) -> String
    {
        self.paint(prefix, |styled| styled.green().bold())
    }

    pub fn frame_label(&self, label: &str) -> String
    {
        self.paint(label, Stylize::dark_grey)
    }

    pub fn frame_address(&self, address: &str) -> String
    {
        self.paint(address, Stylize::cyan)
    }

    pub fn exit_message(&self, text: &str) -> String
    {
        self.paint(text, Stylize::red)
    }

    pub fn signal_message(&self, text: &str) -> String
    {
        self.paint(text, |styled| styled.red().bold())
    }

    pub fn breakpoint_message(&self, text: &str) -> String
    {
        self.paint(text, Stylize::yellow)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_banner_centers_title()
    {
        let palette = Palette::new(false, 20);
        let banner = palette.banner("stack");
        assert_eq!(banner.chars().count(), 20);
        assert_eq!(banner, "─────[ STACK ]──────");
    }

    #[test]
    fn test_blank_banner_is_separator()
    {
        let palette = Palette::new(false, 5);
        assert_eq!(palette.banner(""), "─────");
    }

    #[test]
    fn test_plain_palette_does_not_escape()
    {
        let palette = Palette::new(false, 80);
        assert_eq!(palette.register("RAX"), "RAX");
        assert_eq!(palette.legend(), "LEGEND: STACK | HEAP | CODE | DATA | RWX | RODATA");
    }

    #[test]
    fn test_colored_palette_escapes()
    {
        let palette = Palette::new(true, 80);
        assert!(palette.register("RAX").contains('\u{1b}'));
    }
}
