//! # Context Configuration
//!
//! Every setting that changes what the context view shows or where it goes.
//!
//! Settings are plain fields with defaults. Hosts that expose them by name
//! (a `set context-sections ...` command, a config file loader) go through
//! [`ContextConfig::set`], which validates the value and keeps the previous
//! one when validation fails.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{ContextError, ContextResult};
use crate::router::{Destination, SectionOutput};
use crate::sections::SectionKey;

/// Default section order.
pub const DEFAULT_SECTIONS: &str = "regs disasm code stack backtrace";

/// Configuration of the context view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig
{
    /// Clear the screen before printing the context (`context-clear-screen`)
    pub clear_screen: bool,
    /// Where the main context batch goes (`context-output`)
    pub output: Destination,
    /// Per-section destinations (`context-output-<section>`), indexed by [`SectionKey::index`]
    section_outputs: [SectionOutput; SectionKey::COUNT],
    /// Print stack lines from the highest address down (`context-stack-reverse`)
    pub stack_reverse: bool,
    /// Sections shown when `context` runs without arguments (`context-sections`)
    sections: Vec<SectionKey>,
    /// Append flag registers to the register view (`show-flags`)
    pub show_flags: bool,
    /// Show return-address registers (`show-retaddr-reg`)
    pub show_retaddr_reg: bool,
    /// Disassembly lines (`context-code-lines`)
    pub code_lines: usize,
    /// Source lines (`context-source-code-lines`)
    pub source_code_lines: usize,
    /// Stack lines (`context-stack-lines`)
    pub stack_lines: usize,
    /// Highlight the current source line (`highlight-source`)
    pub highlight_source: bool,
    /// Run source files through the syntax highlighter (`syntax-highlight`)
    pub syntax_highlight: bool,
    /// Emulate instructions while disassembling (`emulate`)
    pub emulate: bool,
    /// Marker in front of the current source line (`code-prefix`)
    pub code_prefix: String,
    /// Marker in front of the selected backtrace frame (`backtrace-prefix`)
    pub backtrace_prefix: String,
    /// Label in front of backtrace frame numbers (`backtrace-frame-label`)
    pub backtrace_frame_label: String,
    /// Marker in front of changed registers (`register-changed-marker`)
    pub register_changed_marker: String,
    /// Emit ANSI colors (`color`)
    pub color: bool,
}

impl Default for ContextConfig
{
    fn default() -> Self
    {
        Self {
            clear_screen: false,
            output: Destination::Primary,
            section_outputs: [
                SectionOutput::NoSplit,
                SectionOutput::NoSplit,
                SectionOutput::NoSplit,
                SectionOutput::NoSplit,
                SectionOutput::NoSplit,
                SectionOutput::NoSplit,
            ],
            stack_reverse: false,
            sections: parse_section_words(DEFAULT_SECTIONS).unwrap_or_default(),
            show_flags: false,
            show_retaddr_reg: false,
            code_lines: 10,
            source_code_lines: 10,
            stack_lines: 8,
            highlight_source: true,
            syntax_highlight: true,
            emulate: true,
            code_prefix: "►".to_string(),
            backtrace_prefix: "►".to_string(),
            backtrace_frame_label: "f ".to_string(),
            register_changed_marker: "*".to_string(),
            color: true,
        }
    }
}

impl ContextConfig
{
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Sections shown by a bare `context` command, in display order.
    pub fn sections(&self) -> &[SectionKey]
    {
        &self.sections
    }

    /// Replace the default section order.
    ///
    /// The value is a whitespace separated list of section names
    /// (`regs disasm args code stack backtrace`). An empty value, `none` or
    /// `empty` hides every section.
    ///
    /// ## Errors
    ///
    /// `Configuration` when a word is not a section name. The previous order
    /// stays in effect.
    pub fn set_sections(&mut self, value: &str) -> ContextResult<()>
    {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("empty") {
            self.sections.clear();
            warn!(
                "Sections set to be empty. FYI valid values are: {}",
                SectionKey::NAMES.join(", ")
            );
            return Ok(());
        }

        match parse_section_words(trimmed) {
            Ok(sections) => {
                self.sections = sections;
                Ok(())
            }
            Err(invalid) => {
                warn!(
                    "Invalid section: {invalid}, valid values: {}",
                    SectionKey::NAMES.join(", ")
                );
                warn!("(setting none of them like '' will make sections not appear)");
                Err(ContextError::configuration(
                    "context-sections",
                    format!("invalid section {invalid}"),
                ))
            }
        }
    }

    /// Where a section's lines go.
    pub fn output_for(&self, key: SectionKey) -> &SectionOutput
    {
        static NO_SPLIT: SectionOutput = SectionOutput::NoSplit;
        key.index().map_or(&NO_SPLIT, |index| &self.section_outputs[index])
    }

    /// Route a section to its own destination (or back to the main batch).
    pub fn set_output_for(&mut self, key: SectionKey, output: SectionOutput)
    {
        if let Some(index) = key.index() {
            self.section_outputs[index] = output;
        }
    }

    /// Apply a setting by name.
    ///
    /// ## Errors
    ///
    /// `Configuration` for an unknown name or a value that does not parse.
    /// Rejected values never modify the configuration.
    pub fn set(&mut self, name: &str, value: &str) -> ContextResult<()>
    {
        debug!(setting = name, value, "updating context setting");

        if let Some(section) = name.strip_prefix("context-output-") {
            let key = SectionKey::from_name(section)
                .ok_or_else(|| ContextError::configuration(name, "unknown section"))?;
            self.set_output_for(key, SectionOutput::parse(value));
            return Ok(());
        }

        match name {
            "context-sections" => self.set_sections(value),
            "context-output" => {
                self.output = Destination::parse(value);
                Ok(())
            }
            "context-clear-screen" => set_parsed(&mut self.clear_screen, name, value, parse_bool),
            "context-stack-reverse" => set_parsed(&mut self.stack_reverse, name, value, parse_bool),
            "show-flags" => set_parsed(&mut self.show_flags, name, value, parse_bool),
            "show-retaddr-reg" => set_parsed(&mut self.show_retaddr_reg, name, value, parse_bool),
            "highlight-source" => set_parsed(&mut self.highlight_source, name, value, parse_bool),
            "syntax-highlight" => set_parsed(&mut self.syntax_highlight, name, value, parse_bool),
            "emulate" => set_parsed(&mut self.emulate, name, value, parse_bool),
            "color" => set_parsed(&mut self.color, name, value, parse_bool),
            "context-code-lines" => set_parsed(&mut self.code_lines, name, value, parse_count),
            "context-source-code-lines" => set_parsed(&mut self.source_code_lines, name, value, parse_count),
            "context-stack-lines" => set_parsed(&mut self.stack_lines, name, value, parse_count),
            "code-prefix" => {
                self.code_prefix = value.to_string();
                Ok(())
            }
            "backtrace-prefix" => {
                self.backtrace_prefix = value.to_string();
                Ok(())
            }
            "backtrace-frame-label" => {
                self.backtrace_frame_label = value.to_string();
                Ok(())
            }
            "register-changed-marker" => {
                self.register_changed_marker = value.to_string();
                Ok(())
            }
            _ => Err(ContextError::configuration(name, "unknown setting")),
        }
    }
}

fn set_parsed<T>(slot: &mut T, name: &str, value: &str, parse: fn(&str) -> Option<T>) -> ContextResult<()>
{
    if let Some(parsed) = parse(value) {
        *slot = parsed;
        Ok(())
    } else {
        warn!("Invalid value {value:?} for {name}, keeping the previous value");
        Err(ContextError::configuration(name, format!("invalid value {value:?}")))
    }
}

fn parse_bool(value: &str) -> Option<bool>
{
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_count(value: &str) -> Option<usize>
{
    usize::from_str(value.trim()).ok()
}

/// Parse full section names; returns the first invalid word on failure.
fn parse_section_words(value: &str) -> Result<Vec<SectionKey>, String>
{
    let mut sections = Vec::new();
    for word in value.split_whitespace() {
        let key = SectionKey::from_name(word).ok_or_else(|| word.to_string())?;
        if !sections.contains(&key) {
            sections.push(key);
        }
    }
    Ok(sections)
}

#[cfg(test)]
mod tests
{
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_default_sections()
    {
        let config = ContextConfig::default();
        assert_eq!(
            config.sections(),
            &[
                SectionKey::Registers,
                SectionKey::Disasm,
                SectionKey::Code,
                SectionKey::Stack,
                SectionKey::Backtrace
            ]
        );
    }

    #[test]
    fn test_invalid_section_keeps_previous_order()
    {
        let mut config = ContextConfig::default();
        config.set_sections("stack regs").unwrap();
        assert!(config.set_sections("stack bogus").is_err());
        assert_eq!(config.sections(), &[SectionKey::Stack, SectionKey::Registers]);
    }

    #[test]
    fn test_empty_sections()
    {
        let mut config = ContextConfig::default();
        config.set_sections("none").unwrap();
        assert!(config.sections().is_empty());
        config.set_sections("args").unwrap();
        config.set_sections("").unwrap();
        assert!(config.sections().is_empty());
    }

    #[test]
    fn test_set_by_name()
    {
        let mut config = ContextConfig::default();
        config.set("context-stack-lines", "12").unwrap();
        config.set("show-flags", "on").unwrap();
        config.set("context-output-disasm", "/dev/pts/3").unwrap();
        config.set("context-output", "stdout").unwrap();

        assert_eq!(config.stack_lines, 12);
        assert!(config.show_flags);
        assert_eq!(
            config.output_for(SectionKey::Disasm),
            &SectionOutput::Split(Destination::Path(PathBuf::from("/dev/pts/3")))
        );
        assert_eq!(config.output, Destination::Primary);
    }

    #[test]
    fn test_rejected_values_do_not_modify()
    {
        let mut config = ContextConfig::default();
        assert!(config.set("context-code-lines", "many").is_err());
        assert!(config.set("emulate", "maybe").is_err());
        assert!(config.set("context-output-nothing", "stdout").is_err());
        assert!(config.set("no-such-setting", "1").is_err());
        assert_eq!(config, ContextConfig::default());
    }
}
