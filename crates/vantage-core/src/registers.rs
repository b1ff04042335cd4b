//! # Register View
//!
//! Renders one line per register and marks registers whose value changed
//! since the previous render.
//!
//! The tracker keeps the last full snapshot for the whole debugger session.
//! Every render takes a fresh snapshot of all known registers, diffs it against
//! the stored one, and then stores it, so the diff always compares against the
//! immediately preceding render.

use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::chain::format_chain;
use crate::config::ContextConfig;
use crate::inspector::Inspector;
use crate::theme::Palette;
use crate::types::{FlagRegister, RegisterLayout, RegisterSnapshot};

/// Register names selected for one render.
pub type RegisterSelection = SmallVec<[String; 32]>;

/// Session-scoped register change tracker
#[derive(Debug, Default)]
pub struct RegisterTracker
{
    previous: RegisterSnapshot,
}

impl RegisterTracker
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Forget the previous snapshot (new debugging session).
    pub fn reset(&mut self)
    {
        self.previous = RegisterSnapshot::new();
    }

    /// Snapshot taken by the most recent render.
    pub fn previous(&self) -> &RegisterSnapshot
    {
        &self.previous
    }

    /// Registers shown when no explicit list is given.
    ///
    /// - `show-retaddr-reg` on: general, frame, stack, return-address, pc
    /// - `show-retaddr-reg` off: general, frame, stack, pc
    pub fn default_selection(layout: &RegisterLayout, show_retaddr_reg: bool) -> RegisterSelection
    {
        let mut names: RegisterSelection = layout.general.iter().cloned().collect();
        names.extend(layout.frame.iter().cloned());
        names.push(layout.stack.clone());
        if show_retaddr_reg {
            names.extend(layout.return_address.iter().cloned());
        }
        names.push(layout.pc.clone());
        names
    }

    /// Render the register lines.
    ///
    /// `selected` overrides the default selection when non-empty. Flag
    /// registers are appended whenever `show-flags` is on. Unknown or
    /// unreadable registers are skipped with a warning.
    pub fn render(
        &mut self,
        inspector: &dyn Inspector,
        config: &ContextConfig,
        palette: &Palette,
        selected: Option<&[String]>,
    ) -> Vec<String>
    {
        let layout = inspector.register_layout();
        let flag_registers = inspector.flag_registers();
        let mut names: RegisterSelection = match selected {
            Some(list) if !list.is_empty() => list.iter().cloned().collect(),
            _ => Self::default_selection(&layout, config.show_retaddr_reg),
        };
        if config.show_flags {
            names.extend(flag_registers.iter().map(|flags| flags.name.clone()));
        }

        let known: HashSet<String> = inspector.known_registers().into_iter().collect();
        let snapshot = take_snapshot(inspector, &known);
        let changed = snapshot.changed_since(&self.previous);
        trace!(registers = snapshot.len(), changed = changed.len(), "register snapshot taken");

        let marker_width = config.register_changed_marker.chars().count();
        let mut lines = Vec::with_capacity(names.len());
        for name in &names {
            if !known.contains(name) {
                warn!("Unknown register: {name:?}");
                continue;
            }
            let Some(value) = snapshot.get(name) else {
                warn!("Register {name} could not be read");
                continue;
            };

            let marker = if changed.contains(name) {
                palette.register_changed(&config.register_changed_marker)
            } else {
                " ".repeat(marker_width)
            };
            let label = palette.register(&format!("{:<4}", name.to_uppercase()));

            let description = match flag_registers.iter().find(|flags| flags.name == *name) {
                Some(flags) => format_flags(palette, value, flags, self.previous.get(name)),
                None => format_chain(inspector, palette, value),
            };

            lines.push(format!("{marker}{label} {description}"));
        }

        self.previous = snapshot;
        lines
    }
}

fn take_snapshot(inspector: &dyn Inspector, known: &HashSet<String>) -> RegisterSnapshot
{
    known
        .iter()
        .filter_map(|name| match inspector.register_value(name) {
            Ok(value) => Some((name.clone(), value)),
            Err(err) => {
                trace!("skipping {name} in snapshot: {err}");
                None
            }
        })
        .collect()
}

/// Bit breakdown of a flags register: `0x246 [ cf PF af ZF sf IF df of ]`.
///
/// Set bits are upper-cased, clear bits lower-cased. With a previous value,
/// bits that flipped are additionally highlighted.
pub fn format_flags(palette: &Palette, value: u64, flags: &FlagRegister, last: Option<u64>) -> String
{
    let description = palette.flag_value(&format!("{value:#x}"));
    if flags.bits.is_empty() {
        return description;
    }

    let names: Vec<String> = flags
        .bits
        .iter()
        .map(|flag| {
            let mask = 1u64 << flag.bit;
            let name = if value & mask == 0 {
                palette.flag_unset(&flag.name.to_lowercase())
            } else {
                palette.flag_set(&flag.name.to_uppercase())
            };
            match last {
                Some(last) if last & mask != value & mask => palette.flag_changed(&name),
                _ => name,
            }
        })
        .collect();

    format!("{description} [ {} ]", names.join(" "))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_default_selection_without_retaddr()
    {
        let names = RegisterTracker::default_selection(&RegisterLayout::arm64(), false);
        assert_eq!(names.len(), 29 + 3);
        assert_eq!(names[29], "x29");
        assert_eq!(names[30], "sp");
        assert_eq!(names[31], "pc");
    }

    #[test]
    fn test_default_selection_with_retaddr()
    {
        let names = RegisterTracker::default_selection(&RegisterLayout::arm64(), true);
        assert_eq!(&names[29..], &["x29", "sp", "x30", "pc"]);
    }

    #[test]
    fn test_selection_spills_past_inline_capacity()
    {
        let mut layout = RegisterLayout::arm64();
        layout.general.extend((0..8).map(|index| format!("v{index}")));
        let names = RegisterTracker::default_selection(&layout, true);
        assert_eq!(names.len(), 29 + 8 + 4);
        assert!(names.spilled());
        assert_eq!(names.last().map(String::as_str), Some("pc"));
    }

    #[test]
    fn test_format_flags()
    {
        let palette = Palette::new(false, 80);
        let layout = RegisterLayout::x86_64();
        let eflags = &layout.flags[0];
        assert_eq!(
            format_flags(&palette, 0x246, eflags, None),
            "0x246 [ cf PF af ZF sf IF df of ]"
        );
    }

    #[test]
    fn test_format_flags_without_bits()
    {
        let palette = Palette::new(false, 80);
        let flags = FlagRegister::new("flags", &[]);
        assert_eq!(format_flags(&palette, 0x10, &flags, Some(0)), "0x10");
    }
}
