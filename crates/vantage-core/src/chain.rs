//! Pointer chains for register values.
//!
//! A register holding an address is followed through memory a few hops so the
//! register view shows what it points at: `0x7ffc10 —▸ 0x401136 (main)`.

use crate::inspector::Inspector;
use crate::symbols::symbol_at;
use crate::theme::Palette;
use crate::types::Address;

/// Maximum number of dereferences shown after the value itself.
pub const CHAIN_LIMIT: usize = 5;

const ARROW: &str = " —▸ ";
const BACK_ARROW: &str = " ◂— ";

/// Format `value` followed by the chain of words it points to.
///
/// The walk stops at the first unreadable address. An address that was
/// already visited ends the chain with a back-reference instead of looping.
pub fn format_chain(inspector: &dyn Inspector, palette: &Palette, value: u64) -> String
{
    let mut visited = vec![value];
    let mut rendered = describe(inspector, palette, value);
    let mut current = value;

    for _ in 0..CHAIN_LIMIT {
        let Ok(next) = inspector.read_pointer(Address::from(current)) else {
            break;
        };
        if visited.contains(&next) {
            rendered.push_str(BACK_ARROW);
            rendered.push_str(&palette.pointer(&format!("{next:#x}")));
            break;
        }
        rendered.push_str(ARROW);
        rendered.push_str(&describe(inspector, palette, next));
        visited.push(next);
        current = next;
    }

    rendered
}

fn describe(inspector: &dyn Inspector, palette: &Palette, value: u64) -> String
{
    let text = palette.pointer(&format!("{value:#x}"));
    match symbol_at(inspector, Address::from(value)) {
        Some(symbol) => format!("{text} ({})", palette.symbol(&symbol)),
        None => text,
    }
}
