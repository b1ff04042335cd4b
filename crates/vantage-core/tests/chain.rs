//! Tests for pointer chain rendering

mod support;

use support::MockInspector;
use vantage_core::chain::{format_chain, CHAIN_LIMIT};
use vantage_core::theme::Palette;

#[test]
fn test_chain_stops_at_unreadable_memory()
{
    let mut inspector = MockInspector::x86_64();
    inspector.memory.insert(0x2000, 0x3000);
    let chain = format_chain(&inspector, &Palette::new(false, 80), 0x2000);
    assert_eq!(chain, "0x2000 —▸ 0x3000");
}

#[test]
fn test_chain_is_bounded()
{
    let mut inspector = MockInspector::x86_64();
    for hop in 0..20u64 {
        inspector.memory.insert(0x1000 + hop * 8, 0x1000 + (hop + 1) * 8);
    }
    let chain = format_chain(&inspector, &Palette::new(false, 80), 0x1000);
    assert_eq!(chain.matches("—▸").count(), CHAIN_LIMIT);
}

#[test]
fn test_self_reference_ends_chain()
{
    let mut inspector = MockInspector::x86_64();
    inspector.memory.insert(0x2000, 0x2000);
    let chain = format_chain(&inspector, &Palette::new(false, 80), 0x2000);
    assert_eq!(chain, "0x2000 ◂— 0x2000");
}
