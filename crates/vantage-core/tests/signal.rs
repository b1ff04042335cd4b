//! Tests for the lifecycle message cache

mod support;

use support::MockInspector;
use vantage_core::inspector::RECORD_REPLAY_EXTENSION;
use vantage_core::signal::SignalCache;
use vantage_core::theme::Palette;
use vantage_core::DebuggerEvent;

fn palette() -> Palette
{
    Palette::new(false, 80)
}

#[test]
fn test_drain_does_not_consume()
{
    let inspector = MockInspector::x86_64();
    let mut cache = SignalCache::new();
    cache.record(&DebuggerEvent::signal("SIGINT"), &inspector, &palette());

    assert_eq!(cache.drain(), vec!["Program received signal SIGINT".to_string()]);
    assert_eq!(cache.drain(), cache.drain());
}

#[test]
fn test_segfault_reports_fault_address()
{
    let mut inspector = MockInspector::x86_64();
    inspector.fault = Some(0xdead_beef);
    let mut cache = SignalCache::new();
    cache.record(&DebuggerEvent::signal("SIGSEGV"), &inspector, &palette());

    assert_eq!(
        cache.drain(),
        vec!["Program received signal SIGSEGV (fault address 0xdeadbeef)".to_string()]
    );
}

#[test]
fn test_segfault_under_replay_reports_pc()
{
    let mut inspector = MockInspector::x86_64();
    inspector.fault = Some(0xdead_beef);
    inspector.extensions.push(RECORD_REPLAY_EXTENSION.to_string());
    let mut cache = SignalCache::new();
    cache.record(&DebuggerEvent::signal("SIGSEGV"), &inspector, &palette());

    assert_eq!(
        cache.drain(),
        vec!["Program received signal SIGSEGV (current pc: 0x401136)".to_string()]
    );
}

#[test]
fn test_replay_check_is_reset_with_session()
{
    let mut inspector = MockInspector::x86_64();
    inspector.fault = Some(0x10);
    let mut cache = SignalCache::new();
    cache.record(&DebuggerEvent::signal("SIGSEGV"), &inspector, &palette());

    inspector.extensions.push(RECORD_REPLAY_EXTENSION.to_string());
    cache.record(&DebuggerEvent::signal("SIGSEGV"), &inspector, &palette());
    assert!(cache.drain()[0].ends_with("(fault address 0x10)"));

    cache.reset();
    assert!(cache.drain().is_empty());
    cache.record(&DebuggerEvent::signal("SIGSEGV"), &inspector, &palette());
    assert!(cache.drain()[0].ends_with("(current pc: 0x401136)"));
}

#[test]
fn test_breakpoints_one_line_each()
{
    let inspector = MockInspector::x86_64();
    let mut cache = SignalCache::new();
    cache.record(
        &DebuggerEvent::breakpoints(["1, main () at main.c:4", "2, main () at main.c:4"]),
        &inspector,
        &palette(),
    );
    assert_eq!(
        cache.drain(),
        vec![
            "Breakpoint 1, main () at main.c:4".to_string(),
            "Breakpoint 2, main () at main.c:4".to_string(),
        ]
    );
}

#[test]
fn test_exit_and_continue()
{
    let inspector = MockInspector::x86_64();
    let mut cache = SignalCache::new();

    cache.record(&DebuggerEvent::Exited { code: Some(3) }, &inspector, &palette());
    assert_eq!(cache.drain(), vec!["Exited: 3".to_string()]);

    cache.record(&DebuggerEvent::Continued, &inspector, &palette());
    assert!(cache.drain().is_empty());

    cache.record(&DebuggerEvent::Exited { code: None }, &inspector, &palette());
    assert!(cache.drain().is_empty());
}
