//! # Backtrace Walker
//!
//! Renders a bounded window of the live frame chain around the selected frame.
//!
//! The walker first finds the window edges: up to `frame_count` callers of the
//! selected frame (the oldest frame shown) and up to `frame_count` callees (the
//! newest frame shown). It then walks from the newest frame towards the oldest
//! one, emitting a line per frame.
//!
//! The second walk is bounded by the number of steps taken while finding the
//! edges, so a cyclic or corrupted chain cannot keep it running. Any backend
//! failure ends a walk early and keeps the frames gathered so far.

use tracing::debug;

use crate::config::ContextConfig;
use crate::inspector::Inspector;
use crate::symbols::symbol_at;
use crate::theme::Palette;
use crate::types::FrameId;

/// Frames walked in each direction by the backtrace section.
pub const DEFAULT_FRAME_COUNT: usize = 10;

/// Render the backtrace lines.
pub fn render(
    inspector: &dyn Inspector,
    config: &ContextConfig,
    palette: &Palette,
    frame_count: usize,
    with_banner: bool,
) -> Vec<String>
{
    let mut lines = Vec::new();
    if with_banner {
        lines.push(palette.banner("backtrace"));
    }

    let selected = match inspector.selected_frame() {
        Ok(frame) => frame,
        Err(err) => {
            debug!("no selected frame for backtrace: {err}");
            return lines;
        }
    };

    let (oldest, older_steps) = walk_edge(selected, frame_count, |frame| inspector.older_frame(frame));
    let (newest, newer_steps) = walk_edge(selected, frame_count, |frame| inspector.newer_frame(frame));

    let mut frame = newest;
    for index in 0..=(older_steps + newer_steps) {
        let pc = match inspector.frame_pc(frame) {
            Ok(pc) => pc,
            Err(err) => {
                debug!("backtrace stopped at frame {index}: {err}");
                break;
            }
        };

        let marker = if frame == selected {
            config.backtrace_prefix.clone()
        } else {
            " ".repeat(config.backtrace_prefix.chars().count())
        };
        let label = palette.frame_label(&format!("{}{index}", config.backtrace_frame_label));
        let mut address = palette.frame_address(&pc.padded());
        if let Some(symbol) = symbol_at(inspector, pc) {
            address.push(' ');
            address.push_str(&palette.symbol(&symbol));
        }
        lines.push(format!(" {} {label} {address}", palette.backtrace_prefix(&marker)));

        if frame == oldest {
            break;
        }
        match inspector.older_frame(frame) {
            Ok(Some(next)) => frame = next,
            Ok(None) => break,
            Err(err) => {
                debug!("backtrace stopped at frame {index}: {err}");
                break;
            }
        }
    }

    lines
}

/// Follow `step` up to `limit` times; returns the last frame reached and the
/// number of successful steps.
fn walk_edge<F>(start: FrameId, limit: usize, step: F) -> (FrameId, usize)
where
    F: Fn(FrameId) -> crate::error::ContextResult<Option<FrameId>>,
{
    let mut edge = start;
    let mut steps = 0;
    while steps < limit {
        match step(edge) {
            Ok(Some(next)) => {
                edge = next;
                steps += 1;
            }
            Ok(None) => break,
            Err(err) => {
                debug!("frame walk stopped after {steps} steps: {err}");
                break;
            }
        }
    }
    (edge, steps)
}
