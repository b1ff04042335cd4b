//! # Context Session
//!
//! Assembles the context view and hands it to the output router.
//!
//! A [`ContextSession`] owns every piece of state that must survive between
//! refreshes: the register snapshot, the source cache and the last lifecycle
//! message. The host creates one per debugging session, feeds it lifecycle
//! events, and calls [`ContextSession::refresh`] whenever the target stops.
//!
//! ## Assembly
//!
//! 1. The requested tokens (or the configured default order) are reduced to
//!    section keys; unknown keys are dropped with a warning.
//! 2. Sections configured with their own destination are rendered first and
//!    collected into one batch per destination.
//! 3. The remaining sections are rendered, in order, into the main batch,
//!    headed by the legend line.
//! 4. A split batch aimed at the terminal standard output is attached to is
//!    folded into the main batch so it is not printed twice.
//! 5. The main batch gets a closing banner (when non-empty) and the pending
//!    lifecycle message.
//! 6. The main batch goes to `context-output`, every split batch to its own
//!    destination. A failing destination does not stop the others.

use tracing::{debug, warn};

use crate::config::ContextConfig;
use crate::error::ContextError;
use crate::events::{event_channel, DebuggerEvent, DebuggerEventReceiver, DebuggerEventSender};
use crate::inspector::Inspector;
use crate::registers::RegisterTracker;
use crate::router::{Destination, OutputRouter, SectionOutput};
use crate::sections::{SectionKey, SectionRenderer};
use crate::signal::SignalCache;
use crate::source::{Highlighter, SourceCache};
use crate::theme::Palette;

/// Result of delivering one refresh.
#[derive(Debug, Default)]
pub struct RefreshReport
{
    /// Destinations written successfully, in delivery order.
    pub delivered: Vec<Destination>,
    /// Destinations that failed, with the reason.
    pub failures: Vec<(Destination, ContextError)>,
}

impl RefreshReport
{
    /// Whether every destination was written.
    pub fn is_complete(&self) -> bool
    {
        self.failures.is_empty()
    }
}

/// Session-scoped context engine state
pub struct ContextSession
{
    config: ContextConfig,
    registers: RegisterTracker,
    sources: SourceCache,
    signals: SignalCache,
    router: OutputRouter,
    events: Option<DebuggerEventReceiver>,
    banner_width: Option<usize>,
}

impl ContextSession
{
    /// Session printing to standard output.
    #[must_use]
    pub fn new(config: ContextConfig) -> Self
    {
        Self::with_router(config, OutputRouter::stdout())
    }

    /// Session delivering through `router`.
    #[must_use]
    pub fn with_router(config: ContextConfig, router: OutputRouter) -> Self
    {
        Self {
            config,
            registers: RegisterTracker::new(),
            sources: SourceCache::new(),
            signals: SignalCache::new(),
            router,
            events: None,
            banner_width: None,
        }
    }

    /// Use `highlighter` for source files.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self
    {
        self.sources = SourceCache::with_highlighter(highlighter);
        self
    }

    /// Fix the banner width instead of querying the terminal.
    #[must_use]
    pub fn with_banner_width(mut self, width: usize) -> Self
    {
        self.banner_width = Some(width.max(1));
        self
    }

    pub fn config(&self) -> &ContextConfig
    {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ContextConfig
    {
        &mut self.config
    }

    pub fn registers(&self) -> &RegisterTracker
    {
        &self.registers
    }

    pub fn sources(&self) -> &SourceCache
    {
        &self.sources
    }

    pub fn signals(&self) -> &SignalCache
    {
        &self.signals
    }

    /// Open an event channel for hosts that report events from another thread.
    ///
    /// Queued events are applied in arrival order, at the next refresh or
    /// before the next direct [`ContextSession::on_event`], so the last one
    /// wins. Calling this again replaces the previous channel.
    pub fn subscribe(&mut self) -> DebuggerEventSender
    {
        let (sender, receiver) = event_channel();
        self.events = Some(receiver);
        sender
    }

    /// A new debugging session starts: drop all carried-over state.
    pub fn start(&mut self)
    {
        debug!("context session started");
        self.reset();
    }

    /// The debugging session ended.
    pub fn end(&mut self)
    {
        debug!("context session ended");
        self.reset();
    }

    fn reset(&mut self)
    {
        self.registers.reset();
        self.sources.reset();
        self.signals.reset();
    }

    fn palette(&self) -> Palette
    {
        match self.banner_width {
            Some(width) => Palette::new(self.config.color, width),
            None => Palette::detect(self.config.color),
        }
    }

    /// Lifecycle callback: continue, stop or exit.
    ///
    /// Events still queued on the channel arrived earlier and are applied
    /// first.
    pub fn on_event(&mut self, event: &DebuggerEvent, inspector: &dyn Inspector)
    {
        self.poll_events(inspector);
        let palette = self.palette();
        self.signals.record(event, inspector, &palette);
    }

    fn poll_events(&mut self, inspector: &dyn Inspector)
    {
        let Some(receiver) = &self.events else {
            return;
        };
        let pending: Vec<DebuggerEvent> = receiver.try_iter().collect();
        if pending.is_empty() {
            return;
        }
        let palette = self.palette();
        for event in &pending {
            self.signals.record(event, inspector, &palette);
        }
    }

    /// Render only the register lines.
    ///
    /// `selected` overrides the default register set when non-empty.
    pub fn render_registers(&mut self, inspector: &dyn Inspector, selected: Option<&[String]>) -> Vec<String>
    {
        let palette = self.palette();
        self.registers.render(inspector, &self.config, &palette, selected)
    }

    /// Write lines to the primary stream, bypassing `context-output`.
    pub fn write_primary(&mut self, lines: &[String]) -> RefreshReport
    {
        let mut report = RefreshReport::default();
        deliver(&mut self.router, &Destination::Primary, lines, false, &mut report);
        report
    }

    /// Rebuild the context view and deliver it.
    ///
    /// `requested` holds section tokens (`regs`, `s`, ...); `None` or an empty
    /// list selects the configured default order.
    pub fn refresh(&mut self, inspector: &dyn Inspector, requested: Option<&[String]>) -> RefreshReport
    {
        self.poll_events(inspector);
        let palette = self.palette();
        let keys = self.requested_keys(requested);

        let mut renderer = SectionRenderer {
            inspector,
            config: &self.config,
            palette: &palette,
            registers: &mut self.registers,
            sources: &mut self.sources,
        };

        let mut split: Vec<(Destination, Vec<String>)> = Vec::new();
        let mut main_keys = Vec::new();
        for key in keys {
            match self.config.output_for(key) {
                SectionOutput::NoSplit => main_keys.push(key),
                SectionOutput::Split(destination) => {
                    let lines = renderer.render(key);
                    batch_for(&mut split, destination).extend(lines);
                }
            }
        }

        let mut main = if main_keys.is_empty() {
            Vec::new()
        } else {
            vec![palette.legend()]
        };
        for key in main_keys {
            main.extend(renderer.render(key));
        }

        if let Some(terminal) = self.router.stdout_terminal() {
            if let Some(position) = split.iter().position(|(destination, _)| destination.is_terminal(&terminal)) {
                let (_, lines) = split.remove(position);
                debug!(terminal = %terminal.display(), "split output targets stdout terminal, merging");
                main.extend(lines);
            }
        }

        if !main.is_empty() {
            main.push(palette.banner(""));
        }
        main.extend(self.signals.drain());

        let mut report = RefreshReport::default();
        let clear_screen = self.config.clear_screen;
        deliver(&mut self.router, &self.config.output, &main, clear_screen, &mut report);
        for (destination, lines) in &split {
            deliver(&mut self.router, destination, lines, clear_screen, &mut report);
        }
        report
    }

    fn requested_keys(&self, requested: Option<&[String]>) -> Vec<SectionKey>
    {
        let candidates: Vec<SectionKey> = match requested {
            Some(tokens) if !tokens.is_empty() => {
                tokens.iter().filter_map(|token| SectionKey::from_token(token)).collect()
            }
            _ => self.config.sections().to_vec(),
        };

        let mut keys = Vec::with_capacity(candidates.len());
        for key in candidates {
            if !key.is_known() {
                warn!("Unknown context section: {key}");
                continue;
            }
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

fn batch_for<'a>(batches: &'a mut Vec<(Destination, Vec<String>)>, destination: &Destination) -> &'a mut Vec<String>
{
    let index = match batches.iter().position(|(existing, _)| existing == destination) {
        Some(index) => index,
        None => {
            batches.push((destination.clone(), Vec::new()));
            batches.len() - 1
        }
    };
    &mut batches[index].1
}

fn deliver(
    router: &mut OutputRouter,
    destination: &Destination,
    lines: &[String],
    clear_screen: bool,
    report: &mut RefreshReport,
)
{
    match router.deliver(destination, lines, clear_screen) {
        Ok(()) => report.delivered.push(destination.clone()),
        Err(err) => {
            warn!("{err}");
            report.failures.push((destination.clone(), err));
        }
    }
}
