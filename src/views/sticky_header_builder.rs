use crate::layout::StickyConfig;
use crate::scheduler::FrameScheduler;
use crate::scroll_position::ScrollPosition;
use crate::views::StickyHeader;

use cursive_core::{
    view::{View, ViewWrapper},
    Vec2, With,
};
use log::debug;
use parking_lot::Mutex;

use std::sync::Arc;

type HeaderBuilder<H> = dyn Fn(f32) -> H + Send + Sync;

#[derive(Debug)]
struct StuckState {
    // Last amount reported by the sticky header.
    latest: f32,
    // Amount the current header was built with.
    built: f32,
    // A job is queued for the next frame.
    scheduled: bool,
    // The queued job ran: rebuild on the next layout.
    rebuild: bool,
}

impl StuckState {
    fn new() -> Self {
        StuckState {
            latest: 0.0,
            built: 0.0,
            scheduled: false,
            rebuild: false,
        }
    }

    // Called during draw: only record the amount, and schedule one job per frame.
    fn report(state: &Arc<Mutex<Self>>, scheduler: &dyn FrameScheduler, amount: f32) {
        {
            let mut guard = state.lock();
            if guard.latest == amount {
                return;
            }
            guard.latest = amount;
            if guard.scheduled {
                return;
            }
            guard.scheduled = true;
        }

        let state = Arc::clone(state);
        scheduler.schedule(Box::new(move || {
            let mut guard = state.lock();
            guard.scheduled = false;
            guard.rebuild = true;
        }));
    }
}

/// A sticky header rebuilt from its stuck amount.
///
/// Instead of a header view, this takes a function building the header from
/// the current stuck amount (see [`layout::stuck_amount`]). Use it to change
/// the header appearance as it gets stuck.
///
/// The stuck amount is known while drawing, when views cannot change. When
/// it changes, a job is given to the scheduler; once it ran (after the
/// frame), the header is rebuilt at the next layout. Several changes during
/// one frame only schedule one job.
///
/// With a running Cursive, use its [`CbSink`] as scheduler.
///
/// # Examples
///
/// ```rust
/// use cursive_core::views::TextView;
/// use cursive_sticky::views::StickyHeaderBuilder;
/// use cursive_sticky::{FrameQueue, ScrollPosition};
///
/// let position = ScrollPosition::new();
/// let view = StickyHeaderBuilder::new(
///     TextView::new("Content"),
///     FrameQueue::new(),
///     |amount| TextView::new(if amount <= 0.0 { "[Header]" } else { "Header" }),
/// )
/// .scroll_position(position);
/// ```
///
/// [`layout::stuck_amount`]: crate::layout::stuck_amount
/// [`CbSink`]: cursive_core::CbSink
pub struct StickyHeaderBuilder<H, C> {
    view: StickyHeader<H, C>,
    build: Arc<HeaderBuilder<H>>,
    state: Arc<Mutex<StuckState>>,
}

impl<H: View, C: View> StickyHeaderBuilder<H, C> {
    /// Creates a new sticky header above `content`, built by `build`.
    ///
    /// The first header is built for a stuck amount of `0`.
    pub fn new<S, F>(content: C, scheduler: S, build: F) -> Self
    where
        S: FrameScheduler + 'static,
        F: Fn(f32) -> H + 'static + Send + Sync,
    {
        let build: Arc<HeaderBuilder<H>> = Arc::new(build);
        let state = Arc::new(Mutex::new(StuckState::new()));

        let view = StickyHeader::new(build(0.0), content).on_stuck_amount({
            let state = Arc::clone(&state);
            move |amount| StuckState::report(&state, &scheduler, amount)
        });

        StickyHeaderBuilder { view, build, state }
    }

    /// Replaces the whole configuration.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn config(self, config: StickyConfig) -> Self {
        self.with(|s| s.view.set_config(config))
    }

    /// Draws the header over the content instead of above it.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn overlap_headers(self, overlap: bool) -> Self {
        self.with(|s| s.view.set_overlap_headers(overlap))
    }

    /// Moves the content right by the header width.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn offset_from_headers(self, offset: bool) -> Self {
        self.with(|s| s.view.set_offset_from_headers(offset))
    }

    /// Uses a fixed header width when the header is beside the content.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn header_width(self, width: usize) -> Self {
        self.with(|s| s.view.set_header_width(Some(width)))
    }

    /// Sets the space around the content when the header is beside it.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn content_offsets(self, left: usize, right: usize) -> Self {
        self.with(|s| s.view.set_content_offsets(left, right))
    }

    /// Sets the position of the enclosing scroll view.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn scroll_position(self, position: ScrollPosition) -> Self {
        self.with(|s| s.view.set_scroll_position(Some(position)))
    }

    /// Returns the stuck amount the current header was built with.
    pub fn stuck_amount(&self) -> f32 {
        self.state.lock().built
    }

    /// Returns the last stuck amount reported, possibly not built yet.
    pub fn latest_stuck_amount(&self) -> f32 {
        self.state.lock().latest
    }

    /// Rebuilds the header if a rebuild was requested.
    fn rebuild_header(&mut self) {
        let amount = {
            let mut state = self.state.lock();
            if !state.rebuild {
                return;
            }
            state.rebuild = false;
            state.built = state.latest;
            state.latest
        };

        debug!("Rebuilding sticky header for stuck amount {}", amount);
        self.view.set_header((self.build)(amount));
    }

    /// Gives access to the wrapped sticky header.
    ///
    /// Replacing its stuck amount callback disables rebuilds.
    pub fn get_inner(&self) -> &StickyHeader<H, C> {
        &self.view
    }

    /// Gives mutable access to the wrapped sticky header.
    ///
    /// Replacing its stuck amount callback disables rebuilds.
    pub fn get_inner_mut(&mut self) -> &mut StickyHeader<H, C> {
        &mut self.view
    }
}

impl<H: View, C: View> ViewWrapper for StickyHeaderBuilder<H, C> {
    cursive_core::wrap_impl!(self.view: StickyHeader<H, C>);

    fn wrap_layout(&mut self, size: Vec2) {
        self.rebuild_header();
        self.view.layout(size);
    }

    fn wrap_required_size(&mut self, req: Vec2) -> Vec2 {
        self.rebuild_header();
        self.view.required_size(req)
    }

    fn wrap_needs_relayout(&self) -> bool {
        self.state.lock().rebuild || self.view.needs_relayout()
    }
}
