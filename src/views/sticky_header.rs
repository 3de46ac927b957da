use crate::layout::{self, Constraints, Measurement, Placement, StickyConfig};
use crate::observer::ScrollObserver;
use crate::scroll_position::{ScrollPosition, TransformError};

use cursive_core::{
    direction::{Absolute, Direction},
    event::{AnyCb, Event, EventResult, Key},
    view::{CannotFocus, Selector, View, ViewNotFound},
    Printer, Rect, Vec2, With,
};
use log::trace;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type StuckCallback = dyn Fn(f32) + Send + Sync;

/// One of the two children of a [`StickyHeader`].
///
/// Children are drawn in slot order, so the header ends up on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The scrolling content. Drawn first.
    Content,
    /// The header. Drawn last.
    Header,
}

impl Slot {
    /// Both slots, in drawing order.
    pub const ALL: [Slot; 2] = [Slot::Content, Slot::Header];

    /// Returns the other slot.
    pub fn other(self) -> Self {
        match self {
            Slot::Content => Slot::Header,
            Slot::Header => Slot::Content,
        }
    }
}

/// Content with a header that sticks to the top of the enclosing scroll view.
///
/// While the top of the content is in view, the header stays above it. Once
/// the content scrolls past the top of the viewport, the header follows the
/// viewport, until the bottom of the content pushes it away.
///
/// The enclosing scroll view must be an [`ObservedScrollView`] sharing the
/// same [`ScrollPosition`]. Without one, the header never sticks.
///
/// On every draw, the current stuck amount (see [`layout::stuck_amount`])
/// is given to the `on_stuck_amount` callback.
///
/// [`ObservedScrollView`]: crate::views::ObservedScrollView
pub struct StickyHeader<H, C> {
    content: C,
    header: H,

    config: StickyConfig,
    observer: ScrollObserver,
    on_stuck_amount: Option<Arc<StuckCallback>>,

    measurement: Option<Measurement>,

    // Header position as of the last draw, for mouse events.
    header_y: AtomicUsize,

    focus: Slot,
}

impl<H, C> StickyHeader<H, C> {
    /// Creates a new sticky header above the given content.
    pub fn new(header: H, content: C) -> Self {
        StickyHeader {
            content,
            header,
            config: StickyConfig::default(),
            observer: ScrollObserver::new(None),
            on_stuck_amount: None,
            measurement: None,
            header_y: AtomicUsize::new(0),
            focus: Slot::Content,
        }
    }

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: StickyConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    /// Replaces the whole configuration.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn config(self, config: StickyConfig) -> Self {
        self.with(|s| s.set_config(config))
    }

    /// Returns the current configuration.
    pub fn get_config(&self) -> &StickyConfig {
        &self.config
    }

    /// Draws the header over the content instead of above it.
    pub fn set_overlap_headers(&mut self, overlap: bool) {
        self.set_config(self.config.overlap_headers(overlap));
    }

    /// Draws the header over the content instead of above it.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn overlap_headers(self, overlap: bool) -> Self {
        self.with(|s| s.set_overlap_headers(overlap))
    }

    /// Moves the content right by the header width.
    ///
    /// Together with `overlap_headers`, this puts the header beside the content.
    pub fn set_offset_from_headers(&mut self, offset: bool) {
        self.set_config(self.config.offset_from_headers(offset));
    }

    /// Moves the content right by the header width.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn offset_from_headers(self, offset: bool) -> Self {
        self.with(|s| s.set_offset_from_headers(offset))
    }

    /// Uses a fixed header width when the header is beside the content.
    ///
    /// `None` uses the header's own width.
    pub fn set_header_width(&mut self, width: Option<usize>) {
        let mut config = self.config;
        config.header_width = width;
        self.set_config(config);
    }

    /// Uses a fixed header width when the header is beside the content.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn header_width(self, width: usize) -> Self {
        self.with(|s| s.set_header_width(Some(width)))
    }

    /// Sets the space around the content when the header is beside it.
    pub fn set_content_offsets(&mut self, left: usize, right: usize) {
        self.set_config(self.config.content_offsets(left, right));
    }

    /// Sets the space around the content when the header is beside it.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn content_offsets(self, left: usize, right: usize) -> Self {
        self.with(|s| s.set_content_offsets(left, right))
    }

    /// Sets the position of the enclosing scroll view.
    pub fn set_scroll_position(&mut self, position: Option<ScrollPosition>) {
        self.observer.set_source(position);
    }

    /// Sets the position of the enclosing scroll view.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn scroll_position(self, position: ScrollPosition) -> Self {
        self.with(|s| s.set_scroll_position(Some(position)))
    }

    /// Returns the position of the enclosing scroll view, if any.
    pub fn get_scroll_position(&self) -> Option<&ScrollPosition> {
        self.observer.source()
    }

    /// Sets a callback to receive the stuck amount on every draw.
    ///
    /// The callback runs while the view tree is drawn: it must not try to
    /// modify views. Defer such work to the next frame, like
    /// [`StickyHeaderBuilder`] does.
    ///
    /// [`StickyHeaderBuilder`]: crate::views::StickyHeaderBuilder
    pub fn set_on_stuck_amount<F>(&mut self, callback: F)
    where
        F: Fn(f32) + 'static + Send + Sync,
    {
        self.on_stuck_amount = Some(Arc::new(callback));
    }

    /// Sets a callback to receive the stuck amount on every draw.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn on_stuck_amount<F>(self, callback: F) -> Self
    where
        F: Fn(f32) + 'static + Send + Sync,
    {
        self.with(|s| s.set_on_stuck_amount(callback))
    }

    /// Removes the stuck amount callback.
    pub fn clear_on_stuck_amount(&mut self) {
        self.on_stuck_amount = None;
    }

    /// Returns the header view.
    pub fn header(&self) -> &H {
        &self.header
    }

    /// Returns the header view.
    pub fn header_mut(&mut self) -> &mut H {
        self.invalidate();
        &mut self.header
    }

    /// Replaces the header view, returning the previous one.
    pub fn set_header(&mut self, header: H) -> H {
        self.invalidate();
        std::mem::replace(&mut self.header, header)
    }

    /// Returns the content view.
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Returns the content view.
    pub fn content_mut(&mut self) -> &mut C {
        self.invalidate();
        &mut self.content
    }

    /// Replaces the content view, returning the previous one.
    pub fn set_content(&mut self, content: C) -> C {
        self.invalidate();
        std::mem::replace(&mut self.content, content)
    }

    /// Returns both children, in drawing order.
    pub fn children(&self) -> (&C, &H) {
        (&self.content, &self.header)
    }

    /// Returns the result of the last layout, if any.
    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    /// Returns the focused child.
    pub fn focused_slot(&self) -> Slot {
        self.focus
    }

    /// Places the header for a composite whose top is at `screen_top`.
    ///
    /// `screen_top` is a screen row; it is negative when the top of the
    /// composite is off-screen. The stuck amount is reported to the
    /// callback.
    ///
    /// This is what `draw` does before printing the children. Returns `None`
    /// before the first layout.
    pub fn place_at(&self, screen_top: isize) -> Option<Placement> {
        let measurement = self.measurement.as_ref()?;
        let placement = measurement.place(self.stuck_offset(screen_top));

        self.header_y.store(placement.header_offset.y, Ordering::Relaxed);

        if let Some(ref callback) = self.on_stuck_amount {
            callback(placement.stuck_amount);
        }

        Some(placement)
    }

    // Signed distance from the viewport top to the composite top.
    fn stuck_offset(&self, screen_top: isize) -> isize {
        let result = self
            .observer
            .source()
            .ok_or(TransformError::NoSource)
            .and_then(|position| position.to_viewport(screen_top));

        match result {
            Ok(offset) => offset,
            Err(err) => {
                trace!("Sticky header considered unstuck: {}", err);
                0
            }
        }
    }

    fn invalidate(&self) {
        self.observer.mark_dirty();
    }

    fn header_offset(&self) -> Vec2 {
        Vec2::new(0, self.header_y.load(Ordering::Relaxed))
    }
}

impl<H: View, C: View> StickyHeader<H, C> {
    fn child_mut(&mut self, slot: Slot) -> &mut dyn View {
        match slot {
            Slot::Content => &mut self.content,
            Slot::Header => &mut self.header,
        }
    }

    fn child(&self, slot: Slot) -> &dyn View {
        match slot {
            Slot::Content => &self.content,
            Slot::Header => &self.header,
        }
    }

    // Top-left corner of the given child, as of the last layout and draw.
    fn child_offset(&self, measurement: &Measurement, slot: Slot) -> Vec2 {
        match slot {
            Slot::Content => measurement.content_offset,
            Slot::Header => self.header_offset(),
        }
    }

    fn measure(&mut self, constraints: Constraints) -> Measurement {
        let StickyHeader {
            ref config,
            ref mut header,
            ref mut content,
            ..
        } = *self;

        layout::measure(
            config,
            constraints,
            |c| header.required_size(c.max),
            |c| content.required_size(c.max),
        )
    }

    fn set_focus_unchecked(&mut self, slot: Slot) -> EventResult {
        if slot != self.focus {
            let result = self.child_mut(self.focus).on_event(Event::FocusLost);
            self.focus = slot;
            result
        } else {
            EventResult::Consumed(None)
        }
    }

    fn move_focus(&mut self) -> EventResult {
        let target = self.focus.other();
        match self.child_mut(target).take_focus(Direction::none()) {
            Ok(res) => self.set_focus_unchecked(target).and(res),
            Err(CannotFocus) => EventResult::Ignored,
        }
    }

    fn check_focus_grab(
        &mut self,
        event: &Event,
        measurement: &Measurement,
    ) -> Option<EventResult> {
        if let Event::Mouse {
            offset,
            position,
            event,
        } = *event
        {
            if !event.grabs_focus() {
                return None;
            }

            let position = position.checked_sub(offset)?;

            // The header is drawn on top, so it gets the first chance.
            let slot = if measurement.header_contains(self.header_offset(), position) {
                Slot::Header
            } else if measurement.content_contains(position) {
                Slot::Content
            } else {
                return None;
            };

            if slot == self.focus {
                return None;
            }

            if let Ok(res) = self.child_mut(slot).take_focus(Direction::none()) {
                return Some(self.set_focus_unchecked(slot).and(res));
            }
        }

        None
    }
}

impl<H: View, C: View> View for StickyHeader<H, C> {
    fn draw(&self, printer: &Printer) {
        let measurement = match self.measurement {
            Some(measurement) => measurement,
            None => return,
        };

        // Where the top of this view would be, if nothing was cropped.
        let screen_top = printer.offset.y as isize - printer.content_offset.y as isize;
        let placement = match self.place_at(screen_top) {
            Some(placement) => placement,
            None => return,
        };

        self.content.draw(
            &printer
                .offset(measurement.content_offset)
                .cropped(measurement.content_size)
                .focused(self.focus == Slot::Content),
        );

        let printer = printer
            .offset(placement.header_offset)
            .focused(self.focus == Slot::Header);

        // Hide the content scrolling under the header.
        let band = printer.cropped(measurement.header_area());
        for y in 0..band.size.y {
            band.print_hline((0, y), band.size.x, " ");
        }

        self.header.draw(&printer.cropped(measurement.header_size));
    }

    fn layout(&mut self, size: Vec2) {
        // The first layout is when we enter the view tree.
        self.observer.attach();

        let measurement = self.measure(Constraints::tight(size));
        self.header.layout(measurement.header_size);
        self.content.layout(measurement.content_size);

        self.measurement = Some(measurement);
        self.observer.clear_dirty();
    }

    fn needs_relayout(&self) -> bool {
        self.measurement.is_none()
            || self.observer.is_dirty()
            || self.header.needs_relayout()
            || self.content.needs_relayout()
    }

    fn required_size(&mut self, constraint: Vec2) -> Vec2 {
        // Only the width is bounded: a scroll view needs the full height
        // to know how far it can scroll.
        let measurement = self.measure(Constraints::loose((constraint.x, usize::MAX)));
        measurement.required_size(&self.config)
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        let measurement = match self.measurement {
            Some(measurement) => measurement,
            None => return EventResult::Ignored,
        };

        let res = self
            .check_focus_grab(&event, &measurement)
            .unwrap_or(EventResult::Ignored);

        let focus = self.focus;
        let offset = self.child_offset(&measurement, focus);
        let result = self.child_mut(focus).on_event(event.relativized(offset));

        res.and(match result {
            EventResult::Ignored => match event {
                Event::Key(Key::Tab) | Event::Shift(Key::Tab) => self.move_focus(),
                _ => EventResult::Ignored,
            },
            res => res,
        })
    }

    fn take_focus(&mut self, source: Direction) -> Result<EventResult, CannotFocus> {
        // Keep the current focus if it still works, otherwise prefer the content.
        let order = match source {
            Direction::Abs(Absolute::None) => [self.focus, self.focus.other()],
            _ => Slot::ALL,
        };

        for slot in order {
            if let Ok(res) = self.child_mut(slot).take_focus(source) {
                return Ok(self.set_focus_unchecked(slot).and(res));
            }
        }

        Err(CannotFocus)
    }

    fn call_on_any(&mut self, selector: &Selector, callback: AnyCb) {
        for slot in Slot::ALL {
            self.child_mut(slot).call_on_any(selector, callback);
        }
    }

    fn focus_view(&mut self, selector: &Selector) -> Result<EventResult, ViewNotFound> {
        for slot in Slot::ALL {
            if let Ok(res) = self.child_mut(slot).focus_view(selector) {
                return Ok(self.set_focus_unchecked(slot).and(res));
            }
        }

        Err(ViewNotFound)
    }

    fn important_area(&self, size: Vec2) -> Rect {
        let measurement = match self.measurement {
            Some(measurement) => measurement,
            None => return Rect::from_size((0, 0), size),
        };

        let (child_size, offset) = match self.focus {
            Slot::Content => (measurement.content_size, measurement.content_offset),
            Slot::Header => (measurement.header_size, self.header_offset()),
        };

        self.child(self.focus).important_area(child_size) + offset
    }
}
