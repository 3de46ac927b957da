use crate::scroll_position::ScrollPosition;

use cursive_core::{
    direction::Direction,
    event::{Event, EventResult},
    view::{CannotFocus, Selector, View, ViewNotFound, ViewWrapper},
    views::ScrollView,
    Printer, Vec2,
};

/// A `ScrollView` publishing its state to a [`ScrollPosition`].
///
/// Views inside it, like [`StickyHeader`], read the position to know where
/// they are relative to the viewport.
///
/// The position is updated after every layout and event, and the viewport
/// location on every draw. Dropping this view detaches the position.
///
/// # Examples
///
/// ```rust
/// use cursive_core::views::{LinearLayout, TextView};
/// use cursive_sticky::views::{ObservedScrollView, StickyHeader};
/// use cursive_sticky::ScrollPosition;
///
/// let position = ScrollPosition::new();
///
/// let list = LinearLayout::vertical()
///     .child(
///         StickyHeader::new(TextView::new("A"), TextView::new("Alice\nAnna"))
///             .scroll_position(position.clone()),
///     )
///     .child(
///         StickyHeader::new(TextView::new("B"), TextView::new("Bob"))
///             .scroll_position(position.clone()),
///     );
///
/// let view = ObservedScrollView::new(list, position);
/// ```
///
/// [`StickyHeader`]: crate::views::StickyHeader
pub struct ObservedScrollView<V> {
    view: ScrollView<V>,
    attachment: Attachment,
}

// Detaches the position when the scroll view goes away.
struct Attachment(ScrollPosition);

impl Drop for Attachment {
    fn drop(&mut self) {
        self.0.detach();
    }
}

impl<V: View> ObservedScrollView<V> {
    /// Wraps `inner` in a new scroll view, publishing to `position`.
    pub fn new(inner: V, position: ScrollPosition) -> Self {
        Self::from_scroll_view(ScrollView::new(inner), position)
    }

    /// Observes an existing scroll view.
    pub fn from_scroll_view(view: ScrollView<V>, position: ScrollPosition) -> Self {
        let observed = ObservedScrollView {
            view,
            attachment: Attachment(position),
        };
        observed.publish();
        observed
    }

    /// Returns the position this view publishes to.
    pub fn position(&self) -> &ScrollPosition {
        &self.attachment.0
    }

    /// Scrolls to the given offset in the content.
    pub fn set_offset<S: Into<Vec2>>(&mut self, offset: S) -> EventResult {
        let result = self.view.set_offset(offset);
        self.publish();
        result
    }

    fn publish(&self) {
        self.attachment.0.set_offset(self.view.content_viewport().top());
    }

    cursive_core::inner_getters!(self.view: ScrollView<V>);
}

impl<V: View> ViewWrapper for ObservedScrollView<V> {
    cursive_core::wrap_impl!(self.view: ScrollView<V>);

    fn wrap_draw(&self, printer: &Printer) {
        // Record the viewport before the content draws and reads it.
        self.attachment.0.attach(printer.offset);
        self.view.draw(printer);
    }

    fn wrap_layout(&mut self, size: Vec2) {
        self.view.layout(size);
        self.publish();
    }

    fn wrap_on_event(&mut self, event: Event) -> EventResult {
        let result = self.view.on_event(event);
        self.publish();
        result
    }

    fn wrap_take_focus(&mut self, source: Direction) -> Result<EventResult, CannotFocus> {
        let result = self.view.take_focus(source);
        self.publish();
        result
    }

    fn wrap_focus_view(&mut self, selector: &Selector) -> Result<EventResult, ViewNotFound> {
        let result = self.view.focus_view(selector);
        self.publish();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursive_core::view::Resizable;
    use cursive_core::views::DummyView;

    #[test]
    fn publishes_offset() {
        let position = ScrollPosition::new();
        let mut view = ObservedScrollView::new(DummyView.fixed_size((10, 50)), position.clone());

        view.layout(Vec2::new(10, 5));
        assert_eq!(position.offset(), 0);

        view.set_offset((0, 12));
        assert_eq!(position.offset(), 12);

        view.get_inner_mut().scroll_to_top();
        // Changes made behind our back are published on the next layout.
        view.layout(Vec2::new(10, 5));
        assert_eq!(position.offset(), 0);
    }

    #[test]
    fn drop_detaches() {
        let position = ScrollPosition::new();
        let view = ObservedScrollView::new(DummyView.fixed_size((10, 50)), position.clone());

        position.attach(Vec2::new(0, 1));
        drop(view);
        assert!(!position.is_attached());
    }
}
