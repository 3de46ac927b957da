//! Sticky header views.
//!
//! * [`StickyHeader`] pins a header above some content.
//! * [`StickyHeaderBuilder`] rebuilds the header as it gets stuck.
//! * [`ObservedScrollView`] is the scroll view they stick to.

mod observed_scroll_view;
mod sticky_header;
mod sticky_header_builder;

pub use self::observed_scroll_view::ObservedScrollView;
pub use self::sticky_header::{Slot, StickyHeader};
pub use self::sticky_header_builder::StickyHeaderBuilder;
