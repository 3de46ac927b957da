//! # Cursive-sticky
//!
//! Sticky headers for [Cursive] scroll views.
//!
//! A [`StickyHeader`] pairs a header with some content. Inside an
//! [`ObservedScrollView`], the header sticks to the top of the viewport
//! while its content scrolls underneath, until the end of the content pushes
//! it out.
//!
//! The view also reports a "stuck amount" in `[-1, 1]`, `0` meaning the
//! header just reached the top of the viewport. A [`StickyHeaderBuilder`]
//! uses it to rebuild the header, for example to highlight stuck headers.
//!
//! Both views share a [`ScrollPosition`] with the scroll view:
//!
//! ```rust
//! use cursive_core::views::{LinearLayout, TextView};
//! use cursive_sticky::views::{ObservedScrollView, StickyHeader, StickyHeaderBuilder};
//! use cursive_sticky::{FrameQueue, ScrollPosition};
//!
//! let position = ScrollPosition::new();
//! let frames = FrameQueue::new();
//!
//! let list = LinearLayout::vertical()
//!     .child(
//!         StickyHeader::new(TextView::new("Fruits"), TextView::new("Apple\nBanana"))
//!             .scroll_position(position.clone()),
//!     )
//!     .child(
//!         StickyHeaderBuilder::new(TextView::new("Carrot\nLeek"), frames, |amount| {
//!             TextView::new(format!("Vegetables ({:.1})", amount))
//!         })
//!         .scroll_position(position.clone()),
//!     );
//!
//! let view = ObservedScrollView::new(list, position);
//! ```
//!
//! With a running Cursive, give `siv.cb_sink().clone()` to
//! `StickyHeaderBuilder` instead of a `FrameQueue`.
//!
//! [Cursive]: https://docs.rs/cursive
//! [`StickyHeader`]: views::StickyHeader
//! [`StickyHeaderBuilder`]: views::StickyHeaderBuilder
//! [`ObservedScrollView`]: views::ObservedScrollView
#![deny(missing_docs)]

pub mod layout;
pub mod observer;
pub mod scheduler;
pub mod scroll_position;
pub mod views;

pub use self::layout::{Constraints, LayoutMode, Measurement, Placement, StickyConfig};
pub use self::scheduler::{FrameQueue, FrameScheduler};
pub use self::scroll_position::{ListenerId, ScrollPosition, TransformError};
