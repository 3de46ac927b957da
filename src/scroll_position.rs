//! Shared scroll state of a scroll view.
//!
//! A [`ScrollPosition`] is published by an [`ObservedScrollView`] and read
//! by the views it contains. It carries:
//!
//! * The vertical scroll offset, with listeners notified when it changes.
//! * Where the viewport was last drawn on screen, used to express a
//!   position in viewport coordinates.
//!
//! [`ObservedScrollView`]: crate::views::ObservedScrollView
use cursive_core::Vec2;
use log::trace;
use parking_lot::Mutex;

use std::fmt;
use std::sync::Arc;

type Listener = Arc<dyn Fn(usize) + Send + Sync>;

/// Identifies a listener registered on a [`ScrollPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Error converting a screen position to viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransformError {
    /// There is no scroll position to convert to.
    NoSource,

    /// The scroll view is not currently drawn.
    Detached,
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransformError::NoSource => write!(f, "No scroll position to convert to"),
            TransformError::Detached => write!(f, "The scroll view is not attached"),
        }
    }
}

impl std::error::Error for TransformError {}

#[derive(Default)]
struct Shared {
    offset: usize,

    // Screen position of the viewport's top-left corner, as of the last draw.
    viewport: Option<Vec2>,

    listeners: Vec<(ListenerId, Listener)>,
    next_id: usize,
}

/// Observable scroll offset of a single scroll view.
///
/// Cloning gives another handle to the same position.
#[derive(Clone, Default)]
pub struct ScrollPosition {
    shared: Arc<Mutex<Shared>>,
}

impl ScrollPosition {
    /// Creates a new, detached scroll position at offset 0.
    pub fn new() -> Self {
        ScrollPosition {
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    /// Returns the current vertical offset.
    pub fn offset(&self) -> usize {
        self.shared.lock().offset
    }

    /// Sets the vertical offset.
    ///
    /// Listeners are called if the offset changed. Returns `true` in that case.
    pub fn set_offset(&self, offset: usize) -> bool {
        let listeners: Vec<Listener> = {
            let mut shared = self.shared.lock();
            if shared.offset == offset {
                return false;
            }
            shared.offset = offset;
            shared
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        trace!(
            "Scroll offset now {}, notifying {} listeners",
            offset,
            listeners.len()
        );

        // Listeners run without the lock held, so they can read the position.
        for listener in listeners {
            listener(offset);
        }

        true
    }

    /// Registers a callback to run whenever the offset changes.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(usize) + 'static + Send + Sync,
    {
        let mut shared = self.shared.lock();
        let id = ListenerId(shared.next_id);
        shared.next_id += 1;
        shared.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener.
    ///
    /// Returns `false` if no listener with this id was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut shared = self.shared.lock();
        let before = shared.listeners.len();
        shared.listeners.retain(|(listener_id, _)| *listener_id != id);
        shared.listeners.len() != before
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.lock().listeners.len()
    }

    /// Records where the viewport is drawn on screen.
    pub fn attach(&self, viewport_origin: Vec2) {
        self.shared.lock().viewport = Some(viewport_origin);
    }

    /// Forgets the viewport: conversions will fail until the next `attach`.
    pub fn detach(&self) {
        self.shared.lock().viewport = None;
    }

    /// Returns `true` if the viewport position is known.
    pub fn is_attached(&self) -> bool {
        self.shared.lock().viewport.is_some()
    }

    /// Converts a screen row to a row relative to the top of the viewport.
    ///
    /// `screen_y` may be negative, for rows scrolled out of the screen.
    pub fn to_viewport(&self, screen_y: isize) -> Result<isize, TransformError> {
        let viewport = self.shared.lock().viewport.ok_or(TransformError::Detached)?;
        let top = isize::try_from(viewport.y).map_err(|_| TransformError::Detached)?;
        Ok(screen_y - top)
    }

    /// Returns `true` if both handles point to the same position.
    pub fn same_as(&self, other: &ScrollPosition) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for ScrollPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("ScrollPosition")
            .field("offset", &shared.offset)
            .field("viewport", &shared.viewport)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}
