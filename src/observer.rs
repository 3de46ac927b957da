//! Invalidates a view's layout when a scroll position moves.
use crate::scroll_position::{ListenerId, ScrollPosition};

use log::trace;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Keeps a "needs relayout" flag in sync with a [`ScrollPosition`].
///
/// While attached, a listener on the position raises the flag on every
/// offset change. The listener is removed when detaching, when the position
/// is replaced, and when the observer is dropped.
pub struct ScrollObserver {
    source: Option<ScrollPosition>,
    registration: Option<ListenerId>,
    attached: bool,
    dirty: Arc<AtomicBool>,
}

impl ScrollObserver {
    /// Creates a detached observer for the given position.
    ///
    /// The flag starts raised.
    pub fn new(source: Option<ScrollPosition>) -> Self {
        ScrollObserver {
            source,
            registration: None,
            attached: false,
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns the observed position, if any.
    pub fn source(&self) -> Option<&ScrollPosition> {
        self.source.as_ref()
    }

    /// Returns `true` between `attach()` and `detach()`.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Starts listening to the position.
    ///
    /// Does nothing if already attached.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.register();
    }

    /// Stops listening to the position.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.unregister();
        self.attached = false;
    }

    /// Replaces the observed position.
    ///
    /// When attached, the listener moves to the new position. Either way the
    /// flag is raised.
    pub fn set_source(&mut self, source: Option<ScrollPosition>) {
        let unchanged = match (&self.source, &source) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.unregister();
        self.source = source;
        if self.attached {
            self.register();
        }
        self.mark_dirty();
    }

    /// Raises the flag.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if the flag is raised.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }

    /// Lowers the flag, usually after a layout.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Relaxed);
    }

    fn register(&mut self) {
        if let Some(source) = &self.source {
            let dirty = Arc::clone(&self.dirty);
            let id = source.add_listener(move |_| dirty.store(true, Ordering::Relaxed));
            trace!("Observing scroll position with {:?}", id);
            self.registration = Some(id);
        }
    }

    fn unregister(&mut self) {
        if let (Some(source), Some(id)) = (&self.source, self.registration.take()) {
            trace!("Removing scroll listener {:?}", id);
            source.remove_listener(id);
        }
    }
}

impl Drop for ScrollObserver {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_listens_while_attached() {
        let position = ScrollPosition::new();
        let mut observer = ScrollObserver::new(Some(position.clone()));
        assert!(observer.is_dirty());
        observer.clear_dirty();

        // Not attached yet: nothing registered.
        assert_eq!(position.listener_count(), 0);
        position.set_offset(1);
        assert!(!observer.is_dirty());

        observer.attach();
        observer.attach();
        assert_eq!(position.listener_count(), 1);
        position.set_offset(2);
        assert!(observer.is_dirty());

        observer.clear_dirty();
        observer.detach();
        assert_eq!(position.listener_count(), 0);
        position.set_offset(3);
        assert!(!observer.is_dirty());
    }

    #[test]
    fn swapping_source_moves_listener() {
        let first = ScrollPosition::new();
        let second = ScrollPosition::new();

        let mut observer = ScrollObserver::new(Some(first.clone()));
        observer.attach();
        observer.clear_dirty();

        observer.set_source(Some(second.clone()));
        assert!(observer.is_dirty());
        assert_eq!(first.listener_count(), 0);
        assert_eq!(second.listener_count(), 1);

        observer.clear_dirty();
        first.set_offset(4);
        assert!(!observer.is_dirty());
        second.set_offset(4);
        assert!(observer.is_dirty());

        // Same position again: nothing happens.
        observer.clear_dirty();
        observer.set_source(Some(second.clone()));
        assert!(!observer.is_dirty());
        assert_eq!(second.listener_count(), 1);

        observer.set_source(None);
        assert_eq!(second.listener_count(), 0);
        assert!(observer.is_attached());
    }

    #[test]
    fn swapping_while_detached_registers_nothing() {
        let first = ScrollPosition::new();
        let second = ScrollPosition::new();

        let mut observer = ScrollObserver::new(Some(first));
        observer.set_source(Some(second.clone()));
        assert_eq!(second.listener_count(), 0);

        observer.attach();
        assert_eq!(second.listener_count(), 1);
    }

    #[test]
    fn drop_detaches() {
        let position = ScrollPosition::new();
        let mut observer = ScrollObserver::new(Some(position.clone()));
        observer.attach();
        assert_eq!(position.listener_count(), 1);

        drop(observer);
        assert_eq!(position.listener_count(), 0);
    }
}
