//! Deferring work to the next frame.
//!
//! Views cannot change the view tree while it is being drawn. Instead, they
//! hand a job to a [`FrameScheduler`], which runs it once the current frame
//! is done.
use crossbeam_channel::{Receiver, Sender};
use cursive_core::{CbSink, Cursive};
use log::warn;

use std::sync::Arc;

/// Work deferred to the next frame.
pub type Job = Box<dyn FnOnce() + Send>;

/// Runs jobs after the current frame.
pub trait FrameScheduler: Send + Sync {
    /// Queues `job` to run after the current frame.
    ///
    /// Jobs never run from within this call.
    fn schedule(&self, job: Job);
}

/// Jobs go through the Cursive callback queue, and run at the next step of
/// the event loop, which then refreshes the screen.
impl FrameScheduler for CbSink {
    fn schedule(&self, job: Job) {
        if self.send(Box::new(move |_: &mut Cursive| job())).is_err() {
            warn!("Event loop is gone; dropping deferred job.");
        }
    }
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Arc<T> {
    fn schedule(&self, job: Job) {
        (**self).schedule(job);
    }
}

/// Manually driven frame queue.
///
/// Useful without a running event loop, for example in tests: call
/// [`run_pending`](FrameQueue::run_pending) at each frame boundary.
///
/// Cloning gives another handle to the same queue.
#[derive(Clone)]
pub struct FrameQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
}

impl FrameQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        FrameQueue { sender, receiver }
    }

    /// Number of jobs waiting for the next frame.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no job is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Runs the jobs queued so far.
    ///
    /// Jobs queued while running are kept for the next call.
    ///
    /// Returns the number of jobs that ran.
    pub fn run_pending(&self) -> usize {
        let jobs: Vec<Job> = self.receiver.try_iter().collect();
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&self, job: Job) {
        // We hold the receiver, so the channel cannot be disconnected.
        let _ = self.sender.send(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn jobs_wait_for_next_frame() {
        let queue = FrameQueue::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&counter);
            queue.schedule(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn nested_jobs_run_next_frame() {
        let queue = FrameQueue::new();
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let inner_queue = queue.clone();
            let counter = Arc::clone(&counter);
            queue.schedule(Box::new(move || {
                inner_queue.schedule(Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            }));
        }

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cb_sink_defers_to_event_loop() {
        let siv = Cursive::new();
        let sink = siv.cb_sink().clone();
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let counter = Arc::clone(&counter);
            sink.schedule(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        drop(siv);
        // The event loop is gone: scheduling is a no-op.
        sink.schedule(Box::new(|| ()));
    }
}
