//! Task handles and the cooperative flags shared with tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use super::error::PoolError;

/// How often blocking waits re-check their [`Interrupt`].
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Interrupt flag for threads blocked on a pool.
///
/// Raising it makes pending [`TaskHandle::join`] calls and an in-progress
/// drain give up. The flag is never cleared by the pool, so the interrupted
/// caller can still observe it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Create a lowered interrupt flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag is raised.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Lower the flag after the interruption has been handled.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Cancellation flag handed to every pool task.
///
/// Tripped by a forced stop; long-running tasks should check it between
/// units of work and bail out.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Whether the owning pool has been force-stopped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// What a running task sees of its pool.
///
/// Tasks that fan out must do so through [`install`](Self::install): a task
/// degraded to an overflow thread or to the submitting thread is not on a
/// pool worker, and a bare `par_iter` there would land on rayon's global
/// pool.
#[derive(Clone, Copy)]
pub struct TaskContext<'a> {
    cancel: &'a CancelToken,
    threads: &'a rayon::ThreadPool,
}

impl<'a> TaskContext<'a> {
    pub(crate) const fn new(cancel: &'a CancelToken, threads: &'a rayon::ThreadPool) -> Self {
        Self { cancel, threads }
    }

    /// Whether the owning pool has been force-stopped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The pool's cancellation flag.
    #[must_use]
    pub const fn cancel_token(&self) -> &'a CancelToken {
        self.cancel
    }

    /// Run `op` on the pool's workers.
    ///
    /// Inline when already on one of them; otherwise the current thread
    /// blocks until a worker has run it.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.threads.install(op)
    }

    /// Worker threads in the pool.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.threads.current_num_threads()
    }
}

impl std::fmt::Debug for TaskContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskContext")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

enum Slot<T> {
    Ready(Result<T, PoolError>),
    Pending(Receiver<Result<T, PoolError>>),
}

/// Handle to a task submitted to a [`WorkerPool`](super::WorkerPool).
pub struct TaskHandle<T> {
    slot: Slot<T>,
    interrupt: Interrupt,
}

impl<T> TaskHandle<T> {
    pub(crate) const fn pending(rx: Receiver<Result<T, PoolError>>, interrupt: Interrupt) -> Self {
        Self {
            slot: Slot::Pending(rx),
            interrupt,
        }
    }

    pub(crate) const fn ready(result: Result<T, PoolError>, interrupt: Interrupt) -> Self {
        Self {
            slot: Slot::Ready(result),
            interrupt,
        }
    }

    /// Whether the task already ran on the submitting thread.
    #[must_use]
    pub const fn ran_on_caller(&self) -> bool {
        matches!(self.slot, Slot::Ready(_))
    }

    /// Block until the task completes.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Interrupted`] if the pool's interrupt is raised
    /// while waiting, [`PoolError::Cancelled`] if a forced stop discarded the
    /// task, or [`PoolError::TaskPanicked`] if it panicked.
    pub fn join(self) -> Result<T, PoolError> {
        let rx = match self.slot {
            Slot::Ready(result) => return result,
            Slot::Pending(rx) => rx,
        };

        loop {
            // A result that already arrived wins over a raised interrupt.
            match rx.try_recv() {
                Ok(result) => return result,
                Err(TryRecvError::Disconnected) => return Err(PoolError::Cancelled),
                Err(TryRecvError::Empty) => {}
            }
            if self.interrupt.is_raised() {
                return Err(PoolError::Interrupted);
            }
            match rx.recv_timeout(WAIT_POLL_INTERVAL) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(PoolError::Cancelled),
            }
        }
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("ran_on_caller", &self.ran_on_caller())
            .finish_non_exhaustive()
    }
}
