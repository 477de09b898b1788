//! Lifecycle-managed worker pool built on a dedicated rayon thread pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::config::{PoolConfig, SaturationPolicy};
use super::error::PoolError;
use super::handle::{CancelToken, Interrupt, TaskContext, TaskHandle, WAIT_POLL_INTERVAL};
use super::state::{PoolState, ShutdownOutcome, StopReason};
use crate::observability;

/// Worker pool with an explicit lifecycle.
///
/// Tasks are spawned onto a private rayon thread pool. When a bounded queue
/// is full, extra overflow threads are started up to `max_threads`; beyond
/// that the submitting thread runs the task itself. Wherever a task runs,
/// work it fans out through [`TaskContext::install`] lands on this pool's
/// workers, never on the global pool.
///
/// [`shutdown`](Self::shutdown) drains within the configured grace period
/// and is idempotent. Dropping the pool shuts it down if that has not
/// happened yet.
pub struct WorkerPool {
    config: PoolConfig,
    threads: Arc<rayon::ThreadPool>,
    shared: Arc<Shared>,
    outcome: Mutex<Option<ShutdownOutcome>>,
}

struct Shared {
    state: RwLock<PoolState>,
    pending: Mutex<usize>,
    drained: Condvar,
    queued: AtomicUsize,
    overflow_active: AtomicUsize,
    caller_runs: AtomicU64,
    forced_reason: OnceLock<StopReason>,
    cancel: CancelToken,
    interrupt: Interrupt,
}

enum Drain {
    Complete,
    TimedOut,
    Interrupted,
}

impl WorkerPool {
    /// Build the pool and start accepting work.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or threads cannot be spawned.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let prefix = config.thread_name_prefix.clone();
        let threads = rayon::ThreadPoolBuilder::new()
            .num_threads(config.core_threads)
            .thread_name(move |i| format!("{prefix}{i}"))
            .build()
            .map_err(|e| PoolError::Build {
                message: e.to_string(),
            })?;

        let pool = Self {
            config,
            threads: Arc::new(threads),
            shared: Arc::new(Shared {
                state: RwLock::new(PoolState::Created),
                pending: Mutex::new(0),
                drained: Condvar::new(),
                queued: AtomicUsize::new(0),
                overflow_active: AtomicUsize::new(0),
                caller_runs: AtomicU64::new(0),
                forced_reason: OnceLock::new(),
                cancel: CancelToken::default(),
                interrupt: Interrupt::new(),
            }),
            outcome: Mutex::new(None),
        };
        pool.shared.transition(PoolState::Running);

        info!(
            threads = pool.config.core_threads,
            max_threads = pool.config.max_threads,
            queue_capacity = ?pool.config.queue_capacity,
            "Worker pool started"
        );
        Ok(pool)
    }

    /// Submit a task.
    ///
    /// The task receives a [`TaskContext`] carrying the pool's cancel flag.
    /// A panic inside the task is caught and reported through the handle.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Rejected`] if the pool is no longer running.
    pub fn submit<T, F>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce(&TaskContext<'_>) -> T + Send + 'static,
        T: Send + 'static,
    {
        // Holding the read lock keeps shutdown from starting its drain
        // between the state check and the pending-count increment.
        let state = read(&self.shared.state);
        if *state != PoolState::Running {
            return Err(PoolError::Rejected { state: *state });
        }

        if self.reserve_queue_slot() {
            let handle = self.enqueue(task);
            drop(state);
            return Ok(handle);
        }

        if self.reserve_overflow_thread() {
            match self.spawn_overflow(task) {
                Ok(handle) => return Ok(handle),
                Err(task) => {
                    drop(state);
                    return Ok(self.run_on_caller(task));
                }
            }
        }

        drop(state);
        match self.config.saturation {
            SaturationPolicy::CallerRuns => Ok(self.run_on_caller(task)),
        }
    }

    /// Claim a queue slot; the check and the increment are one atomic step.
    fn reserve_queue_slot(&self) -> bool {
        let queued = &self.shared.queued;
        match self.config.queue_capacity {
            None => {
                queued.fetch_add(1, Ordering::SeqCst);
                true
            }
            Some(capacity) => queued
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                    (n < capacity).then_some(n + 1)
                })
                .is_ok(),
        }
    }

    fn enqueue<T, F>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce(&TaskContext<'_>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        self.shared.task_started();

        let shared = Arc::clone(&self.shared);
        let threads = Arc::clone(&self.threads);
        self.threads.spawn(move || {
            shared.queued.fetch_sub(1, Ordering::SeqCst);
            if shared.cancel.is_cancelled() {
                // Dropping the sender resolves the handle as cancelled.
                drop(tx);
            } else {
                let context = TaskContext::new(&shared.cancel, &threads);
                let _ = tx.send(run_guarded(task, &context));
            }
            shared.task_finished();
        });

        TaskHandle::pending(rx, self.shared.interrupt.clone())
    }

    fn reserve_overflow_thread(&self) -> bool {
        let limit = self.config.overflow_threads();
        self.shared
            .overflow_active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |active| {
                (active < limit).then_some(active + 1)
            })
            .is_ok()
    }

    /// Run `task` on a fresh thread. Hands the task back if the OS refuses
    /// to spawn one.
    fn spawn_overflow<T, F>(&self, task: F) -> Result<TaskHandle<T>, F>
    where
        F: FnOnce(&TaskContext<'_>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let (task_tx, task_rx) = mpsc::sync_channel::<F>(1);
        self.shared.task_started();

        let shared = Arc::clone(&self.shared);
        let threads = Arc::clone(&self.threads);
        let spawned = thread::Builder::new()
            .name(format!("{}overflow", self.config.thread_name_prefix))
            .spawn(move || {
                if let Ok(task) = task_rx.recv() {
                    if !shared.cancel.is_cancelled() {
                        let context = TaskContext::new(&shared.cancel, &threads);
                        let _ = tx.send(run_guarded(task, &context));
                    }
                }
                shared.overflow_active.fetch_sub(1, Ordering::SeqCst);
                shared.task_finished();
            });

        match spawned {
            Ok(_) => {
                // The receiving thread is alive and blocked on recv.
                let _ = task_tx.send(task);
                debug!("Queue full, task moved to overflow thread");
                Ok(TaskHandle::pending(rx, self.shared.interrupt.clone()))
            }
            Err(e) => {
                warn!(error = %e, "Failed to spawn overflow thread");
                self.shared.overflow_active.fetch_sub(1, Ordering::SeqCst);
                self.shared.task_finished();
                Err(task)
            }
        }
    }

    fn run_on_caller<T, F>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce(&TaskContext<'_>) -> T,
    {
        self.shared.caller_runs.fetch_add(1, Ordering::Relaxed);
        observability::record_caller_runs();
        debug!("Worker pool saturated, running task on submitting thread");

        let context = TaskContext::new(&self.shared.cancel, &self.threads);
        TaskHandle::ready(
            run_guarded(task, &context),
            self.shared.interrupt.clone(),
        )
    }

    /// Stop accepting work, wait up to the grace period for pending tasks,
    /// and force-stop whatever is left.
    ///
    /// Safe to call any number of times: later calls return the first
    /// outcome without waiting again.
    pub fn shutdown(&self) -> ShutdownOutcome {
        let mut recorded = lock(&self.outcome);
        if let Some(outcome) = *recorded {
            return outcome;
        }

        let started = Instant::now();
        let outcome = if let Some(reason) = self.shared.forced_reason.get() {
            ShutdownOutcome::ForcedStop(*reason)
        } else {
            self.shared.transition(PoolState::Draining);
            info!(
                pending = self.pending(),
                grace_secs = self.config.shutdown_grace.as_secs(),
                "Draining worker pool"
            );

            match self.shared.await_drained(self.config.shutdown_grace) {
                Drain::Complete => {
                    self.shared.transition(PoolState::Terminated);
                    info!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Worker pool terminated"
                    );
                    ShutdownOutcome::Terminated
                }
                Drain::TimedOut => {
                    warn!(
                        pending = self.pending(),
                        "Worker pool did not drain within grace period, forcing stop"
                    );
                    self.force_stop(StopReason::Timeout);
                    ShutdownOutcome::ForcedStop(StopReason::Timeout)
                }
                Drain::Interrupted => {
                    warn!("Interrupted while draining worker pool, forcing stop");
                    self.force_stop(StopReason::Interrupted);
                    ShutdownOutcome::ForcedStop(StopReason::Interrupted)
                }
            }
        };

        observability::record_shutdown(outcome.as_str(), started.elapsed().as_secs_f64());
        *recorded = Some(outcome);
        outcome
    }

    /// Cancel queued and running work immediately.
    ///
    /// Queued tasks never run and their handles resolve as cancelled;
    /// running tasks see their [`CancelToken`] tripped. No-op once the pool
    /// is terminal.
    pub fn force_stop(&self, reason: StopReason) {
        let mut state = write(&self.shared.state);
        if state.is_terminal() {
            return;
        }
        let _ = self.shared.forced_reason.set(reason);
        self.shared.cancel.cancel();
        debug!(from = %*state, reason = ?reason, "Worker pool state transition to FORCED_STOP");
        *state = PoolState::ForcedStop;
        observability::record_pool_state(PoolState::ForcedStop);
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PoolState {
        *read(&self.shared.state)
    }

    /// Number of worker threads.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.threads.current_num_threads()
    }

    /// Tasks submitted to pool threads that have not finished yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        *lock(&self.shared.pending)
    }

    /// Submissions that degraded to running on the caller.
    #[must_use]
    pub fn caller_runs(&self) -> u64 {
        self.shared.caller_runs.load(Ordering::Relaxed)
    }

    /// Interrupt flag observed by blocking waits on this pool.
    #[must_use]
    pub fn interrupt_handle(&self) -> Interrupt {
        self.shared.interrupt.clone()
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let already_shut_down = lock(&self.outcome).is_some();
        if !already_shut_down {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("state", &self.state())
            .field("threads", &self.config.core_threads)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn transition(&self, next: PoolState) {
        let mut state = write(&self.state);
        if state.can_transition_to(next) {
            debug!(from = %*state, to = %next, "Worker pool state transition");
            *state = next;
            observability::record_pool_state(next);
        }
    }

    fn task_started(&self) {
        *lock(&self.pending) += 1;
    }

    fn task_finished(&self) {
        let mut pending = lock(&self.pending);
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    fn await_drained(&self, grace: Duration) -> Drain {
        let deadline = Instant::now() + grace;
        let mut pending = lock(&self.pending);

        while *pending > 0 {
            if self.interrupt.is_raised() {
                return Drain::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return Drain::TimedOut;
            }
            let wait = (deadline - now).min(WAIT_POLL_INTERVAL);
            let (guard, _) = self
                .drained
                .wait_timeout(pending, wait)
                .unwrap_or_else(PoisonError::into_inner);
            pending = guard;
        }

        Drain::Complete
    }
}

fn run_guarded<T, F>(task: F, context: &TaskContext<'_>) -> Result<T, PoolError>
where
    F: FnOnce(&TaskContext<'_>) -> T,
{
    panic::catch_unwind(AssertUnwindSafe(|| task(context))).map_err(|payload| {
        PoolError::TaskPanicked {
            message: panic_message(payload.as_ref()),
        }
    })
}

/// Render a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

// Guarded values are plain counters and enums, valid even after a panic
// while locked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::AtomicBool;

    use rayon::prelude::*;

    use super::*;

    fn small_pool(threads: usize) -> WorkerPool {
        WorkerPool::new(PoolConfig {
            core_threads: threads,
            max_threads: threads,
            ..PoolConfig::dedicated()
        })
        .unwrap()
    }

    #[test]
    fn test_new_pool_is_running() {
        let pool = small_pool(2);

        assert_eq!(pool.state(), PoolState::Running);
        assert_eq!(pool.parallelism(), 2);
        assert_eq!(pool.pending(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = WorkerPool::new(PoolConfig {
            core_threads: 0,
            ..PoolConfig::dedicated()
        });

        assert!(matches!(result, Err(PoolError::InvalidConfig { .. })));
    }

    #[test]
    fn test_submit_and_join() {
        let pool = small_pool(2);

        let handle = pool.submit(|_| 21 * 2).unwrap();

        assert!(!handle.ran_on_caller());
        assert_eq!(handle.join(), Ok(42));
    }

    #[test]
    fn test_tasks_run_on_named_pool_threads() {
        let pool = small_pool(2);

        let name = pool
            .submit(|_| thread::current().name().map(str::to_string))
            .unwrap()
            .join()
            .unwrap()
            .unwrap();

        assert!(name.starts_with("risk-calc-"), "got {name}");
    }

    #[test]
    fn test_par_iter_inside_task_uses_pool_threads() {
        let pool = small_pool(3);

        let threads = pool
            .submit(|_| {
                (0..64)
                    .into_par_iter()
                    .map(|_| rayon::current_num_threads())
                    .collect::<Vec<_>>()
            })
            .unwrap()
            .join()
            .unwrap();

        assert!(threads.iter().all(|&n| n == 3));
    }

    #[test]
    fn test_panic_is_reported_through_handle() {
        let pool = small_pool(1);

        let result = pool.submit(|_| -> u32 { panic!("boom") }).unwrap().join();

        assert_eq!(
            result,
            Err(PoolError::TaskPanicked {
                message: "boom".to_string()
            })
        );
        // The pool survives a panicking task.
        assert_eq!(pool.submit(|_| 1).unwrap().join(), Ok(1));
    }

    #[test]
    fn test_shutdown_without_work_is_idempotent() {
        let pool = small_pool(1);

        assert_eq!(pool.shutdown(), ShutdownOutcome::Terminated);
        assert_eq!(pool.shutdown(), ShutdownOutcome::Terminated);
        assert_eq!(pool.state(), PoolState::Terminated);
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let pool = small_pool(1);
        pool.shutdown();

        let result = pool.submit(|_| ());

        assert!(matches!(
            result,
            Err(PoolError::Rejected {
                state: PoolState::Terminated
            })
        ));
    }

    #[test]
    fn test_shutdown_waits_for_in_flight_work() {
        let pool = small_pool(1);
        let finished = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&finished);
        let handle = pool
            .submit(move |_| {
                thread::sleep(Duration::from_millis(100));
                flag.store(true, Ordering::SeqCst);
                7
            })
            .unwrap();

        assert_eq!(pool.shutdown(), ShutdownOutcome::Terminated);
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(handle.join(), Ok(7));
    }

    #[test]
    fn test_shutdown_times_out_and_cancels() {
        let pool = WorkerPool::new(PoolConfig {
            core_threads: 1,
            max_threads: 1,
            shutdown_grace: Duration::from_millis(50),
            ..PoolConfig::dedicated()
        })
        .unwrap();

        // Cooperative task: spins until cancelled.
        let running = pool
            .submit(|cancel| {
                while !cancel.is_cancelled() {
                    thread::sleep(Duration::from_millis(5));
                }
                "stopped"
            })
            .unwrap();
        // Queued behind the spinning task on the single worker.
        let queued = pool.submit(|_| "ran").unwrap();

        assert_eq!(
            pool.shutdown(),
            ShutdownOutcome::ForcedStop(StopReason::Timeout)
        );
        assert_eq!(pool.state(), PoolState::ForcedStop);
        assert_eq!(running.join(), Ok("stopped"));
        assert_eq!(queued.join(), Err(PoolError::Cancelled));
        // Second call reports the same outcome without waiting.
        assert_eq!(
            pool.shutdown(),
            ShutdownOutcome::ForcedStop(StopReason::Timeout)
        );
    }

    #[test]
    fn test_interrupt_during_drain_forces_stop() {
        let pool = small_pool(1);
        let interrupt = pool.interrupt_handle();

        let _running = pool
            .submit(|cancel| {
                while !cancel.is_cancelled() {
                    thread::sleep(Duration::from_millis(5));
                }
            })
            .unwrap();

        let raiser = interrupt.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            raiser.raise();
        });

        assert_eq!(
            pool.shutdown(),
            ShutdownOutcome::ForcedStop(StopReason::Interrupted)
        );
        // The interrupt stays visible to the caller.
        assert!(interrupt.is_raised());
    }

    #[test]
    fn test_force_stop_before_shutdown() {
        let pool = small_pool(1);

        pool.force_stop(StopReason::Interrupted);

        assert_eq!(pool.state(), PoolState::ForcedStop);
        assert_eq!(
            pool.shutdown(),
            ShutdownOutcome::ForcedStop(StopReason::Interrupted)
        );
    }

    #[test]
    fn test_saturated_queue_runs_on_caller() {
        let pool = WorkerPool::new(PoolConfig {
            core_threads: 1,
            max_threads: 1,
            queue_capacity: Some(1),
            ..PoolConfig::dedicated()
        })
        .unwrap();

        let gate = Arc::new(Barrier::new(2));
        let worker_gate = Arc::clone(&gate);
        // Occupies the only worker until the barrier is released.
        let blocker = pool.submit(move |_| worker_gate.wait()).unwrap();
        // Wait until the worker has dequeued the blocker.
        while pool.shared.queued.load(Ordering::SeqCst) > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        // Fills the queue.
        let queued = pool.submit(|_| thread::current().id()).unwrap();
        // Queue full, no overflow threads: runs right here.
        let overflow = pool.submit(|_| thread::current().id()).unwrap();

        assert!(overflow.ran_on_caller());
        assert_eq!(overflow.join(), Ok(thread::current().id()));
        assert_eq!(pool.caller_runs(), 1);

        gate.wait();
        blocker.join().unwrap();
        assert_ne!(queued.join().unwrap(), thread::current().id());
    }

    #[test]
    fn test_saturated_queue_uses_overflow_threads_first() {
        let pool = WorkerPool::new(PoolConfig {
            core_threads: 1,
            max_threads: 2,
            queue_capacity: Some(1),
            ..PoolConfig::dedicated()
        })
        .unwrap();

        let gate = Arc::new(Barrier::new(2));
        let worker_gate = Arc::clone(&gate);
        let blocker = pool.submit(move |_| worker_gate.wait()).unwrap();
        while pool.shared.queued.load(Ordering::SeqCst) > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        let _queued = pool.submit(|_| ()).unwrap();

        let overflow = pool
            .submit(|_| thread::current().name().map(str::to_string))
            .unwrap();

        assert!(!overflow.ran_on_caller());
        assert_eq!(
            overflow.join().unwrap().as_deref(),
            Some("risk-calc-overflow")
        );
        assert_eq!(pool.caller_runs(), 0);

        gate.wait();
        blocker.join().unwrap();
        assert_eq!(pool.shutdown(), ShutdownOutcome::Terminated);
    }

    #[test]
    fn test_concurrent_submitters_respect_queue_bound() {
        let pool = Arc::new(
            WorkerPool::new(PoolConfig {
                core_threads: 1,
                max_threads: 1,
                queue_capacity: Some(2),
                ..PoolConfig::dedicated()
            })
            .unwrap(),
        );

        let gate = Arc::new(Barrier::new(2));
        let worker_gate = Arc::clone(&gate);
        let blocker = pool.submit(move |_| worker_gate.wait()).unwrap();
        while pool.shared.queued.load(Ordering::SeqCst) > 0 {
            thread::sleep(Duration::from_millis(1));
        }

        let start = Arc::new(Barrier::new(8));
        let submitters: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let start = Arc::clone(&start);
                thread::spawn(move || {
                    start.wait();
                    pool.submit(|_| ()).unwrap()
                })
            })
            .collect();
        let handles: Vec<_> = submitters.into_iter().map(|s| s.join().unwrap()).collect();

        let enqueued = handles.iter().filter(|h| !h.ran_on_caller()).count();
        assert_eq!(enqueued, 2);
        assert_eq!(pool.caller_runs(), 6);

        gate.wait();
        blocker.join().unwrap();
        for handle in handles {
            assert_eq!(handle.join(), Ok(()));
        }
    }

    #[test]
    fn test_caller_run_task_fans_out_on_pool_workers() {
        let pool = WorkerPool::new(PoolConfig {
            core_threads: 2,
            max_threads: 2,
            queue_capacity: Some(1),
            ..PoolConfig::dedicated()
        })
        .unwrap();
        let nap = |_: &TaskContext<'_>| thread::sleep(Duration::from_millis(100));

        let busy: Vec<_> = (0..2).map(|_| pool.submit(nap).unwrap()).collect();
        while pool.shared.queued.load(Ordering::SeqCst) > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        let queued = pool.submit(nap).unwrap();

        let degraded = pool
            .submit(|task| {
                task.install(|| {
                    (0..16)
                        .into_par_iter()
                        .map(|_| thread::current().name().map(str::to_string))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap();

        assert!(degraded.ran_on_caller());
        let names = degraded.join().unwrap();
        assert!(
            names
                .iter()
                .all(|n| n.as_deref().is_some_and(|n| n.starts_with("risk-calc-"))),
            "{names:?}"
        );
        for handle in busy {
            handle.join().unwrap();
        }
        queued.join().unwrap();
    }

    #[test]
    fn test_overflow_task_fans_out_on_pool_workers() {
        let pool = WorkerPool::new(PoolConfig {
            core_threads: 1,
            max_threads: 2,
            queue_capacity: Some(1),
            ..PoolConfig::dedicated()
        })
        .unwrap();

        let busy = pool
            .submit(|_| thread::sleep(Duration::from_millis(100)))
            .unwrap();
        while pool.shared.queued.load(Ordering::SeqCst) > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        let queued = pool.submit(|_| ()).unwrap();

        let overflow = pool
            .submit(|task| {
                let driver = thread::current().name().map(str::to_string);
                let worker = task.install(|| thread::current().name().map(str::to_string));
                (driver, worker)
            })
            .unwrap();

        let (driver, worker) = overflow.join().unwrap();
        assert_eq!(driver.as_deref(), Some("risk-calc-overflow"));
        assert_eq!(worker.as_deref(), Some("risk-calc-0"));
        busy.join().unwrap();
        queued.join().unwrap();
    }

    #[test]
    fn test_drop_shuts_down() {
        let pool = small_pool(1);
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let _handle = pool
            .submit(move |_| {
                thread::sleep(Duration::from_millis(50));
                flag.store(true, Ordering::SeqCst);
            })
            .unwrap();
        drop(pool);

        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panic_message_variants() {
        let static_str: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(5_u8);

        assert_eq!(panic_message(static_str.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
