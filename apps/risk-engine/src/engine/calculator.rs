//! Risk calculator: dispatches a batch to one of the execution strategies.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{Level, debug, info, span, warn};

use super::error::EngineError;
use super::strategy::Strategy;
use crate::config::EngineConfig;
use crate::domain::{Portfolio, RiskMetric};
use crate::metric::{MetricFunction, MonteCarloMetric};
use crate::observability;
use crate::pool::{
    Interrupt, PoolConfig, PoolError, PoolState, ShutdownOutcome, StopReason, WorkerPool,
    panic_message,
};

/// Computes risk metrics for batches of portfolios.
///
/// Owns a dedicated [`WorkerPool`], created with the calculator and torn
/// down by [`shutdown`](Self::shutdown) (or on drop).
pub struct RiskCalculator<M: MetricFunction = MonteCarloMetric> {
    metric: Arc<M>,
    pool: WorkerPool,
}

impl RiskCalculator<MonteCarloMetric> {
    /// Calculator with the default Monte Carlo metric and a dedicated pool
    /// sized to the logical processor count.
    ///
    /// # Errors
    ///
    /// Returns error if the dedicated pool cannot be built.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_metric(MonteCarloMetric::default(), PoolConfig::dedicated())
    }

    /// Calculator built from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the dedicated pool cannot be built.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::with_metric(
            MonteCarloMetric::new(config.metric.into()),
            config.pool.to_pool_config(),
        )
    }
}

impl<M: MetricFunction + 'static> RiskCalculator<M> {
    /// Calculator with a custom metric function and pool configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the dedicated pool cannot be built.
    pub fn with_metric(metric: M, pool_config: PoolConfig) -> Result<Self, EngineError> {
        let pool = WorkerPool::new(pool_config)?;

        info!(
            dedicated_threads = pool.parallelism(),
            shared_threads = rayon::current_num_threads(),
            "Risk calculator ready"
        );

        Ok(Self {
            metric: Arc::new(metric),
            pool,
        })
    }

    /// Compute metrics for `portfolios` with the given strategy.
    ///
    /// An empty batch returns immediately without touching any pool.
    ///
    /// # Errors
    ///
    /// Returns the first failure seen; no partial results are returned.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run(
        &self,
        strategy: Strategy,
        portfolios: &[Portfolio],
    ) -> Result<Vec<RiskMetric>, EngineError> {
        if portfolios.is_empty() {
            return Ok(Vec::new());
        }

        let _span = span!(
            Level::INFO,
            "risk_batch",
            strategy = %strategy,
            size = portfolios.len()
        )
        .entered();
        let start = Instant::now();

        let result = match strategy {
            Strategy::Sequential => self.execute_sequential(portfolios),
            Strategy::ParallelShared => self.execute_shared(portfolios),
            Strategy::ParallelDedicated => self.execute_dedicated(portfolios),
        };

        let elapsed = start.elapsed();
        let status = match &result {
            Ok(_) => {
                info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Risk batch complete"
                );
                "ok"
            }
            Err(e) => {
                warn!(error = %e, "Risk batch failed");
                "error"
            }
        };
        observability::record_batch(
            strategy.as_str(),
            status,
            portfolios.len(),
            elapsed.as_secs_f64(),
        );

        result
    }

    /// Compute metrics one portfolio at a time on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Computation`] if the metric function fails.
    pub fn run_sequential(&self, portfolios: &[Portfolio]) -> Result<Vec<RiskMetric>, EngineError> {
        self.run(Strategy::Sequential, portfolios)
    }

    /// Compute metrics on rayon's process-wide pool.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Computation`] if the metric function fails.
    pub fn run_parallel_shared(
        &self,
        portfolios: &[Portfolio],
    ) -> Result<Vec<RiskMetric>, EngineError> {
        self.run(Strategy::ParallelShared, portfolios)
    }

    /// Compute metrics on the calculator's dedicated pool, blocking until done.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Computation`] if the metric function fails,
    /// [`EngineError::Interrupted`] if the wait is interrupted, or
    /// [`EngineError::Pool`] if the pool has been shut down.
    pub fn run_parallel_dedicated(
        &self,
        portfolios: &[Portfolio],
    ) -> Result<Vec<RiskMetric>, EngineError> {
        self.run(Strategy::ParallelDedicated, portfolios)
    }

    fn execute_sequential(&self, portfolios: &[Portfolio]) -> Result<Vec<RiskMetric>, EngineError> {
        portfolios
            .iter()
            .map(|portfolio| compute_guarded(self.metric.as_ref(), portfolio))
            .collect()
    }

    fn execute_shared(&self, portfolios: &[Portfolio]) -> Result<Vec<RiskMetric>, EngineError> {
        // Indexed collect: results land at their input position whatever
        // order the workers finish in.
        portfolios
            .par_iter()
            .map(|portfolio| compute_guarded(self.metric.as_ref(), portfolio))
            .collect()
    }

    fn execute_dedicated(&self, portfolios: &[Portfolio]) -> Result<Vec<RiskMetric>, EngineError> {
        let metric = Arc::clone(&self.metric);
        let batch: Arc<[Portfolio]> = Arc::from(portfolios);

        // One bulk task; its par_iter splits across the dedicated pool's
        // workers by work-stealing, even when the task itself was pushed
        // onto an overflow thread or the calling thread.
        let handle = self.pool.submit(move |task| {
            let cancel = task.cancel_token();
            task.install(|| {
                batch
                    .par_iter()
                    .map(|portfolio| {
                        if cancel.is_cancelled() {
                            return Err(EngineError::Cancelled);
                        }
                        compute_guarded(metric.as_ref(), portfolio)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
        })?;

        if handle.ran_on_caller() {
            debug!("Dedicated pool saturated, batch driven from calling thread");
        }

        match handle.join() {
            Ok(result) => result,
            Err(PoolError::Interrupted) => {
                warn!("Interrupted while awaiting batch, forcing dedicated pool stop");
                self.pool.force_stop(StopReason::Interrupted);
                Err(EngineError::Interrupted)
            }
            Err(PoolError::Cancelled) => Err(EngineError::Cancelled),
            Err(e) => Err(e.into()),
        }
    }

    /// Tear down the dedicated pool.
    ///
    /// Waits for in-flight batches up to the grace period, then cancels what
    /// is left. Idempotent: later calls return the first outcome immediately.
    pub fn shutdown(&self) -> ShutdownOutcome {
        self.pool.shutdown()
    }

    /// Lifecycle state of the dedicated pool.
    #[must_use]
    pub fn pool_state(&self) -> PoolState {
        self.pool.state()
    }

    /// Interrupt flag for callers blocked on the dedicated pool.
    #[must_use]
    pub fn interrupt_handle(&self) -> Interrupt {
        self.pool.interrupt_handle()
    }

    /// Worker threads in the dedicated pool.
    #[must_use]
    pub fn dedicated_parallelism(&self) -> usize {
        self.pool.parallelism()
    }

    /// The metric function in use.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }
}

impl<M: MetricFunction> std::fmt::Debug for RiskCalculator<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskCalculator")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

/// Run the metric function, turning a panic into a computation failure.
fn compute_guarded<M: MetricFunction + ?Sized>(
    metric: &M,
    portfolio: &Portfolio,
) -> Result<RiskMetric, EngineError> {
    panic::catch_unwind(AssertUnwindSafe(|| metric.compute(portfolio))).map_err(|payload| {
        EngineError::Computation {
            portfolio_id: portfolio.id().to_string(),
            message: panic_message(payload.as_ref()),
        }
    })
}
