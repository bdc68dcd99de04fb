//! Periodic refresh scheduling.
//!
//! A [`PollingScheduler`] owns at most one repeating timer. Ticks fire on a
//! fixed wall-clock cadence; the first one arrives a full interval after
//! [`PollingScheduler::start`]. A tick that lands while the previous cycle is
//! still running is skipped and reported, so cycles from one scheduler never
//! overlap. Failed cycles are reported and never stop the timer.

use crate::error::MonitorError;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Receives the outcome of refresh cycles that did not complete normally.
pub trait ErrorObserver: Send + Sync {
    fn cycle_failed(&self, cycle: u64, error: &anyhow::Error);

    fn cycle_skipped(&self, _cycle: u64) {}
}

/// Observer that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ErrorObserver for TracingObserver {
    fn cycle_failed(&self, cycle: u64, error: &anyhow::Error) {
        tracing::error!("Refresh cycle {} failed: {:#}", cycle, error);
    }

    fn cycle_skipped(&self, cycle: u64) {
        tracing::warn!("Refresh cycle {} skipped: previous cycle still running", cycle);
    }
}

/// The active repeating timer.
struct RefreshCycleHandle {
    period: Duration,
    task: JoinHandle<()>,
}

pub struct PollingScheduler {
    active: Mutex<Option<RefreshCycleHandle>>,
    observer: Arc<dyn ErrorObserver>,
}

impl PollingScheduler {
    pub fn new(observer: Arc<dyn ErrorObserver>) -> Self {
        Self {
            active: Mutex::new(None),
            observer,
        }
    }

    /// Arm the timer. Any timer already running is cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&self, period: Duration, action: F) -> Result<(), MonitorError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        if period.is_zero() {
            return Err(MonitorError::InvalidInterval);
        }

        let mut active = self.lock_active();
        if let Some(previous) = active.take() {
            previous.task.abort();
            tracing::debug!("Replaced refresh timer ({:?})", previous.period);
        }

        let task = tokio::spawn(run_cycles(period, action, self.observer.clone()));
        *active = Some(RefreshCycleHandle { period, task });

        tracing::info!("Periodic refresh started (every {:?})", period);
        Ok(())
    }

    /// Cancel the timer and any cycle still in flight. Returns whether a timer was running.
    pub fn stop(&self) -> bool {
        match self.lock_active().take() {
            Some(handle) => {
                handle.task.abort();
                tracing::info!("Periodic refresh stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_active().is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.lock_active().as_ref().map(|h| h.period)
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<RefreshCycleHandle>> {
        // the guarded value is a plain handle, a poisoned lock still holds a usable one
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_cycles<F, Fut>(period: Duration, action: F, observer: Arc<dyn ErrorObserver>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Owned here so aborting this task also aborts the cycle in flight.
    let action = Arc::new(action);
    let mut in_flight: JoinSet<anyhow::Result<()>> = JoinSet::new();
    let mut running: Option<u64> = None;
    let mut cycle: u64 = 0;

    loop {
        tokio::select! {
            biased;

            Some(joined) = in_flight.join_next() => {
                // at most one cycle is in flight, so this is the one that finished
                let n = running.take().unwrap_or(cycle);
                match joined {
                    Ok(Ok(())) => tracing::debug!("Refresh cycle {} finished", n),
                    Ok(Err(e)) => observer.cycle_failed(n, &e),
                    Err(e) if e.is_panic() => {
                        let error = anyhow::anyhow!("refresh action panicked: {}", e);
                        observer.cycle_failed(n, &error);
                    }
                    Err(_) => {}
                }
            }

            _ = ticker.tick() => {
                cycle += 1;
                if !in_flight.is_empty() {
                    observer.cycle_skipped(cycle);
                    continue;
                }
                let action = action.clone();
                running = Some(cycle);
                in_flight.spawn(async move { action().await });
            }
        }
    }
}
