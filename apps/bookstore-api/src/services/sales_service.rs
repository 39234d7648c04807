//! # Sales Service
//!
//! Builds sales reports from the orders in a time window, on demand and on
//! a fixed schedule.
//!
//! ## Scheduler Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReportScheduler::new(service, every, timeout).start()                 │
//! │      ──► ReportSchedulerHandle { shutdown }                             │
//! │                                                                         │
//! │   loop {                                                                │
//! │     select! {                                                           │
//! │       interval.tick()  ──► trailing report ──► service.latest_report() │
//! │       shutdown         ──► break                                        │
//! │     }                                                                   │
//! │   }                                                                     │
//! │                                                                         │
//! │  The first tick fires at start, so a report exists right away. Every   │
//! │  clone of the service sees the same latest report, which is how        │
//! │  GET /sales/report/latest reads it.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use bookstore_core::SalesReport;
use bookstore_store::{RequestContext, StoreError, Stores};

/// Sales reporting errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SalesError {
    /// The window is empty or reversed.
    #[error("invalid report range: start {start} must be before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SalesResult<T> = Result<T, SalesError>;

// =============================================================================
// Service
// =============================================================================

/// Aggregates orders into [`SalesReport`]s.
#[derive(Debug, Clone)]
pub struct SalesService {
    stores: Stores,
    window: chrono::Duration,
    latest: Arc<RwLock<Option<SalesReport>>>,
}

impl SalesService {
    /// `window` is the length of the trailing report used when no bounds
    /// are given.
    pub fn new(stores: Stores, window: chrono::Duration) -> Self {
        SalesService {
            stores,
            window,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    pub fn window(&self) -> chrono::Duration {
        self.window
    }

    /// Most recent scheduled report, `None` until the first run finished.
    pub async fn latest_report(&self) -> Option<SalesReport> {
        self.latest.read().await.clone()
    }

    /// Report over orders created strictly between `start` and `end`.
    pub async fn generate_report(
        &self,
        ctx: &RequestContext,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SalesResult<SalesReport> {
        if start >= end {
            return Err(SalesError::InvalidRange { start, end });
        }

        let orders = self.stores.orders().in_time_range(ctx, start, end).await?;
        let report = SalesReport::from_orders(start, end, Utc::now(), &orders)
            .map_err(StoreError::from)?;

        debug!(
            %start,
            %end,
            orders = report.total_orders,
            revenue = %report.total_revenue,
            "Sales report generated"
        );
        Ok(report)
    }

    /// Report over the trailing window ending now.
    pub async fn trailing_report(&self, ctx: &RequestContext) -> SalesResult<SalesReport> {
        let end = Utc::now();
        self.generate_report(ctx, end - self.window, end).await
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Periodic trailing-window report.
pub struct ReportScheduler {
    service: SalesService,
    every: Duration,
    timeout: Duration,
}

/// Handle to a running [`ReportScheduler`].
#[derive(Debug)]
pub struct ReportSchedulerHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ReportSchedulerHandle {
    /// Stops the scheduler and waits for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            error!(error = %e, "Report scheduler task failed");
        }
    }
}

impl ReportScheduler {
    /// `every` is the report period; `timeout` bounds each run.
    pub fn new(service: SalesService, every: Duration, timeout: Duration) -> Self {
        ReportScheduler {
            service,
            every,
            timeout,
        }
    }

    /// Spawns the scheduler loop and returns its handle.
    pub fn start(self) -> ReportSchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));

        ReportSchedulerHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) {
        info!(
            every_secs = self.every.as_secs(),
            window_hours = self.service.window().num_hours(),
            "Report scheduler started"
        );

        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Report scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => self.refresh().await,
            }
        }
    }

    async fn refresh(&self) {
        let ctx = RequestContext::with_timeout(self.timeout);
        match self.service.trailing_report(&ctx).await {
            Ok(report) => {
                info!(
                    orders = report.total_orders,
                    revenue = %report.total_revenue,
                    top_books = report.top_selling_books.len(),
                    "Scheduled sales report ready"
                );
                *self.service.latest.write().await = Some(report);
            }
            Err(e) => error!(error = %e, "Scheduled sales report failed"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
