//! Periodic registry reconciliation and route table publication.
//!
//! # Responsibilities
//! - Hold the currently published route table
//! - Fetch, build and publish a new table once per interval
//! - Keep serving the last good table when the registry is unavailable
//!
//! # Design Decisions
//! - Readers load an `Arc` snapshot; publishing is one pointer swap
//! - The fetch happens before anything is touched, so no lock spans I/O
//! - A failed cycle is not retried early; the next tick tries again

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::RegistryConfig;
use crate::observability::metrics;
use crate::registry::{FetchError, RegistryFetcher};
use crate::routing::table::RouteTable;

/// The currently published route table.
#[derive(Debug, Default)]
pub struct RouteStore {
    current: ArcSwap<RouteTable>,
}

impl RouteStore {
    /// Start with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a prepared table.
    pub fn with_table(table: RouteTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// Cheap snapshot for a single short read.
    pub fn load(&self) -> Guard<Arc<RouteTable>> {
        self.current.load()
    }

    /// Owned snapshot that may be held across awaits.
    pub fn load_full(&self) -> Arc<RouteTable> {
        self.current.load_full()
    }

    /// Replace the current table.
    pub fn publish(&self, table: RouteTable) -> Arc<RouteTable> {
        let table = Arc::new(table);
        self.current.store(Arc::clone(&table));
        table
    }
}

/// Summary of a successful reconcile cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub services: usize,
    pub entries: usize,
    pub domains: usize,
}

/// Keeps a [`RouteStore`] in step with the service registry.
pub struct Reconciler {
    fetcher: Arc<dyn RegistryFetcher>,
    store: Arc<RouteStore>,
    annotation_keys: Vec<String>,
    interval: Duration,
}

impl Reconciler {
    pub fn new(
        fetcher: Arc<dyn RegistryFetcher>,
        store: Arc<RouteStore>,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            fetcher,
            store,
            annotation_keys: config.annotation_keys.clone(),
            interval: Duration::from_secs(config.refresh_interval_secs),
        }
    }

    /// Override the refresh period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn store(&self) -> &Arc<RouteStore> {
        &self.store
    }

    /// Run one fetch-build-publish cycle.
    ///
    /// On fetch failure the published table is left exactly as it was.
    pub async fn reconcile_once(&self) -> Result<CycleReport, FetchError> {
        let records = match self.fetcher.fetch().await {
            Ok(records) => records,
            Err(e) => {
                metrics::record_refresh("failure");
                tracing::error!(
                    registry = self.fetcher.name(),
                    error = %e,
                    routes = self.store.load().len(),
                    "Registry fetch failed, keeping current routes"
                );
                return Err(e);
            }
        };

        let table = RouteTable::build(&records, &self.annotation_keys);
        let report = CycleReport {
            services: records.len(),
            entries: table.len(),
            domains: table.domains().len(),
        };
        self.store.publish(table);

        metrics::record_refresh("success");
        metrics::record_route_table(report.entries, report.domains);
        tracing::info!(
            registry = self.fetcher.name(),
            services = report.services,
            routes = report.entries,
            domains = report.domains,
            "Route table published"
        );
        Ok(report)
    }

    /// Reconcile every interval until shutdown.
    ///
    /// The first cycle runs one interval from now; start-up is expected to
    /// have called [`Reconciler::reconcile_once`] already.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Reconciler starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Failures are logged inside; the next tick retries.
                    let _ = self.reconcile_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Reconciler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Spawn [`Reconciler::run`] onto the runtime.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
