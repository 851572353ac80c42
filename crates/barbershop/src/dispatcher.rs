//! # Dispatcher
//!
//! Opens the shop and turns arrivals into customer threads.
//!
//! ```text
//!   arrivals ──> Shop::admit ──spawn──> customer-N ──report──> departures
//!                     │
//!   Shop::open ──spawn──> barber (runs forever)
//! ```
//!
//! Every thread is detached. The barber never returns; customers report
//! their outcome on the departure channel instead of being joined.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use barbershop_core::{
    BarberProtocol, CustomerOutcome, CustomerProtocol, CustomerReport, ShopConfig, ShopError,
    ShopFloor, ShopResult, ShopStats, StatsSnapshot,
};
use crossbeam_channel::{select, unbounded, Receiver, Sender};

use crate::arrivals::Arrival;
use crate::stage::{Role, Stage};

/// A running shop: one barber thread plus whoever has been admitted.
#[derive(Debug)]
pub struct Shop {
    config: ShopConfig,
    floor: ShopFloor,
    stage: Stage,
    stats: Arc<ShopStats>,
    next_customer: AtomicU64,
    departures_tx: Sender<CustomerReport>,
    departures_rx: Receiver<CustomerReport>,
}

impl Shop {
    /// Validates `config`, builds the floor and starts the barber.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the barber
    /// thread cannot be spawned.
    pub fn open(config: ShopConfig) -> ShopResult<Self> {
        config.validate()?;

        let floor = ShopFloor::new(config.capacity);
        let stage = Stage::new(&config);
        let stats = Arc::new(ShopStats::new());
        let (departures_tx, departures_rx) = unbounded();

        let barber = BarberProtocol::new(
            floor.clone(),
            stage.avatar(Role::Barber),
            &config,
            Arc::clone(&stats),
        );
        thread::Builder::new()
            .name("barber".into())
            .spawn(move || {
                barber.run();
            })
            .map_err(|source| ShopError::Spawn { role: "barber", source })?;

        tracing::info!(
            capacity = config.capacity,
            service_ms = config.service_duration_ms,
            "shop open"
        );

        Ok(Self {
            config,
            floor,
            stage,
            stats,
            next_customer: AtomicU64::new(1),
            departures_tx,
            departures_rx,
        })
    }

    /// Spawns a customer thread and returns its number.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Spawn`] if the thread cannot be started.
    pub fn admit(&self) -> ShopResult<u64> {
        let id = self.next_customer.fetch_add(1, Ordering::Relaxed);
        let customer = CustomerProtocol::new(
            id,
            self.floor.clone(),
            self.stage.avatar(Role::Customer(id)),
            self.config.layout.clone(),
            Arc::clone(&self.stats),
        );
        let departures = self.departures_tx.clone();

        thread::Builder::new()
            .name(format!("customer-{id}"))
            .spawn(move || {
                let report = customer.run();
                // The shop owns a receiver, so this only fails once it is gone.
                let _ = departures.send(report);
            })
            .map_err(|source| ShopError::Spawn { role: "customer", source })?;

        tracing::debug!(customer = id, "admitted");
        Ok(id)
    }

    /// Customer reports, in the order customers finished.
    #[must_use]
    pub fn departures(&self) -> &Receiver<CustomerReport> {
        &self.departures_rx
    }

    /// The shared room and gates.
    #[must_use]
    pub fn floor(&self) -> &ShopFloor {
        &self.floor
    }

    /// The avatar registry.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Tally of one arrival run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Customers admitted.
    pub admitted: u64,
    /// Customers who got a haircut.
    pub served: u64,
    /// Customers turned away at the door.
    pub rejected: u64,
    /// Every report, in departure order.
    pub reports: Vec<CustomerReport>,
}

impl RunSummary {
    fn record(&mut self, report: CustomerReport) {
        match report.outcome {
            CustomerOutcome::Served { seat } => {
                self.served += 1;
                tracing::debug!(customer = report.id, seat, "departed");
            }
            CustomerOutcome::Rejected => self.rejected += 1,
        }
        self.reports.push(report);
    }
}

/// Admits one customer per arrival until the source closes, then waits for
/// everyone admitted to leave.
///
/// # Errors
///
/// Returns an error if a customer thread cannot be spawned.
pub fn run_arrivals(shop: &Shop, arrivals: &Receiver<Arrival>) -> ShopResult<RunSummary> {
    let mut summary = RunSummary::default();
    let mut outstanding = 0u64;
    let departures = shop.departures();

    loop {
        select! {
            recv(arrivals) -> arrival => match arrival {
                Ok(Arrival) => {
                    shop.admit()?;
                    summary.admitted += 1;
                    outstanding += 1;
                }
                Err(_) => break,
            },
            recv(departures) -> report => {
                let report = report.map_err(|_| ShopError::ChannelClosed("departures"))?;
                outstanding = outstanding.saturating_sub(1);
                summary.record(report);
            }
        }
    }

    tracing::info!(outstanding, "arrivals closed, waiting for the shop to empty");
    while outstanding > 0 {
        let report = departures.recv().map_err(|_| ShopError::ChannelClosed("departures"))?;
        outstanding -= 1;
        summary.record(report);
    }

    Ok(summary)
}
