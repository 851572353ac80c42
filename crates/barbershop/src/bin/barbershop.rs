//! Barbershop simulation binary.
//!
//! # Usage
//!
//! ```bash
//! # Ten scripted customers, one every 800ms plus up to 400ms of jitter
//! barbershop --customers 10 --arrival-ms 800 --jitter-ms 400
//!
//! # Press Enter to send a customer in, Ctrl-D to stop
//! barbershop --interactive
//!
//! # Floor plan and timings from a file, walks ten times faster
//! barbershop --config shop.toml --time-scale 0.1
//! ```

use std::io;
use std::time::Duration;

use barbershop::{run_arrivals, spawn_line_arrivals, ArrivalSchedule, Shop};
use barbershop_core::ShopConfig;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sleeping-barber shop simulation
#[derive(Parser, Debug)]
#[command(name = "barbershop")]
#[command(about = "One barber, a few waiting chairs, and a stream of customers")]
#[command(version)]
struct Args {
    /// TOML file with shop settings
    #[arg(short, long)]
    config: Option<String>,

    /// Number of waiting chairs (overrides the file)
    #[arg(long)]
    capacity: Option<usize>,

    /// Haircut length in milliseconds (overrides the file)
    #[arg(long)]
    service_ms: Option<u64>,

    /// Scripted customers to send in
    #[arg(short = 'n', long, default_value = "10")]
    customers: usize,

    /// Base gap between scripted arrivals in milliseconds
    #[arg(long, default_value = "1000")]
    arrival_ms: u64,

    /// Maximum extra gap added to each scripted arrival in milliseconds
    #[arg(long, default_value = "500")]
    jitter_ms: u64,

    /// Seed for the arrival jitter
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Read arrivals from stdin, one per line, instead of a script
    #[arg(short, long)]
    interactive: bool,

    /// Multiplier on walking time (0 = instant)
    #[arg(long)]
    time_scale: Option<f32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_thread_names(true)).with(filter).init();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path, "loading config");
            ShopConfig::load(path)?
        }
        None => ShopConfig::default(),
    };
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(service_ms) = args.service_ms {
        config.service_duration_ms = service_ms;
    }
    if let Some(time_scale) = args.time_scale {
        config.stage.time_scale = time_scale;
    }

    let shop = Shop::open(config)?;
    let (arrivals_tx, arrivals_rx) = crossbeam_channel::unbounded();

    if args.interactive {
        tracing::info!("press Enter to send a customer in, Ctrl-D to close the door");
        spawn_line_arrivals(io::BufReader::new(io::stdin()), arrivals_tx)?;
    } else {
        ArrivalSchedule {
            count: args.customers,
            interval: Duration::from_millis(args.arrival_ms),
            jitter: Duration::from_millis(args.jitter_ms),
            seed: args.seed,
        }
        .spawn(arrivals_tx)?;
    }

    let summary = run_arrivals(&shop, &arrivals_rx)?;
    let stats = shop.stats();

    tracing::info!(
        admitted = summary.admitted,
        served = summary.served,
        rejected = summary.rejected,
        peak_occupancy = stats.peak_occupancy,
        haircuts = stats.haircuts,
        "shop closed"
    );

    Ok(())
}
