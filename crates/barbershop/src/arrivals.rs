//! # Arrival Sources
//!
//! Producers that feed [`Arrival`]s into a channel. The dispatcher admits one
//! customer per message and stops once the sender side is dropped.
//!
//! - [`ArrivalSchedule`]: a fixed number of arrivals at a base interval plus
//!   seeded jitter. Same seed, same gaps.
//! - [`spawn_line_arrivals`]: one arrival per input line (stdin in the
//!   binary), closing at end of input.

use std::io::BufRead;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use barbershop_core::{ShopError, ShopResult};
use crossbeam_channel::Sender;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One customer walking up to the door.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arrival;

/// Scripted arrivals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalSchedule {
    /// How many customers show up.
    pub count: usize,
    /// Base gap between two arrivals.
    pub interval: Duration,
    /// Upper bound of the random extra added to each gap.
    pub jitter: Duration,
    /// Jitter seed.
    pub seed: u64,
}

impl ArrivalSchedule {
    /// Gap before each arrival. The first customer arrives immediately.
    #[must_use]
    pub fn gaps(&self) -> Vec<Duration> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);

        (0..self.count)
            .map(|index| {
                if index == 0 {
                    return Duration::ZERO;
                }
                let extra = if jitter_ms == 0 { 0 } else { rng.gen_range(0..=jitter_ms) };
                self.interval + Duration::from_millis(extra)
            })
            .collect()
    }

    /// Plays the schedule on its own thread. The sender is dropped when the
    /// last arrival has been sent.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Spawn`] if the thread cannot be started.
    pub fn spawn(self, arrivals: Sender<Arrival>) -> ShopResult<JoinHandle<()>> {
        let gaps = self.gaps();
        tracing::info!(count = self.count, seed = self.seed, "scripted arrivals");

        thread::Builder::new()
            .name("arrivals".into())
            .spawn(move || {
                for gap in gaps {
                    thread::sleep(gap);
                    if arrivals.send(Arrival).is_err() {
                        tracing::warn!("dispatcher gone, stopping arrivals");
                        return;
                    }
                }
            })
            .map_err(|source| ShopError::Spawn { role: "arrivals", source })
    }
}

/// Sends one arrival per line read from `input` until end of input or a
/// read error.
///
/// # Errors
///
/// Returns [`ShopError::Spawn`] if the thread cannot be started.
pub fn spawn_line_arrivals<R>(input: R, arrivals: Sender<Arrival>) -> ShopResult<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("arrivals".into())
        .spawn(move || {
            for line in input.lines() {
                if let Err(error) = line {
                    tracing::warn!(%error, "input closed");
                    break;
                }
                if arrivals.send(Arrival).is_err() {
                    break;
                }
            }
            tracing::info!("no more arrivals");
        })
        .map_err(|source| ShopError::Spawn { role: "arrivals", source })
}
