//! # Shop Error Types
//!
//! Everything that can go wrong outside the synchronization core.
//!
//! The gates and the waiting room never fail: they can only delay. A full
//! waiting room is not an error either, it is an [`Admission::Rejected`]
//! outcome. What remains is configuration and process plumbing.
//!
//! [`Admission::Rejected`]: crate::sync::Admission::Rejected

use thiserror::Error;

/// Errors that can occur while setting up or driving the shop.
#[derive(Error, Debug)]
pub enum ShopError {
    /// Configuration values that cannot describe a working shop.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ShopConfig`].
    ///
    /// [`ShopConfig`]: crate::config::ShopConfig
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The OS refused to start a barber or customer thread.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        /// Which task was being started.
        role: &'static str,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The arrival or departure channel closed while the shop still needed it.
    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),
}

/// Result type for shop operations.
pub type ShopResult<T> = Result<T, ShopError>;
