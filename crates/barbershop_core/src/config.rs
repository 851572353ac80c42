//! # Shop Configuration
//!
//! Loaded once at startup from TOML. Every key is optional; anything missing
//! falls back to the reference shop: three waiting chairs, a two second
//! haircut, avatars walking at 125 units per second.
//!
//! ```toml
//! capacity = 3
//! service_duration_ms = 2000
//!
//! [stage]
//! speed = 125.0
//! time_scale = 1.0
//!
//! [layout]
//! barber_chair = { x = 210.0, y = 240.0 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ShopError, ShopResult};
use crate::presence::Position;

/// Top-level shop configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    /// Number of waiting chairs.
    pub capacity: usize,
    /// How long one haircut takes (ms).
    pub service_duration_ms: u64,
    /// Avatar animation settings.
    pub stage: StageConfig,
    /// Where things are on the floor.
    pub layout: Layout,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            service_duration_ms: 2000,
            stage: StageConfig::default(),
            layout: Layout::default(),
        }
    }
}

impl ShopConfig {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails validation.
    pub fn from_toml_str(text: &str) -> ShopResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::ConfigIo`] if the file cannot be read, otherwise
    /// whatever [`ShopConfig::from_toml_str`] returns.
    pub fn load(path: impl AsRef<Path>) -> ShopResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ShopError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects values that cannot describe a working shop.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> ShopResult<()> {
        if self.capacity == 0 {
            return Err(ShopError::InvalidConfig(
                "capacity must be at least one waiting chair".to_string(),
            ));
        }
        if !(self.stage.speed.is_finite() && self.stage.speed > 0.0) {
            return Err(ShopError::InvalidConfig(format!(
                "stage speed must be positive, got {}",
                self.stage.speed
            )));
        }
        if !(self.stage.time_scale.is_finite() && self.stage.time_scale >= 0.0) {
            return Err(ShopError::InvalidConfig(format!(
                "stage time_scale must be zero or positive, got {}",
                self.stage.time_scale
            )));
        }
        if self.stage.step_ms == 0 {
            return Err(ShopError::InvalidConfig("stage step_ms must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Service duration as a [`Duration`].
    #[must_use]
    pub fn service_duration(&self) -> Duration {
        Duration::from_millis(self.service_duration_ms)
    }

    /// Same shop with a different service duration. Handy in tests.
    #[must_use]
    pub fn with_service_duration(mut self, duration: Duration) -> Self {
        self.service_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Same shop with a different capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Avatar animation settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Walking speed in floor units per second.
    pub speed: f32,
    /// Multiplier on animation wall time. Zero makes movement instant.
    pub time_scale: f32,
    /// Interpolation step (ms).
    pub step_ms: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            speed: 125.0,
            time_scale: 1.0,
            step_ms: 10,
        }
    }
}

/// Floor plan.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Where the barber cuts hair. Also the idle marker.
    pub barber_chair: Position,
    /// Where the barber stands between customers.
    pub barber_stand: Position,
    /// First waiting chair.
    pub first_waiting_chair: Position,
    /// Vertical distance between waiting chairs.
    pub waiting_chair_spacing: f32,
    /// Off-screen spawn point.
    pub pre_entrance: Position,
    /// Door on the way in.
    pub entrance: Position,
    /// Door on the way out.
    pub exit: Position,
    /// Off-screen despawn point.
    pub post_exit: Position,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            barber_chair: Position::new(210.0, 240.0),
            barber_stand: Position::new(100.0, 240.0),
            first_waiting_chair: Position::new(430.0, 120.0),
            waiting_chair_spacing: 120.0,
            pre_entrance: Position::new(670.0, -30.0),
            entrance: Position::new(610.0, 30.0),
            exit: Position::new(610.0, 450.0),
            post_exit: Position::new(670.0, 510.0),
        }
    }
}

impl Layout {
    /// Position of waiting chair `seat`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn waiting_chair(&self, seat: usize) -> Position {
        Position::new(
            self.first_waiting_chair.x,
            self.first_waiting_chair.y + self.waiting_chair_spacing * seat as f32,
        )
    }
}
