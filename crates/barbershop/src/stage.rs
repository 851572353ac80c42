//! # Stage
//!
//! The avatar registry behind every [`Presence`]. Each thread gets its own
//! [`Avatar`]; all avatars share one registry so a renderer can take a
//! [`Stage::snapshot`] at any time.
//!
//! Movement is real: `move_to` walks in a straight line at the configured
//! speed, updating the registry every step, and blocks the calling thread for
//! as long as the walk takes. A `time_scale` of zero makes every walk instant.
//!
//! Misuse (entering twice, acting while not on stage) is reported through
//! `tracing` and otherwise ignored. The protocols never look at it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use barbershop_core::{Activity, Layout, Position, Presence, ShopConfig, StageConfig};
use parking_lot::Mutex;

/// Who an avatar stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The barber.
    Barber,
    /// Customer with this number.
    Customer(u64),
}

/// What a renderer needs to draw one avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarView {
    /// Registry key.
    pub id: u64,
    /// Who this is.
    pub role: Role,
    /// Where it is right now.
    pub position: Position,
    /// Fill color.
    pub activity: Activity,
}

struct StageInner {
    avatars: Mutex<HashMap<u64, AvatarView>>,
    next_id: AtomicU64,
    diagnostics: AtomicU64,
    config: StageConfig,
    layout: Layout,
}

/// Shared avatar registry.
#[derive(Clone)]
pub struct Stage {
    inner: Arc<StageInner>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("avatars", &self.inner.avatars.lock().len())
            .field("diagnostics", &self.diagnostics())
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Creates an empty stage for `config`'s floor plan and animation settings.
    #[must_use]
    pub fn new(config: &ShopConfig) -> Self {
        Self {
            inner: Arc::new(StageInner {
                avatars: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                diagnostics: AtomicU64::new(0),
                config: config.stage.clone(),
                layout: config.layout.clone(),
            }),
        }
    }

    /// Hands out a fresh avatar. It is not on stage until it enters.
    #[must_use]
    pub fn avatar(&self, role: Role) -> Avatar {
        Avatar {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            role,
            stage: self.clone(),
        }
    }

    /// Everyone currently on stage, ordered by registry key.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AvatarView> {
        let mut views: Vec<AvatarView> = self.inner.avatars.lock().values().copied().collect();
        views.sort_unstable_by_key(|view| view.id);
        views
    }

    /// Number of misuse reports so far.
    #[must_use]
    pub fn diagnostics(&self) -> u64 {
        self.inner.diagnostics.load(Ordering::Relaxed)
    }

    fn report(&self, id: u64, role: Role, message: &str) {
        self.inner.diagnostics.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(avatar = id, ?role, "{message}");
    }

    fn position_of(&self, id: u64) -> Option<Position> {
        self.inner.avatars.lock().get(&id).map(|view| view.position)
    }

    fn place(&self, id: u64, position: Position) {
        if let Some(view) = self.inner.avatars.lock().get_mut(&id) {
            view.position = position;
        }
    }

    fn walk_time(&self, distance: f32) -> Duration {
        let config = &self.inner.config;
        let seconds = f64::from(distance) / f64::from(config.speed) * f64::from(config.time_scale);
        if seconds.is_nan() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        // Crawling speeds and huge scales saturate instead of overflowing.
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// Interpolates from the current position to `destination`.
    fn walk(&self, id: u64, destination: Position) {
        let Some(start) = self.position_of(id) else {
            return;
        };

        let duration = self.walk_time(start.distance_to(destination));
        let step = Duration::from_millis(self.inner.config.step_ms);
        let began = Instant::now();

        loop {
            let elapsed = began.elapsed();
            if elapsed >= duration {
                break;
            }
            #[allow(clippy::cast_possible_truncation)]
            let ratio = (elapsed.as_secs_f64() / duration.as_secs_f64()) as f32;
            self.place(id, start.lerp(destination, ratio));
            thread::sleep(step.min(duration - elapsed));
        }

        self.place(id, destination);
    }
}

/// One thread's avatar.
#[derive(Debug)]
pub struct Avatar {
    id: u64,
    role: Role,
    stage: Stage,
}

impl Avatar {
    /// Registry key.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the avatar is currently on stage.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.stage.position_of(self.id).is_some()
    }
}

impl Presence for Avatar {
    fn enter(&mut self) {
        let layout = &self.stage.inner.layout;
        {
            let mut avatars = self.stage.inner.avatars.lock();
            if avatars.contains_key(&self.id) {
                drop(avatars);
                self.stage.report(self.id, self.role, "tried to enter a second time");
                return;
            }
            avatars.insert(
                self.id,
                AvatarView {
                    id: self.id,
                    role: self.role,
                    position: layout.pre_entrance,
                    activity: Activity::Idle,
                },
            );
        }

        self.stage.walk(self.id, layout.entrance);
    }

    fn move_to(&mut self, position: Position) {
        if !self.is_present() {
            self.stage.report(self.id, self.role, "tried to move while not on stage");
            return;
        }
        self.stage.walk(self.id, position);
    }

    fn set_state(&mut self, activity: Activity) {
        let mut avatars = self.stage.inner.avatars.lock();
        match avatars.get_mut(&self.id) {
            Some(view) => view.activity = activity,
            None => {
                drop(avatars);
                self.stage.report(self.id, self.role, "tried to change state while not on stage");
            }
        }
    }

    fn leave(&mut self) {
        if !self.is_present() {
            self.stage.report(self.id, self.role, "tried to leave, but it wasn't there");
            return;
        }

        let layout = &self.stage.inner.layout;
        self.stage.walk(self.id, layout.exit);
        self.stage.walk(self.id, layout.post_exit);
        self.stage.inner.avatars.lock().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_stage() -> Stage {
        let mut config = ShopConfig::default();
        config.stage.time_scale = 0.0;
        Stage::new(&config)
    }

    #[test]
    fn test_enter_move_leave() {
        let stage = instant_stage();
        let layout = Layout::default();
        let mut avatar = stage.avatar(Role::Customer(1));
        assert!(!avatar.is_present());

        avatar.enter();
        let views = stage.snapshot();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].position, layout.entrance);
        assert_eq!(views[0].role, Role::Customer(1));

        avatar.move_to(layout.barber_chair);
        avatar.set_state(Activity::Blocked);
        let view = stage.snapshot()[0];
        assert_eq!(view.position, layout.barber_chair);
        assert_eq!(view.activity, Activity::Blocked);

        avatar.leave();
        assert!(stage.snapshot().is_empty());
        assert_eq!(stage.diagnostics(), 0);
    }

    #[test]
    fn test_double_enter_is_reported() {
        let stage = instant_stage();
        let mut avatar = stage.avatar(Role::Barber);

        avatar.enter();
        avatar.enter();

        assert_eq!(stage.snapshot().len(), 1);
        assert_eq!(stage.diagnostics(), 1);
    }

    #[test]
    fn test_acting_while_absent_is_reported() {
        let stage = instant_stage();
        let mut avatar = stage.avatar(Role::Customer(3));

        avatar.leave();
        avatar.move_to(Position::new(1.0, 1.0));
        avatar.set_state(Activity::Working);

        assert!(stage.snapshot().is_empty());
        assert_eq!(stage.diagnostics(), 3);
    }

    #[test]
    fn test_walk_takes_scaled_time() {
        let mut config = ShopConfig::default();
        config.stage.speed = 1000.0;
        config.stage.time_scale = 1.0;
        config.stage.step_ms = 5;
        let stage = Stage::new(&config);

        // 100 units at 1000 units/s.
        assert_eq!(stage.walk_time(100.0), Duration::from_millis(100));

        let mut avatar = stage.avatar(Role::Barber);
        avatar.enter();
        let from = config.layout.entrance;
        let began = Instant::now();
        avatar.move_to(Position::new(from.x - 100.0, from.y));
        assert!(began.elapsed() >= Duration::from_millis(100));
        assert_eq!(stage.snapshot()[0].position, Position::new(from.x - 100.0, from.y));
    }

    #[test]
    fn test_walk_time_saturates() {
        let mut config = ShopConfig::default();
        config.stage.speed = 1e-30;
        assert!(config.validate().is_ok());
        assert_eq!(Stage::new(&config).walk_time(100.0), Duration::MAX);

        let mut config = ShopConfig::default();
        config.stage.time_scale = f32::MAX;
        assert!(config.validate().is_ok());
        assert_eq!(Stage::new(&config).walk_time(100.0), Duration::MAX);
    }

    #[test]
    fn test_avatars_get_distinct_ids() {
        let stage = instant_stage();
        let a = stage.avatar(Role::Barber);
        let b = stage.avatar(Role::Customer(0));
        assert_ne!(a.id(), b.id());
    }
}
