//! # Presence Capability
//!
//! The protocols never draw anything. They announce where their avatar is and
//! what it is doing through [`Presence`], and whoever implements it decides
//! what that looks like: a window, a log, or a test recorder.
//!
//! ```text
//!   pre-entrance ──> entrance                       (enter)
//!                        │
//!                        ├──> waiting chair i       (move_to)
//!                        ├──> barber chair          (move_to)
//!                        │
//!   post-exit    <── exit                           (leave)
//! ```

use serde::Deserialize;

/// A point on the shop floor.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point `ratio` of the way from `self` to `other`.
    #[must_use]
    pub fn lerp(self, other: Self, ratio: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * ratio,
            y: self.y + (other.y - self.y) * ratio,
        }
    }
}

/// What an avatar is doing, shown as its fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Free to act (green).
    Idle,
    /// Suspended on a gate or the waiting room (red).
    Blocked,
    /// Cutting hair (yellow).
    Working,
}

/// Side-effecting avatar controls issued by a protocol.
///
/// Every call is fire-and-forget from the protocol's point of view.
/// `move_to` may block the calling thread for an animation; the protocols
/// treat that as an ordinary suspension point and hold no lock across it.
pub trait Presence {
    /// Puts the avatar on the floor.
    fn enter(&mut self);

    /// Walks the avatar to `position`.
    fn move_to(&mut self, position: Position);

    /// Changes the avatar's activity tag.
    fn set_state(&mut self, activity: Activity);

    /// Walks the avatar out and removes it.
    fn leave(&mut self);
}

impl<P: Presence + ?Sized> Presence for Box<P> {
    fn enter(&mut self) {
        (**self).enter();
    }

    fn move_to(&mut self, position: Position) {
        (**self).move_to(position);
    }

    fn set_state(&mut self, activity: Activity) {
        (**self).set_state(activity);
    }

    fn leave(&mut self) {
        (**self).leave();
    }
}

/// A presence that does nothing. Useful for headless runs and benchmarks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Absent;

impl Presence for Absent {
    fn enter(&mut self) {}
    fn move_to(&mut self, _position: Position) {}
    fn set_state(&mut self, _activity: Activity) {}
    fn leave(&mut self) {}
}

/// Runs `wait` with the avatar shown as blocked, then back to idle.
pub(crate) fn blocked<P, R>(presence: &mut P, wait: impl FnOnce() -> R) -> R
where
    P: Presence + ?Sized,
{
    presence.set_state(Activity::Blocked);
    let result = wait();
    presence.set_state(Activity::Idle);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tags(Vec<Activity>);

    impl Presence for Tags {
        fn enter(&mut self) {}
        fn move_to(&mut self, _position: Position) {}
        fn set_state(&mut self, activity: Activity) {
            self.0.push(activity);
        }
        fn leave(&mut self) {}
    }

    #[test]
    fn test_distance_and_lerp() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(30.0, 40.0);

        assert!((a.distance_to(b) - 50.0).abs() < f32::EPSILON);
        assert_eq!(a.lerp(b, 0.5), Position::new(15.0, 20.0));
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_blocked_wraps_wait() {
        let mut tags = Tags::default();
        let value = blocked(&mut tags, || 7);

        assert_eq!(value, 7);
        assert_eq!(tags.0, vec![Activity::Blocked, Activity::Idle]);
    }
}
