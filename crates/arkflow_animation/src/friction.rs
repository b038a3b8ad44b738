//! Friction (fling) motion
//!
//! Velocity decays exponentially after the pointer is released:
//!
//! ```text
//! v(t) = v0 * e^(-k t)
//! x(t) = x0 + v0 / k * (1 - e^(-k t))
//! ```
//!
//! with `k = friction * FRICTION_SCALE`. The motion finishes once the
//! velocity drops below its threshold.

use arkflow_core::geometry::near_zero;

use crate::motion::Motion;

/// Converts a friction coefficient into a decay rate (per second)
pub const FRICTION_SCALE: f32 = 4.2;

/// Default friction coefficient for flings
pub const DEFAULT_FRICTION: f32 = 0.6;

/// Velocity (units per second) under which a fling is considered stopped
pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 10.0;

#[derive(Clone, Debug)]
pub struct FrictionMotion {
    decay: f32,
    initial_position: f32,
    initial_velocity: f32,
    elapsed: f32,
    velocity_threshold: f32,
}

impl FrictionMotion {
    pub fn new(friction: f32, position: f32, velocity: f32) -> Self {
        Self {
            decay: Self::decay_for(friction),
            initial_position: position,
            initial_velocity: velocity,
            elapsed: 0.0,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
        }
    }

    pub fn with_velocity_threshold(mut self, threshold: f32) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    /// Restart from a new position and velocity
    pub fn reset(&mut self, friction: f32, position: f32, velocity: f32) {
        self.decay = Self::decay_for(friction);
        self.initial_position = position;
        self.initial_velocity = velocity;
        self.elapsed = 0.0;
    }

    fn decay_for(friction: f32) -> f32 {
        // A zero friction would never stop
        friction.max(0.01) * FRICTION_SCALE
    }

    pub fn position_at(&self, t: f32) -> f32 {
        self.initial_position + self.initial_velocity / self.decay * (1.0 - (-self.decay * t).exp())
    }

    pub fn velocity_at(&self, t: f32) -> f32 {
        self.initial_velocity * (-self.decay * t).exp()
    }

    /// Position the motion converges to
    pub fn final_position(&self) -> f32 {
        self.initial_position + self.initial_velocity / self.decay
    }

    /// Time (seconds) until the velocity falls under the threshold
    pub fn duration(&self) -> f32 {
        let v0 = self.initial_velocity.abs();
        if v0 <= self.velocity_threshold || near_zero(v0) {
            return 0.0;
        }
        (v0 / self.velocity_threshold).ln() / self.decay
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Motion for FrictionMotion {
    fn step(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    fn value(&self) -> f32 {
        self.position_at(self.elapsed)
    }

    fn velocity(&self) -> f32 {
        self.velocity_at(self.elapsed)
    }

    fn is_finished(&self) -> bool {
        self.velocity().abs() < self.velocity_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fling_decelerates_toward_final_position() {
        let mut motion = FrictionMotion::new(DEFAULT_FRICTION, 0.0, 1000.0);
        let final_position = motion.final_position();
        assert!((final_position - 1000.0 / (0.6 * FRICTION_SCALE)).abs() < 0.01);

        let mut last = motion.value();
        let mut last_velocity = motion.velocity();
        while !motion.is_finished() {
            motion.step(1.0 / 60.0);
            assert!(motion.value() >= last);
            assert!(motion.velocity() <= last_velocity);
            last = motion.value();
            last_velocity = motion.velocity();
        }
        assert!(motion.value() < final_position);
        assert!(final_position - motion.value() < 5.0);
    }

    #[test]
    fn test_negative_velocity() {
        let mut motion = FrictionMotion::new(DEFAULT_FRICTION, 100.0, -500.0);
        motion.step(0.1);
        assert!(motion.value() < 100.0);
        assert!(motion.velocity() < 0.0);
    }

    #[test]
    fn test_slow_fling_is_already_finished() {
        let motion = FrictionMotion::new(DEFAULT_FRICTION, 0.0, 5.0);
        assert!(motion.is_finished());
        assert_eq!(motion.duration(), 0.0);
    }

    #[test]
    fn test_reset_restarts_clock() {
        let mut motion = FrictionMotion::new(DEFAULT_FRICTION, 0.0, 800.0);
        motion.step(0.5);
        motion.reset(DEFAULT_FRICTION, 0.0, -800.0);
        assert_eq!(motion.elapsed(), 0.0);
        assert_eq!(motion.value(), 0.0);
        assert_eq!(motion.velocity(), -800.0);
    }
}
