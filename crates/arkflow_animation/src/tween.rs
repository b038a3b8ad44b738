//! Timed interpolation between two values

use crate::easing::Easing;
use crate::motion::Motion;

/// Animates from `from` to `to` over a fixed duration
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: u32,
    easing: Easing,
    elapsed_ms: f32,
    last_value: f32,
    velocity: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: Easing::Linear,
            elapsed_ms: 0.0,
            last_value: from,
            velocity: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Progress in 0.0..=1.0
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms as f32).min(1.0)
    }
}

impl Motion for Tween {
    fn step(&mut self, dt: f32) {
        self.elapsed_ms += dt.max(0.0) * 1000.0;
        let value = self.value();
        if dt > 0.0 {
            self.velocity = (value - self.last_value) / dt;
        }
        self.last_value = value;
    }

    fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }

    fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}
