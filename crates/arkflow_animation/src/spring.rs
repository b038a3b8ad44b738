//! Spring physics
//!
//! RK4-integrated damped spring used for edge spring-back.

use crate::motion::Motion;

/// Largest integration step; longer frames are subdivided
const MAX_STEP: f32 = 1.0 / 120.0;

/// Spring parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Fast, no visible overshoot
    pub const fn stiff() -> Self {
        Self::new(400.0, 40.0, 1.0)
    }

    /// Slow and slightly wobbly
    pub const fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }
}

impl Default for SpringConfig {
    /// Overscroll spring-back used by scrollable edges
    fn default() -> Self {
        Self::new(228.0, 30.0, 1.0)
    }
}

/// A damped spring moving toward a target
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_displacement: f32,
    rest_velocity: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, value: f32) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target: value,
            rest_displacement: 0.1,
            rest_velocity: 1.0,
        }
    }

    /// Start the spring with an initial velocity
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest_displacement
            && self.velocity.abs() < self.rest_velocity
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (-stiffness * (x - self.target) - damping * v) / mass.max(f32::EPSILON)
    }

    fn integrate(&mut self, dt: f32) {
        let (x, v) = (self.value, self.velocity);

        let (k1x, k1v) = (v, self.acceleration(x, v));
        let (k2x, k2v) = {
            let (x2, v2) = (x + k1x * dt / 2.0, v + k1v * dt / 2.0);
            (v2, self.acceleration(x2, v2))
        };
        let (k3x, k3v) = {
            let (x3, v3) = (x + k2x * dt / 2.0, v + k2v * dt / 2.0);
            (v3, self.acceleration(x3, v3))
        };
        let (k4x, k4v) = {
            let (x4, v4) = (x + k3x * dt, v + k3v * dt);
            (v4, self.acceleration(x4, v4))
        };

        self.value = x + dt / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + dt / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            self.integrate(h);
            remaining -= h;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }
}

impl Motion for Spring {
    fn step(&mut self, dt: f32) {
        Spring::step(self, dt);
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }

    fn is_finished(&self) -> bool {
        self.is_settled()
    }
}
