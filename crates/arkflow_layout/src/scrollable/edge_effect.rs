//! Edge effects
//!
//! What a scrollable does with the part of a delta that runs past its
//! edge: spring lets the content overshoot and pulls it back, fade keeps
//! the content at the edge and shows a glow, none simply clamps.

use arkflow_animation::{Spring, SpringConfig};
use arkflow_core::geometry::near_zero;

/// Boundary behavior of a scrollable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeEffect {
    #[default]
    Spring,
    Fade,
    None,
}

/// How an overshoot is dealt with locally
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Absorption {
    /// Part of the delta to apply to the content offset
    pub applied: f32,
    /// Part nobody took
    pub rejected: f32,
    /// Amount shown as fade intensity instead of movement
    pub faded: f32,
}

/// Edge effect strategy of one scrollable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollableEdgeEffect {
    effect: EdgeEffect,
    spring: SpringConfig,
}

impl ScrollableEdgeEffect {
    pub fn new(effect: EdgeEffect) -> Self {
        Self {
            effect,
            spring: SpringConfig::default(),
        }
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    pub fn effect(&self) -> EdgeEffect {
        self.effect
    }

    /// True when overshoot is taken locally instead of being rejected
    pub fn absorbs(&self) -> bool {
        self.effect != EdgeEffect::None
    }

    /// Split `delta` whose overshoot is `over` between content and rejection
    pub fn absorb(&self, delta: f32, over: f32) -> Absorption {
        match self.effect {
            EdgeEffect::Spring => Absorption {
                applied: delta,
                rejected: 0.0,
                faded: 0.0,
            },
            EdgeEffect::Fade => Absorption {
                applied: delta - over,
                rejected: 0.0,
                faded: over.abs(),
            },
            EdgeEffect::None => Absorption {
                applied: delta - over,
                rejected: over,
                faded: 0.0,
            },
        }
    }

    /// Motion pulling `offset` back to `rest`, if a spring-back applies
    pub fn spring_back(&self, offset: f32, rest: f32, velocity: f32) -> Option<Spring> {
        if self.effect != EdgeEffect::Spring {
            return None;
        }
        if near_zero(offset - rest) && near_zero(velocity) {
            return None;
        }
        let mut spring = Spring::new(self.spring, offset).with_velocity(velocity);
        spring.set_target(rest);
        Some(spring)
    }
}

impl Default for ScrollableEdgeEffect {
    fn default() -> Self {
        Self::new(EdgeEffect::default())
    }
}

impl From<EdgeEffect> for ScrollableEdgeEffect {
    fn from(effect: EdgeEffect) -> Self {
        Self::new(effect)
    }
}
