//! arkflow Animation System
//!
//! Motions, curves and the frame scheduler that drives them.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs for edge spring-back
//! - **Friction Motion**: exponential-decay flings after a drag is released
//! - **Tweens**: eased, fixed-duration transitions (opacity fades)
//! - **Scheduler**: delayed tasks and per-frame animation callbacks on a virtual clock
//! - **Cancelable Tasks**: single-slot timers whose stale fires are no-ops

pub mod cancelable;
pub mod easing;
pub mod friction;
pub mod motion;
pub mod scheduler;
pub mod spring;
pub mod tween;

pub use cancelable::CancelableTask;
pub use easing::Easing;
pub use friction::FrictionMotion;
pub use motion::Motion;
pub use scheduler::{AnimationId, AnimationScheduler, SharedScheduler, TaskId};
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
