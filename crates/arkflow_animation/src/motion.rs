//! The motion abstraction driven by the scheduler

/// A one-dimensional value animated over time
///
/// Motions are stepped by the [`AnimationScheduler`](crate::AnimationScheduler)
/// once per frame. When [`Motion::is_finished`] turns true the scheduler
/// delivers the final value and retires the motion.
pub trait Motion: Send {
    /// Advance by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Current value
    fn value(&self) -> f32;

    /// Current velocity (units per second)
    fn velocity(&self) -> f32;

    fn is_finished(&self) -> bool;
}
