//! Animation scheduler
//!
//! Owns every delayed task and running motion, and advances them on a
//! virtual clock each frame. All callbacks run on the thread calling
//! [`AnimationScheduler::tick`], with the scheduler unlocked, so a callback
//! may freely post new tasks or stop animations (including its own).

use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::motion::Motion;

new_key_type! {
    pub struct TaskId;
    pub struct AnimationId;
}

/// Shared handle to a scheduler; patterns keep `Weak` copies of it
pub type SharedScheduler = Arc<Mutex<AnimationScheduler>>;

/// One-shot task run when its delay elapses
pub type Task = Box<dyn FnOnce() + Send>;
/// Receives the motion value every frame
pub type FrameCallback = Box<dyn FnMut(f32) + Send>;
/// Runs once when a motion finishes on its own
pub type FinishCallback = Box<dyn FnOnce() + Send>;

struct DelayedTask {
    due_ms: f64,
    seq: u64,
    task: Task,
}

struct ActiveAnimation {
    seq: u64,
    motion: Box<dyn Motion>,
    /// `None` while the callback is being invoked by `tick`
    on_frame: Option<FrameCallback>,
    on_finish: Option<FinishCallback>,
}

/// Frame work collected under the lock and run after it is released
struct FrameWork {
    id: AnimationId,
    seq: u64,
    value: f32,
    on_frame: Option<FrameCallback>,
    /// Present only when the motion finished this frame
    on_finish: Option<Option<FinishCallback>>,
}

/// The scheduler that drives delayed tasks and animations
pub struct AnimationScheduler {
    now_ms: f64,
    next_seq: u64,
    tasks: SlotMap<TaskId, DelayedTask>,
    animations: SlotMap<AnimationId, ActiveAnimation>,
    /// Finished during the current tick, final frame not delivered yet
    finishing: SmallVec<[AnimationId; 4]>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_seq: 0,
            tasks: SlotMap::with_key(),
            animations: SlotMap::with_key(),
            finishing: SmallVec::new(),
        }
    }

    /// Create a scheduler behind a shared handle
    pub fn shared() -> SharedScheduler {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Virtual time in milliseconds since creation
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Run `task` once `delay_ms` milliseconds have elapsed
    pub fn post_delayed_task<F>(&mut self, delay_ms: u64, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let seq = self.next_seq();
        let due_ms = self.now_ms + delay_ms as f64;
        tracing::trace!(delay_ms, due_ms, "post delayed task");
        self.tasks.insert(DelayedTask {
            due_ms,
            seq,
            task: Box::new(task),
        })
    }

    /// Cancel a pending task. Returns false when it already ran or was cancelled.
    pub fn cancel_task(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_task_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Start driving `motion`
    ///
    /// `on_frame` receives the motion value after every step, including the
    /// final one. `on_finish` runs once, after the final frame, only when the
    /// motion finishes by itself; [`stop_animation`](Self::stop_animation)
    /// drops it.
    pub fn start_animation<M, F, D>(&mut self, motion: M, on_frame: F, on_finish: D) -> AnimationId
    where
        M: Motion + 'static,
        F: FnMut(f32) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let seq = self.next_seq();
        self.animations.insert(ActiveAnimation {
            seq,
            motion: Box::new(motion),
            on_frame: Some(Box::new(on_frame)),
            on_finish: Some(Box::new(on_finish)),
        })
    }

    /// Stop an animation without running its finish callback
    ///
    /// Also applies to an animation that finished this tick but whose final
    /// frame has not been delivered yet.
    pub fn stop_animation(&mut self, id: AnimationId) -> bool {
        let stopped = self.animations.remove(id).is_some() || self.take_finishing(id);
        if stopped {
            tracing::trace!(?id, "animation stopped");
        }
        stopped
    }

    fn take_finishing(&mut self, id: AnimationId) -> bool {
        match self.finishing.iter().position(|f| *f == id) {
            Some(index) => {
                self.finishing.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Still owed a frame this tick
    fn is_live(&self, id: AnimationId) -> bool {
        self.animations.contains_key(id) || self.finishing.contains(&id)
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.animations.contains_key(id)
    }

    /// Latest value of a running animation
    pub fn animation_value(&self, id: AnimationId) -> Option<f32> {
        self.animations.get(id).map(|a| a.motion.value())
    }

    /// Latest velocity of a running animation
    pub fn animation_velocity(&self, id: AnimationId) -> Option<f32> {
        self.animations.get(id).map(|a| a.motion.velocity())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// True while any task is pending or any animation is running
    pub fn has_pending_work(&self) -> bool {
        !self.tasks.is_empty() || !self.animations.is_empty()
    }

    /// Collect due tasks and step every animation (called under the lock)
    fn collect(&mut self, dt_ms: f32) -> (Vec<Task>, Vec<FrameWork>) {
        self.now_ms += dt_ms.max(0.0) as f64;
        let now = self.now_ms;

        let mut due: SmallVec<[(f64, u64, TaskId); 4]> = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due_ms <= now)
            .map(|(id, t)| (t.due_ms, t.seq, id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let tasks = due
            .into_iter()
            .filter_map(|(_, _, id)| self.tasks.remove(id).map(|t| t.task))
            .collect();

        let dt = dt_ms.max(0.0) / 1000.0;
        let mut frames = Vec::with_capacity(self.animations.len());
        let mut finished: SmallVec<[AnimationId; 4]> = SmallVec::new();
        for (id, animation) in self.animations.iter_mut() {
            animation.motion.step(dt);
            let done = animation.motion.is_finished();
            if done {
                finished.push(id);
            }
            frames.push(FrameWork {
                id,
                seq: animation.seq,
                value: animation.motion.value(),
                on_frame: animation.on_frame.take(),
                on_finish: None,
            });
        }
        self.finishing.clear();
        for id in finished {
            if let Some(animation) = self.animations.remove(id) {
                if let Some(work) = frames.iter_mut().find(|w| w.id == id) {
                    work.on_finish = Some(animation.on_finish);
                    self.finishing.push(id);
                }
            }
        }
        frames.sort_by_key(|w| w.seq);

        (tasks, frames)
    }

    /// Advance the shared scheduler by `dt_ms` milliseconds
    ///
    /// Due tasks run first (in due order), then frame callbacks in the order
    /// the animations were started.
    pub fn tick(scheduler: &SharedScheduler, dt_ms: f32) {
        let (tasks, frames) = {
            let Ok(mut guard) = scheduler.lock() else {
                return;
            };
            guard.collect(dt_ms)
        };

        for task in tasks {
            task();
        }

        for mut work in frames {
            // An earlier callback this tick may have stopped it
            let live = match scheduler.lock() {
                Ok(guard) => guard.is_live(work.id),
                Err(_) => false,
            };
            if !live {
                continue;
            }
            if let Some(callback) = work.on_frame.as_mut() {
                callback(work.value);
            }
            match work.on_finish {
                Some(on_finish) => {
                    let still_owed = match scheduler.lock() {
                        Ok(mut guard) => guard.take_finishing(work.id),
                        Err(_) => false,
                    };
                    if let (true, Some(on_finish)) = (still_owed, on_finish) {
                        on_finish();
                    }
                }
                None => {
                    // Hand the callback back unless the animation was stopped meanwhile
                    let Ok(mut guard) = scheduler.lock() else {
                        continue;
                    };
                    if let Some(animation) = guard.animations.get_mut(work.id) {
                        if animation.on_frame.is_none() {
                            animation.on_frame = work.on_frame.take();
                        }
                    }
                }
            }
        }
    }

    /// Tick repeatedly with a fixed frame interval until idle or `max_frames` ran
    pub fn run_until_idle(scheduler: &SharedScheduler, frame_ms: f32, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames {
            let idle = scheduler
                .lock()
                .map(|s| !s.has_pending_work())
                .unwrap_or(true);
            if idle {
                break;
            }
            Self::tick(scheduler, frame_ms);
            frames += 1;
        }
        frames
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrictionMotion, Tween};

    #[test]
    fn test_delayed_task_runs_once_when_due() {
        let scheduler = AnimationScheduler::shared();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        scheduler
            .lock()
            .unwrap()
            .post_delayed_task(100, move || *c.lock().unwrap() += 1);

        AnimationScheduler::tick(&scheduler, 50.0);
        assert_eq!(*count.lock().unwrap(), 0);
        AnimationScheduler::tick(&scheduler, 50.0);
        assert_eq!(*count.lock().unwrap(), 1);
        AnimationScheduler::tick(&scheduler, 500.0);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let scheduler = AnimationScheduler::shared();
        let ran = Arc::new(Mutex::new(false));

        let r = ran.clone();
        let id = scheduler
            .lock()
            .unwrap()
            .post_delayed_task(10, move || *r.lock().unwrap() = true);
        assert!(scheduler.lock().unwrap().cancel_task(id));
        // Cancelling twice is harmless
        assert!(!scheduler.lock().unwrap().cancel_task(id));

        AnimationScheduler::tick(&scheduler, 100.0);
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn test_tasks_run_in_due_order() {
        let scheduler = AnimationScheduler::shared();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b")] {
            let o = order.clone();
            scheduler
                .lock()
                .unwrap()
                .post_delayed_task(delay, move || o.lock().unwrap().push(tag));
        }
        AnimationScheduler::tick(&scheduler, 100.0);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_animation_frames_and_finish() {
        let scheduler = AnimationScheduler::shared();
        let values = Arc::new(Mutex::new(Vec::new()));
        let finished = Arc::new(Mutex::new(0));

        let v = values.clone();
        let f = finished.clone();
        let id = scheduler.lock().unwrap().start_animation(
            Tween::new(0.0, 100.0, 100),
            move |value| v.lock().unwrap().push(value),
            move || *f.lock().unwrap() += 1,
        );

        AnimationScheduler::tick(&scheduler, 50.0);
        assert!(scheduler.lock().unwrap().is_running(id));
        AnimationScheduler::tick(&scheduler, 50.0);
        assert!(!scheduler.lock().unwrap().is_running(id));
        AnimationScheduler::tick(&scheduler, 50.0);

        assert_eq!(*values.lock().unwrap(), vec![50.0, 100.0]);
        assert_eq!(*finished.lock().unwrap(), 1);
    }

    #[test]
    fn test_stop_from_inside_frame_callback() {
        let scheduler = AnimationScheduler::shared();
        let frames = Arc::new(Mutex::new(0));
        let finished = Arc::new(Mutex::new(false));
        let id_slot: Arc<Mutex<Option<AnimationId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&scheduler);
        let fr = frames.clone();
        let slot = id_slot.clone();
        let fin = finished.clone();
        let id = scheduler.lock().unwrap().start_animation(
            FrictionMotion::new(0.6, 0.0, 2000.0),
            move |_| {
                *fr.lock().unwrap() += 1;
                let id = *slot.lock().unwrap();
                if let (Some(s), Some(id)) = (weak.upgrade(), id) {
                    s.lock().unwrap().stop_animation(id);
                }
            },
            move || *fin.lock().unwrap() = true,
        );
        *id_slot.lock().unwrap() = Some(id);

        AnimationScheduler::tick(&scheduler, 16.0);
        AnimationScheduler::tick(&scheduler, 16.0);

        assert_eq!(*frames.lock().unwrap(), 1);
        assert!(!*finished.lock().unwrap());
        assert!(!scheduler.lock().unwrap().has_pending_work());
    }

    #[test]
    fn test_stopped_by_earlier_callback_in_same_tick() {
        let scheduler = AnimationScheduler::shared();
        let finished = Arc::new(Mutex::new(false));
        let frames = Arc::new(Mutex::new(0));

        // Both tweens end on the first tick; the first one stops the second
        let victim: Arc<Mutex<Option<AnimationId>>> = Arc::new(Mutex::new(None));
        let weak = Arc::downgrade(&scheduler);
        let slot = victim.clone();
        scheduler.lock().unwrap().start_animation(
            Tween::new(0.0, 1.0, 10),
            move |_| {
                let id = *slot.lock().unwrap();
                if let (Some(s), Some(id)) = (weak.upgrade(), id) {
                    assert!(s.lock().unwrap().stop_animation(id));
                }
            },
            || {},
        );
        let fr = frames.clone();
        let fin = finished.clone();
        let id = scheduler.lock().unwrap().start_animation(
            Tween::new(0.0, 1.0, 10),
            move |_| *fr.lock().unwrap() += 1,
            move || *fin.lock().unwrap() = true,
        );
        *victim.lock().unwrap() = Some(id);

        AnimationScheduler::tick(&scheduler, 16.0);

        assert_eq!(*frames.lock().unwrap(), 0);
        assert!(!*finished.lock().unwrap());
        assert!(!scheduler.lock().unwrap().has_pending_work());
    }

    #[test]
    fn test_callbacks_may_post_new_work() {
        let scheduler = AnimationScheduler::shared();
        let ran = Arc::new(Mutex::new(false));

        let weak = Arc::downgrade(&scheduler);
        let r = ran.clone();
        scheduler.lock().unwrap().post_delayed_task(0, move || {
            if let Some(s) = weak.upgrade() {
                s.lock()
                    .unwrap()
                    .post_delayed_task(0, move || *r.lock().unwrap() = true);
            }
        });

        AnimationScheduler::tick(&scheduler, 1.0);
        assert!(!*ran.lock().unwrap());
        AnimationScheduler::tick(&scheduler, 1.0);
        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn test_run_until_idle() {
        let scheduler = AnimationScheduler::shared();
        scheduler
            .lock()
            .unwrap()
            .start_animation(Tween::new(0.0, 1.0, 160), |_| {}, || {});
        let frames = AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        assert_eq!(frames, 10);
    }
}
