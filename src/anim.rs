//! Animation time and the two ways of driving it.
//!
//! Evaluators only ever see an [`AnimTime`]: a (possibly fractional) frame
//! count at [`FPS`]. The composed scheduler hands out exact integer frames;
//! the live scheduler (in the host app) feeds wall-clock time through a
//! [`FrameClock`]. Both land on the same `AnimTime` for the same frame index,
//! so a diagram looks identical on screen and in an export.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::render::defaults::{self, FPS};

/// Position on the animation timeline, in frames at [`FPS`]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct AnimTime(f64);

impl AnimTime {
    pub const ZERO: AnimTime = AnimTime(0.0);

    pub fn from_frame(frame: u32) -> Self {
        AnimTime(frame as f64)
    }

    pub fn from_frames(frames: f64) -> Self {
        AnimTime(frames)
    }

    pub fn from_seconds(secs: f64) -> Self {
        AnimTime(secs * FPS)
    }

    pub fn from_elapsed(elapsed: Duration) -> Self {
        // Whole nanoseconds keep whole-frame durations exact (1s is exactly 30.0)
        AnimTime(elapsed.as_nanos() as f64 * FPS / 1e9)
    }

    #[inline]
    pub fn frames(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn seconds(self) -> f64 {
        self.0 / FPS
    }
}

/// Accumulates wall-clock deltas into animation time.
///
/// Speed is independent of how often `tick` is called; only the summed
/// elapsed time matters.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    elapsed: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one refresh interval's worth of wall time
    pub fn tick(&mut self, delta: Duration) -> AnimTime {
        self.elapsed += delta;
        self.now()
    }

    pub fn now(&self) -> AnimTime {
        AnimTime::from_elapsed(self.elapsed)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// Callback invoked once per scheduled frame
pub type TickFn = Box<dyn FnMut(AnimTime) + Send + 'static>;

/// Handle returned by [`FrameScheduler::subscribe`].
///
/// Dropping it cancels the subscription, so a diagram that goes away stops
/// its callback without any extra bookkeeping.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Something that calls subscribers once per frame
pub trait FrameScheduler {
    fn subscribe(&self, on_tick: TickFn) -> Subscription;
}

type Subscribers = Arc<Mutex<Vec<(u64, TickFn)>>>;

/// Fixed-fps, fixed-duration scheduler driven by explicit frame indices.
///
/// There is no wall clock here: `render_frame(i)` always delivers exactly
/// frame `i`, which is what makes exports replayable.
#[derive(Clone)]
pub struct ComposedScheduler {
    pub fps: f64,
    pub duration_in_frames: u32,
    subscribers: Subscribers,
    next_id: Arc<Mutex<u64>>,
}

impl ComposedScheduler {
    pub fn new(duration_in_frames: u32) -> Self {
        Self {
            fps: FPS,
            duration_in_frames,
            subscribers: Arc::default(),
            next_id: Arc::default(),
        }
    }

    /// Scheduler sized for one diagram kind's composition
    pub fn for_kind(kind: crate::DiagramKind) -> Self {
        Self::new(defaults::composition(kind).duration_in_frames)
    }

    /// Deliver one frame to every subscriber. Frames past the end are
    /// clamped to the last frame.
    pub fn render_frame(&self, frame: u32) {
        let frame = frame.min(self.duration_in_frames.saturating_sub(1));
        let time = AnimTime::from_frame(frame);
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, on_tick) in subs.iter_mut() {
            on_tick(time);
        }
    }

    /// Deliver every frame of the composition in order
    pub fn play(&self) {
        for frame in 0..self.duration_in_frames {
            self.render_frame(frame);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl FrameScheduler for ComposedScheduler {
    fn subscribe(&self, on_tick: TickFn) -> Subscription {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
            *next += 1;
            *next
        };
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, on_tick));
        crate::log::debug!(id, "composed subscriber added");

        let subscribers = Arc::clone(&self.subscribers);
        Subscription::new(move || {
            subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(sub_id, _)| *sub_id != id);
            crate::log::debug!(id, "composed subscriber removed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_is_thirty_frames() {
        assert_eq!(AnimTime::from_elapsed(Duration::from_secs(1)).frames(), 30.0);
        assert_eq!(AnimTime::from_frame(45).seconds(), 1.5);
    }

    #[test]
    fn clock_is_independent_of_refresh_rate() {
        let mut fast = FrameClock::new();
        for _ in 0..120 {
            fast.tick(Duration::from_nanos(8_333_333));
        }
        let mut slow = FrameClock::new();
        for _ in 0..30 {
            slow.tick(Duration::from_nanos(33_333_332));
        }
        assert!((fast.now().frames() - slow.now().frames()).abs() < 1e-3);
        assert!((fast.now().frames() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn clock_matches_composed_frames_on_whole_durations() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            clock.tick(Duration::from_millis(100));
        }
        assert_eq!(clock.now(), AnimTime::from_frame(30));
        clock.reset();
        assert_eq!(clock.now(), AnimTime::ZERO);
    }

    #[test]
    fn composed_delivers_exact_frames() {
        let scheduler = ComposedScheduler::new(5);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = scheduler.subscribe(Box::new(move |t| sink.lock().unwrap().push(t.frames())));
        scheduler.play();
        assert_eq!(*seen.lock().unwrap(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn composed_clamps_past_the_end() {
        let scheduler = ComposedScheduler::new(3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = scheduler.subscribe(Box::new(move |t| sink.lock().unwrap().push(t.frames())));
        scheduler.render_frame(99);
        assert_eq!(*seen.lock().unwrap(), vec![2.0]);
    }

    #[test]
    fn dropping_subscription_stops_ticks() {
        let scheduler = ComposedScheduler::new(10);
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let sub = scheduler.subscribe(Box::new(move |_| *sink.lock().unwrap() += 1));
        scheduler.render_frame(0);
        sub.unsubscribe();
        scheduler.render_frame(1);
        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(scheduler.subscriber_count(), 0);

        {
            let _scoped = scheduler.subscribe(Box::new(|_| {}));
            assert_eq!(scheduler.subscriber_count(), 1);
        }
        assert_eq!(scheduler.subscriber_count(), 0);
    }
}
