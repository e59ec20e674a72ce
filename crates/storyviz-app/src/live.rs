//! Wall-clock playback

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use storyviz::render::defaults::REFRESH_HZ;
use storyviz::{AnimTime, DiagramInstance, FrameClock, FrameScheduler, Scene, Subscription, TickFn};
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Ticks subscribers at the display refresh rate with the accumulated
/// wall-clock time. Each subscription runs its own task and clock.
#[derive(Debug, Clone)]
pub struct LiveScheduler {
    handle: Handle,
    refresh_hz: f64,
}

impl LiveScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            refresh_hz: REFRESH_HZ,
        }
    }

    /// Scheduler on the runtime the caller is running in
    pub fn current() -> Result<Self, tokio::runtime::TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    pub fn with_refresh_hz(mut self, hz: f64) -> Self {
        if hz.is_finite() && hz > 0.0 {
            self.refresh_hz = hz;
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_hz)
    }
}

impl FrameScheduler for LiveScheduler {
    fn subscribe(&self, mut on_tick: TickFn) -> Subscription {
        let period = self.refresh_interval();
        let task = self.handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut clock = FrameClock::new();
            let mut last = Instant::now();
            loop {
                let now = interval.tick().await;
                let time = clock.tick(now.saturating_duration_since(last));
                last = now;
                on_tick(time);
            }
        });
        debug!(?period, "live subscription started");
        Subscription::new(move || {
            debug!("live subscription cancelled");
            task.abort();
        })
    }
}

/// Play a mounted diagram live, handing each new scene to `on_scene`
pub fn play(
    scheduler: &dyn FrameScheduler,
    instance: Arc<Mutex<DiagramInstance>>,
    mut on_scene: impl FnMut(Scene) + Send + 'static,
) -> Subscription {
    let mut last = AnimTime::ZERO;
    scheduler.subscribe(Box::new(move |time: AnimTime| {
        let delta = Duration::from_secs_f64((time.seconds() - last.seconds()).max(0.0));
        last = time;
        let scene = {
            let mut inst = instance.lock().unwrap_or_else(PoisonError::into_inner);
            inst.advance(delta);
            inst.current_scene()
        };
        on_scene(scene);
    }))
}
