//! Mounted diagrams and the one-call render entry points

use std::time::Duration;

use crate::anim::{AnimTime, FrameClock};
use crate::errors::RenderError;
use crate::log::{debug, info};
use crate::params::DiagramConfig;
use crate::particles::BouncingParticles;
use crate::render::eval::{ProjectileState, SceneState};
use crate::render::{Diagram, DiagramParams, RenderOptions, Scene, to_svg};

/// A diagram as shown on screen: its config, the parameters normalized from
/// it, and (for bouncing projectiles only) the particle state that carries
/// over between frames.
#[derive(Debug, Clone)]
pub struct DiagramInstance {
    config: DiagramConfig,
    params: DiagramParams,
    clock: FrameClock,
    bouncing: Option<BouncingParticles>,
}

impl DiagramInstance {
    pub fn new(config: DiagramConfig) -> Self {
        let params = config.effective_params();
        let bouncing = match &params {
            DiagramParams::Projectile(p) if p.bounces() => Some(BouncingParticles::new(p)),
            _ => None,
        };
        info!(kind = %config.kind, bouncing = bouncing.is_some(), "diagram mounted");
        Self {
            config,
            params,
            clock: FrameClock::new(),
            bouncing,
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn params(&self) -> &DiagramParams {
        &self.params
    }

    pub fn title(&self) -> &str {
        self.config.display_title()
    }

    /// Pretty JSON of the effective parameters
    pub fn describe(&self) -> String {
        self.params.describe()
    }

    /// Scene at an explicit time. Pure for every mode except bounce, where
    /// the particles are drawn where the simulation currently has them.
    pub fn scene_at(&self, time: AnimTime) -> Scene {
        match &self.bouncing {
            Some(sim) => {
                let state = SceneState::Projectile(ProjectileState::Particles(sim.state()));
                self.params.draw(&state, self.title())
            }
            None => self.params.scene(time, self.title()),
        }
    }

    /// Feed wall-clock time from a live scheduler
    pub fn advance(&mut self, elapsed: Duration) -> AnimTime {
        if let Some(sim) = &mut self.bouncing {
            sim.advance(elapsed);
        }
        self.clock.tick(elapsed)
    }

    /// Scene at the accumulated live time
    pub fn current_scene(&self) -> Scene {
        self.scene_at(self.clock.now())
    }

    pub fn now(&self) -> AnimTime {
        self.clock.now()
    }

    /// Start over: time back to zero, particles back to their initial state
    pub fn remount(&mut self) {
        debug!(kind = %self.config.kind, "diagram remounted");
        self.clock.reset();
        if let Some(sim) = &mut self.bouncing {
            sim.reset();
        }
    }
}

/// Scene for `config` at `time`
pub fn render(config: &DiagramConfig, time: AnimTime) -> Scene {
    config
        .effective_params()
        .scene(time, config.display_title())
}

/// SVG document for `config` at an integer frame
pub fn render_svg(
    config: &DiagramConfig,
    frame: u32,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    to_svg(&render(config, AnimTime::from_frame(frame)), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::DiagramKind;
    use serde_json::json;

    fn config(value: serde_json::Value) -> DiagramConfig {
        DiagramConfig::from_json(&value).unwrap()
    }

    #[test]
    fn live_and_composed_agree_on_frames() {
        let cfg = DiagramConfig::new(DiagramKind::Pendulum);
        let mut live = DiagramInstance::new(cfg.clone());
        for _ in 0..45 {
            live.advance(Duration::from_nanos(1_000_000_000 / 30));
        }
        // 45 ticks of a truncated 1/30 s fall a hair short of frame 45
        let t = live.now().frames();
        assert!((t - 45.0).abs() < 1e-4);

        let mut live = DiagramInstance::new(cfg.clone());
        live.advance(Duration::from_millis(1500));
        assert_eq!(live.current_scene(), render(&cfg, AnimTime::from_frame(45)));
    }

    #[test]
    fn bounce_state_resets_on_remount() {
        let cfg = config(json!({
            "type": "projectile",
            "params": {
                "particles": [{ "x": 0.99, "y": 0.5, "vx": 2, "vy": 0 }],
                "bounds": [800, 500],
                "bounce": true
            }
        }));
        let mut inst = DiagramInstance::new(cfg);
        let start = inst.current_scene();
        inst.advance(Duration::from_millis(50));
        assert_ne!(inst.current_scene(), start);
        inst.remount();
        assert_eq!(inst.current_scene(), start);
        assert_eq!(inst.now(), AnimTime::ZERO);
    }

    #[test]
    fn bounce_ignored_for_ballistic_launch() {
        let cfg = config(json!({
            "type": "projectile",
            "params": { "velocity": 40, "bounce": true }
        }));
        let inst = DiagramInstance::new(cfg);
        assert_eq!(
            inst.scene_at(AnimTime::from_frame(10)),
            inst.scene_at(AnimTime::from_frame(10))
        );
        assert_ne!(
            inst.scene_at(AnimTime::from_frame(10)),
            inst.scene_at(AnimTime::from_frame(20))
        );
    }

    #[test]
    fn render_svg_uses_kind_viewport() {
        let cfg = DiagramConfig::new(DiagramKind::Fallback).with_title("Mystery");
        let svg = render_svg(&cfg, 0, &RenderOptions::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 400 400""#));
        assert!(svg.contains(">Mystery</text>"));
    }
}
