//! Reflecting particles for the interactive bounce mode.
//!
//! This is the one piece of diagram state that survives between frames:
//! velocity signs flip at the walls and stay flipped. It lives on the
//! [`DiagramInstance`](crate::instance::DiagramInstance) that owns it and is
//! rebuilt from the params on remount.

use std::time::Duration;

use glam::DVec2;

use crate::log::debug;
use crate::params::{Particle, ProjectileParams};
use crate::render::defaults::{ACCENT, BOUNCE_STEP_SCALE, BOUNCE_STEP_SECS, PARTICLE_BASELINE};
use crate::render::eval::{ParticleFrame, ParticlesState, particle_bounds};
use crate::types::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub struct BouncingParticle {
    /// Pixel position, y measured up from the baseline
    pub pos: DVec2,
    pub vel: DVec2,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BouncingParticles {
    bounds: Viewport,
    initial: Vec<BouncingParticle>,
    particles: Vec<BouncingParticle>,
    pending: Duration,
}

impl BouncingParticles {
    pub fn new(params: &ProjectileParams) -> Self {
        let bounds = particle_bounds(params);
        let extent = extent(bounds);
        let initial: Vec<_> = params
            .particles
            .iter()
            .flatten()
            .map(|p| {
                let mut particle = scaled(p, bounds);
                particle.pos = particle.pos.clamp(DVec2::ZERO, extent);
                particle
            })
            .collect();
        Self {
            bounds,
            particles: initial.clone(),
            initial,
            pending: Duration::ZERO,
        }
    }

    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    pub fn particles(&self) -> &[BouncingParticle] {
        &self.particles
    }

    /// Move every particle one step, reflecting off the walls of the visible
    /// area: `[0, width]` across and baseline to top edge vertically
    pub fn step(&mut self) {
        let size = extent(self.bounds);
        for p in &mut self.particles {
            p.pos += p.vel * BOUNCE_STEP_SCALE;
            if p.pos.x <= 0.0 || p.pos.x >= size.x {
                p.vel.x = -p.vel.x;
                p.pos.x = p.pos.x.clamp(0.0, size.x);
            }
            if p.pos.y <= 0.0 || p.pos.y >= size.y {
                p.vel.y = -p.vel.y;
                p.pos.y = p.pos.y.clamp(0.0, size.y);
            }
        }
    }

    /// Feed wall-clock time; runs one step per accumulated step interval.
    /// Returns how many steps ran.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let interval = Duration::from_secs_f64(BOUNCE_STEP_SECS);
        self.pending += elapsed;
        let mut steps = 0;
        while self.pending >= interval {
            self.pending -= interval;
            self.step();
            steps += 1;
        }
        steps
    }

    /// Back to the initial positions and velocities
    pub fn reset(&mut self) {
        debug!(count = self.initial.len(), "bouncing particles reset");
        self.particles = self.initial.clone();
        self.pending = Duration::ZERO;
    }

    /// Current positions in screen space
    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        let h = self.bounds.height;
        self.particles
            .iter()
            .map(move |p| DVec2::new(p.pos.x, h - PARTICLE_BASELINE - p.pos.y))
    }

    /// The drawable state; trails are not kept in this mode
    pub fn state(&self) -> ParticlesState {
        let particles = self
            .particles
            .iter()
            .zip(self.positions())
            .map(|(p, pos)| ParticleFrame {
                pos: Some(pos),
                color: p.color.clone(),
                trail: Vec::new(),
            })
            .collect();
        ParticlesState {
            bounds: self.bounds,
            particles,
        }
    }
}

/// Room to move in, y measured up from the baseline
fn extent(bounds: Viewport) -> DVec2 {
    DVec2::new(bounds.width, (bounds.height - PARTICLE_BASELINE).max(0.0))
}

fn scaled(p: &Particle, bounds: Viewport) -> BouncingParticle {
    BouncingParticle {
        pos: DVec2::new(p.x, p.y) * bounds.size(),
        vel: DVec2::new(p.vx, p.vy),
        color: p.color.clone().unwrap_or_else(|| ACCENT.to_string()),
    }
}
