//! Default sizes, timings and colors (all in screen pixels / frames)

use crate::kind::DiagramKind;
use crate::types::Viewport;

/// Frame rate every animation is normalized to
pub const FPS: f64 = 30.0;

/// Display refresh rate the live scheduler ticks at
pub const REFRESH_HZ: f64 = 60.0;

// Palette
pub const BACKGROUND: &str = "#0A0A0A";
pub const ACCENT: &str = "#C6FF00";
pub const CORAL: &str = "#FF6B6B";
pub const TEAL: &str = "#4ECDC4";
pub const SAND: &str = "#FFE66D";
pub const TEXT: &str = "#F5F5F5";
pub const MUTED: &str = "#A0A0A0";
pub const DIM: &str = "#666";
pub const AXIS: &str = "#444";
pub const GRID: &str = "#333";
pub const GRID_FAINT: &str = "#222";
pub const INK: &str = "#0A0A0A";
pub const SUN: &str = "#FFD700";
pub const SUN_LABEL: &str = "#B8860B";
pub const RESISTOR: &str = "#8B4513";
pub const LED: &str = "#FF0000";

/// Named palette entries, for CSS custom property output
pub const PALETTE: [(&str, &str); 16] = [
    ("background", BACKGROUND),
    ("accent", ACCENT),
    ("coral", CORAL),
    ("teal", TEAL),
    ("sand", SAND),
    ("text", TEXT),
    ("muted", MUTED),
    ("dim", DIM),
    ("axis", AXIS),
    ("grid", GRID),
    ("grid-faint", GRID_FAINT),
    ("ink", INK),
    ("sun", SUN),
    ("sun-label", SUN_LABEL),
    ("resistor", RESISTOR),
    ("led", LED),
];

pub const TITLE_SIZE: f64 = 20.0;
pub const LABEL_SIZE: f64 = 14.0;
pub const SMALL_SIZE: f64 = 12.0;
pub const PLACEHOLDER_SIZE: f64 = 18.0;

/// Fixed-duration playback settings for one kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub fps: f64,
    pub duration_in_frames: u32,
    pub viewport: Viewport,
}

pub fn viewport(kind: DiagramKind) -> Viewport {
    match kind {
        DiagramKind::Wave | DiagramKind::Circuit => Viewport::new(800.0, 400.0),
        DiagramKind::Graph => Viewport::new(800.0, 450.0),
        DiagramKind::Fallback => Viewport::new(400.0, 400.0),
        _ => Viewport::new(800.0, 500.0),
    }
}

pub fn composition(kind: DiagramKind) -> Composition {
    let duration_in_frames = match kind {
        DiagramKind::Projectile
        | DiagramKind::Wave
        | DiagramKind::Molecule
        | DiagramKind::Circuit
        | DiagramKind::Graph => 300,
        DiagramKind::Pendulum | DiagramKind::Process => 180,
        DiagramKind::Bar | DiagramKind::Fallback => 120,
        DiagramKind::Orbit => 600,
    };
    Composition {
        fps: FPS,
        duration_in_frames,
        viewport: viewport(kind),
    }
}

// Projectile
pub const PROJECTILE_SCALE: f64 = 3.0;
pub const PROJECTILE_ORIGIN: (f64, f64) = (50.0, 400.0);
pub const PROJECTILE_VELOCITY: f64 = 60.0;
pub const PROJECTILE_ANGLE_DEG: f64 = 45.0;
pub const GRAVITY: f64 = 9.8;
pub const PARTICLE_BOUNDS: [f64; 2] = [800.0, 500.0];
pub const PARTICLE_BASELINE: f64 = 50.0;
pub const PARTICLE_RADIUS: f64 = 10.0;
pub const TRAIL_STEP_SECS: f64 = 0.1;
pub const TRAIL_MAX_SECS: f64 = 3.0;
/// Wall time between two reflecting-particle steps
pub const BOUNCE_STEP_SECS: f64 = 0.05;
/// Displacement per step, as a multiple of velocity
pub const BOUNCE_STEP_SCALE: f64 = 5.0;

// Wave
pub const WAVE_AMPLITUDE: f64 = 50.0;
pub const WAVE_FREQUENCY: f64 = 1.0;
pub const WAVE_LENGTH: f64 = 150.0;
pub const WAVE_SAMPLE_STEP: f64 = 5.0;

// Pendulum
pub const PENDULUM_LENGTH: f64 = 150.0;
pub const PENDULUM_AMPLITUDE: f64 = 0.5;
pub const PENDULUM_PIVOT: (f64, f64) = (400.0, 100.0);

// Orbit
pub const ORBIT_RADIUS: f64 = 100.0;
pub const ORBIT_SPEED: f64 = 1.0;
pub const STAR_RADIUS: f64 = 50.0;
pub const PLANET_RADIUS: f64 = 15.0;

// Bar
pub const BAR_PADDING: (f64, f64, f64, f64) = (80.0, 50.0, 80.0, 100.0); // top, right, bottom, left
pub const BAR_GROWTH_FRAMES: f64 = 30.0;
pub const BAR_GROWTH_STAGGER: f64 = 5.0;
pub const BAR_GROWTH_RATE: f64 = 3.0;
pub const BAR_LABEL_MIN_HEIGHT: f64 = 20.0;

// Molecule
pub const ATOM_RADIUS: f64 = 25.0;
pub const MOLECULE_ROTATION_RATE: f64 = std::f64::consts::FRAC_PI_3;

// Circuit
pub const CURRENT_SPEED: f64 = 2.0;
pub const CURRENT_SPACING: f64 = 50.0;
pub const CURRENT_DOTS: usize = 4;

// Process
pub const STEP_RADIUS: f64 = 25.0;
pub const FLOW_CYCLE_FRAMES: f64 = 60.0;

// Graph
pub const GRAPH_PADDING: f64 = 50.0;
pub const GRAPH_SAMPLES: usize = 200;
pub const GRAPH_X_RANGE: [f64; 2] = [-10.0, 10.0];
pub const GRAPH_Y_RANGE: [f64; 2] = [-5.0, 5.0];
