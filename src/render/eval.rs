//! Physics and math evaluators.
//!
//! Each evaluator is a pure function of a kind's parameters and an
//! [`AnimTime`], returning that kind's instantaneous state already mapped to
//! screen pixels. Nothing here keeps state between frames, so any frame can be
//! computed directly (seeking, replay and export all rely on this).

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use super::defaults::{self, *};
use crate::anim::AnimTime;
use crate::mapper::{AxisMap, PlotMap, scale_normalized};
use crate::params::*;
use crate::types::{Radians, Viewport};

/// Per-kind state for one instant, in screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum SceneState {
    Projectile(ProjectileState),
    Wave(WaveState),
    Pendulum(PendulumState),
    Orbit(OrbitState),
    Bar(BarState),
    Molecule(MoleculeState),
    Circuit(CircuitState),
    Process(ProcessState),
    Graph(GraphState),
    Fallback(FallbackState),
    /// Nothing to draw
    Empty,
}

fn dvec(p: [f64; 2]) -> DVec2 {
    DVec2::new(p[0], p[1])
}

fn color_or(color: &Option<String>, fallback: &str) -> String {
    color.clone().unwrap_or_else(|| fallback.to_string())
}

// ============================================================================
// Projectile
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileState {
    Ballistic(BallisticState),
    Particles(ParticlesState),
}

/// A single launched ball under constant gravity
#[derive(Debug, Clone, PartialEq)]
pub struct BallisticState {
    pub velocity: f64,
    pub angle_deg: f64,
    pub gravity: f64,
    pub origin: DVec2,
    /// `None` once the ball has dropped below the launch height
    pub ball: Option<DVec2>,
    /// Height above the launch point, in metres
    pub height_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleFrame {
    /// `None` while the particle is outside the bounds
    pub pos: Option<DVec2>,
    pub color: String,
    pub trail: Vec<DVec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticlesState {
    pub bounds: Viewport,
    pub particles: Vec<ParticleFrame>,
}

/// Closed-form ballistic position relative to the launch point (y up, pixels)
pub fn ballistic_offset(velocity: f64, angle: Radians, gravity: f64, t: f64) -> DVec2 {
    let v = angle.unit() * velocity;
    DVec2::new(v.x * t, v.y * t - 0.5 * gravity * t * t) * PROJECTILE_SCALE
}

pub fn projectile(params: &ProjectileParams, time: AnimTime) -> ProjectileState {
    if params.is_ballistic() {
        ProjectileState::Ballistic(ballistic(params, time))
    } else {
        ProjectileState::Particles(particles(params, time))
    }
}

fn ballistic(params: &ProjectileParams, time: AnimTime) -> BallisticState {
    let velocity = params.velocity.unwrap_or(PROJECTILE_VELOCITY);
    let angle_deg = params.angle.unwrap_or(PROJECTILE_ANGLE_DEG);
    let gravity = params.gravity.unwrap_or(GRAVITY);
    let origin = DVec2::from(PROJECTILE_ORIGIN);

    let offset = ballistic_offset(velocity, Radians::from_degrees(angle_deg), gravity, time.seconds());
    // Not clamped to the ground: the ball just disappears
    let ball = (offset.y >= 0.0).then(|| DVec2::new(origin.x + offset.x, origin.y - offset.y));

    BallisticState {
        velocity,
        angle_deg,
        gravity,
        origin,
        ball,
        height_m: (offset.y / PROJECTILE_SCALE).max(0.0),
    }
}

/// Screen position of a free particle `t` seconds in, y measured up from the
/// baseline
pub fn particle_position(p: &Particle, bounds: Viewport, t: f64) -> DVec2 {
    let n = DVec2::new(p.x + p.vx * t, p.y + p.vy * t);
    let scaled = scale_normalized(n, bounds.size());
    DVec2::new(scaled.x, bounds.height - PARTICLE_BASELINE - scaled.y)
}

pub fn particle_bounds(params: &ProjectileParams) -> Viewport {
    let [w, h] = params.bounds.unwrap_or(PARTICLE_BOUNDS);
    Viewport::try_new(w, h).unwrap_or(Viewport::new(PARTICLE_BOUNDS[0], PARTICLE_BOUNDS[1]))
}

fn particles(params: &ProjectileParams, time: AnimTime) -> ParticlesState {
    let bounds = particle_bounds(params);
    let t = time.seconds();
    let trail = params.trail != Some(false);

    let particles = params
        .particles
        .iter()
        .flatten()
        .map(|p| {
            let trail = if trail {
                let until = t.min(TRAIL_MAX_SECS);
                (0..)
                    .map(|k| k as f64 * TRAIL_STEP_SECS)
                    .take_while(|s| *s <= until + 1e-9)
                    .map(|s| particle_position(p, bounds, s))
                    .filter(|pt| bounds.contains(*pt))
                    .collect()
            } else {
                Vec::new()
            };
            let pos = particle_position(p, bounds, t);
            ParticleFrame {
                pos: bounds.contains(pos).then_some(pos),
                color: color_or(&p.color, ACCENT),
                trail,
            }
        })
        .collect();

    ParticlesState { bounds, particles }
}

// ============================================================================
// Wave
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WaveCurve {
    pub points: Vec<DVec2>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    pub center_y: f64,
    pub width: f64,
    pub curves: Vec<WaveCurve>,
    pub show_grid: bool,
    pub fill: bool,
}

/// Displacement of a traveling wave at `x` pixels and `t` seconds
pub fn wave_displacement(
    amplitude: f64,
    frequency: f64,
    wavelength: f64,
    phase: f64,
    x: f64,
    t: f64,
) -> f64 {
    let wavelength = if wavelength == 0.0 { WAVE_LENGTH } else { wavelength };
    amplitude * (TAU * x / wavelength - TAU * frequency * t + phase).sin()
}

fn effective_waves(params: &WaveParams) -> Vec<Wave> {
    match &params.waves {
        Some(waves) => waves.clone(),
        None => vec![Wave {
            amplitude: params.amplitude,
            frequency: params.frequency,
            wavelength: params.wavelength,
            ..Default::default()
        }],
    }
}

pub fn wave(params: &WaveParams, time: AnimTime) -> WaveState {
    let vp = defaults::viewport(crate::DiagramKind::Wave);
    let center_y = vp.height / 2.0;
    let t = time.seconds();
    let samples = (vp.width / WAVE_SAMPLE_STEP) as usize;

    let curves = effective_waves(params)
        .iter()
        .map(|w| {
            let amplitude = w.amplitude.unwrap_or(WAVE_AMPLITUDE);
            let frequency = w.frequency.unwrap_or(WAVE_FREQUENCY);
            let wavelength = w.wavelength.unwrap_or(WAVE_LENGTH);
            let phase = w.phase.unwrap_or(0.0);
            let points = (0..=samples)
                .map(|i| {
                    let x = i as f64 * WAVE_SAMPLE_STEP;
                    let y = wave_displacement(amplitude, frequency, wavelength, phase, x, t);
                    DVec2::new(x, center_y + y)
                })
                .collect();
            WaveCurve {
                points,
                color: color_or(&w.color, ACCENT),
            }
        })
        .collect();

    WaveState {
        center_y,
        width: vp.width,
        curves,
        show_grid: params.show_grid == Some(true),
        fill: params.fill == Some(true),
    }
}

// ============================================================================
// Pendulum
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PendulumState {
    pub pivot: DVec2,
    pub bob: DVec2,
    pub theta: Radians,
    /// Angular frequency, rad/s
    pub omega: f64,
    /// Small-angle period, seconds
    pub period: f64,
    pub length: f64,
    pub gravity: f64,
    pub mass: f64,
}

pub fn pendulum(params: &PendulumParams, time: AnimTime) -> PendulumState {
    let length = params.length.filter(|l| *l > 0.0).unwrap_or(PENDULUM_LENGTH);
    let gravity = params.gravity.filter(|g| *g > 0.0).unwrap_or(GRAVITY);
    let mass = params.mass.unwrap_or(1.0);

    let metres = length / 100.0;
    let omega = (gravity / metres).sqrt();
    let theta = Radians(PENDULUM_AMPLITUDE * (omega * time.seconds()).sin());
    let pivot = DVec2::from(PENDULUM_PIVOT);
    let bob = pivot + length * DVec2::new(theta.raw().sin(), theta.raw().cos());

    PendulumState {
        pivot,
        bob,
        theta,
        omega,
        period: TAU * (metres / gravity).sqrt(),
        length,
        gravity,
        mass,
    }
}

// ============================================================================
// Orbit
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame {
    pub name: String,
    pub kind: BodyKind,
    pub pos: DVec2,
    pub radius: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitGuide {
    pub center: DVec2,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitState {
    pub bodies: Vec<BodyFrame>,
    pub guides: Vec<OrbitGuide>,
}

/// Current position of `bodies[index]`. Parents are resolved recursively;
/// missing parents and parent cycles resolve to `center`.
pub fn body_position(bodies: &[Body], index: usize, t: f64, center: DVec2) -> DVec2 {
    resolve_body(bodies, index, t, center, 0)
}

fn resolve_body(bodies: &[Body], index: usize, t: f64, center: DVec2, depth: usize) -> DVec2 {
    let Some(body) = bodies.get(index) else {
        return center;
    };
    if depth > bodies.len() {
        return center;
    }
    match body.kind {
        BodyKind::Star => body.pos.map(dvec).unwrap_or(center),
        BodyKind::Planet => {
            parent_position(bodies, body, t, center, depth)
                + Radians(t * body.speed.unwrap_or(ORBIT_SPEED)).unit()
                    * body.orbit.unwrap_or(ORBIT_RADIUS)
        }
    }
}

fn parent_position(bodies: &[Body], body: &Body, t: f64, center: DVec2, depth: usize) -> DVec2 {
    body.parent
        .and_then(|r| r.index(bodies.len()))
        .map(|p| resolve_body(bodies, p, t, center, depth + 1))
        .unwrap_or(center)
}

pub fn orbit(params: &OrbitParams, time: AnimTime) -> OrbitState {
    let center = defaults::viewport(crate::DiagramKind::Orbit).center();
    let bodies = params.bodies.as_deref().unwrap_or_default();
    let t = time.seconds();

    let frames = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let (radius, color) = match body.kind {
                BodyKind::Star => (body.radius.unwrap_or(STAR_RADIUS), color_or(&body.color, SUN)),
                BodyKind::Planet => (
                    body.radius.unwrap_or(PLANET_RADIUS),
                    color_or(&body.color, ACCENT),
                ),
            };
            BodyFrame {
                name: body.name.clone().unwrap_or_default(),
                kind: body.kind,
                pos: body_position(bodies, i, t, center),
                radius,
                color,
            }
        })
        .collect();

    let guides = if params.show_orbits != Some(false) {
        bodies
            .iter()
            .filter(|b| b.kind == BodyKind::Planet)
            .map(|b| OrbitGuide {
                center: parent_position(bodies, b, t, center, 0),
                radius: b.orbit.unwrap_or(ORBIT_RADIUS),
            })
            .collect()
    } else {
        Vec::new()
    };

    OrbitState {
        bodies: frames,
        guides,
    }
}

// ============================================================================
// Bar
// ============================================================================

/// Plot area inside the bar chart's padding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartArea {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarFrame {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub x: f64,
    pub width: f64,
    /// Final height in pixels
    pub target: f64,
    /// Currently revealed height, never above `target`
    pub reveal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarState {
    pub area: ChartArea,
    pub max_value: f64,
    pub bars: Vec<BarFrame>,
}

/// Frames bar `index` takes to reach full height with interpolated growth
pub fn bar_growth_frames(index: usize) -> f64 {
    BAR_GROWTH_FRAMES + BAR_GROWTH_STAGGER * index as f64
}

/// Revealed height of a bar at `frame`.
///
/// `chart_height` is the full plot height; `target` the bar's own final
/// height. Both growth styles clamp at `target`.
pub fn bar_reveal(target: f64, chart_height: f64, index: usize, frame: f64, growth: Growth) -> f64 {
    let frame = frame.max(0.0);
    let reveal = match growth {
        Growth::Interpolate => target * (frame / bar_growth_frames(index)).min(1.0),
        Growth::Rate => {
            let fraction = if chart_height > 0.0 { target / chart_height } else { 0.0 };
            fraction * (BAR_GROWTH_RATE * frame).min(chart_height)
        }
    };
    reveal.clamp(0.0, target.max(0.0))
}

pub fn bar_area() -> ChartArea {
    let vp = defaults::viewport(crate::DiagramKind::Bar);
    let (top, right, bottom, left) = BAR_PADDING;
    ChartArea {
        left,
        top,
        width: vp.width - left - right,
        height: vp.height - top - bottom,
    }
}

pub fn bar(params: &BarParams, time: AnimTime) -> BarState {
    let area = bar_area();
    let data = params.data.as_deref().unwrap_or_default();
    let max_value = data.iter().map(|d| d.value).fold(0.0, f64::max);
    let growth = params.growth.unwrap_or_default();
    let animate = params.animate != Some(false);

    let slot = if data.is_empty() { 0.0 } else { area.width / data.len() as f64 };
    let (width, gap) = (slot * 0.6, slot * 0.4);

    let bars = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let target = if max_value > 0.0 {
                (d.value / max_value * area.height).max(0.0)
            } else {
                0.0
            };
            let reveal = if animate {
                bar_reveal(target, area.height, i, time.frames(), growth)
            } else {
                target
            };
            BarFrame {
                label: d.label.clone().unwrap_or_default(),
                value: d.value,
                color: color_or(&d.color, ACCENT),
                x: area.left + i as f64 * (width + gap) + gap / 2.0,
                width,
                target,
                reveal,
            }
        })
        .collect();

    BarState {
        area,
        max_value,
        bars,
    }
}

// ============================================================================
// Molecule
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AtomFrame {
    pub element: String,
    pub pos: DVec2,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeState {
    pub atoms: Vec<AtomFrame>,
    /// Resolved atom index pairs
    pub bonds: Vec<(usize, usize)>,
    pub rotation: Radians,
}

/// Bonds whose endpoints both exist; anything else is dropped
pub fn resolve_bonds(bonds: &[Vec<EntityRef>], atom_count: usize) -> Vec<(usize, usize)> {
    bonds
        .iter()
        .filter_map(|bond| match bond.as_slice() {
            [a, b, ..] => Some((a.index(atom_count)?, b.index(atom_count)?)),
            _ => None,
        })
        .collect()
}

pub fn molecule(params: &MoleculeParams, time: AnimTime) -> MoleculeState {
    let atoms = params.atoms.as_deref().unwrap_or_default();
    let rotation = if params.animate_rotation == Some(true) {
        Radians(time.seconds() * params.rotation_rate.unwrap_or(MOLECULE_ROTATION_RATE))
    } else {
        Radians(0.0)
    };

    let centroid = if atoms.is_empty() {
        DVec2::ZERO
    } else {
        atoms.iter().map(|a| dvec(a.pos)).sum::<DVec2>() / atoms.len() as f64
    };

    MoleculeState {
        atoms: atoms
            .iter()
            .map(|a| AtomFrame {
                element: a.element.clone().unwrap_or_default(),
                pos: rotation.rotate_about(dvec(a.pos), centroid),
                color: color_or(&a.color, TEXT),
            })
            .collect(),
        bonds: resolve_bonds(params.bonds.as_deref().unwrap_or_default(), atoms.len()),
        rotation,
    }
}

// ============================================================================
// Circuit
// ============================================================================

/// A polyline with cumulative arc length, for placing dots by distance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    points: Vec<DVec2>,
    cumulative: Vec<f64>,
}

impl Track {
    pub fn new(points: Vec<DVec2>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += p.distance(points[i - 1]);
            }
            cumulative.push(total);
        }
        Self { points, cumulative }
    }

    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point `distance` along the track, wrapping around its length
    pub fn point_at(&self, distance: f64) -> Option<DVec2> {
        let first = *self.points.first()?;
        let len = self.length();
        if len <= 0.0 {
            return Some(first);
        }
        let d = distance.rem_euclid(len);
        let seg = self.cumulative.partition_point(|c| *c <= d).clamp(1, self.points.len() - 1);
        let (c0, c1) = (self.cumulative[seg - 1], self.cumulative[seg]);
        let f = if c1 > c0 { (d - c0) / (c1 - c0) } else { 0.0 };
        Some(self.points[seg - 1].lerp(self.points[seg], f))
    }
}

const CURVE_SAMPLES: usize = 16;

fn quad_point(a: DVec2, ctrl: DVec2, b: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    u * u * a + 2.0 * u * t * ctrl + t * t * b
}

/// The concatenated path of every wire, or the default horizontal track
pub fn current_track(components: &[CircuitComponent]) -> Track {
    let mut points = Vec::new();
    for wire in components.iter().filter(|c| c.kind == ComponentKind::Wire) {
        let (Some(from), Some(to)) = (wire.from.map(dvec), wire.to.map(dvec)) else {
            continue;
        };
        match wire.curve.map(dvec) {
            Some(ctrl) => points.extend(
                (0..=CURVE_SAMPLES).map(|i| quad_point(from, ctrl, to, i as f64 / CURVE_SAMPLES as f64)),
            ),
            None => points.extend([from, to]),
        }
    }
    if points.len() < 2 {
        points = vec![DVec2::new(100.0, 250.0), DVec2::new(500.0, 250.0)];
    }
    Track::new(points)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitState {
    pub components: Vec<CircuitComponent>,
    pub current: Vec<DVec2>,
    pub led_glow: f64,
}

pub fn led_glow(frame: f64) -> f64 {
    (0.3 + 0.7 * (frame / 10.0).sin()).clamp(0.0, 1.0)
}

pub fn circuit(params: &CircuitParams, time: AnimTime) -> CircuitState {
    let components = params.circuit_components.clone().unwrap_or_default();
    let frame = time.frames();

    let current = if params.show_current == Some(true) {
        let track = current_track(&components);
        (0..CURRENT_DOTS)
            .filter_map(|i| track.point_at(frame * CURRENT_SPEED + i as f64 * CURRENT_SPACING))
            .collect()
    } else {
        Vec::new()
    };

    CircuitState {
        components,
        current,
        led_glow: led_glow(frame),
    }
}

// ============================================================================
// Process
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StepFrame {
    pub label: String,
    pub pos: DVec2,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowSegment {
    /// Edge of the source step's circle
    pub from: DVec2,
    /// Edge of the target step's circle
    pub to: DVec2,
    pub marker: Option<DVec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessState {
    pub steps: Vec<StepFrame>,
    pub segments: Vec<FlowSegment>,
}

/// Position within the repeating flow cycle, in `[0, 1)`
pub fn flow_progress(frame: f64) -> f64 {
    frame.rem_euclid(FLOW_CYCLE_FRAMES) / FLOW_CYCLE_FRAMES
}

pub fn process(params: &ProcessParams, time: AnimTime) -> ProcessState {
    let steps: Vec<StepFrame> = params
        .steps
        .iter()
        .flatten()
        .map(|s| StepFrame {
            label: s.label.clone().unwrap_or_default(),
            pos: dvec(s.pos),
            color: color_or(&s.color, ACCENT),
        })
        .collect();

    let progress = (params.animate_flow == Some(true)).then(|| flow_progress(time.frames()));

    let segments = if params.flow != Some(false) {
        steps
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0].pos, pair[1].pos);
                let dir = (b - a).normalize_or_zero();
                FlowSegment {
                    from: a + dir * STEP_RADIUS,
                    to: b - dir * STEP_RADIUS,
                    marker: progress.map(|f| a.lerp(b, f)),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    ProcessState { steps, segments }
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GraphCurve {
    /// Runs of in-range samples; a gap means the function left the y range
    pub segments: Vec<Vec<DVec2>>,
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphState {
    pub map: PlotMap,
    pub viewport: Viewport,
    pub curves: Vec<GraphCurve>,
    pub show_grid: bool,
}

/// Evaluate one of the supported expressions. Unknown expressions plot
/// `sin(x)`.
pub fn eval_function(eq: &str, x: f64, shift: f64) -> f64 {
    let eq = eq.to_ascii_lowercase();
    if eq.contains("sin") {
        (x + shift).sin()
    } else if eq.contains("cos") {
        (x + shift).cos()
    } else if eq.contains("tan") {
        (x + shift).tan()
    } else if eq.contains("x^2") {
        x * x / 20.0
    } else if eq.contains("exp") {
        (x / 5.0).exp()
    } else {
        (x + shift).sin()
    }
}

pub fn graph(params: &GraphParams, time: AnimTime) -> GraphState {
    let viewport = defaults::viewport(crate::DiagramKind::Graph);
    let [x_lo, x_hi] = params.x_range.unwrap_or(GRAPH_X_RANGE);
    let [y_lo, y_hi] = params.y_range.unwrap_or(GRAPH_Y_RANGE);
    let map = PlotMap {
        x: AxisMap::new([x_lo, x_hi], [0.0, viewport.width]).with_padding(GRAPH_PADDING),
        y: AxisMap::new([y_lo, y_hi], [viewport.height, 0.0]).with_padding(GRAPH_PADDING),
    };
    let shift = if params.animate == Some(true) {
        time.frames() / 20.0
    } else {
        0.0
    };

    let default_plot = [FunctionPlot::default()];
    let plots = params.functions.as_deref().unwrap_or(&default_plot);
    let step = (x_hi - x_lo) / GRAPH_SAMPLES as f64;

    let curves = plots
        .iter()
        .map(|plot| {
            let eq = plot.eq.as_deref().unwrap_or("sin(x)");
            let mut segments = Vec::new();
            let mut run: Vec<DVec2> = Vec::new();
            for k in 0..=GRAPH_SAMPLES {
                let x = x_lo + k as f64 * step;
                let y = eval_function(eq, x, shift);
                if y.is_finite() && map.y.contains(y) {
                    run.push(map.to_screen(DVec2::new(x, y)));
                } else if !run.is_empty() {
                    segments.push(std::mem::take(&mut run));
                }
            }
            if !run.is_empty() {
                segments.push(run);
            }
            segments.retain(|s| s.len() > 1);
            GraphCurve {
                segments,
                color: color_or(&plot.color, ACCENT),
                width: plot.line_width.unwrap_or(2.0),
            }
        })
        .collect();

    GraphState {
        map,
        viewport,
        curves,
        show_grid: params.show_grid == Some(true),
    }
}

// ============================================================================
// Fallback
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackState {
    pub outer: f64,
    pub inner: f64,
}

pub fn fallback(time: AnimTime) -> FallbackState {
    let f = time.frames() * 0.05;
    FallbackState {
        outer: 100.0 + 20.0 * f.sin(),
        inner: 60.0 + 15.0 * f.cos(),
    }
}

/// Orbital period for an angular speed, in seconds
pub fn orbital_period(speed: f64) -> f64 {
    2.0 * PI / speed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn ballistic_ball_hides_after_landing() {
        let params = ProjectileParams {
            velocity: Some(20.0),
            ..Default::default()
        };
        let ProjectileState::Ballistic(start) = projectile(&params, AnimTime::ZERO) else {
            panic!("expected ballistic state");
        };
        assert_eq!(start.ball, Some(DVec2::new(50.0, 400.0)));

        // Flight time 2·v·sin(45°)/g ≈ 2.886 s
        let ProjectileState::Ballistic(late) = projectile(&params, AnimTime::from_seconds(3.0)) else {
            panic!("expected ballistic state");
        };
        assert_eq!(late.ball, None);
        assert_eq!(late.height_m, 0.0);
    }

    #[test]
    fn particle_leaves_bounds_and_hides() {
        let params = ProjectileParams {
            particles: Some(vec![Particle {
                x: 0.5,
                y: 0.1,
                vx: 1.0,
                vy: 0.0,
                color: None,
            }]),
            trail: Some(false),
            ..Default::default()
        };
        let ProjectileState::Particles(at0) = projectile(&params, AnimTime::ZERO) else {
            panic!("expected particles");
        };
        assert_eq!(at0.particles[0].pos, Some(DVec2::new(400.0, 400.0)));
        assert!(at0.particles[0].trail.is_empty());

        let ProjectileState::Particles(later) = projectile(&params, AnimTime::from_seconds(1.0)) else {
            panic!("expected particles");
        };
        assert_eq!(later.particles[0].pos, None);
    }

    #[test]
    fn trail_samples_every_tenth_of_a_second() {
        let params = ProjectileParams {
            particles: Some(vec![Particle {
                x: 0.1,
                y: 0.1,
                vx: 0.01,
                vy: 0.01,
                color: None,
            }]),
            ..Default::default()
        };
        let ProjectileState::Particles(state) = projectile(&params, AnimTime::from_seconds(0.5)) else {
            panic!("expected particles");
        };
        assert_eq!(state.particles[0].trail.len(), 6);
        let ProjectileState::Particles(state) = projectile(&params, AnimTime::from_seconds(10.0)) else {
            panic!("expected particles");
        };
        assert_eq!(state.particles[0].trail.len(), 31);
    }

    #[test]
    fn wave_at_origin_follows_phase() {
        assert!((wave_displacement(50.0, 1.0, 150.0, 0.0, 0.0, 0.0)).abs() < 1e-12);
        let y = wave_displacement(50.0, 1.0, 100.0, 0.0, 25.0, 0.0);
        assert!((y - 50.0).abs() < 1e-9);
        // One full period later the curve is back
        let a = wave_displacement(30.0, 2.0, 80.0, 0.3, 17.0, 0.2);
        let b = wave_displacement(30.0, 2.0, 80.0, 0.3, 17.0, 0.7);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn waves_are_layered_not_summed() {
        let params = WaveParams {
            waves: Some(vec![
                Wave {
                    amplitude: Some(10.0),
                    ..Default::default()
                },
                Wave {
                    amplitude: Some(20.0),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let state = wave(&params, AnimTime::ZERO);
        assert_eq!(state.curves.len(), 2);
        assert_eq!(state.curves[0].points.len(), 161);
    }

    #[test]
    fn pendulum_starts_hanging_straight() {
        let state = pendulum(&PendulumParams::default(), AnimTime::ZERO);
        assert_eq!(state.bob, DVec2::new(400.0, 250.0));
        assert!((state.omega - (9.8f64 / 1.5).sqrt()).abs() < 1e-12);
        assert!((state.period - TAU / state.omega).abs() < 1e-12);
    }

    #[test]
    fn orbit_dangling_parent_uses_center() {
        let bodies = vec![Body {
            orbit: Some(10.0),
            speed: Some(1.0),
            parent: Some(EntityRef(7)),
            ..Default::default()
        }];
        let p = body_position(&bodies, 0, 0.0, DVec2::new(400.0, 250.0));
        assert!(approx(p, DVec2::new(410.0, 250.0)));
    }

    #[test]
    fn orbit_parent_cycle_terminates() {
        let bodies = vec![
            Body {
                parent: Some(EntityRef(1)),
                ..Default::default()
            },
            Body {
                parent: Some(EntityRef(0)),
                ..Default::default()
            },
        ];
        assert!(body_position(&bodies, 0, 1.0, DVec2::ZERO).is_finite());
    }

    #[test]
    fn moon_follows_planet() {
        let bodies = vec![
            Body {
                kind: BodyKind::Star,
                pos: Some([100.0, 100.0]),
                ..Default::default()
            },
            Body {
                orbit: Some(50.0),
                speed: Some(0.0),
                parent: Some(EntityRef(0)),
                ..Default::default()
            },
            Body {
                orbit: Some(5.0),
                speed: Some(0.0),
                parent: Some(EntityRef(1)),
                ..Default::default()
            },
        ];
        let p = body_position(&bodies, 2, 3.0, DVec2::ZERO);
        assert!(approx(p, DVec2::new(155.0, 100.0)));
    }

    #[test]
    fn bar_rate_growth_clamps() {
        for frame in 0..400 {
            let r = bar_reveal(120.0, 340.0, 0, frame as f64, Growth::Rate);
            assert!(r <= 120.0);
        }
        assert_eq!(bar_reveal(120.0, 340.0, 0, 1000.0, Growth::Rate), 120.0);
        assert_eq!(bar_reveal(340.0, 340.0, 2, 10.0, Growth::Rate), 30.0);
    }

    #[test]
    fn bar_interpolate_is_staggered() {
        assert_eq!(bar_reveal(100.0, 340.0, 0, 15.0, Growth::Interpolate), 50.0);
        assert_eq!(bar_reveal(100.0, 340.0, 2, 20.0, Growth::Interpolate), 50.0);
        assert_eq!(bar_reveal(100.0, 340.0, 2, 40.0, Growth::Interpolate), 100.0);
    }

    #[test]
    fn out_of_range_bonds_are_dropped() {
        let bonds = vec![
            vec![EntityRef(0), EntityRef(1)],
            vec![EntityRef(0), EntityRef(5)],
            vec![EntityRef(-1), EntityRef(1)],
            vec![EntityRef(1)],
        ];
        assert_eq!(resolve_bonds(&bonds, 2), vec![(0, 1)]);
    }

    #[test]
    fn molecule_rotates_about_centroid() {
        let params = MoleculeParams {
            atoms: Some(vec![
                Atom {
                    pos: [0.0, 0.0],
                    ..Default::default()
                },
                Atom {
                    pos: [10.0, 0.0],
                    ..Default::default()
                },
            ]),
            animate_rotation: Some(true),
            rotation_rate: Some(PI),
            ..Default::default()
        };
        let state = molecule(&params, AnimTime::from_seconds(1.0));
        assert!(approx(state.atoms[0].pos, DVec2::new(10.0, 0.0)));
        assert!(approx(state.atoms[1].pos, DVec2::new(0.0, 0.0)));
    }

    #[test]
    fn track_wraps() {
        let track = Track::new(vec![DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::new(100.0, 100.0)]);
        assert_eq!(track.length(), 200.0);
        assert!(approx(track.point_at(150.0).unwrap(), DVec2::new(100.0, 50.0)));
        assert!(approx(track.point_at(250.0).unwrap(), DVec2::new(50.0, 0.0)));
    }

    #[test]
    fn current_without_wires_uses_default_track() {
        let params = CircuitParams {
            show_current: Some(true),
            ..Default::default()
        };
        let state = circuit(&params, AnimTime::from_frame(10));
        assert_eq!(state.current.len(), CURRENT_DOTS);
        assert!(approx(state.current[0], DVec2::new(120.0, 250.0)));
        assert!(approx(state.current[1], DVec2::new(170.0, 250.0)));
    }

    #[test]
    fn led_glow_is_clamped() {
        for frame in 0..200 {
            let g = led_glow(frame as f64);
            assert!((0.0..=1.0).contains(&g));
        }
    }

    #[test]
    fn flow_progress_cycles() {
        assert_eq!(flow_progress(0.0), 0.0);
        assert_eq!(flow_progress(30.0), 0.5);
        assert_eq!(flow_progress(60.0), 0.0);
    }

    #[test]
    fn graph_breaks_out_of_range_samples() {
        let params = GraphParams {
            functions: Some(vec![FunctionPlot {
                eq: Some("tan(x)".into()),
                ..Default::default()
            }]),
            x_range: Some([-10.0, 10.0]),
            y_range: Some([-1.0, 1.0]),
            ..Default::default()
        };
        let state = graph(&params, AnimTime::ZERO);
        assert!(state.curves[0].segments.len() > 1);
    }

    #[test]
    fn unknown_expression_plots_sine() {
        assert_eq!(eval_function("log(x)", 1.0, 0.0), 1.0f64.sin());
        assert_eq!(eval_function("x^2", 4.0, 9.0), 0.8);
    }
}
