//! Per-kind draw routines.
//!
//! Each parameter record implements [`Diagram`]: `evaluate` defers to the
//! matching function in [`super::eval`], `draw` lays the resulting state out
//! as primitives. Draw routines never fail; an empty entity list draws the
//! placeholder scene.

use glam::DVec2;

use super::defaults::{self, *};
use super::eval::{self, ProjectileState, SceneState};
use super::scene::{FontWeight, PLACEHOLDER_TEXT, PathData, Scene, Style, TextAnchor, TextLabel};
use super::Diagram;
use crate::anim::AnimTime;
use crate::kind::DiagramKind;
use crate::params::*;
use crate::types::Viewport;

fn placeholder(kind: DiagramKind) -> Scene {
    Scene::placeholder(defaults::viewport(kind), PLACEHOLDER_TEXT)
}

fn label(x: f64, y: f64, text: impl Into<String>, size: f64) -> TextLabel {
    TextLabel::new(DVec2::new(x, y), text, size)
}

/// Small filled triangle with its tip at `tip`, pointing along `dir`
fn arrowhead(tip: DVec2, dir: DVec2, length: f64, half_width: f64) -> Option<Vec<DVec2>> {
    let dir = dir.try_normalize()?;
    let base = tip - dir * length;
    let side = dir.perp() * half_width;
    Some(vec![tip, base + side, base - side])
}

// ============================================================================
// Projectile
// ============================================================================

impl Diagram for ProjectileParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Projectile
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Projectile(eval::projectile(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        match state {
            SceneState::Projectile(ProjectileState::Ballistic(s)) => draw_ballistic(s, title),
            SceneState::Projectile(ProjectileState::Particles(s)) => draw_particles(s, title),
            _ => placeholder(DiagramKind::Projectile),
        }
    }
}

fn draw_ballistic(state: &eval::BallisticState, title: &str) -> Scene {
    let mut scene = Scene::new(defaults::viewport(DiagramKind::Projectile));
    let origin = state.origin;

    scene.title(title);
    scene.text(
        label(
            50.0,
            70.0,
            format!(
                "v₀ = {}m/s, θ = {}°, g = {}m/s²",
                state.velocity, state.angle_deg, state.gravity
            ),
            LABEL_SIZE,
        ),
        MUTED,
    );

    scene.line(origin, DVec2::new(750.0, origin.y), Style::stroke(AXIS, 2.0));
    scene.line(origin, DVec2::new(origin.x, 50.0), Style::stroke(AXIS, 2.0));

    if let Some(ball) = state.ball {
        scene.line(
            DVec2::new(ball.x, origin.y),
            ball,
            Style::stroke(ACCENT, 1.0).dashed(&[4.0]).opacity(0.5),
        );
        scene.circle(ball, 12.0, Style::fill(ACCENT));
        scene.text(
            label(ball.x + 10.0, ball.y - 20.0, format!("h = {:.1}m", state.height_m), SMALL_SIZE),
            ACCENT,
        );
    }

    scene.text(label(700.0, 430.0, "Distance", SMALL_SIZE), DIM);
    scene.text(label(origin.x + 10.0, 50.0, "Height", SMALL_SIZE), DIM);
    scene
}

fn draw_particles(state: &eval::ParticlesState, title: &str) -> Scene {
    let bounds = state.bounds;
    if state.particles.is_empty() {
        return Scene::placeholder(bounds, PLACEHOLDER_TEXT);
    }

    let mut scene = Scene::new(bounds);
    scene.title(title);

    let baseline = bounds.height - PARTICLE_BASELINE;
    scene.line(
        DVec2::new(0.0, baseline),
        DVec2::new(bounds.width, baseline),
        Style::stroke(GRID, 1.0),
    );
    scene.line(
        DVec2::new(50.0, bounds.height),
        DVec2::new(50.0, 0.0),
        Style::stroke(GRID, 1.0),
    );

    for p in &state.particles {
        if p.trail.len() > 1 {
            scene.polyline(p.trail.clone(), Style::stroke(&p.color, 2.0).opacity(0.3));
        }
    }
    for p in &state.particles {
        if let Some(pos) = p.pos {
            scene.circle(pos, PARTICLE_RADIUS, Style::fill(&p.color));
        }
    }
    scene
}

// ============================================================================
// Wave
// ============================================================================

impl Diagram for WaveParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Wave
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Wave(eval::wave(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Wave(state) = state else {
            return placeholder(DiagramKind::Wave);
        };
        if state.curves.is_empty() {
            return placeholder(DiagramKind::Wave);
        }

        let vp = defaults::viewport(DiagramKind::Wave);
        let mut scene = Scene::new(vp);
        scene.title(title);

        if state.show_grid {
            for i in 0..5 {
                let y = i as f64 * 100.0;
                scene.line(DVec2::new(0.0, y), DVec2::new(vp.width, y), Style::stroke(GRID_FAINT, 1.0));
            }
            scene.line(
                DVec2::new(0.0, state.center_y),
                DVec2::new(vp.width, state.center_y),
                Style::stroke(GRID, 1.0),
            );
        }

        for curve in &state.curves {
            let outline = PathData::through(curve.points.iter().copied());
            if state.fill {
                let area = outline
                    .clone()
                    .line_to(DVec2::new(state.width, state.center_y))
                    .line_to(DVec2::new(0.0, state.center_y))
                    .close();
                scene.path(area, Style::fill(&curve.color).opacity(0.2));
            }
            scene.path(outline, Style::stroke(&curve.color, 3.0));
        }
        scene
    }
}

// ============================================================================
// Pendulum
// ============================================================================

impl Diagram for PendulumParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Pendulum
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Pendulum(eval::pendulum(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Pendulum(s) = state else {
            return placeholder(DiagramKind::Pendulum);
        };

        let mut scene = Scene::new(defaults::viewport(DiagramKind::Pendulum));
        scene.title(title);
        scene.text(
            label(
                50.0,
                70.0,
                format!(
                    "Length: {}cm | g = {}m/s² | Period: {:.2}s",
                    s.length, s.gravity, s.period
                ),
                LABEL_SIZE,
            ),
            MUTED,
        );

        // Mount
        let pivot = s.pivot;
        scene.rounded_rect(DVec2::new(pivot.x - 50.0, 50.0), DVec2::new(100.0, 20.0), 4.0, Style::fill(GRID));
        scene.line(DVec2::new(pivot.x, 65.0), pivot, Style::stroke(DIM, 4.0));
        scene.circle(DVec2::new(pivot.x, 65.0), 6.0, Style::fill(DIM));

        scene.line(
            pivot,
            pivot + DVec2::new(0.0, s.length),
            Style::stroke(TEXT, 1.0).dashed(&[4.0]).opacity(0.3),
        );
        scene.line(pivot, s.bob, Style::stroke(MUTED, 2.0));
        scene.circle(s.bob, 15.0 + s.mass.max(0.0) * 5.0, Style::fill(ACCENT));
        scene.text(
            label(s.bob.x, s.bob.y + 5.0, format!("m={}kg", s.mass), SMALL_SIZE)
                .centered()
                .weight(FontWeight::Bold),
            INK,
        );

        scene.text(label(50.0, 380.0, format!("ω = √(g/L) = {:.2} rad/s", s.omega), LABEL_SIZE).mono(), ACCENT);
        scene.text(label(50.0, 410.0, "θ(t) = θ₀ × sin(ωt)", LABEL_SIZE).mono(), TEXT);
        scene
    }
}

// ============================================================================
// Orbit
// ============================================================================

impl Diagram for OrbitParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Orbit
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Orbit(eval::orbit(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Orbit(state) = state else {
            return placeholder(DiagramKind::Orbit);
        };
        if state.bodies.is_empty() {
            return placeholder(DiagramKind::Orbit);
        }

        let mut scene = Scene::new(defaults::viewport(DiagramKind::Orbit));
        scene.title(title);

        for guide in &state.guides {
            scene.circle(guide.center, guide.radius, Style::stroke(GRID, 1.0).dashed(&[4.0]));
        }

        for body in &state.bodies {
            match body.kind {
                BodyKind::Star => {
                    scene.circle(body.pos, body.radius + 20.0, Style::fill(&body.color).opacity(0.3));
                    scene.circle(body.pos, body.radius, Style::fill(&body.color));
                    scene.text(
                        label(body.pos.x + body.radius + 10.0, body.pos.y + 5.0, &body.name, SMALL_SIZE)
                            .weight(FontWeight::Bold),
                        SUN_LABEL,
                    );
                }
                BodyKind::Planet => {
                    scene.circle(body.pos, body.radius, Style::fill(&body.color));
                    scene.text(
                        label(body.pos.x + body.radius + 5.0, body.pos.y + 4.0, &body.name, 11.0),
                        MUTED,
                    );
                }
            }
        }
        scene
    }
}

// ============================================================================
// Bar
// ============================================================================

impl Diagram for BarParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Bar
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Bar(eval::bar(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Bar(state) = state else {
            return placeholder(DiagramKind::Bar);
        };
        if state.bars.is_empty() {
            return placeholder(DiagramKind::Bar);
        }

        let area = state.area;
        let mut scene = Scene::new(defaults::viewport(DiagramKind::Bar));
        scene.text(
            label(area.left, 40.0, title, TITLE_SIZE).weight(FontWeight::SemiBold),
            TEXT,
        );

        let axis = Style::stroke(GRID, 2.0);
        scene.line(DVec2::new(area.left, area.bottom()), DVec2::new(area.right(), area.bottom()), axis.clone());
        scene.line(DVec2::new(area.left, area.top), DVec2::new(area.left, area.bottom()), axis);

        for ratio in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let y = area.bottom() - ratio * area.height;
            scene.line(DVec2::new(area.left, y), DVec2::new(area.right(), y), Style::stroke(GRID_FAINT, 1.0));
            scene.text(
                label(area.left - 10.0, y + 4.0, format!("{:.0}", state.max_value * ratio), SMALL_SIZE)
                    .anchored(TextAnchor::End),
                DIM,
            );
        }

        for bar in &state.bars {
            let mid = bar.x + bar.width / 2.0;
            let top = area.bottom() - bar.reveal;
            scene.rounded_rect(
                DVec2::new(bar.x, top),
                DVec2::new(bar.width, bar.reveal),
                4.0,
                Style::fill(&bar.color),
            );
            scene.text(label(mid, area.bottom() + 20.0, &bar.label, LABEL_SIZE).centered(), MUTED);
            if bar.reveal > BAR_LABEL_MIN_HEIGHT {
                scene.text(label(mid, top - 10.0, format!("{}", bar.value), SMALL_SIZE).centered(), TEXT);
            }
        }
        scene
    }
}

// ============================================================================
// Molecule
// ============================================================================

impl Diagram for MoleculeParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Molecule
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Molecule(eval::molecule(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Molecule(state) = state else {
            return placeholder(DiagramKind::Molecule);
        };
        if state.atoms.is_empty() {
            return placeholder(DiagramKind::Molecule);
        }

        let mut scene = Scene::new(defaults::viewport(DiagramKind::Molecule));
        scene.title(title);

        for &(a, b) in &state.bonds {
            if let (Some(a), Some(b)) = (state.atoms.get(a), state.atoms.get(b)) {
                scene.line(a.pos, b.pos, Style::stroke(DIM, 6.0));
            }
        }
        for atom in &state.atoms {
            scene.circle(atom.pos, ATOM_RADIUS, Style::fill(&atom.color).with_stroke("#FFF", 2.0));
            scene.text(
                label(atom.pos.x, atom.pos.y + 5.0, &atom.element, LABEL_SIZE)
                    .centered()
                    .weight(FontWeight::Bold),
                INK,
            );
        }
        scene
    }
}

// ============================================================================
// Circuit
// ============================================================================

impl Diagram for CircuitParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Circuit
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Circuit(eval::circuit(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Circuit(state) = state else {
            return placeholder(DiagramKind::Circuit);
        };
        if state.components.is_empty() {
            return placeholder(DiagramKind::Circuit);
        }

        let mut scene = Scene::new(defaults::viewport(DiagramKind::Circuit));
        scene.title(title);

        for comp in &state.components {
            draw_component(&mut scene, comp, state.led_glow);
        }
        for dot in &state.current {
            scene.circle(*dot, 4.0, Style::fill(ACCENT).opacity(0.8));
        }
        scene
    }
}

fn draw_component(scene: &mut Scene, comp: &CircuitComponent, led_glow: f64) {
    let pos = comp.pos.map(|[x, y]| DVec2::new(x, y));
    match (comp.kind, pos) {
        (ComponentKind::Battery, Some(p)) => {
            scene.rect(p - DVec2::new(20.0, 30.0), DVec2::new(40.0, 60.0), Style::stroke(DIM, 2.0));
            if let Some(v) = comp.voltage {
                scene.text(label(p.x, p.y + 5.0, format!("{v}V"), SMALL_SIZE).centered(), TEXT);
            }
            scene.text(label(p.x, p.y - 40.0, "+", 10.0).centered(), CORAL);
        }
        (ComponentKind::Resistor, Some(p)) => {
            scene.rounded_rect(p - DVec2::new(25.0, 10.0), DVec2::new(50.0, 20.0), 2.0, Style::fill(RESISTOR));
            if let Some(r) = comp.resistance {
                scene.text(label(p.x, p.y + 25.0, format!("{r}Ω"), 10.0).centered(), MUTED);
            }
        }
        (ComponentKind::Led, Some(p)) => {
            let color = comp.color.as_deref().unwrap_or(LED);
            scene.polygon(
                vec![
                    p + DVec2::new(0.0, -15.0),
                    p + DVec2::new(-10.0, 5.0),
                    p + DVec2::new(10.0, 5.0),
                ],
                Style::stroke(color, 2.0),
            );
            scene.circle(p, 8.0, Style::fill(color).opacity(led_glow));
        }
        (ComponentKind::Wire, _) => {
            let (Some([fx, fy]), Some([tx, ty])) = (comp.from, comp.to) else {
                return;
            };
            let (from, to) = (DVec2::new(fx, fy), DVec2::new(tx, ty));
            let data = match comp.curve {
                Some([cx, cy]) => PathData::new().move_to(from).quad_to(DVec2::new(cx, cy), to),
                None => PathData::new().move_to(from).line_to(to),
            };
            scene.path(data, Style::stroke(ACCENT, 2.0));
        }
        // Unknown components and ones without a position are skipped
        _ => {}
    }
}

// ============================================================================
// Process
// ============================================================================

impl Diagram for ProcessParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Process
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Process(eval::process(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let vp = defaults::viewport(DiagramKind::Process);
        let SceneState::Process(state) = state else {
            return placeholder(DiagramKind::Process);
        };
        if state.steps.is_empty() {
            return Scene::placeholder(vp, "No steps defined");
        }

        let mut scene = Scene::new(vp);
        scene.title(title);

        for seg in &state.segments {
            scene.line(seg.from, seg.to, Style::stroke(AXIS, 3.0));
            if let Some(head) = arrowhead(seg.to, seg.to - seg.from, 10.0, 5.0) {
                scene.polygon(head, Style::fill(AXIS));
            }
        }

        for (i, step) in state.steps.iter().enumerate() {
            scene.circle(step.pos, STEP_RADIUS + 5.0, Style::fill(&step.color).opacity(0.3));
            scene.circle(step.pos, STEP_RADIUS, Style::fill(&step.color).with_stroke(&step.color, 2.0));
            scene.text(
                label(step.pos.x, step.pos.y + 5.0, (i + 1).to_string(), LABEL_SIZE)
                    .centered()
                    .weight(FontWeight::Bold),
                INK,
            );
            scene.text(label(step.pos.x, step.pos.y + 50.0, &step.label, LABEL_SIZE).centered(), TEXT);
        }

        for marker in state.segments.iter().filter_map(|s| s.marker) {
            scene.circle(marker, 8.0, Style::fill(ACCENT));
        }
        scene
    }
}

// ============================================================================
// Graph
// ============================================================================

impl Diagram for GraphParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Graph
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Graph(eval::graph(self, time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Graph(state) = state else {
            return placeholder(DiagramKind::Graph);
        };
        if state.curves.is_empty() {
            return placeholder(DiagramKind::Graph);
        }

        let Viewport { width, height } = state.viewport;
        let pad = GRAPH_PADDING;
        let mut scene = Scene::new(state.viewport);
        scene.title(title);

        if state.show_grid {
            if state.map.y.contains(0.0) {
                let y = state.map.y.to_screen(0.0);
                scene.line(DVec2::new(pad, y), DVec2::new(width - pad, y), Style::stroke(AXIS, 1.0));
                scene.text(label(width - pad + 8.0, y + 4.0, "x", SMALL_SIZE), DIM);
            }
            if state.map.x.contains(0.0) {
                let x = state.map.x.to_screen(0.0);
                scene.line(DVec2::new(x, pad), DVec2::new(x, height - pad), Style::stroke(AXIS, 1.0));
                scene.text(label(x + 8.0, pad, "y", SMALL_SIZE), DIM);
            }
        }

        for curve in &state.curves {
            for segment in &curve.segments {
                scene.path(
                    PathData::through(segment.iter().copied()),
                    Style::stroke(&curve.color, curve.width),
                );
            }
        }
        scene
    }
}

// ============================================================================
// Fallback
// ============================================================================

impl Diagram for FallbackParams {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Fallback
    }

    fn evaluate(&self, time: AnimTime) -> SceneState {
        SceneState::Fallback(eval::fallback(time))
    }

    fn draw(&self, state: &SceneState, title: &str) -> Scene {
        let SceneState::Fallback(rings) = state else {
            return placeholder(DiagramKind::Fallback);
        };

        let vp = defaults::viewport(DiagramKind::Fallback);
        let center = vp.center();
        let mut scene = Scene::new(vp);
        scene.circle(center, rings.outer, Style::stroke(ACCENT, 3.0).opacity(0.5));
        scene.circle(center, rings.inner, Style::stroke(ACCENT, 2.0));
        scene.circle(center, 30.0, Style::fill(ACCENT));
        scene.text(label(center.x, vp.height - 20.0, title, 16.0).centered(), TEXT);
        scene
    }
}

impl Diagram for InvalidParams {
    fn kind(&self) -> DiagramKind {
        self.kind
    }

    fn evaluate(&self, _time: AnimTime) -> SceneState {
        SceneState::Empty
    }

    fn draw(&self, _state: &SceneState, _title: &str) -> Scene {
        placeholder(self.kind)
    }
}
