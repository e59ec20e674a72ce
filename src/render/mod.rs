//! Scene rendering for animated diagrams
//!
//! This module is organized into submodules:
//! - `defaults`: sizes, timings and palette
//! - `eval`: per-kind physics/math evaluators producing a [`SceneState`]
//! - `scene`: vector primitives
//! - `diagrams`: per-kind draw routines turning state into a [`Scene`]
//! - `svg`: SVG serialization

pub mod defaults;
pub mod diagrams;
pub mod eval;
pub mod scene;
pub mod svg;

use enum_dispatch::enum_dispatch;
use serde::Serialize;

pub use eval::SceneState;
pub use scene::{FontWeight, PathCmd, PathData, Primitive, Scene, Style, TextAnchor, TextLabel};
pub use svg::{RenderOptions, to_svg};

use crate::anim::AnimTime;
use crate::kind::DiagramKind;
use crate::params::{
    BarParams, CircuitParams, FallbackParams, GraphParams, InvalidParams, MoleculeParams,
    OrbitParams, PendulumParams, ProcessParams, ProjectileParams, WaveParams,
};

/// An evaluator/renderer pair for one diagram kind
#[enum_dispatch]
pub trait Diagram {
    fn kind(&self) -> DiagramKind;

    /// Instantaneous state at `time`. Pure.
    fn evaluate(&self, time: AnimTime) -> SceneState;

    /// Draw a state produced by [`Diagram::evaluate`]. A state of another
    /// kind, or one with nothing in it, draws the placeholder.
    fn draw(&self, state: &SceneState, title: &str) -> Scene;

    /// Evaluate and draw in one step
    fn scene(&self, time: AnimTime, title: &str) -> Scene {
        self.draw(&self.evaluate(time), title)
    }
}

/// Effective parameters: one typed record per diagram kind
#[enum_dispatch(Diagram)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum DiagramParams {
    Projectile(ProjectileParams),
    Wave(WaveParams),
    Pendulum(PendulumParams),
    Orbit(OrbitParams),
    Bar(BarParams),
    Molecule(MoleculeParams),
    Circuit(CircuitParams),
    Process(ProcessParams),
    Graph(GraphParams),
    Fallback(FallbackParams),
    Invalid(InvalidParams),
}

impl DiagramParams {
    /// Pretty JSON of the effective parameters, for inspection
    pub fn describe(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<{e}>"))
    }
}
