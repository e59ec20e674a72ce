//! Typed parameter records and the parameter normalizer.
//!
//! A diagram arrives as a kind string plus a free-form JSON bag. The bag is
//! projected onto the record for that kind; every field of every record is
//! optional and the renderers supply per-field fallbacks. An empty bag is
//! replaced wholesale by the kind's demonstration record.
//!
//! Defaults are never merged into a bag that has at least one key: a caller
//! who sends `{"fill": true}` for a wave gets no demonstration waves.

use std::f64::consts::FRAC_PI_4;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ConfigError, json_type_name};
use crate::kind::DiagramKind;
use crate::log::{debug, warn};
use crate::render::DiagramParams;
use crate::render::defaults::{ACCENT, CORAL, SAND, TEAL, TEXT};

/// Raw, loosely typed parameters as they come off the wire
pub type ParamBag = serde_json::Map<String, Value>;

/// Index of another entity in the same list (orbit parent, bond endpoint).
///
/// Resolution returns `None` for anything out of range, including negative
/// indices, so dangling references are simply not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(pub i64);

impl EntityRef {
    pub fn index(self, len: usize) -> Option<usize> {
        usize::try_from(self.0).ok().filter(|&i| i < len)
    }
}

// ============================================================================
// Projectile
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Normalized `[0,1]` position
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    pub color: Option<String>,
}

/// Two sub-modes: free particles (`particles`) or a single ballistic launch
/// (`velocity`/`angle`/`gravity`). `bounce` switches particles to the
/// stateful reflecting simulation when hosted live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileParams {
    pub particles: Option<Vec<Particle>>,
    pub bounds: Option<[f64; 2]>,
    pub trail: Option<bool>,
    pub bounce: Option<bool>,
    pub velocity: Option<f64>,
    /// Launch angle in degrees
    pub angle: Option<f64>,
    pub gravity: Option<f64>,
}

impl ProjectileParams {
    pub fn is_ballistic(&self) -> bool {
        self.velocity.is_some() || self.angle.is_some() || self.gravity.is_some()
    }

    pub fn bounces(&self) -> bool {
        self.bounce == Some(true) && !self.is_ballistic()
    }
}

// ============================================================================
// Wave
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub amplitude: Option<f64>,
    /// Cycles per second
    pub frequency: Option<f64>,
    /// Pixels per cycle
    pub wavelength: Option<f64>,
    pub phase: Option<f64>,
    pub color: Option<String>,
}

/// `waves` draws each entry as its own curve. Without `waves`, the top-level
/// `amplitude`/`frequency`/`wavelength` describe a single wave.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveParams {
    pub waves: Option<Vec<Wave>>,
    pub amplitude: Option<f64>,
    pub frequency: Option<f64>,
    pub wavelength: Option<f64>,
    pub show_grid: Option<bool>,
    pub fill: Option<bool>,
}

// ============================================================================
// Pendulum
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendulumParams {
    /// Rod length in pixels (100 px = 1 m)
    pub length: Option<f64>,
    pub gravity: Option<f64>,
    pub mass: Option<f64>,
}

// ============================================================================
// Orbit
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    #[default]
    #[serde(other)]
    Planet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: BodyKind,
    pub pos: Option<[f64; 2]>,
    /// Orbit radius in pixels
    pub orbit: Option<f64>,
    /// Radians per second
    pub speed: Option<f64>,
    pub radius: Option<f64>,
    pub color: Option<String>,
    pub parent: Option<EntityRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitParams {
    pub bodies: Option<Vec<Body>>,
    pub show_orbits: Option<bool>,
}

// ============================================================================
// Bar
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: Option<String>,
    #[serde(default)]
    pub value: f64,
    pub color: Option<String>,
}

/// How a bar's reveal height advances with time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    /// Constant pixels per frame shared by all bars
    Rate,
    /// Fixed duration per bar, staggered by index. Unknown names land here.
    #[default]
    #[serde(other)]
    Interpolate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarParams {
    pub data: Option<Vec<BarDatum>>,
    pub animate: Option<bool>,
    pub growth: Option<Growth>,
}

// ============================================================================
// Molecule
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Option<String>,
    #[serde(default)]
    pub pos: [f64; 2],
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeParams {
    pub atoms: Option<Vec<Atom>>,
    /// Pairs of atom indices
    pub bonds: Option<Vec<Vec<EntityRef>>>,
    pub animate_rotation: Option<bool>,
    /// Radians per second
    pub rotation_rate: Option<f64>,
}

// ============================================================================
// Circuit
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Battery,
    Resistor,
    Led,
    Wire,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitComponent {
    #[serde(rename = "type", default)]
    pub kind: ComponentKind,
    pub pos: Option<[f64; 2]>,
    pub voltage: Option<f64>,
    pub resistance: Option<f64>,
    pub color: Option<String>,
    pub from: Option<[f64; 2]>,
    pub to: Option<[f64; 2]>,
    /// Quadratic control point for a curved wire
    pub curve: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitParams {
    #[serde(alias = "components")]
    pub circuit_components: Option<Vec<CircuitComponent>>,
    pub show_current: Option<bool>,
}

// ============================================================================
// Process
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub label: Option<String>,
    #[serde(default)]
    pub pos: [f64; 2],
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessParams {
    pub steps: Option<Vec<Step>>,
    pub flow: Option<bool>,
    pub animate_flow: Option<bool>,
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionPlot {
    /// Expression name: `sin(x)`, `cos(x)`, `tan(x)`, `x^2`, `exp(x)`
    pub eq: Option<String>,
    pub color: Option<String>,
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphParams {
    pub functions: Option<Vec<FunctionPlot>>,
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub show_grid: Option<bool>,
    pub animate: Option<bool>,
}

// ============================================================================
// Fallback
// ============================================================================

/// Unrecognized kinds carry no parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackParams {}

/// A bag that could not be read as its kind's record. Always drawn as the
/// placeholder scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidParams {
    pub kind: DiagramKind,
    pub reason: String,
}

// ============================================================================
// Normalizer
// ============================================================================

/// Resolve a kind's effective parameters.
///
/// Total: never fails. An empty bag yields the demonstration record; a bag
/// that does not fit the kind's record yields [`InvalidParams`], which the
/// renderer shows as a placeholder.
pub fn normalize(kind: DiagramKind, bag: &ParamBag) -> DiagramParams {
    if bag.is_empty() {
        debug!(%kind, "empty params, using demonstration data");
        return demo(kind);
    }

    let projected = match kind {
        DiagramKind::Projectile => project::<ProjectileParams>(bag),
        DiagramKind::Wave => project::<WaveParams>(bag),
        DiagramKind::Pendulum => project::<PendulumParams>(bag),
        DiagramKind::Orbit => project::<OrbitParams>(bag),
        DiagramKind::Bar => project::<BarParams>(bag),
        DiagramKind::Molecule => project::<MoleculeParams>(bag),
        DiagramKind::Circuit => project::<CircuitParams>(bag),
        DiagramKind::Process => project::<ProcessParams>(bag),
        DiagramKind::Graph => project::<GraphParams>(bag),
        DiagramKind::Fallback => Ok(FallbackParams {}.into()),
    };

    projected.unwrap_or_else(|err| {
        warn!(%kind, error = %err, "params do not match diagram kind, rendering placeholder");
        InvalidParams {
            kind,
            reason: err.to_string(),
        }
        .into()
    })
}

fn project<T>(bag: &ParamBag) -> Result<DiagramParams, serde_json::Error>
where
    T: DeserializeOwned + Into<DiagramParams>,
{
    serde_json::from_value::<T>(Value::Object(bag.clone())).map(Into::into)
}

fn color(c: &str) -> Option<String> {
    Some(c.to_string())
}

/// Hand-authored demonstration record for a kind
pub fn demo(kind: DiagramKind) -> DiagramParams {
    match kind {
        DiagramKind::Projectile => {
            let particle = |x, y, vx, vy, c| Particle {
                x,
                y,
                vx,
                vy,
                color: color(c),
            };
            ProjectileParams {
                particles: Some(vec![
                    particle(0.2, 0.3, 2.0, 1.5, ACCENT),
                    particle(0.5, 0.6, -1.5, 2.0, CORAL),
                    particle(0.7, 0.4, 1.0, -2.0, TEAL),
                    particle(0.3, 0.8, -2.0, -1.0, SAND),
                ]),
                bounds: Some([800.0, 500.0]),
                trail: Some(true),
                ..Default::default()
            }
            .into()
        }
        DiagramKind::Wave => {
            let wave = |amplitude, frequency, wavelength, phase, c| Wave {
                amplitude: Some(amplitude),
                frequency: Some(frequency),
                wavelength: Some(wavelength),
                phase: Some(phase),
                color: color(c),
            };
            WaveParams {
                waves: Some(vec![
                    wave(60.0, 1.5, 120.0, 0.0, ACCENT),
                    wave(40.0, 2.0, 80.0, FRAC_PI_4, CORAL),
                ]),
                show_grid: Some(true),
                fill: Some(true),
                ..Default::default()
            }
            .into()
        }
        DiagramKind::Pendulum => PendulumParams {
            length: Some(150.0),
            gravity: Some(9.8),
            mass: Some(1.0),
        }
        .into(),
        DiagramKind::Orbit => OrbitParams {
            bodies: Some(vec![
                Body {
                    name: Some("Sun".into()),
                    kind: BodyKind::Star,
                    pos: Some([400.0, 250.0]),
                    radius: Some(50.0),
                    ..Default::default()
                },
                Body {
                    name: Some("Earth".into()),
                    kind: BodyKind::Planet,
                    orbit: Some(150.0),
                    speed: Some(1.0),
                    radius: Some(15.0),
                    color: color(TEAL),
                    parent: Some(EntityRef(0)),
                    ..Default::default()
                },
                Body {
                    name: Some("Mars".into()),
                    kind: BodyKind::Planet,
                    orbit: Some(220.0),
                    speed: Some(0.7),
                    radius: Some(12.0),
                    color: color(CORAL),
                    parent: Some(EntityRef(0)),
                    ..Default::default()
                },
            ]),
            show_orbits: Some(true),
        }
        .into(),
        DiagramKind::Bar => {
            let datum = |label: &str, value, c| BarDatum {
                label: Some(label.to_string()),
                value,
                color: color(c),
            };
            BarParams {
                data: Some(vec![
                    datum("Step 1", 75.0, ACCENT),
                    datum("Step 2", 45.0, CORAL),
                    datum("Step 3", 90.0, TEAL),
                    datum("Step 4", 60.0, SAND),
                ]),
                animate: Some(true),
                growth: None,
            }
            .into()
        }
        DiagramKind::Molecule => {
            let atom = |element: &str, x, y, c| Atom {
                element: Some(element.to_string()),
                pos: [x, y],
                color: color(c),
            };
            MoleculeParams {
                atoms: Some(vec![
                    atom("O", 300.0, 250.0, CORAL),
                    atom("H", 250.0, 320.0, TEXT),
                    atom("H", 350.0, 320.0, TEXT),
                ]),
                bonds: Some(vec![
                    vec![EntityRef(0), EntityRef(1)],
                    vec![EntityRef(0), EntityRef(2)],
                ]),
                animate_rotation: Some(true),
                rotation_rate: None,
            }
            .into()
        }
        DiagramKind::Circuit => {
            let wire = |from, to| CircuitComponent {
                kind: ComponentKind::Wire,
                from: Some(from),
                to: Some(to),
                ..Default::default()
            };
            CircuitParams {
                circuit_components: Some(vec![
                    CircuitComponent {
                        kind: ComponentKind::Battery,
                        pos: Some([100.0, 200.0]),
                        voltage: Some(9.0),
                        ..Default::default()
                    },
                    wire([140.0, 200.0], [300.0, 200.0]),
                    CircuitComponent {
                        kind: ComponentKind::Resistor,
                        pos: Some([300.0, 200.0]),
                        resistance: Some(100.0),
                        ..Default::default()
                    },
                    wire([350.0, 200.0], [350.0, 350.0]),
                    wire([350.0, 350.0], [100.0, 350.0]),
                    wire([100.0, 350.0], [100.0, 260.0]),
                    CircuitComponent {
                        kind: ComponentKind::Led,
                        pos: Some([250.0, 275.0]),
                        color: color(ACCENT),
                        ..Default::default()
                    },
                ]),
                show_current: Some(true),
            }
            .into()
        }
        DiagramKind::Process => {
            let step = |label: &str, x, c| Step {
                label: Some(label.to_string()),
                pos: [x, 200.0],
                color: color(c),
            };
            ProcessParams {
                steps: Some(vec![
                    step("Input", 150.0, ACCENT),
                    step("Process", 400.0, CORAL),
                    step("Output", 650.0, TEAL),
                ]),
                flow: Some(true),
                animate_flow: Some(true),
            }
            .into()
        }
        DiagramKind::Graph => GraphParams {
            functions: Some(vec![
                FunctionPlot {
                    eq: Some("sin(x)".into()),
                    color: color(ACCENT),
                    line_width: Some(3.0),
                },
                FunctionPlot {
                    eq: Some("cos(x)".into()),
                    color: color(CORAL),
                    line_width: Some(2.0),
                },
            ]),
            x_range: Some([-10.0, 10.0]),
            y_range: Some([-3.0, 3.0]),
            show_grid: Some(true),
            animate: Some(true),
        }
        .into(),
        DiagramKind::Fallback => FallbackParams {}.into(),
    }
}

// ============================================================================
// Diagram configuration
// ============================================================================

/// A diagram request: which kind, an optional title, and the raw bag.
///
/// Built once per answer and never mutated; a new answer builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig {
    pub kind: DiagramKind,
    pub title: Option<String>,
    pub params: ParamBag,
}

impl DiagramConfig {
    pub fn new(kind: DiagramKind) -> Self {
        Self {
            kind,
            title: None,
            params: ParamBag::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_params(mut self, params: ParamBag) -> Self {
        self.params = params;
        self
    }

    /// Read `{ "type": ..., "title"?: ..., "params"?: {...} }`.
    ///
    /// A `title` inside `params` is used when there is none at the top level.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let obj = value.as_object().ok_or(ConfigError::NotAnObject {
            got: json_type_name(value),
        })?;

        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ConfigError::MissingType)?;

        let params = match obj.get("params") {
            None | Some(Value::Null) => ParamBag::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(ConfigError::ParamsNotAnObject {
                    got: json_type_name(other),
                });
            }
        };

        let title = obj
            .get("title")
            .and_then(Value::as_str)
            .or_else(|| params.get("title").and_then(Value::as_str))
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);

        Ok(Self {
            kind: DiagramKind::parse(kind),
            title,
            params,
        })
    }

    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(source).map_err(|e| ConfigError::InvalidJson {
            message: e.to_string(),
        })?;
        Self::from_json(&value)
    }

    /// Title to draw: the configured one or the kind's default
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .unwrap_or_else(|| self.kind.default_title())
    }

    pub fn effective_params(&self) -> DiagramParams {
        normalize(self.kind, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> ParamBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn empty_bag_gives_demo() {
        for kind in DiagramKind::ALL {
            assert_eq!(normalize(kind, &ParamBag::new()), demo(kind));
        }
    }

    #[test]
    fn partial_bag_is_not_merged() {
        let params = normalize(DiagramKind::Wave, &bag(json!({ "fill": true })));
        assert_eq!(
            params,
            DiagramParams::from(WaveParams {
                fill: Some(true),
                ..Default::default()
            })
        );
    }

    #[test]
    fn malformed_bag_is_invalid() {
        let params = normalize(DiagramKind::Orbit, &bag(json!({ "bodies": "lots" })));
        let DiagramParams::Invalid(invalid) = params else {
            panic!("expected invalid params");
        };
        assert_eq!(invalid.kind, DiagramKind::Orbit);

        let params = normalize(DiagramKind::Pendulum, &bag(json!({ "length": "long" })));
        assert!(matches!(params, DiagramParams::Invalid(_)));
    }

    #[test]
    fn unknown_fields_and_types_are_tolerated() {
        let params = normalize(
            DiagramKind::Orbit,
            &bag(json!({
                "bodies": [{ "name": "Comet", "type": "comet", "orbit": 80 }],
                "style": "neon"
            })),
        );
        let DiagramParams::Orbit(orbit) = params else {
            panic!("expected orbit params");
        };
        let bodies = orbit.bodies.unwrap();
        assert_eq!(bodies[0].kind, BodyKind::Planet);
        assert_eq!(bodies[0].orbit, Some(80.0));
    }

    #[test]
    fn circuit_accepts_components_alias() {
        let params = normalize(
            DiagramKind::Circuit,
            &bag(json!({ "components": [{ "type": "resistor", "pos": [10, 20] }] })),
        );
        let DiagramParams::Circuit(circuit) = params else {
            panic!("expected circuit params");
        };
        assert_eq!(
            circuit.circuit_components.unwrap()[0].kind,
            ComponentKind::Resistor
        );
    }

    #[test]
    fn entity_refs_resolve_or_vanish() {
        assert_eq!(EntityRef(1).index(3), Some(1));
        assert_eq!(EntityRef(3).index(3), None);
        assert_eq!(EntityRef(-1).index(3), None);
    }

    #[test]
    fn bar_growth_names() {
        let growth = |value: Value| {
            let DiagramParams::Bar(bar) = normalize(DiagramKind::Bar, &bag(json!({ "growth": value })))
            else {
                panic!("expected bar params");
            };
            bar.growth
        };
        assert_eq!(growth(json!("rate")), Some(Growth::Rate));
        assert_eq!(growth(json!("interpolate")), Some(Growth::Interpolate));
        assert_eq!(growth(json!("bogus")), Some(Growth::Interpolate));
    }

    #[test]
    fn config_from_json() {
        let config = DiagramConfig::from_json(&json!({
            "type": "astronomy",
            "params": { "title": "Inner planets", "showOrbits": true }
        }))
        .unwrap();
        assert_eq!(config.kind, DiagramKind::Orbit);
        assert_eq!(config.display_title(), "Inner planets");
        assert_eq!(config.params.len(), 2);
    }

    #[test]
    fn config_errors() {
        assert!(matches!(
            DiagramConfig::from_json(&json!([1, 2])),
            Err(ConfigError::NotAnObject { got: "an array" })
        ));
        assert!(matches!(
            DiagramConfig::from_json(&json!({ "title": "x" })),
            Err(ConfigError::MissingType)
        ));
        assert!(matches!(
            DiagramConfig::from_json(&json!({ "type": "wave", "params": 3 })),
            Err(ConfigError::ParamsNotAnObject { got: "a number" })
        ));
        assert!(matches!(
            DiagramConfig::parse("{nope"),
            Err(ConfigError::InvalidJson { .. })
        ));
    }

    #[test]
    fn null_params_is_empty() {
        let config = DiagramConfig::from_json(&json!({ "type": "bar", "params": null })).unwrap();
        assert!(config.params.is_empty());
        assert_eq!(config.display_title(), "Data");
    }
}
