//! Vector scene primitives produced by the diagram renderers

use glam::DVec2;

use super::defaults;
use crate::types::Viewport;

/// Text shown by the "no data" placeholder scene
pub const PLACEHOLDER_TEXT: &str = "No data available";

/// Paint properties shared by every primitive
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub dash: Option<Vec<f64>>,
    pub opacity: Option<f64>,
}

impl Style {
    pub fn fill(color: &str) -> Self {
        Style {
            fill: Some(color.to_string()),
            ..Default::default()
        }
    }

    pub fn stroke(color: &str, width: f64) -> Self {
        Style {
            fill: Some("none".to_string()),
            stroke: Some(color.to_string()),
            stroke_width: Some(width),
            ..Default::default()
        }
    }

    pub fn with_stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = Some(color.to_string());
        self.stroke_width = Some(width);
        self
    }

    pub fn dashed(mut self, dash: &[f64]) -> Self {
        self.dash = Some(dash.to_vec());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// One command of an SVG-style path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(DVec2),
    LineTo(DVec2),
    QuadTo(DVec2, DVec2),
    CubicTo(DVec2, DVec2, DVec2),
    Close,
}

/// Path data built command by command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub cmds: Vec<PathCmd>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: DVec2) -> Self {
        self.cmds.push(PathCmd::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: DVec2) -> Self {
        self.cmds.push(PathCmd::LineTo(p));
        self
    }

    pub fn quad_to(mut self, ctrl: DVec2, p: DVec2) -> Self {
        self.cmds.push(PathCmd::QuadTo(ctrl, p));
        self
    }

    pub fn cubic_to(mut self, c1: DVec2, c2: DVec2, p: DVec2) -> Self {
        self.cmds.push(PathCmd::CubicTo(c1, c2, p));
        self
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    /// Polyline through `points`, starting with a move
    pub fn through(points: impl IntoIterator<Item = DVec2>) -> Self {
        let cmds = points
            .into_iter()
            .enumerate()
            .map(|(i, p)| if i == 0 { PathCmd::MoveTo(p) } else { PathCmd::LineTo(p) })
            .collect();
        Self { cmds }
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    SemiBold,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub at: DVec2,
    pub text: String,
    pub size: f64,
    pub anchor: TextAnchor,
    pub weight: FontWeight,
    pub monospace: bool,
}

impl TextLabel {
    pub fn new(at: DVec2, text: impl Into<String>, size: f64) -> Self {
        Self {
            at,
            text: text.into(),
            size,
            anchor: TextAnchor::Start,
            weight: FontWeight::Normal,
            monospace: false,
        }
    }

    pub fn centered(mut self) -> Self {
        self.anchor = TextAnchor::Middle;
        self
    }

    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn mono(mut self) -> Self {
        self.monospace = true;
        self
    }
}

/// A single drawable shape or label
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: DVec2,
        to: DVec2,
        style: Style,
    },
    Rect {
        min: DVec2,
        size: DVec2,
        corner_radius: f64,
        style: Style,
    },
    Circle {
        center: DVec2,
        radius: f64,
        style: Style,
    },
    Polygon {
        points: Vec<DVec2>,
        style: Style,
    },
    Polyline {
        points: Vec<DVec2>,
        style: Style,
    },
    Path {
        data: PathData,
        style: Style,
    },
    Text {
        label: TextLabel,
        style: Style,
    },
}

impl Primitive {
    pub fn style(&self) -> &Style {
        match self {
            Primitive::Line { style, .. }
            | Primitive::Rect { style, .. }
            | Primitive::Circle { style, .. }
            | Primitive::Polygon { style, .. }
            | Primitive::Polyline { style, .. }
            | Primitive::Path { style, .. }
            | Primitive::Text { style, .. } => style,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text { label, .. } => Some(&label.text),
            _ => None,
        }
    }
}

/// An ordered list of primitives on a fixed-size canvas. Later primitives
/// paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            primitives: Vec::new(),
        }
    }

    /// The single-label scene shown when a diagram has nothing to draw
    pub fn placeholder(viewport: Viewport, message: &str) -> Self {
        let mut scene = Scene::new(viewport);
        scene.text(
            TextLabel::new(viewport.center(), message, defaults::PLACEHOLDER_SIZE).centered(),
            defaults::DIM,
        );
        scene
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// True for a scene made only of one placeholder label
    pub fn is_placeholder(&self) -> bool {
        match self.primitives.as_slice() {
            [Primitive::Text { label, .. }] => {
                label.anchor == TextAnchor::Middle && label.at == self.viewport().center()
            }
            _ => false,
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn line(&mut self, from: DVec2, to: DVec2, style: Style) {
        self.push(Primitive::Line { from, to, style });
    }

    pub fn rect(&mut self, min: DVec2, size: DVec2, style: Style) {
        self.push(Primitive::Rect {
            min,
            size,
            corner_radius: 0.0,
            style,
        });
    }

    pub fn rounded_rect(&mut self, min: DVec2, size: DVec2, corner_radius: f64, style: Style) {
        self.push(Primitive::Rect {
            min,
            size,
            corner_radius,
            style,
        });
    }

    pub fn circle(&mut self, center: DVec2, radius: f64, style: Style) {
        self.push(Primitive::Circle {
            center,
            radius,
            style,
        });
    }

    pub fn polygon(&mut self, points: Vec<DVec2>, style: Style) {
        self.push(Primitive::Polygon { points, style });
    }

    pub fn polyline(&mut self, points: Vec<DVec2>, style: Style) {
        self.push(Primitive::Polyline { points, style });
    }

    pub fn path(&mut self, data: PathData, style: Style) {
        if !data.is_empty() {
            self.push(Primitive::Path { data, style });
        }
    }

    pub fn text(&mut self, label: TextLabel, color: &str) {
        self.push(Primitive::Text {
            label,
            style: Style::fill(color),
        });
    }

    /// Standard title in the top-left corner
    pub fn title(&mut self, title: &str) {
        self.text(
            TextLabel::new(DVec2::new(20.0, 35.0), title, defaults::TITLE_SIZE)
                .weight(FontWeight::SemiBold),
            defaults::TEXT,
        );
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(Primitive::as_text)
    }

    pub fn count_paths(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Path { .. }))
            .count()
    }
}
