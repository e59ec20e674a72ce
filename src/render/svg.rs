//! SVG generation

use facet_svg::facet_xml::SerializeOptions;
use facet_svg::{
    Circle as SvgCircle, Path as SvgPath, PathData as SvgPathData, Points, Polygon as SvgPolygon,
    Style as CssBlock, Svg, SvgNode, SvgStyle, Text as SvgText, facet_xml,
};
use glam::DVec2;

use super::defaults;
use super::scene::{FontWeight, PathCmd, PathData, Primitive, Scene, Style, TextAnchor, TextLabel};
use crate::errors::RenderError;
use crate::log::debug;
use crate::types::Viewport;

/// Options for SVG output
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Emit palette colors as `var(--sv-*)` references plus a `:root` block,
    /// so a host stylesheet can restyle the diagram
    pub css_variables: bool,
    /// Paint a full-size background rectangle first
    pub background: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            css_variables: false,
            background: Some(defaults::BACKGROUND.to_string()),
        }
    }
}

/// Convert a color to either a CSS variable reference or the literal value
pub fn color_to_string(color: &str, use_css_vars: bool) -> String {
    if use_css_vars {
        let found = defaults::PALETTE
            .iter()
            .find(|(_, value)| value.eq_ignore_ascii_case(color));
        if let Some((name, _)) = found {
            return format!("var(--sv-{name})");
        }
    }
    color.to_string()
}

/// CSS custom property definitions for the palette
fn palette_css() -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in defaults::PALETTE {
        css.push_str(&format!("  --sv-{name}: {value};\n"));
    }
    css.push('}');
    css
}

/// Serialize a scene to an SVG document
pub fn to_svg(scene: &Scene, options: &RenderOptions) -> Result<String, RenderError> {
    let viewport = Viewport::try_new(scene.width, scene.height).map_err(|_| {
        RenderError::InvalidViewport {
            width: scene.width,
            height: scene.height,
        }
    })?;
    let css = options.css_variables;

    let mut children: Vec<SvgNode> = Vec::with_capacity(scene.primitives.len() + 2);
    if css {
        children.push(SvgNode::Style(CssBlock {
            type_: Some("text/css".to_string()),
            content: palette_css(),
        }));
    }
    if let Some(bg) = &options.background {
        let backdrop = PathData::through([
            DVec2::ZERO,
            DVec2::new(viewport.width, 0.0),
            DVec2::new(viewport.width, viewport.height),
            DVec2::new(0.0, viewport.height),
        ])
        .close();
        children.push(path_node(&backdrop, &Style::fill(bg), css));
    }
    children.extend(scene.primitives.iter().map(|p| primitive_node(p, css)));

    let (w, h) = (fmt_num(viewport.width), fmt_num(viewport.height));
    let svg = Svg {
        width: Some(w.clone()),
        height: Some(h.clone()),
        view_box: Some(format!("0 0 {w} {h}")),
        children,
    };

    let ser = SerializeOptions {
        float_formatter: Some(write_float),
        ..Default::default()
    };
    let out = facet_xml::to_string_with_options(&svg, &ser).map_err(|e| RenderError::Serialize {
        message: e.to_string(),
    })?;
    debug!(primitives = scene.primitives.len(), bytes = out.len(), "svg written");
    Ok(out)
}

fn primitive_node(primitive: &Primitive, css: bool) -> SvgNode {
    match primitive {
        Primitive::Line { from, to, style } => {
            path_node(&PathData::new().move_to(*from).line_to(*to), style, css)
        }
        Primitive::Rect {
            min,
            size,
            corner_radius,
            style,
        } => SvgNode::Path(SvgPath {
            d: Some(rect_path(*min, size.max(DVec2::ZERO), *corner_radius)),
            fill: None,
            stroke: None,
            stroke_width: None,
            stroke_dasharray: None,
            style: paint(style, css),
        }),
        Primitive::Circle {
            center,
            radius,
            style,
        } => SvgNode::Circle(SvgCircle {
            cx: Some(center.x),
            cy: Some(center.y),
            r: Some(radius.max(0.0)),
            fill: None,
            stroke: None,
            stroke_width: None,
            stroke_dasharray: None,
            style: paint(style, css),
        }),
        Primitive::Polygon { points, style } => SvgNode::Polygon(SvgPolygon {
            points: points
                .iter()
                .fold(Points::new(), |acc, p| acc.push(p.x, p.y)),
            fill: None,
            stroke: None,
            stroke_width: None,
            stroke_dasharray: None,
            style: paint(style, css),
        }),
        Primitive::Polyline { points, style } => {
            path_node(&PathData::through(points.iter().copied()), style, css)
        }
        Primitive::Path { data, style } => path_node(data, style, css),
        Primitive::Text { label, style } => SvgNode::Text(text_node(label, style, css)),
    }
}

fn path_node(data: &PathData, style: &Style, css: bool) -> SvgNode {
    SvgNode::Path(SvgPath {
        d: Some(path_data(data)),
        fill: None,
        stroke: None,
        stroke_width: None,
        stroke_dasharray: None,
        style: paint(style, css),
    })
}

fn path_data(data: &PathData) -> SvgPathData {
    data.cmds.iter().fold(SvgPathData::new(), |d, cmd| match *cmd {
        PathCmd::MoveTo(p) => d.m(p.x, p.y),
        PathCmd::LineTo(p) => d.l(p.x, p.y),
        PathCmd::QuadTo(c, p) => d.q(c.x, c.y, p.x, p.y),
        PathCmd::CubicTo(c1, c2, p) => d.c(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
        PathCmd::Close => d.z(),
    })
}

/// Clockwise outline from the top-left corner; arcs round the corners when
/// `radius` is positive
fn rect_path(min: DVec2, size: DVec2, radius: f64) -> SvgPathData {
    let (x1, y1) = (min.x, min.y);
    let (x2, y2) = (min.x + size.x, min.y + size.y);
    let r = radius.clamp(0.0, size.x.min(size.y) / 2.0);
    if r <= 0.0 {
        return SvgPathData::new().m(x1, y1).l(x2, y1).l(x2, y2).l(x1, y2).z();
    }
    SvgPathData::new()
        .m(x1 + r, y1)
        .l(x2 - r, y1)
        .a(r, r, 0.0, false, true, x2, y1 + r)
        .l(x2, y2 - r)
        .a(r, r, 0.0, false, true, x2 - r, y2)
        .l(x1 + r, y2)
        .a(r, r, 0.0, false, true, x1, y2 - r)
        .l(x1, y1 + r)
        .a(r, r, 0.0, false, true, x1 + r, y1)
        .z()
}

fn text_node(label: &TextLabel, style: &Style, css: bool) -> SvgText {
    let anchor = match label.anchor {
        TextAnchor::Start => None,
        TextAnchor::Middle => Some("middle"),
        TextAnchor::End => Some("end"),
    };
    let weight = match label.weight {
        FontWeight::Normal => None,
        FontWeight::SemiBold => Some("600"),
        FontWeight::Bold => Some("bold"),
    };
    let family = if label.monospace {
        "monospace"
    } else {
        "system-ui, sans-serif"
    };

    SvgText {
        x: Some(label.at.x),
        y: Some(label.at.y),
        transform: None,
        fill: style.fill.as_deref().map(|c| color_to_string(c, css)),
        stroke: None,
        stroke_width: None,
        style: String::new(),
        font_family: Some(family.to_string()),
        font_style: None,
        font_weight: weight.map(str::to_string),
        font_size: Some(fmt_num(label.size)),
        text_anchor: anchor.map(str::to_string),
        dominant_baseline: None,
        content: label.text.clone(),
    }
}

/// Fill, stroke, dash and opacity as one `style` attribute
fn paint(style: &Style, css: bool) -> SvgStyle {
    let mut out = SvgStyle::new();
    if let Some(fill) = &style.fill {
        out = out.add("fill", &color_to_string(fill, css));
    }
    if let Some(stroke) = &style.stroke {
        out = out.add("stroke", &color_to_string(stroke, css));
    }
    if let Some(width) = style.stroke_width {
        out = out.add("stroke-width", &fmt_num(width));
    }
    if let Some(dash) = &style.dash {
        let parts: Vec<String> = dash.iter().map(|d| fmt_num(*d)).collect();
        out = out.add("stroke-dasharray", &parts.join(","));
    }
    if let Some(opacity) = style.opacity {
        out = out.add("opacity", &fmt_num(opacity.clamp(0.0, 1.0)));
    }
    out
}

fn write_float(value: f64, writer: &mut dyn std::io::Write) -> Result<(), std::io::Error> {
    write!(writer, "{}", fmt_num(value))
}

/// Six significant digits without trailing zeros. NaN and infinities print
/// as 0 so one bad coordinate cannot break the document.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_significant(value, 6)
}

fn fmt_significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    // digits left of the point; zero or negative for |value| < 1
    let whole = value.abs().log10().floor() as i32 + 1;
    let decimals = (digits - whole).max(0) as usize;
    let mut s = format!("{value:.decimals$}");
    if s.contains('.') {
        let keep = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(keep);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::TextLabel;

    fn bare() -> RenderOptions {
        RenderOptions {
            background: None,
            ..Default::default()
        }
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(400.0), "400");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
        assert_eq!(fmt_num(-0.0000001), "-0.0000001");
        assert_eq!(fmt_num(9.9999999), "10");
        assert_eq!(fmt_num(-0.0000000001), "-0.0000000001");
        assert_eq!(fmt_num(f64::NAN), "0");
    }

    #[test]
    fn text_is_escaped() {
        let mut scene = Scene::new(Viewport::new(100.0, 50.0));
        scene.text(TextLabel::new(DVec2::new(1.0, 2.0), "a < b & c", 12.0), "#fff");
        let svg = to_svg(&scene, &bare()).unwrap();
        assert!(svg.contains("a &lt; b &amp; c"), "{svg}");
    }

    #[test]
    fn css_variables_replace_palette_colors() {
        let mut scene = Scene::new(Viewport::new(100.0, 50.0));
        scene.circle(DVec2::new(10.0, 10.0), 5.0, Style::fill(defaults::ACCENT));
        scene.circle(DVec2::new(20.0, 10.0), 5.0, Style::fill("#123456"));
        let opts = RenderOptions {
            css_variables: true,
            ..Default::default()
        };
        let svg = to_svg(&scene, &opts).unwrap();
        assert!(svg.contains("--sv-accent: #C6FF00;"));
        assert!(svg.contains("var(--sv-accent)"));
        assert!(svg.contains("#123456"));
        assert!(svg.contains("var(--sv-background)"));
    }

    #[test]
    fn every_primitive_becomes_an_element() {
        let mut scene = Scene::new(Viewport::new(200.0, 100.0));
        scene.line(DVec2::ZERO, DVec2::new(40.0, 20.0), Style::stroke("#333", 2.0).dashed(&[4.0]));
        scene.rounded_rect(DVec2::new(10.0, 10.0), DVec2::new(50.0, 20.0), 4.0, Style::fill("#222"));
        scene.circle(DVec2::new(100.0, 50.0), 12.0, Style::fill("#f00").opacity(0.5));
        scene.polygon(
            vec![DVec2::ZERO, DVec2::new(5.0, 0.0), DVec2::new(0.0, 5.0)],
            Style::fill("#0f0"),
        );
        scene.text(TextLabel::new(DVec2::new(20.0, 10.0), "hi", 12.0).centered(), "#fff");

        let svg = to_svg(&scene, &bare()).unwrap();
        assert!(svg.starts_with("<svg"), "{svg}");
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert_eq!(svg.matches("<path").count(), 2);
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(svg.contains(r#"cx="100""#));
        assert!(svg.contains(r#"r="12""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(">hi</text>"));
    }

    #[test]
    fn background_is_painted_first() {
        let mut scene = Scene::new(Viewport::new(40.0, 20.0));
        scene.circle(DVec2::new(10.0, 10.0), 5.0, Style::fill("#f00"));
        let svg = to_svg(&scene, &RenderOptions::default()).unwrap();
        let backdrop = svg.find(defaults::BACKGROUND).unwrap();
        let circle = svg.find("<circle").unwrap();
        assert!(backdrop < circle);
    }

    #[test]
    fn bad_viewport_is_an_error() {
        let scene = Scene {
            width: 0.0,
            height: 100.0,
            primitives: vec![],
        };
        let err = to_svg(&scene, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidViewport { .. }));
    }

    #[test]
    fn palette_block() {
        insta::assert_snapshot!(palette_css().lines().take(3).collect::<Vec<_>>().join("\n"), @r"
        :root {
          --sv-background: #0A0A0A;
          --sv-accent: #C6FF00;
        ");
    }
}
