//! Whole-crate properties every diagram kind must hold

use glam::DVec2;
use serde_json::{Value, json};
use storyviz::params::{Body, BodyKind};
use storyviz::render::eval::{bar_growth_frames, bar_reveal, body_position, orbital_period};
use storyviz::render::{Primitive, SceneState};
use storyviz::{
    AnimTime, ComposedScheduler, Diagram, DiagramConfig, DiagramKind, FrameScheduler, ParamBag,
    RenderOptions, normalize, render,
};

fn bag(value: Value) -> ParamBag {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

// =============================================================================
// Demonstration data
// =============================================================================

#[test]
fn demo_params_render_real_content() {
    for kind in DiagramKind::ALL {
        let params = normalize(kind, &ParamBag::new());
        let scene = params.scene(AnimTime::ZERO, kind.default_title());
        assert!(!scene.is_placeholder(), "{kind} demo rendered a placeholder");
        assert!(
            scene.primitives.iter().any(|p| p.as_text().is_none()),
            "{kind} demo has no shapes"
        );
    }
}

#[test]
fn demo_params_animate() {
    for kind in DiagramKind::ALL {
        let params = normalize(kind, &ParamBag::new());
        let first = params.scene(AnimTime::ZERO, "t");
        let later = params.scene(AnimTime::from_frame(20), "t");
        assert_ne!(first, later, "{kind} demo is static");
    }
}

#[test]
fn composed_frames_are_deterministic() {
    for kind in DiagramKind::ALL {
        let config = DiagramConfig::new(kind);
        for frame in [0, 7, 59, 119] {
            let a = storyviz::render_svg(&config, frame, &RenderOptions::default()).unwrap();
            let b = storyviz::render_svg(&config, frame, &RenderOptions::default()).unwrap();
            assert_eq!(a, b, "{kind} frame {frame} differs between runs");
        }
    }
}

#[test]
fn composed_scheduler_drives_frames() {
    use std::sync::{Arc, Mutex};

    let config = DiagramConfig::new(DiagramKind::Bar);
    let scheduler = ComposedScheduler::for_kind(config.kind);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = scheduler.subscribe(Box::new(move |t| {
        sink.lock().unwrap().push(render(&config, t));
    }));

    scheduler.render_frame(3);
    scheduler.render_frame(3);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

// =============================================================================
// Placeholders
// =============================================================================

#[test]
fn empty_required_arrays_render_placeholder() {
    let cases = [
        (DiagramKind::Projectile, json!({ "particles": [] })),
        (DiagramKind::Wave, json!({ "waves": [] })),
        (DiagramKind::Orbit, json!({ "bodies": [] })),
        (DiagramKind::Bar, json!({ "data": [] })),
        (DiagramKind::Molecule, json!({ "atoms": [] })),
        (DiagramKind::Circuit, json!({ "circuitComponents": [] })),
    ];
    for (kind, params) in cases {
        let config = DiagramConfig::new(kind).with_params(bag(params));
        let scene = render(&config, AnimTime::from_frame(10));
        assert!(scene.is_placeholder(), "{kind} did not degrade");
        assert_eq!(scene.texts().collect::<Vec<_>>(), vec!["No data available"]);
    }
}

#[test]
fn wrongly_typed_params_render_placeholder() {
    let config = DiagramConfig::parse(
        r#"{ "type": "molecule", "params": { "atoms": [{ "element": "O", "pos": "middle" }] } }"#,
    )
    .unwrap();
    assert!(render(&config, AnimTime::ZERO).is_placeholder());
}

#[test]
fn unknown_kind_uses_fallback() {
    let config = DiagramConfig::parse(r#"{ "type": "hologram", "title": "Photon" }"#).unwrap();
    assert_eq!(config.kind, DiagramKind::Fallback);
    let scene = render(&config, AnimTime::ZERO);
    assert!(scene.texts().any(|t| t == "Photon"));
}

// =============================================================================
// References
// =============================================================================

#[test]
fn out_of_range_bonds_are_omitted() {
    let config = DiagramConfig::new(DiagramKind::Molecule).with_params(bag(json!({
        "atoms": [
            { "element": "C", "pos": [300, 250] },
            { "element": "O", "pos": [380, 250] }
        ],
        "bonds": [[0, 1], [0, 9], [-1, 1]]
    })));
    let params = config.effective_params();
    let SceneState::Molecule(state) = params.evaluate(AnimTime::ZERO) else {
        panic!("expected molecule state");
    };
    assert_eq!(state.bonds, vec![(0, 1)]);

    let scene = render(&config, AnimTime::ZERO);
    let bond_lines = scene
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Line { .. }))
        .count();
    assert_eq!(bond_lines, 1);
}

#[test]
fn orbit_returns_after_one_period() {
    let center = DVec2::new(400.0, 250.0);
    let bodies = vec![
        Body {
            kind: BodyKind::Star,
            pos: Some([400.0, 250.0]),
            ..Default::default()
        },
        Body {
            orbit: Some(150.0),
            speed: Some(1.0),
            parent: Some(storyviz::params::EntityRef(0)),
            ..Default::default()
        },
    ];
    let start = body_position(&bodies, 1, 0.0, center);
    let half = body_position(&bodies, 1, orbital_period(1.0) / 2.0, center);
    let lap = body_position(&bodies, 1, orbital_period(1.0), center);
    assert!(start.distance(lap) < 1e-9, "{start} vs {lap}");
    assert!((start.distance(half) - 300.0).abs() < 1e-9);
    assert!((start.distance(center) - 150.0).abs() < 1e-9);
}

// =============================================================================
// Bars
// =============================================================================

#[test]
fn bar_reveal_is_bounded_and_completes() {
    use storyviz::params::Growth;

    for growth in [Growth::Interpolate, Growth::Rate] {
        for index in 0..4 {
            let target = 120.0 + 40.0 * index as f64;
            for frame in 0..200 {
                let h = bar_reveal(target, 320.0, index, frame as f64, growth);
                assert!(h <= target, "{growth:?} bar {index} overshoots at {frame}");
            }
        }
    }

    for index in 0..4 {
        let done = bar_growth_frames(index);
        assert_eq!(bar_reveal(200.0, 320.0, index, done, Growth::Interpolate), 200.0);
        assert_eq!(bar_reveal(200.0, 320.0, index, done + 50.0, Growth::Interpolate), 200.0);
    }
}
