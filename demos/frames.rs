//! Print a handful of frames of one diagram as SVG.
//!
//! Usage: cargo run --example frames -- [kind] [config.json]
//! Set RUST_LOG=debug (with `--features tracing`) to see evaluator logs.

use storyviz::{
    AnimTime, ComposedScheduler, DiagramConfig, DiagramKind, FrameScheduler, RenderOptions, render,
    to_svg,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let kind = args
        .next()
        .map(|s| DiagramKind::parse(&s))
        .unwrap_or(DiagramKind::Orbit);

    let config = match args.next() {
        Some(path) => {
            let source = std::fs::read_to_string(&path).expect("read config");
            DiagramConfig::parse(&source).expect("parse config")
        }
        None => DiagramConfig::new(kind),
    };

    let scheduler = ComposedScheduler::for_kind(config.kind);
    let step = (scheduler.duration_in_frames / 4).max(1);
    let cfg = config.clone();
    let _sub = scheduler.subscribe(Box::new(move |t: AnimTime| {
        let scene = render(&cfg, t);
        match to_svg(&scene, &RenderOptions::default()) {
            Ok(svg) => println!("<!-- frame {} -->\n{}", t.frames(), svg),
            Err(e) => eprintln!("Error: {}", e),
        }
    }));

    for frame in (0..scheduler.duration_in_frames).step_by(step as usize) {
        scheduler.render_frame(frame);
    }

    println!("<!-- params -->\n{}", config.effective_params().describe());
}
