use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::fs;
use storyviz::{DiagramConfig, DiagramKind, RenderOptions, render_svg};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  export-frames [kind...] [--out DIR] [--every N]");
        eprintln!("                  Write every Nth frame of each demo diagram as SVG");
        eprintln!("  gallery [--out FILE]");
        eprintln!("                  Generate an HTML page with frame 0 of every kind");
        std::process::exit(1);
    }

    let rest = &args[2..];
    match args[1].as_str() {
        "export-frames" => export_frames(rest),
        "gallery" => gallery(rest),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

fn workspace_root() -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

fn flag(args: &[String], name: &str) -> Option<String> {
    let i = args.iter().position(|a| a == name)?;
    args.get(i + 1).cloned()
}

fn kinds(args: &[String]) -> Vec<DiagramKind> {
    let mut named = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            named.push(DiagramKind::parse(arg));
        }
    }
    if named.is_empty() {
        DiagramKind::ALL.to_vec()
    } else {
        named
    }
}

fn export_frames(args: &[String]) {
    let out_dir = flag(args, "--out")
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| workspace_root().join("target/frames"));
    let every: u32 = flag(args, "--every")
        .and_then(|s| s.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(10);

    // (kind, frame) pairs, rendered in parallel
    let jobs: Vec<(DiagramKind, u32)> = kinds(args)
        .into_iter()
        .flat_map(|kind| {
            let total = kind.composition().duration_in_frames;
            (0..total).step_by(every as usize).map(move |f| (kind, f))
        })
        .collect();

    for kind in kinds(args) {
        fs::create_dir_all(out_dir.join(kind.name())).expect("Failed to create output directory");
    }

    let options = RenderOptions::default();
    let failures: Vec<String> = jobs
        .par_iter()
        .filter_map(|&(kind, frame)| {
            let path = out_dir.join(kind.name()).join(format!("{frame:04}.svg"));
            let result = render_svg(&DiagramConfig::new(kind), frame, &options)
                .map_err(|e| e.to_string())
                .and_then(|svg| fs::write(&path, svg).map_err(|e| e.to_string()));
            result.err().map(|e| format!("{path}: {e}"))
        })
        .collect();

    for failure in &failures {
        eprintln!("Error: {failure}");
    }
    eprintln!(
        "Wrote {} frames to {out_dir} ({} failed)",
        jobs.len() - failures.len(),
        failures.len()
    );
    if !failures.is_empty() {
        std::process::exit(1);
    }
}

fn gallery(args: &[String]) {
    let output_path = flag(args, "--out")
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| workspace_root().join("gallery.html"));

    let cards: Vec<String> = DiagramKind::ALL[..]
        .par_iter()
        .map(|&kind| {
            let config = DiagramConfig::new(kind);
            let svg = render_svg(&config, 0, &RenderOptions::default())
                .unwrap_or_else(|e| format!("<pre>Error: {e}</pre>"));
            format!(
                "<div class=\"card\"><h2>{}</h2>{svg}<pre>{}</pre></div>",
                config.display_title(),
                config.effective_params().describe()
            )
        })
        .collect();

    let html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>storyviz gallery</title>\
         <style>body{{background:#111;color:#eee;font-family:system-ui}}\
         .card{{margin:2em 0}}svg{{max-width:100%;height:auto}}pre{{font-size:11px}}</style>\
         </head><body>\n{}\n</body></html>\n",
        cards.join("\n")
    );
    fs::write(&output_path, html).expect("Failed to write gallery");
    eprintln!("Wrote {output_path}");
}
