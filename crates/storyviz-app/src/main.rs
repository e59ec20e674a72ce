use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use storyviz::{AnimTime, DiagramConfig, DiagramKind, RenderOptions, to_svg};
use storyviz_app::{
    BlockState, Category, ClientConfig, HttpBackend, InterpreterService, Section, Session,
    capture::CodeOutput,
};

const USAGE: &str = "\
Usage: storyviz <command>
Commands:
  ask <question> [--category C] [--out DIR] [--run]
      Ask the backend (STORYVIZ_API_URL, default http://localhost:3000) and print
      the answer; visuals are written to DIR as SVG
  render <kind> [--frame N] [--css-vars]
      Print one frame of a diagram's demonstration data as SVG";

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries SVG output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };

    match command.as_str() {
        "ask" => ask(&args[1..]).await,
        "render" => render(&args[1..]),
        other => {
            eprintln!("Unknown command: {other}\n{USAGE}");
            std::process::exit(1);
        }
    }
}

/// Value following `--name`, if the flag is present
fn flag_value<'a>(args: &'a [String], name: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == name) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .with_context(|| format!("{name} needs a value")),
    }
}

fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--category" | "--out" | "--frame" => {
                iter.next();
            }
            a if a.starts_with("--") => {}
            a => out.push(a),
        }
    }
    out
}

async fn ask(args: &[String]) -> Result<()> {
    let question = positional(args).join(" ");
    if question.trim().is_empty() {
        bail!("ask needs a question");
    }
    let category = flag_value(args, "--category")?
        .map(str::parse::<Category>)
        .transpose()?;
    let out_dir = flag_value(args, "--out")?.map(PathBuf::from);
    let run_code = args.iter().any(|a| a == "--run");

    let mut session = Session::new(Arc::new(HttpBackend::new(&ClientConfig::from_env())));
    session.ask(&question, category).await;

    if let Some(dir) = &out_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    for (i, section) in session.sections().iter().enumerate() {
        match section {
            Section::Text(paragraphs) => {
                for para in paragraphs {
                    let line: String = para
                        .iter()
                        .map(|s| if s.bold { format!("**{}**", s.text) } else { s.text.clone() })
                        .collect();
                    println!("{line}\n");
                }
            }
            Section::Code(block) => {
                println!("```{}\n{}\n```", block.language(), block.code());
                if run_code && block.is_runnable() {
                    block.run(InterpreterService::global()).await;
                    print_block_state(&block.state());
                }
                println!();
            }
            Section::Visual(instance) => {
                let title = instance.title();
                match &out_dir {
                    Some(dir) => {
                        let path = dir.join(format!("{i:02}-{}.svg", instance.config().kind));
                        let svg = to_svg(&instance.scene_at(AnimTime::ZERO), &RenderOptions::default())?;
                        std::fs::write(&path, svg)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("[diagram: {title}] -> {}\n", path.display());
                    }
                    None => println!("[diagram: {title}]\n"),
                }
            }
        }
    }
    Ok(())
}

fn print_block_state(state: &BlockState) {
    match state {
        BlockState::Finished(CodeOutput::Text(text)) if !text.is_empty() => println!("> {}", text.trim_end()),
        BlockState::Finished(CodeOutput::Text(_)) => {}
        BlockState::Finished(CodeOutput::Image(img)) => println!("> [image, {} bytes]", img.png.len()),
        BlockState::Finished(CodeOutput::Error(err)) | BlockState::Failed(err) => {
            println!("> error: {err}")
        }
        BlockState::Idle | BlockState::Running => {}
    }
}

fn render(args: &[String]) -> Result<()> {
    let Some(kind) = positional(args).first().copied() else {
        bail!("render needs a diagram kind");
    };
    let frame = flag_value(args, "--frame")?
        .map(str::parse::<u32>)
        .transpose()
        .context("--frame must be a whole number")?
        .unwrap_or(0);
    let options = RenderOptions {
        css_variables: args.iter().any(|a| a == "--css-vars"),
        ..Default::default()
    };

    let config = DiagramConfig::new(DiagramKind::parse(kind));
    let svg = storyviz::render_svg(&config, frame, &options)?;
    println!("{svg}");
    Ok(())
}
