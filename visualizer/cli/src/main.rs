//! Sortviz - Stepwise Sorting in the Terminal
//!
//! Plays a sorting algorithm over a random input, printing one row of bars
//! per step.
//!
//! # Usage
//!
//! ```bash
//! # Bubble sort over 50 bars
//! sortviz
//!
//! # Quick sort, 20 bars, fast
//! sortviz --algorithm quick --size 20 --delay-ms 20
//!
//! # Every algorithm in turn
//! sortviz --all
//!
//! # Drive it from stdin (start, pause, resume, size 12, ...)
//! sortviz --interactive
//!
//! # Machine-readable output
//! sortviz --json --seed 7
//!
//! # Verbose logging (written to stderr)
//! RUST_LOG=debug sortviz
//! ```

mod args;
mod commands;
mod render;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sortviz_core::{
    load_config, load_config_from_path, Algorithm, RenderEvent, Visualizer, VisualizerConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use args::Args;
use commands::{Command, HELP};
use render::LinePrinter;

/// Initialize logging with the specified level
///
/// Logs go to stderr so they never interleave with the bars on stdout.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("sortviz={level},sortviz_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn emit(printer: &LinePrinter, event: &RenderEvent) -> Result<()> {
    let line = printer.line(event)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    Ok(())
}

/// Run `algorithm` over the current input and print until it ends
///
/// Returns `false` if the run failed its output check.
async fn play(
    viz: &Visualizer,
    algorithm: Algorithm,
    events: &mut mpsc::UnboundedReceiver<RenderEvent>,
    printer: &LinePrinter,
) -> Result<bool> {
    let run = viz
        .start(algorithm)
        .context("Controller refused to start a run")?;
    info!(%run, %algorithm, "Playing");

    while let Some(event) = events.recv().await {
        emit(printer, &event)?;
        match event {
            RenderEvent::Finished => return Ok(true),
            RenderEvent::Failed { .. } => return Ok(false),
            RenderEvent::Input { .. } | RenderEvent::Step { .. } => {}
        }
    }
    anyhow::bail!("Render channel closed before {algorithm} finished")
}

async fn play_all(
    viz: &Visualizer,
    events: &mut mpsc::UnboundedReceiver<RenderEvent>,
    printer: &LinePrinter,
    json: bool,
) -> Result<usize> {
    let mut failures = 0;
    for (i, algorithm) in Algorithm::ALL.into_iter().enumerate() {
        if i > 0 {
            viz.shuffle();
        }
        if !json {
            println!("== {algorithm} ==");
        }
        if !play(viz, algorithm, events, printer).await? {
            failures += 1;
        }
    }
    Ok(failures)
}

async fn interactive(
    viz: &Visualizer,
    config: &VisualizerConfig,
    mut events: mpsc::UnboundedReceiver<RenderEvent>,
    printer: LinePrinter,
) -> Result<()> {
    let printing = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = emit(&printer, &event) {
                warn!(error = %e, "Failed to print event");
            }
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Start(None) => {
                viz.start(config.algorithm);
            }
            Command::Start(Some(name)) => {
                viz.start_named(&name);
            }
            Command::Pause => {
                viz.pause();
            }
            Command::Resume => {
                viz.resume();
            }
            Command::Toggle => {
                viz.toggle_pause();
            }
            Command::Size(text) => viz.request_size_from_input(&text),
            Command::Shuffle => viz.shuffle(),
            Command::Cancel => {
                viz.cancel();
            }
            Command::Status => {
                println!("{} ({} bars)", viz.state(), viz.size());
                if let Some(report) = viz.controller().last_report() {
                    println!(
                        "last run {}: {} {:?} after {} steps",
                        report.run, report.algorithm, report.outcome, report.steps
                    );
                }
            }
            Command::List => {
                for algorithm in Algorithm::ALL {
                    println!("  {algorithm}");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(text) => println!("unknown command: {text} (try `help`)"),
        }
    }

    viz.cancel();
    printing.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    let mut config = match args.config {
        Some(ref path) => load_config_from_path(Some(path.clone())),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    args.overrides().apply(&mut config);

    info!(
        source = %config.source(),
        algorithm = %config.algorithm,
        delay = ?config.playback.step_delay,
        "Configuration resolved"
    );

    let printer = LinePrinter::new(config.limits, args.json);
    let (tx, mut events) = mpsc::unbounded_channel::<RenderEvent>();
    let viz = Visualizer::new(&config, Arc::new(tx));

    if args.interactive {
        return interactive(&viz, &config, events, printer).await;
    }

    let failures = if args.all {
        play_all(&viz, &mut events, &printer, args.json).await?
    } else {
        usize::from(!play(&viz, config.algorithm, &mut events, &printer).await?)
    };

    if failures > 0 {
        error!(failures, "Some runs failed their output check");
        anyhow::bail!("{failures} run(s) failed");
    }
    Ok(())
}
