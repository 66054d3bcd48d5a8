//! replay — terminal playback of the four disk scheduling policies.
//!
//! Plays FCFS, SSTF, SCAN and C-SCAN side by side on one workload, printing
//! every step as the playback timer fires, then a comparison table.
//!
//! ```text
//! replay [CONFIG.json] [--fast] [--json] [--direction DIR]
//! ```
//!
//! `CONFIG.json` may set any of `disk`, `playback` and `preset`; missing
//! fields take their defaults.  Log verbosity is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=ds_sim=debug`).

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ds_core::{DiskConfig, PlaybackConfig, SimTime, Track};
use ds_policy::PolicyKey;
use ds_sim::{Controller, ControllerBuilder, ControllerObserver, PlaybackState, QueuePreset};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Wall-clock granularity of the real-time loop.
const FRAME_MS: u64 = 50;

/// Give up after this much virtual time even if arrivals keep playback alive.
const MAX_VIRTUAL_MS: u64 = 10 * 60 * 1_000;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct ReplayConfig {
    disk:     DiskConfig,
    playback: PlaybackConfig,
    /// Replace the configured queue with a generated one.
    preset:   Option<QueuePreset>,
}

fn load_config(path: &Path) -> Result<ReplayConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Terminal playback of FCFS, SSTF, SCAN and C-SCAN on one workload
#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(about = "Play the four disk scheduling policies side by side")]
struct Args {
    /// JSON file with optional `disk`, `playback` and `preset` sections
    config: Option<PathBuf>,

    /// Drive the virtual clock without sleeping
    #[arg(long)]
    fast: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Override the sweep direction (`left` or `right`)
    #[arg(long)]
    direction: Option<String>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Collects events fired during one `advance` call so `main` can print them
/// against the controller's state afterwards.
#[derive(Default)]
struct Events {
    steps:    Vec<usize>,
    arrivals: Vec<(Track, SimTime)>,
}

impl ControllerObserver for Events {
    fn on_step(&mut self, step: usize, _at: SimTime) {
        self.steps.push(step);
    }

    fn on_arrival(&mut self, track: Track, at: SimTime) {
        self.arrivals.push((track, at));
    }

    fn on_finished(&mut self, step: usize, winner: Option<PolicyKey>) {
        info!(step, winner = ?winner, "playback finished");
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_step(ctl: &Controller, step: usize) {
    println!("── step {step}/{} ──", ctl.max_step());
    let snap = ctl.snapshot();
    for frame in snap.frames() {
        if frame.done && frame.progress.step < step {
            continue;
        }
        println!(
            "  {:<7} {:>5}  seek {:>6}  {}",
            frame.policy.name(),
            frame.position,
            frame.progress.seek_so_far,
            frame.explanation.unwrap_or("-"),
        );
    }
}

fn print_summary(ctl: &Controller) {
    println!();
    println!("{:<7} {:>8} {:>10} {:>11}  sequence", "policy", "seek", "avg seek", "throughput");
    for (key, r) in ctl.results() {
        let sequence: Vec<String> = r.sequence.iter().map(Track::to_string).collect();
        println!(
            "{:<7} {:>8} {:>10.2} {:>11.4}  {}",
            key.name(),
            r.seek_count,
            r.avg_seek,
            r.throughput,
            sequence.join(" → "),
        );
    }
    match ctl.winner() {
        Some(w) => println!("\nLowest total seek: {}", w.name()),
        None    => println!("\nPlayback did not finish."),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None       => ReplayConfig::default(),
    };

    let mut ctl = ControllerBuilder::new(config.disk)
        .playback(config.playback)
        .build()?;
    if let Some(direction) = &args.direction {
        ctl.set_direction_text(direction)?;
    }
    if let Some(preset) = config.preset {
        ctl.apply_preset(preset)?;
    }

    println!("=== replay — disk scheduling playback ===");
    println!(
        "Head: {}  |  Requests: {}  |  Dynamic: {}  |  Step: {} ms",
        ctl.result(PolicyKey::Fcfs).map_or(Track::ZERO, |r| r.head()),
        ctl.queue().len(),
        ctl.playback_config().dynamic_mode,
        ctl.playback_config().step_interval_ms(),
    );
    println!();

    let started = Instant::now();
    let mut events = Events::default();
    ctl.play();
    while ctl.state() == PlaybackState::Playing && ctl.now().0 < MAX_VIRTUAL_MS {
        if !args.fast {
            std::thread::sleep(Duration::from_millis(FRAME_MS));
        }
        ctl.advance(FRAME_MS, &mut events);

        for (track, at) in events.arrivals.drain(..) {
            println!("  + request {track} arrived at {at}");
        }
        for step in std::mem::take(&mut events.steps) {
            print_step(&ctl, step);
        }
    }
    if ctl.state() == PlaybackState::Playing {
        ctl.pause();
    }

    print_summary(&ctl);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&ctl.snapshot())?);
    }
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
    Ok(())
}
