//! Sketch Runtime
//!
//! Headless embedding of the script host: loads script files, drives a fixed
//! number of frames and reports diagnostics.
//!
//! ```text
//! sketch [--config sketch.toml] [--frames N] [--json] main.js [more.js ...]
//! ```

use anyhow::{bail, Context, Result};
use sketch_metrics::{Counter, FrameTimer};
use sketch_script::ScriptHost;
use sketch_services::{init_logging, Settings};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FRAMES: u64 = 60;
const FRAMES_PER_SECOND: u32 = 60;

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    frames: Option<u64>,
    json: bool,
    files: Vec<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let path = args.get(i).context("--config needs a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--frames" | "-n" => {
                i += 1;
                let count = args.get(i).context("--frames needs a count")?;
                options.frames = Some(
                    count
                        .parse()
                        .with_context(|| format!("invalid frame count '{count}'"))?,
                );
            }
            "--json" => options.json = true,
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
            file => options.files.push(PathBuf::from(file)),
        }
        i += 1;
    }
    Ok(options)
}

fn print_usage(program: &str) {
    eprintln!("usage: {program} [--config FILE] [--frames N] [--json] SCRIPT...");
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            print_usage(args.first().map_or("sketch", String::as_str));
            return Err(err);
        }
    };

    let settings = match &options.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    init_logging(&settings.logging).context("failed to initialise logging")?;

    let mut host = ScriptHost::new(&settings).context("failed to start the script host")?;
    tracing::info!(
        capabilities = host.capabilities().len(),
        "Sketch runtime v{}",
        env!("CARGO_PKG_VERSION")
    );

    let loaded = !options.files.is_empty() && host.load_files(&options.files);
    if options.files.is_empty() {
        tracing::warn!("no script given; showing the idle screen");
    }

    let frames = options.frames.unwrap_or(DEFAULT_FRAMES);
    let samples_per_frame = (settings.audio.sample_rate / FRAMES_PER_SECOND) as usize * 2;
    let mut audio = vec![0.0f32; samples_per_frame];
    let mut timer = FrameTimer::new(FRAMES_PER_SECOND as usize)
        .with_budget(Duration::from_secs(1) / FRAMES_PER_SECOND);
    let mut counters = Counter::new();
    for _ in 0..frames {
        timer.begin();
        if host.frame() {
            counters.increment("script_frames", 1);
        } else {
            host.draw_idle_screen();
            counters.increment("idle_frames", 1);
        }
        counters.increment("commands", host.take_frame().len() as u64);
        audio.fill(0.0);
        host.render_audio(&mut audio);
        timer.end();
    }

    let stats = host.arena_stats();
    tracing::info!(
        frames,
        commands = counters.get("commands"),
        idle_frames = counters.get("idle_frames"),
        average_ms = timer.frame_time_ms(),
        worst_ms = timer.worst_frame_ms(),
        over_budget = timer.over_budget(),
        resources_created = stats.total_created(),
        render_faults = host.render_faults(),
        "run finished"
    );
    for (hook, average) in host.profiler().report() {
        tracing::info!(hook, average_us = average.as_micros() as u64, "hook timing");
    }

    if options.json {
        let json = host
            .diagnostics()
            .to_json()
            .context("failed to serialise diagnostics")?;
        println!("{json}");
    } else {
        let error = host.last_error();
        if !error.is_empty() {
            eprintln!("{error}");
        }
    }

    if !options.files.is_empty() && !loaded {
        bail!("script failed to load");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("sketch")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_options_and_files() {
        let options = parse_args(&args(&["--frames", "3", "--json", "a.js", "b.js"])).unwrap();
        assert_eq!(options.frames, Some(3));
        assert!(options.json);
        assert_eq!(options.files, vec![PathBuf::from("a.js"), PathBuf::from("b.js")]);
    }

    #[test]
    fn rejects_unknown_flags_and_bad_counts() {
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["--frames", "many"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }
}
