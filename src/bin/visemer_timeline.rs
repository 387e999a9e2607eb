//! Timeline inspector: prints the words, phonemes and keyframes for a text.
//!
//! Usage:
//!   visemer-timeline "Hello, world!"
//!   visemer-timeline --boundary 2:640 "hello world again"
//!   RUST_LOG=visemer=debug visemer-timeline --config lipsync.json "It costs $3.50."

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use visemer::phonemize::RuleG2p;
use visemer::segment::Segmenter;
use visemer::timeline::BoundaryRecord;
use visemer::tokenize::{word_events, WordEvent};
use visemer::{EngineConfig, TimelineBuilder, VisemeKeyframe};

/// Print the viseme timeline visemer would play for a piece of text.
#[derive(Parser, Debug)]
#[command(name = "visemer-timeline", version, about)]
struct Cli {
    /// Text to analyse.
    text: String,

    /// Path to a JSON engine config.  Missing keys keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated word boundary as WORD_INDEX:ELAPSED_MS (repeatable).
    #[arg(short, long = "boundary", value_parser = parse_boundary)]
    boundaries: Vec<BoundaryRecord>,

    /// Segment the boundaries apply to.
    #[arg(long, default_value_t = 0)]
    segment: usize,

    /// Single-line JSON.
    #[arg(long)]
    compact: bool,
}

#[derive(Serialize)]
struct SegmentReport {
    index: usize,
    text: String,
    words: Vec<WordEvent>,
    boundaries: Vec<BoundaryRecord>,
    duration_ms: f64,
    keyframes: Vec<VisemeKeyframe>,
}

fn parse_boundary(s: &str) -> Result<BoundaryRecord, String> {
    let (index, ms) = s
        .split_once(':')
        .ok_or_else(|| format!("expected WORD_INDEX:ELAPSED_MS, got {s:?}"))?;
    let word_index = index.trim().parse().map_err(|e| format!("bad word index {index:?}: {e}"))?;
    let elapsed_ms = ms.trim().parse().map_err(|e| format!("bad elapsed time {ms:?}: {e}"))?;
    Ok(BoundaryRecord { word_index, elapsed_ms })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("visemer=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let segments = Segmenter::new(config.expand_numbers).segment(&cli.text)?;
    if !cli.boundaries.is_empty() && cli.segment >= segments.len() {
        bail!("--segment {} out of range: text has {} segment(s)", cli.segment, segments.len());
    }

    let builder = TimelineBuilder::new(&config.timing);
    let reports: Vec<SegmentReport> = segments
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let words = word_events(&text, &RuleG2p);
            let boundaries = if index == cli.segment { cli.boundaries.clone() } else { Vec::new() };
            let timeline = builder.build(&words, &boundaries);
            SegmentReport {
                index,
                duration_ms: timeline.end_ms(),
                keyframes: timeline.keyframes().to_vec(),
                text,
                words,
                boundaries,
            }
        })
        .collect();

    let json = if cli.compact {
        serde_json::to_string(&reports)?
    } else {
        serde_json::to_string_pretty(&reports)?
    };
    println!("{json}");
    Ok(())
}
