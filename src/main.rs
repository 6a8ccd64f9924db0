use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use ffmpeg_next as ffmpeg;
use tracing::{info, warn};

mod args;
mod download;
mod error;
mod extract;
mod gif;
mod meta;
mod timecode;

use args::RunArgs;
use meta::RunMeta;
use timecode::TimeRange;

/// Fallback output directory name when the video title is unavailable.
const DEFAULT_OUTPUT_DIR: &str = "frames";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = RunArgs::parse();
    let started = Instant::now();

    // All validation happens before any network or file activity.
    let range = TimeRange::parse(&args.start_time, &args.end_time)?;

    ffmpeg::init().context("Failed to initialize FFmpeg")?;

    let probed_title = match &args.output {
        Some(_) => None,
        None => download::probe_title(&args.url),
    };
    let out_dir = resolve_output_dir(&args, probed_title.as_deref());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {out_dir:?}"))?;

    let asset = download::fetch(&args.url, &out_dir)?;

    let records = extract::extract_frames(&asset.path, range, args.frame_interval, &out_dir)?;
    info!(frames = records.len(), dir = %out_dir.display(), "extraction finished");

    if args.generate_gif {
        gif::write_gif(&records, &out_dir, args.gif_duration)?;
    }

    if args.remove_video {
        // Failure to delete is not worth aborting over.
        if let Err(error) = fs::remove_file(&asset.path) {
            warn!(%error, path = %asset.path.display(), "failed to remove downloaded video");
        }
    }

    if args.save_meta {
        let meta = RunMeta {
            url: args.url.clone(),
            start_time: args.start_time.clone(),
            end_time: args.end_time.clone(),
            frame_interval: args.frame_interval,
            frame_count: records.len(),
            title: asset.title.clone(),
            duration: asset.duration,
        };
        meta::write_meta(&meta, &out_dir)?;
    }

    let duration = started.elapsed();
    println!("Command completed in: {duration:.2?}");
    Ok(())
}

fn resolve_output_dir(args: &RunArgs, title: Option<&str>) -> PathBuf {
    if let Some(dir) = &args.output {
        return dir.clone();
    }
    title
        .and_then(download::sanitize_title)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}
