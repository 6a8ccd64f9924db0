use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Downloads a video and extracts frames from a time range", long_about = None)]
pub struct RunArgs {
    /// Video URL to download
    pub url: String,

    /// Start time in mm:ss or mm:ss.ss format
    pub start_time: String,

    /// End time in mm:ss or mm:ss.ss format
    pub end_time: String,

    /// Stride in decoded frames between extracted frames
    #[arg(long = "frame_interval", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub frame_interval: u32,

    /// Output directory for extracted frames (default: the video title)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Remove the downloaded video after extracting frames
    #[arg(long = "remove_video")]
    pub remove_video: bool,

    /// Generate an animated GIF from the extracted frames
    #[arg(long = "generate_gif")]
    pub generate_gif: bool,

    /// Per-frame GIF display duration in milliseconds
    #[arg(long = "gif_duration", default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub gif_duration: u32,

    /// Save a meta file with video details
    #[arg(long = "save_meta")]
    pub save_meta: bool,
}
