use std::path::PathBuf;

use ffmpeg_next as ffmpeg;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    /// The timestamp did not match `mm:ss` or `mm:ss.ss`
    #[error("invalid timestamp {0:?}, expected mm:ss or mm:ss.ss")]
    BadTimestamp(String),

    #[error("end time ({end}s) must be greater than start time ({start}s)")]
    EmptyRange { start: f64, end: f64 },
}

#[derive(Error, Debug)]
pub enum DownloadError {
    /// yt-dlp itself failed (missing binary, network error, unavailable video)
    #[error("yt-dlp error: {0}")]
    Fetcher(#[from] youtube_dl::Error),

    #[error("no downloadable video found at {0}")]
    NotAVideo(String),

    #[error("yt-dlp did not report an output filename for {0}")]
    NoFilename(String),

    #[error("downloaded file not found at {}", .0.display())]
    MissingFile(PathBuf),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open {} as a video: {source}", path.display())]
    Open {
        path: PathBuf,
        source: ffmpeg::Error,
    },

    #[error("no video stream in {}", .0.display())]
    NoVideoStream(PathBuf),

    #[error("decoder error: {0}")]
    Codec(#[from] ffmpeg::Error),

    /// The scaled frame buffer did not match the expected RGB24 layout
    #[error("decoded frame has an unexpected buffer size")]
    BadFrameBuffer,

    #[error("failed to write frame {}: {source}", path.display())]
    FrameWrite {
        path: PathBuf,
        source: image::ImageError,
    },
}
