use std::path::{Path, PathBuf};

use tracing::{info, warn};
use youtube_dl::YoutubeDl;

use crate::error::DownloadError;

/// yt-dlp format selector: prefer an mp4 container, fall back to best.
const FORMAT: &str = "bv*[ext=mp4]+ba[ext=m4a]/b[ext=mp4]/best";
const SOCKET_TIMEOUT: &str = "30";

/// The downloaded video file plus whatever metadata yt-dlp reported.
#[derive(Debug)]
pub struct VideoAsset {
    pub path: PathBuf,
    pub title: Option<String>,
    pub duration: Option<f64>,
}

/// Fetches the video title without downloading, to name the output
/// directory. Any failure falls back to the default name.
pub fn probe_title(url: &str) -> Option<String> {
    match YoutubeDl::new(url).socket_timeout(SOCKET_TIMEOUT).run() {
        Ok(output) => output.into_single_video().and_then(|video| video.title),
        Err(error) => {
            warn!(%error, "failed to fetch video information, using default output directory");
            None
        }
    }
}

/// Downloads the video into `dir`. Single attempt, no retry.
pub fn fetch(url: &str, dir: &Path) -> Result<VideoAsset, DownloadError> {
    info!(url, dir = %dir.display(), "downloading video");

    let output = YoutubeDl::new(url)
        .socket_timeout(SOCKET_TIMEOUT)
        .format(FORMAT)
        .output_template("%(title)s.%(ext)s")
        .output_directory(dir.to_string_lossy())
        .download(true)
        .run()?;

    let video = output
        .into_single_video()
        .ok_or_else(|| DownloadError::NotAVideo(url.to_string()))?;

    let reported = video
        .filename
        .ok_or_else(|| DownloadError::NoFilename(url.to_string()))?;

    // yt-dlp may report the filename relative to its own working directory.
    let mut path = PathBuf::from(&reported);
    if !path.exists() {
        if let Some(name) = path.file_name() {
            path = dir.join(name);
        }
    }
    if !path.exists() {
        return Err(DownloadError::MissingFile(path));
    }

    let duration = video.duration.as_ref().and_then(serde_json::Value::as_f64);
    info!(path = %path.display(), "download complete");

    Ok(VideoAsset {
        path,
        title: video.title,
        duration,
    })
}

/// Builds a filesystem-safe directory name from a video title.
pub fn sanitize_title(title: &str) -> Option<String> {
    let name: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "-_.() ".contains(*c))
        .collect();
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(
            sanitize_title("My Video: Part 1!?").as_deref(),
            Some("My Video Part 1")
        );
        assert_eq!(
            sanitize_title("clip_2024-06.final (v2)").as_deref(),
            Some("clip_2024-06.final (v2)")
        );
    }

    #[test]
    fn sanitize_rejects_empty_results() {
        assert_eq!(sanitize_title("***"), None);
        assert_eq!(sanitize_title("   "), None);
        assert_eq!(sanitize_title(""), None);
    }
}
