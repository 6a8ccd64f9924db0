use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

const META_NAME: &str = "meta.json";

/// Flat description of one extraction run, written next to the frames.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RunMeta {
    pub url: String,
    pub start_time: String,
    pub end_time: String,
    pub frame_interval: u32,
    pub frame_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

pub fn write_meta(meta: &RunMeta, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(META_NAME);
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "meta file saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let meta = RunMeta {
            url: "https://example.com/watch?v=abc".to_string(),
            start_time: "00:10".to_string(),
            end_time: "00:12.50".to_string(),
            frame_interval: 2,
            frame_count: 30,
            title: Some("a clip".to_string()),
            duration: Some(42.5),
        };

        let path = write_meta(&meta, dir.path()).unwrap();
        let parsed: RunMeta =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn meta_omits_unknown_title_and_duration() {
        let dir = tempfile::tempdir().unwrap();
        let meta = RunMeta {
            url: "https://example.com/v".to_string(),
            start_time: "00:00".to_string(),
            end_time: "00:01".to_string(),
            frame_interval: 1,
            frame_count: 0,
            title: None,
            duration: None,
        };

        let path = write_meta(&meta, dir.path()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(!text.contains("title"));
        assert!(!text.contains("duration"));
        let parsed: RunMeta = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, meta);
    }
}
