use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use tracing::{info, warn};

use crate::extract::FrameRecord;

const GIF_NAME: &str = "frames.gif";

/// Assembles the extracted frame images into a looping animated GIF, each
/// frame displayed for `frame_duration_ms`.
pub fn write_gif(
    records: &[FrameRecord],
    out_dir: &Path,
    frame_duration_ms: u32,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        warn!("no frames were extracted, skipping GIF generation");
        return Ok(None);
    }

    let gif_path = out_dir.join(GIF_NAME);
    let file = File::create(&gif_path)
        .with_context(|| format!("Failed to create {}", gif_path.display()))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
    encoder.set_repeat(Repeat::Infinite)?;

    for record in records {
        let image = image::open(&record.path)
            .with_context(|| format!("Failed to read frame image {}", record.path.display()))?
            .into_rgba8();
        let delay = Delay::from_numer_denom_ms(frame_duration_ms, 1);
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
    }

    info!(path = %gif_path.display(), frames = records.len(), "GIF created");
    Ok(Some(gif_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba, RgbaImage};
    use std::io::BufReader;

    fn dummy_records(dir: &Path, count: usize) -> Vec<FrameRecord> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("frame_{i:06}.png"));
                RgbaImage::from_pixel(4, 4, Rgba([(i * 80) as u8, 0, 0, 255]))
                    .save(&path)
                    .unwrap();
                FrameRecord {
                    index: i,
                    timestamp: i as f64 / 30.0,
                    path,
                }
            })
            .collect()
    }

    #[test]
    fn gif_has_one_frame_per_record_with_configured_delay() {
        let dir = tempfile::tempdir().unwrap();
        let records = dummy_records(dir.path(), 3);

        let gif_path = write_gif(&records, dir.path(), 100).unwrap().unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(gif_path).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!(frame.delay().numer_denom_ms(), (100, 1));
        }
    }

    #[test]
    fn gif_skipped_when_nothing_was_extracted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_gif(&[], dir.path(), 100).unwrap().is_none());
        assert!(!dir.path().join(GIF_NAME).exists());
    }
}
