use std::io::Write;
use std::path::{Path, PathBuf};

use ffmpeg_next as ffmpeg;
use image::{ImageBuffer, Rgb};
use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::timecode::TimeRange;

const EAGAIN: i32 = 11;

/// A selected frame: its selection index, source timestamp in seconds and
/// the image file written for it.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub index: usize,
    pub timestamp: f64,
    pub path: PathBuf,
}

/// Decides which decoded frames to keep: those inside the time range,
/// striding by `interval` among the in-range frames.
#[derive(Debug)]
struct SampleWindow {
    range: TimeRange,
    interval: u32,
    in_range_seen: u64,
}

#[derive(Debug, PartialEq)]
enum Verdict {
    /// Before the range
    NotYet,
    /// In range and on the stride
    Take,
    /// In range but off the stride
    Skip,
    /// Past the range, stop decoding
    Done,
}

impl SampleWindow {
    fn new(range: TimeRange, interval: u32) -> Self {
        Self {
            range,
            interval,
            in_range_seen: 0,
        }
    }

    fn judge(&mut self, timestamp: f64) -> Verdict {
        if timestamp < self.range.start {
            return Verdict::NotYet;
        }
        if timestamp > self.range.end {
            return Verdict::Done;
        }
        let position = self.in_range_seen;
        self.in_range_seen += 1;
        if position % u64::from(self.interval) == 0 {
            Verdict::Take
        } else {
            Verdict::Skip
        }
    }
}

/// Decodes `video_path` and writes every selected in-range frame as a
/// numbered PNG into `out_dir`, in presentation order.
pub fn extract_frames(
    video_path: &Path,
    range: TimeRange,
    interval: u32,
    out_dir: &Path,
) -> Result<Vec<FrameRecord>, DecodeError> {
    let mut ictx = ffmpeg::format::input(&video_path).map_err(|source| DecodeError::Open {
        path: video_path.to_path_buf(),
        source,
    })?;

    let input_stream = ictx
        .streams()
        .best(ffmpeg::media::Type::Video)
        .ok_or_else(|| DecodeError::NoVideoStream(video_path.to_path_buf()))?;
    let video_stream_index = input_stream.index();
    let time_base = input_stream.time_base();
    let frame_rate: f64 = input_stream.rate().into();
    let codec_parameters = input_stream.parameters();

    let mut decoder = ffmpeg::codec::context::Context::from_parameters(codec_parameters)?
        .decoder()
        .video()?;

    let mut scaler = ffmpeg::software::scaling::Context::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        ffmpeg::format::Pixel::RGB24,
        decoder.width(),
        decoder.height(),
        ffmpeg::software::scaling::Flags::BILINEAR,
    )?;

    debug!(
        fps = frame_rate,
        start = range.start,
        end = range.end,
        interval,
        "decoding frames"
    );

    let mut window = SampleWindow::new(range, interval);
    let mut records = Vec::new();

    for (stream, packet) in ictx.packets() {
        if stream.index() != video_stream_index {
            continue;
        }
        match decoder.send_packet(&packet) {
            Ok(()) => (),
            Err(e) if matches!(e, ffmpeg::Error::Other { .. }) => {
                warn!("non-fatal error sending packet to decoder: {e}");
            }
            Err(e) => return Err(DecodeError::Codec(e)),
        }
        if drain_decoder(
            &mut decoder,
            &mut scaler,
            time_base,
            &mut window,
            out_dir,
            &mut records,
        )? {
            finish_progress(&records);
            return Ok(records);
        }
    }

    // The demuxer hit EOF; drain whatever the decoder still buffers through
    // the same selection path.
    if let Err(e) = decoder.send_eof() {
        if e != ffmpeg::Error::Eof {
            warn!("failed to send EOF to decoder: {e}");
        }
    }
    drain_decoder(
        &mut decoder,
        &mut scaler,
        time_base,
        &mut window,
        out_dir,
        &mut records,
    )?;

    finish_progress(&records);
    Ok(records)
}

/// Receives frames until the decoder wants more input, judging each against
/// the sample window. Returns `true` once a frame past the range is seen.
fn drain_decoder(
    decoder: &mut ffmpeg::decoder::Video,
    scaler: &mut ffmpeg::software::scaling::Context,
    time_base: ffmpeg::Rational,
    window: &mut SampleWindow,
    out_dir: &Path,
    records: &mut Vec<FrameRecord>,
) -> Result<bool, DecodeError> {
    let mut decoded_frame = ffmpeg::frame::Video::empty();
    loop {
        match decoder.receive_frame(&mut decoded_frame) {
            Ok(()) => {
                let Some(pts) = decoded_frame.pts().filter(|pts| *pts >= 0) else {
                    continue;
                };
                let timestamp =
                    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
                match window.judge(timestamp) {
                    Verdict::NotYet | Verdict::Skip => (),
                    Verdict::Done => return Ok(true),
                    Verdict::Take => {
                        let index = records.len();
                        let path = out_dir.join(format!("frame_{index:06}.png"));
                        write_frame(&decoded_frame, scaler, &path)?;
                        records.push(FrameRecord {
                            index,
                            timestamp,
                            path,
                        });
                        if records.len() % 10 == 0 {
                            print!("\rExtracted frames: {}", records.len());
                            std::io::stdout().flush().unwrap_or_default();
                        }
                    }
                }
            }
            Err(ffmpeg::Error::Eof) => return Ok(false),
            Err(ffmpeg::Error::Other { errno }) if errno == EAGAIN => return Ok(false),
            Err(e) => return Err(DecodeError::Codec(e)),
        }
    }
}

/// Scales the decoded frame to RGB24 and saves it as a PNG.
fn write_frame(
    frame: &ffmpeg::frame::Video,
    scaler: &mut ffmpeg::software::scaling::Context,
    path: &Path,
) -> Result<(), DecodeError> {
    let mut rgb_frame = ffmpeg::frame::Video::empty();
    scaler.run(frame, &mut rgb_frame)?;

    // The scaler output rows may be padded past width * 3 bytes.
    let width = rgb_frame.width() as usize;
    let height = rgb_frame.height() as usize;
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let mut raw = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        let start = row * stride;
        let end = start + width * 3;
        if end > data.len() {
            return Err(DecodeError::BadFrameBuffer);
        }
        raw.extend_from_slice(&data[start..end]);
    }

    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(rgb_frame.width(), rgb_frame.height(), raw)
            .ok_or(DecodeError::BadFrameBuffer)?;

    buffer.save(path).map_err(|source| DecodeError::FrameWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn finish_progress(records: &[FrameRecord]) {
    if records.len() >= 10 {
        println!();
    }
}
