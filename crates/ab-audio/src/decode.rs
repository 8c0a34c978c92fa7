use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::mixer::Clip;

/// Stream parameters read from a file header without decoding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeInfo {
    pub sample_rate: u32,
    pub channels: usize,
}

fn open_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file =
        File::open(path).with_context(|| format!("Cannot open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;
    Ok(probed.format)
}

/// Read the header of an audio file.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a known format.
pub fn probe_file(path: impl AsRef<Path>) -> Result<ProbeInfo> {
    let format = open_format(path.as_ref())?;
    let track = format
        .default_track()
        .context("No default audio track found")?;

    Ok(ProbeInfo {
        sample_rate: track.codec_params.sample_rate.unwrap_or(44100),
        channels: track
            .codec_params
            .channels
            .map_or(1, symphonia::core::audio::Channels::count),
    })
}

/// Decode an audio file into stereo f32 frames.
///
/// Mono is duplicated on both sides; channels beyond the second are dropped.
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use ab_audio::decode::decode_file;
/// let (frames, sample_rate) = decode_file("sfx/boop.wav").unwrap();
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<(Vec<[f32; 2]>, u32)> {
    let path = path.as_ref();
    let mut format = open_format(path)?;
    let track = format
        .default_track()
        .context("No default audio track found")?;

    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let track_id = track.id;
    let mut frames: Vec<[f32; 2]> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Audio decode packet error: {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Audio decode frame error: {e}");
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        for chunk in buf.samples().chunks(channels) {
            let left = chunk[0];
            let right = chunk.get(1).copied().unwrap_or(left);
            frames.push([left, right]);
        }
    }

    log::info!(
        "Decoded {} frames @ {}Hz ({} ch) from {}",
        frames.len(),
        sample_rate,
        channels,
        path.display()
    );

    Ok((frames, sample_rate))
}

/// Linear resampling of stereo frames from `from` Hz to `to` Hz.
///
/// # Example
/// ```
/// use ab_audio::decode::resample;
/// let frames = vec![[0.0, 0.0], [1.0, 1.0]];
/// assert_eq!(resample(&frames, 22050, 44100).len(), 4);
/// ```
#[must_use]
pub fn resample(frames: &[[f32; 2]], from: u32, to: u32) -> Vec<[f32; 2]> {
    if from == to || from == 0 || to == 0 || frames.is_empty() {
        return frames.to_vec();
    }

    let ratio = f64::from(from) / f64::from(to);
    let out_len = ((frames.len() as f64 / ratio).round() as usize).max(1);
    let last = frames.len() - 1;

    (0..out_len)
        .map(|n| {
            let pos = n as f64 * ratio;
            let i = (pos.floor() as usize).min(last);
            let frac = (pos - i as f64) as f32;
            let a = frames[i];
            let b = frames[(i + 1).min(last)];
            [a[0] + (b[0] - a[0]) * frac, a[1] + (b[1] - a[1]) * frac]
        })
        .collect()
}

/// Decode `path` and resample it to the output rate.
///
/// # Errors
/// Returns an error if decoding fails.
pub fn load_clip(path: &Path, output_rate: u32) -> Result<Clip> {
    let (frames, sample_rate) = decode_file(path)?;
    let frames = resample(&frames, sample_rate, output_rate);
    Ok(Clip::new(frames, output_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_wav::write_wav;

    #[test]
    fn decode_mono_wav_duplicates_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boop.wav");
        write_wav(&path, 8000, 1, &[0, 16384, -16384, 0]);

        let (frames, rate) = decode_file(&path).unwrap();
        assert_eq!(rate, 8000);
        assert_eq!(frames.len(), 4);
        assert!((frames[1][0] - 0.5).abs() < 1e-3);
        assert!((frames[1][0] - frames[1][1]).abs() < f32::EPSILON);
        assert!((frames[2][1] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn decode_stereo_wav_keeps_sides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pan.wav");
        write_wav(&path, 44100, 2, &[16384, 0, 0, -16384]);

        let (frames, _) = decode_file(&path).unwrap();
        assert_eq!(frames.len(), 2);
        assert!((frames[0][0] - 0.5).abs() < 1e-3);
        assert!(frames[0][1].abs() < 1e-3);
        assert!((frames[1][1] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn probe_reads_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beep.wav");
        write_wav(&path, 22050, 2, &[0; 8]);

        let info = probe_file(&path).unwrap();
        assert_eq!(info.sample_rate, 22050);
        assert_eq!(info.channels, 2);
    }

    #[test]
    fn probe_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();
        assert!(probe_file(&path).is_err());
        assert!(probe_file(dir.path().join("missing.wav")).is_err());
    }

    #[test]
    fn resample_interpolates_between_frames() {
        let frames = vec![[0.0, 0.0], [1.0, -1.0]];
        let up = resample(&frames, 1, 2);
        assert_eq!(up.len(), 4);
        assert!((up[1][0] - 0.5).abs() < 1e-6);
        assert!((up[1][1] + 0.5).abs() < 1e-6);

        let down = resample(&[[0.5, 0.5]; 100], 48000, 24000);
        assert_eq!(down.len(), 50);
        assert!(down.iter().all(|f| (f[0] - 0.5).abs() < 1e-6));
    }

    #[test]
    fn load_clip_converts_to_output_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 22050, 1, &[1000; 100]);

        let clip = load_clip(&path, 44100).unwrap();
        assert_eq!(clip.sample_rate(), 44100);
        assert_eq!(clip.len(), 200);
    }
}
