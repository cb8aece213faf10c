//! Audio preparation for speech recognition.
//!
//! Browser recordings arrive as WAV in whatever rate and channel layout the
//! microphone produced. The recognizer wants 16 kHz mono 16-bit PCM.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use std::{
    io::Cursor,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const RECOGNIZER_SAMPLE_RATE: u32 = 16_000;

const RESAMPLE_CHUNK_SIZE: usize = 1024;

/// Creates a resampler to convert between audio sample rates.
pub fn create_resampler(
    in_sampling_rate: f64,
    out_sampling_rate: f64,
    chunk_size: usize,
) -> Result<FastFixedIn<f32>> {
    let resampler = FastFixedIn::<f32>::new(
        out_sampling_rate / in_sampling_rate,
        1.0,
        PolynomialDegree::Cubic,
        chunk_size,
        1, // mono
    )?;
    Ok(resampler)
}

/// Converts a slice of i16 samples to a vector of f32 samples.
pub fn convert_i16_to_f32(pcm16: &[i16]) -> Vec<f32> {
    pcm16
        .iter()
        .map(|&sample| sample as f32 / 32768.0)
        .collect()
}

/// Converts a slice of f32 samples to a vector of i16 samples.
pub fn convert_f32_to_i16(pcm32: &[f32]) -> Vec<i16> {
    pcm32
        .iter()
        .map(|&sample| (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16)
        .collect()
}

/// Averages interleaved frames down to one channel.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels as usize)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Reads a WAV file into normalized f32 samples. Returns (samples, sample rate, channels).
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32, u16)> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, _) => reader.samples::<f32>().collect::<Result<Vec<f32>, _>>()?,
        (SampleFormat::Int, 16) => {
            let pcm16 = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
            convert_i16_to_f32(&pcm16)
        }
        (SampleFormat::Int, bits @ (8 | 24 | 32)) => {
            let scale = (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<f32>, _>>()?
        }
        (_, bits) => anyhow::bail!("Unsupported bit depth: {}", bits),
    };

    Ok((samples, spec.sample_rate, spec.channels))
}

/// Resamples mono audio from `in_rate` to `out_rate`.
pub fn resample(samples: &[f32], in_rate: u32, out_rate: u32) -> Result<Vec<f32>> {
    if in_rate == out_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = create_resampler(in_rate as f64, out_rate as f64, RESAMPLE_CHUNK_SIZE)?;
    let expected = samples.len() * out_rate as usize / in_rate as usize;
    let mut output = Vec::with_capacity(expected + RESAMPLE_CHUNK_SIZE);

    let mut pos = 0;
    while samples.len() - pos >= resampler.input_frames_next() {
        let next = resampler.input_frames_next();
        let frame: [&[f32]; 1] = [&samples[pos..pos + next]];
        let out = resampler.process(&frame[..], None)?;
        output.extend_from_slice(&out[0]);
        pos += next;
    }
    if pos < samples.len() {
        let frame: [&[f32]; 1] = [&samples[pos..]];
        let out = resampler.process_partial(Some(&frame[..]), None)?;
        output.extend_from_slice(&out[0]);
    }

    Ok(output)
}

/// Encodes mono f32 samples as a 16-bit PCM WAV file in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut buf = Vec::with_capacity(44 + samples.len() * 2);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buf), spec)?;
        for sample in convert_f32_to_i16(samples) {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(buf)
}

/// Loads an utterance and re-encodes it in the recognizer's format.
pub fn prepare_for_recognition(path: &Path) -> Result<Vec<u8>> {
    let (samples, sample_rate, channels) = read_wav(path)?;
    debug!(
        sample_rate,
        channels,
        frames = samples.len() / channels.max(1) as usize,
        "Preparing utterance for recognition"
    );
    let mono = downmix_to_mono(&samples, channels);
    let resampled = resample(&mono, sample_rate, RECOGNIZER_SAMPLE_RATE)?;
    encode_wav(&resampled, RECOGNIZER_SAMPLE_RATE)
}

/// Runs [`prepare_for_recognition`] on the blocking pool.
pub async fn prepare_for_recognition_blocking(path: PathBuf) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || prepare_for_recognition(&path)).await?
}
