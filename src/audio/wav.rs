// WAV decoding into mono waveforms
//
// Integer PCM is scaled by 1 / 2^(bits - 1) so full-scale negative input maps
// to exactly -1.0. Multi-channel files are downmixed by averaging each frame.

use std::path::Path;

use super::Waveform;
use crate::error::{log_audio_error, AudioError};

/// Decode a PCM WAV file into a mono `Waveform`
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Waveform, AudioError> {
    decode(path.as_ref()).map_err(|err| {
        log_audio_error(&err, "load_wav");
        err
    })
}

fn decode(path: &Path) -> Result<Waveform, AudioError> {
    let display = path.display().to_string();

    let mut reader = hound::WavReader::open(path).map_err(|err| AudioError::OpenFailed {
        path: display.clone(),
        reason: err.to_string(),
    })?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::ZeroChannels { path: display });
    }

    let read_failed = |err: hound::Error| AudioError::ReadFailed {
        path: display.clone(),
        reason: err.to_string(),
    };

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => match spec.bits_per_sample {
            32 => reader
                .samples::<f32>()
                .map(|sample| sample.map_err(read_failed))
                .collect::<Result<Vec<f32>, _>>()?,
            bits => {
                return Err(AudioError::UnsupportedFormat {
                    path: display.clone(),
                    bits_per_sample: bits,
                })
            }
        },
        hound::SampleFormat::Int => match spec.bits_per_sample {
            8 | 16 | 24 | 32 => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f64;
                reader
                    .samples::<i32>()
                    .map(|sample| {
                        sample
                            .map(|v| (v as f64 * scale) as f32)
                            .map_err(read_failed)
                    })
                    .collect::<Result<Vec<f32>, _>>()?
            }
            bits => {
                return Err(AudioError::UnsupportedFormat {
                    path: display.clone(),
                    bits_per_sample: bits,
                })
            }
        },
    };

    log::debug!(
        "[WavLoader] {}: {} samples, {} Hz, {} channel(s)",
        display,
        samples.len(),
        spec.sample_rate,
        spec.channels
    );

    Ok(Waveform::new(
        downmix(samples, spec.channels as usize),
        spec.sample_rate,
    ))
}

fn downmix(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }

    let mut mono = Vec::with_capacity(samples.len() / channels);
    for chunk in samples.chunks(channels) {
        let sum: f32 = chunk.iter().copied().sum();
        mono.push(sum / chunk.len() as f32);
    }
    mono
}
