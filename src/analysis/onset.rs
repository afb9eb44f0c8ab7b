// OnsetEnvelope - spectral flux onset strength over a whole recording
//
// Offline counterpart of a streaming spectral-flux onset detector: instead of
// peak-picking events as audio arrives, it returns the full onset strength
// curve so the tempo estimator can look for periodicity in it.
//
// Algorithm:
// 1. Center-pad by window_size / 2 and frame with hop_size
// 2. Hann-windowed magnitude spectrum per frame, log-compressed: ln(1 + |X[k]|)
// 3. Positive difference from the previous frame: SF[k] = max(0, S_t[k] - S_(t-1)[k])
// 4. Mean across frequency bins: flux_t = (1/K) Σ SF[k]

use crate::analysis::features::fft::FftProcessor;
use crate::config::RhythmConfig;

/// Onset strength curve with its frame rate
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetEnvelope {
    /// One onset strength value per hop
    pub strength: Vec<f32>,
    /// Envelope frames per second
    pub frame_rate: f32,
}

impl OnsetEnvelope {
    /// Compute the onset strength envelope of a complete recording
    ///
    /// Empty input or a zero sample rate yields an empty envelope.
    pub fn compute(audio: &[f32], sample_rate: u32, config: &RhythmConfig) -> Self {
        let window_size = config.window_size.max(2);
        let hop_size = config.hop_size.max(1);
        let frame_rate = if sample_rate == 0 {
            0.0
        } else {
            sample_rate as f32 / hop_size as f32
        };

        if audio.is_empty() || sample_rate == 0 {
            return Self {
                strength: Vec::new(),
                frame_rate,
            };
        }

        let processor = FftProcessor::new(window_size);
        let pad = window_size / 2;
        let mut padded = vec![0.0f32; audio.len() + 2 * pad];
        padded[pad..pad + audio.len()].copy_from_slice(audio);

        let n_frames = 1 + (padded.len() - window_size) / hop_size;
        let mut prev_spectrum: Option<Vec<f32>> = None;
        let mut strength = Vec::with_capacity(n_frames);

        for i in 0..n_frames {
            let start = i * hop_size;
            let spectrum: Vec<f32> = processor
                .compute_magnitude_spectrum(&padded[start..start + window_size])
                .into_iter()
                .map(f32::ln_1p)
                .collect();

            let flux = match &prev_spectrum {
                Some(prev) => compute_spectral_flux(&spectrum, prev),
                None => 0.0,
            };
            strength.push(flux);
            prev_spectrum = Some(spectrum);
        }

        Self {
            strength,
            frame_rate,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.strength.iter().all(|&v| v <= f32::EPSILON)
    }
}

/// Mean positive difference between consecutive spectra
///
/// SF(t) = (1/K) Σ max(0, S_t[k] - S_(t-1)[k])
fn compute_spectral_flux(spectrum: &[f32], prev_spectrum: &[f32]) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }

    let total: f32 = spectrum
        .iter()
        .zip(prev_spectrum.iter())
        .map(|(curr, prev)| (curr - prev).max(0.0))
        .sum();
    total / spectrum.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate synthetic click train for testing
    fn generate_clicks(sample_rate: u32, duration_ms: u32, interval_ms: u32) -> Vec<f32> {
        let total_samples = (sample_rate * duration_ms / 1000) as usize;
        let interval = (sample_rate * interval_ms / 1000) as usize;
        let mut signal = vec![0.0; total_samples];

        for start in (0..total_samples).step_by(interval) {
            // Create a short burst of energy (10 samples)
            for offset in 0..10 {
                if start + offset < total_samples {
                    signal[start + offset] = 1.0;
                }
            }
        }

        signal
    }

    #[test]
    fn test_spectral_flux_identical_spectra() {
        let spectrum = vec![1.0; 129];
        assert_eq!(compute_spectral_flux(&spectrum, &spectrum), 0.0);
    }

    #[test]
    fn test_spectral_flux_positive_difference() {
        let prev = vec![1.0; 129];
        let curr = vec![2.0; 129];
        assert_eq!(compute_spectral_flux(&curr, &prev), 1.0);
        // Energy decrease is ignored
        assert_eq!(compute_spectral_flux(&prev, &curr), 0.0);
    }

    #[test]
    fn test_silence_is_flat() {
        let config = RhythmConfig::default();
        let envelope = OnsetEnvelope::compute(&vec![0.0; 16_000], 16_000, &config);

        assert_eq!(envelope.strength.len(), 1 + 16_000 / 512);
        assert!(envelope.is_flat());
        assert_eq!(envelope.frame_rate, 31.25);
    }

    #[test]
    fn test_clicks_produce_peaks() {
        let config = RhythmConfig::default();
        let signal = generate_clicks(16_000, 2_000, 500);
        let envelope = OnsetEnvelope::compute(&signal, 16_000, &config);

        assert!(!envelope.is_flat());
        let max = envelope.strength.iter().cloned().fold(0.0f32, f32::max);
        assert!(max > 0.0);
    }

    #[test]
    fn test_empty_input() {
        let config = RhythmConfig::default();
        let envelope = OnsetEnvelope::compute(&[], 16_000, &config);
        assert!(envelope.strength.is_empty());
        assert!(envelope.is_flat());
    }
}
