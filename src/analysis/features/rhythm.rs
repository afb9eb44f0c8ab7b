// Rhythm module - tempo estimation from the onset envelope
//
// The dominant periodicity of the onset strength curve is found with an
// autocorrelation weighted by a log-normal prior over tempo, following
// Ellis (2007) "Beat Tracking by Dynamic Programming":
//
//   score(lag) = ACF(lag) / ACF(0) × exp(-0.5 × ((log2(bpm(lag)) - log2(start_bpm)) / std_bpm)^2)
//   bpm(lag)   = 60 × frame_rate / lag
//
// Only lags inside the configured BPM range and the autocorrelation horizon
// are considered. A flat envelope has no tempo (0 BPM).

use crate::analysis::onset::OnsetEnvelope;
use crate::config::RhythmConfig;

/// Global tempo estimator
pub struct TempoEstimator {
    config: RhythmConfig,
}

impl TempoEstimator {
    pub fn new(config: RhythmConfig) -> Self {
        Self { config }
    }

    /// Tempo in beats per minute of a complete recording
    pub fn estimate_bpm(&self, audio: &[f32], sample_rate: u32) -> f32 {
        let envelope = OnsetEnvelope::compute(audio, sample_rate, &self.config);
        self.estimate_from_envelope(&envelope)
    }

    /// Tempo in beats per minute for a precomputed envelope
    pub fn estimate_from_envelope(&self, envelope: &OnsetEnvelope) -> f32 {
        if envelope.is_flat() || envelope.frame_rate <= 0.0 {
            return 0.0;
        }

        let strength = &envelope.strength;
        let horizon = (self.config.max_lag_seconds * envelope.frame_rate).round() as usize;
        let max_lag = horizon.min(strength.len().saturating_sub(1));
        let acf = autocorrelate(strength, max_lag);
        if acf.is_empty() || acf[0] <= 0.0 {
            return 0.0;
        }

        let log_start = self.config.start_bpm.max(f32::MIN_POSITIVE).log2();
        let std_bpm = self.config.std_bpm.max(f32::MIN_POSITIVE);

        let best = (1..acf.len())
            .filter_map(|lag| {
                let bpm = 60.0 * envelope.frame_rate / lag as f32;
                if bpm < self.config.min_bpm || bpm > self.config.max_bpm {
                    return None;
                }
                let prior = (-0.5 * ((bpm.log2() - log_start) / std_bpm).powi(2)).exp();
                Some((bpm, acf[lag] / acf[0] * prior))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((bpm, score)) if score > 0.0 => {
                log::debug!("[TempoEstimator] {:.1} BPM (score {:.4})", bpm, score);
                bpm
            }
            _ => 0.0,
        }
    }
}

/// Rhythmic event rate in events per second
pub fn speech_rate_from_bpm(bpm: f32) -> f64 {
    bpm as f64 / 60.0
}

/// ACF[lag] = Σ_t x[t] × x[t + lag] for lag in 0..=max_lag
fn autocorrelate(signal: &[f32], max_lag: usize) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }

    (0..=max_lag.min(signal.len() - 1))
        .map(|lag| {
            signal
                .iter()
                .zip(signal[lag..].iter())
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect()
}
