// Pitch module - YIN fundamental frequency tracking
//
// Algorithm (de Cheveigné & Kawahara, 2002):
// 1. Center-pad the signal with frame_length / 2 zeros on both sides
// 2. Slice frames of frame_length samples every hop_length samples
// 3. Difference function over a window W = frame_length / 2:
//    d(tau) = e(0) + e(tau) - 2 r(tau), with r from FFT cross-correlation
// 4. Cumulative mean normalization: d'(tau) = d(tau) * tau / Σ_{k=1..tau} d(k)
// 5. Pick the first local minimum of d' below the trough threshold inside
//    [sr / fmax, sr / fmin]; fall back to the global minimum
// 6. Refine the lag with parabolic interpolation, f0 = sr / period
//
// Every frame produces an estimate, so silence yields a (meaningless but
// finite) contour rather than an empty one.

use super::fft::CrossCorrelator;
use crate::config::PitchConfig;

/// Frame-wise fundamental frequency estimator
pub struct PitchTracker {
    config: PitchConfig,
}

/// Lag search range and window size resolved for one sample rate
#[derive(Debug, Clone, Copy, PartialEq)]
struct LagRange {
    window: usize,
    min_period: usize,
    max_period: usize,
}

impl PitchTracker {
    pub fn new(config: PitchConfig) -> Self {
        Self { config }
    }

    /// Estimate one f0 (Hz) per frame
    ///
    /// Returns an empty contour when the input has fewer than 2 samples, the
    /// sample rate is 0, or the configured band cannot be resolved at this
    /// sample rate and frame length.
    pub fn track(&self, audio: &[f32], sample_rate: u32) -> Vec<f32> {
        if audio.len() < 2 || sample_rate == 0 {
            return Vec::new();
        }

        let frame_length = self.config.frame_length.max(4);
        let hop_length = self.config.hop_length.max(1);
        let range = match self.lag_range(sample_rate, frame_length) {
            Some(range) => range,
            None => {
                log::debug!(
                    "[PitchTracker] No admissible lag range for {} Hz (band {}-{} Hz, frame {})",
                    sample_rate,
                    self.config.fmin,
                    self.config.fmax,
                    frame_length
                );
                return Vec::new();
            }
        };

        let pad = frame_length / 2;
        let mut padded = vec![0.0f32; audio.len() + 2 * pad];
        padded[pad..pad + audio.len()].copy_from_slice(audio);

        let n_frames = 1 + (padded.len() - frame_length) / hop_length;
        let correlator = CrossCorrelator::new(range.window, frame_length);

        let contour: Vec<f32> = (0..n_frames)
            .map(|i| {
                let start = i * hop_length;
                let frame = &padded[start..start + frame_length];
                let cmnd = cumulative_mean_normalized_difference(frame, range, &correlator);
                let period = pick_period(&cmnd, range, self.config.trough_threshold);
                sample_rate as f32 / period
            })
            .collect();

        log::debug!(
            "[PitchTracker] {} frames, lag range [{}, {}]",
            contour.len(),
            range.min_period,
            range.max_period
        );

        contour
    }

    fn lag_range(&self, sample_rate: u32, frame_length: usize) -> Option<LagRange> {
        let fmin = self.config.fmin;
        let fmax = self.config.fmax;
        if !(fmin > 0.0 && fmax > fmin) {
            return None;
        }

        let window = frame_length / 2;
        let sr = sample_rate as f32;
        let min_period = ((sr / fmax).floor() as usize).max(1);
        // Keep one extra lag past max_period for parabolic interpolation
        let max_period = ((sr / fmin).ceil() as usize).min(frame_length - window - 1);

        if min_period >= max_period {
            return None;
        }

        Some(LagRange {
            window,
            min_period,
            max_period,
        })
    }
}

/// d'(tau) for tau in 0..=max_period + 1
fn cumulative_mean_normalized_difference(
    frame: &[f32],
    range: LagRange,
    correlator: &CrossCorrelator,
) -> Vec<f32> {
    let max_lag = range.max_period + 1;
    let w = range.window;
    let acf = correlator.correlate(&frame[..w], frame, max_lag);

    // energy[t] = Σ_{j=t}^{t+w-1} x[j]^2 via prefix sums
    let mut prefix = Vec::with_capacity(frame.len() + 1);
    prefix.push(0.0f64);
    for &x in frame {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + (x as f64) * (x as f64));
    }
    let energy = |t: usize| (prefix[t + w] - prefix[t]) as f32;

    let e0 = energy(0);
    let mut cmnd = Vec::with_capacity(max_lag + 1);
    cmnd.push(1.0f32);

    let mut running = 0.0f32;
    for tau in 1..=max_lag {
        let diff = (e0 + energy(tau) - 2.0 * acf[tau]).max(0.0);
        running += diff;
        cmnd.push(diff * tau as f32 / (running + f32::MIN_POSITIVE));
    }

    cmnd
}

/// Fractional period (in samples) for one frame's normalized difference
fn pick_period(cmnd: &[f32], range: LagRange, threshold: f32) -> f32 {
    let lo = range.min_period;
    let hi = range.max_period;

    // The first lag counts as a trough when it is below its right neighbor
    let is_trough = |tau: usize| {
        if tau == lo {
            cmnd[tau] < cmnd[tau + 1]
        } else {
            cmnd[tau] < cmnd[tau - 1] && cmnd[tau] <= cmnd[tau + 1]
        }
    };

    let chosen = (lo..=hi)
        .find(|&tau| is_trough(tau) && cmnd[tau] < threshold)
        .unwrap_or_else(|| {
            (lo..=hi)
                .min_by(|&a, &b| cmnd[a].total_cmp(&cmnd[b]).then(a.cmp(&b)))
                .unwrap_or(lo)
        });

    // Edge lags have no in-range neighbor on one side, so they stay unrefined
    if chosen == lo || chosen == hi {
        return chosen as f32;
    }
    chosen as f32 + parabolic_shift(cmnd, chosen)
}

/// Vertex offset of the parabola through (tau-1, tau, tau+1)
fn parabolic_shift(values: &[f32], tau: usize) -> f32 {
    if tau == 0 || tau + 1 >= values.len() {
        return 0.0;
    }

    let a = values[tau + 1] + values[tau - 1] - 2.0 * values[tau];
    let b = (values[tau + 1] - values[tau - 1]) / 2.0;
    if b.abs() >= a.abs() {
        0.0
    } else {
        -b / a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine_wave(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<f32> {
        (0..duration_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    fn median(values: &[f32]) -> f32 {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted[sorted.len() / 2]
    }

    #[test]
    fn test_tracks_pure_tone() {
        let tracker = PitchTracker::new(PitchConfig::default());
        let signal = generate_sine_wave(16_000, 220.0, 16_000);
        let contour = tracker.track(&signal, 16_000);

        // 1 + 16000 / 512 frames with centered framing
        assert_eq!(contour.len(), 32);
        let f0 = median(&contour);
        assert!(
            (f0 - 220.0).abs() < 5.0,
            "Expected ~220 Hz, got {} Hz",
            f0
        );
    }

    /// f0 must lie in [sr / max_period, sr / min_period]
    fn assert_inside_band(contour: &[f32], sample_rate: u32) {
        let config = PitchConfig::default();
        let sr = sample_rate as f32;
        let min_period = (sr / config.fmax).floor();
        let max_period = (sr / config.fmin).ceil();
        let ceiling = sr / min_period;
        let floor = sr / max_period;

        assert!(!contour.is_empty());
        for &f0 in contour {
            assert!(f0.is_finite());
            assert!(
                f0 <= ceiling + 1e-3 && f0 >= floor - 1e-3,
                "f0 {} outside [{}, {}]",
                f0,
                floor,
                ceiling
            );
        }
    }

    #[test]
    fn test_estimates_stay_inside_band() {
        let tracker = PitchTracker::new(PitchConfig::default());
        let signal = generate_sine_wave(22_050, 130.0, 22_050);
        assert_inside_band(&tracker.track(&signal, 22_050), 22_050);
    }

    #[test]
    fn test_tone_above_band_is_clamped_to_ceiling() {
        let tracker = PitchTracker::new(PitchConfig::default());
        for frequency in [505.0, 510.0] {
            let signal = generate_sine_wave(16_000, frequency, 16_000);
            let contour = tracker.track(&signal, 16_000);
            assert_inside_band(&contour, 16_000);
            assert!(contour.iter().all(|&f0| f0 <= 500.0 + 1e-3));
        }
    }

    #[test]
    fn test_edge_lags_are_not_refined() {
        let range = LagRange {
            window: 8,
            min_period: 2,
            max_period: 5,
        };
        // Minimum sits on min_period with a lower value just outside the range
        let cmnd = [1.0, 0.0, 0.05, 0.4, 0.6, 0.8, 0.9];
        assert_eq!(pick_period(&cmnd, range, 0.1), 2.0);

        // No trough below threshold: global minimum at max_period
        let cmnd = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.2];
        assert_eq!(pick_period(&cmnd, range, 0.1), 5.0);
    }

    #[test]
    fn test_degenerate_input_has_no_frames() {
        let tracker = PitchTracker::new(PitchConfig::default());
        assert!(tracker.track(&[], 16_000).is_empty());
        assert!(tracker.track(&[0.3], 16_000).is_empty());
        assert!(tracker.track(&[0.1, 0.2, 0.3], 0).is_empty());
    }

    #[test]
    fn test_silence_is_finite() {
        let tracker = PitchTracker::new(PitchConfig::default());
        let contour = tracker.track(&vec![0.0; 4_000], 16_000);

        assert!(!contour.is_empty());
        assert!(contour.iter().all(|f| f.is_finite() && *f > 0.0));
    }

    #[test]
    fn test_unresolvable_band_yields_no_frames() {
        let config = PitchConfig {
            fmin: 500.0,
            fmax: 50.0,
            ..PitchConfig::default()
        };
        let tracker = PitchTracker::new(config);
        let signal = generate_sine_wave(16_000, 220.0, 4_000);
        assert!(tracker.track(&signal, 16_000).is_empty());
    }

    #[test]
    fn test_parabolic_shift() {
        // Symmetric neighbors: vertex exactly on the sample
        assert_eq!(parabolic_shift(&[1.0, 0.0, 1.0], 1), 0.0);
        // Right neighbor lower: vertex moves right
        assert!(parabolic_shift(&[1.0, 0.2, 0.4], 1) > 0.0);
        assert_eq!(parabolic_shift(&[1.0, 0.0], 1), 0.0);
    }
}
