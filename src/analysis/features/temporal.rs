// Temporal module - Time-domain feature extraction
//
// This module computes features directly from time-domain samples: the
// jitter and shimmer proxies and the recording duration. All of them are
// defined for degenerate input and never fail.

/// Mean absolute first difference of consecutive samples
///
/// Formula: jitter = (1 / (N - 1)) × Σ|x[n] - x[n-1]|
///
/// Returns 0.0 for fewer than 2 samples.
pub fn compute_jitter(audio: &[f32]) -> f64 {
    if audio.len() < 2 {
        return 0.0;
    }

    let total: f64 = audio
        .windows(2)
        .map(|pair| (pair[1] as f64 - pair[0] as f64).abs())
        .sum();

    total / (audio.len() - 1) as f64
}

/// Population standard deviation of the raw samples
///
/// Returns 0.0 for an empty signal.
pub fn compute_shimmer(audio: &[f32]) -> f64 {
    let (_, std) = mean_and_std(audio.iter().map(|&s| s as f64));
    std
}

/// Duration in seconds (sample count / sample rate)
pub fn compute_duration(sample_count: usize, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    sample_count as f64 / sample_rate as f64
}

/// Mean and population standard deviation; (0.0, 0.0) when empty
pub fn mean_and_std<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let values = values.into_iter();
    let (count, sum) = values
        .clone()
        .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));
    if count == 0 {
        return (0.0, 0.0);
    }

    let mean = sum / count as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_short_input() {
        assert_eq!(compute_jitter(&[]), 0.0);
        assert_eq!(compute_jitter(&[0.7]), 0.0);
    }

    #[test]
    fn test_shimmer_short_input() {
        assert_eq!(compute_shimmer(&[]), 0.0);
        assert_eq!(compute_shimmer(&[0.7]), 0.0);
    }

    #[test]
    fn test_jitter_alternating_signal() {
        // |diff| is always 1.0
        let signal = [0.5, -0.5, 0.5, -0.5, 0.5];
        assert!((compute_jitter(&signal) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_shimmer_matches_population_std() {
        let signal = [1.0, -1.0, 1.0, -1.0];
        assert!((compute_shimmer(&signal) - 1.0).abs() < 1e-9);

        let constant = [0.25; 100];
        assert!(compute_shimmer(&constant).abs() < 1e-9);
    }

    #[test]
    fn test_duration() {
        assert_eq!(compute_duration(16_000, 16_000), 1.0);
        assert_eq!(compute_duration(8_000, 16_000), 0.5);
        assert_eq!(compute_duration(100, 0), 0.0);
    }

    #[test]
    fn test_mean_and_std() {
        let (mean, std) = mean_and_std(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
        assert_eq!(mean_and_std(Vec::<f64>::new()), (0.0, 0.0));
    }
}
