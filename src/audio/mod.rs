// Audio module - waveform container and WAV decoding
//
// A `Waveform` is the unit of acoustic input for one analysis request:
// mono f32 samples plus the sample rate they were captured at.

mod wav;

pub use wav::load_wav;

/// Mono audio recording
///
/// Immutable once constructed. Samples are nominally in [-1.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// `duration_secs` seconds of digital silence
    pub fn silence(duration_secs: f32, sample_rate: u32) -> Self {
        let len = (duration_secs.max(0.0) * sample_rate as f32).round() as usize;
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds; 0.0 when the sample rate is unknown (0)
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let waveform = Waveform::new(vec![0.0; 24_000], 16_000);
        assert_eq!(waveform.duration_secs(), 1.5);
        assert_eq!(waveform.len(), 24_000);
    }

    #[test]
    fn test_zero_sample_rate_has_zero_duration() {
        let waveform = Waveform::new(vec![0.1; 100], 0);
        assert_eq!(waveform.duration_secs(), 0.0);
    }

    #[test]
    fn test_silence_constructor() {
        let waveform = Waveform::silence(1.0, 16_000);
        assert_eq!(waveform.len(), 16_000);
        assert!(waveform.samples().iter().all(|&s| s == 0.0));
        assert!(Waveform::silence(-1.0, 16_000).is_empty());
    }
}
