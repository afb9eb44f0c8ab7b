// FFT module - Fast Fourier Transform computation
//
// This module handles the two spectral primitives the extractors need:
// Hann-windowed magnitude spectra (onset envelope) and zero-padded
// cross-correlation (YIN difference function).

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Periodic Hann window of the given length, as used for STFT frames
pub fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| {
            0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / size as f32).cos())
        })
        .collect()
}

/// FFT processor that computes magnitude spectra from audio windows
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window for FFT (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = FftPlanner::new();

        Self {
            fft: planner.plan_fft_forward(fft_size),
            fft_size,
            window: hann_window(fft_size),
        }
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies Hann windowing, performs FFT, and returns magnitude spectrum
    /// for positive frequencies only. Input shorter than the FFT size is
    /// zero-padded; longer input is truncated.
    ///
    /// # Returns
    /// Magnitude spectrum (size = fft_size / 2 + 1)
    pub fn compute_magnitude_spectrum(&self, audio: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = audio
            .iter()
            .zip(self.window.iter())
            .map(|(sample, window_val)| Complex::new(sample * window_val, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

/// Sliding cross-correlation of a short template against a longer frame
///
/// Returns `r[tau] = Σ_j template[j] * frame[j + tau]` for
/// `tau in 0..=max_lag`, computed as `IFFT(conj(FFT(template)) · FFT(frame))`
/// with enough zero padding that no circular wrap-around occurs.
pub struct CrossCorrelator {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    size: usize,
}

impl CrossCorrelator {
    /// Plan transforms for templates of `template_len` against frames of `frame_len`
    pub fn new(template_len: usize, frame_len: usize) -> Self {
        let size = (template_len + frame_len).next_power_of_two().max(2);
        let mut planner = FftPlanner::new();

        Self {
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
            size,
        }
    }

    pub fn correlate(&self, template: &[f32], frame: &[f32], max_lag: usize) -> Vec<f32> {
        let mut a = self.padded(template);
        let mut b = self.padded(frame);
        self.forward.process(&mut a);
        self.forward.process(&mut b);

        let mut product: Vec<Complex<f32>> = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| x.conj() * y)
            .collect();
        self.inverse.process(&mut product);

        let scale = 1.0 / self.size as f32;
        product
            .iter()
            .take((max_lag + 1).min(self.size))
            .map(|c| c.re * scale)
            .collect()
    }

    fn padded(&self, signal: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = signal
            .iter()
            .take(self.size)
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        buffer
    }
}
