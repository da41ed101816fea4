use rustfft::{num_complex::Complex32, FftPlanner};
use std::f32::consts::PI;

/// Level reported for empty bins
const FLOOR_DB: f32 = -100.0;

/// FFT spectrum analyzer for real-valued audio
pub struct SpectrumAnalyzer {
    /// FFT size
    size: usize,
    /// Sample rate of the analysed signal
    sample_rate: u32,
    /// FFT planner (reused for efficiency)
    planner: FftPlanner<f32>,
    /// Working buffer for FFT
    buffer: Vec<Complex32>,
    /// Window function coefficients
    window: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create a new analyzer
    pub fn new(size: usize, sample_rate: u32) -> Self {
        Self {
            size,
            sample_rate,
            planner: FftPlanner::new(),
            buffer: vec![Complex32::new(0.0, 0.0); size],
            window: Self::hann_window(size),
        }
    }

    /// Compute the one-sided magnitude spectrum in dB.
    ///
    /// Returns `size / 2 + 1` bins from DC to Nyquist. Short input is
    /// zero-padded, long input truncated.
    pub fn process(&mut self, samples: &[f32]) -> Vec<f32> {
        let sample_count = samples.len().min(self.size);

        for i in 0..sample_count {
            self.buffer[i] = Complex32::new(samples[i] * self.window[i], 0.0);
        }
        for i in sample_count..self.size {
            self.buffer[i] = Complex32::new(0.0, 0.0);
        }

        let fft = self.planner.plan_fft_forward(self.size);
        fft.process(&mut self.buffer);

        self.buffer[..self.size / 2 + 1]
            .iter()
            .map(|bin| {
                let magnitude = bin.norm();
                if magnitude > 1e-10 {
                    20.0 * magnitude.log10()
                } else {
                    FLOOR_DB
                }
            })
            .collect()
    }

    /// Centre frequency of a bin in Hz
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.size as f32
    }

    /// Frequency and level of the strongest bin
    pub fn peak(&self, spectrum: &[f32]) -> (f32, f32) {
        let (bin, db) = spectrum
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, db)| {
                if db > best.1 {
                    (i, db)
                } else {
                    best
                }
            });
        (self.bin_frequency(bin), db)
    }

    /// Strongest level among bins whose frequency lies in `[low_hz, high_hz]`.
    /// Returns the floor level for an empty band.
    pub fn band_peak_db(&self, spectrum: &[f32], low_hz: f32, high_hz: f32) -> f32 {
        spectrum
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let freq = self.bin_frequency(*i);
                freq >= low_hz && freq <= high_hz
            })
            .map(|(_, &db)| db)
            .fold(FLOOR_DB, f32::max)
    }

    /// Generate Hann window coefficients
    fn hann_window(size: usize) -> Vec<f32> {
        if size < 2 {
            return vec![1.0; size];
        }
        (0..size)
            .map(|i| {
                let angle = 2.0 * PI * i as f32 / (size - 1) as f32;
                0.5 * (1.0 - angle.cos())
            })
            .collect()
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
