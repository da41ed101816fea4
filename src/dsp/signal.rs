//! Synthetic test signals.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Sum of sines, given as `(frequency_hz, amplitude)` pairs
pub fn tone(len: usize, sample_rate: u32, components: &[(f32, f32)]) -> Vec<f32> {
    let mut signal = vec![0.0f32; len];

    for &(freq_hz, amplitude) in components {
        let omega = 2.0 * PI * freq_hz as f64 / sample_rate as f64;
        for (i, sample) in signal.iter_mut().enumerate() {
            *sample += amplitude * (omega * i as f64).sin() as f32;
        }
    }

    signal
}

/// Unit impulse at index `at`
pub fn impulse(len: usize, at: usize) -> Vec<f32> {
    let mut signal = vec![0.0f32; len];
    if let Some(sample) = signal.get_mut(at) {
        *sample = 1.0;
    }
    signal
}

/// Uniform white noise in `[-amplitude, amplitude]`, reproducible per seed
pub fn white_noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.gen_range(-amplitude..=amplitude))
        .collect()
}
