use crate::types::ResamplerConfig;
use std::f64::consts::PI;

/// Precomputed windowed-sinc interpolation table.
///
/// Row `p` holds the taps for a read position `p / sub_phases` of a sample
/// past the integer index `n`. Tap `j` weighs input sample
/// `n - half_width + 1 + j`. One extra row at fraction 1.0 lets evaluation
/// interpolate between neighbouring rows without wrapping.
#[derive(Debug, Clone)]
pub struct FilterKernel {
    half_width: usize,
    sub_phases: usize,
    /// Cut-off in cycles per input sample
    cutoff: f64,
    /// `(sub_phases + 1) * 2 * half_width` coefficients, row-major
    taps: Vec<f32>,
}

impl FilterKernel {
    /// Design the kernel for a rate pair.
    ///
    /// The cut-off sits at `rolloff` times the lower of the two Nyquist
    /// frequencies. When downsampling, the half-width grows by the
    /// decimation factor so the transition band keeps the same width
    /// relative to the output rate. Equal rates use a rolloff of 1.0, which
    /// turns the table into an exact unit impulse.
    pub fn new(input_rate: u32, output_rate: u32, config: &ResamplerConfig) -> Self {
        let scale = (input_rate as f64 / output_rate as f64).max(1.0);
        let half_width = (config.half_width as f64 * scale).ceil() as usize;
        let rolloff = if input_rate == output_rate {
            1.0
        } else {
            config.rolloff
        };
        let cutoff = 0.5 * rolloff / scale;
        let sub_phases = config.sub_phases;
        let width = 2 * half_width;

        let mut taps = Vec::with_capacity((sub_phases + 1) * width);
        for p in 0..=sub_phases {
            let frac = p as f64 / sub_phases as f64;
            let row: Vec<f64> = (0..width)
                .map(|j| {
                    let distance = j as f64 - (half_width as f64 - 1.0) - frac;
                    2.0 * cutoff
                        * sinc(2.0 * cutoff * distance)
                        * kaiser(distance / half_width as f64, config.kaiser_beta)
                })
                .collect();

            // Unit DC gain for every sub-phase
            let sum: f64 = row.iter().sum();
            let norm = if sum.abs() > f64::EPSILON { sum } else { 1.0 };
            taps.extend(row.iter().map(|&t| (t / norm) as f32));
        }

        Self {
            half_width,
            sub_phases,
            cutoff,
            taps,
        }
    }

    /// Input samples on each side of the read position
    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Length of the history window one output sample reads
    pub fn taps_per_row(&self) -> usize {
        2 * self.half_width
    }

    pub fn sub_phases(&self) -> usize {
        self.sub_phases
    }

    /// Cut-off frequency in cycles per input sample
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Taps for sub-phase `p` (`0..=sub_phases`)
    pub fn row(&self, p: usize) -> &[f32] {
        let width = self.taps_per_row();
        &self.taps[p * width..(p + 1) * width]
    }

    /// Filter one output sample.
    ///
    /// `window` is the `2 * half_width` history samples starting
    /// `half_width - 1` samples before the integer read index; `fraction`
    /// is the fractional part of the read position.
    pub fn evaluate(&self, window: &[f32], fraction: f64) -> f32 {
        debug_assert_eq!(window.len(), self.taps_per_row());

        let scaled = fraction * self.sub_phases as f64;
        let p = (scaled as usize).min(self.sub_phases - 1);
        let alpha = scaled - p as f64;

        let lower = self.row(p);
        let upper = self.row(p + 1);

        let mut acc = 0.0f64;
        if alpha == 0.0 {
            for (&x, &t) in window.iter().zip(lower) {
                acc += x as f64 * t as f64;
            }
        } else {
            for ((&x, &a), &b) in window.iter().zip(lower).zip(upper) {
                let tap = a as f64 + (b as f64 - a as f64) * alpha;
                acc += x as f64 * tap;
            }
        }
        acc as f32
    }
}

/// Normalised sinc, `sin(pi x) / (pi x)`
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Kaiser window over `[-1, 1]`
fn kaiser(x: f64, beta: f64) -> f64 {
    if x.abs() > 1.0 {
        return 0.0;
    }
    bessel_i0(beta * (1.0 - x * x).sqrt()) / bessel_i0(beta)
}

/// Zeroth-order modified Bessel function of the first kind
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    loop {
        term *= half / k;
        let contribution = term * term;
        sum += contribution;
        if contribution < sum * 1e-16 {
            break;
        }
        k += 1.0;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_width_scales_with_decimation() {
        let config = ResamplerConfig::default();

        let up = FilterKernel::new(16000, 48000, &config);
        assert_eq!(up.half_width(), 32);

        let down = FilterKernel::new(48000, 16000, &config);
        assert_eq!(down.half_width(), 96);
        assert_eq!(down.taps_per_row(), 192);

        let slight = FilterKernel::new(48000, 44100, &config);
        assert_eq!(slight.half_width(), 35);
    }

    #[test]
    fn test_cutoff() {
        let config = ResamplerConfig::default();

        let up = FilterKernel::new(16000, 48000, &config);
        assert!((up.cutoff() - 0.475).abs() < 1e-12);

        let down = FilterKernel::new(48000, 16000, &config);
        assert!((down.cutoff() - 0.475 / 3.0).abs() < 1e-12);

        let same = FilterKernel::new(48000, 48000, &config);
        assert!((same.cutoff() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rows_have_unit_dc_gain() {
        let kernel = FilterKernel::new(44100, 48000, &ResamplerConfig::default());
        for p in 0..=kernel.sub_phases() {
            let sum: f32 = kernel.row(p).iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "row {p} sums to {sum}");
        }
    }

    #[test]
    fn test_identity_kernel_is_impulse() {
        let kernel = FilterKernel::new(48000, 48000, &ResamplerConfig::default());
        let row = kernel.row(0);
        let center = kernel.half_width() - 1;

        assert!((row[center] - 1.0).abs() < 1e-6);
        for (j, &tap) in row.iter().enumerate() {
            if j != center {
                assert!(tap.abs() < 1e-6, "tap {j} = {tap}");
            }
        }
    }

    #[test]
    fn test_rows_are_symmetric_at_half_phase() {
        let kernel = FilterKernel::new(16000, 48000, &ResamplerConfig::default());
        let row = kernel.row(kernel.sub_phases() / 2);
        let width = row.len();
        for j in 0..width {
            assert!((row[j] - row[width - 1 - j]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_evaluate_interpolates_between_samples() {
        // A constant signal stays constant at any phase
        let kernel = FilterKernel::new(44100, 48000, &ResamplerConfig::default());
        let window = vec![0.5f32; kernel.taps_per_row()];
        for fraction in [0.0, 0.1, 0.25, 0.5, 0.999] {
            let y = kernel.evaluate(&window, fraction);
            assert!((y - 0.5).abs() < 1e-4, "fraction {fraction}: {y}");
        }
    }

    #[test]
    fn test_evaluate_ramp() {
        // Linear ramps are reproduced at fractional positions
        let kernel = FilterKernel::new(16000, 48000, &ResamplerConfig::default());
        let hw = kernel.half_width() as f32;
        let window: Vec<f32> = (0..kernel.taps_per_row())
            .map(|j| (j as f32 - (hw - 1.0)) * 0.01)
            .collect();
        let y = kernel.evaluate(&window, 0.5);
        assert!((y - 0.005).abs() < 1e-3, "got {y}");
    }

    #[test]
    fn test_bessel_i0() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-12);
        assert!((bessel_i0(8.0) - 427.564_115_721_804_74).abs() < 1e-9);
    }

    #[test]
    fn test_kaiser_window_shape() {
        assert!((kaiser(0.0, 8.0) - 1.0).abs() < 1e-12);
        assert!(kaiser(0.5, 8.0) < 1.0);
        assert!(kaiser(0.9, 8.0) < kaiser(0.5, 8.0));
        assert_eq!(kaiser(1.5, 8.0), 0.0);
    }
}
