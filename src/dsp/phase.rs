/// Exact rational read position into the input stream.
///
/// The position is `index + frac / denom` input samples. Each output sample
/// advances it by `input_rate / output_rate`, reduced to lowest terms and
/// split into an integer step and a remainder, so the position never drifts
/// no matter how long the stream runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseAccumulator {
    /// Integer part of the position
    index: u64,
    /// Fractional part, in units of `1 / denom`. Always `< denom`.
    frac: u64,
    /// Reduced input rate
    numer: u64,
    /// Reduced output rate
    denom: u64,
    /// Whole input samples per output sample
    step_int: u64,
    /// Remaining fraction of the step, in units of `1 / denom`
    step_frac: u64,
}

impl PhaseAccumulator {
    /// Create an accumulator at position 0.
    ///
    /// Both rates must be non-zero; the converter validates them before
    /// getting here.
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        debug_assert!(input_rate > 0 && output_rate > 0);

        let g = gcd(input_rate as u64, output_rate as u64);
        let numer = input_rate as u64 / g;
        let denom = output_rate as u64 / g;

        Self {
            index: 0,
            frac: 0,
            numer,
            denom,
            step_int: numer / denom,
            step_frac: numer % denom,
        }
    }

    /// Integer part of the current position
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Fractional part of the current position, in `[0, 1)`
    pub fn fraction(&self) -> f64 {
        self.frac as f64 / self.denom as f64
    }

    /// Reduced `(input, output)` rate pair
    pub fn ratio_terms(&self) -> (u64, u64) {
        (self.numer, self.denom)
    }

    /// Move to the next output instant
    pub fn advance(&mut self) {
        self.index += self.step_int;
        self.frac += self.step_frac;
        if self.frac >= self.denom {
            self.frac -= self.denom;
            self.index += 1;
        }
    }

    /// Number of output instants, starting at the current one, whose
    /// position lies strictly before input sample `limit`.
    pub fn positions_before(&self, limit: u64) -> u64 {
        let here = self.index as u128 * self.denom as u128 + self.frac as u128;
        let end = limit as u128 * self.denom as u128;
        if end <= here {
            return 0;
        }
        div_ceil(end - here, self.numer as u128) as u64
    }
}

/// Compute `ceil(value * mul / div)` without intermediate overflow.
pub fn rescale_up(value: u64, mul: u64, div: u64) -> u64 {
    debug_assert!(div > 0);
    div_ceil(value as u128 * mul as u128, div as u128) as u64
}

fn div_ceil(a: u128, b: u128) -> u128 {
    (a + b - 1) / b
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_reduced() {
        let phase = PhaseAccumulator::new(44100, 48000);
        assert_eq!(phase.ratio_terms(), (147, 160));

        let phase = PhaseAccumulator::new(48000, 16000);
        assert_eq!(phase.ratio_terms(), (3, 1));
    }

    #[test]
    fn test_advance_upsample() {
        // 1:2 upsampling visits every half sample
        let mut phase = PhaseAccumulator::new(24000, 48000);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push((phase.index(), phase.fraction()));
            phase.advance();
        }
        assert_eq!(
            seen,
            vec![(0, 0.0), (0, 0.5), (1, 0.0), (1, 0.5), (2, 0.0)]
        );
    }

    #[test]
    fn test_advance_downsample() {
        let mut phase = PhaseAccumulator::new(48000, 16000);
        phase.advance();
        phase.advance();
        assert_eq!(phase.index(), 6);
        assert_eq!(phase.fraction(), 0.0);
    }

    #[test]
    fn test_no_drift_over_long_runs() {
        // After exactly one second of output the position is exactly one
        // second of input.
        let mut phase = PhaseAccumulator::new(44100, 48000);
        for _ in 0..48000 * 10 {
            phase.advance();
        }
        assert_eq!(phase.index(), 441000);
        assert_eq!(phase.fraction(), 0.0);
    }

    #[test]
    fn test_fraction_stays_in_unit_interval() {
        let mut phase = PhaseAccumulator::new(7, 13);
        for _ in 0..1000 {
            let f = phase.fraction();
            assert!((0.0..1.0).contains(&f));
            phase.advance();
        }
    }

    #[test]
    fn test_positions_before() {
        let phase = PhaseAccumulator::new(44100, 48000);
        assert_eq!(phase.positions_before(44100), 48000);
        assert_eq!(phase.positions_before(0), 0);

        let mut phase = PhaseAccumulator::new(2, 1);
        assert_eq!(phase.positions_before(5), 3); // 0, 2, 4
        phase.advance();
        assert_eq!(phase.positions_before(5), 2); // 2, 4
        assert_eq!(phase.positions_before(2), 0);
    }

    #[test]
    fn test_rescale_up() {
        assert_eq!(rescale_up(44100, 48000, 44100), 48000);
        assert_eq!(rescale_up(1, 48000, 44100), 2);
        assert_eq!(rescale_up(0, 48000, 44100), 0);
        assert_eq!(rescale_up(u64::MAX, 2, 2), u64::MAX);
    }
}
