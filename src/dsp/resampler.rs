use super::history::HistoryBuffer;
use super::kernel::FilterKernel;
use super::phase::{rescale_up, PhaseAccumulator};
use crate::error::{ResampleError, Result};
use crate::types::ResamplerConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    /// Flushed; buffers still allocated
    Closed,
    /// Buffers freed
    Released,
}

/// Streaming windowed-sinc sample-rate converter for mono `f32` audio.
///
/// Feed arbitrary-length chunks to [`Converter::convert`] and concatenate
/// the returned chunks in call order. Output lags input by
/// [`Converter::half_width`] input samples; an empty chunk (or
/// [`Converter::flush`]) drains the remainder and closes the converter.
#[derive(Debug)]
pub struct Converter {
    /// Input sample rate
    input_rate: u32,
    /// Output sample rate
    output_rate: u32,
    kernel: FilterKernel,
    phase: PhaseAccumulator,
    history: HistoryBuffer,
    state: State,
    /// Input samples received, excluding flush padding
    samples_in: u64,
    /// Output samples produced
    samples_out: u64,
}

impl Converter {
    /// Create a converter with the default kernel
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        Self::with_config(input_rate, output_rate, ResamplerConfig::default())
    }

    /// Create a converter with explicit kernel parameters
    pub fn with_config(input_rate: u32, output_rate: u32, config: ResamplerConfig) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(ResampleError::InvalidRate {
                input: input_rate,
                output: output_rate,
            });
        }
        config.validate()?;

        let kernel = FilterKernel::new(input_rate, output_rate, &config);
        let history = HistoryBuffer::new(kernel.half_width() - 1);

        log::debug!(
            "Converter {} Hz -> {} Hz: half-width {}, {} sub-phases, cut-off {:.4} cycles/sample",
            input_rate,
            output_rate,
            kernel.half_width(),
            kernel.sub_phases(),
            kernel.cutoff()
        );

        Ok(Self {
            input_rate,
            output_rate,
            kernel,
            phase: PhaseAccumulator::new(input_rate, output_rate),
            history,
            state: State::Open,
            samples_in: 0,
            samples_out: 0,
        })
    }

    /// Convert a chunk of input samples.
    ///
    /// Returns every output sample whose input window is now complete.
    /// An empty chunk flushes: the converter pads its history with
    /// silence, returns the trailing samples and closes.
    pub fn convert(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        if self.state != State::Open {
            return Err(ResampleError::ClosedConverter);
        }

        if samples.is_empty() {
            return Ok(self.finish());
        }

        self.history.push(samples);
        self.samples_in += samples.len() as u64;
        Ok(self.drain())
    }

    /// Drain the remaining output and close the converter
    pub fn flush(&mut self) -> Result<Vec<f32>> {
        self.convert(&[])
    }

    /// Free internal buffers. Safe to call any number of times; further
    /// conversions fail with [`ResampleError::ClosedConverter`].
    pub fn release(&mut self) {
        if self.state == State::Released {
            return;
        }
        self.history.release();
        self.state = State::Released;
        log::debug!(
            "Converter {} Hz -> {} Hz released after {} in / {} out",
            self.input_rate,
            self.output_rate,
            self.samples_in,
            self.samples_out
        );
    }

    /// Input sample rate in Hz
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Output sample rate in Hz
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Kernel half-width in input samples
    pub fn half_width(&self) -> usize {
        self.kernel.half_width()
    }

    pub fn is_closed(&self) -> bool {
        self.state != State::Open
    }

    /// Delivered input samples not yet passed by the read position
    pub fn delay(&self) -> u64 {
        self.samples_in.saturating_sub(self.phase.index())
    }

    /// Inherent filter delay
    pub fn latency(&self) -> Duration {
        Duration::from_secs_f64(self.kernel.half_width() as f64 / self.input_rate as f64)
    }

    /// Upper bound on the output of one `convert` call with `input_len`
    /// samples (or of a flush, with `input_len == 0`).
    pub fn max_output_len(&self, input_len: usize) -> usize {
        rescale_up(
            self.delay() + input_len as u64,
            self.output_rate as u64,
            self.input_rate as u64,
        ) as usize
    }

    /// Input samples received so far
    pub fn samples_in(&self) -> u64 {
        self.samples_in
    }

    /// Output samples produced so far
    pub fn samples_out(&self) -> u64 {
        self.samples_out
    }

    /// Emit every output whose window lies inside the history
    fn drain(&mut self) -> Vec<f32> {
        let mut output = Vec::with_capacity(self.max_output_len(0));
        let width = self.kernel.taps_per_row();

        // The history's leading zeros make the window for read index `n`
        // start at absolute index `n`.
        while let Some(window) = self.history.window(self.phase.index(), width) {
            output.push(self.kernel.evaluate(window, self.phase.fraction()));
            self.phase.advance();
        }

        self.history.discard_before(self.phase.index());
        self.samples_out += output.len() as u64;
        output
    }

    fn finish(&mut self) -> Vec<f32> {
        self.history.push_zeros(self.kernel.half_width());
        let output = self.drain();
        self.state = State::Closed;

        log::debug!(
            "Converter {} Hz -> {} Hz flushed {} trailing samples ({} in / {} out)",
            self.input_rate,
            self.output_rate,
            output.len(),
            self.samples_in,
            self.samples_out
        );
        output
    }
}

impl Drop for Converter {
    fn drop(&mut self) {
        self.release();
    }
}
