//! Streaming sample-rate conversion for mono `f32` audio.
//!
//! A [`Converter`] combines three parts:
//!
//! - `PhaseAccumulator`: exact rational read position into the input
//! - `HistoryBuffer`: input carried across calls so chunk boundaries are seamless
//! - `FilterKernel`: Kaiser-windowed sinc table, cut off below the lower Nyquist
//!
//! # Example
//!
//! ```rust
//! use mono_resample::Converter;
//!
//! let mut converter = Converter::new(44100, 48000)?;
//!
//! let input = vec![0.0f32; 44100];
//! let mut output = converter.convert(&input)?;
//! output.extend(converter.flush()?);
//!
//! assert!((output.len() as i64 - 48000).abs() <= 1);
//! # Ok::<(), mono_resample::ResampleError>(())
//! ```

pub mod dsp;
pub mod error;
pub mod types;

pub use dsp::{Converter, SpectrumAnalyzer};
pub use error::{ResampleError, Result};
pub use types::{PipelineConfig, ResamplerConfig};
