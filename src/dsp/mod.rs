pub mod fft;
pub mod history;
pub mod kernel;
pub mod phase;
pub mod resampler;
pub mod signal;
pub mod thread;

// Re-export commonly used types
pub use fft::SpectrumAnalyzer;
pub use history::HistoryBuffer;
pub use kernel::FilterKernel;
pub use phase::PhaseAccumulator;
pub use resampler::Converter;
pub use thread::{convert_all, start_convert_thread, ConvertStats};
