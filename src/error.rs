use thiserror::Error;

/// Errors returned by the converter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    /// Either sample rate is zero
    #[error("invalid sample rate: input {input} Hz, output {output} Hz")]
    InvalidRate { input: u32, output: u32 },

    /// The converter was flushed or released and accepts no more input
    #[error("converter is closed")]
    ClosedConverter,

    /// Kernel parameters rejected by validation
    #[error("invalid resampler configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ResampleError>;
