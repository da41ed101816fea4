use crate::error::{ResampleError, Result};

/// Half-width above which construction logs a warning
const LARGE_HALF_WIDTH: usize = 1024;

/// Filter kernel configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResamplerConfig {
    /// Taps on each side of the target position at ratio 1.
    /// Scaled up by the decimation factor when downsampling.
    pub half_width: usize,
    /// Number of fractional positions stored in the tap table
    pub sub_phases: usize,
    /// Cut-off as a fraction of the lower Nyquist frequency
    pub rolloff: f64,
    /// Kaiser window shape parameter
    pub kaiser_beta: f64,
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self {
            half_width: 32,
            sub_phases: 256,
            rolloff: 0.95,
            kaiser_beta: 8.0, // ~80 dB stop band
        }
    }
}

impl ResamplerConfig {
    /// Short kernel, low latency
    pub fn fast() -> Self {
        Self {
            half_width: 8,
            sub_phases: 64,
            ..Self::default()
        }
    }

    /// Long kernel, steep transition band
    pub fn high_quality() -> Self {
        Self {
            half_width: 64,
            sub_phases: 512,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.half_width == 0 {
            return Err(ResampleError::InvalidConfig(
                "half_width must be at least 1".to_string(),
            ));
        }

        if self.sub_phases == 0 {
            return Err(ResampleError::InvalidConfig(
                "sub_phases must be at least 1".to_string(),
            ));
        }

        if !(self.rolloff > 0.0 && self.rolloff <= 1.0) {
            return Err(ResampleError::InvalidConfig(format!(
                "rolloff {} is outside (0, 1]",
                self.rolloff
            )));
        }

        if !self.kaiser_beta.is_finite() || self.kaiser_beta < 0.0 {
            return Err(ResampleError::InvalidConfig(format!(
                "kaiser_beta {} must be finite and non-negative",
                self.kaiser_beta
            )));
        }

        if self.half_width > LARGE_HALF_WIDTH {
            log::warn!(
                "Kernel half-width {} is unusually large, conversion will be slow",
                self.half_width
            );
        }

        Ok(())
    }
}

/// Conversion worker configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Samples per chunk fed to the converter
    pub chunk_size: usize,
    /// Bound of the input and output channels, in chunks
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            channel_capacity: 64,
        }
    }
}
