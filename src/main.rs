use anyhow::{Context, Result};
use byteorder::{ByteOrder, NativeEndian, WriteBytesExt};
use clap::{Parser, ValueEnum};
use mono_resample::dsp::{convert_all, signal};
use mono_resample::{Converter, PipelineConfig, ResamplerConfig, SpectrumAnalyzer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Convert mono 32-bit float audio between sample rates
#[derive(Parser, Debug)]
#[command(name = "mono-resample", version, about)]
struct Args {
    /// Input sample rate in Hz
    #[arg(long, default_value_t = 44_100)]
    in_rate: u32,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    out_rate: u32,

    /// Raw native-endian f32 input file. A test tone is generated when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Raw native-endian f32 output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Samples per chunk fed to the converter
    #[arg(long, default_value_t = 1024)]
    chunk_size: usize,

    /// Frequency of the generated test tone in Hz
    #[arg(long, default_value_t = 440.0)]
    tone: f32,

    /// Length of the generated test tone in seconds
    #[arg(long, default_value_t = 1.0)]
    duration: f32,

    /// Kernel quality preset
    #[arg(long, value_enum, default_value_t = Quality::Default)]
    quality: Quality,

    /// Report the dominant frequency of the output
    #[arg(long)]
    analyze: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Quality {
    Fast,
    Default,
    High,
}

impl Quality {
    fn config(self) -> ResamplerConfig {
        match self {
            Quality::Fast => ResamplerConfig::fast(),
            Quality::Default => ResamplerConfig::default(),
            Quality::High => ResamplerConfig::high_quality(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    log::info!("mono-resample v{} starting...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("Conversion failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let converter = Converter::with_config(args.in_rate, args.out_rate, args.quality.config())
        .context("failed to create converter")?;
    log::info!(
        "Converting {} Hz -> {} Hz, latency {:?}",
        args.in_rate,
        args.out_rate,
        converter.latency()
    );

    let samples = match &args.input {
        Some(path) => read_samples(path)?,
        None => {
            let len = (args.in_rate as f32 * args.duration).max(0.0) as usize;
            signal::tone(len, args.in_rate, &[(args.tone, 1.0)])
        }
    };

    let pipeline = PipelineConfig {
        chunk_size: args.chunk_size,
        ..PipelineConfig::default()
    };
    let (output, stats) = convert_all(converter, &samples, &pipeline)?;
    log::debug!("{:?}", stats);

    println!("in samples: {}, out samples: {}", samples.len(), output.len());

    if args.analyze {
        analyze(&output, args.out_rate);
    }

    if let Some(path) = &args.output {
        write_samples(path, &output)?;
        log::info!("Wrote {} samples to {}", output.len(), path.display());
    }

    Ok(())
}

/// Print the spectral peak of the middle of the output
fn analyze(output: &[f32], sample_rate: u32) {
    if output.len() < 256 {
        log::warn!("Output too short to analyze ({} samples)", output.len());
        return;
    }

    let mut size = 256;
    while size * 2 <= output.len() && size < 65536 {
        size *= 2;
    }
    let start = (output.len() - size) / 2;

    let mut analyzer = SpectrumAnalyzer::new(size, sample_rate);
    let spectrum = analyzer.process(&output[start..start + size]);
    let (freq, db) = analyzer.peak(&spectrum);
    println!("output peak: {:.1} Hz at {:.1} dB", freq, db);
}

/// Read a raw native-endian f32 file
fn read_samples(path: &Path) -> Result<Vec<f32>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let whole = bytes.len() / 4 * 4;
    if whole != bytes.len() {
        log::warn!(
            "{} has {} trailing bytes, ignoring them",
            path.display(),
            bytes.len() - whole
        );
    }

    let mut samples = vec![0.0f32; whole / 4];
    NativeEndian::read_f32_into(&bytes[..whole], &mut samples);
    Ok(samples)
}

/// Write samples as a raw native-endian f32 file
fn write_samples(path: &Path, samples: &[f32]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for &sample in samples {
        writer.write_f32::<NativeEndian>(sample)?;
    }
    writer.flush()?;
    Ok(())
}
