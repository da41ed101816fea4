use super::Converter;
use crate::error::ResampleError;
use crate::types::PipelineConfig;
use anyhow::anyhow;
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Totals reported by a finished conversion thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Chunks received, including a terminating empty chunk
    pub chunks: u64,
    pub samples_in: u64,
    pub samples_out: u64,
}

/// Start the conversion thread.
///
/// Input chunks arrive on `chunks_rx`; converted output goes to
/// `output_tx`. An empty chunk or a disconnected input channel flushes the
/// converter and ends the thread. Raising `shutdown` ends it without
/// flushing.
pub fn start_convert_thread(
    mut converter: Converter,
    chunks_rx: Receiver<Vec<f32>>,
    output_tx: Sender<Vec<f32>>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<Result<ConvertStats, ResampleError>> {
    thread::spawn(move || {
        log::info!(
            "Conversion thread started ({} Hz -> {} Hz)",
            converter.input_rate(),
            converter.output_rate()
        );

        let mut chunks = 0u64;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                log::info!("Conversion thread shutting down");
                break;
            }

            match chunks_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(chunk) => {
                    chunks += 1;
                    let last = chunk.is_empty();
                    let output = converter.convert(&chunk)?;

                    if !send_output(&output_tx, output) || last {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("Input channel disconnected, flushing");
                    let output = converter.flush()?;
                    send_output(&output_tx, output);
                    break;
                }
            }
        }

        let stats = ConvertStats {
            chunks,
            samples_in: converter.samples_in(),
            samples_out: converter.samples_out(),
        };
        converter.release();

        log::info!(
            "Conversion thread stopped: {} chunks, {} samples in, {} samples out",
            stats.chunks,
            stats.samples_in,
            stats.samples_out
        );
        Ok(stats)
    })
}

/// Convert a whole buffer through the conversion thread, chunk by chunk
pub fn convert_all(
    converter: Converter,
    samples: &[f32],
    config: &PipelineConfig,
) -> anyhow::Result<(Vec<f32>, ConvertStats)> {
    let (chunks_tx, chunks_rx) = crossbeam::channel::bounded::<Vec<f32>>(config.channel_capacity);
    let (output_tx, output_rx) = crossbeam::channel::bounded::<Vec<f32>>(config.channel_capacity);
    let shutdown = Arc::new(AtomicBool::new(false));

    let worker = start_convert_thread(converter, chunks_rx, output_tx, shutdown);
    let chunk_size = config.chunk_size.max(1);

    let output = crossbeam::thread::scope(|s| {
        s.spawn(move |_| {
            for chunk in samples.chunks(chunk_size) {
                if chunks_tx.send(chunk.to_vec()).is_err() {
                    break;
                }
            }
            // Dropping the sender makes the worker flush
        });

        output_rx.iter().flatten().collect::<Vec<f32>>()
    })
    .map_err(|_| anyhow!("chunk feeder panicked"))?;

    let stats = worker
        .join()
        .map_err(|_| anyhow!("conversion thread panicked"))??;

    Ok((output, stats))
}

/// Forward converted samples; returns false once the receiver is gone
fn send_output(tx: &Sender<Vec<f32>>, samples: Vec<f32>) -> bool {
    if samples.is_empty() {
        return true;
    }
    if tx.send(samples).is_err() {
        log::warn!("Output receiver dropped, stopping conversion");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::signal::white_noise;

    fn direct(in_rate: u32, out_rate: u32, input: &[f32]) -> Vec<f32> {
        let mut converter = Converter::new(in_rate, out_rate).unwrap();
        let mut output = converter.convert(input).unwrap();
        output.extend(converter.flush().unwrap());
        output
    }

    #[test]
    fn test_convert_all_matches_direct_conversion() {
        let input = white_noise(5000, 0.5, 1);
        let config = PipelineConfig {
            chunk_size: 256,
            channel_capacity: 2,
        };

        let converter = Converter::new(44100, 48000).unwrap();
        let (output, stats) = convert_all(converter, &input, &config).unwrap();

        assert_eq!(output, direct(44100, 48000, &input));
        assert_eq!(stats.chunks, 20);
        assert_eq!(stats.samples_in, 5000);
        assert_eq!(stats.samples_out, output.len() as u64);
    }

    #[test]
    fn test_convert_all_empty_input() {
        let converter = Converter::new(16000, 8000).unwrap();
        let (output, stats) = convert_all(converter, &[], &PipelineConfig::default()).unwrap();

        assert!(output.is_empty());
        assert_eq!(stats, ConvertStats::default());
    }

    #[test]
    fn test_empty_chunk_flushes_and_stops() {
        let (chunks_tx, chunks_rx) = crossbeam::channel::unbounded();
        let (output_tx, output_rx) = crossbeam::channel::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let converter = Converter::new(48000, 48000).unwrap();
        let handle = start_convert_thread(converter, chunks_rx, output_tx, shutdown);

        chunks_tx.send(vec![0.25; 100]).unwrap();
        chunks_tx.send(Vec::new()).unwrap();

        let stats = handle.join().unwrap().unwrap();
        let output: Vec<f32> = output_rx.iter().flatten().collect();

        assert_eq!(stats.chunks, 2);
        assert_eq!(output.len(), 100);
        // Sender still alive, but the thread has finished
        assert!(chunks_tx.send(vec![1.0]).is_err());
    }

    #[test]
    fn test_shutdown_stops_without_flush() {
        let (_chunks_tx, chunks_rx) = crossbeam::channel::unbounded::<Vec<f32>>();
        let (output_tx, output_rx) = crossbeam::channel::unbounded();
        let shutdown = Arc::new(AtomicBool::new(true));

        let converter = Converter::new(44100, 16000).unwrap();
        let stats = start_convert_thread(converter, chunks_rx, output_tx, shutdown)
            .join()
            .unwrap()
            .unwrap();

        assert_eq!(stats.chunks, 0);
        assert!(output_rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_converter_error_is_returned() {
        let (chunks_tx, chunks_rx) = crossbeam::channel::unbounded();
        let (output_tx, _output_rx) = crossbeam::channel::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut converter = Converter::new(44100, 48000).unwrap();
        converter.flush().unwrap();

        chunks_tx.send(vec![0.0; 10]).unwrap();
        let result = start_convert_thread(converter, chunks_rx, output_tx, shutdown)
            .join()
            .unwrap();

        assert_eq!(result, Err(ResampleError::ClosedConverter));
    }
}
