use crate::analyzer::Sample;
use crate::error;
use crate::queue::Queue;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::thread;

/// Recorder capturing from the default input device
///
/// The cpal stream lives on its own thread, it is not `Send` on every platform.  Captured
/// blocks are mixed to mono and handed over through a queue.
#[derive(Debug)]
pub struct CPalRecorder {
    rate: usize,
    captured: Queue<Vec<Sample>>,
    pending: Vec<Sample>,
    stop: Queue<()>,
}

fn capture_error<E: std::fmt::Display>(e: E) -> error::Error {
    error::Error::Capture(e.to_string())
}

fn build_stream(captured: Queue<Vec<Sample>>) -> error::Result<(cpal::Stream, usize)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| capture_error("no input device found"))?;

    let supported = device.default_input_config().map_err(capture_error)?;
    let format = supported.sample_format();
    let config: cpal::StreamConfig = supported.config();
    let channels = config.channels.max(1) as usize;
    let rate = config.sample_rate.0 as usize;

    let err_fn = |e: cpal::StreamError| log::error!("Capture stream error: {}", e);

    let stream = match format {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                captured.push(
                    data.chunks(channels)
                        .map(|f| f.iter().sum::<f32>() / channels as f32)
                        .collect(),
                );
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                captured.push(
                    data.chunks(channels)
                        .map(|f| {
                            f.iter().map(|s| *s as f32 / 32768.0).sum::<f32>() / channels as f32
                        })
                        .collect(),
                );
            },
            err_fn,
            None,
        ),
        other => return Err(capture_error(format!("unsupported sample format {:?}", other))),
    }
    .map_err(capture_error)?;

    stream.play().map_err(capture_error)?;

    log::debug!("CPal:");
    log::debug!("    Device      = {}", device.name().unwrap_or_default());
    log::debug!("    Sample Rate = {:6}", rate);
    log::debug!("    Channels    = {:6}", channels);

    Ok((stream, rate))
}

impl CPalRecorder {
    pub fn new() -> error::Result<CPalRecorder> {
        let captured = Queue::new();
        let stop: Queue<()> = Queue::new();
        let started: Queue<error::Result<usize>> = Queue::new();

        {
            let captured = captured.clone();
            let stop = stop.clone();
            let started = started.clone();

            thread::Builder::new()
                .name("cpal-recorder".into())
                .spawn(move || match build_stream(captured.clone()) {
                    Ok((stream, rate)) => {
                        started.push(Ok(rate));
                        // Keep the stream alive until the recorder is dropped
                        while stop.pop().is_some() {}
                        drop(stream);
                        captured.close();
                    }
                    Err(e) => {
                        captured.close();
                        started.push(Err(e));
                    }
                })
                .unwrap();
        }

        let rate = started
            .pop()
            .unwrap_or_else(|| Err(capture_error("capture thread exited")))?;

        Ok(CPalRecorder {
            rate,
            captured,
            pending: Vec::new(),
            stop,
        })
    }
}

impl Drop for CPalRecorder {
    fn drop(&mut self) {
        self.stop.close();
    }
}

impl super::Recorder for CPalRecorder {
    fn rate(&self) -> usize {
        self.rate
    }

    fn read(&mut self, count: usize) -> error::Result<Vec<Sample>> {
        while self.pending.len() < count {
            match self.captured.pop() {
                Some(block) => self.pending.extend(block),
                None => break,
            }
        }

        let n = count.min(self.pending.len());
        Ok(self.pending.drain(..n).collect())
    }
}
