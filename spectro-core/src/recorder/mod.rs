//! Sample sources
#[cfg(feature = "cpalrecord")]
pub mod cpal;

pub mod wav;

use crate::analyzer::Sample;
use crate::error;
use crate::pipeline::Pipeline;
use crate::queue::Queue;
use std::thread;

pub trait Recorder: Send + std::fmt::Debug {
    /// Sample-rate of the delivered samples
    fn rate(&self) -> usize;

    /// Read up to `count` mono samples
    ///
    /// Blocks until `count` samples are available or the stream ends.  An empty chunk marks
    /// the end of the stream.
    fn read(&mut self, count: usize) -> error::Result<Vec<Sample>>;
}

/// Recorder replaying samples from memory
#[derive(Debug, Clone)]
pub struct MemoryRecorder {
    samples: Vec<Sample>,
    position: usize,
    rate: usize,
}

impl MemoryRecorder {
    pub fn new(samples: Vec<Sample>, rate: usize) -> MemoryRecorder {
        MemoryRecorder {
            samples,
            position: 0,
            rate,
        }
    }
}

impl Recorder for MemoryRecorder {
    fn rate(&self) -> usize {
        self.rate
    }

    fn read(&mut self, count: usize) -> error::Result<Vec<Sample>> {
        let end = (self.position + count).min(self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;
        Ok(chunk)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecorderBuilder {
    pub path: Option<std::path::PathBuf>,
    pub recorder: Option<String>,
}

impl RecorderBuilder {
    pub fn new() -> RecorderBuilder {
        Default::default()
    }

    /// Decode samples from a waveform file instead of capturing them
    pub fn path<P: Into<std::path::PathBuf>>(&mut self, path: P) -> &mut RecorderBuilder {
        self.path = Some(path.into());
        self
    }

    pub fn recorder<S: Into<String>>(&mut self, rec: S) -> &mut RecorderBuilder {
        self.recorder = Some(rec.into());
        self
    }

    pub fn build(&mut self) -> error::Result<Box<dyn Recorder>> {
        if let Some(ref path) = self.path {
            return Ok(Box::new(wav::WavRecorder::open(path)?));
        }

        let recorder = self
            .recorder
            .clone()
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.recorder", "cpal".to_string()));

        match &*recorder {
            #[cfg(feature = "cpalrecord")]
            "cpal" => Ok(Box::new(self::cpal::CPalRecorder::new()?)),

            _ => error::invalid(format!("recorder {:?} is not available", recorder)),
        }
    }
}

/// Read chunks sized by `pipeline` from `recorder` into `output`
///
/// Stops at the end of the stream or when `output` was closed, and closes `output` on the way
/// out.  Returns the number of chunks pushed.
pub fn feed(
    recorder: &mut dyn Recorder,
    pipeline: &Pipeline,
    output: &Queue<Vec<Sample>>,
) -> error::Result<usize> {
    let mut chunks = 0;
    let res = loop {
        if output.is_closed() {
            break Ok(chunks);
        }

        let count = pipeline.read_size(chunks == 0);
        let chunk = match recorder.read(count) {
            Ok(c) => c,
            Err(e) => break Err(e),
        };
        if chunk.is_empty() {
            log::debug!("End of stream after {} chunks", chunks);
            break Ok(chunks);
        }

        if !output.push(chunk) {
            break Ok(chunks);
        }
        chunks += 1;
    };

    output.close();
    res
}

/// Run [`feed`](fn.feed.html) on its own thread
pub fn spawn_feeder(
    mut recorder: Box<dyn Recorder>,
    pipeline: Pipeline,
    output: Queue<Vec<Sample>>,
) -> thread::JoinHandle<error::Result<usize>> {
    thread::Builder::new()
        .name("recorder".into())
        .spawn(move || {
            let res = feed(&mut *recorder, &pipeline, &output);
            if let Err(ref e) = res {
                log::error!("Recorder failed: {}", e);
            }
            res
        })
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Mode;
    use crate::settings::{Limits, Settings};

    #[test]
    fn test_memory() {
        let mut rec = MemoryRecorder::new((0..10).map(|i| i as Sample).collect(), 8000);
        assert_eq!(rec.read(4).unwrap(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(rec.read(4).unwrap().len(), 4);
        assert_eq!(rec.read(4).unwrap(), &[8.0, 9.0]);
        assert!(rec.read(4).unwrap().is_empty());
    }

    #[test]
    fn test_feed_batch_sizes() {
        let pipeline = Pipeline::new(&Settings::default(), Limits::default(), Mode::Batch).unwrap();
        let mut rec = MemoryRecorder::new(vec![0.0; 1024 + 512 + 100], 24000);
        let q = Queue::new();

        assert_eq!(feed(&mut rec, &pipeline, &q).unwrap(), 3);
        assert!(q.is_closed());
        let sizes = std::iter::from_fn(|| q.pop()).map(|c| c.len()).collect::<Vec<_>>();
        assert_eq!(sizes, &[1024, 512, 100]);
    }

    #[test]
    fn test_feed_stops_on_close() {
        let pipeline =
            Pipeline::new(&Settings::default(), Limits::default(), Mode::Streaming).unwrap();
        let mut rec = MemoryRecorder::new(vec![0.0; 4096], 24000);
        let q = Queue::new();
        q.close();
        assert_eq!(feed(&mut rec, &pipeline, &q).unwrap(), 0);
    }

    #[test]
    fn test_builder_missing_file() {
        assert!(RecorderBuilder::new()
            .path("/nonexistent/input.wav")
            .build()
            .is_err());
    }
}
