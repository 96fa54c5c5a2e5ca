//! Whole-file conversion
use crate::error;
use crate::pipeline::{Mode, Pipeline};
use crate::queue::Queue;
use crate::recorder::{self, Recorder};
use crate::settings::{Limits, Settings};
use crate::sink::ImageSink;
use std::{path, thread};

fn join<T>(handle: thread::JoinHandle<T>) -> T {
    handle
        .join()
        .unwrap_or_else(|e| std::panic::resume_unwind(e))
}

/// Render everything `recorder` delivers into `sink`
///
/// Runs the recorder and the spectrogram stage on their own threads and collects the rows on
/// the calling thread.  Returns the number of rows appended.
pub fn render(
    recorder: Box<dyn Recorder>,
    settings: &Settings,
    limits: Limits,
    sink: &mut ImageSink,
) -> error::Result<usize> {
    let settings = Settings {
        rate: recorder.rate(),
        ..settings.clone()
    };
    let pipeline = Pipeline::new(&settings, limits, Mode::Batch)?;

    let samples = Queue::new();
    let rows = Queue::new();

    let feeder = recorder::spawn_feeder(recorder, pipeline.clone(), samples.clone());
    let stage = pipeline.spawn(samples.clone(), rows.clone());

    let mut appended = 0;
    let mut failed = None;
    while let Some(row) = rows.pop() {
        if failed.is_some() {
            continue;
        }
        match sink.append(&row) {
            Ok(()) => appended += 1,
            Err(e) => {
                // Stop the source, the stage drains and closes `rows`
                samples.close();
                failed = Some(e);
            }
        }
    }

    let chunks = join(feeder)?;
    let rendered = join(stage)?;
    if let Some(e) = failed {
        return Err(e);
    }
    log::debug!(
        "Converted {} chunks into {} rows ({} appended)",
        chunks,
        rendered,
        appended
    );

    Ok(appended)
}

/// Convert the waveform file at `input` into the image `output`
pub fn convert<P: AsRef<path::Path>, Q: AsRef<path::Path>>(
    input: P,
    output: Q,
    settings: &Settings,
    limits: Limits,
) -> error::Result<usize> {
    let recorder = recorder::RecorderBuilder::new()
        .path(input.as_ref())
        .build()?;
    let mut sink = ImageSink::new(output.as_ref(), settings.width, settings.orientation);

    let rows = render(recorder, settings, limits, &mut sink)?;
    sink.write()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::MemoryRecorder;
    use crate::settings::Orientation;

    #[test]
    fn test_overlap_rows() {
        let settings = Settings {
            size: 1024,
            overlap: 0.5,
            width: 64,
            ..Default::default()
        };

        for (len, rows) in [(1024 + 512, 2), (1024, 1), (1024 + 513, 3), (100, 1), (0, 0)]
            .iter()
            .cloned()
        {
            println!("Samples: {:5}, expected rows: {}", len, rows);
            let rec = Box::new(MemoryRecorder::new(vec![0.1; len], 24000));
            let mut sink = ImageSink::new("unused.png", 64, Orientation::Vertical);
            assert_eq!(render(rec, &settings, Limits::default(), &mut sink).unwrap(), rows);
            assert_eq!(sink.rows(), rows);
        }
    }

    #[test]
    fn test_width_mismatch_stops() {
        let settings = Settings {
            width: 64,
            ..Default::default()
        };
        let rec = Box::new(MemoryRecorder::new(vec![0.0; 100_000], 24000));
        let mut sink = ImageSink::new("unused.png", 32, Orientation::Vertical);
        assert!(render(rec, &settings, Limits::default(), &mut sink).is_err());
    }
}
