use spectro_core::analyzer::WindowKind;
use spectro_core::pipeline::{Command, Mode, Pipeline};
use spectro_core::recorder::{self, MemoryRecorder};
use spectro_core::render::{unpack, ColorScheme, Scale};
use spectro_core::settings::{Limits, Orientation, Settings};
use spectro_core::{batch, sink, Queue};
use std::thread;

fn linear_gray(size: usize, width: usize) -> Settings {
    Settings {
        size,
        window: WindowKind::Rectangular,
        scale: Scale::Linear,
        colors: ColorScheme::Grayscale,
        floor: 0.0,
        ceiling: 50.0,
        width,
        ..Default::default()
    }
}

#[test]
fn round_trip_keeps_order() {
    let stage = Pipeline::new(&linear_gray(8, 5), Limits::default(), Mode::Streaming).unwrap();
    let samples = Queue::new();
    let rows = Queue::new();
    let worker = stage.spawn(samples.clone(), rows.clone());

    const K: usize = 12;
    for k in 0..K {
        // DC magnitude of a constant chunk is 8 * value = 4 * k
        samples.push(vec![k as f32 * 0.5; 8]);
    }
    samples.close();

    let received = std::iter::from_fn(|| rows.pop()).collect::<Vec<_>>();
    assert_eq!(worker.join().unwrap().unwrap(), K);
    assert_eq!(received.len(), K);

    let dc = received
        .iter()
        .map(|row| {
            assert_eq!(row.len(), 5);
            unpack(row[0])[0]
        })
        .collect::<Vec<_>>();
    println!("DC levels: {:?}", dc);
    for pair in dc.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn settings_change_while_running() {
    let stage = Pipeline::new(&linear_gray(64, 32), Limits::default(), Mode::Streaming).unwrap();
    let samples = Queue::new();
    let rows = Queue::new();
    let worker = stage.spawn(samples.clone(), rows.clone());

    let controller = {
        let stage = stage.clone();
        thread::spawn(move || {
            for i in 0..200 {
                let command = match i % 4 {
                    0 => Command::SizeUp,
                    1 => Command::CycleWindow,
                    2 => Command::SizeDown,
                    _ => Command::CycleColors,
                };
                stage.apply(command).unwrap();
                let snapshot = stage.settings();
                assert!(snapshot.size == 64 || snapshot.size == 128);
                assert!(snapshot.render.floor < snapshot.render.ceiling);
            }
        })
    };

    const K: usize = 500;
    let producer = {
        let samples = samples.clone();
        thread::spawn(move || {
            for k in 0..K {
                samples.push((0..16).map(|i| ((k * 16 + i) as f32 * 0.3).sin()).collect());
            }
            samples.close();
        })
    };

    let mut n = 0;
    while let Some(row) = rows.pop() {
        assert_eq!(row.len(), 32);
        n += 1;
    }

    controller.join().unwrap();
    producer.join().unwrap();
    assert_eq!(worker.join().unwrap().unwrap(), K);
    assert_eq!(n, K);
}

#[test]
fn size_down_with_chunks_in_flight() {
    let settings = Settings {
        overlap: 0.0,
        ..linear_gray(1024, 32)
    };
    let stage = Pipeline::new(&settings, Limits::default(), Mode::Streaming).unwrap();
    let samples = Queue::new();
    let rows = Queue::new();
    let worker = stage.spawn(samples.clone(), rows.clone());

    // The source asked for a chunk of the old size right before the change
    let hop = stage.read_size(false);
    assert_eq!(hop, 1024);
    stage.apply(Command::SizeDown).unwrap();
    stage.apply(Command::SizeDown).unwrap();
    assert_eq!(stage.transform_size(), 256);

    for _ in 0..3 {
        samples.push(vec![0.1; hop]);
    }
    samples.push(vec![0.1; stage.read_size(false)]);
    samples.close();

    let received = std::iter::from_fn(|| rows.pop()).collect::<Vec<_>>();
    assert_eq!(received.len(), 4);
    assert_eq!(worker.join().unwrap().unwrap(), 4);
    assert!(received.iter().all(|row| row.len() == 32));
}

#[test]
fn setter_does_not_wait_for_input() {
    let stage = Pipeline::new(&linear_gray(64, 32), Limits::default(), Mode::Streaming).unwrap();
    let samples: Queue<Vec<f32>> = Queue::new();
    let rows = Queue::new();
    let worker = stage.spawn(samples.clone(), rows.clone());

    // The stage is now blocked waiting for samples, settings must still be reachable
    thread::sleep(std::time::Duration::from_millis(20));
    stage.set_transform_size(256).unwrap();
    assert_eq!(stage.transform_size(), 256);

    samples.close();
    assert_eq!(worker.join().unwrap().unwrap(), 0);
    assert!(rows.is_closed());
}

#[test]
fn overrun_stops_stage() {
    let stage = Pipeline::new(&linear_gray(8, 4), Limits::default(), Mode::Streaming).unwrap();
    let samples = Queue::new();
    let rows = Queue::new();
    let worker = stage.spawn(samples.clone(), rows.clone());

    samples.push(vec![0.0; 8]);
    samples.push(vec![0.0; 9]);

    assert!(rows.pop().is_some());
    assert!(rows.pop().is_none());
    assert!(worker.join().unwrap().is_err());
    assert!(samples.is_closed());
}

#[test]
fn batch_half_overlap() {
    let settings = Settings {
        size: 1024,
        overlap: 0.5,
        width: 100,
        ..Default::default()
    };
    let source = MemoryRecorder::new(vec![0.25; 1024 + 512], 24000);
    let mut image = sink::ImageSink::new("unused.png", 100, Orientation::Horizontal);

    let rows = batch::render(Box::new(source), &settings, Limits::default(), &mut image).unwrap();
    assert_eq!(rows, 2);
    assert_eq!(image.to_image().dimensions(), (2, 100));
}

#[test]
fn batch_file_round_trip() {
    let dir = std::env::temp_dir();
    let wav = dir.join(format!("spectro-it-{}.wav", std::process::id()));
    let png = dir.join(format!("spectro-it-{}.png", std::process::id()));

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&wav, spec).unwrap();
    for i in 0..8000 {
        writer
            .write_sample((2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 8000.0).sin())
            .unwrap();
    }
    writer.finalize().unwrap();

    let settings = Settings {
        size: 256,
        overlap: 0.5,
        width: 129,
        ..Default::default()
    };
    // 256 priming, then 61 hops of 128 (the last one zero-padded)
    let rows = batch::convert(&wav, &png, &settings, Limits::default()).unwrap();
    assert_eq!(rows, 1 + (8000 - 256 + 127) / 128);

    let img = image::open(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (129, rows as u32));

    // 1 kHz sits in bucket 32 of 128, brighter than the bucket next to DC
    let row = rows as u32 / 2;
    let peak = img.get_pixel(32, row).0;
    let low = img.get_pixel(1, row).0;
    assert!(peak[0] as u32 + peak[1] as u32 > low[0] as u32 + low[1] as u32);

    std::fs::remove_file(&wav).unwrap();
    std::fs::remove_file(&png).unwrap();
}

#[test]
fn feeder_and_stage_threads() {
    let settings = linear_gray(32, 8);
    let stage = Pipeline::new(&settings, Limits::default(), Mode::Streaming).unwrap();
    let samples = Queue::new();
    let rows = Queue::new();

    let source = MemoryRecorder::new(vec![0.0; 16 * 10], 8000);
    let feeder = recorder::spawn_feeder(Box::new(source), stage.clone(), samples.clone());
    let worker = stage.spawn(samples, rows.clone());

    let n = std::iter::from_fn(|| rows.pop()).count();
    assert_eq!(feeder.join().unwrap().unwrap(), 10);
    assert_eq!(worker.join().unwrap().unwrap(), 10);
    assert_eq!(n, 10);
}
