use spectro_core::{batch, display, pipeline, recorder, settings, sink, Queue};
use std::io::BufRead;
use std::{thread, time};

const USAGE: &str = "\
Interactive Usage: spectrogram
 Audio File Usage: spectrogram <audio file input> <image file output>

Settings are read from spectrogram.toml or config/spectrogram.toml.

Interactive control, one command per line on stdin:
    q           - Quit
    s           - Show current settings
    f <column>  - Show the frequency of a column
    c           - Cycle color scheme
    w           - Cycle window function
    l           - Toggle logarithmic/linear magnitude
    - / =       - Decrease/increase minimum magnitude
    [ / ]       - Decrease/increase maximum magnitude
    < / >       - Decrease/increase transform size
    v / ^       - Decrease/increase overlap
";

fn main() {
    spectro_core::default_config();
    spectro_core::default_log();

    let args = std::env::args().collect::<Vec<_>>();
    let res = match args.len() {
        1 => live(),
        3 => audiofile(&args[1], &args[2]),
        _ => {
            eprint!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = res {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn startup() -> spectro_core::Result<(settings::Settings, settings::Limits)> {
    let settings = settings::Settings::from_config()?;
    let limits = settings::Limits::from_config();
    settings.validate(&limits)?;
    Ok((settings, limits))
}

fn audiofile(input: &str, output: &str) -> spectro_core::Result<()> {
    let (settings, limits) = startup()?;

    let start = time::Instant::now();
    let rows = batch::convert(input, output, &settings, limits)?;
    log::info!("{} rows in {:?}", rows, start.elapsed());

    Ok(())
}

fn spawn_controls() -> Queue<String> {
    let commands = Queue::new();
    {
        let commands = commands.clone();
        thread::Builder::new()
            .name("controls".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(l) => {
                            if !commands.push(l.trim().to_string()) {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                commands.close();
            })
            .unwrap();
    }
    commands
}

/// Handle one control line, returns false on quit
fn control(stage: &pipeline::Pipeline, line: &str) -> bool {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (None, _) => (),
        (Some("q"), _) => return false,
        (Some("s"), _) => log::info!("{:?}", stage.settings()),
        (Some("f"), Some(column)) => match column.parse::<usize>() {
            Ok(x) => log::info!("Column {}: {:.1} Hz", x, stage.pixel_to_hz(x)),
            Err(e) => log::warn!("Bad column {:?}: {}", column, e),
        },
        (Some(key), _) => match key.parse::<pipeline::Command>() {
            // rejections are logged by the stage
            Ok(command) => {
                stage.apply(command).ok();
            }
            Err(e) => log::warn!("{}", e),
        },
    }
    true
}

fn live() -> spectro_core::Result<()> {
    let (mut settings, limits) = startup()?;

    let recorder = recorder::RecorderBuilder::new().build()?;
    settings.rate = recorder.rate();
    let stage = pipeline::Pipeline::new(&settings, limits, pipeline::Mode::Streaming)?;

    let samples = Queue::new();
    let rows = Queue::new();
    let feeder = recorder::spawn_feeder(recorder, stage.clone(), samples.clone());
    let worker = stage.spawn(samples.clone(), rows.clone());
    let commands = spawn_controls();

    let mut scrollback = display::Scrollback::new(settings.width, settings.height);

    'main: loop {
        rows.wait(time::Duration::from_millis(30));
        while let Some(row) = rows.try_pop() {
            println!("{}", display::ansi_line(&row, settings.columns));
            scrollback.push(row);
        }
        if rows.is_closed() && rows.is_empty() {
            break;
        }

        while let Some(line) = commands.try_pop() {
            if !control(&stage, &line) {
                break 'main;
            }
        }
    }

    samples.close();
    rows.close();
    commands.close();

    let join = |h: thread::JoinHandle<spectro_core::Result<usize>>| {
        h.join().unwrap_or_else(|e| std::panic::resume_unwind(e))
    };
    let rendered = join(worker)?;
    join(feeder)?;
    log::info!("Rendered {} rows", rendered);

    let snapshot = spectro_core::CONFIG.get_or("live.snapshot", String::new());
    if !snapshot.is_empty() && !scrollback.is_empty() {
        let mut image = sink::ImageSink::new(snapshot, settings.width, settings.orientation);
        scrollback.snapshot(&mut image)?;
        image.write()?;
    }

    Ok(())
}
