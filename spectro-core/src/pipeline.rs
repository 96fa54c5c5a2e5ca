//! Spectrogram pipeline stage
//!
//! The [`Pipeline`](struct.Pipeline.html) owns the sliding sample window, the fourier analyzer
//! and the renderer.  It pops sample chunks from one queue and pushes one pixel row per chunk
//! to another.  Every clone of a `Pipeline` is a handle to the same stage, so a controller
//! thread can change settings while another thread runs the loop.
//!
//! All settings and buffers sit behind a single lock.  The loop only holds it while a chunk
//! is processed, never while it waits for the next chunk, so setting changes apply immediately
//! and can never land in the middle of a computation.
use crate::analyzer::{self, Sample, SampleWindow, WindowKind};
use crate::error;
use crate::queue::Queue;
use crate::render::{self, ColorScheme, Pixel, RenderSettings, Scale};
use crate::settings::{self, Limits, Settings};
use std::{str, sync, thread};

/// How the sliding window advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Live input: the window advances by whatever chunk length arrives
    Streaming,
    /// Finite input: the window advances by one hop, short reads are zero-padded
    Batch,
}

/// Setting change requests of an interactive control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CycleColors,
    CycleWindow,
    ToggleScale,
    FloorDown,
    FloorUp,
    CeilingDown,
    CeilingUp,
    SizeDown,
    SizeUp,
    OverlapDown,
    OverlapUp,
}

impl str::FromStr for Command {
    type Err = error::Error;

    /// Parse the key a command is bound to
    fn from_str(key: &str) -> error::Result<Command> {
        match key {
            "c" => Ok(Command::CycleColors),
            "w" => Ok(Command::CycleWindow),
            "l" => Ok(Command::ToggleScale),
            "-" => Ok(Command::FloorDown),
            "=" => Ok(Command::FloorUp),
            "[" => Ok(Command::CeilingDown),
            "]" => Ok(Command::CeilingUp),
            "<" => Ok(Command::SizeDown),
            ">" => Ok(Command::SizeUp),
            "v" => Ok(Command::OverlapDown),
            "^" => Ok(Command::OverlapUp),
            _ => error::invalid(format!("no command bound to {:?}", key)),
        }
    }
}

/// Consistent view of all tunables, taken under one lock
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub size: usize,
    pub window: WindowKind,
    pub overlap: f32,
    pub hop: usize,
    pub render: RenderSettings,
    pub width: usize,
    pub rate: usize,
}

#[derive(Debug)]
struct Stage {
    mode: Mode,
    window: SampleWindow,
    analyzer: analyzer::FourierAnalyzer,
    spectrum: analyzer::Spectrum,
    renderer: render::Renderer,
    overlap: f32,
    width: usize,
    rate: usize,
    limits: Limits,
    /// Idle until the first chunk was shifted in
    primed: bool,
    /// Largest transform size this stage ever ran with
    largest: usize,
}

impl Stage {
    fn process(&mut self, chunk: &[Sample]) -> error::Result<Vec<Pixel>> {
        match self.mode {
            Mode::Streaming => {
                let capacity = self.window.len();
                if chunk.len() > capacity && chunk.len() <= self.largest {
                    // Read before the window shrank, only the newest samples still fit
                    log::debug!(
                        "Stale chunk of {} samples, keeping the newest {}",
                        chunk.len(),
                        capacity
                    );
                    self.window.advance(&chunk[chunk.len() - capacity..])?;
                } else {
                    self.window.advance(chunk)?;
                }
            }
            Mode::Batch => {
                self.window
                    .advance_overlapped(chunk, self.overlap, !self.primed)?
            }
        }
        self.primed = true;

        self.analyzer
            .compute(&mut self.spectrum, self.window.as_slice())?;

        let mut row = vec![0; self.width];
        self.renderer.render(&mut row, &self.spectrum);
        Ok(row)
    }

    fn hop(&self) -> usize {
        settings::hop_size(self.analyzer.size(), self.overlap)
    }

    fn set_size(&mut self, size: usize) -> error::Result<()> {
        self.analyzer.set_size(size)?;
        // Swap in buffers of the new length together with the new plan
        self.window.resize(size);
        self.spectrum = self.analyzer.spectrum();
        self.largest = self.largest.max(size);
        Ok(())
    }

    fn set_magnitudes(&mut self, floor: f32, ceiling: f32) -> error::Result<()> {
        self.limits
            .check_magnitudes(self.renderer.settings.scale, floor, ceiling)?;
        self.renderer.settings.floor = floor;
        self.renderer.settings.ceiling = ceiling;
        Ok(())
    }

    fn toggle_scale(&mut self) {
        let s = &mut self.renderer.settings;
        let scale = s.scale.toggled();
        let (min, max) = self.limits.magnitude_range(scale);

        let floor = s.floor.max(min).min(max);
        let ceiling = s.ceiling.max(min).min(max);
        if floor < ceiling {
            s.floor = floor;
            s.ceiling = ceiling;
        } else {
            s.floor = min;
            s.ceiling = max;
        }
        s.scale = scale;
    }

    fn apply(&mut self, command: Command) -> error::Result<()> {
        let step = self.limits.magnitude_step;
        let (floor, ceiling) = (self.renderer.settings.floor, self.renderer.settings.ceiling);

        match command {
            Command::CycleColors => {
                self.renderer.settings.colors = self.renderer.settings.colors.next();
                Ok(())
            }
            Command::CycleWindow => {
                let next = self.analyzer.window_function().next();
                self.analyzer.set_window_function(next);
                Ok(())
            }
            Command::ToggleScale => {
                self.toggle_scale();
                Ok(())
            }
            Command::FloorDown => self.set_magnitudes(floor - step, ceiling),
            Command::FloorUp => self.set_magnitudes(floor + step, ceiling),
            Command::CeilingDown => self.set_magnitudes(floor, ceiling - step),
            Command::CeilingUp => self.set_magnitudes(floor, ceiling + step),
            Command::SizeDown => self.set_size(self.analyzer.size() / 2),
            Command::SizeUp => self.set_size(self.analyzer.size() * 2),
            Command::OverlapDown => self.set_overlap(self.overlap - self.limits.overlap_step),
            Command::OverlapUp => self.set_overlap(self.overlap + self.limits.overlap_step),
        }
    }

    fn set_overlap(&mut self, overlap: f32) -> error::Result<()> {
        // Snap to the step grid so repeated steps do not accumulate rounding errors
        let overlap = (overlap * 1000.0).round() / 1000.0;
        self.limits.check_overlap(overlap)?;
        self.overlap = overlap;
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.analyzer.size(),
            window: self.analyzer.window_function(),
            overlap: self.overlap,
            hop: self.hop(),
            render: self.renderer.settings,
            width: self.width,
            rate: self.rate,
        }
    }
}

/// Handle to a spectrogram stage
#[derive(Debug, Clone)]
pub struct Pipeline {
    stage: sync::Arc<parking_lot::Mutex<Stage>>,
}

impl Pipeline {
    /// Create a stage from validated startup settings
    pub fn new(settings: &Settings, limits: Limits, mode: Mode) -> error::Result<Pipeline> {
        settings.validate(&limits)?;

        let analyzer = analyzer::FourierBuilder::new()
            .length(settings.size)
            .window(settings.window)
            .rate(settings.rate)
            .limits(limits.clone())
            .plan()?;

        let stage = Stage {
            mode,
            window: SampleWindow::new(settings.size),
            spectrum: analyzer.spectrum(),
            analyzer,
            renderer: render::Renderer::new(RenderSettings {
                floor: settings.floor,
                ceiling: settings.ceiling,
                scale: settings.scale,
                colors: settings.colors,
            }),
            overlap: settings.overlap,
            width: settings.width,
            rate: settings.rate,
            limits,
            primed: false,
            largest: settings.size,
        };

        log::debug!("Pipeline:");
        log::debug!("    Mode                = {:?}", mode);
        log::debug!("    Row Width           = {:8}", stage.width);
        log::debug!("    Overlap             = {:8.3}", stage.overlap);
        log::debug!("    Hop                 = {:8}", stage.hop());

        Ok(Pipeline {
            stage: sync::Arc::new(parking_lot::Mutex::new(stage)),
        })
    }

    /// Shift one chunk in and render the resulting row
    pub fn process(&self, chunk: &[Sample]) -> error::Result<Vec<Pixel>> {
        self.stage.lock().process(chunk)
    }

    /// Run the stage until `input` is closed and drained
    ///
    /// Closes `output` when done, also when a chunk could not be processed.  Returns the number
    /// of rows emitted.
    pub fn run(&self, input: &Queue<Vec<Sample>>, output: &Queue<Vec<Pixel>>) -> error::Result<usize> {
        let res = self.run_inner(input, output);
        output.close();
        if let Err(ref e) = res {
            log::error!("Spectrogram stage failed: {}", e);
            input.close();
        }
        res
    }

    fn run_inner(&self, input: &Queue<Vec<Sample>>, output: &Queue<Vec<Pixel>>) -> error::Result<usize> {
        let mut rows = 0;

        // Wait outside of the lock so setters never block on the source
        while let Some(chunk) = input.pop() {
            let mut stage = self.stage.lock();
            let row = stage.process(&chunk)?;
            output.push(row);
            drop(stage);

            rows += 1;
            log::trace!("Row {:6} from {} samples", rows, chunk.len());
        }

        log::debug!("Input closed after {} rows", rows);
        Ok(rows)
    }

    /// Run the stage on its own thread
    pub fn spawn(
        &self,
        input: Queue<Vec<Sample>>,
        output: Queue<Vec<Pixel>>,
    ) -> thread::JoinHandle<error::Result<usize>> {
        let stage = self.clone();
        thread::Builder::new()
            .name("spectrogram".into())
            .spawn(move || stage.run(&input, &output))
            .unwrap()
    }

    /// Number of samples the source should deliver next
    ///
    /// A priming read in batch mode fills the whole window; every other read is one hop.
    pub fn read_size(&self, priming: bool) -> usize {
        let stage = self.stage.lock();
        match (stage.mode, priming) {
            (Mode::Batch, true) => stage.analyzer.size(),
            _ => stage.hop(),
        }
    }

    pub fn settings(&self) -> Snapshot {
        self.stage.lock().snapshot()
    }

    pub fn render_settings(&self) -> RenderSettings {
        self.stage.lock().renderer.settings
    }

    /// Frequency shown in column `x` of a row
    pub fn pixel_to_hz(&self, x: usize) -> analyzer::Frequency {
        let stage = self.stage.lock();
        let bucket = stage.spectrum.bucket_for(x, stage.width);
        stage.spectrum.id_to_freq(bucket)
    }

    /// Apply a controller command
    ///
    /// A rejected command leaves all settings untouched.
    pub fn apply(&self, command: Command) -> error::Result<()> {
        let mut stage = self.stage.lock();
        let res = stage.apply(command);
        match res {
            Ok(()) => log::info!("{:?}: {:?}", command, stage.snapshot()),
            Err(ref e) => log::warn!("{:?} rejected: {}", command, e),
        }
        res
    }

    pub fn transform_size(&self) -> usize {
        self.stage.lock().analyzer.size()
    }

    /// Change the transform length
    ///
    /// The sample window is replaced by a zeroed one of the new length in the same critical
    /// section, so no computation ever sees a window of the wrong length.
    pub fn set_transform_size(&self, size: usize) -> error::Result<()> {
        self.stage.lock().set_size(size)
    }

    pub fn window_function(&self) -> WindowKind {
        self.stage.lock().analyzer.window_function()
    }

    pub fn set_window_function(&self, kind: WindowKind) {
        self.stage.lock().analyzer.set_window_function(kind)
    }

    pub fn magnitude_floor(&self) -> f32 {
        self.stage.lock().renderer.settings.floor
    }

    pub fn set_magnitude_floor(&self, floor: f32) -> error::Result<()> {
        let mut stage = self.stage.lock();
        let ceiling = stage.renderer.settings.ceiling;
        stage.set_magnitudes(floor, ceiling)
    }

    pub fn magnitude_ceiling(&self) -> f32 {
        self.stage.lock().renderer.settings.ceiling
    }

    pub fn set_magnitude_ceiling(&self, ceiling: f32) -> error::Result<()> {
        let mut stage = self.stage.lock();
        let floor = stage.renderer.settings.floor;
        stage.set_magnitudes(floor, ceiling)
    }

    pub fn scale(&self) -> Scale {
        self.stage.lock().renderer.settings.scale
    }

    /// Change the magnitude scale
    ///
    /// Fails if the current floor and ceiling are out of range for `scale`.
    pub fn set_scale(&self, scale: Scale) -> error::Result<()> {
        let mut stage = self.stage.lock();
        let s = stage.renderer.settings;
        stage.limits.check_magnitudes(scale, s.floor, s.ceiling)?;
        stage.renderer.settings.scale = scale;
        Ok(())
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.stage.lock().renderer.settings.colors
    }

    pub fn set_color_scheme(&self, colors: ColorScheme) {
        self.stage.lock().renderer.settings.colors = colors;
    }

    pub fn overlap(&self) -> f32 {
        self.stage.lock().overlap
    }

    pub fn set_overlap(&self, overlap: f32) -> error::Result<()> {
        self.stage.lock().set_overlap(overlap)
    }
}
