//! Spectrogram rendering in Rust.
//!
//! Audio samples go in, rows of pixels come out.  Every chunk of samples is shifted into a
//! sliding window, transformed into a magnitude spectrum and rendered into one row of colors.
//! The stages run on their own threads and talk through [`Queue`](queue/struct.Queue.html)s.
//!
//! # Example
//! ```rust
//! use spectro_core::{pipeline, queue, recorder, settings};
//!
//! // Initialize the logger.  Take a look at the sources if you want to customize
//! // the logger.
//! # /*
//! spectro_core::default_log();
//! # */
//!
//! let settings = settings::Settings {
//!     size: 512,
//!     width: 128,
//!     ..Default::default()
//! };
//! let stage = pipeline::Pipeline::new(
//!     &settings,
//!     settings::Limits::default(),
//!     pipeline::Mode::Streaming,
//! )
//! .unwrap();
//!
//! let samples = queue::Queue::new();
//! let rows = queue::Queue::new();
//!
//! // The recorder thread pushes chunks, the stage thread turns them into rows
//! let source = recorder::MemoryRecorder::new(vec![0.5; 4096], settings.rate);
//! recorder::spawn_feeder(Box::new(source), stage.clone(), samples.clone());
//! stage.spawn(samples, rows.clone());
//!
//! // Settings can be changed at any time from any thread
//! stage.set_color_scheme("grayscale".parse().unwrap());
//!
//! let mut n = 0;
//! while let Some(row) = rows.pop() {
//!     assert_eq!(row.len(), 128);
//!     n += 1;
//! }
//! assert_eq!(n, 4096 / 256);
//! ```
pub mod analyzer;
pub mod batch;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod queue;
pub mod recorder;
pub mod render;
pub mod settings;
pub mod sink;

#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::pipeline::Pipeline;
#[doc(inline)]
pub use crate::queue::Queue;

/// `ezconf` configuration
///
/// Usually you will call [`default_config`](fn.default_config.html) in the beginning
/// which will populate this object.  It is only read while building the startup
/// [`Settings`](settings/struct.Settings.html) and [`Limits`](settings/struct.Limits.html).
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Initialize config from default sources
///
/// The default sources are:
/// * `./spectrogram.toml`
/// * `./config/spectrogram.toml`
/// * Defaults from code
pub fn default_config() {
    CONFIG
        .init(
            [
                ezconf::Source::File("spectrogram.toml"),
                ezconf::Source::File("config/spectrogram.toml"),
            ]
            .iter(),
        )
        .expect("Can't load config");
}

/// Initialize logger
///
/// By default, enable debug output in debug-builds.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    color_backtrace::install();
}
