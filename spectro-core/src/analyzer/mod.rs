pub mod fourier;
pub mod samples;
pub mod spectrum;
pub mod window;

pub use self::fourier::{FourierAnalyzer, FourierBuilder};
pub use self::samples::{Sample, SampleWindow};
pub use self::spectrum::{Frequency, SignalStrength, Spectrum};
pub use self::window::WindowKind;
