//! Fourier Analysis
use super::Sample;
use crate::analyzer::{self, WindowKind};
use crate::error;
use crate::settings::Limits;

/// Builder for FourierAnalyzer
#[derive(Debug, Default)]
pub struct FourierBuilder {
    /// Length of the fourier transform
    ///
    /// Must be a power of two within the configured limits.
    pub length: Option<usize>,

    /// Window Function
    pub window: Option<WindowKind>,

    /// Rate of the analyzed samples, only used for the frequency span of the output
    pub rate: Option<usize>,

    /// Bounds for `length`
    pub limits: Option<Limits>,
}

impl FourierBuilder {
    /// Create a new FourierBuilder
    pub fn new() -> FourierBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn length(&mut self, length: usize) -> &mut FourierBuilder {
        self.length = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, window: WindowKind) -> &mut FourierBuilder {
        self.window = Some(window);
        self
    }

    /// Set the sample-rate
    pub fn rate(&mut self, rate: usize) -> &mut FourierBuilder {
        self.rate = Some(rate);
        self
    }

    /// Set the bounds the transform length is checked against
    pub fn limits(&mut self, limits: Limits) -> &mut FourierBuilder {
        self.limits = Some(limits);
        self
    }

    /// Plan the fourier transform and prepare buffers
    pub fn plan(&mut self) -> error::Result<FourierAnalyzer> {
        FourierAnalyzer::new(
            self.length.unwrap_or(1024),
            self.window.unwrap_or(WindowKind::Hanning),
            self.rate.unwrap_or(24000),
            self.limits.clone().unwrap_or_default(),
        )
    }
}

/// Real-valued magnitude transform
///
/// # Example
/// ```
/// # use spectro_core::analyzer::*;
/// let mut analyzer = FourierBuilder::new()
///     .length(8)
///     .window(WindowKind::Rectangular)
///     .plan()
///     .unwrap();
///
/// let mut spectrum = analyzer.spectrum();
/// analyzer.compute(&mut spectrum, &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
/// assert!(spectrum.iter().all(|m| (m - 1.0).abs() < 1e-6));
/// ```
pub struct FourierAnalyzer {
    length: usize,
    kind: WindowKind,
    window: Vec<Sample>,
    rate: usize,
    limits: Limits,

    fft: std::sync::Arc<dyn rustfft::FFT<Sample>>,

    input: Vec<rustfft::num_complex::Complex<Sample>>,
    output: Vec<rustfft::num_complex::Complex<Sample>>,
}

impl std::fmt::Debug for FourierAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FourierAnalyzer {{ length: {:?}, window: {:?}, rate: {:?} }}",
            self.length, self.kind, self.rate,
        )
    }
}

impl FourierAnalyzer {
    fn new(
        length: usize,
        kind: WindowKind,
        rate: usize,
        limits: Limits,
    ) -> error::Result<FourierAnalyzer> {
        limits.check_size(length)?;

        let mut fa = FourierAnalyzer {
            length,
            kind,
            window: Vec::new(),
            rate,
            limits,
            fft: rustfft::FFTplanner::new(false).plan_fft(length),
            input: Vec::new(),
            output: Vec::new(),
        };
        fa.replan(length);

        Ok(fa)
    }

    fn replan(&mut self, length: usize) {
        use rustfft::num_traits::Zero;

        if length != self.length {
            self.fft = rustfft::FFTplanner::new(false).plan_fft(length);
        }
        self.length = length;
        self.window = self.kind.coefficients(length);
        self.input = vec![rustfft::num_complex::Complex::zero(); length];
        self.output = vec![rustfft::num_complex::Complex::zero(); length];

        log::debug!("FourierAnalyzer({:p}):", self);
        log::debug!("    Fourier Length      = {:8}", length);
        log::debug!("    Buckets             = {:8}", self.buckets());
        log::debug!("    Window              = {:>8}", self.kind);
        log::debug!("    Highest Frequency   = {:8.3} Hz", self.highest());
    }

    /// Transform length in samples
    #[inline]
    pub fn size(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn window_function(&self) -> WindowKind {
        self.kind
    }

    /// Number of magnitudes produced per transform, DC and Nyquist included
    #[inline]
    pub fn buckets(&self) -> usize {
        self.length / 2 + 1
    }

    /// Frequency of the Nyquist bucket
    #[inline]
    pub fn highest(&self) -> analyzer::Frequency {
        self.rate as analyzer::Frequency / 2.0
    }

    /// Window coefficients currently applied
    pub fn coefficients(&self) -> &[Sample] {
        &self.window
    }

    /// Allocate a spectrum matching the current transform length
    pub fn spectrum(&self) -> analyzer::Spectrum {
        analyzer::Spectrum::for_transform(self.length, self.rate)
    }

    /// Change the transform length
    ///
    /// Fails and keeps the previous length if `length` is not a power of two within the limits.
    /// Buffers sized for the old length have to be replaced by the caller.
    pub fn set_size(&mut self, length: usize) -> error::Result<()> {
        self.limits.check_size(length)?;
        self.replan(length);
        Ok(())
    }

    /// Change the window function, keeping the length
    pub fn set_window_function(&mut self, kind: WindowKind) {
        self.kind = kind;
        self.window = kind.coefficients(self.length);
    }

    /// Compute the magnitude spectrum of `input`
    ///
    /// `input` must hold exactly `size()` samples.  `output` is resized to `buckets()` if it
    /// does not match.
    pub fn compute(&mut self, output: &mut analyzer::Spectrum, input: &[Sample]) -> error::Result<()> {
        if input.len() != self.length {
            return Err(error::Error::BufferOverrun {
                chunk: input.len(),
                capacity: self.length,
            });
        }

        if output.len() != self.buckets() {
            output.reset(self.buckets(), 0.0, self.highest());
        }

        for ((c, s), w) in self.input.iter_mut().zip(input.iter()).zip(self.window.iter()) {
            *c = rustfft::num_complex::Complex::new(s * w, 0.0);
        }

        self.fft.process(&mut self.input, &mut self.output);

        for (m, o) in output.iter_mut().zip(self.output.iter()) {
            *m = o.norm();
        }

        Ok(())
    }
}
