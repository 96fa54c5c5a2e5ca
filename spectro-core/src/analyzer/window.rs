//! Window functions
//!
//! A window-function in this case takes a size and returns a `Vec` of that length filled
//! with the precomputed window coefficients.  The following are available:
//!
//! * [Rectangular](fn.rectangular.html)
//!
//! ![Rectangle Window](https://upload.wikimedia.org/wikipedia/commons/thumb/6/6a/Window_function_and_frequency_response_-_Rectangular.svg/512px-Window_function_and_frequency_response_-_Rectangular.svg.png)
//! * [Hanning](fn.hanning.html)
//!
//! ![Hanning Window](https://upload.wikimedia.org/wikipedia/commons/thumb/b/b3/Window_function_and_frequency_response_-_Hann.svg/512px-Window_function_and_frequency_response_-_Hann.svg.png)
//! * [Hamming](fn.hamming.html)
//!
//! ![Hamming Window](https://upload.wikimedia.org/wikipedia/commons/thumb/7/76/Window_function_and_frequency_response_-_Hamming_%28alpha_%3D_0.53836%29.svg/512px-Window_function_and_frequency_response_-_Hamming_%28alpha_%3D_0.53836%29.svg.png)
use crate::analyzer::Sample;
use crate::error;
use std::{fmt, str};

/// No window function / Rectangle window
pub fn rectangular(size: usize) -> Vec<Sample> {
    vec![1.0; size]
}

/// Hanning Window
pub fn hanning(size: usize) -> Vec<Sample> {
    if size < 2 {
        return rectangular(size);
    }
    apodize::hanning_iter(size).map(|f| f as Sample).collect()
}

/// Hamming Window
///
/// Uses the classic `0.54 / 0.46` coefficients instead of the optimal `alpha = 0.53836`
/// variant `apodize` ships.
pub fn hamming(size: usize) -> Vec<Sample> {
    if size < 2 {
        return rectangular(size);
    }
    let n = (size - 1) as f64;
    (0..size)
        .map(|i| (0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / n).cos()) as Sample)
        .collect()
}

/// Selectable window kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Rectangular,
    Hanning,
    Hamming,
}

impl WindowKind {
    pub const ALL: [WindowKind; 3] = [
        WindowKind::Hanning,
        WindowKind::Hamming,
        WindowKind::Rectangular,
    ];

    /// Generate the coefficients of this window for `size` samples
    pub fn coefficients(self, size: usize) -> Vec<Sample> {
        self.function()(size)
    }

    pub fn function(self) -> fn(usize) -> Vec<Sample> {
        match self {
            WindowKind::Rectangular => rectangular,
            WindowKind::Hanning => hanning,
            WindowKind::Hamming => hamming,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hanning => "hanning",
            WindowKind::Hamming => "hamming",
        }
    }

    /// The kind following this one, wrapping around
    pub fn next(self) -> WindowKind {
        let i = WindowKind::ALL.iter().position(|k| *k == self).unwrap_or(0);
        WindowKind::ALL[(i + 1) % WindowKind::ALL.len()]
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl str::FromStr for WindowKind {
    type Err = error::Error;

    fn from_str(name: &str) -> error::Result<WindowKind> {
        match name {
            "rectangular" => Ok(WindowKind::Rectangular),
            "hanning" => Ok(WindowKind::Hanning),
            "hamming" => Ok(WindowKind::Hamming),
            _ => error::invalid(format!("unknown window function {:?}", name)),
        }
    }
}
