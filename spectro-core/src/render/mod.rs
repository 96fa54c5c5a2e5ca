//! Spectrum to pixel row rendering
pub mod gradient;

pub use self::gradient::{pack, unpack, ColorScheme, Pixel};

use crate::analyzer;
use crate::error;
use std::{fmt, str};

/// Floor for magnitudes before taking the logarithm
const EPSILON: analyzer::SignalStrength = 1e-12;

/// Magnitude scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    /// Decibels, `20 * log10(m)`
    Logarithmic,
}

impl Scale {
    pub fn apply(self, m: analyzer::SignalStrength) -> f32 {
        match self {
            Scale::Linear => m,
            Scale::Logarithmic => 20.0 * m.max(EPSILON).log10(),
        }
    }

    pub fn toggled(self) -> Scale {
        match self {
            Scale::Linear => Scale::Logarithmic,
            Scale::Logarithmic => Scale::Linear,
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Scale::Linear => "linear",
            Scale::Logarithmic => "logarithmic",
        })
    }
}

impl str::FromStr for Scale {
    type Err = error::Error;

    fn from_str(name: &str) -> error::Result<Scale> {
        match name {
            "linear" => Ok(Scale::Linear),
            "logarithmic" => Ok(Scale::Logarithmic),
            _ => error::invalid(format!("unknown magnitude scale {:?}", name)),
        }
    }
}

/// The group of settings a row is rendered with
///
/// Validation of `floor < ceiling` happens where settings are changed, the renderer trusts
/// whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub floor: f32,
    pub ceiling: f32,
    pub scale: Scale,
    pub colors: ColorScheme,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Renderer {
        Renderer { settings }
    }

    /// Normalized position of magnitude `m` between floor and ceiling
    pub fn level(&self, m: analyzer::SignalStrength) -> f32 {
        let s = &self.settings;
        let v = s.scale.apply(m);
        let t = (v - s.floor) / (s.ceiling - s.floor);
        if t.is_nan() {
            0.0
        } else {
            t.max(0.0).min(1.0)
        }
    }

    /// Render `spectrum` into `row`, one nearest bucket per pixel
    pub fn render(&self, row: &mut [Pixel], spectrum: &analyzer::Spectrum) {
        let width = row.len();
        if spectrum.is_empty() {
            for p in row.iter_mut() {
                *p = self.settings.colors.color(0.0);
            }
            return;
        }

        for (x, p) in row.iter_mut().enumerate() {
            let m = spectrum[spectrum.bucket_for(x, width)];
            *p = self.settings.colors.color(self.level(m));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grayscale_linear() -> Renderer {
        Renderer::new(RenderSettings {
            floor: 0.0,
            ceiling: 50.0,
            scale: Scale::Linear,
            colors: ColorScheme::Grayscale,
        })
    }

    #[test]
    fn test_floor_ceiling() {
        let r = grayscale_linear();
        let mut spectrum = analyzer::Spectrum::new(3, 0.0, 1.0);
        spectrum[0] = 0.0;
        spectrum[1] = 50.0;
        spectrum[2] = 5000.0;

        let mut row = vec![0; 3];
        r.render(&mut row, &spectrum);

        assert_eq!(row, &[pack(0, 0, 0), pack(255, 255, 255), pack(255, 255, 255)]);
    }

    #[test]
    fn test_monotonic_magnitude() {
        for scale in [Scale::Linear, Scale::Logarithmic].iter().cloned() {
            for colors in ColorScheme::ALL.iter().cloned() {
                let r = Renderer::new(RenderSettings {
                    floor: 0.0,
                    ceiling: 50.0,
                    scale,
                    colors,
                });
                let mut last = 0u32;
                for i in 0..2000 {
                    let m = i as f32 * 0.05;
                    let rgba = unpack(colors.color(r.level(m)));
                    let brightness = rgba[0] as u32 + rgba[1] as u32 + rgba[2] as u32;
                    assert!(brightness >= last, "{} {} at {}", scale, colors, m);
                    last = brightness;
                }
            }
        }
    }

    #[test]
    fn test_log_zero() {
        let r = Renderer::new(RenderSettings {
            floor: -20.0,
            ceiling: 20.0,
            scale: Scale::Logarithmic,
            colors: ColorScheme::Grayscale,
        });
        assert_eq!(r.level(0.0), 0.0);
        assert!((r.level(1.0) - 0.5).abs() < 1e-6);
        assert_eq!(r.level(100.0), 1.0);
    }

    #[test]
    fn test_width_mapping() {
        let r = grayscale_linear();
        let mut spectrum = analyzer::Spectrum::new(5, 0.0, 1.0);
        for i in 0..5 {
            spectrum[i] = i as f32 * 12.5;
        }

        let mut row = vec![0; 640];
        r.render(&mut row, &spectrum);
        assert_eq!(row[0], pack(0, 0, 0));
        assert_eq!(row[639], pack(255, 255, 255));

        let mut row = vec![0; 2];
        r.render(&mut row, &spectrum);
        assert_eq!(row, &[pack(0, 0, 0), pack(255, 255, 255)]);
    }

    #[test]
    fn test_scale_names() {
        assert_eq!("linear".parse::<Scale>().unwrap(), Scale::Linear);
        assert_eq!(Scale::Linear.toggled(), Scale::Logarithmic);
        assert!("heat".parse::<Scale>().is_err());
    }
}
