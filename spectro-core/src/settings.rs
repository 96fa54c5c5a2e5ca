//! Startup settings
//!
//! Both [`Settings`](struct.Settings.html) and [`Limits`](struct.Limits.html) are read once,
//! either from `ezconf` via `from_config` or built in code, and then handed to the
//! components by value.
use crate::analyzer::WindowKind;
use crate::error;
use crate::render::{ColorScheme, Scale};
use std::{fmt, str};

/// Orientation of the assembled image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Frequency runs left to right, time top to bottom
    Vertical,
    /// Frequency runs bottom to top, time left to right
    Horizontal,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        })
    }
}

impl str::FromStr for Orientation {
    type Err = error::Error;

    fn from_str(name: &str) -> error::Result<Orientation> {
        match name {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            _ => error::invalid(format!("unknown orientation {:?}", name)),
        }
    }
}

/// Bounds for every user tunable value
#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    pub size_min: usize,
    pub size_max: usize,
    pub overlap_min: f32,
    pub overlap_max: f32,
    pub log_min: f32,
    pub log_max: f32,
    pub linear_min: f32,
    pub linear_max: f32,
    /// Amount a controller command moves floor or ceiling by
    pub magnitude_step: f32,
    /// Amount a controller command moves the overlap by
    pub overlap_step: f32,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            size_min: 8,
            size_max: 32768,
            overlap_min: 0.0,
            overlap_max: 0.95,
            log_min: -120.0,
            log_max: 120.0,
            linear_min: 0.0,
            linear_max: 10000.0,
            magnitude_step: 5.0,
            overlap_step: 0.05,
        }
    }
}

impl Limits {
    /// Read limits from the `limits.*` config keys
    pub fn from_config() -> Limits {
        let d = Limits::default();
        let c = &crate::CONFIG;
        Limits {
            size_min: c.get_or("limits.size_min", d.size_min),
            size_max: c.get_or("limits.size_max", d.size_max),
            overlap_min: c.get_or("limits.overlap_min", d.overlap_min),
            overlap_max: c.get_or("limits.overlap_max", d.overlap_max),
            log_min: c.get_or("limits.log_min", d.log_min),
            log_max: c.get_or("limits.log_max", d.log_max),
            linear_min: c.get_or("limits.linear_min", d.linear_min),
            linear_max: c.get_or("limits.linear_max", d.linear_max),
            magnitude_step: c.get_or("limits.magnitude_step", d.magnitude_step),
            overlap_step: c.get_or("limits.overlap_step", d.overlap_step),
        }
    }

    /// Range floor and ceiling must lie in for `scale`
    pub fn magnitude_range(&self, scale: Scale) -> (f32, f32) {
        match scale {
            Scale::Logarithmic => (self.log_min, self.log_max),
            Scale::Linear => (self.linear_min, self.linear_max),
        }
    }

    pub fn check_size(&self, size: usize) -> error::Result<()> {
        if !size.is_power_of_two() || size < self.size_min || size > self.size_max {
            return error::invalid(format!(
                "transform size {} must be a power of two in {}..={}",
                size, self.size_min, self.size_max
            ));
        }
        Ok(())
    }

    pub fn check_overlap(&self, overlap: f32) -> error::Result<()> {
        // overlap of 1.0 would never advance the window
        if !(overlap >= self.overlap_min && overlap <= self.overlap_max && overlap < 1.0) {
            return error::invalid(format!(
                "overlap {} must be in {}..={}",
                overlap, self.overlap_min, self.overlap_max
            ));
        }
        Ok(())
    }

    pub fn check_magnitudes(&self, scale: Scale, floor: f32, ceiling: f32) -> error::Result<()> {
        let (min, max) = self.magnitude_range(scale);
        if !(floor < ceiling) {
            return error::invalid(format!(
                "magnitude floor {} must be below ceiling {}",
                floor, ceiling
            ));
        }
        if floor < min || ceiling > max {
            return error::invalid(format!(
                "{} magnitude range {}..{} exceeds {}..={}",
                scale, floor, ceiling, min, max
            ));
        }
        Ok(())
    }
}

/// Initial settings of a spectrogram session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Sample-rate of the source, only used for frequency readouts
    pub rate: usize,
    pub size: usize,
    pub window: WindowKind,
    pub overlap: f32,
    pub floor: f32,
    pub ceiling: f32,
    pub scale: Scale,
    pub colors: ColorScheme,
    pub width: usize,
    pub height: usize,
    pub orientation: Orientation,
    /// Number of terminal cells a live row is drawn with
    pub columns: usize,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            rate: 24000,
            size: 1024,
            window: WindowKind::Hanning,
            overlap: 0.5,
            floor: 0.0,
            ceiling: 50.0,
            scale: Scale::Logarithmic,
            colors: ColorScheme::Heat,
            width: 640,
            height: 480,
            orientation: Orientation::Vertical,
            columns: 80,
        }
    }
}

impl Settings {
    /// Read settings from config, falling back to the defaults
    pub fn from_config() -> error::Result<Settings> {
        let d = Settings::default();
        let c = &crate::CONFIG;
        Ok(Settings {
            rate: c.get_or("audio.rate", d.rate),
            size: c.get_or("fourier.length", d.size),
            window: c
                .get_or("fourier.window", d.window.to_string())
                .parse()?,
            overlap: c.get_or("fourier.overlap", d.overlap),
            floor: c.get_or("render.floor", d.floor),
            ceiling: c.get_or("render.ceiling", d.ceiling),
            scale: c.get_or("render.scale", d.scale.to_string()).parse()?,
            colors: c.get_or("render.colors", d.colors.to_string()).parse()?,
            width: c.get_or("image.width", d.width),
            height: c.get_or("image.height", d.height),
            orientation: c
                .get_or("image.orientation", d.orientation.to_string())
                .parse()?,
            columns: c.get_or("live.columns", d.columns),
        })
    }

    /// Check the whole set against `limits`
    pub fn validate(&self, limits: &Limits) -> error::Result<()> {
        limits.check_size(self.size)?;
        limits.check_overlap(self.overlap)?;
        limits.check_magnitudes(self.scale, self.floor, self.ceiling)?;
        if self.width == 0 || self.height == 0 {
            return error::invalid("image dimensions must not be zero");
        }
        if self.rate == 0 {
            return error::invalid("sample-rate must not be zero");
        }
        Ok(())
    }
}

/// Number of new samples per transform for a window of `size` at `overlap`
pub fn hop_size(size: usize, overlap: f32) -> usize {
    let kept = (size as f64 * overlap as f64) as usize;
    size.saturating_sub(kept).max(1)
}
