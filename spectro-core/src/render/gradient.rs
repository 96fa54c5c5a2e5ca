//! Color gradients
use crate::error;
use std::{fmt, str};

/// Packed `0xAARRGGBB` color
pub type Pixel = u32;

pub const OPAQUE: Pixel = 0xff00_0000;

#[inline]
pub fn pack(r: u8, g: u8, b: u8) -> Pixel {
    OPAQUE | (r as Pixel) << 16 | (g as Pixel) << 8 | b as Pixel
}

/// Split a packed color into `[r, g, b, a]`
#[inline]
pub fn unpack(p: Pixel) -> [u8; 4] {
    [(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8]
}

const HEAT: &[(f32, [u8; 3])] = &[
    (0.0, [0, 0, 0]),
    (1.0 / 3.0, [255, 0, 0]),
    (2.0 / 3.0, [255, 255, 0]),
    (1.0, [255, 255, 255]),
];

const BLUE: &[(f32, [u8; 3])] = &[(0.0, [0, 0, 0]), (0.5, [0, 0, 255]), (1.0, [255, 255, 255])];

const GRAYSCALE: &[(f32, [u8; 3])] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

/// Named color gradients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    /// black, red, yellow, white
    Heat,
    /// black, blue, white
    Blue,
    /// black, white
    Grayscale,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [ColorScheme::Heat, ColorScheme::Blue, ColorScheme::Grayscale];

    fn stops(self) -> &'static [(f32, [u8; 3])] {
        match self {
            ColorScheme::Heat => HEAT,
            ColorScheme::Blue => BLUE,
            ColorScheme::Grayscale => GRAYSCALE,
        }
    }

    /// Color at position `t` of the gradient
    ///
    /// `t` is clamped to `0.0..=1.0`, the result is fully opaque.
    pub fn color(self, t: f32) -> Pixel {
        let t = if t.is_nan() { 0.0 } else { t.max(0.0).min(1.0) };
        let stops = self.stops();

        let upper = stops
            .iter()
            .position(|(p, _)| *p >= t)
            .unwrap_or(stops.len() - 1)
            .max(1);
        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];

        let f = ((t - p0) / (p1 - p0)).max(0.0).min(1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;

        pack(lerp(c0[0], c1[0]), lerp(c0[1], c1[1]), lerp(c0[2], c1[2]))
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Heat => "heat",
            ColorScheme::Blue => "blue",
            ColorScheme::Grayscale => "grayscale",
        }
    }

    pub fn next(self) -> ColorScheme {
        let i = ColorScheme::ALL.iter().position(|c| *c == self).unwrap_or(0);
        ColorScheme::ALL[(i + 1) % ColorScheme::ALL.len()]
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl str::FromStr for ColorScheme {
    type Err = error::Error;

    fn from_str(name: &str) -> error::Result<ColorScheme> {
        match name {
            "heat" => Ok(ColorScheme::Heat),
            "blue" => Ok(ColorScheme::Blue),
            "grayscale" => Ok(ColorScheme::Grayscale),
            _ => error::invalid(format!("unknown color scheme {:?}", name)),
        }
    }
}
