//! Image output
use crate::error;
use crate::render::{unpack, Pixel};
use crate::settings::Orientation;
use std::path;

/// Collects pixel rows and writes them as one image
///
/// Rows stack top to bottom in the order they were appended.  With a horizontal orientation
/// the assembled image is rotated by 90° counter-clockwise, so time runs left to right and
/// low frequencies end up at the bottom.
#[derive(Debug, Clone)]
pub struct ImageSink {
    path: path::PathBuf,
    width: usize,
    orientation: Orientation,
    pixels: Vec<Pixel>,
}

impl ImageSink {
    pub fn new<P: Into<path::PathBuf>>(path: P, width: usize, orientation: Orientation) -> ImageSink {
        ImageSink {
            path: path.into(),
            width,
            orientation,
            pixels: Vec::new(),
        }
    }

    /// Append one row
    ///
    /// Rows of the wrong width would shear the image and are rejected.
    pub fn append(&mut self, row: &[Pixel]) -> error::Result<()> {
        if row.len() != self.width {
            return error::invalid(format!(
                "row of {} pixels does not fit an image {} pixels wide",
                row.len(),
                self.width
            ));
        }
        self.pixels.extend_from_slice(row);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.pixels.len() / self.width
        }
    }

    /// Assemble the rows into an image in the final orientation
    pub fn to_image(&self) -> image::RgbaImage {
        let raw = self
            .pixels
            .iter()
            .flat_map(|p| unpack(*p).to_vec())
            .collect::<Vec<u8>>();

        let img = image::RgbaImage::from_raw(self.width as u32, self.rows() as u32, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width as u32, self.rows() as u32));

        match self.orientation {
            Orientation::Vertical => img,
            Orientation::Horizontal => image::imageops::rotate270(&img),
        }
    }

    /// Encode the image, the format follows the file extension
    pub fn write(&self) -> error::Result<()> {
        if self.rows() == 0 {
            return error::invalid("no rows to write");
        }
        let img = self.to_image();
        img.save(&self.path)?;

        log::info!(
            "Wrote {}x{} image to {}",
            img.width(),
            img.height(),
            self.path.display()
        );
        Ok(())
    }
}
