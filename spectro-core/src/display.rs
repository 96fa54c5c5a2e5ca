//! Live display helpers
use crate::render::{unpack, Pixel};
use std::collections;
use std::fmt::Write;

/// The newest `height` rows of a live spectrogram
///
/// Works like a scrolling texture: each new row enters at the bottom and pushes the content
/// up by one line.
#[derive(Debug, Clone)]
pub struct Scrollback {
    width: usize,
    height: usize,
    rows: collections::VecDeque<Vec<Pixel>>,
}

impl Scrollback {
    pub fn new(width: usize, height: usize) -> Scrollback {
        Scrollback {
            width,
            height,
            rows: collections::VecDeque::with_capacity(height),
        }
    }

    pub fn push(&mut self, row: Vec<Pixel>) {
        debug_assert_eq!(row.len(), self.width, "Row width differs!");
        if self.rows.len() == self.height {
            self.rows.pop_front();
        }
        self.rows.push_back(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows from oldest (top) to newest (bottom)
    pub fn iter(&self) -> impl Iterator<Item = &Vec<Pixel>> {
        self.rows.iter()
    }

    /// Copy the visible area into an image sink, blank lines on top while not yet filled
    pub fn snapshot(&self, sink: &mut crate::sink::ImageSink) -> crate::error::Result<()> {
        let blank = vec![crate::render::pack(0, 0, 0); self.width];
        for _ in self.rows.len()..self.height {
            sink.append(&blank)?;
        }
        for row in self.rows.iter() {
            sink.append(row)?;
        }
        Ok(())
    }
}

/// Render a row as one line of `columns` true-color terminal cells
pub fn ansi_line(row: &[Pixel], columns: usize) -> String {
    let mut line = String::with_capacity(columns * 20);
    if row.is_empty() || columns == 0 {
        return line;
    }

    for c in 0..columns {
        let x = c * row.len() / columns;
        let [r, g, b, _] = unpack(row[x]);
        let _ = write!(line, "\x1b[48;2;{};{};{}m ", r, g, b);
    }
    line.push_str("\x1b[0m");
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::pack;
    use crate::settings::Orientation;

    #[test]
    fn test_scroll() {
        let mut s = Scrollback::new(2, 3);
        for i in 0..5u8 {
            s.push(vec![pack(i, 0, 0); 2]);
        }
        assert_eq!(s.len(), 3);
        let first = s.iter().map(|r| unpack(r[0])[0]).collect::<Vec<_>>();
        assert_eq!(first, &[2, 3, 4]);
    }

    #[test]
    fn test_snapshot_pads() {
        let mut s = Scrollback::new(2, 4);
        s.push(vec![pack(9, 9, 9); 2]);

        let mut sink = crate::sink::ImageSink::new("unused.png", 2, Orientation::Vertical);
        s.snapshot(&mut sink).unwrap();
        let img = sink.to_image();
        assert_eq!(img.dimensions(), (2, 4));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 3).0, [9, 9, 9, 255]);
    }

    #[test]
    fn test_ansi_line() {
        let row = vec![pack(1, 2, 3), pack(4, 5, 6)];
        let line = ansi_line(&row, 4);
        assert_eq!(line.matches("\x1b[48;2;1;2;3m").count(), 2);
        assert_eq!(line.matches("\x1b[48;2;4;5;6m").count(), 2);
        assert!(line.ends_with("\x1b[0m"));
        assert!(ansi_line(&[], 10).is_empty());
    }
}
