//! Sliding Sample Window
use crate::error;

pub type Sample = f32;

/// The most recent `len()` samples of a stream
///
/// Starts out zero-filled.  New chunks are shifted in at the tail, the same number of samples
/// drops out at the head.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    buf: Vec<Sample>,
}

impl SampleWindow {
    pub fn new(size: usize) -> SampleWindow {
        SampleWindow {
            buf: vec![0.0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.buf
    }

    /// Replace the buffer by a zeroed one of `size` samples
    ///
    /// History is discarded on purpose, it can not be kept at a mismatched length.
    pub fn resize(&mut self, size: usize) {
        self.buf = vec![0.0; size];
    }

    /// Shift `chunk` in, dropping the oldest `chunk.len()` samples
    pub fn advance(&mut self, chunk: &[Sample]) -> error::Result<()> {
        let len = self.buf.len();
        let k = chunk.len();
        if k > len {
            return Err(error::Error::BufferOverrun {
                chunk: k,
                capacity: len,
            });
        }

        self.buf.copy_within(k.., 0);
        self.buf[len - k..].copy_from_slice(chunk);

        log::trace!("SampleWindow({:p}): advanced by {}", self, k);
        Ok(())
    }

    /// Shift in a chunk read from a finite stream, advancing by the hop for `overlap`
    ///
    /// The `priming` read fills the window from the start and is zero-padded to the full
    /// window.  Every later read keeps the newest `len() - chunk.len()` samples, a read shorter
    /// than one hop is zero-padded to a full hop first so the transform always sees a full
    /// window after the stream ended.
    pub fn advance_overlapped(
        &mut self,
        chunk: &[Sample],
        overlap: f32,
        priming: bool,
    ) -> error::Result<()> {
        let len = self.buf.len();
        if chunk.len() > len {
            return Err(error::Error::BufferOverrun {
                chunk: chunk.len(),
                capacity: len,
            });
        }

        let expected = if priming {
            len
        } else {
            crate::settings::hop_size(len, overlap)
        };

        if chunk.len() >= expected {
            return self.advance(chunk);
        }

        let mut padded = Vec::with_capacity(expected);
        padded.extend_from_slice(chunk);
        padded.resize(expected, 0.0);
        self.advance(&padded)
    }
}
