//! Spectrum Storage Type

/// Type Alias for Frequencies
pub type Frequency = f32;

/// Type Alias for Signal Strengths
pub type SignalStrength = f32;

/// Magnitude spectrum from DC up to and including Nyquist
#[derive(Debug, Clone)]
pub struct Spectrum {
    buckets: Vec<SignalStrength>,
    width: Frequency,
    lowest: Frequency,
    highest: Frequency,
}

impl std::ops::Index<usize> for Spectrum {
    type Output = SignalStrength;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buckets[index]
    }
}

impl std::ops::IndexMut<usize> for Spectrum {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.buckets[index]
    }
}

impl Spectrum {
    /// Create a zeroed spectrum of `len` buckets spanning `low` to `high`
    ///
    /// # Example
    /// ```
    /// # use spectro_core::analyzer;
    /// let spectrum = analyzer::Spectrum::new(513, 0.0, 12000.0);
    /// assert_eq!(spectrum.id_to_freq(512), 12000.0);
    /// ```
    pub fn new(len: usize, low: Frequency, high: Frequency) -> Spectrum {
        let mut s = Spectrum {
            buckets: vec![0.0; len],
            width: 0.0,
            lowest: 0.0,
            highest: 0.0,
        };
        s.respan(low, high);
        s
    }

    /// Spectrum of a real transform of `size` samples at sample-rate `rate`
    pub fn for_transform(size: usize, rate: usize) -> Spectrum {
        Spectrum::new(size / 2 + 1, 0.0, rate as Frequency / 2.0)
    }

    /// Resize to `len` zeroed buckets spanning `low` to `high`
    pub fn reset(&mut self, len: usize, low: Frequency, high: Frequency) {
        self.buckets.clear();
        self.buckets.resize(len, 0.0);
        self.respan(low, high);
    }

    fn respan(&mut self, low: Frequency, high: Frequency) {
        self.width = if self.buckets.len() > 1 {
            (high - low) / (self.buckets.len() as Frequency - 1.0)
        } else {
            0.0
        };
        self.lowest = low;
        self.highest = high;
    }

    #[inline]
    pub fn highest(&self) -> Frequency {
        self.highest
    }

    /// Return the frequency associated with a bucket
    pub fn id_to_freq(&self, i: usize) -> Frequency {
        assert!(i < self.buckets.len());

        i as Frequency * self.width + self.lowest
    }

    /// Bucket sampled for pixel `pixel` of a row `width` pixels wide
    ///
    /// Nearest-bucket selection: the first pixel maps to DC, the last to the highest bucket
    /// and the mapping never decreases.
    pub fn bucket_for(&self, pixel: usize, width: usize) -> usize {
        let last = self.buckets.len().saturating_sub(1);
        if width < 2 {
            return 0;
        }
        let x = pixel.min(width - 1) as f64 * last as f64 / (width - 1) as f64;
        (x.round() as usize).min(last)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignalStrength> {
        self.buckets.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SignalStrength> {
        self.buckets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn as_slice(&self) -> &[SignalStrength] {
        &self.buckets
    }

    /// Return the highest signal strengh in this spectrum
    pub fn max(&self) -> SignalStrength {
        self.buckets.iter().cloned().fold(0.0, SignalStrength::max)
    }
}
