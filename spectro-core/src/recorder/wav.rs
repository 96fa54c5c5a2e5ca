use crate::analyzer::Sample;
use crate::error;
use std::{fs, io, path};

/// Recorder decoding a WAV file, mixed down to mono
pub struct WavRecorder {
    reader: hound::WavReader<io::BufReader<fs::File>>,
    spec: hound::WavSpec,
}

impl std::fmt::Debug for WavRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "WavRecorder {{ spec: {:?} }}", self.spec)
    }
}

impl WavRecorder {
    pub fn open<P: AsRef<path::Path>>(path: P) -> error::Result<WavRecorder> {
        let reader = hound::WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        log::debug!("WavRecorder({}):", path.as_ref().display());
        log::debug!("    Sample Rate = {:6}", spec.sample_rate);
        log::debug!("    Channels    = {:6}", spec.channels);
        log::debug!("    Bits        = {:6}", spec.bits_per_sample);
        log::debug!("    Length      = {:6}", reader.duration());

        Ok(WavRecorder { reader, spec })
    }
}

/// Average interleaved frames of `channels` samples into mono
fn mix(interleaved: &[Sample], channels: usize) -> Vec<Sample> {
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<Sample>() / channels as Sample)
        .collect()
}

impl super::Recorder for WavRecorder {
    fn rate(&self) -> usize {
        self.spec.sample_rate as usize
    }

    fn read(&mut self, count: usize) -> error::Result<Vec<Sample>> {
        let channels = self.spec.channels.max(1) as usize;
        let wanted = count * channels;

        let interleaved = match self.spec.sample_format {
            hound::SampleFormat::Float => self
                .reader
                .samples::<f32>()
                .take(wanted)
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let full = (1i64 << (self.spec.bits_per_sample - 1)) as Sample;
                self.reader
                    .samples::<i32>()
                    .take(wanted)
                    .map(|s| s.map(|s| s as Sample / full))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(mix(&interleaved, channels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::Recorder;

    #[test]
    fn test_mix() {
        assert_eq!(mix(&[1.0, 0.0, 0.5, 0.5], 2), &[0.5, 0.5]);
        assert_eq!(mix(&[0.25, 0.75], 1), &[0.25, 0.75]);
    }

    #[test]
    fn test_decode_stereo() {
        let path = std::env::temp_dir().join(format!("spectro-wav-{}.wav", std::process::id()));
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        {
            let mut writer = hound::WavWriter::create(&path, spec).unwrap();
            for _ in 0..10 {
                writer.write_sample(16384i16).unwrap();
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }

        let mut rec = WavRecorder::open(&path).unwrap();
        assert_eq!(rec.rate(), 8000);

        let chunk = rec.read(8).unwrap();
        assert_eq!(chunk.len(), 8);
        assert!(chunk.iter().all(|s| (s - 0.25).abs() < 1e-6));
        assert_eq!(rec.read(8).unwrap().len(), 2);
        assert!(rec.read(8).unwrap().is_empty());

        std::fs::remove_file(&path).unwrap();
    }
}
