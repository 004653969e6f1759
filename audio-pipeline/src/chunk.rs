/// Audio chunk passed from the capture side to the speech engine.

/// Samples are mono signed 16-bit PCM throughout the pipeline.
pub type Sample = i16;

/// One contiguous run of captured audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    samples: Vec<Sample>,
    sample_rate: u32,
    seq: u64,
}

impl AudioChunk {
    pub fn new(samples: Vec<Sample>, sample_rate: u32, seq: u64) -> Self {
        Self {
            samples,
            sample_rate,
            seq,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Monotonic sequence number assigned by the chunker.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_duration() {
        let chunk = AudioChunk::new(vec![0; 24_000], 16_000, 0);
        assert_relative_eq!(chunk.duration_secs(), 1.5);
        assert_eq!(chunk.len(), 24_000);
        assert!(!chunk.is_empty());
    }
}
