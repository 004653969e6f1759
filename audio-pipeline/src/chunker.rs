/// Turns queued samples into chunks sized for the speech engine
///
/// Windowed engines get fixed windows and nothing until a full window has
/// accumulated. Streaming engines get whatever is queued each poll.

use crate::chunk::AudioChunk;
use crate::sample_queue::SampleQueue;
use std::sync::Arc;
use tracing::trace;

/// How the downstream speech engine wants its audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Forward samples as they arrive.
    Streaming,

    /// Hold samples until a full fixed window is available.
    Windowed,
}

/// Default window length for windowed delivery.
pub const DEFAULT_WINDOW_SECS: f32 = 1.5;

pub struct Chunker {
    queue: Arc<SampleQueue>,
    mode: DeliveryMode,
    sample_rate: u32,
    window_samples: usize,
    next_seq: u64,
}

impl Chunker {
    pub fn new(queue: Arc<SampleQueue>, mode: DeliveryMode, sample_rate: u32) -> Self {
        Self::with_window(queue, mode, sample_rate, DEFAULT_WINDOW_SECS)
    }

    pub fn with_window(
        queue: Arc<SampleQueue>,
        mode: DeliveryMode,
        sample_rate: u32,
        window_secs: f32,
    ) -> Self {
        let window_samples = (sample_rate as f32 * window_secs) as usize;
        Self {
            queue,
            mode,
            sample_rate,
            window_samples,
            next_seq: 0,
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Take the next chunk if one is ready. Sequence numbers increase by
    /// one per returned chunk.
    pub fn poll(&mut self) -> Option<AudioChunk> {
        let samples = match self.mode {
            DeliveryMode::Windowed => {
                if self.queue.available() < self.window_samples {
                    return None;
                }
                self.queue.drain(self.window_samples)
            }
            DeliveryMode::Streaming => {
                let available = self.queue.available();
                if available == 0 {
                    return None;
                }
                self.queue.drain(available)
            }
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(seq, len = samples.len(), "chunk ready");
        Some(AudioChunk::new(samples, self.sample_rate, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(capacity: usize) -> Arc<SampleQueue> {
        Arc::new(SampleQueue::with_capacity(capacity))
    }

    #[test]
    fn test_windowed_waits_for_full_window() {
        let q = queue(64_000);
        let mut chunker = Chunker::new(Arc::clone(&q), DeliveryMode::Windowed, 16_000);

        q.push(&vec![1; 10_000]);
        assert!(chunker.poll().is_none());

        q.push(&vec![1; 20_000]);
        let chunk = chunker.poll().unwrap();
        assert_eq!(chunk.len(), 24_000);
        assert_eq!(chunk.seq(), 0);

        // The 6,000 leftover samples wait for the next window.
        assert!(chunker.poll().is_none());
        assert_eq!(q.available(), 6_000);
    }

    #[test]
    fn test_streaming_takes_everything() {
        let q = queue(64_000);
        let mut chunker = Chunker::new(Arc::clone(&q), DeliveryMode::Streaming, 16_000);

        assert!(chunker.poll().is_none());

        q.push(&vec![1; 123]);
        let chunk = chunker.poll().unwrap();
        assert_eq!(chunk.len(), 123);
        assert!(q.is_empty());
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let q = queue(64_000);
        let mut chunker = Chunker::new(Arc::clone(&q), DeliveryMode::Streaming, 16_000);

        q.push(&[1; 10]);
        assert_eq!(chunker.poll().unwrap().seq(), 0);
        q.push(&[1; 10]);
        assert_eq!(chunker.poll().unwrap().seq(), 1);
    }

    #[test]
    fn test_window_longer_than_default_capacity() {
        // A 12s window at 16kHz needs 192,000 samples, more than the
        // default queue holds; a window-sized queue must still fill.
        let q = Arc::new(SampleQueue::with_capacity(SampleQueue::capacity_for_window(
            16_000, 12.0,
        )));
        let mut chunker = Chunker::with_window(Arc::clone(&q), DeliveryMode::Windowed, 16_000, 12.0);

        q.push(&vec![1; 192_000]);
        let chunk = chunker.poll().unwrap();
        assert_eq!(chunk.len(), 192_000);
    }

    #[test]
    fn test_custom_window() {
        let q = queue(64_000);
        let mut chunker =
            Chunker::with_window(Arc::clone(&q), DeliveryMode::Windowed, 16_000, 0.5);

        q.push(&vec![1; 8_000]);
        let chunk = chunker.poll().unwrap();
        assert_eq!(chunk.len(), 8_000);
    }
}
