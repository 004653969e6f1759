/// Bounded sample queue between the capture callback and the chunker
///
/// A lock-free ring buffer split into producer and consumer halves, each
/// behind its own mutex so the cpal callback and the processing loop can
/// touch the queue through a shared reference. When the queue is full the
/// oldest samples are dropped to make room; audio is perishable and stale
/// samples are worth less than fresh ones.

use crate::chunk::Sample;
use cache_padded::CachePadded;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::HeapRb;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Default capacity: 10 seconds at 16kHz.
pub const DEFAULT_CAPACITY: usize = 160_000;

type Ring = HeapRb<Sample>;
type RingProducer = <Ring as Split>::Prod;
type RingConsumer = <Ring as Split>::Cons;

pub struct SampleQueue {
    producer: CachePadded<Mutex<RingProducer>>,
    consumer: CachePadded<Mutex<RingConsumer>>,
}

impl SampleQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacity sized for a windowed chunker at `sample_rate`: never below
    /// the default, and always at least two full windows so a long window
    /// can actually fill before the queue wraps.
    pub fn capacity_for_window(sample_rate: u32, window_secs: f32) -> usize {
        let window = (sample_rate as f32 * window_secs) as usize;
        DEFAULT_CAPACITY.max(window * 2)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        debug!(capacity, "creating sample queue");

        let rb = HeapRb::<Sample>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer: CachePadded::new(Mutex::new(producer)),
            consumer: CachePadded::new(Mutex::new(consumer)),
        }
    }

    /// Append samples, dropping the oldest samples first when there is not
    /// enough room. An incoming slice larger than the whole queue keeps
    /// only its newest samples. Returns the number of samples written.
    pub fn push(&self, samples: &[Sample]) -> usize {
        let mut producer = match self.producer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let capacity = producer.capacity().get();
        let tail = if samples.len() > capacity {
            &samples[samples.len() - capacity..]
        } else {
            samples
        };
        let dropped_incoming = samples.len() - tail.len();

        let vacant = producer.vacant_len();
        let dropped_queued = tail.len().saturating_sub(vacant);
        if dropped_queued > 0 {
            let mut consumer = match self.consumer.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            consumer.skip(dropped_queued);
        }
        if dropped_incoming + dropped_queued > 0 {
            warn!(
                dropped = dropped_incoming + dropped_queued,
                "sample queue full, dropped oldest samples"
            );
        }

        producer.push_slice(tail)
    }

    /// Remove and return up to `count` samples, oldest first.
    pub fn drain(&self, count: usize) -> Vec<Sample> {
        let mut consumer = match self.consumer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let to_read = count.min(consumer.occupied_len());
        let mut out = vec![0; to_read];
        let read = consumer.pop_slice(&mut out);
        out.truncate(read);
        out
    }

    /// Number of samples currently queued.
    pub fn available(&self) -> usize {
        match self.consumer.lock() {
            Ok(guard) => guard.occupied_len(),
            Err(poisoned) => poisoned.into_inner().occupied_len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    pub fn capacity(&self) -> usize {
        match self.consumer.lock() {
            Ok(guard) => guard.capacity().get(),
            Err(poisoned) => poisoned.into_inner().capacity().get(),
        }
    }

    /// Discard everything queued.
    pub fn clear(&self) {
        let mut consumer = match self.consumer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let occupied = consumer.occupied_len();
        consumer.skip(occupied);
    }
}

impl Default for SampleQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let queue = SampleQueue::new();
        assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_and_drain_order() {
        let queue = SampleQueue::with_capacity(1000);
        let samples: Vec<i16> = (0..100).collect();

        assert_eq!(queue.push(&samples), 100);
        assert_eq!(queue.available(), 100);

        let drained = queue.drain(50);
        assert_eq!(drained.len(), 50);
        assert_eq!(drained[0], 0);
        assert_eq!(drained[49], 49);
        assert_eq!(queue.available(), 50);
    }

    #[test]
    fn test_drain_more_than_available() {
        let queue = SampleQueue::with_capacity(100);
        queue.push(&[1; 30]);
        assert_eq!(queue.drain(100).len(), 30);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let queue = SampleQueue::with_capacity(10);
        queue.push(&[1; 10]);
        queue.push(&[2; 5]);

        assert_eq!(queue.available(), 10);
        let drained = queue.drain(10);
        // Five oldest 1s were dropped; the survivors keep arrival order.
        assert_eq!(&drained[..5], &[1; 5]);
        assert_eq!(&drained[5..], &[2; 5]);
    }

    #[test]
    fn test_oversized_push_keeps_newest() {
        let queue = SampleQueue::with_capacity(10);
        let samples: Vec<i16> = (0..25).collect();

        assert_eq!(queue.push(&samples), 10);
        assert_eq!(queue.drain(10), (15..25).collect::<Vec<i16>>());
    }

    #[test]
    fn test_capacity_for_window() {
        // The default covers a standard window comfortably.
        assert_eq!(
            SampleQueue::capacity_for_window(16_000, 1.5),
            DEFAULT_CAPACITY
        );
        // A long window grows the queue to hold two of them.
        assert_eq!(SampleQueue::capacity_for_window(16_000, 12.0), 384_000);
        assert_eq!(SampleQueue::capacity_for_window(48_000, 12.0), 1_152_000);
    }

    #[test]
    fn test_shared_reference_access() {
        let queue = std::sync::Arc::new(SampleQueue::with_capacity(100));
        let writer = std::sync::Arc::clone(&queue);
        writer.push(&[7; 20]);
        assert_eq!(queue.drain(20), vec![7; 20]);
    }

    #[test]
    fn test_clear() {
        let queue = SampleQueue::with_capacity(100);
        queue.push(&[1; 50]);
        queue.clear();
        assert!(queue.is_empty());
    }
}
