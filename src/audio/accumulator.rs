use super::capture::SampleFrame;

/// Buffers capture frames between chunk boundaries
///
/// The capture callback pushes one frame at a time; when a boundary is
/// reached the pipeline drains everything buffered so far into two flat
/// channel arrays. Memory stays bounded because a drain happens at least
/// once per chunk duration.
#[derive(Debug, Default)]
pub struct SampleAccumulator {
    left: Vec<Vec<f32>>,
    right: Vec<Vec<f32>>,
    sample_count: usize,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one capture frame
    pub fn push(&mut self, frame: SampleFrame) {
        debug_assert_eq!(
            frame.left.len(),
            frame.right.len(),
            "capture sources must deliver equal-length channels"
        );

        self.sample_count += frame.left.len();
        self.left.push(frame.left);
        self.right.push(frame.right);
    }

    /// Number of sample pairs buffered since the last drain
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Flatten everything buffered into two equal-length channel arrays
    /// and reset the buffer.
    ///
    /// Not idempotent: a second drain without intervening pushes yields
    /// empty arrays.
    pub fn drain(&mut self) -> (Vec<f32>, Vec<f32>, usize) {
        let count = self.sample_count;

        let mut left = Vec::with_capacity(count);
        for buffer in self.left.drain(..) {
            left.extend_from_slice(&buffer);
        }

        let mut right = Vec::with_capacity(count);
        for buffer in self.right.drain(..) {
            right.extend_from_slice(&buffer);
        }

        self.sample_count = 0;

        (left, right, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: f32, len: usize, timestamp_ms: u64) -> SampleFrame {
        SampleFrame {
            left: vec![value; len],
            right: vec![-value; len],
            timestamp_ms,
        }
    }

    #[test]
    fn test_push_accumulates_sample_count() {
        let mut acc = SampleAccumulator::new();
        assert!(acc.is_empty());

        acc.push(frame(0.5, 128, 0));
        acc.push(frame(0.25, 64, 100));

        assert_eq!(acc.sample_count(), 192);
        assert!(!acc.is_empty());
    }

    #[test]
    fn test_drain_concatenates_in_push_order() {
        let mut acc = SampleAccumulator::new();
        acc.push(frame(0.5, 2, 0));
        acc.push(frame(0.25, 3, 100));

        let (left, right, count) = acc.drain();

        assert_eq!(count, 5);
        assert_eq!(left, vec![0.5, 0.5, 0.25, 0.25, 0.25]);
        assert_eq!(right, vec![-0.5, -0.5, -0.25, -0.25, -0.25]);
        assert_eq!(left.len(), right.len(), "channels must stay equal length");
    }

    #[test]
    fn test_drain_resets_buffer() {
        let mut acc = SampleAccumulator::new();
        acc.push(frame(1.0, 10, 0));

        let (_, _, first) = acc.drain();
        assert_eq!(first, 10);

        let (left, right, second) = acc.drain();
        assert_eq!(second, 0, "second drain without pushes should be empty");
        assert!(left.is_empty());
        assert!(right.is_empty());
    }
}
