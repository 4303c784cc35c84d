use alloc::vec::Vec;
use core::ops::Index;

/// Decoded samples, one sequence per channel
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<T> {
    channels: Vec<Vec<T>>,
}

impl<T> AudioBuffer<T> {
    /// An empty buffer without any channels
    pub fn new() -> Self {
        Self { channels: Vec::new() }
    }

    /// A buffer of `num_channels` empty channels with room for
    /// `samples_per_channel` samples each
    pub(crate) fn with_capacity(num_channels: usize, samples_per_channel: usize) -> Self {
        let channels = (0..num_channels)
            .map(|_| Vec::with_capacity(samples_per_channel))
            .collect();
        Self { channels }
    }

    /// Append a sample to the end of `channel`
    ///
    /// Panics if `channel` is out of range, callers only pass channels
    /// below the validated channel count.
    pub(crate) fn push(&mut self, channel: usize, sample: T) {
        self.channels[channel].push(sample);
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples in each channel
    pub fn num_samples_per_channel(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Samples of a single channel
    pub fn channel(&self, channel: usize) -> Option<&[T]> {
        self.channels.get(channel).map(Vec::as_slice)
    }

    /// Iterate over the channels in order
    pub fn channels(&self) -> impl ExactSizeIterator<Item = &[T]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// `true` when there are no channels or no samples
    pub fn is_empty(&self) -> bool {
        self.num_samples_per_channel() == 0
    }

    /// Drop all channels and samples
    pub fn clear(&mut self) {
        self.channels.clear();
    }
}

impl<T> Default for AudioBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for AudioBuffer<T> {
    type Output = [T];

    fn index(&self, channel: usize) -> &Self::Output {
        &self.channels[channel]
    }
}
