/// Recently delivered input samples, addressed by absolute index.
///
/// Index `i` refers to input sample `i - lead`: the buffer starts with
/// `lead` zeros standing in for the silence before the stream, so a kernel
/// window that reaches back past the first sample still finds data.
/// Samples older than the oldest window still needed are dropped from the
/// head, which keeps the buffer bounded by the kernel width plus one chunk.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    /// Retained samples, oldest first
    samples: Vec<f32>,
    /// Absolute index of `samples[0]`
    start: u64,
    /// Number of leading zeros before the first input sample
    lead: u64,
}

impl HistoryBuffer {
    /// Create a buffer primed with `lead` zeros
    pub fn new(lead: usize) -> Self {
        Self {
            samples: vec![0.0; lead],
            start: 0,
            lead: lead as u64,
        }
    }

    /// Append input samples at the tail
    pub fn push(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }

    /// Append `count` zero samples at the tail
    pub fn push_zeros(&mut self, count: usize) {
        self.samples.resize(self.samples.len() + count, 0.0);
    }

    /// Absolute index of the oldest retained sample
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Absolute index one past the newest sample
    pub fn end(&self) -> u64 {
        self.start + self.samples.len() as u64
    }

    /// Number of samples appended so far, excluding the leading zeros
    pub fn delivered(&self) -> u64 {
        self.end() - self.lead
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow `len` samples starting at absolute index `first`.
    ///
    /// Returns `None` when any part of the window has been discarded or
    /// has not been delivered yet.
    pub fn window(&self, first: u64, len: usize) -> Option<&[f32]> {
        if first < self.start {
            return None;
        }
        let offset = usize::try_from(first - self.start).ok()?;
        let end = offset.checked_add(len)?;
        self.samples.get(offset..end)
    }

    /// Drop every sample with an absolute index below `index`
    pub fn discard_before(&mut self, index: u64) {
        if index <= self.start {
            return;
        }
        let count = (index - self.start).min(self.samples.len() as u64) as usize;
        self.samples.drain(..count);
        self.start += count as u64;
    }

    /// Free the sample storage
    pub fn release(&mut self) {
        self.start = self.end();
        self.samples = Vec::new();
    }
}
