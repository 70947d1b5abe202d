use std::{collections::VecDeque, time::Duration};

/// Fixed-size FIFO of remaining-time samples. The smoothed estimate is the
/// arithmetic mean of whatever is currently held.
#[derive(Debug, Clone)]
pub struct EtaWindow {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl EtaWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest one once the window is full.
    pub fn push(&mut self, sample: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn average(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn oldest(&self) -> Option<Duration> {
        self.samples.front().copied()
    }
}
