use std::collections::VecDeque;

/// Mean over the last `window` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingAverage {
    window: usize,
    samples: VecDeque<f32>,
    sum: f32,
}

impl RollingAverage {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "rolling average window must be > 0");
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.window {
            if let Some(old) = self.samples.pop_front() {
                self.sum -= old;
            }
        }
        self.samples.push_back(sample);
        self.sum += sample;
    }

    /// `0` before the first sample.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum / self.samples.len() as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
