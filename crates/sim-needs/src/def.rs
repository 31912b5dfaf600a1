use serde::{Deserialize, Serialize};

use crate::HappinessCurve;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedCategory {
    /// Bodily needs served by fixtures and dispensers.
    #[default]
    Body,
    /// Training needs served by equipment.
    Fitness,
}

/// Static description of one need. Values are integers in `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedDef {
    pub name: String,
    #[serde(default)]
    pub category: NeedCategory,
    /// Applied once per tick before clamping.
    #[serde(default)]
    pub idle_delta: i32,
    #[serde(default)]
    pub min: i32,
    #[serde(default = "default_max")]
    pub max: i32,
    #[serde(default)]
    pub initial: i32,
    /// Above this value the need starts to drive behavior selection.
    #[serde(default = "default_threshold")]
    pub urgency_threshold: i32,
    #[serde(default)]
    pub curve: HappinessCurve,
}

fn default_max() -> i32 {
    100
}

fn default_threshold() -> i32 {
    50
}

impl NeedDef {
    pub fn new(name: impl Into<String>, category: NeedCategory) -> Self {
        Self {
            name: name.into(),
            category,
            idle_delta: 0,
            min: 0,
            max: default_max(),
            initial: 0,
            urgency_threshold: default_threshold(),
            curve: HappinessCurve::default(),
        }
    }

    pub fn with_idle_delta(mut self, idle_delta: i32) -> Self {
        self.idle_delta = idle_delta;
        self
    }

    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_initial(mut self, initial: i32) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_threshold(mut self, urgency_threshold: i32) -> Self {
        self.urgency_threshold = urgency_threshold;
        self
    }

    pub fn with_curve(mut self, curve: HappinessCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// `0` at or below the threshold, rising linearly to `1` at `max`.
    pub fn urgency(&self, value: i32) -> f32 {
        if value <= self.urgency_threshold || self.max <= self.urgency_threshold {
            return 0.0;
        }
        (value - self.urgency_threshold) as f32 / (self.max - self.urgency_threshold) as f32
    }
}
