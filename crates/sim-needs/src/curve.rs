use serde::{Deserialize, Serialize};

/// Maps a need value onto a per-tick happiness penalty.
///
/// Curves are evaluated on the value normalised into `[0, 1]` over the need's clamp range, so the
/// same curve reads the same whatever range a need uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HappinessCurve {
    Flat { penalty: f32 },
    Linear { scale: f32 },
    Power { scale: f32, exponent: f32 },
}

impl Default for HappinessCurve {
    fn default() -> Self {
        HappinessCurve::Flat { penalty: 0.0 }
    }
}

impl HappinessCurve {
    pub fn penalty(&self, value: i32, min: i32, max: i32) -> f32 {
        let t = normalize(value, min, max);
        match *self {
            HappinessCurve::Flat { penalty } => penalty,
            HappinessCurve::Linear { scale } => scale * t,
            HappinessCurve::Power { scale, exponent } => scale * t.powf(exponent),
        }
    }
}

fn normalize(value: i32, min: i32, max: i32) -> f32 {
    if max <= min {
        return 0.0;
    }
    ((value - min) as f32 / (max - min) as f32).clamp(0.0, 1.0)
}
