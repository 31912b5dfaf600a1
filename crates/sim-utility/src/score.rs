/// Score conventions shared by every scorer.
pub struct Utility;

impl Utility {
    /// Chosen unconditionally, ahead of any finite score.
    pub const MUST: f32 = f32::MAX;
    /// Never chosen.
    pub const NEVER: f32 = f32::MIN;

    /// NaN counts as `NEVER`.
    pub fn sanitize(score: f32) -> f32 {
        if score.is_nan() {
            Self::NEVER
        } else {
            score
        }
    }

    pub fn is_never(score: f32) -> bool {
        score.is_nan() || score <= Self::NEVER
    }
}

/// `1 / (1 + distance)`: nearer targets score higher.
pub fn distance_penalty(distance: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0))
}

/// Zero when the target has no free slot for the agent's group.
pub fn queue_penalty(has_free_slot: bool) -> f32 {
    if has_free_slot {
        1.0
    } else {
        0.0
    }
}
