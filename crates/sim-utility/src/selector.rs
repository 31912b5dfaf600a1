use core::fmt::Debug;

use crate::Utility;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilitySelectorConfig {
    /// Minimum score a candidate needs to be selectable.
    ///
    /// If every candidate is below this threshold nothing is selected, leaving the caller to fall
    /// back. `NEVER` candidates are rejected regardless.
    pub min_score: f32,
}

impl Default for UtilitySelectorConfig {
    fn default() -> Self {
        Self {
            min_score: Utility::NEVER,
        }
    }
}

/// Picks the highest-scoring candidate and remembers the choice for inspection.
#[derive(Debug, Clone)]
pub struct UtilitySelector<K> {
    config: UtilitySelectorConfig,
    last_choice: Option<K>,
    last_best_score: f32,
}

impl<K> Default for UtilitySelector<K> {
    fn default() -> Self {
        Self {
            config: UtilitySelectorConfig::default(),
            last_choice: None,
            last_best_score: Utility::NEVER,
        }
    }
}

impl<K> UtilitySelector<K>
where
    K: Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: UtilitySelectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn last_choice(&self) -> Option<&K> {
        self.last_choice.as_ref()
    }

    pub fn last_best_score(&self) -> f32 {
        self.last_best_score
    }

    /// Index of the winning candidate, if any candidate is selectable.
    pub fn select<I>(&mut self, candidates: I) -> Option<usize>
    where
        I: IntoIterator<Item = (K, f32)>,
    {
        let mut best: Option<(usize, K)> = None;
        let mut best_score = Utility::NEVER;

        for (i, (key, score)) in candidates.into_iter().enumerate() {
            let score = Utility::sanitize(score);
            if Utility::is_never(score) || score < self.config.min_score {
                continue;
            }
            if best.is_none() || score > best_score {
                best_score = score;
                best = Some((i, key));
            }
        }

        self.last_best_score = best_score;
        let (index, key) = best.map_or((None, None), |(i, k)| (Some(i), Some(k)));
        if let Some(key) = key.as_ref() {
            tracing::trace!(choice = ?key, score = best_score, "utility selection");
        }
        self.last_choice = key;
        index
    }

    pub fn reset(&mut self) {
        self.last_choice = None;
        self.last_best_score = Utility::NEVER;
    }
}
