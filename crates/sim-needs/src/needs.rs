use crate::{NeedCatalog, NeedId, RollingAverage};

/// One agent's need values, happiness and distress history.
#[derive(Debug, Clone, PartialEq)]
pub struct Needs {
    values: Vec<i32>,
    happiness: f32,
    max_happiness: f32,
    distress: RollingAverage,
}

impl Needs {
    /// Every need at its initial value; happiness starts full.
    pub fn new(catalog: &NeedCatalog, max_happiness: f32, window: usize) -> Self {
        Self {
            values: catalog.iter().map(|(_, def)| def.initial).collect(),
            happiness: max_happiness,
            max_happiness,
            distress: RollingAverage::new(window),
        }
    }

    /// Panics for a need that is not part of this agent's catalog.
    pub fn value(&self, need: NeedId) -> i32 {
        *self
            .values
            .get(need.index())
            .unwrap_or_else(|| panic!("unknown need id {}", need.index()))
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn happiness(&self) -> f32 {
        self.happiness
    }

    /// Rolling mean of the per-tick happiness penalty: how needy the agent has been lately.
    pub fn neediness(&self) -> f32 {
        self.distress.average()
    }

    /// Apply idle drift to every need, then charge the total penalty against happiness. Returns
    /// the penalty.
    pub fn tick(&mut self, catalog: &NeedCatalog) -> f32 {
        let mut total = 0.0;
        for (id, def) in catalog.iter() {
            let value = &mut self.values[id.index()];
            *value = def.clamp(value.saturating_add(def.idle_delta));
            total += def.curve.penalty(*value, def.min, def.max);
        }

        self.happiness = (self.happiness - total).clamp(0.0, self.max_happiness);
        self.distress.push(total);
        total
    }

    /// Change one need by `delta`, clamped. Returns the new value.
    pub fn apply_delta(&mut self, catalog: &NeedCatalog, need: NeedId, delta: i32) -> i32 {
        let def = catalog.def(need);
        let value = self
            .values
            .get_mut(need.index())
            .unwrap_or_else(|| panic!("unknown need id {}", need.index()));
        *value = def.clamp(value.saturating_add(delta));
        *value
    }

    pub fn set(&mut self, catalog: &NeedCatalog, need: NeedId, value: i32) {
        let current = self.value(need);
        self.apply_delta(catalog, need, value.saturating_sub(current));
    }

    pub fn urgency(&self, catalog: &NeedCatalog, need: NeedId) -> f32 {
        catalog.def(need).urgency(self.value(need))
    }

    pub fn is_urgent(&self, catalog: &NeedCatalog, need: NeedId) -> bool {
        self.urgency(catalog, need) > 0.0
    }
}
