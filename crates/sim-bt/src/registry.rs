use std::collections::BTreeMap;
use std::rc::Rc;

use sim_core::WorldMut;

use crate::error::BuildError;
use crate::spec::NodeSpec;
use crate::tree::BehaviorTree;

/// Handle to a registered script; resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptId(u32);

impl ScriptId {
    pub fn index(self) -> u32 {
        self.0
    }
}

struct Script<W>
where
    W: WorldMut + 'static,
{
    name: String,
    spec: Rc<NodeSpec<W>>,
}

/// Factory table of named, validated tree specs.
pub struct ScriptRegistry<W>
where
    W: WorldMut + 'static,
{
    scripts: Vec<Script<W>>,
    by_name: BTreeMap<String, ScriptId>,
}

impl<W> Default for ScriptRegistry<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            scripts: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }
}

impl<W> ScriptRegistry<W>
where
    W: WorldMut + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `name`.
    ///
    /// `Script` references inside the spec must name scripts registered earlier. The resolved
    /// graph is validated as a whole; any error leaves the registry unchanged.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        spec: NodeSpec<W>,
    ) -> Result<ScriptId, BuildError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(BuildError::DuplicateScript(name));
        }

        let spec = spec.resolve(&|reference: &str| {
            self.lookup(reference)
                .map(|id| Rc::clone(&self.scripts[id.0 as usize].spec))
        })?;
        spec.validate()?;

        let id = ScriptId(self.scripts.len() as u32);
        tracing::debug!(script = %name, id = id.0, "registered behavior script");
        self.by_name.insert(name.clone(), id);
        self.scripts.push(Script {
            name,
            spec: Rc::new(spec),
        });
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<ScriptId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: ScriptId) -> &str {
        &self.script(id).name
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Build a fresh tree for one behavior instance.
    pub fn instantiate(&self, id: ScriptId) -> BehaviorTree<W> {
        let script = self.script(id);
        BehaviorTree::new(script.name.clone(), script.spec.instantiate())
    }

    fn script(&self, id: ScriptId) -> &Script<W> {
        self.scripts
            .get(id.0 as usize)
            .unwrap_or_else(|| panic!("script id {} was not minted by this registry", id.0))
    }
}
