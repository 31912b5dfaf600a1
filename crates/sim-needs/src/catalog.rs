use std::collections::BTreeMap;

use serde::Deserialize;
use sim_core::{Symbol, SymbolTable};

use crate::{NeedDef, NeedsError};

/// Dense handle into a [`NeedCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeedId(u16);

impl NeedId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    needs: Vec<NeedDef>,
}

/// Validated need definitions, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct NeedCatalog {
    defs: Vec<NeedDef>,
    symbols: Vec<Symbol>,
    by_symbol: BTreeMap<Symbol, NeedId>,
}

impl NeedCatalog {
    pub fn from_defs(defs: Vec<NeedDef>, symbols: &mut SymbolTable) -> Result<Self, NeedsError> {
        let mut catalog = Self::default();
        for def in defs {
            catalog.insert(def, symbols)?;
        }
        tracing::debug!(needs = catalog.len(), "need catalog loaded");
        Ok(catalog)
    }

    /// Parse a `needs:` list from YAML.
    pub fn from_yaml_str(yaml: &str, symbols: &mut SymbolTable) -> Result<Self, NeedsError> {
        let raw: RawCatalog = serde_yaml::from_str(yaml)?;
        Self::from_defs(raw.needs, symbols)
    }

    fn insert(&mut self, def: NeedDef, symbols: &mut SymbolTable) -> Result<(), NeedsError> {
        if def.max <= def.min {
            return Err(NeedsError::InvalidRange {
                name: def.name,
                min: def.min,
                max: def.max,
            });
        }
        if !(def.min..=def.max).contains(&def.initial) {
            return Err(NeedsError::InitialOutOfRange {
                name: def.name,
                initial: def.initial,
                min: def.min,
                max: def.max,
            });
        }

        let symbol = symbols.intern(&def.name);
        if self.by_symbol.contains_key(&symbol) {
            return Err(NeedsError::DuplicateNeed(def.name));
        }

        let id = NeedId(self.defs.len() as u16);
        self.by_symbol.insert(symbol, id);
        self.symbols.push(symbol);
        self.defs.push(def);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn id(&self, symbol: Symbol) -> Option<NeedId> {
        self.by_symbol.get(&symbol).copied()
    }

    pub fn id_by_name(&self, symbols: &SymbolTable, name: &str) -> Result<NeedId, NeedsError> {
        symbols
            .get(name)
            .and_then(|symbol| self.id(symbol))
            .ok_or_else(|| NeedsError::UnknownNeed(name.to_string()))
    }

    /// Panics for an id minted by another catalog.
    pub fn def(&self, id: NeedId) -> &NeedDef {
        self.defs
            .get(id.index())
            .unwrap_or_else(|| panic!("unknown need id {}", id.0))
    }

    pub fn symbol(&self, id: NeedId) -> Symbol {
        self.symbols[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = NeedId> {
        (0..self.defs.len() as u16).map(NeedId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NeedId, &NeedDef)> {
        self.ids().zip(self.defs.iter())
    }
}
