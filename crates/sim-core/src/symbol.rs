//! Interned names.
//!
//! One table is created at startup and owned by the simulation; every name-keyed catalog (needs,
//! behaviors, scripts) resolves strings to `Symbol` handles once, after which equality and hashing
//! are integer comparisons.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol(u32);

impl Symbol {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    names: Vec<Box<str>>,
    lookup: HashMap<Box<str>, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.lookup.get(name) {
            return *sym;
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.into());
        self.lookup.insert(name.into(), sym);
        sym
    }

    /// Look up without interning.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.lookup.get(name).copied()
    }

    /// Panics for a symbol minted by another table.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.names
            .get(sym.0 as usize)
            .map(|s| &**s)
            .unwrap_or_else(|| panic!("symbol {sym:?} does not belong to this table"))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
