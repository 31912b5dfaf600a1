//! Per-agent scratch memory threading state between ticks of a suspended behavior.
//!
//! Keys carry their value type (`BbKey<T>`), so the usual read path is checked at compile time.
//! Two keys built from the same numeric id with different types can still collide; such a read is
//! treated as a miss and logged, never a crash.

use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

const NAMESPACE_SHIFT: u32 = 48;

impl<T: 'static> BbKey<T> {
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Key inside a numbered namespace; `Blackboard::clear_namespace` drops every key of it at once.
    pub const fn scoped(namespace: u16, local: u32) -> Self {
        Self::new(((namespace as u64) << NAMESPACE_SHIFT) | local as u64)
    }

    pub fn id(self) -> u64 {
        self.id
    }

    pub fn namespace(self) -> u16 {
        (self.id >> NAMESPACE_SHIFT) as u16
    }
}

#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<u64, Box<dyn Any>>,
    stack: Vec<Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.get(key).is_some()
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.id, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(&key.id)?;
        let typed = value.downcast_ref::<T>();
        if typed.is_none() {
            type_miss::<T>(key.id);
        }
        typed
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(&key.id)?;
        let typed = value.downcast_mut::<T>();
        if typed.is_none() {
            type_miss::<T>(key.id);
        }
        typed
    }

    pub fn get_or_insert_with<T: 'static>(
        &mut self,
        key: BbKey<T>,
        make: impl FnOnce() -> T,
    ) -> &mut T {
        if !self.contains(key) {
            self.set(key, make());
        }
        self.values
            .get_mut(&key.id)
            .and_then(|v| v.downcast_mut::<T>())
            .unwrap_or_else(|| panic!("blackboard key id={:#x} vanished after insert", key.id))
    }

    /// Read a key the caller's state machine guarantees was initialized.
    ///
    /// A missing key here is a sequencing bug, so this panics instead of returning `None`.
    pub fn require<T: 'static>(&self, key: BbKey<T>) -> &T {
        self.get(key).unwrap_or_else(|| {
            panic!(
                "blackboard key id={:#x} required but not set (or stored with another type)",
                key.id
            )
        })
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        if !self.contains(key) {
            return None;
        }
        let value = self.values.remove(&key.id)?;
        value.downcast::<T>().map(|b| *b).ok()
    }

    /// Drop every key created with `BbKey::scoped(namespace, _)`.
    pub fn clear_namespace(&mut self, namespace: u16) {
        self.values
            .retain(|id, _| (id >> NAMESPACE_SHIFT) as u16 != namespace);
    }

    pub fn push<T: 'static>(&mut self, value: T) {
        self.stack.push(Box::new(value));
    }

    /// Pop the top of the auxiliary stack if it holds a `T`; otherwise leave the stack untouched.
    pub fn pop<T: 'static>(&mut self) -> Option<T> {
        if !self.stack.last()?.is::<T>() {
            tracing::warn!(
                expected = std::any::type_name::<T>(),
                "blackboard stack top holds another type"
            );
            return None;
        }
        self.stack.pop()?.downcast::<T>().map(|b| *b).ok()
    }

    pub fn peek<T: 'static>(&self) -> Option<&T> {
        self.stack.last()?.downcast_ref::<T>()
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }
}

fn type_miss<T: 'static>(id: u64) {
    tracing::warn!(
        key = id,
        expected = std::any::type_name::<T>(),
        "blackboard type mismatch, treating as unset"
    );
}
