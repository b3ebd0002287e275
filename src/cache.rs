use crate::record::{Supplier, SupplierField};
use indexmap::IndexMap;
use std::{cell::RefCell, rc::Rc};

/// Cache handle shared by the components of one session.
pub type SharedCache = Rc<RefCell<EntityCache>>;

/// Insertion-ordered mirror of the last search result; what the UI displays.
/// Ids are unique; a later duplicate in a result set keeps the first position.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
    entries: IndexMap<String, Supplier>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCache {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Replace the contents wholesale. Returns the ids that are no longer present.
    pub fn replace_all(&mut self, suppliers: Vec<Supplier>) -> Vec<String> {
        let mut next = IndexMap::with_capacity(suppliers.len());
        for supplier in suppliers {
            if next.contains_key(&supplier.supplier_id) {
                tracing::warn!(entity_id = %supplier.supplier_id, "duplicate id in result set");
            }
            next.insert(supplier.supplier_id.clone(), supplier);
        }

        let evicted = self
            .entries
            .keys()
            .filter(|id| !next.contains_key(*id))
            .cloned()
            .collect();
        self.entries = next;
        evicted
    }

    /// Drop everything. Returns the evicted ids.
    pub fn clear(&mut self) -> Vec<String> {
        self.entries.drain(..).map(|(id, _)| id).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Supplier> {
        self.entries.get(id)
    }

    /// Patch one field of a cached supplier. Returns the previous value,
    /// or `None` when the id is not (or no longer) present.
    pub fn set_field(&mut self, id: &str, field: SupplierField, value: &str) -> Option<String> {
        let supplier = self.entries.get_mut(id)?;
        Some(supplier.set_field(field, value))
    }

    /// Replace a present entry in place, keeping its position.
    pub fn update(&mut self, supplier: Supplier) -> bool {
        match self.entries.get_mut(&supplier.supplier_id) {
            Some(slot) => {
                *slot = supplier;
                true
            }
            None => false,
        }
    }

    /// Add a supplier at the end (or replace it in place if already present).
    pub fn insert(&mut self, supplier: Supplier) {
        self.entries.insert(supplier.supplier_id.clone(), supplier);
    }

    pub fn remove(&mut self, id: &str) -> Option<Supplier> {
        self.entries.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Supplier> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
