//! Keyed row storage shared by every repository.

use std::collections::BTreeMap;

use bookstore_core::EntityId;

/// Rows keyed by id plus the next id to hand out.
///
/// Ids start at 1 and are never reused, even after a delete.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Reserves the next id.
    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    pub(crate) fn insert(&mut self, id: EntityId, row: T) {
        self.rows.insert(id, row);
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Rows in ascending id order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Cloned rows matching `pred`, in id order.
    pub(crate) fn collect_where(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }
}
