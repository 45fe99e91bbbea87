//! A keyed table whose rows are locked one at a time.
//!
//! The map lock is held only long enough to find or insert a row. Each row
//! has a writer `Mutex`, held for the whole of an `update`, so updates of
//! different rows run in parallel and updates of the same row run one after
//! another.
//!
//! Readers never take the writer lock. They copy the row's committed value,
//! which an update replaces wholesale only after its mutation succeeds, so a
//! read during a slow update returns the state before it.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use draftgate_contracts::error::{EngineError, EngineResult};
use draftgate_core::traits::Mutation;

struct Row<V> {
    writer: Mutex<()>,
    committed: RwLock<V>,
}

impl<V: Clone> Row<V> {
    fn new(value: V) -> Self {
        Self {
            writer: Mutex::new(()),
            committed: RwLock::new(value),
        }
    }

    // A poisoned lock still guards a fully committed value.
    fn read(&self) -> V {
        self.committed.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn commit(&self, value: V) {
        *self.committed.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

pub(crate) struct Table<K, V> {
    entity: &'static str,
    rows: RwLock<HashMap<K, Arc<Row<V>>>>,
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    pub(crate) fn new(entity: &'static str) -> Self {
        Self {
            entity,
            rows: RwLock::new(HashMap::new()),
        }
    }

    fn not_found(&self, key: &K) -> EngineError {
        EngineError::NotFound {
            entity: self.entity,
            id: key.to_string(),
        }
    }

    fn row(&self, key: &K) -> EngineResult<Arc<Row<V>>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.get(key).cloned().ok_or_else(|| self.not_found(key))
    }

    pub(crate) fn insert(&self, key: K, value: V) -> EngineResult<()> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        if rows.contains_key(&key) {
            return Err(EngineError::conflict(format!(
                "{} '{}' already exists",
                self.entity, key
            )));
        }
        rows.insert(key, Arc::new(Row::new(value)));
        Ok(())
    }

    pub(crate) fn get(&self, key: &K) -> EngineResult<V> {
        Ok(self.row(key)?.read())
    }

    pub(crate) fn update(&self, key: &K, mutation: Mutation<'_, V>) -> EngineResult<V> {
        let row = self.row(key)?;
        let _writer = row.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut working = row.read();
        mutation(&mut working)?;
        row.commit(working.clone());
        Ok(working)
    }

    pub(crate) fn snapshot(&self) -> Vec<V> {
        let rows: Vec<Arc<Row<V>>> = self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        rows.iter().map(|row| row.read()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
