//! Persistence seam for level progress
//!
//! Progress is a handful of named integers (`currentLevel`, `scoreToWin`).
//! The core only sees the [`ProgressStore`] trait; [`MemoryStore`] keeps values
//! for the lifetime of the process. File-backed stores live outside the core.

use std::collections::HashMap;

use crate::error::StoreError;

/// Named integer storage
pub trait ProgressStore {
    /// Read a value, `None` when it was never written
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Write a value (may be buffered until [`ProgressStore::flush`])
    fn set_int(&mut self, key: &str, value: i64);

    /// Make buffered writes durable
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn get_int(&self, key: &str) -> Option<i64> {
        (**self).get_int(key)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        (**self).set_int(key, value)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        (**self).flush()
    }
}

/// Read a stored value as `u32`, using `default` when absent or out of range
pub fn get_u32_or(store: &dyn ProgressStore, key: &str, default: u32) -> u32 {
    store
        .get_int(key)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}
