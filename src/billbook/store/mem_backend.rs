use super::backend::StorageBackend;
use crate::error::{BillbookError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since billbook is single-threaded,
/// which lets `StorageBackend` keep `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    slots: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to plant raw (possibly corrupt) content in a slot.
    pub fn put_raw(&self, slot: &str, content: &str) {
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), content.to_string());
    }

    pub fn raw(&self, slot: &str) -> Option<String> {
        self.slots.borrow().get(slot).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(slot).cloned())
    }

    fn write(&self, slot: &str, content: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(BillbookError::Store("Simulated write error".to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), content.to_string());
        Ok(())
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", slot))
    }
}
