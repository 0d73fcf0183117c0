use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw slot I/O.
///
/// A backend holds named string slots ("customers", "invoices", ...). It knows
/// nothing about records: [`RecordStore`](super::RecordStore) does the
/// (de)serialization and list logic on top.
pub trait StorageBackend {
    /// Read the raw content of a slot. Returns Ok(None) if the slot was never
    /// written.
    fn read(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the content of a slot.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, slot: &str, content: &str) -> Result<()>;

    /// Where the slot lives. For FsBackend a real path, for MemBackend a
    /// virtual one.
    fn slot_path(&self, slot: &str) -> PathBuf;
}
