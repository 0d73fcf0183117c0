use super::backend::StorageBackend;
use crate::error::{BillbookError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One pretty-printed JSON file per slot inside the data directory.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BillbookError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(BillbookError::Io)?;
        Ok(Some(content))
    }

    fn write(&self, slot: &str, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.slot_path(slot);

        let tmp_file = self.root.join(format!(".{}-{}.tmp", slot, Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(BillbookError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &target) {
            let _ = fs::remove_file(&tmp_file);
            return Err(BillbookError::Io(e));
        }
        tracing::debug!(path = %target.display(), bytes = content.len(), "slot written");
        Ok(())
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{}.json", slot))
    }
}
