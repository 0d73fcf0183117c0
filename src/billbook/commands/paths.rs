use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::{Customer, Invoice};
use crate::store::RecordStore;
use crate::store::backend::StorageBackend;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BillbookPaths {
    pub data_dir: PathBuf,
}

impl BillbookPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}

/// Where each store and the config live.
pub fn run<B: StorageBackend>(backend: &B, paths: &BillbookPaths) -> Result<CmdResult> {
    Ok(CmdResult::default().with_paths(vec![
        RecordStore::<Customer, _>::new(backend).path(),
        RecordStore::<Invoice, _>::new(backend).path(),
        paths.config_file(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn lists_store_and_config_paths() {
        let backend = MemBackend::new();
        let paths = BillbookPaths::new(PathBuf::from("/data"));
        let result = run(&backend, &paths).unwrap();
        assert_eq!(
            result.paths,
            vec![
                PathBuf::from("memory://customers"),
                PathBuf::from("memory://invoices"),
                PathBuf::from("/data/config.json"),
            ]
        );
    }
}
