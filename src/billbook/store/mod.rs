//! # Storage Layer
//!
//! Two pieces:
//!
//! - [`backend::StorageBackend`]: raw named slots holding strings. The
//!   "how" of storage (filesystem vs memory).
//! - [`RecordStore`]: an ordered, most-recent-first list of one record type
//!   kept in a single slot. The "what": load, save, append, delete, replace.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production storage, one JSON file per slot
//! - [`mem_backend::MemBackend`]: in-memory storage for tests
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── customers.json           # JSON array of customers, newest first
//! ├── invoices.json            # JSON array of invoices, newest first
//! ├── customers.corrupt-<crc>.json  # raw copy of an unreadable slot
//! └── config.json
//! ```
//!
//! Every mutation loads the slot, changes the list and rewrites the whole slot.
//! There is no cache: each operation sees what is on disk.
//!
//! ## Corrupt Slots
//!
//! A slot that does not deserialize is treated as an empty list so the
//! application keeps working, but not silently: the raw text is copied to a
//! `<slot>.corrupt-<crc32>` backup before anything can overwrite it, a warning
//! is logged, and the returned value carries a [`Recovered`] note for the
//! caller to show. Backups are named after their content, so reading the same
//! broken slot twice reuses one backup while a later, different corruption
//! gets its own. A backup that cannot be written is logged and reported; the
//! load still succeeds.

use crate::error::{BillbookError, Result};
use crate::model::{IntoRecord, Namespace, Record, RecordId};
use std::marker::PhantomData;
use uuid::Uuid;
use std::path::PathBuf;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

use backend::StorageBackend;

/// Notice that a slot could not be read and was replaced by an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    pub namespace: Namespace,
    /// `None` when the backup itself could not be written.
    pub backup_slot: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Loaded<R> {
    pub records: Vec<R>,
    pub recovered: Option<Recovered>,
}

#[derive(Debug, Clone)]
pub struct Lookup<R> {
    pub record: Option<R>,
    pub recovered: Option<Recovered>,
}

#[derive(Debug, Clone)]
pub struct Appended<R> {
    pub record: R,
    pub recovered: Option<Recovered>,
}

#[derive(Debug, Clone)]
pub struct Removal<R> {
    pub removed: Vec<R>,
    pub recovered: Option<Recovered>,
}

impl<R> Removal<R> {
    pub fn count(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Replacement<R> {
    /// The record that was overwritten, `None` if the id was not present.
    pub previous: Option<R>,
    pub recovered: Option<Recovered>,
}

/// Case-insensitive substring match on the record's name. A blank needle
/// matches nothing.
pub fn name_matches<R: Record>(record: &R, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    !needle.is_empty() && record.name().to_lowercase().contains(&needle)
}

/// Persisted list of one record type on top of a backend slot.
pub struct RecordStore<'a, R, B> {
    backend: &'a B,
    _record: PhantomData<R>,
}

impl<'a, R: Record, B: StorageBackend> RecordStore<'a, R, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            _record: PhantomData,
        }
    }

    pub fn namespace(&self) -> Namespace {
        R::NAMESPACE
    }

    pub fn path(&self) -> PathBuf {
        self.backend.slot_path(R::NAMESPACE.key())
    }

    /// Reads the persisted list. A missing or blank slot is an empty list.
    pub fn load(&self) -> Result<Loaded<R>> {
        let slot = R::NAMESPACE.key();
        let raw = match self.backend.read(slot)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                return Ok(Loaded {
                    records: Vec::new(),
                    recovered: None,
                });
            }
        };

        match serde_json::from_str::<Vec<R>>(&raw) {
            Ok(records) => Ok(Loaded {
                records,
                recovered: None,
            }),
            Err(e) => {
                tracing::warn!(slot, error = %e, "unreadable slot, treating as empty");
                let backup_slot = self.back_up(slot, &raw);
                Ok(Loaded {
                    records: Vec::new(),
                    recovered: Some(Recovered {
                        namespace: R::NAMESPACE,
                        backup_slot,
                        reason: e.to_string(),
                    }),
                })
            }
        }
    }

    fn back_up(&self, slot: &str, raw: &str) -> Option<String> {
        let mut backup = format!("{}.corrupt-{:08x}", slot, crc32fast::hash(raw.as_bytes()));
        if let Ok(Some(existing)) = self.backend.read(&backup) {
            if existing == raw {
                return Some(backup);
            }
            backup = format!("{}-{}", backup, Uuid::new_v4().simple());
        }

        match self.backend.write(&backup, raw) {
            Ok(()) => {
                tracing::info!(slot, backup = %backup, "unreadable slot backed up");
                Some(backup)
            }
            Err(e) => {
                tracing::warn!(slot, backup = %backup, error = %e, "could not back up unreadable slot");
                None
            }
        }
    }

    /// Overwrites the whole slot with `records`.
    pub fn save(&self, records: &[R]) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(BillbookError::Serialization)?;
        self.backend.write(R::NAMESPACE.key(), &content)?;
        tracing::debug!(namespace = %R::NAMESPACE, count = records.len(), "records saved");
        Ok(())
    }

    /// Gives `new` a fresh id, puts it at the head of the list and saves.
    pub fn append<N: IntoRecord<Record = R>>(&self, new: N) -> Result<Appended<R>> {
        let Loaded {
            mut records,
            recovered,
        } = self.load()?;

        // Ids persisted by an earlier run may be ahead of this process' counter.
        let floor = records
            .iter()
            .filter_map(|r| r.id().as_millis())
            .max()
            .unwrap_or(0);
        let record = new.into_record(RecordId::generate_above(floor)?);

        records.insert(0, record.clone());
        self.save(&records)?;
        tracing::info!(namespace = %R::NAMESPACE, id = %record.id(), "record added");

        Ok(Appended { record, recovered })
    }

    pub fn find(&self, id: &RecordId) -> Result<Lookup<R>> {
        let Loaded { records, recovered } = self.load()?;
        Ok(Lookup {
            record: records.into_iter().find(|r| r.id() == id),
            recovered,
        })
    }

    /// Removes the record with `id`. An absent id leaves the slot untouched.
    pub fn delete_by_id(&self, id: &RecordId) -> Result<Removal<R>> {
        self.delete_where(|r| r.id() == id)
    }

    /// Removes every record matched by [`name_matches`].
    pub fn delete_by_name(&self, needle: &str) -> Result<Removal<R>> {
        self.delete_where(|r| name_matches(r, needle))
    }

    pub fn delete_where<P: Fn(&R) -> bool>(&self, predicate: P) -> Result<Removal<R>> {
        let Loaded { records, recovered } = self.load()?;
        let (removed, kept): (Vec<R>, Vec<R>) = records.into_iter().partition(|r| predicate(r));

        if !removed.is_empty() {
            self.save(&kept)?;
            tracing::info!(namespace = %R::NAMESPACE, count = removed.len(), "records deleted");
        }

        Ok(Removal { removed, recovered })
    }

    /// Overwrites the stored record that has the same id, keeping its position.
    pub fn replace(&self, record: R) -> Result<Replacement<R>> {
        let Loaded {
            mut records,
            recovered,
        } = self.load()?;

        let previous = match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => Some(std::mem::replace(slot, record)),
            None => None,
        };

        if previous.is_some() {
            self.save(&records)?;
        }

        Ok(Replacement {
            previous,
            recovered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::model::{Customer, Invoice, NewCustomer};

    fn customer(name: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            company: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn missing_slot_loads_empty() {
        let backend = MemBackend::new();
        let store = RecordStore::<Customer, _>::new(&backend);
        let loaded = store.load().unwrap();
        assert!(loaded.records.is_empty());
        assert!(loaded.recovered.is_none());
    }

    #[test]
    fn append_to_empty_store() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        let appended = store.append(customer("Jane", "jane@x.com")).unwrap();

        let records: Vec<Customer> = store.load().unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Jane");
        assert_eq!(records[0].id, appended.record.id);
        assert!(!records[0].id.as_str().is_empty());
    }

    #[test]
    fn append_puts_newest_first_exactly_once() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        store.append(customer("A", "a@x.com")).unwrap();
        store.append(customer("B", "b@x.com")).unwrap();
        let c = store.append(customer("C", "c@x.com")).unwrap().record;

        let records: Vec<Customer> = store.load().unwrap().records;
        assert_eq!(records[0], c);
        assert_eq!(records.iter().filter(|r| r.id == c.id).count(), 1);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn append_ids_stay_above_persisted_ids() {
        let backend = MemBackend::new();
        let far = chrono::Utc::now().timestamp_millis() + 5_000_000;
        backend.put_raw(
            "customers",
            &format!(r#"[{{"id":"{}","name":"Old","email":"old@x.com"}}]"#, far),
        );
        let store = RecordStore::<Customer, _>::new(&backend);
        let added = store.append(customer("New", "new@x.com")).unwrap().record;
        assert!(added.id.as_millis().unwrap() > far);
    }

    #[test]
    fn delete_by_id_is_idempotent() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        let jane = store.append(customer("Jane", "jane@x.com")).unwrap().record;
        store.append(customer("John", "john@x.com")).unwrap();

        let first = store.delete_by_id(&jane.id).unwrap();
        assert_eq!(first.count(), 1);
        let after_first = backend.raw("customers");

        let second = store.delete_by_id(&jane.id).unwrap();
        assert!(second.is_empty());
        assert_eq!(backend.raw("customers"), after_first);

        let records: Vec<Customer> = store.load().unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "John");
    }

    #[test]
    fn delete_by_name_is_case_insensitive_substring() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        store.append(customer("John Doe", "john@x.com")).unwrap();
        store.append(customer("Jane Doe", "jane@x.com")).unwrap();
        store.append(customer("Bob Smith", "bob@x.com")).unwrap();

        let removal = store.delete_by_name("DOE").unwrap();
        assert_eq!(removal.count(), 2);

        let records: Vec<Customer> = store.load().unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Bob Smith");
    }

    #[test]
    fn delete_by_name_zero_match_leaves_store_unchanged() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        store.append(customer("Jane", "jane@x.com")).unwrap();
        let before = backend.raw("customers");

        let removal = store.delete_by_name("zzz").unwrap();
        assert!(removal.is_empty());
        assert_eq!(backend.raw("customers"), before);

        assert!(store.delete_by_name("  ").unwrap().is_empty());
    }

    #[test]
    fn corrupt_slot_is_backed_up_and_loads_empty() {
        let backend = MemBackend::new();
        backend.put_raw("invoices", "{not json");
        let store = RecordStore::<Invoice, _>::new(&backend);

        let loaded = store.load().unwrap();
        assert!(loaded.records.is_empty());
        let recovered = loaded.recovered.unwrap();
        assert_eq!(recovered.namespace, Namespace::Invoices);
        let backup = recovered.backup_slot.unwrap();
        assert!(backup.starts_with("invoices.corrupt-"));
        assert_eq!(backend.raw(&backup).as_deref(), Some("{not json"));
    }

    #[test]
    fn rereading_same_corruption_reuses_backup() {
        let backend = MemBackend::new();
        backend.put_raw("invoices", "{not json");
        let store = RecordStore::<Invoice, _>::new(&backend);

        let first = store.load().unwrap().recovered.unwrap().backup_slot;
        let second = store.load().unwrap().recovered.unwrap().backup_slot;
        assert_eq!(first, second);
    }

    #[test]
    fn second_corruption_keeps_first_backup() {
        let backend = MemBackend::new();
        let store = RecordStore::<Customer, _>::new(&backend);

        backend.put_raw("customers", "[first");
        let first = store.load().unwrap().recovered.unwrap().backup_slot.unwrap();
        backend.put_raw("customers", "[second");
        let second = store.load().unwrap().recovered.unwrap().backup_slot.unwrap();

        assert_ne!(first, second);
        assert_eq!(backend.raw(&first).as_deref(), Some("[first"));
        assert_eq!(backend.raw(&second).as_deref(), Some("[second"));
    }

    #[test]
    fn failed_backup_still_loads_empty() {
        let backend = MemBackend::new();
        backend.put_raw("customers", "garbage");
        backend.set_simulate_write_error(true);
        let store = RecordStore::<Customer, _>::new(&backend);

        let loaded = store.load().unwrap();
        assert!(loaded.records.is_empty());
        let recovered = loaded.recovered.unwrap();
        assert_eq!(recovered.backup_slot, None);
        assert_eq!(backend.raw("customers").as_deref(), Some("garbage"));
    }

    #[test]
    fn find_reports_recovery() {
        let backend = MemBackend::new();
        backend.put_raw("customers", "[oops");
        let store = RecordStore::<Customer, _>::new(&backend);

        let lookup = store.find(&RecordId::new("1")).unwrap();
        assert!(lookup.record.is_none());
        assert!(lookup.recovered.is_some());
    }

    #[test]
    fn append_fails_when_ids_are_exhausted() {
        let backend = MemBackend::new();
        backend.put_raw(
            "customers",
            &format!(r#"[{{"id":"{}","name":"Old","email":"old@x.com"}}]"#, i64::MAX),
        );
        let before = backend.raw("customers");
        let store = RecordStore::<Customer, _>::new(&backend);

        assert!(matches!(
            store.append(customer("New", "new@x.com")),
            Err(BillbookError::Store(_))
        ));
        assert_eq!(backend.raw("customers"), before);
    }

    #[test]
    fn append_after_corruption_keeps_backup() {
        let backend = MemBackend::new();
        backend.put_raw("customers", "[oops");
        let store = RecordStore::new(&backend);

        let appended = store.append(customer("Jane", "jane@x.com")).unwrap();
        let backup = appended.recovered.unwrap().backup_slot.unwrap();
        assert_eq!(backend.raw(&backup).as_deref(), Some("[oops"));

        let loaded: Loaded<Customer> = store.load().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.recovered.is_none());
    }

    #[test]
    fn write_failure_leaves_slot_unchanged() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        store.append(customer("Jane", "jane@x.com")).unwrap();
        let before = backend.raw("customers");

        backend.set_simulate_write_error(true);
        assert!(store.append(customer("John", "john@x.com")).is_err());
        backend.set_simulate_write_error(false);

        assert_eq!(backend.raw("customers"), before);
    }

    #[test]
    fn replace_overwrites_in_place() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        let jane = store.append(customer("Jane", "jane@x.com")).unwrap().record;
        store.append(customer("John", "john@x.com")).unwrap();

        let mut updated = jane.clone();
        updated.email = "jane@new.com".to_string();
        let replacement = store.replace(updated.clone()).unwrap();
        assert_eq!(replacement.previous, Some(jane));

        let records: Vec<Customer> = store.load().unwrap().records;
        assert_eq!(records[1], updated);
    }

    #[test]
    fn replace_unknown_id_is_not_found() {
        let backend = MemBackend::new();
        let store = RecordStore::new(&backend);
        store.append(customer("Jane", "jane@x.com")).unwrap();
        let ghost = customer("Ghost", "g@x.com").into_record(RecordId::new("nope"));

        let replacement = store.replace(ghost).unwrap();
        assert!(replacement.previous.is_none());
        assert_eq!(store.load().unwrap().records.len(), 1);
    }
}
