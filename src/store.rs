//! Key store and its backends.
//!
//! This module provides:
//! - `KeyBackend`: the persistence seam (JSON file in production, memory in tests)
//! - `KeyStore`: the single shared store, guarding its backend with one exclusive lock
//! - `LockedStore`: the guard a caller holds for a whole load-decide-save cycle
//!
//! # Consistency
//!
//! The store is coarse-grained on purpose: one mutex covers every record.
//! Any read that feeds a conditional write must happen under the same
//! `LockedStore`, otherwise two requests can both observe an unbound key and
//! both bind it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::models::key_record::KeyRecord;

/// Type alias for the store shared across handlers.
pub type SharedStore = Arc<KeyStore>;

/// Persistence backend for key records.
///
/// `load` returns `Ok(vec![])` when nothing has been stored yet; an error
/// means something exists but cannot be used. `save` replaces the whole
/// record list in one all-or-nothing operation.
pub trait KeyBackend: Send {
    fn load(&mut self) -> Result<Vec<KeyRecord>, StoreError>;

    fn save(&mut self, records: &[KeyRecord]) -> Result<(), StoreError>;
}

/// Keys file backend.
///
/// The file holds a JSON array of key records, pretty-printed with a
/// 4-space indent. Saves write a temp file in the same directory, sync it,
/// then persist it over the target so readers never see a partially written file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn encode(records: &[KeyRecord]) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records
            .serialize(&mut serializer)
            .map_err(StoreError::Encode)?;
        Ok(buf)
    }

    fn write_replace(&self, payload: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        // Same directory as the target so the final rename stays atomic;
        // the temp file is removed on drop if anything below fails
        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(payload)?;
        temp_file.as_file().sync_all()?;

        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Vec<KeyRecord>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Read(e)),
        };

        serde_json::from_slice(&bytes).map_err(StoreError::Corrupt)
    }

    fn save(&mut self, records: &[KeyRecord]) -> Result<(), StoreError> {
        let payload = Self::encode(records)?;
        self.write_replace(&payload).map_err(StoreError::Write)
    }
}

/// Shared load/save counters of a `MemoryBackend`.
///
/// Cloned out before the backend is moved into a `KeyStore`, so tests can
/// assert how often the store was touched.
#[derive(Debug, Clone, Default)]
pub struct AccessCounters {
    loads: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl AccessCounters {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Vec<KeyRecord>,
    counters: AccessCounters,
}

impl MemoryBackend {
    pub fn new(records: Vec<KeyRecord>) -> Self {
        Self {
            records,
            counters: AccessCounters::default(),
        }
    }

    pub fn counters(&self) -> AccessCounters {
        self.counters.clone()
    }
}

impl KeyBackend for MemoryBackend {
    fn load(&mut self) -> Result<Vec<KeyRecord>, StoreError> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[KeyRecord]) -> Result<(), StoreError> {
        self.counters.saves.fetch_add(1, Ordering::SeqCst);
        self.records = records.to_vec();
        Ok(())
    }
}

/// The key store.
///
/// Constructed once at startup and shared as [`SharedStore`]. All access to
/// the backend goes through the internal mutex.
pub struct KeyStore {
    backend: Mutex<Box<dyn KeyBackend>>,
}

impl KeyStore {
    pub fn new(backend: impl KeyBackend + 'static) -> Self {
        Self {
            backend: Mutex::new(Box::new(backend)),
        }
    }

    /// Acquire the exclusive lock.
    ///
    /// Blocks until no other caller holds it. The lock is released when the
    /// returned guard is dropped.
    pub fn lock(&self) -> Result<LockedStore<'_>, StoreError> {
        let backend = self.backend.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(LockedStore { backend })
    }

    /// Load every record, treating an unusable store as empty.
    pub fn load_all(&self) -> Vec<KeyRecord> {
        match self.lock() {
            Ok(mut locked) => locked.load_all(),
            Err(e) => {
                tracing::error!(error = %e, "cannot lock key store for reading");
                Vec::new()
            }
        }
    }

    /// Replace every record. Returns `false` if the write failed.
    pub fn save_all(&self, records: &[KeyRecord]) -> bool {
        self.lock()
            .and_then(|mut locked| locked.save_all(records))
            .is_ok()
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore").finish_non_exhaustive()
    }
}

/// Exclusive access to the key store.
pub struct LockedStore<'a> {
    backend: MutexGuard<'a, Box<dyn KeyBackend>>,
}

impl LockedStore<'_> {
    /// Load every record, reporting why the store could not be read.
    pub fn try_load_all(&mut self) -> Result<Vec<KeyRecord>, StoreError> {
        self.backend.load()
    }

    /// Load every record; an unreadable or corrupt store is logged and
    /// treated as empty.
    pub fn load_all(&mut self) -> Vec<KeyRecord> {
        self.try_load_all().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "key store unusable, treating as empty");
            Vec::new()
        })
    }

    /// Replace every record in one operation.
    pub fn save_all(&mut self, records: &[KeyRecord]) -> Result<(), StoreError> {
        self.backend.save(records).inspect_err(|e| {
            tracing::error!(error = %e, "failed to save key records");
        })
    }
}
