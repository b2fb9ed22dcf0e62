//! Ephemeral in-memory sources.
//!
//! A `Blob` is acquired when bytes are imported (e.g. from stdin) and is
//! released when its last holder drops it. The `BlobStore` only keeps the
//! bookkeeping (which ids are live and how many bytes they hold).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::model::SourceUrl;

#[derive(Default)]
struct BlobTable {
    next_id: u64,
    live: BTreeMap<u64, usize>,
}

#[derive(Clone, Default)]
pub struct BlobStore {
    table: Arc<Mutex<BlobTable>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and hand out the owning `Blob`.
    pub fn insert(&self, bytes: Vec<u8>) -> Blob {
        let mut table = lock(&self.table);
        table.next_id += 1;
        let id = table.next_id;
        table.live.insert(id, bytes.len());
        drop(table);

        log::debug!("acquired blob {id} ({} bytes)", bytes.len());
        Blob(Arc::new(BlobInner {
            id,
            bytes: Arc::from(bytes),
            table: Arc::downgrade(&self.table),
        }))
    }

    /// Number of blobs still held somewhere.
    pub fn live(&self) -> usize {
        lock(&self.table).live.len()
    }

    pub fn live_bytes(&self) -> usize {
        lock(&self.table).live.values().sum()
    }
}

fn lock(table: &Mutex<BlobTable>) -> MutexGuard<'_, BlobTable> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct BlobInner {
    id: u64,
    bytes: Arc<[u8]>,
    table: Weak<Mutex<BlobTable>>,
}

impl Drop for BlobInner {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            lock(&table).live.remove(&self.id);
        }
        log::debug!("released blob {}", self.id);
    }
}

#[derive(Clone)]
pub struct Blob(Arc<BlobInner>);

impl Blob {
    pub fn url(&self) -> SourceUrl {
        SourceUrl::from(format!("blob:turntable/{}", self.0.id))
    }

    /// Shared view of the bytes; decoders read through this.
    pub fn bytes(&self) -> Arc<[u8]> {
        self.0.bytes.clone()
    }

    pub fn len(&self) -> usize {
        self.0.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.bytes.is_empty()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("id", &self.0.id)
            .field("len", &self.0.bytes.len())
            .finish()
    }
}
