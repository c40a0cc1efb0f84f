//! Shared record of which chunks are absent, pending or resident.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use parking_lot::RwLock;
use voxcraft_core::{ChunkCoord, ChunkKey};

use crate::chunk::Chunk;

/// Lifecycle state of a chunk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChunkState {
    /// Never requested, or unloaded.
    #[default]
    Absent,
    /// A worker is building it.
    Pending,
    /// Installed and editable.
    Resident,
}

/// Bookkeeping for a chunk that is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    /// Monotonic request number.
    pub ticket: u64,
    /// When the load was requested.
    pub requested_at: Instant,
}

#[derive(Debug)]
enum ChunkEntry {
    Pending(PendingLoad),
    Resident(Chunk),
}

/// Thread-safe chunk table keyed by packed chunk coordinates.
///
/// A coordinate moves `Absent -> Pending -> Resident` and back to `Absent`
/// only through [`ChunkStore::unload`]. There is no way to cancel a pending
/// load.
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: RwLock<HashMap<ChunkKey, ChunkEntry>>,
    next_ticket: AtomicU64,
}

impl ChunkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically mark `coord` pending if it is absent.
    ///
    /// Returns the pending record on success, `None` if the chunk is already
    /// pending or resident, or if the coordinate cannot be packed.
    pub fn begin_load(&self, coord: ChunkCoord) -> Option<PendingLoad> {
        let key = match ChunkKey::try_from(coord) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!("Refusing to load chunk: {err}");
                return None;
            }
        };

        let mut chunks = self.chunks.write();
        if chunks.contains_key(&key) {
            return None;
        }

        let pending = PendingLoad {
            ticket: self.next_ticket.fetch_add(1, Ordering::Relaxed),
            requested_at: Instant::now(),
        };
        chunks.insert(key, ChunkEntry::Pending(pending));
        tracing::debug!(?coord, ticket = pending.ticket, "Chunk pending");
        Some(pending)
    }

    /// Atomically mark `coord` pending if it is absent.
    pub fn try_begin_load(&self, coord: ChunkCoord) -> bool {
        self.begin_load(coord).is_some()
    }

    /// Install a built chunk, moving it from pending to resident.
    ///
    /// Returns how long the chunk was pending.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is not pending. Only the scheduler that won
    /// [`ChunkStore::try_begin_load`] may complete a load.
    pub fn complete_load(&self, coord: ChunkCoord, chunk: Chunk) -> Duration {
        let key = ChunkKey::try_from(coord)
            .unwrap_or_else(|err| panic!("complete_load on unpackable chunk: {err}"));

        let mut chunks = self.chunks.write();
        let pending = match chunks.get(&key) {
            Some(ChunkEntry::Pending(pending)) => *pending,
            _ => panic!("complete_load on chunk {coord:?} that is not pending"),
        };
        chunks.insert(key, ChunkEntry::Resident(chunk));

        let latency = pending.requested_at.elapsed();
        let ticket = pending.ticket;
        tracing::debug!(?coord, ticket, ?latency, "Chunk resident");
        latency
    }

    /// Remove a resident chunk.
    ///
    /// Pending entries are left untouched; absent coordinates return `None`.
    pub fn unload(&self, coord: ChunkCoord) -> Option<Chunk> {
        let key = ChunkKey::try_from(coord).ok()?;
        let mut chunks = self.chunks.write();
        if !matches!(chunks.get(&key), Some(ChunkEntry::Resident(_))) {
            return None;
        }
        match chunks.remove(&key) {
            Some(ChunkEntry::Resident(chunk)) => {
                tracing::debug!(?coord, "Chunk unloaded");
                Some(chunk)
            }
            _ => None,
        }
    }

    /// Current state of `coord`.
    pub fn state(&self, coord: ChunkCoord) -> ChunkState {
        let Ok(key) = ChunkKey::try_from(coord) else {
            return ChunkState::Absent;
        };
        match self.chunks.read().get(&key) {
            None => ChunkState::Absent,
            Some(ChunkEntry::Pending(_)) => ChunkState::Pending,
            Some(ChunkEntry::Resident(_)) => ChunkState::Resident,
        }
    }

    /// Check if a chunk is installed.
    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.state(coord) == ChunkState::Resident
    }

    /// Check if a chunk is being built.
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.state(coord) == ChunkState::Pending
    }

    /// Execute a function with read access to a resident chunk.
    ///
    /// Returns `None` if the chunk isn't resident.
    pub fn with_chunk<F, R>(&self, coord: ChunkCoord, f: F) -> Option<R>
    where
        F: FnOnce(&Chunk) -> R,
    {
        let key = ChunkKey::try_from(coord).ok()?;
        let chunks = self.chunks.read();
        match chunks.get(&key) {
            Some(ChunkEntry::Resident(chunk)) => Some(f(chunk)),
            _ => None,
        }
    }

    /// Execute a function with write access to a resident chunk.
    ///
    /// Returns `None` if the chunk isn't resident.
    pub fn with_chunk_mut<F, R>(&self, coord: ChunkCoord, f: F) -> Option<R>
    where
        F: FnOnce(&mut Chunk) -> R,
    {
        let key = ChunkKey::try_from(coord).ok()?;
        let mut chunks = self.chunks.write();
        match chunks.get_mut(&key) {
            Some(ChunkEntry::Resident(chunk)) => Some(f(chunk)),
            _ => None,
        }
    }

    /// Coordinates of every resident chunk, in no particular order.
    pub fn resident_coords(&self) -> Vec<ChunkCoord> {
        self.chunks
            .read()
            .iter()
            .filter(|(_, entry)| matches!(entry, ChunkEntry::Resident(_)))
            .map(|(key, _)| key.coord())
            .collect()
    }

    /// Number of chunks being built.
    pub fn pending_count(&self) -> usize {
        self.chunks
            .read()
            .values()
            .filter(|entry| matches!(entry, ChunkEntry::Pending(_)))
            .count()
    }

    /// Number of installed chunks.
    pub fn resident_count(&self) -> usize {
        self.chunks
            .read()
            .values()
            .filter(|entry| matches!(entry, ChunkEntry::Resident(_)))
            .count()
    }

    /// Number of pending and resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// Check if nothing is pending or resident.
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }
}
