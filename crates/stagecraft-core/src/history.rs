//! Snapshot-based undo/redo history.
//!
//! The undo stack always holds the current state on top, with the level as
//! first loaded at the bottom. Snapshot encoding is isolated behind
//! [`SnapshotCodec`] so the representation can change without touching the
//! editing engine.

use crate::level::Level;
use thiserror::Error;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// History errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Converts levels to and from stored snapshots.
pub trait SnapshotCodec {
    type Snapshot: Clone;

    fn encode(&self, level: &Level) -> Result<Self::Snapshot, HistoryError>;
    fn decode(&self, snapshot: &Self::Snapshot) -> Result<Level, HistoryError>;
}

/// Whole-level JSON snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SnapshotCodec for JsonCodec {
    type Snapshot = String;

    fn encode(&self, level: &Level) -> Result<String, HistoryError> {
        serde_json::to_string(level).map_err(|e| HistoryError::Encode(e.to_string()))
    }

    fn decode(&self, snapshot: &String) -> Result<Level, HistoryError> {
        serde_json::from_str(snapshot).map_err(|e| HistoryError::MalformedSnapshot(e.to_string()))
    }
}

/// Bounded linear undo/redo history.
#[derive(Debug, Clone)]
pub struct HistoryManager<C: SnapshotCodec = JsonCodec> {
    codec: C,
    capacity: usize,
    undo_stack: Vec<C::Snapshot>,
    redo_stack: Vec<C::Snapshot>,
}

impl Default for HistoryManager<JsonCodec> {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl HistoryManager<JsonCodec> {
    /// JSON-backed history keeping at most `capacity` undo states.
    pub fn new(capacity: usize) -> Self {
        Self::with_codec(JsonCodec, capacity)
    }
}

impl<C: SnapshotCodec> HistoryManager<C> {
    pub fn with_codec(codec: C, capacity: usize) -> Self {
        Self {
            codec,
            capacity: capacity.max(1),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Drop all history and record `level` as the initial state.
    pub fn reset(&mut self, level: &Level) -> Result<(), HistoryError> {
        let snapshot = self.codec.encode(level)?;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);
        Ok(())
    }

    /// Record a committed state. Clears redo history and drops the oldest
    /// state beyond capacity. Nothing changes if encoding fails.
    pub fn commit(&mut self, level: &Level) -> Result<(), HistoryError> {
        let snapshot = self.codec.encode(level)?;
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.capacity {
            let excess = self.undo_stack.len() - self.capacity;
            self.undo_stack.drain(..excess);
        }
        log::debug!(
            "History commit: {} undo state(s), redo cleared",
            self.undo_stack.len()
        );
        Ok(())
    }

    /// Step back one state. Returns `Ok(None)` when only the initial state
    /// remains. A snapshot that fails to decode leaves both stacks untouched.
    pub fn undo(&mut self) -> Result<Option<Level>, HistoryError> {
        if self.undo_stack.len() <= 1 {
            return Ok(None);
        }
        let previous = &self.undo_stack[self.undo_stack.len() - 2];
        let level = self.codec.decode(previous).inspect_err(|e| {
            log::warn!("Undo aborted: {}", e);
        })?;
        if let Some(current) = self.undo_stack.pop() {
            self.redo_stack.push(current);
        }
        Ok(Some(level))
    }

    /// Step forward one state. Returns `Ok(None)` when nothing was undone.
    pub fn redo(&mut self) -> Result<Option<Level>, HistoryError> {
        let Some(next) = self.redo_stack.last() else {
            return Ok(None);
        };
        let level = self.codec.decode(next).inspect_err(|e| {
            log::warn!("Redo aborted: {}", e);
        })?;
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(snapshot);
        }
        Ok(Some(level))
    }

    /// Decode the latest committed state.
    pub fn current(&self) -> Result<Option<Level>, HistoryError> {
        self.undo_stack
            .last()
            .map(|snapshot| self.codec.decode(snapshot))
            .transpose()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
