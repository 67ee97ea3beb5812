//! Persistence boundary.
//!
//! The core never instantiates prefabs or talks to the undo stack itself; a
//! finished stroke is handed to a [`PlacementSink`] as one batch under its
//! stroke id, and the sink owns instantiation, undo registration, and scene
//! persistence.

use placement::types::{PrefabId, ResolvedTransform, StrokeId};
use serde::{Deserialize, Serialize};

/// Error type for commit operations.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("empty batch for stroke {0:?}")]
    EmptyBatch(StrokeId),
    #[error("sink rejected stroke {stroke:?}: {reason}")]
    Rejected { stroke: StrokeId, reason: String },
}

/// Receiver of finalized transform batches.
pub trait PlacementSink {
    /// Persist one stroke's worth of placements.
    fn commit_batch(
        &mut self,
        stroke: StrokeId,
        transforms: &[ResolvedTransform],
        prefab: PrefabId,
    ) -> Result<(), CommitError>;
}

/// One recorded batch, as a [`MemorySink`] stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommittedBatch {
    pub stroke: StrokeId,
    pub prefab: PrefabId,
    pub transforms: Vec<ResolvedTransform>,
}

/// In-memory sink for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<CommittedBatch>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_placements(&self) -> usize {
        self.batches.iter().map(|b| b.transforms.len()).sum()
    }
}

impl PlacementSink for MemorySink {
    fn commit_batch(
        &mut self,
        stroke: StrokeId,
        transforms: &[ResolvedTransform],
        prefab: PrefabId,
    ) -> Result<(), CommitError> {
        if transforms.is_empty() {
            return Err(CommitError::EmptyBatch(stroke));
        }
        self.batches.push(CommittedBatch {
            stroke,
            prefab,
            transforms: transforms.to_vec(),
        });
        Ok(())
    }
}
