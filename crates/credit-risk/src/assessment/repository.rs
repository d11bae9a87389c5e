use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::Assessment;
use super::summary::HistorySummary;

/// Append-only storage for completed assessments, shared across concurrent requests.
pub trait AssessmentRepository: Send + Sync {
    fn append(&self, assessment: Assessment) -> Result<(), RepositoryError>;
    /// Every stored assessment in insertion order.
    fn history(&self) -> Result<Vec<Assessment>, RepositoryError>;
    /// Removes every entry, returning how many were dropped.
    fn clear(&self) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("assessment log unavailable: {0}")]
    Unavailable(String),
}

/// In-process assessment log.
///
/// Appends are serialized by the lock, so concurrent evaluations never lose an entry.
/// Readers get a snapshot, never a live view.
#[derive(Debug, Default, Clone)]
pub struct AssessmentLog {
    entries: Arc<RwLock<Vec<Assessment>>>,
}

impl AssessmentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_assessments(&self.read())
    }

    // A panic while holding the lock cannot leave the Vec half-written, so poison is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Assessment>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Assessment>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AssessmentRepository for AssessmentLog {
    fn append(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        self.write().push(assessment);
        Ok(())
    }

    fn history(&self) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(self.read().clone())
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        let mut entries = self.write();
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}
