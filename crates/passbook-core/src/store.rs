//! Keyed storage for statement processing jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::{ProcessingOutcome, StatusRecord};

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// One uploaded statement and, once finished, its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub file_name: String,
    pub status: JobStatus,
    /// Percentage, 0 to 100.
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ProcessingOutcome>,
}

impl JobRecord {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            status: JobStatus::Queued,
            progress: 0,
            created_at: Utc::now(),
            outcome: None,
        }
    }

    /// Mark the job as running.
    pub fn start(&mut self) {
        self.status = JobStatus::Processing;
        self.progress = 10;
    }

    /// Attach the outcome; failed outcomes fail the job.
    pub fn finish(&mut self, outcome: ProcessingOutcome) {
        self.status = if outcome.success {
            JobStatus::Completed
        } else {
            JobStatus::Failed
        };
        self.progress = 100;
        self.outcome = Some(outcome);
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }

    /// Status record of a finished job.
    pub fn status_record(&self) -> Option<StatusRecord> {
        self.outcome.as_ref().map(ProcessingOutcome::status)
    }
}

/// Storage for job records, keyed by job id.
pub trait JobStore: Send + Sync {
    fn get(&self, id: &str) -> Option<JobRecord>;

    /// Insert or replace a record.
    fn put(&self, record: JobRecord);

    fn delete(&self, id: &str) -> Option<JobRecord>;

    /// All records, oldest first.
    fn list(&self) -> Vec<JobRecord>;
}

/// Process-lifetime in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryJobStore {
    inner: Arc<RwLock<HashMap<String, JobRecord>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to a stored record in place. Returns false if absent.
    pub fn update<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut jobs = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match jobs.get_mut(id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobStore for MemoryJobStore {
    fn get(&self, id: &str) -> Option<JobRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn put(&self, record: JobRecord) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record);
    }

    fn delete(&self, id: &str) -> Option<JobRecord> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    fn list(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        records
    }
}
