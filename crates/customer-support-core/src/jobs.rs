//! # Refresh Jobs
//!
//! Handles for retrieval-index refresh jobs.
//!
//! A [`JobHandle`] is an opaque identifier handed back to callers when a
//! refresh is requested. Nothing is scheduled behind it and it cannot be
//! looked up later.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Opaque identifier for a refresh job
///
/// Renders as a canonical lowercase hyphenated UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(Uuid);

impl JobHandle {
    /// Generate a new random job handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for JobHandle {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Errors raised while starting a refresh job
#[derive(Debug, Clone, thiserror::Error)]
pub enum TriggerError {
    #[error("Failed to start refresh job: {message}")]
    StartFailed { message: String },
}

/// Starts retrieval-index refresh jobs
#[async_trait]
pub trait RefreshJobTrigger: Send + Sync {
    /// Request a refresh and return its handle immediately
    async fn start_refresh(&self) -> Result<JobHandle, TriggerError>;
}

/// Trigger that only issues a handle
///
/// Fetching from the warehouse, redaction and index updates are not wired
/// yet, so the handle is logged and returned with no work behind it.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRefreshTrigger;

#[async_trait]
impl RefreshJobTrigger for PlaceholderRefreshTrigger {
    async fn start_refresh(&self) -> Result<JobHandle, TriggerError> {
        let job_id = JobHandle::new();
        info!(job_id = %job_id, "Starting RAG update job");
        Ok(job_id)
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
