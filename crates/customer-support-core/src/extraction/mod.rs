//! # Question/Answer Extraction
//!
//! Pulls historical support conversations out of the analytical warehouse as
//! [`QaPair`] records, the input for a future retrieval-index build.
//!
//! The warehouse itself sits behind [`WarehouseClient`]; no concrete client
//! ships with this crate. Two sources are provided:
//! - [`WarehouseExtractionService`] runs the query through an injected client
//!   and falls back to a fixed mock record when that fails
//! - [`MockExtractionService`] never touches a client and always returns the
//!   mock record
//!
//! None of the HTTP routes call into this module.

use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod mock;
pub mod warehouse;

pub use mock::MockExtractionService;
pub use warehouse::WarehouseExtractionService;

/// Placeholder substituted with the quoted start date
pub const START_DATE_PLACEHOLDER: &str = "@start_date";

/// Date used when callers do not supply one
pub const DEFAULT_START_DATE: &str = "2024-01-01";

const BUNDLED_QA_QUERY: &str = include_str!("../../queries/extract-qa-pairs.sql");

/// Named query parameters forwarded to the warehouse
pub type QueryParams = HashMap<String, Value>;

// ============================================================================
// Records
// ============================================================================

/// A customer question paired with the support team's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub thread_id: String,
    /// ISO-8601 datetime
    pub timestamp: String,
    pub query: String,
    pub response: String,
    pub metadata: QaMetadata,
}

/// Provenance of a [`QaPair`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaMetadata {
    pub query_id: String,
    pub response_id: String,
    pub query_time: String,
    pub response_time: String,
    pub response_delay_days: f64,
}

/// The fixed record returned whenever the warehouse cannot be used
pub fn mock_qa_pair() -> QaPair {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    QaPair {
        thread_id: "mock-thread-1".to_string(),
        timestamp: now.clone(),
        query: "サンプル質問：相続登記について教えてください".to_string(),
        response: "サンプル回答：相続登記は...".to_string(),
        metadata: QaMetadata {
            query_id: "mock-q1".to_string(),
            response_id: "mock-r1".to_string(),
            query_time: now.clone(),
            response_time: now,
            response_delay_days: 0.0,
        },
    }
}

// ============================================================================
// Start date
// ============================================================================

/// Lower bound for extracted conversations, as a calendar date
///
/// Only well-formed `YYYY-MM-DD` dates can be constructed, which keeps the
/// value safe to inline into query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StartDate(NaiveDate);

impl StartDate {
    /// Parse an ISO calendar date
    pub fn parse(value: &str) -> Result<Self, ExtractionError> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ExtractionError::InvalidStartDate {
                value: value.to_string(),
            })
    }

    /// Quoted literal suitable for substitution into query text
    pub fn as_sql_literal(&self) -> String {
        format!("'{}'", self)
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl Default for StartDate {
    fn default() -> Self {
        // 2024-01-01 is always a valid date.
        Self(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default())
    }
}

impl fmt::Display for StartDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for StartDate {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Query template
// ============================================================================

/// Parameterized query text with an `@start_date` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
}

impl QueryTemplate {
    /// The query bundled with this crate
    pub fn bundled() -> Self {
        Self {
            text: BUNDLED_QA_QUERY.to_string(),
        }
    }

    /// Build a template from arbitrary text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a template file
    pub async fn load(path: &Path) -> Result<Self, ExtractionError> {
        let text =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ExtractionError::Template {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
        Ok(Self { text })
    }

    /// Load from `path` when given, otherwise use the bundled query
    pub async fn resolve(path: Option<&Path>) -> Result<Self, ExtractionError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::bundled()),
        }
    }

    /// Substitute every placeholder with the quoted start date
    pub fn render(&self, start_date: &StartDate) -> String {
        self.text
            .replace(START_DATE_PLACEHOLDER, &start_date.as_sql_literal())
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// First `max_chars` characters of `text`, for log previews
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings for reaching the analytical warehouse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Warehouse project to run queries in
    pub project_id: String,

    /// Service account key file for the warehouse client
    pub key_filename: Option<String>,

    /// Override for the bundled query template
    pub template_path: Option<PathBuf>,
}

// ============================================================================
// Errors
// ============================================================================

/// Failures reported by a [`WarehouseClient`]
#[derive(Debug, Clone, thiserror::Error)]
pub enum WarehouseError {
    #[error("Query execution failed: {message}")]
    QueryFailed { message: String },

    #[error("Warehouse unavailable: {message}")]
    Unavailable { message: String },
}

/// Failures while extracting QA pairs
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid start date '{value}': expected YYYY-MM-DD")]
    InvalidStartDate { value: String },

    #[error("Failed to load query template {}: {message}", path.display())]
    Template { path: PathBuf, message: String },

    #[error("Warehouse client not configured")]
    ClientNotConfigured,

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("Row could not be mapped to a QA pair: {message}")]
    RowMapping { message: String },
}

// ============================================================================
// Traits
// ============================================================================

/// Executes queries against the analytical warehouse
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Run `sql` with named parameters and return raw result rows
    async fn query(&self, sql: &str, params: &QueryParams) -> Result<Vec<Value>, WarehouseError>;
}

/// Produces QA pairs for retrieval-index builds
#[async_trait]
pub trait QaPairSource: Send + Sync {
    /// Extract pairs for conversations starting on or after `start_date`
    async fn extract_qa_pairs(&self, start_date: &StartDate) -> Result<Vec<QaPair>, ExtractionError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
