//! Client-free QA pair source for local development.

use super::{
    mock_qa_pair, preview, ExtractionConfig, ExtractionError, QaPair, QaPairSource, QueryParams,
    QueryTemplate, StartDate,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

/// Renders the extraction query but never runs it
#[derive(Debug, Clone, Default)]
pub struct MockExtractionService {
    config: ExtractionConfig,
}

impl MockExtractionService {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Always fails: there is no client to forward to
    pub async fn execute_query(
        &self,
        query: &str,
        _params: &QueryParams,
    ) -> Result<Vec<Value>, ExtractionError> {
        info!(query = %preview(query, 100), "Executing query");
        Err(ExtractionError::ClientNotConfigured)
    }
}

#[async_trait]
impl QaPairSource for MockExtractionService {
    async fn extract_qa_pairs(
        &self,
        start_date: &StartDate,
    ) -> Result<Vec<QaPair>, ExtractionError> {
        let template = QueryTemplate::resolve(self.config.template_path.as_deref()).await?;
        let query = template.render(start_date);

        info!(
            start_date = %start_date,
            project_id = %self.config.project_id,
            "Would execute warehouse query"
        );
        info!(query = %preview(&query, 200), "Query preview");

        Ok(vec![mock_qa_pair()])
    }
}
