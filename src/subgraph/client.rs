//! GraphQL-over-HTTP client for the protocol metrics subgraph.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{MetricsQuery, MetricsSource, SourceError};
use crate::domain::ProtocolMetric;

/// Longest response body kept in a [`SourceError::BadResponse`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Variables,
}

#[derive(Debug, Serialize)]
struct Variables {
    records: u32,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolMetricsData {
    protocol_metrics: Vec<ProtocolMetric>,
}

/// Subgraph client posting `{query, variables}` documents.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SubgraphClient {
    /// Creates a client for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Network`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MetricsSource for SubgraphClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_protocol_metrics(
        &self,
        query: MetricsQuery,
        count: u32,
        endpoint: Option<&str>,
    ) -> Result<Vec<ProtocolMetric>, SourceError> {
        let url = endpoint.unwrap_or(&self.endpoint);
        tracing::debug!(query = query.name(), count, url, "querying subgraph");

        let request = GraphQlRequest {
            query: query.document(),
            variables: Variables { records: count },
        };
        let response = self.http.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(SourceError::BadResponse {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GraphQlResponse<ProtocolMetricsData> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        if !payload.errors.is_empty() {
            let messages: Vec<String> = payload.errors.into_iter().map(|e| e.message).collect();
            return Err(SourceError::GraphQl(messages.join("; ")));
        }

        let data = payload
            .data
            .ok_or_else(|| SourceError::Parse("response carries no data".to_string()))?;
        tracing::debug!(
            query = query.name(),
            periods = data.protocol_metrics.len(),
            "subgraph query complete"
        );
        Ok(data.protocol_metrics)
    }
}
