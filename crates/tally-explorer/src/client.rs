use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use tally_core::config::ExplorerConfig;
use tally_core::types::{ExpectedRecord, SchedulerReport};

use crate::decode::{decode_batch, extract_rows, DecodeIssue};
use crate::error::ExplorerError;
use crate::query::{baseline_query, exec_payload, reports_query};

pub const SSO_TOKEN_HEADER: &str = "infra-sso-token";

/// Read-only view of the upstream reporting API.
///
/// The token is passed per call: it can be replaced at runtime without
/// rebuilding the client.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    /// Execution reports for the given scheduler names. `day_ms` pins a
    /// day-start timestamp; `None` asks for the most recent reports.
    async fn fetch_reports(
        &self,
        token: &str,
        names: &[String],
        day_ms: Option<i64>,
    ) -> Result<Vec<SchedulerReport>, ExplorerError>;

    /// The day's expected-value snapshot rows.
    async fn fetch_baseline(
        &self,
        token: &str,
        day_ms: i64,
    ) -> Result<Vec<ExpectedRecord>, ExplorerError>;
}

pub struct ExplorerClient {
    client: reqwest::Client,
    base_url: String,
    database_id: u32,
    timeout_secs: u64,
    page_limit: u32,
    reports_collection: String,
    baseline_collection: String,
}

impl ExplorerClient {
    pub fn new(config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            database_id: config.database_id,
            timeout_secs: config.timeout_secs,
            page_limit: config.page_limit,
            reports_collection: config.reports_collection.clone(),
            baseline_collection: config.baseline_collection.clone(),
        })
    }

    /// POST one query to the exec endpoint and flatten the response rows.
    async fn exec(&self, token: &str, query: &str) -> Result<Vec<Value>, ExplorerError> {
        let url = format!(
            "{}/backend/data-explorer/api/v1/databases/exec/{}",
            self.base_url, self.database_id
        );

        debug!(%query, "executing explorer query");

        let send = self
            .client
            .post(&url)
            .header(SSO_TOKEN_HEADER, token)
            .header("content-type", "application/json")
            .json(&exec_payload(query, self.page_limit))
            .send()
            .await;

        let resp = match send {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                return Err(ExplorerError::Timeout {
                    secs: self.timeout_secs,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "explorer API error");
            return Err(ExplorerError::Api {
                status,
                message: text,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ExplorerError::Parse(e.to_string()))?;

        Ok(extract_rows(body))
    }
}

#[async_trait]
impl ReportFetcher for ExplorerClient {
    async fn fetch_reports(
        &self,
        token: &str,
        names: &[String],
        day_ms: Option<i64>,
    ) -> Result<Vec<SchedulerReport>, ExplorerError> {
        let query = reports_query(&self.reports_collection, names, day_ms);
        let rows = self.exec(token, &query).await?;

        let batch = decode_batch::<SchedulerReport>(rows);
        log_issues(&self.reports_collection, &batch.issues);
        debug!(count = batch.records.len(), "fetched scheduler reports");
        Ok(batch.records)
    }

    async fn fetch_baseline(
        &self,
        token: &str,
        day_ms: i64,
    ) -> Result<Vec<ExpectedRecord>, ExplorerError> {
        let query = baseline_query(&self.baseline_collection, day_ms);
        let rows = self.exec(token, &query).await?;

        let batch = decode_batch::<ExpectedRecord>(rows);
        log_issues(&self.baseline_collection, &batch.issues);
        debug!(count = batch.records.len(), "fetched baseline records");
        Ok(batch.records)
    }
}

fn log_issues(collection: &str, issues: &[DecodeIssue]) {
    for issue in issues {
        warn!(
            collection,
            index = issue.index,
            detail = %issue.detail,
            "skipping row that failed to decode"
        );
    }
}
