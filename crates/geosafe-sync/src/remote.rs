//! Remote report service.
//!
//! [`ReportService`] is what the engine talks to; [`HttpReportService`]
//! speaks the service's HTTP API:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `GET /reports` |
//! | create    | `POST /report` |
//! | approve   | `POST /report/{id}/approve` |
//! | delete    | `DELETE /report/{id}` |
//!
//! Mutating requests carry the acting user in the `X-User-Info` header.

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use geosafe_model::{Identity, Report, ReportDraft, USER_INFO_HEADER};
use reqwest::Client;

/// The authoritative report store.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Fetch every report.
    async fn list_reports(&self) -> Result<Vec<Report>>;

    /// Create a report; returns the server's canonical copy.
    async fn create_report(&self, draft: &ReportDraft, actor: &Identity) -> Result<Report>;

    /// Approve a report; returns the updated report.
    async fn approve_report(&self, id: &str, actor: &Identity) -> Result<Report>;

    /// Delete a report.
    async fn delete_report(&self, id: &str, actor: &Identity) -> Result<()>;
}

/// HTTP client for the remote report service.
pub struct HttpReportService {
    base_url: String,
    client: Client,
}

impl HttpReportService {
    /// Create a client for `config.api_url`, with every request bounded by
    /// `config.request_timeout`.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn report_url(&self, id: &str) -> String {
        format!("{}/report/{}", self.base_url, urlencoding::encode(id))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(Error::Rejected { status, message })
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response.json().await?;
        Ok(body)
    }
}

#[async_trait]
impl ReportService for HttpReportService {
    async fn list_reports(&self) -> Result<Vec<Report>> {
        let url = format!("{}/reports", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn create_report(&self, draft: &ReportDraft, actor: &Identity) -> Result<Report> {
        let url = format!("{}/report", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(USER_INFO_HEADER, actor.header_value())
            .json(draft)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn approve_report(&self, id: &str, actor: &Identity) -> Result<Report> {
        let url = format!("{}/approve", self.report_url(id));
        let response = self
            .client
            .post(&url)
            .header(USER_INFO_HEADER, actor.header_value())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete_report(&self, id: &str, actor: &Identity) -> Result<()> {
        let response = self
            .client
            .delete(self.report_url(id))
            .header(USER_INFO_HEADER, actor.header_value())
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
