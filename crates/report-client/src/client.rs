//! HTTP client for the analytics service.

use bytes::Bytes;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

use crate::error::ReportError;
use crate::period::ReportPeriod;

const REPORT_ENDPOINT: &str = "/analysis/get_report_from_date/";
const CLEAR_DB_ENDPOINT: &str = "/analysis/clear_db/";

#[derive(Debug, Clone)]
pub struct ReportClient {
    http: Client,
    base_url: String,
}

impl ReportClient {
    /// `base_url` is `scheme://host:port` of the analytics service, e.g. `http://localhost:8005`.
    pub fn new(base_url: &str) -> Result<Self, ReportError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Spreadsheet bytes of the report for `period` (rows with empty KIP included).
    #[instrument(skip(self), fields(period = %period))]
    pub async fn fetch_report(&self, period: &ReportPeriod) -> Result<Bytes, ReportError> {
        let url = format!("{}{}", self.base_url, REPORT_ENDPOINT);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("start_date", period.start.to_string()),
                ("end_date", period.end.to_string()),
                ("kip_empty", "true".to_string()),
            ])
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        info!(size = bytes.len(), "Report fetched");
        Ok(bytes)
    }

    /// Asks the analytics service to wipe its database; returns the service's status payload.
    pub async fn clear_database(&self) -> Result<serde_json::Value, ReportError> {
        let url = format!("{}{}", self.base_url, CLEAR_DB_ENDPOINT);
        let response = self.http.get(&url).send().await?;
        let status = ensure_success(response).await?.json::<serde_json::Value>().await?;
        debug!(status = %status, "Clear database finished");
        Ok(status)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ReportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ReportError::Status {
        status: status.as_u16(),
        body,
    })
}
