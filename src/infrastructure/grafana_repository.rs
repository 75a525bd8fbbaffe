// Grafana HTTP API repository implementation
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::{DashboardDocument, DashboardSummary, Folder};
use crate::error::{Result, SyncError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GrafanaRepository {
    client: reqwest::Client,
    host: String,
    token: String,
    page_size: u32,
}

/// Body of `GET /api/dashboards/uid/{uid}`; `meta` is ignored.
#[derive(Debug, Deserialize)]
struct DashboardEnvelope {
    dashboard: serde_json::Value,
}

impl GrafanaRepository {
    pub fn new(host: String, token: String, page_size: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            token,
            page_size,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn search_url(&self, page: u32) -> String {
        format!(
            "{}/api/search?type=dash-db&limit={}&page={}",
            self.host, self.page_size, page
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SyncError::UnexpectedResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl DashboardRepository for GrafanaRepository {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>> {
        let mut dashboards = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;

        loop {
            let hits: Vec<DashboardSummary> = self.get_json(&self.search_url(page)).await?;
            let count = hits.len();

            let mut fresh = 0;
            for hit in hits {
                if seen.insert(hit.uid.clone()) {
                    dashboards.push(hit);
                    fresh += 1;
                }
            }
            tracing::debug!("Search page {} returned {} dashboards ({} new)", page, count, fresh);

            // Short page ends the listing; a page with nothing new means the
            // server ignores paging.
            if count < self.page_size as usize || fresh == 0 {
                break;
            }
            page += 1;
        }

        Ok(dashboards)
    }

    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardDocument> {
        let url = format!("{}/api/dashboards/uid/{}", self.host, urlencoding::encode(uid));
        let envelope: DashboardEnvelope = self.get_json(&url).await?;
        Ok(DashboardDocument::new(uid, envelope.dashboard))
    }

    async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.get_json(&format!("{}/api/folders", self.host)).await
    }
}
