// Repository trait for remote dashboard access
use crate::domain::dashboard::{DashboardDocument, DashboardSummary, Folder};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// List every dashboard on the server, in listing order
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>>;

    /// Fetch the full JSON body of one dashboard
    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardDocument>;

    /// List folders (id and title)
    async fn list_folders(&self) -> Result<Vec<Folder>>;
}
