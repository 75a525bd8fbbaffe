// In-process stand-in for the Grafana HTTP API
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FakeDashboard {
    pub uid: String,
    pub title: String,
    pub folder_id: Option<i64>,
    pub body: Value,
    pub broken: bool,
}

impl FakeDashboard {
    pub fn new(uid: &str, title: &str) -> Self {
        Self {
            uid: uid.to_string(),
            title: title.to_string(),
            folder_id: None,
            body: json!({ "uid": uid, "title": title }),
            broken: false,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn in_folder(mut self, folder_id: i64) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Fetching this dashboard answers HTTP 500.
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeGrafana {
    token: String,
    dashboards: Vec<FakeDashboard>,
    folders: Vec<(i64, String)>,
}

#[derive(Deserialize)]
struct SearchQuery {
    limit: Option<usize>,
    page: Option<usize>,
}

impl FakeGrafana {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..Self::default()
        }
    }

    pub fn with_dashboards(mut self, dashboards: impl IntoIterator<Item = FakeDashboard>) -> Self {
        self.dashboards.extend(dashboards);
        self
    }

    pub fn with_folder(mut self, id: i64, title: &str) -> Self {
        self.folders.push((id, title.to_string()));
        self
    }

    /// Binds an ephemeral port and returns the base URL.
    pub async fn serve(self) -> String {
        let router = Router::new()
            .route("/api/search", get(search))
            .route("/api/dashboards/uid/:uid", get(dashboard_by_uid))
            .route("/api/folders", get(folders))
            .with_state(Arc::new(self));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let expected = format!("Bearer {}", self.token);
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Ok(()),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}

async fn search(
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<FakeGrafana>>,
) -> Result<Json<Value>, StatusCode> {
    state.authorize(&headers)?;

    let limit = query.limit.unwrap_or(1000);
    let page = query.page.unwrap_or(1).max(1);
    let hits: Vec<Value> = state
        .dashboards
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(|d| {
            json!({
                "uid": d.uid,
                "title": d.title,
                "type": "dash-db",
                "folderId": d.folder_id,
            })
        })
        .collect();

    Ok(Json(Value::Array(hits)))
}

async fn dashboard_by_uid(
    headers: HeaderMap,
    Path(uid): Path<String>,
    State(state): State<Arc<FakeGrafana>>,
) -> Result<Json<Value>, StatusCode> {
    state.authorize(&headers)?;

    let dashboard = state
        .dashboards
        .iter()
        .find(|d| d.uid == uid)
        .ok_or(StatusCode::NOT_FOUND)?;
    if dashboard.broken {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(json!({
        "dashboard": dashboard.body,
        "meta": { "slug": dashboard.title.to_lowercase() }
    })))
}

async fn folders(
    headers: HeaderMap,
    State(state): State<Arc<FakeGrafana>>,
) -> Result<Json<Value>, StatusCode> {
    state.authorize(&headers)?;

    let folders: Vec<Value> = state
        .folders
        .iter()
        .map(|(id, title)| json!({ "id": id, "uid": format!("f{}", id), "title": title }))
        .collect();
    Ok(Json(Value::Array(folders)))
}
