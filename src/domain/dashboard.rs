// Dashboard domain model
use serde::Deserialize;
use serde_json::Value;

/// Title of the implicit root folder.
pub const GENERAL_FOLDER: &str = "General";

/// One entry of the remote dashboard listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub uid: String,
    pub title: String,
    #[serde(rename = "folderId", default)]
    pub folder_id: Option<i64>,
    #[serde(rename = "folderTitle", default)]
    pub folder_title: Option<String>,
}

/// Full JSON body of one dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDocument {
    pub uid: String,
    pub body: Value,
}

impl DashboardDocument {
    pub fn new(uid: impl Into<String>, body: Value) -> Self {
        Self {
            uid: uid.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Folder {
    pub id: i64,
    pub title: String,
}

/// Resolves the folder title a dashboard lives in, falling back to "General".
pub fn folder_title_for<'a>(summary: &'a DashboardSummary, folders: &'a [Folder]) -> &'a str {
    let id = summary.folder_id.unwrap_or(0);
    if id == 0 {
        return GENERAL_FOLDER;
    }

    folders
        .iter()
        .find(|f| f.id == id)
        .map(|f| f.title.as_str())
        .or(summary.folder_title.as_deref())
        .unwrap_or(GENERAL_FOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_deserializes_search_hit() {
        let hit = serde_json::json!({
            "id": 12,
            "uid": "abc",
            "title": "CPU Usage",
            "type": "dash-db",
            "folderId": 3,
            "folderTitle": "Infra"
        });
        let summary: DashboardSummary = serde_json::from_value(hit).unwrap();
        assert_eq!(summary.uid, "abc");
        assert_eq!(summary.folder_id, Some(3));
        assert_eq!(summary.folder_title.as_deref(), Some("Infra"));
    }

    #[test]
    fn test_folder_title_for() {
        let folders = vec![Folder { id: 3, title: "Infra".to_string() }];

        let mut summary = DashboardSummary {
            uid: "a".to_string(),
            title: "A".to_string(),
            folder_id: None,
            folder_title: None,
        };
        assert_eq!(folder_title_for(&summary, &folders), "General");

        summary.folder_id = Some(3);
        assert_eq!(folder_title_for(&summary, &folders), "Infra");

        summary.folder_id = Some(9);
        summary.folder_title = Some("Lab".to_string());
        assert_eq!(folder_title_for(&summary, &folders), "Lab");
    }
}
