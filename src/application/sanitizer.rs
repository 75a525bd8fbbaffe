// Cleaning policy applied to remote dashboards before they reach git
use crate::infrastructure::config::SanitizeConfig;
use serde_json::{json, Value};

/// Server-managed fields that only add churn to version control.
pub const IGNORE_FIELDS: &[&str] = &[
    "id",
    "version",
    "iteration",
    "orgId",
    "schemaVersion",
    "from",
    "to",
    "updated",
];

#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: SanitizeConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizeConfig) -> Self {
        Self { config }
    }

    /// Returns the cleaned document. Non-object bodies pass through untouched.
    pub fn clean(&self, mut dashboard: Value) -> Value {
        if !self.config.enabled {
            return dashboard;
        }

        let Some(obj) = dashboard.as_object_mut() else {
            return dashboard;
        };

        for field in IGNORE_FIELDS {
            obj.remove(*field);
        }

        // Files always open in live mode
        obj.insert(
            "time".to_string(),
            json!({ "from": self.config.time_from, "to": self.config.time_to }),
        );
        obj.insert("refresh".to_string(), Value::String(self.config.refresh.clone()));

        // Drop site-specific selections so query variables re-evaluate on load
        if let Some(vars) = obj
            .get_mut("templating")
            .and_then(|t| t.get_mut("list"))
            .and_then(Value::as_array_mut)
        {
            for var in vars.iter_mut().filter_map(Value::as_object_mut) {
                if var.get("type").and_then(Value::as_str) != Some("query") {
                    continue;
                }
                var.remove("current");
                if let Some(options) = var.get_mut("options") {
                    *options = Value::Array(Vec::new());
                }
            }
        }

        dashboard
    }
}
