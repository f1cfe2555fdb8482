// Query workbench boundary
// What the embedded GraphiQL instance is configured with for one tab, and how
// its edits flow back into the tab store

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::session::{Tab, TabStore, TabUpdate};
use crate::storage::{tab_storage_prefix, KeyValueStore};

/// Header map used when a tab's headers text cannot be parsed
pub fn fallback_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

/// Parse a tab's headers text into request headers.
///
/// Blank text means no headers. Anything that is not a JSON object of string
/// values falls back to a lone `Content-Type: application/json`.
pub fn parse_headers(text: &str) -> BTreeMap<String, String> {
    if text.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str::<BTreeMap<String, String>>(text) {
        Ok(headers) => headers,
        Err(e) => {
            warn!("Unusable headers, falling back to defaults: {}", e);
            fallback_headers()
        }
    }
}

/// Everything the workbench needs to render one tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchConfig {
    pub tab_id: String,
    pub endpoint: String,
    pub query: String,
    pub variables: String,
    /// Raw headers text, shown in the headers editor
    pub headers: String,
    /// Parsed headers, sent with each request
    pub request_headers: BTreeMap<String, String>,
    pub storage_namespace: String,
    pub should_persist_headers: bool,
}

impl WorkbenchConfig {
    pub fn for_tab(tab: &Tab) -> Self {
        Self {
            tab_id: tab.id.clone(),
            endpoint: tab.endpoint.clone(),
            query: tab.query.clone(),
            variables: tab.variables.clone(),
            headers: tab.headers.clone(),
            request_headers: parse_headers(&tab.headers),
            storage_namespace: tab_storage_prefix(&tab.id),
            should_persist_headers: true,
        }
    }
}

/// An edit reported by one of the workbench editors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum WorkbenchEdit {
    Query(String),
    Variables(String),
    Headers(String),
}

impl From<WorkbenchEdit> for TabUpdate {
    fn from(edit: WorkbenchEdit) -> Self {
        match edit {
            WorkbenchEdit::Query(query) => TabUpdate::query(query),
            WorkbenchEdit::Variables(variables) => TabUpdate::variables(variables),
            WorkbenchEdit::Headers(headers) => TabUpdate::headers(headers),
        }
    }
}

impl<S: KeyValueStore> TabStore<S> {
    /// Workbench configuration for the selected tab
    pub fn active_workbench_config(&self) -> Option<WorkbenchConfig> {
        self.get_active_tab().map(WorkbenchConfig::for_tab)
    }

    pub fn apply_workbench_edit(&mut self, tab_id: &str, edit: WorkbenchEdit) {
        self.update_tab(tab_id, edit.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tab::DEFAULT_HEADERS;
    use crate::storage::MemoryStore;

    #[test]
    fn test_parse_default_headers() {
        let headers = parse_headers(DEFAULT_HEADERS);
        assert_eq!(headers, fallback_headers());
    }

    #[test]
    fn test_parse_custom_headers() {
        let headers = parse_headers(r#"{"Authorization": "Bearer abc", "X-Trace": "1"}"#);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Authorization"], "Bearer abc");
    }

    #[test]
    fn test_blank_headers_are_empty() {
        assert!(parse_headers("").is_empty());
        assert!(parse_headers("  \n").is_empty());
    }

    #[test]
    fn test_malformed_headers_fall_back() {
        assert_eq!(parse_headers("{\"Authorization\": "), fallback_headers());
        assert_eq!(parse_headers("[1, 2]"), fallback_headers());
        assert_eq!(parse_headers(r#"{"X-Count": 3}"#), fallback_headers());
    }

    #[test]
    fn test_config_for_tab() {
        let mut tab = Tab::new();
        tab.headers = "oops".to_string();

        let config = WorkbenchConfig::for_tab(&tab);

        assert_eq!(config.tab_id, tab.id);
        assert_eq!(config.endpoint, tab.endpoint);
        assert_eq!(config.headers, "oops");
        assert_eq!(config.request_headers, fallback_headers());
        assert_eq!(config.storage_namespace, format!("graphiql-tab-{}:", tab.id));
        assert!(config.should_persist_headers);
    }

    #[test]
    fn test_edits_feed_back_into_store() {
        let mut store = TabStore::load(MemoryStore::new()).unwrap();
        let id = store.tabs()[0].id.clone();

        store.apply_workbench_edit(&id, WorkbenchEdit::Query("{ me { id } }".to_string()));
        store.apply_workbench_edit(&id, WorkbenchEdit::Variables("{\"a\": 1}".to_string()));
        store.apply_workbench_edit(&id, WorkbenchEdit::Headers("{}".to_string()));

        let config = store.active_workbench_config().unwrap();
        assert_eq!(config.query, "{ me { id } }");
        assert_eq!(config.variables, "{\"a\": 1}");
        assert!(config.request_headers.is_empty());
    }

    #[test]
    fn test_edit_wire_format() {
        let edit: WorkbenchEdit =
            serde_json::from_str(r#"{"field":"variables","value":"{}"}"#).unwrap();
        assert_eq!(edit, WorkbenchEdit::Variables("{}".to_string()));
    }
}
