// Tab data model
// A tab is one independent GraphQL session: endpoint, query, variables, headers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "New Endpoint";
pub const DEFAULT_ENDPOINT: &str = "https://swapi-graphql.netlify.app/.netlify/functions/index";
pub const DEFAULT_QUERY: &str = "# Welcome to GraphiQL Desktop
#
# Enter your GraphQL query here.

query {
  __typename
}
";
pub const DEFAULT_VARIABLES: &str = "{}";
pub const DEFAULT_HEADERS: &str = "{\n  \"Content-Type\": \"application/json\"\n}";

/// Appended to the title of a cloned tab
pub const COPY_SUFFIX: &str = " (Copy)";

/// Fields missing from a stored tab take their defaults, so an older or
/// hand-edited record still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub endpoint: String,
    pub query: String,
    pub variables: String,
    pub headers: String,
}

impl Tab {
    /// A tab with default contents and a fresh id
    pub fn new() -> Self {
        Self {
            id: new_tab_id(),
            title: DEFAULT_TITLE.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: DEFAULT_QUERY.to_string(),
            variables: DEFAULT_VARIABLES.to_string(),
            headers: DEFAULT_HEADERS.to_string(),
        }
    }

    /// Field-for-field copy with a fresh id and the copy suffix on the title
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_tab_id(),
            title: format!("{}{}", self.title, COPY_SUFFIX),
            ..self.clone()
        }
    }

    /// Merge the fields present in `update`. The id is never touched.
    pub fn apply(&mut self, update: TabUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(endpoint) = update.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(query) = update.query {
            self.query = query;
        }
        if let Some(variables) = update.variables {
            self.variables = variables;
        }
        if let Some(headers) = update.headers {
            self.headers = headers;
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for a tab. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
}

impl TabUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn variables(variables: impl Into<String>) -> Self {
        Self {
            variables: Some(variables.into()),
            ..Self::default()
        }
    }

    pub fn headers(headers: impl Into<String>) -> Self {
        Self {
            headers: Some(headers.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.endpoint.is_none()
            && self.query.is_none()
            && self.variables.is_none()
            && self.headers.is_none()
    }
}

fn new_tab_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_defaults() {
        let tab = Tab::new();
        assert_eq!(tab.title, "New Endpoint");
        assert_eq!(tab.endpoint, DEFAULT_ENDPOINT);
        assert!(tab.query.starts_with("# Welcome to GraphiQL Desktop"));
        assert!(tab.query.contains("__typename"));
        assert_eq!(tab.variables, "{}");
        assert!(Uuid::parse_str(&tab.id).is_ok());
    }

    #[test]
    fn test_default_headers_match_pretty_json() {
        let expected =
            serde_json::to_string_pretty(&serde_json::json!({ "Content-Type": "application/json" }))
                .unwrap();
        assert_eq!(DEFAULT_HEADERS, expected);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Tab::new();
        let b = Tab::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_duplicate() {
        let mut tab = Tab::new();
        tab.apply(TabUpdate {
            title: Some("Users API".to_string()),
            query: Some("{ users { id } }".to_string()),
            ..TabUpdate::default()
        });

        let copy = tab.duplicate();
        assert_ne!(copy.id, tab.id);
        assert_eq!(copy.title, "Users API (Copy)");
        assert_eq!(copy.endpoint, tab.endpoint);
        assert_eq!(copy.query, tab.query);
        assert_eq!(copy.variables, tab.variables);
        assert_eq!(copy.headers, tab.headers);
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut tab = Tab::new();
        let before = tab.clone();

        tab.apply(TabUpdate::title("X"));

        assert_eq!(tab.title, "X");
        assert_eq!(tab.id, before.id);
        assert_eq!(tab.endpoint, before.endpoint);
        assert_eq!(tab.query, before.query);
        assert_eq!(tab.variables, before.variables);
        assert_eq!(tab.headers, before.headers);
    }

    #[test]
    fn test_update_deserializes_partial_json() {
        let update: TabUpdate = serde_json::from_str(r#"{"endpoint":"http://localhost:4000"}"#).unwrap();
        assert_eq!(update, TabUpdate::endpoint("http://localhost:4000"));
        assert!(!update.is_empty());
        assert!(TabUpdate::default().is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let tab: Tab = serde_json::from_str(r#"{"id":"b","title":"Staging"}"#).unwrap();
        assert_eq!(tab.id, "b");
        assert_eq!(tab.title, "Staging");
        assert_eq!(tab.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(tab.headers, DEFAULT_HEADERS);
        assert_eq!(tab.variables, DEFAULT_VARIABLES);
    }

    #[test]
    fn test_update_ignores_id_field() {
        // Unknown fields, including `id`, are dropped on the way in
        let update: TabUpdate = serde_json::from_str(r#"{"id":"hijack","title":"T"}"#).unwrap();
        let mut tab = Tab::new();
        let id = tab.id.clone();
        tab.apply(update);
        assert_eq!(tab.id, id);
        assert_eq!(tab.title, "T");
    }
}
