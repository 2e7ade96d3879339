use serde::{Deserialize, Serialize};

/// Id of the permanent home tab.
pub const HOME_TAB_ID: &str = "dashboard";

/// The kind of content a tab renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TabKind {
    Dashboard,
    ListPage,
    RecordDetail,
    BuilderPage,
}

/// Data a tab needs to render its content.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
}

/// One open, addressable view in the workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub title: String,
    /// Full navigation path, query string included.
    pub path: String,
    pub kind: TabKind,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub payload: TabPayload,
}

impl Tab {
    /// Builds the fixed dashboard tab for a tenant.
    pub fn home(title: &str, path: &str) -> Self {
        Self {
            id: HOME_TAB_ID.to_string(),
            title: title.to_string(),
            path: path.to_string(),
            kind: TabKind::Dashboard,
            is_fixed: true,
            payload: TabPayload {
                page_id: Some(HOME_TAB_ID.to_string()),
                ..TabPayload::default()
            },
        }
    }
}

/// Request to open (or focus) a tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub path: String,
    pub kind: TabKind,
    #[serde(default)]
    pub payload: TabPayload,
}

/// Partial fields merged into an existing tab by `update_tab`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub payload: Option<TabPayload>,
}

impl TabUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.path.is_none() && self.payload.is_none()
    }
}
