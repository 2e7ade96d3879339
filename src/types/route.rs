use serde::{Deserialize, Serialize};

use super::tab::{TabKind, TabPayload};

/// A navigation location: path plus optional raw query string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
}

impl Location {
    /// Splits a full path such as `/app/acme/sales?id=4` at the first `?`.
    pub fn parse(full_path: &str) -> Self {
        match full_path.split_once('?') {
            Some((path, query)) if !query.is_empty() => Self {
                path: path.to_string(),
                query: Some(query.to_string()),
            },
            Some((path, _)) => Self {
                path: path.to_string(),
                query: None,
            },
            None => Self {
                path: full_path.to_string(),
                query: None,
            },
        }
    }

    /// Path with the query string re-attached; this is what tabs store.
    pub fn full_path(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

/// The logical resource a location points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub tenant: String,
    pub tab_id: String,
    pub kind: TabKind,
    pub title: String,
    pub payload: TabPayload,
}

/// Title hydration request for a record-detail tab that opened with a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleRequest {
    pub tab_id: String,
    pub page_id: String,
    pub sub_page_id: Option<String>,
    pub record_id: String,
}

/// What a single synchronizer pass did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The active tab already shows this location.
    Unchanged,
    /// An open tab with this exact path was activated.
    Focused(String),
    /// A tab with the derived id existed under a stale path; its path was updated.
    Retargeted(String),
    /// A new tab was appended and activated.
    Opened(String),
    /// The location does not name a logical page; nothing changed.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub swept: Vec<String>,
    pub title_request: Option<TitleRequest>,
}

impl SyncReport {
    pub fn unchanged() -> Self {
        Self {
            outcome: SyncOutcome::Unchanged,
            swept: Vec::new(),
            title_request: None,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            outcome: SyncOutcome::Unresolved,
            swept: Vec::new(),
            title_request: None,
        }
    }

    pub fn active_tab_id(&self) -> Option<&str> {
        match &self.outcome {
            SyncOutcome::Focused(id) | SyncOutcome::Retargeted(id) | SyncOutcome::Opened(id) => {
                Some(id)
            }
            SyncOutcome::Unchanged | SyncOutcome::Unresolved => None,
        }
    }
}
