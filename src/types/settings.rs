use serde::{Deserialize, Serialize};

use super::render::BackgroundPolicy;

/// Top-level workspace settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkspaceSettings {
    pub general: GeneralSettings,
    pub routing: RoutingSettings,
    pub api: ApiSettings,
    pub rendering: RenderingSettings,
}

/// Labels shown in the tab strip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub home_title: String,
    pub placeholder_title: String,
    pub builder_title_prefix: String,
    pub draft_label: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            home_title: "Dashboard".to_string(),
            placeholder_title: "Loading…".to_string(),
            builder_title_prefix: "Builder".to_string(),
            draft_label: "draft".to_string(),
        }
    }
}

/// URL layout: `/<area>/<tenant>/<page>/<subpage>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingSettings {
    pub app_area: String,
    pub builder_area: String,
    pub dashboard_segment: String,
    pub storage_key_prefix: String,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            app_area: "app".to_string(),
            builder_area: "builder".to_string(),
            dashboard_segment: "dashboard".to_string(),
            storage_key_prefix: "tabs_".to_string(),
        }
    }
}

/// Backend used to resolve record titles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub title_field: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            title_field: "name".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RenderingSettings {
    pub background_policy: BackgroundPolicy,
}
