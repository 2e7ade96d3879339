//! Route Synchronizer for the CRM workspace.
//!
//! Keeps the navigation location and the tab registry consistent. Each pass
//! either recognises the location as the active tab (no-op), focuses an open
//! tab with the same path, retargets a tab whose derived id matches, or opens
//! a new tab. Routes look like `/<area>/<tenant>/<page>[/<subpage>[/<view>]]`
//! with `recordId`/`id` and `draftId`/`draft` in the query.

use std::collections::HashSet;

use percent_encoding::percent_decode_str;

use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::types::errors::RouteError;
use crate::types::route::{Location, ResolvedRoute, SyncOutcome, SyncReport, TitleRequest};
use crate::types::settings::WorkspaceSettings;
use crate::types::tab::{TabKind, TabPayload, TabSpec, TabUpdate, HOME_TAB_ID};

const RECORD_PARAMS: &[&str] = &["recordId", "id"];
const DRAFT_PARAMS: &[&str] = &["draftId", "draft"];

/// Route layout and tab labels used while deriving tabs from locations.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    pub app_area: String,
    pub builder_area: String,
    pub dashboard_segment: String,
    pub home_title: String,
    pub placeholder_title: String,
    pub builder_title_prefix: String,
    pub draft_label: String,
}

impl RouteConfig {
    pub fn from_settings(settings: &WorkspaceSettings) -> Self {
        Self {
            app_area: settings.routing.app_area.clone(),
            builder_area: settings.routing.builder_area.clone(),
            dashboard_segment: settings.routing.dashboard_segment.clone(),
            home_title: settings.general.home_title.clone(),
            placeholder_title: settings.general.placeholder_title.clone(),
            builder_title_prefix: settings.general.builder_title_prefix.clone(),
            draft_label: settings.general.draft_label.clone(),
        }
    }

    /// Path of the home tab for a tenant, e.g. `/app/acme/dashboard`.
    pub fn home_path(&self, tenant: &str) -> String {
        format!("/{}/{}/{}", self.app_area, tenant, self.dashboard_segment)
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::from_settings(&WorkspaceSettings::default())
    }
}

/// Trait defining the route synchronization interface.
pub trait RouteSynchronizerTrait {
    fn resolve(&self, location: &Location) -> Result<ResolvedRoute, RouteError>;
    fn sync(&self, registry: &mut TabRegistry, location: &Location) -> SyncReport;
}

pub struct RouteSynchronizer {
    config: RouteConfig,
}

impl RouteSynchronizer {
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    fn title_for(&self, kind: TabKind, payload: &TabPayload) -> String {
        match kind {
            TabKind::Dashboard => self.config.home_title.clone(),
            TabKind::RecordDetail if payload.record_id.is_some() => {
                self.config.placeholder_title.clone()
            }
            // Drafts have nothing to fetch, so they never carry the placeholder.
            TabKind::RecordDetail => format!("{} ({})", section_label(payload), self.config.draft_label),
            TabKind::ListPage => section_label(payload),
            TabKind::BuilderPage => format!(
                "{}: {}",
                self.config.builder_title_prefix,
                payload.page_id.as_deref().map(humanize).unwrap_or_default()
            ),
        }
    }

    fn title_request(&self, tab_id: &str, kind: TabKind, payload: &TabPayload) -> Option<TitleRequest> {
        if kind != TabKind::RecordDetail {
            return None;
        }
        Some(TitleRequest {
            tab_id: tab_id.to_string(),
            page_id: payload.page_id.clone()?,
            sub_page_id: payload.sub_page_id.clone(),
            record_id: payload.record_id.clone()?,
        })
    }
}

impl Default for RouteSynchronizer {
    fn default() -> Self {
        Self::new(RouteConfig::default())
    }
}

impl RouteSynchronizerTrait for RouteSynchronizer {
    /// Derives the deterministic tab identity for a location.
    fn resolve(&self, location: &Location) -> Result<ResolvedRoute, RouteError> {
        let segments: Vec<String> = location
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect();

        if segments.len() < 3 {
            return Err(RouteError::MissingSegments(location.full_path()));
        }

        let area = segments[0].as_str();
        let is_builder = area == self.config.builder_area;
        if area != self.config.app_area && !is_builder {
            return Err(RouteError::UnknownArea(area.to_string()));
        }

        let tenant = segments[1].clone();
        let page_id = segments[2].clone();
        let sub_page_id = segments.get(3).cloned();
        let query = location.query.as_deref();
        let record_id = query_param(query, RECORD_PARAMS);
        let draft_id = query_param(query, DRAFT_PARAMS);

        let (tab_id, kind) = if is_builder {
            let id = match &sub_page_id {
                Some(sub) => format!("builder_{}_{}", page_id, sub),
                None => format!("builder_{}", page_id),
            };
            (id, TabKind::BuilderPage)
        } else if page_id == self.config.dashboard_segment {
            (HOME_TAB_ID.to_string(), TabKind::Dashboard)
        } else if let Some(record) = &record_id {
            (format!("record_{}", record), TabKind::RecordDetail)
        } else {
            let base = match &sub_page_id {
                Some(sub) => format!("subpage_{}", sub),
                None => format!("page_{}", page_id),
            };
            match &draft_id {
                Some(draft) => (format!("{}_draft_{}", base, draft), TabKind::RecordDetail),
                None => (base, TabKind::ListPage),
            }
        };

        let payload = TabPayload {
            page_id: Some(page_id),
            sub_page_id,
            record_id,
            draft_id,
        };
        let title = self.title_for(kind, &payload);

        Ok(ResolvedRoute {
            tenant,
            tab_id,
            kind,
            title,
            payload,
        })
    }

    fn sync(&self, registry: &mut TabRegistry, location: &Location) -> SyncReport {
        let full_path = location.full_path();

        if registry
            .get_active_tab()
            .is_some_and(|t| t.path == full_path)
        {
            return SyncReport::unchanged();
        }

        let existing_ids: HashSet<String> = registry.tabs().iter().map(|t| t.id.clone()).collect();
        let mut title_request = None;

        let outcome = if let Some(id) = registry.find_by_path(&full_path).map(|t| t.id.clone()) {
            registry.switch_to(&id);
            SyncOutcome::Focused(id)
        } else {
            let route = match self.resolve(location) {
                Ok(route) => route,
                Err(e) => {
                    log::debug!("leaving workspace unchanged: {}", e);
                    return SyncReport::unresolved();
                }
            };

            if registry.get_tab(&route.tab_id).is_some() {
                registry.update_tab(
                    &route.tab_id,
                    TabUpdate {
                        title: None,
                        path: Some(full_path),
                        payload: Some(route.payload.clone()),
                    },
                );
                registry.switch_to(&route.tab_id);
                let still_loading = registry
                    .get_tab(&route.tab_id)
                    .is_some_and(|t| t.title == self.config.placeholder_title);
                if still_loading {
                    title_request = self.title_request(&route.tab_id, route.kind, &route.payload);
                }
                SyncOutcome::Retargeted(route.tab_id)
            } else {
                title_request = self.title_request(&route.tab_id, route.kind, &route.payload);
                let id = registry.open_or_focus(TabSpec {
                    id: Some(route.tab_id),
                    title: route.title,
                    path: full_path,
                    kind: route.kind,
                    payload: route.payload,
                });
                SyncOutcome::Opened(id)
            }
        };

        let swept = registry.sweep_zombies(&self.config.placeholder_title, &existing_ids);
        if !swept.is_empty() {
            log::info!("swept {} abandoned loading tab(s): {:?}", swept.len(), swept);
        }

        SyncReport {
            outcome,
            swept,
            title_request,
        }
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// First non-empty value among `names`, in priority order.
fn query_param(query: Option<&str>, names: &[&str]) -> Option<String> {
    let query = query?;
    names.iter().find_map(|name| {
        query
            .split('&')
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key == *name).then(|| decode(value))
            })
            .find(|value| !value.is_empty())
    })
}

fn section_label(payload: &TabPayload) -> String {
    payload
        .sub_page_id
        .as_deref()
        .or(payload.page_id.as_deref())
        .map(humanize)
        .unwrap_or_default()
}

/// `sales-leads` -> `Sales Leads`.
fn humanize(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
