//! Tab Registry for the CRM workspace.
//!
//! Owns the ordered tab list and the active tab id. Every operation on an id
//! that no longer exists is a no-op, so late callers (async title updates,
//! views that have not re-rendered yet) can never corrupt the workspace.

use std::collections::HashSet;

use uuid::Uuid;

use crate::types::tab::{Tab, TabSpec, TabUpdate};
use crate::types::workspace::Workspace;

/// Trait defining the tab registry interface.
pub trait TabRegistryTrait {
    fn open_or_focus(&mut self, spec: TabSpec) -> String;
    fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> bool;
    fn close(&mut self, tab_id: &str) -> bool;
    fn switch_to(&mut self, tab_id: &str) -> bool;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn find_by_path(&self, path: &str) -> Option<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn active_tab_id(&self) -> Option<&str>;
    fn tabs(&self) -> &[Tab];
    fn tab_count(&self) -> usize;
}

/// In-memory registry of open workspace tabs.
#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    home: Tab,
    revision: u64,
}

impl TabRegistry {
    /// Creates a registry holding only the home tab, active.
    pub fn new(home: Tab) -> Self {
        let mut home = home;
        home.is_fixed = true;
        Self {
            tabs: vec![home.clone()],
            active_tab_id: Some(home.id.clone()),
            home,
            revision: 0,
        }
    }

    /// Hydrates a registry from a persisted snapshot.
    ///
    /// Duplicate ids are dropped (first occurrence wins), only the home id may
    /// stay fixed, the home tab is inserted first when missing, and a dangling
    /// active id falls back to the first tab.
    pub fn from_workspace(workspace: Workspace, home: Tab) -> Self {
        let mut registry = Self::new(home);
        let mut seen = HashSet::new();
        let mut tabs = Vec::with_capacity(workspace.tabs.len() + 1);

        for mut tab in workspace.tabs {
            if !seen.insert(tab.id.clone()) {
                log::debug!("dropping duplicate tab {} from saved workspace", tab.id);
                continue;
            }
            tab.is_fixed = tab.id == registry.home.id;
            tabs.push(tab);
        }

        if !seen.contains(&registry.home.id) {
            tabs.insert(0, registry.home.clone());
        }

        let active = workspace
            .active_tab_id
            .filter(|id| tabs.iter().any(|t| &t.id == id))
            .or_else(|| tabs.first().map(|t| t.id.clone()));

        registry.tabs = tabs;
        registry.active_tab_id = active;
        registry
    }

    /// Snapshot of the current state, suitable for persistence.
    pub fn workspace(&self) -> Workspace {
        Workspace {
            tabs: self.tabs.clone(),
            active_tab_id: self.active_tab_id.clone(),
        }
    }

    /// Counter bumped on every real mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn home(&self) -> &Tab {
        &self.home
    }

    /// Closes every non-active, non-fixed tab among `candidates` whose title
    /// is still `placeholder`. Returns the ids removed.
    pub fn sweep_zombies(&mut self, placeholder: &str, candidates: &HashSet<String>) -> Vec<String> {
        let zombies: Vec<String> = self
            .tabs
            .iter()
            .filter(|t| {
                t.title == placeholder
                    && !t.is_fixed
                    && candidates.contains(&t.id)
                    && self.active_tab_id.as_deref() != Some(t.id.as_str())
            })
            .map(|t| t.id.clone())
            .collect();

        for id in &zombies {
            self.close(id);
        }
        zombies
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn activate(&mut self, tab_id: &str) -> bool {
        if self.active_tab_id.as_deref() == Some(tab_id) {
            return false;
        }
        self.active_tab_id = Some(tab_id.to_string());
        self.touch();
        true
    }
}

impl TabRegistryTrait for TabRegistry {
    /// Focuses the tab matching the spec's id or path, or appends a new one.
    /// Returns the id of the tab that ends up active.
    fn open_or_focus(&mut self, spec: TabSpec) -> String {
        let existing = spec
            .id
            .as_deref()
            .and_then(|id| self.get_tab(id))
            .or_else(|| self.find_by_path(&spec.path))
            .map(|t| t.id.clone());

        if let Some(id) = existing {
            self.activate(&id);
            return id;
        }

        let id = spec.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.tabs.push(Tab {
            id: id.clone(),
            title: spec.title,
            path: spec.path,
            kind: spec.kind,
            is_fixed: false,
            payload: spec.payload,
        });
        self.active_tab_id = Some(id.clone());
        self.touch();
        id
    }

    /// Merges the given fields into a tab. Returns whether anything changed.
    fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> bool {
        let Some(idx) = self.find_tab_index(tab_id) else {
            log::debug!("ignoring update for closed tab {}", tab_id);
            return false;
        };

        // A path already owned by another tab would make lookups ambiguous.
        let path = update
            .path
            .filter(|p| !self.tabs.iter().any(|t| t.id != tab_id && &t.path == p));

        let tab = &mut self.tabs[idx];
        let mut changed = false;
        if let Some(title) = update.title {
            if tab.title != title {
                tab.title = title;
                changed = true;
            }
        }
        if let Some(path) = path {
            if tab.path != path {
                tab.path = path;
                changed = true;
            }
        }
        if let Some(payload) = update.payload {
            if tab.payload != payload {
                tab.payload = payload;
                changed = true;
            }
        }

        if changed {
            self.touch();
        }
        changed
    }

    /// Removes a tab unless it is fixed. A closed active tab hands focus to
    /// its left neighbour; an emptied workspace gets a fresh home tab.
    fn close(&mut self, tab_id: &str) -> bool {
        let Some(idx) = self.find_tab_index(tab_id) else {
            return false;
        };
        if self.tabs[idx].is_fixed {
            return false;
        }

        let was_active = self.active_tab_id.as_deref() == Some(tab_id);
        self.tabs.remove(idx);
        self.touch();

        if self.tabs.is_empty() {
            self.tabs.push(self.home.clone());
            self.active_tab_id = Some(self.home.id.clone());
            return true;
        }

        if was_active {
            let new_idx = idx.saturating_sub(1).min(self.tabs.len() - 1);
            self.active_tab_id = Some(self.tabs[new_idx].id.clone());
        }
        true
    }

    fn switch_to(&mut self, tab_id: &str) -> bool {
        if self.find_tab_index(tab_id).is_none() {
            return false;
        }
        self.activate(tab_id)
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn find_by_path(&self, path: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.path == path)
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_deref()
            .and_then(|id| self.get_tab(id))
    }

    fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
