//! App Core for the CRM workspace.
//!
//! Owns the per-session workspace and wires the registry to persistence, the
//! navigation location, and the renderer. Every registry mutation is followed
//! by a best-effort save; user-driven focus changes push the active tab's
//! path back to the host.

use crate::managers::navigator::Navigator;
use crate::managers::persistence_adapter::{KeyValueStore, PersistenceAdapter, PersistenceAdapterTrait};
use crate::managers::route_synchronizer::{RouteConfig, RouteSynchronizer, RouteSynchronizerTrait};
use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::shadow_resolver::ShadowResolver;
use crate::services::workspace_renderer::{Layer, WorkspaceRenderer};
use crate::types::errors::{FetchError, SessionError, SettingsError};
use crate::types::route::{SyncOutcome, SyncReport};
use crate::types::settings::WorkspaceSettings;
use crate::types::tab::{Tab, TabSpec, TabUpdate};

/// State that exists only while a user is logged in.
pub struct Session {
    pub user_id: String,
    pub tenant: String,
    pub registry: TabRegistry,
    route_resolved: bool,
}

impl Session {
    pub fn route_resolved(&self) -> bool {
        self.route_resolved
    }
}

/// Central struct holding the managers and services of one front-end process.
pub struct App<S: KeyValueStore, N: Navigator> {
    settings_engine: SettingsEngine,
    persistence: PersistenceAdapter<S>,
    synchronizer: RouteSynchronizer,
    renderer: WorkspaceRenderer,
    navigator: N,
    session: Option<Session>,
}

impl<S: KeyValueStore, N: Navigator> App<S, N> {
    pub fn new(settings_engine: SettingsEngine, store: S, navigator: N) -> Self {
        let settings = settings_engine.get_settings().clone();
        Self {
            persistence: PersistenceAdapter::with_prefix(store, &settings.routing.storage_key_prefix),
            synchronizer: RouteSynchronizer::new(RouteConfig::from_settings(&settings)),
            renderer: WorkspaceRenderer::new(
                ShadowResolver::builtin(),
                "",
                settings.rendering.background_policy,
            ),
            settings_engine,
            navigator,
            session: None,
        }
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        self.settings_engine.get_settings()
    }

    /// Updates one setting and rebuilds the parts that depend on it.
    ///
    /// An open session follows the change: its workspace is saved under a new
    /// key prefix, and tabs still showing the old placeholder take the new one
    /// so the zombie sweep keeps recognising them.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        let old_placeholder = self.synchronizer.config().placeholder_title.clone();
        self.settings_engine.set_value(key, value)?;
        let settings = self.settings_engine.get_settings().clone();
        self.synchronizer = RouteSynchronizer::new(RouteConfig::from_settings(&settings));
        self.renderer.set_policy(settings.rendering.background_policy);

        let mut dirty = false;
        if self.persistence.key_prefix() != settings.routing.storage_key_prefix {
            self.persistence
                .set_key_prefix(&settings.routing.storage_key_prefix);
            dirty = true;
        }

        let new_placeholder = &settings.general.placeholder_title;
        if let Some(session) = self.session.as_mut() {
            if &old_placeholder != new_placeholder {
                let loading: Vec<String> = session
                    .registry
                    .tabs()
                    .iter()
                    .filter(|t| t.title == old_placeholder)
                    .map(|t| t.id.clone())
                    .collect();
                for id in loading {
                    dirty |= session
                        .registry
                        .update_tab(&id, TabUpdate::title(new_placeholder.as_str()));
                }
            }
        }

        if dirty {
            self.save();
        }
        Ok(())
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn registry(&self) -> Option<&TabRegistry> {
        self.session.as_ref().map(|s| &s.registry)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a session: restores the user's saved tabs (or the default
    /// workspace) and syncs with the current location. An unresolvable
    /// landing location is replaced by the restored active tab's path.
    pub fn login(&mut self, user_id: &str, tenant: &str) -> Result<SyncReport, SessionError> {
        if user_id.trim().is_empty() {
            return Err(SessionError::InvalidUser(user_id.to_string()));
        }
        if self.session.is_some() {
            self.logout()?;
        }

        let config = self.synchronizer.config();
        let home = Tab::home(&config.home_title, &config.home_path(tenant));
        let registry = match self.persistence.load(user_id) {
            Some(saved) => {
                log::info!("restoring {} saved tab(s) for user {}", saved.tabs.len(), user_id);
                TabRegistry::from_workspace(saved, home)
            }
            None => TabRegistry::new(home),
        };

        self.renderer.set_tenant(tenant);
        self.renderer.reset();
        self.session = Some(Session {
            user_id: user_id.to_string(),
            tenant: tenant.to_string(),
            registry,
            route_resolved: true,
        });

        let mut report = self.on_location_changed()?;
        if report.outcome == SyncOutcome::Unresolved {
            self.push_active_path();
            report = SyncReport::unchanged();
        }
        self.save();
        Ok(report)
    }

    /// Saves and drops the session's workspace.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.save();
        let session = self.session.take().ok_or(SessionError::NotLoggedIn)?;
        self.renderer.reset();
        log::info!("closed workspace session for user {}", session.user_id);
        Ok(())
    }

    /// Runs the route synchronizer against the navigator's current location.
    pub fn on_location_changed(&mut self) -> Result<SyncReport, SessionError> {
        let location = self.navigator.location();
        let session = self.session.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let before = session.registry.revision();

        let report = self.synchronizer.sync(&mut session.registry, &location);
        session.route_resolved = report.outcome != SyncOutcome::Unresolved;

        if session.registry.revision() != before {
            self.save();
        }
        Ok(report)
    }

    /// Opens (or focuses) a tab on behalf of the user and navigates to it.
    pub fn open_tab(&mut self, spec: TabSpec) -> Result<String, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let before = session.registry.revision();
        let id = session.registry.open_or_focus(spec);
        self.after_user_action(before);
        Ok(id)
    }

    pub fn switch_tab(&mut self, tab_id: &str) -> Result<bool, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let before = session.registry.revision();
        let switched = session.registry.switch_to(tab_id);
        self.after_user_action(before);
        Ok(switched)
    }

    pub fn close_tab(&mut self, tab_id: &str) -> Result<bool, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let before = session.registry.revision();
        let closed = session.registry.close(tab_id);
        self.after_user_action(before);
        Ok(closed)
    }

    pub fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> Result<bool, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotLoggedIn)?;
        let changed = session.registry.update_tab(tab_id, update);
        if changed {
            self.save();
        }
        Ok(changed)
    }

    /// Applies the outcome of a title fetch. Failures keep the placeholder,
    /// leaving the tab to the zombie sweep.
    pub fn apply_title(&mut self, tab_id: &str, result: Result<String, FetchError>) -> bool {
        match result {
            Ok(title) => self
                .update_tab(tab_id, TabUpdate::title(title))
                .unwrap_or(false),
            Err(e) => {
                log::warn!("could not load title for tab {}: {}", tab_id, e);
                false
            }
        }
    }

    /// Reconciles the mounted layers with the registry.
    pub fn render(&mut self) -> Result<&[Layer], SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NotLoggedIn)?;
        Ok(self.renderer.render(&session.registry, session.route_resolved))
    }

    fn after_user_action(&mut self, before: u64) {
        let changed = self
            .session
            .as_ref()
            .is_some_and(|s| s.registry.revision() != before);
        if changed {
            self.push_active_path();
            self.save();
        }
    }

    /// Navigates the host to the active tab unless it is already there.
    fn push_active_path(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(path) = session.registry.get_active_tab().map(|t| t.path.clone()) else {
            return;
        };
        session.route_resolved = true;
        if self.navigator.location().full_path() != path {
            self.navigator.push(&path);
        }
    }

    fn save(&self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if let Err(e) = self
            .persistence
            .save(&session.user_id, &session.registry.workspace())
        {
            log::warn!("could not save workspace for user {}: {}", session.user_id, e);
        }
    }
}
