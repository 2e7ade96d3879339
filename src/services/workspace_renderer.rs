//! Workspace Renderer.
//!
//! Keeps one mounted layer per open tab and flips visibility instead of
//! mounting and unmounting, so scroll position and half-filled forms survive
//! tab switches. A layer's `mount_id` only changes when its tab is reopened.

use serde::Serialize;

use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::services::icon_registry::Icon;
use crate::services::shadow_resolver::{ShadowResolver, ShadowResolverTrait};
use crate::types::render::{BackgroundPolicy, LayerContent, PageProps};
use crate::types::tab::{Tab, TabKind};

/// One mounted tab view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Layer {
    pub tab_id: String,
    pub mount_id: u64,
    pub title: String,
    pub icon: Icon,
    pub content: LayerContent,
    pub visible: bool,
    pub interactive: bool,
    pub polling_enabled: bool,
}

pub struct WorkspaceRenderer<R: ShadowResolverTrait = ShadowResolver> {
    resolver: R,
    tenant: String,
    policy: BackgroundPolicy,
    layers: Vec<Layer>,
    next_mount_id: u64,
}

impl<R: ShadowResolverTrait> WorkspaceRenderer<R> {
    pub fn new(resolver: R, tenant: &str, policy: BackgroundPolicy) -> Self {
        Self {
            resolver,
            tenant: tenant.to_string(),
            policy,
            layers: Vec::new(),
            next_mount_id: 1,
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Switching tenant changes which overrides apply, so every layer remounts.
    pub fn set_tenant(&mut self, tenant: &str) {
        if self.tenant != tenant {
            self.tenant = tenant.to_string();
            self.layers.clear();
        }
    }

    pub fn set_policy(&mut self, policy: BackgroundPolicy) {
        self.policy = policy;
    }

    /// Drops every mounted layer.
    pub fn reset(&mut self) {
        self.layers.clear();
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn visible_layer(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.visible)
    }

    /// Picks what a tab mounts: tenant override first, then the generic view.
    /// Builder tabs always get the builder; overrides only replace data pages.
    pub fn content_for(&self, tab: &Tab) -> LayerContent {
        let props = PageProps::from(&tab.payload);
        if tab.kind == TabKind::BuilderPage {
            return LayerContent::Builder { props };
        }

        let page_id = tab.payload.page_id.as_deref().unwrap_or(tab.id.as_str());
        if let Some(component) =
            self.resolver
                .resolve(page_id, tab.payload.sub_page_id.as_deref(), &self.tenant)
        {
            return LayerContent::Shadow { component };
        }

        match tab.kind {
            TabKind::Dashboard => LayerContent::Dashboard,
            _ => LayerContent::PageLoader { props },
        }
    }

    /// Reconciles layers with the registry and applies visibility.
    ///
    /// When `route_resolved` is false the frame shows nothing.
    pub fn render(&mut self, registry: &TabRegistry, route_resolved: bool) -> &[Layer] {
        let active = if route_resolved {
            registry.active_tab_id().map(str::to_string)
        } else {
            None
        };

        let mut previous = std::mem::take(&mut self.layers);
        let mut layers = Vec::with_capacity(registry.tab_count());

        for tab in registry.tabs() {
            let content = self.content_for(tab);
            let mut layer = match previous.iter().position(|l| l.tab_id == tab.id) {
                Some(idx) => previous.swap_remove(idx),
                None => {
                    let mount_id = self.next_mount_id;
                    self.next_mount_id += 1;
                    log::debug!("mounting layer {} for tab {}", mount_id, tab.id);
                    Layer {
                        tab_id: tab.id.clone(),
                        mount_id,
                        title: String::new(),
                        icon: Icon::for_kind(tab.kind),
                        content: content.clone(),
                        visible: false,
                        interactive: false,
                        polling_enabled: false,
                    }
                }
            };

            let visible = active.as_deref() == Some(tab.id.as_str());
            layer.title = tab.title.clone();
            layer.icon = Icon::for_kind(tab.kind);
            layer.content = content;
            layer.visible = visible;
            layer.interactive = visible;
            layer.polling_enabled = visible || self.policy == BackgroundPolicy::PollAlways;
            layers.push(layer);
        }

        for dropped in &previous {
            log::debug!("unmounting layer {} for closed tab {}", dropped.mount_id, dropped.tab_id);
        }

        self.layers = layers;
        &self.layers
    }
}
