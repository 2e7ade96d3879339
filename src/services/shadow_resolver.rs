//! Shadow Resolver.
//!
//! Static lookup `tenant -> page -> override` deciding whether a tenant gets a
//! bespoke component instead of the generic data-driven renderer. Only
//! enrolled tenants have entries; everyone else always falls through.

use std::collections::HashMap;

use crate::types::render::ShadowComponent;

/// Overrides registered for one logical page.
#[derive(Debug, Clone, Default)]
struct PageShadows {
    page: Option<ShadowComponent>,
    sub_pages: HashMap<String, ShadowComponent>,
}

/// Trait defining the shadow lookup interface.
pub trait ShadowResolverTrait {
    fn resolve(&self, page_id: &str, sub_page_id: Option<&str>, tenant: &str) -> Option<ShadowComponent>;
    fn is_enrolled(&self, tenant: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct ShadowResolver {
    tenants: HashMap<String, HashMap<String, PageShadows>>,
}

impl ShadowResolver {
    /// Resolver with no enrolled tenants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver preloaded with the demo and sandbox tenants.
    pub fn builtin() -> Self {
        let mut resolver = Self::new();
        resolver
            .register("demo", "dashboard", None, ShadowComponent::DemoDashboard)
            .register("demo", "sales", None, ShadowComponent::DemoPipelineBoard)
            .register("demo", "sales", Some("clients"), ShadowComponent::DemoClientList)
            .register("demo", "clients", None, ShadowComponent::DemoClientProfile)
            .register("demo", "billing", Some("invoices"), ShadowComponent::DemoInvoiceList)
            .register("sandbox", "dashboard", None, ShadowComponent::SandboxDashboard)
            .register("sandbox", "automation", None, ShadowComponent::SandboxAutomationTrail);
        resolver
    }

    /// Enrols `tenant` with an override for `page_id` (or one of its sub-pages).
    pub fn register(
        &mut self,
        tenant: &str,
        page_id: &str,
        sub_page_id: Option<&str>,
        component: ShadowComponent,
    ) -> &mut Self {
        let page = self
            .tenants
            .entry(tenant.to_string())
            .or_default()
            .entry(page_id.to_string())
            .or_default();
        match sub_page_id {
            Some(sub) => {
                page.sub_pages.insert(sub.to_string(), component);
            }
            None => page.page = Some(component),
        }
        self
    }
}

impl ShadowResolverTrait for ShadowResolver {
    /// A sub-page override wins over the page-level one. A page-level override
    /// also covers every sub-page of that page that has no entry of its own.
    fn resolve(&self, page_id: &str, sub_page_id: Option<&str>, tenant: &str) -> Option<ShadowComponent> {
        let page = self.tenants.get(tenant)?.get(page_id)?;
        sub_page_id
            .and_then(|sub| page.sub_pages.get(sub).copied())
            .or(page.page)
    }

    fn is_enrolled(&self, tenant: &str) -> bool {
        self.tenants.contains_key(tenant)
    }
}
