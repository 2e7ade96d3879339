use serde::{Deserialize, Serialize};

use super::tab::TabPayload;

/// Tenant-specific component substituted for the generic page renderer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShadowComponent {
    DemoDashboard,
    DemoPipelineBoard,
    DemoClientList,
    DemoClientProfile,
    DemoInvoiceList,
    SandboxDashboard,
    SandboxAutomationTrail,
}

impl ShadowComponent {
    pub fn name(&self) -> &'static str {
        match self {
            ShadowComponent::DemoDashboard => "DemoDashboard",
            ShadowComponent::DemoPipelineBoard => "DemoPipelineBoard",
            ShadowComponent::DemoClientList => "DemoClientList",
            ShadowComponent::DemoClientProfile => "DemoClientProfile",
            ShadowComponent::DemoInvoiceList => "DemoInvoiceList",
            ShadowComponent::SandboxDashboard => "SandboxDashboard",
            ShadowComponent::SandboxAutomationTrail => "SandboxAutomationTrail",
        }
    }
}

/// Input handed to the generic page loader.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PageProps {
    pub page_id: Option<String>,
    pub sub_page_id: Option<String>,
    pub record_id: Option<String>,
    pub draft_id: Option<String>,
}

impl From<&TabPayload> for PageProps {
    fn from(payload: &TabPayload) -> Self {
        Self {
            page_id: payload.page_id.clone(),
            sub_page_id: payload.sub_page_id.clone(),
            record_id: payload.record_id.clone(),
            draft_id: payload.draft_id.clone(),
        }
    }
}

/// What a layer mounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerContent {
    Dashboard,
    Shadow { component: ShadowComponent },
    PageLoader { props: PageProps },
    Builder { props: PageProps },
}

/// Whether hidden layers keep their periodic refresh running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BackgroundPolicy {
    #[default]
    PauseWhenHidden,
    PollAlways,
}
