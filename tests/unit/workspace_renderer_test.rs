//! Unit tests for layer reconciliation and visibility in the workspace renderer.

use crm_workspace::managers::route_synchronizer::{RouteSynchronizer, RouteSynchronizerTrait};
use crm_workspace::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crm_workspace::services::icon_registry::Icon;
use crm_workspace::services::shadow_resolver::ShadowResolver;
use crm_workspace::services::workspace_renderer::WorkspaceRenderer;
use crm_workspace::types::render::{BackgroundPolicy, LayerContent, PageProps, ShadowComponent};
use crm_workspace::types::route::Location;
use crm_workspace::types::tab::{Tab, HOME_TAB_ID};

fn registry_with(tenant: &str, paths: &[&str]) -> TabRegistry {
    let synchronizer = RouteSynchronizer::default();
    let mut registry = TabRegistry::new(Tab::home("Dashboard", &format!("/app/{}/dashboard", tenant)));
    for path in paths {
        synchronizer.sync(&mut registry, &Location::parse(path));
    }
    registry
}

fn renderer(tenant: &str) -> WorkspaceRenderer {
    WorkspaceRenderer::new(ShadowResolver::builtin(), tenant, BackgroundPolicy::PauseWhenHidden)
}

#[test]
fn test_one_layer_per_tab_only_active_visible() {
    let registry = registry_with("acme", &["/app/acme/sales", "/app/acme/sales/clients"]);
    let mut renderer = renderer("acme");

    let layers = renderer.render(&registry, true);
    assert_eq!(layers.len(), 3);
    let visible: Vec<&str> = layers.iter().filter(|l| l.visible).map(|l| l.tab_id.as_str()).collect();
    assert_eq!(visible, vec!["subpage_clients"]);
    for layer in layers {
        assert_eq!(layer.interactive, layer.visible);
        assert_eq!(layer.polling_enabled, layer.visible);
    }
}

#[test]
fn test_switching_tabs_keeps_mount_ids() {
    let mut registry = registry_with("acme", &["/app/acme/sales", "/app/acme/sales/clients"]);
    let mut renderer = renderer("acme");
    let before: Vec<(String, u64)> = renderer
        .render(&registry, true)
        .iter()
        .map(|l| (l.tab_id.clone(), l.mount_id))
        .collect();

    registry.switch_to("page_sales");
    let after: Vec<(String, u64)> = renderer
        .render(&registry, true)
        .iter()
        .map(|l| (l.tab_id.clone(), l.mount_id))
        .collect();

    assert_eq!(before, after);
    assert_eq!(renderer.visible_layer().map(|l| l.tab_id.as_str()), Some("page_sales"));
}

#[test]
fn test_closing_and_reopening_remounts() {
    let mut registry = registry_with("acme", &["/app/acme/sales"]);
    let mut renderer = renderer("acme");
    let first = renderer.render(&registry, true)[1].mount_id;

    registry.close("page_sales");
    assert_eq!(renderer.render(&registry, true).len(), 1);

    RouteSynchronizer::default().sync(&mut registry, &Location::parse("/app/acme/sales"));
    let second = renderer.render(&registry, true)[1].mount_id;
    assert_ne!(first, second);
}

#[test]
fn test_unresolved_route_hides_every_layer() {
    let registry = registry_with("acme", &["/app/acme/sales"]);
    let mut renderer = renderer("acme");
    let layers = renderer.render(&registry, false);
    assert_eq!(layers.len(), 2);
    assert!(layers.iter().all(|l| !l.visible && !l.interactive));
    assert!(renderer.visible_layer().is_none());
}

#[test]
fn test_poll_always_keeps_hidden_layers_polling() {
    let registry = registry_with("acme", &["/app/acme/sales"]);
    let mut renderer = renderer("acme");
    renderer.set_policy(BackgroundPolicy::PollAlways);
    let layers = renderer.render(&registry, true);
    assert!(layers.iter().all(|l| l.polling_enabled));
    assert!(!layers[0].visible);
}

#[test]
fn test_generic_content_for_regular_tenant() {
    let registry = registry_with(
        "acme",
        &["/builder/acme/entities", "/app/acme/sales/clients/record?id=42"],
    );
    let mut renderer = renderer("acme");
    let layers = renderer.render(&registry, true);

    assert_eq!(layers[0].content, LayerContent::Dashboard);
    assert_eq!(layers[0].icon, Icon::Dashboard);
    assert!(matches!(layers[1].content, LayerContent::Builder { .. }));
    assert_eq!(layers[1].icon, Icon::Builder);
    assert_eq!(
        layers[2].content,
        LayerContent::PageLoader {
            props: PageProps {
                page_id: Some("sales".to_string()),
                sub_page_id: Some("clients".to_string()),
                record_id: Some("42".to_string()),
                draft_id: None,
            }
        }
    );
    assert_eq!(layers[2].icon, Icon::Record);
}

#[test]
fn test_shadow_content_for_enrolled_tenant() {
    let registry = registry_with("demo", &["/app/demo/sales/clients", "/app/demo/reports"]);
    let mut renderer = renderer("demo");
    let layers = renderer.render(&registry, true);

    assert_eq!(
        layers[0].content,
        LayerContent::Shadow { component: ShadowComponent::DemoDashboard }
    );
    assert_eq!(
        layers[1].content,
        LayerContent::Shadow { component: ShadowComponent::DemoClientList }
    );
    assert!(matches!(layers[2].content, LayerContent::PageLoader { .. }));
}

#[test]
fn test_changing_tenant_remounts_everything() {
    let registry = registry_with("demo", &[]);
    let mut renderer = renderer("demo");
    let first = renderer.render(&registry, true)[0].mount_id;

    renderer.set_tenant("sandbox");
    assert!(renderer.layers().is_empty());
    let layer = &renderer.render(&registry, true)[0];
    assert_ne!(layer.mount_id, first);
    assert_eq!(
        layer.content,
        LayerContent::Shadow { component: ShadowComponent::SandboxDashboard }
    );
    assert_eq!(layer.tab_id, HOME_TAB_ID);
}

#[test]
fn test_layer_titles_follow_registry() {
    let mut registry = registry_with("acme", &["/app/acme/sales/clients/record?id=42"]);
    let mut renderer = renderer("acme");
    assert_eq!(renderer.render(&registry, true)[1].title, "Loading…");

    registry.update_tab(
        "record_42",
        crm_workspace::types::tab::TabUpdate::title("Acme Corp"),
    );
    assert_eq!(renderer.render(&registry, true)[1].title, "Acme Corp");
}

#[test]
fn test_builder_tabs_ignore_tenant_overrides() {
    let registry = registry_with("demo", &["/builder/demo/sales", "/builder/demo/sales/clients"]);
    let mut renderer = renderer("demo");
    let layers = renderer.render(&registry, true);

    for layer in &layers[1..] {
        assert!(
            matches!(layer.content, LayerContent::Builder { .. }),
            "builder tab {} was replaced by {:?}",
            layer.tab_id,
            layer.content
        );
    }
    assert_eq!(
        layers[1].content,
        LayerContent::Builder {
            props: PageProps {
                page_id: Some("sales".to_string()),
                ..PageProps::default()
            }
        }
    );
}
