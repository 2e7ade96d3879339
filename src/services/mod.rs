// CRM workspace services
// Lookups, rendering, configuration, and the record-title collaborator.

pub mod icon_registry;
pub mod record_fetcher;
pub mod settings_engine;
pub mod shadow_resolver;
pub mod workspace_renderer;
