// CRM workspace state managers
// Managers own mutable workspace state: the tab registry, its persistence, and URL sync.

pub mod navigator;
pub mod persistence_adapter;
pub mod route_synchronizer;
pub mod tab_registry;
