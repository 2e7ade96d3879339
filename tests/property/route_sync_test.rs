//! Property-based tests for the route synchronizer.
//!
//! Under any sequence of navigations, a second pass over the same location
//! changes nothing, a resolved location is always shown by the active tab, and
//! each logical resource maps to at most one tab.

use std::collections::HashSet;

use crm_workspace::managers::route_synchronizer::{RouteSynchronizer, RouteSynchronizerTrait};
use crm_workspace::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crm_workspace::types::route::{Location, SyncOutcome};
use crm_workspace::types::tab::{Tab, TabUpdate};
use proptest::prelude::*;

const LOCATIONS: &[&str] = &[
    "/app/acme/dashboard",
    "/app/acme/sales",
    "/app/acme/sales/clients",
    "/app/acme/sales/clients/record?id=1",
    "/app/acme/sales/clients?recordId=1",
    "/app/acme/sales/clients/record?id=2",
    "/app/acme/sales?draft=d1",
    "/app/acme/sales/clients/new?draftId=d2",
    "/builder/acme/entities",
    "/builder/acme/entities/fields",
    "/app/acme",
    "/login/acme/start",
];

#[derive(Debug, Clone)]
enum Step {
    Navigate(usize),
    /// A title fetch for whichever tab is at this index completes.
    TitleArrives(usize),
    Close(usize),
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof![
            5 => (0..LOCATIONS.len()).prop_map(Step::Navigate),
            1 => (0..10usize).prop_map(Step::TitleArrives),
            1 => (0..10usize).prop_map(Step::Close),
        ],
        1..40,
    )
}

fn fresh() -> TabRegistry {
    TabRegistry::new(Tab::home("Dashboard", "/app/acme/dashboard"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sync_invariants_hold(steps in arb_steps()) {
        let synchronizer = RouteSynchronizer::default();
        let mut registry = fresh();

        for step in &steps {
            match step {
                Step::Navigate(i) => {
                    let location = Location::parse(LOCATIONS[*i]);
                    let report = synchronizer.sync(&mut registry, &location);

                    if report.outcome != SyncOutcome::Unresolved {
                        let active = registry.get_active_tab().unwrap();
                        prop_assert_eq!(&active.path, LOCATIONS[*i]);
                        if let Some(id) = report.active_tab_id() {
                            prop_assert_eq!(active.id.as_str(), id);
                        }
                    }

                    let before = registry.workspace();
                    let again = synchronizer.sync(&mut registry, &location);
                    prop_assert_eq!(registry.workspace(), before);
                    if report.outcome != SyncOutcome::Unresolved {
                        prop_assert_eq!(again.outcome, SyncOutcome::Unchanged);
                    }
                }
                Step::TitleArrives(i) => {
                    let tabs = registry.tabs();
                    let id = tabs[i % tabs.len()].id.clone();
                    registry.update_tab(&id, TabUpdate::title("Loaded"));
                }
                Step::Close(i) => {
                    let tabs = registry.tabs();
                    let id = tabs[i % tabs.len()].id.clone();
                    registry.close(&id);
                }
            }

            let ids: HashSet<&str> = registry.tabs().iter().map(|t| t.id.as_str()).collect();
            prop_assert_eq!(ids.len(), registry.tab_count());
            let paths: HashSet<&str> = registry.tabs().iter().map(|t| t.path.as_str()).collect();
            prop_assert_eq!(paths.len(), registry.tab_count());
        }
    }

    #[test]
    fn only_the_active_tab_may_be_loading_after_navigation(steps in arb_steps()) {
        let synchronizer = RouteSynchronizer::default();
        let mut registry = fresh();

        for step in &steps {
            if let Step::Navigate(i) = step {
                let report = synchronizer.sync(&mut registry, &Location::parse(LOCATIONS[*i]));
                if matches!(report.outcome, SyncOutcome::Unchanged | SyncOutcome::Unresolved) {
                    continue;
                }
                let active = registry.active_tab_id().map(str::to_string);
                let loading: Vec<&str> = registry
                    .tabs()
                    .iter()
                    .filter(|t| t.title == "Loading…")
                    .map(|t| t.id.as_str())
                    .collect();
                prop_assert!(loading.len() <= 1, "several loading tabs: {:?}", loading);
                if let Some(id) = loading.first() {
                    prop_assert_eq!(Some(id.to_string()), active);
                }
            }
        }
    }
}
