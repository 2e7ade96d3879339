//! RPC method handler for the workspace JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested without stdio.
//! Mutating methods answer with the paths the host must navigate to
//! (`navigate`), the title fetches the server should start (`fetches`), and
//! the resulting workspace snapshot.

use std::sync::Mutex;

use serde_json::{json, Map, Value};

use crate::app::App;
use crate::managers::navigator::HostNavigator;
use crate::managers::persistence_adapter::KeyValueStore;
use crate::types::route::{SyncOutcome, SyncReport};
use crate::types::tab::{TabPayload, TabSpec, TabUpdate};

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn outcome_json(outcome: &SyncOutcome) -> Value {
    match outcome {
        SyncOutcome::Unchanged => json!({"kind": "unchanged"}),
        SyncOutcome::Focused(id) => json!({"kind": "focused", "tab_id": id}),
        SyncOutcome::Retargeted(id) => json!({"kind": "retargeted", "tab_id": id}),
        SyncOutcome::Opened(id) => json!({"kind": "opened", "tab_id": id}),
        SyncOutcome::Unresolved => json!({"kind": "unresolved"}),
    }
}

fn report_fields(report: &SyncReport, out: &mut Map<String, Value>) {
    out.insert("outcome".to_string(), outcome_json(&report.outcome));
    out.insert("swept".to_string(), json!(report.swept));
    let fetches: Vec<Value> = report
        .title_request
        .iter()
        .filter_map(|r| serde_json::to_value(r).ok())
        .collect();
    out.insert("fetches".to_string(), Value::Array(fetches));
}

/// Adds `navigate` and `workspace` to a mutating method's result.
fn finish<S: KeyValueStore>(app: &mut App<S, HostNavigator>, mut out: Map<String, Value>) -> Result<Value, String> {
    out.insert(
        "navigate".to_string(),
        json!(app.navigator_mut().drain_pushes()),
    );
    let workspace = match app.registry() {
        Some(registry) => serde_json::to_value(registry.workspace()).map_err(|e| e.to_string())?,
        None => Value::Null,
    };
    out.insert("workspace".to_string(), workspace);
    Ok(Value::Object(out))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method<S: KeyValueStore>(
    app: &Mutex<App<S, HostNavigator>>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    let mut a = app.lock().map_err(|e| e.to_string())?;

    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Session ───
        "session.login" => {
            let user_id = str_param(params, "user_id")?;
            let tenant = str_param(params, "tenant")?;
            if let Some(location) = params.get("location").and_then(|v| v.as_str()) {
                a.navigator_mut().set_location(location);
            }
            let report = a.login(user_id, tenant).map_err(|e| e.to_string())?;
            let mut out = Map::new();
            report_fields(&report, &mut out);
            finish(&mut a, out)
        }
        "session.logout" => {
            a.logout().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Navigation ───
        "location.changed" => {
            let location = str_param(params, "location")?;
            a.navigator_mut().set_location(location);
            let report = a.on_location_changed().map_err(|e| e.to_string())?;
            let mut out = Map::new();
            report_fields(&report, &mut out);
            finish(&mut a, out)
        }

        // ─── Tabs ───
        "tab.open" => {
            let path = str_param(params, "path")?;
            let title = str_param(params, "title")?;
            let kind = params
                .get("kind")
                .cloned()
                .ok_or("missing kind")
                .and_then(|v| serde_json::from_value(v).map_err(|_| "invalid kind"))?;
            let payload: TabPayload = match params.get("payload") {
                Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid payload: {}", e))?,
                None => TabPayload::default(),
            };
            let spec = TabSpec {
                id: params.get("id").and_then(|v| v.as_str()).map(str::to_string),
                title: title.to_string(),
                path: path.to_string(),
                kind,
                payload,
            };
            let id = a.open_tab(spec).map_err(|e| e.to_string())?;
            let mut out = Map::new();
            out.insert("id".to_string(), json!(id));
            finish(&mut a, out)
        }
        "tab.switch" => {
            let id = str_param(params, "id")?;
            let switched = a.switch_tab(id).map_err(|e| e.to_string())?;
            let mut out = Map::new();
            out.insert("switched".to_string(), json!(switched));
            finish(&mut a, out)
        }
        "tab.close" => {
            let id = str_param(params, "id")?;
            let closed = a.close_tab(id).map_err(|e| e.to_string())?;
            let mut out = Map::new();
            out.insert("closed".to_string(), json!(closed));
            finish(&mut a, out)
        }
        "tab.update" => {
            let id = str_param(params, "id")?;
            let update: TabUpdate =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid update: {}", e))?;
            if update.is_empty() {
                return Err("nothing to update".to_string());
            }
            let updated = a.update_tab(id, update).map_err(|e| e.to_string())?;
            Ok(json!({"updated": updated}))
        }
        "tab.list" => {
            let registry = a.registry().ok_or("No active session")?;
            serde_json::to_value(registry.workspace()).map_err(|e| e.to_string())
        }

        // ─── Rendering ───
        "workspace.render" => {
            let layers = a.render().map_err(|e| e.to_string())?;
            serde_json::to_value(layers).map_err(|e| e.to_string())
        }

        // ─── Settings ───
        "settings.get" => serde_json::to_value(a.settings()).map_err(|e| e.to_string()),
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            a.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
