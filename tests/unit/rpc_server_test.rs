//! End-to-end check of the `crm-workspace-rpc` binary over its stdin/stdout
//! protocol. Only built when the binary is (`network` feature).

#![cfg(feature = "network")]

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

#[test]
fn test_binary_answers_requests_and_exits_on_eof() {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let mut child = Command::new(env!("CARGO_BIN_EXE_crm-workspace-rpc"))
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .env("CRM_WORKSPACE_DATA_DIR", tmp.path().join("data"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start rpc server");

    let mut stdin = child.stdin.take().unwrap();
    let mut lines = BufReader::new(child.stdout.take().unwrap()).lines();
    let mut next = || -> Value { serde_json::from_str(&lines.next().unwrap().unwrap()).unwrap() };

    assert_eq!(next()["event"], "ready");

    writeln!(stdin, "{}", json!({"id": 1, "method": "ping"})).unwrap();
    assert_eq!(next(), json!({"id": 1, "result": {"pong": true}}));

    writeln!(
        stdin,
        "{}",
        json!({"id": 2, "method": "session.login", "params": {"user_id": "42", "tenant": "acme", "location": "/app/acme/sales"}})
    )
    .unwrap();
    let res = next();
    assert_eq!(res["id"], 2);
    assert_eq!(res["result"]["workspace"]["activeTabId"], "page_sales");

    writeln!(stdin, "not json").unwrap();
    assert!(next()["error"].as_str().unwrap().starts_with("parse error"));

    drop(stdin);
    let status = child.wait().unwrap();
    assert!(status.success());
    assert!(tmp.path().join("data").join("workspace.db").exists());
}
