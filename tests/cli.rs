use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn flow_cmd() -> Command {
    Command::cargo_bin("flow").expect("Failed to find flow binary")
}

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn of_kind<'a>(items: &'a [Value], kind: &str) -> Vec<&'a Value> {
    items
        .iter()
        .filter(|v| v.get("kind").and_then(|k| k.as_str()) == Some(kind))
        .collect()
}

fn labels(items: &[&Value]) -> Vec<String> {
    items
        .iter()
        .map(|v| v["label"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn order_emits_network_sites_and_channels() {
    let assert = flow_cmd()
        .arg("order")
        .arg(fixture("pipeline.flow"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["kind"], "network");
    assert_eq!(items[0]["label"], "ingestion");
    assert_eq!(items[0]["data"]["converged"], true);
    assert_eq!(items[0]["data"]["sites"], 8);

    let channels = of_kind(&items, "channel");
    assert_eq!(
        labels(&channels),
        vec!["normalize", "log", "publish", "summarize"]
    );
    let levels: Vec<i64> = channels.iter().map(|c| c["level"].as_i64().unwrap()).collect();
    assert_eq!(levels, vec![0, 0, 1, 2]);

    // sources of a channel come out deepest first
    assert_eq!(channels[3]["data"]["sources"], serde_json::json!(["report", "meta"]));

    let digest = of_kind(&items, "site")
        .into_iter()
        .find(|s| s["label"] == "digest")
        .unwrap();
    assert_eq!(digest["level"], 3);
    assert!(of_kind(&items, "warning").is_empty());
}

#[test]
fn json_definition_orders_like_description() {
    let from_dsl = flow_cmd()
        .args(["order"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success();
    let from_json = flow_cmd()
        .args(["order"])
        .arg(fixture("pipeline.json"))
        .assert()
        .success();

    let summarize = |stdout: &[u8]| -> Vec<(String, i64)> {
        parse_jsonl(stdout)
            .iter()
            .filter(|v| v["kind"] != "network")
            .map(|v| {
                (
                    v["label"].as_str().unwrap().to_string(),
                    v["level"].as_i64().unwrap(),
                )
            })
            .collect::<Vec<_>>()
    };
    let mut dsl = summarize(&from_dsl.get_output().stdout);
    let mut json = summarize(&from_json.get_output().stdout);
    dsl.sort();
    json.sort();
    assert_eq!(dsl, json);
}

#[test]
fn check_clean_network_succeeds_quietly() {
    let assert = flow_cmd()
        .args(["check", "--strict"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success();
    assert!(parse_jsonl(&assert.get_output().stdout).is_empty());
}

#[test]
fn check_reports_cycle_and_orphan() {
    let assert = flow_cmd()
        .arg("check")
        .arg(fixture("cyclic.flow"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let codes: Vec<&str> = items
        .iter()
        .map(|v| v["errors"][0]["code"].as_str().unwrap())
        .collect();
    assert_eq!(
        codes,
        vec!["ORPHANED_SITE", "UNREACHABLE_CHANNEL", "UNREACHABLE_CHANNEL"]
    );
    assert!(items.iter().all(|v| v["kind"] == "warning"));
}

#[test]
fn check_strict_fails_on_warnings() {
    flow_cmd()
        .args(["check", "--strict"])
        .arg(fixture("cyclic.flow"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("UNREACHABLE_CHANNEL"))
        .stderr(predicate::str::contains("3 warning(s) found"));
}

#[test]
fn parse_error_reports_line() {
    flow_cmd()
        .arg("order")
        .arg(fixture("broken.flow"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load network"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn parse_error_is_reported_as_error_item() {
    let assert = flow_cmd()
        .arg("order")
        .arg(fixture("broken.flow"))
        .assert()
        .failure();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "error");
    assert_eq!(items[0]["errors"][0]["code"], "PARSE_ERROR");
    assert!(items[0]["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("line 2"));
}

#[test]
fn unknown_output_format_fails() {
    flow_cmd()
        .args(["--format", "yaml", "order"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unknown format: yaml"));
}

#[test]
fn missing_file_fails() {
    let temp = tempdir().unwrap();
    flow_cmd()
        .arg("order")
        .arg(temp.path().join("absent.flow"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load network"));
}

#[test]
fn render_writes_output_file() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("pipeline.dot");

    flow_cmd()
        .args(["render", "--to", "dot", "--output"])
        .arg(&out)
        .arg(fixture("pipeline.flow"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph \"ingestion\" {"));
    assert!(dot.contains("\"_c3\" [label=\"summarize\", shape=box];"));
    assert!(dot.contains("\"_s3\" -> \"_s0\" [style=dashed];"));
}

#[test]
fn render_table_without_color() {
    flow_cmd()
        .args(["--no-color", "render", "--to", "table"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success()
        .stdout(predicate::str::contains("│ Level │ Channel   │"))
        .stdout(predicate::str::contains("│     2 │ summarize │ report, meta │"))
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn render_html_standalone() {
    flow_cmd()
        .args(["render", "--to", "html", "--standalone"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<title>ingestion</title>"))
        .stdout(predicate::str::contains("arrowhead_3"));
}

#[test]
fn render_rejects_unknown_format() {
    flow_cmd()
        .args(["render", "--to", "png"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .failure();
}

#[test]
fn sites_filters_by_kind_and_label() {
    let assert = flow_cmd()
        .args(["sites", "--kind", "group"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["label"], "inputs");
    assert_eq!(items[0]["data"]["members"], serde_json::json!(["raw", "meta"]));

    let assert = flow_cmd()
        .args(["sites", "--label", "raw", "--label", "digest"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    let found: Vec<&str> = items.iter().map(|v| v["label"].as_str().unwrap()).collect();
    assert_eq!(found, vec!["raw", "digest"]);
}

#[test]
fn channels_filter_by_source() {
    let assert = flow_cmd()
        .args(["channels", "--source", "meta"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);
    let found: Vec<&str> = items.iter().map(|v| v["label"].as_str().unwrap()).collect();
    assert_eq!(found, vec!["normalize", "summarize"]);
}

#[test]
fn channels_unknown_site_fails() {
    flow_cmd()
        .args(["channels", "--target", "nowhere"])
        .arg(fixture("pipeline.flow"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\":\"UNKNOWN_SITE\""))
        .stderr(predicate::str::contains("Key nowhere is not a recognized site"));
}

#[test]
fn markdown_output_has_sections() {
    flow_cmd()
        .args(["--format", "md", "order"])
        .arg(fixture("cyclic.flow"))
        .assert()
        .success()
        .stdout(predicate::str::contains("## Warnings"))
        .stdout(predicate::str::contains("- **ORPHANED_SITE**"))
        .stdout(predicate::str::contains("## Sites"))
        .stdout(predicate::str::contains("## Channels"));
}

#[test]
fn chain_emits_definition_that_loads_back() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("chain.json");

    flow_cmd()
        .args([
            "chain",
            "raw",
            "clean",
            "report",
            "--channel-labels",
            "normalize,summarize",
            "--name",
            "demo",
            "--output",
        ])
        .arg(&out)
        .assert()
        .success();

    let assert = flow_cmd().arg("order").arg(&out).assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["label"], "demo");
    assert_eq!(
        labels(&of_kind(&items, "channel")),
        vec!["normalize", "summarize"]
    );
}
