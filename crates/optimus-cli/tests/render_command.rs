use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_optimus_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("optimus")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn optimus(state: &TempDir) -> Command {
    let mut cmd = Command::new(get_optimus_bin());
    cmd.arg("--state-dir").arg(state.path());
    cmd
}

#[test]
fn test_render_application_table() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("list_applications")
        .arg(fixture("applications.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Applications (list_applications)"))
        .stdout(predicate::str::contains("app-20240101120000-0001"))
        .stdout(predicate::str::contains("Nightly ETL"))
        .stdout(predicate::str::contains("120.0s"))
        .stdout(predicate::str::contains("Completed"))
        .stdout(predicate::str::contains("Running"));
}

#[test]
fn test_render_table_format() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("--format")
        .arg("table")
        .arg("render")
        .arg("list_applications")
        .arg(fixture("applications.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "ID,Name,Duration,Status,User,Started,Target",
        ))
        .stdout(predicate::str::contains(
            "app-20240101130000-0002,Adhoc Report,45.0s,Running,analyst,",
        ));
}

#[test]
fn test_render_marks_selected_application() {
    let state = TempDir::new().unwrap();

    optimus(&state)
        .arg("select")
        .arg("app-20240101130000-0002")
        .assert()
        .success();

    let mut cmd = optimus(&state);
    cmd.arg("--format")
        .arg("json")
        .arg("render")
        .arg("list_applications")
        .arg(fixture("applications.json"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let view: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(view["variant"], "application-table");
    assert_eq!(view["body"]["data"][0]["is_target"], false);
    assert_eq!(view["body"]["data"][1]["is_target"], true);
}

#[test]
fn test_render_bottlenecks_by_category() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("get_job_bottlenecks")
        .arg(fixture("bottlenecks.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[CRITICAL] Executor memory spill"))
        .stdout(predicate::str::contains("[WARN] High GC overhead"))
        .stdout(predicate::str::contains("[INFO] Dynamic allocation is disabled"))
        .stdout(predicate::str::contains("Increase spark.executor.memory"));
}

#[test]
fn test_render_severity_filter() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("get_job_bottlenecks")
        .arg(fixture("bottlenecks.json"))
        .arg("--severity")
        .arg("critical");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Executor memory spill"))
        .stdout(predicate::str::contains("High GC overhead").not());
}

#[test]
fn test_render_empty_payload_from_stdin() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render").arg("get_job_bottlenecks").write_stdin("{}");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No bottlenecks detected"));
}

#[test]
fn test_render_unknown_tool_shows_raw_payload() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("get_stage_task_summary")
        .arg(fixture("unknown_tool.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Raw Result (get_stage_task_summary)"))
        .stdout(predicate::str::contains("\"quantiles\""));
}

#[test]
fn test_render_environment_diff() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("compare_job_environments")
        .arg(fixture("environment_diff.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("app-a vs app-b"))
        .stdout(predicate::str::contains("spark.executor.memory: 4g → 8g"))
        .stdout(predicate::str::contains("spark.eventLog.enabled: true → -"))
        .stdout(predicate::str::contains("spark.sql.adaptive.enabled: - → true"));
}

#[test]
fn test_render_performance_scorecard() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("--format")
        .arg("json")
        .arg("render")
        .arg("compare_job_performance")
        .arg(fixture("performance.json"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let view: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(view["variant"], "performance-scorecard");
    assert_eq!(view["body"]["data"]["app1"]["score"], 65);
    assert_eq!(view["body"]["data"]["app2"]["score"], 47);
    assert_eq!(view["body"]["data"]["winner"], "app1");
}

#[test]
fn test_render_bridge_envelope() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("list_applications")
        .arg(fixture("envelope.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("app-envelope"));
}

#[test]
fn test_render_missing_file() {
    let state = TempDir::new().unwrap();
    let mut cmd = optimus(&state);
    cmd.arg("render")
        .arg("list_applications")
        .arg(fixture("does-not-exist.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}
