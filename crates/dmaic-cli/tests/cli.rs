#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dmaic(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dmaic").unwrap();
    cmd.current_dir(dir.path()).env("DMAIC_ROOT", dir.path());
    cmd
}

fn init_workspace(dir: &TempDir) {
    dmaic(dir).arg("init").assert().success();
}

fn write_payload(dir: &TempDir, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, json).unwrap();
    path
}

// ---------------------------------------------------------------------------
// dmaic init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    dmaic(&dir).arg("init").assert().success();

    assert!(dir.path().join(".dmaic").is_dir());
    assert!(dir.path().join(".dmaic/projects").is_dir());
    assert!(dir.path().join(".dmaic/state.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    dmaic(&dir).arg("init").assert().success();
    dmaic(&dir).arg("init").assert().success();
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().unwrap();
    dmaic(&dir)
        .args(["project", "create", "reduce-scrap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// dmaic project create / list / show
// ---------------------------------------------------------------------------

#[test]
fn project_create_and_list() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args([
            "project",
            "create",
            "reduce-scrap",
            "--title",
            "Reduce Scrap Rate",
        ])
        .assert()
        .success();

    dmaic(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reduce-scrap"))
        .stdout(predicate::str::contains("define"));
}

#[test]
fn project_create_invalid_slug_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args(["project", "create", "INVALID SLUG"])
        .assert()
        .failure();
}

#[test]
fn project_create_duplicate_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .failure();
}

#[test]
fn project_show() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args([
            "project",
            "create",
            "cycle-time",
            "--title",
            "Cut Order Cycle Time",
        ])
        .assert()
        .success();

    dmaic(&dir)
        .args(["project", "show", "cycle-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cut Order Cycle Time"))
        .stdout(predicate::str::contains("draft"));
}

#[test]
fn project_status_and_delete() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["project", "status", "scrap", "active"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["project", "show", "scrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active"));

    dmaic(&dir)
        .args(["project", "delete", "scrap"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["project", "show", "scrap"])
        .assert()
        .failure();
}

#[test]
fn project_create_records_owner_from_user_flag() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args(["--user", "alice", "project", "create", "scrap"])
        .assert()
        .success();

    dmaic(&dir)
        .args(["project", "show", "scrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"));
}

// ---------------------------------------------------------------------------
// dmaic phase — sequential gating
// ---------------------------------------------------------------------------

#[test]
fn phase_start_and_complete_flow() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    dmaic(&dir)
        .args(["phase", "start", "scrap", "define"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["phase", "complete", "scrap", "define"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Measure"));

    dmaic(&dir)
        .args(["phase", "status", "scrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Define"))
        .stdout(predicate::str::contains("[ ] Measure"))
        .stdout(predicate::str::contains("<- current"));
}

#[test]
fn phase_start_out_of_order_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    // Measure cannot start until define is completed
    dmaic(&dir)
        .args(["phase", "start", "scrap", "measure"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("define"));
}

#[test]
fn phase_complete_without_start_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    dmaic(&dir)
        .args(["phase", "complete", "scrap", "define"])
        .assert()
        .failure();
}

#[test]
fn completed_phase_cannot_be_restarted() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    dmaic(&dir)
        .args(["phase", "start", "scrap", "define"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["phase", "complete", "scrap", "define"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["phase", "start", "scrap", "define"])
        .assert()
        .failure();
}

#[test]
fn phase_status_json_exposes_gating() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let out = dmaic(&dir)
        .args(["--json", "phase", "status", "scrap"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let phases = v["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 5);
    assert_eq!(phases[0]["phase"], "define");
    assert_eq!(phases[0]["can_start"], true);
    assert_eq!(phases[1]["can_start"], false);
}

// ---------------------------------------------------------------------------
// dmaic tool — versioned saves
// ---------------------------------------------------------------------------

#[test]
fn tool_save_creates_version_one() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let payload = write_payload(
        &dir,
        "charter.json",
        r#"{"problem_statement": "Scrap rate is 8% on line 3", "goal_statement": "Reduce to 2% by Q4"}"#,
    );
    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("v1"));

    assert!(dir
        .path()
        .join(".dmaic/projects/scrap/tools/project_charter/v1.yaml")
        .exists());
}

#[test]
fn tool_save_archives_previous_version() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let first = write_payload(
        &dir,
        "charter1.json",
        r#"{"problem_statement": "Scrap rate is 8%"}"#,
    );
    let second = write_payload(
        &dir,
        "charter2.json",
        r#"{"problem_statement": "Scrap rate is 8% on line 3"}"#,
    );

    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&first)
        .assert()
        .success();
    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&second)
        .args(["--notes", "added line number"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v2"));

    dmaic(&dir)
        .args(["tool", "list", "scrap", "project_charter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v2"))
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("archived"))
        .stdout(predicate::str::contains("added line number"));
}

#[test]
fn tool_show_historical_version() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let first = write_payload(
        &dir,
        "c1.json",
        r#"{"problem_statement": "original wording"}"#,
    );
    let second = write_payload(
        &dir,
        "c2.json",
        r#"{"problem_statement": "revised wording"}"#,
    );
    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&first)
        .assert()
        .success();
    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&second)
        .assert()
        .success();

    dmaic(&dir)
        .args(["tool", "show", "scrap", "project_charter", "--version", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("original wording"))
        .stdout(predicate::str::contains("read-only"));

    // Active version is v2
    dmaic(&dir)
        .args(["tool", "show", "scrap", "project_charter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("revised wording"));
}

#[test]
fn tool_show_missing_version_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let payload = write_payload(&dir, "c.json", r#"{"problem_statement": "x"}"#);
    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&payload)
        .assert()
        .success();

    dmaic(&dir)
        .args(["tool", "show", "scrap", "project_charter", "--version", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("version 9"));
}

#[test]
fn tool_save_empty_payload_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let payload = write_payload(&dir, "empty.json", r#"{"problem_statement": "   "}"#);
    dmaic(&dir)
        .args(["tool", "save", "scrap", "project_charter", "--data"])
        .arg(&payload)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no meaningful content"));
}

#[test]
fn tool_save_unknown_project_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    let payload = write_payload(&dir, "c.json", r#"{"problem_statement": "x"}"#);
    dmaic(&dir)
        .args(["tool", "save", "ghost", "project_charter", "--data"])
        .arg(&payload)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn tool_save_fmea_and_show_computes_rpn() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let payload = write_payload(
        &dir,
        "fmea.json",
        r#"{
            "process_name": "Welding",
            "items": [{
                "process_step": "Tack weld",
                "potential_failure": "Cold joint",
                "effects": "Rework",
                "severity": 8,
                "causes": "Low amperage",
                "occurrence": 5,
                "current_controls": "Visual check",
                "detection": 3,
                "recommended_actions": "Add fixture"
            }]
        }"#,
    );
    dmaic(&dir)
        .args(["tool", "save", "scrap", "fmea", "--data"])
        .arg(&payload)
        .assert()
        .success();

    dmaic(&dir)
        .args(["tool", "show", "scrap", "fmea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cold joint"))
        .stdout(predicate::str::contains("120"));
}

#[test]
fn tool_save_pareto_and_show_ranks_vital_few() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    let payload = write_payload(
        &dir,
        "pareto.json",
        r#"{
            "analysis_title": "Defect categories",
            "items": [
                {"category": "Porosity", "frequency": 50},
                {"category": "Cracks", "frequency": 30},
                {"category": "Misalignment", "frequency": 15},
                {"category": "Other", "frequency": 5}
            ]
        }"#,
    );
    dmaic(&dir)
        .args(["tool", "save", "scrap", "pareto", "--data"])
        .arg(&payload)
        .assert()
        .success();

    dmaic(&dir)
        .args(["tool", "show", "scrap", "pareto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Porosity"))
        .stdout(predicate::str::contains("vital few"))
        .stdout(predicate::str::contains("80.0%"));
}

#[test]
fn tool_catalog_lists_phase_tools() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args(["tool", "catalog", "--phase", "analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fishbone"))
        .stdout(predicate::str::contains("pareto"))
        .stdout(predicate::str::contains("statistical_analysis"))
        .stdout(predicate::str::contains("sipoc").not());
}

#[test]
fn tool_saves_do_not_gate_phases() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    // Complete define with no tool documents saved at all
    dmaic(&dir)
        .args(["phase", "start", "scrap", "define"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["phase", "complete", "scrap", "define"])
        .assert()
        .success();

    // And save a control-phase tool while the project sits in measure
    let payload = write_payload(
        &dir,
        "sop.json",
        r#"{"title": "Weld inspection SOP", "items": [{"name": "Step 1", "description": "Check torch angle"}]}"#,
    );
    dmaic(&dir)
        .args(["tool", "save", "scrap", "sop", "--data"])
        .arg(&payload)
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// dmaic metric
// ---------------------------------------------------------------------------

#[test]
fn metric_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    dmaic(&dir)
        .args(["project", "create", "scrap"])
        .assert()
        .success();

    dmaic(&dir)
        .args([
            "metric", "add", "scrap", "scrap-rate", "8.2", "--unit", "%", "--phase", "measure",
            "--type", "baseline",
        ])
        .assert()
        .success();

    dmaic(&dir)
        .args(["metric", "list", "scrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scrap-rate"))
        .stdout(predicate::str::contains("8.2"));

    // Phase filter excludes metrics from other phases
    dmaic(&dir)
        .args(["metric", "list", "scrap", "--phase", "control"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scrap-rate").not());
}

// ---------------------------------------------------------------------------
// dmaic state
// ---------------------------------------------------------------------------

#[test]
fn state_shows_projects_and_activity() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args(["--user", "bob", "project", "create", "reduce-scrap"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["--user", "bob", "phase", "start", "reduce-scrap", "define"])
        .assert()
        .success();

    dmaic(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("reduce-scrap"))
        .stdout(predicate::str::contains("start_phase"))
        .stdout(predicate::str::contains("bob"));
}

// ---------------------------------------------------------------------------
// E2E: full DMAIC cycle
// ---------------------------------------------------------------------------

#[test]
fn e2e_full_dmaic_cycle() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    dmaic(&dir)
        .args([
            "project",
            "create",
            "reduce-scrap",
            "--title",
            "Reduce Scrap Rate",
            "--target",
            "2026-12-31",
        ])
        .assert()
        .success();

    for phase in ["define", "measure", "analyze", "improve", "control"] {
        dmaic(&dir)
            .args(["phase", "start", "reduce-scrap", phase])
            .assert()
            .success();
        dmaic(&dir)
            .args(["phase", "complete", "reduce-scrap", phase])
            .assert()
            .success();
    }

    let out = dmaic(&dir)
        .args(["--json", "phase", "status", "reduce-scrap"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    for phase in v["phases"].as_array().unwrap() {
        assert_eq!(phase["status"], "completed");
    }
    // Control stays current after completion, nothing follows it
    assert_eq!(v["current_phase"], "control");

    dmaic(&dir)
        .args(["project", "status", "reduce-scrap", "completed"])
        .assert()
        .success();
    dmaic(&dir)
        .args(["project", "show", "reduce-scrap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
}
