//! CLI integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Isolated config file and database for one test
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn database_path(&self) -> PathBuf {
        self.dir.path().join("reports.db")
    }

    fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("rad-scribe").unwrap();
        cmd.env_remove("ANTHROPIC_API_KEY")
            .env_remove("GEMINI_API_KEY")
            .env_remove("RAD_SCRIBE_PROVIDER")
            .env_remove("RAD_SCRIBE_DATABASE")
            .env_remove("RAD_SCRIBE_CONFIG")
            .arg("--config")
            .arg(self.config_path())
            .arg("--database")
            .arg(self.database_path());
        cmd
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_output() {
    Command::cargo_bin("rad-scribe")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("radiology"))
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("templates"))
        .stdout(predicate::str::contains("reports"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_output() {
    Command::cargo_bin("rad-scribe")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rad-scribe"));
}

#[test]
fn test_process_help() {
    Command::cargo_bin("rad-scribe")
        .unwrap()
        .args(["process", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_config_path_uses_override() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_get() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "provider", "Gemini"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["config", "get", "provider"])
        .assert()
        .success()
        .stdout(predicate::str::diff("gemini\n"));

    sandbox
        .cmd()
        .args(["config", "get", "model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_config_api_key_is_masked() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "api_key", "sk-ant-0123456789abcdef"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key"))
        .stdout(predicate::str::contains("sk-ant-0123456789abcdef").not());
}

#[test]
fn test_config_init_twice_fails() {
    let sandbox = Sandbox::new();

    sandbox.cmd().args(["config", "init"]).assert().success();
    assert!(sandbox.config_path().exists());

    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_templates_list_has_defaults() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .cmd()
        .args(["templates", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let templates = stdout_json(&output);
    let names: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["abdominal_ct", "chest_xray"]);
    assert!(sandbox.database_path().exists());
}

#[test]
fn test_templates_add_update_delete() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .cmd()
        .args(["templates", "add", "knee_mri", "--content", "MENISCI:\n[menisci]"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({ "name": "knee_mri", "content": "MENISCI:\n[menisci]" })
    );

    sandbox
        .cmd()
        .args(["templates", "update", "knee_mri", "--content", "LIGAMENTS:\n[acl]"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Template 'knee_mri' updated successfully",
        ));

    let output = sandbox
        .cmd()
        .args(["templates", "list"])
        .output()
        .unwrap();
    let templates = stdout_json(&output);
    let knee = templates
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "knee_mri")
        .unwrap();
    assert_eq!(knee["content"], "LIGAMENTS:\n[acl]");

    sandbox
        .cmd()
        .args(["templates", "delete", "knee_mri"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Template 'knee_mri' deleted successfully",
        ));
}

#[test]
fn test_templates_add_from_file() {
    let sandbox = Sandbox::new();
    let file = sandbox.dir.path().join("spine.txt");
    std::fs::write(&file, "ALIGNMENT:\n[alignment]").unwrap();

    sandbox
        .cmd()
        .args(["templates", "add", "spine"])
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("[alignment]"));
}

#[test]
fn test_deleted_default_template_is_not_reseeded() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["templates", "delete", "chest_xray"])
        .assert()
        .success();

    let output = sandbox
        .cmd()
        .args(["templates", "list"])
        .output()
        .unwrap();
    let templates = stdout_json(&output);
    assert_eq!(templates.as_array().unwrap().len(), 1);
    assert_eq!(templates[0]["name"], "abdominal_ct");
}

#[test]
fn test_reports_recent_starts_empty() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .cmd()
        .args(["reports", "recent"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!({ "reports": [] }));
}

#[test]
fn test_process_dry_run_prints_prompt() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args([
            "process",
            "Heart size is normal full stop",
            "--template",
            "chest_xray",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("expert radiologist"))
        .stdout(predicate::str::contains("heart size is normal."))
        .stdout(predicate::str::contains("Use the following template structure:"))
        .stdout(predicate::str::contains("[impression]"));
}

#[test]
fn test_process_dry_run_reads_stdin() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["process", "--dry-run"])
        .write_stdin("no pneumothorax full stop")
        .assert()
        .success()
        .stdout(predicate::str::contains("no pneumothorax."))
        .stdout(predicate::str::contains("template structure").not());
}

#[test]
fn test_process_dry_run_with_memory_storage() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["--storage", "memory", "process", "text", "--dry-run"])
        .assert()
        .success();

    assert!(!sandbox.database_path().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_process_stores_report_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "type": "text",
                "text": "FINDINGS:\nThe lungs are clear.\n\nIMPRESSION:\nNormal study."
            }],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.write_config(&format!(
        "provider = \"claude\"\napi_key = \"test-key\"\napi_base_url = \"{}\"\nrequest_delay_ms = 0\n",
        server.uri()
    ));

    let mut process = sandbox.cmd();
    process.args([
        "process",
        "The lungs are clear full stop",
        "--template",
        "chest_xray",
    ]);
    let output = tokio::task::spawn_blocking(move || process.output().unwrap())
        .await
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["report_id"], 1);
    assert!(result["processed_text"]
        .as_str()
        .unwrap()
        .contains("Normal study."));

    let mut show = sandbox.cmd();
    show.args(["reports", "show", "1"]);
    let output = tokio::task::spawn_blocking(move || show.output().unwrap())
        .await
        .unwrap();
    assert!(output.status.success());

    let report = &stdout_json(&output)["report"];
    assert_eq!(report["id"], 1);
    assert_eq!(report["title"], "FINDINGS:");
    assert_eq!(report["raw_transcription"], "the lungs are clear.");
    assert_eq!(report["template_name"], "chest_xray");

    let mut recent = sandbox.cmd();
    recent.args(["reports", "recent", "--limit", "5"]);
    let output = tokio::task::spawn_blocking(move || recent.output().unwrap())
        .await
        .unwrap();
    let reports = stdout_json(&output)["reports"].clone();
    assert_eq!(reports.as_array().unwrap().len(), 1);
    assert_eq!(reports[0]["title"], "FINDINGS:");
}
