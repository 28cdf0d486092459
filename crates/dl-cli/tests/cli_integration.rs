//! End-to-end tests for the `dl` binary.
//!
//! Each test writes a log and a config file into a temp directory and runs
//! the real binary against them with `HOME` pointed at the temp directory.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const LOG: &str = "\
# 27/Apr/22
8:00, daily warms up
  * email
  * zulip
8:30, #8280 AI Recommend by email is broken: * setup up debug tools
9:19, Wrong Ask Formatting Emails Issue: communicate
9:38, break
9:44, n8n User Stories Delivery
10:00, daily, Nash Chase
12:00, break

# 26/Apr/22
7:30, AI recommendation investigate on Kourosh
10:00, DevOps Daily Meeting, Serge
12:00, break
";

const CONFIG: &str = r#"
user_name = "Flash"
team_roster = ["Nash", "Chase", "Serge"]

[email]
from = "flash@example.com"
to = "team@example.com"
body = "Daily log attached."
transport = "sendmail"
command = "cat"
args = []
"#;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new(log: &str) -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("log.md"), log).unwrap();
        std::fs::write(temp.path().join("config.toml"), CONFIG).unwrap();
        Self { temp }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_dl"));
        command
            .env("HOME", self.temp.path())
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("config.toml"));
        command
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("failed to run dl")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn log_arg(ws: &Workspace) -> String {
    ws.path("log.md").to_string_lossy().into_owned()
}

#[test]
fn test_report_prints_daily_table() {
    let ws = Workspace::new(LOG);
    let output = ws.run(&["report", &log_arg(&ws)]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Description"));
    assert!(out.contains("8:00 - 8:30"));
    assert!(out.contains("Chase, Flash, Nash"));
    assert!(!out.contains("26/Apr/22"), "daily report shows only the first section");
    assert!(out.ends_with("Total: 3.91 hours\n"), "{out}");
}

#[test]
fn test_report_full_json() {
    let ws = Workspace::new(LOG);
    let output = ws.run(&["report", &log_arg(&ws), "--full", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rows = value["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["description"], "daily warms up\n  * email\n  * zulip");
    assert_eq!(rows[1]["priority"], "High");
    assert_eq!(rows[5]["category"], "Investigation");
    assert_eq!(rows[6]["persons"], "Flash, Serge");
    assert_eq!(value["total"], 8.41);
}

#[test]
fn test_malformed_entry_fails_unless_skipped() {
    let ws = Workspace::new("# 27/Apr/22\n8:00, a\n8:30 no comma\n9:00, c\n");

    let output = ws.run(&["report", &log_arg(&ws)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("malformed entry \"8:30 no comma\""));

    let output = ws.run(&["report", &log_arg(&ws), "--skip-malformed"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Skipped malformed entry: 8:30 no comma"));
    assert!(stdout(&output).contains("8:00 - 9:00"));
}

#[test]
fn test_orphan_continuation_fails() {
    let ws = Workspace::new("# 27/Apr/22\n  * orphan\n8:00, a\n");
    let output = ws.run(&["report", &log_arg(&ws), "--skip-malformed"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("continuation line with no preceding entry"));
}

#[test]
fn test_missing_log_file_fails() {
    let ws = Workspace::new(LOG);
    let missing = ws.path("missing.md");
    let output = ws.run(&["report", &missing.to_string_lossy()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read"));
}

#[test]
fn test_export_writes_spreadsheet() {
    let ws = Workspace::new(LOG);
    let xlsx = ws.path("report.xlsx");
    let output = ws.run(&["export", &log_arg(&ws), "--full", "-o", &xlsx.to_string_lossy()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Wrote 7 rows"));
    assert!(std::fs::read(&xlsx).unwrap().starts_with(b"PK"));
}

#[cfg(unix)]
#[test]
fn test_email_sends_through_configured_command() {
    let ws = Workspace::new(LOG);
    let xlsx = ws.path("output.xlsx");
    let output = ws.run(&["email", &log_arg(&ws), "-o", &xlsx.to_string_lossy(), "--yes"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    // Preview first, then the message echoed back by `cat`
    assert!(out.contains("Subject: Flash's Daily Task Log for Wed 27/Apr/22"));
    assert!(out.contains("[attachment: output.xlsx"));
    assert!(out.contains("Content-Transfer-Encoding: base64"));
    assert!(stderr(&output).contains("Sent \"Flash's Daily Task Log for Wed 27/Apr/22\" to team@example.com"));
}

#[test]
fn test_email_declined_is_not_sent() {
    let ws = Workspace::new(LOG);
    let log = log_arg(&ws);
    let xlsx = ws.path("output.xlsx").to_string_lossy().into_owned();
    let args: [&str; 4] = ["email", &log, "-o", &xlsx];
    let mut child = ws
        .command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.as_mut().unwrap().write_all(b"n\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[Y/n]"));
    assert!(!stdout(&output).contains("Content-Transfer-Encoding"));
    assert!(stderr(&output).contains("Email not sent."));
}

#[test]
fn test_email_smtp_settings_come_from_env() {
    let ws = Workspace::new(LOG);
    let log = log_arg(&ws);
    let xlsx = ws.path("output.xlsx");
    let xlsx_arg = xlsx.to_string_lossy().into_owned();
    let args: [&str; 5] = ["email", &log, "-o", &xlsx_arg, "--yes"];

    let output = ws
        .command()
        .env("DL_EMAIL__TRANSPORT", "smtp")
        .env("DL_EMAIL__SMTP_SERVER", "smtp.example.com")
        .env_remove("DL_EMAIL__PASSWORD")
        .args(args)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("email.password is not configured"));
    // Transport settings are checked before anything is written
    assert!(!xlsx.exists());
}

#[test]
fn test_env_overrides_config_file() {
    let ws = Workspace::new(LOG);
    let log = log_arg(&ws);
    let args: [&str; 3] = ["report", &log, "--json"];
    let output = ws
        .command()
        .env("DL_USER_NAME", "Robin")
        .args(args)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["rows"][0]["persons"], "Robin");
}

#[test]
fn test_no_subcommand_prints_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_dl"))
        .env("HOME", Path::new("/nonexistent"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}
