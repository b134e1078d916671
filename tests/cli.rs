//! End-to-end tests for the command line interface

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn rundown() -> Command {
    let mut cmd = Command::cargo_bin("rundown").unwrap();
    cmd.env_remove("RUNDOWN_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_list_shows_public_tasks() {
    let (temp_dir, _) = common::create_test_config(
        r#"
name: demo
tasks:
  build:
    usage: Build everything
    run: echo build
  helper:
    private: true
    run: echo helper
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available tasks (demo)"))
        .stdout(predicate::str::contains("Build everything"))
        .stdout(predicate::str::contains("helper").not());
}

#[test]
fn test_list_freedit_project() {
    let (temp_dir, _) = common::create_freedit_project();

    rundown()
        .current_dir(temp_dir.path())
        .arg("-l")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean-server"))
        .stdout(predicate::str::contains("build-client"))
        .stdout(predicate::str::contains("start-server"));
}

#[test]
fn test_runs_named_task() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  hello:
    run: echo "hello from rundown"
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .args(["-q", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from rundown"));
}

#[test]
fn test_task_file_found_from_subdirectory() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  mark:
    run: touch marked
"#,
    );
    let nested = temp_dir.path().join("apps/server/src");
    fs::create_dir_all(&nested).unwrap();

    rundown()
        .current_dir(&nested)
        .args(["-q", "mark"])
        .assert()
        .success();

    assert!(temp_dir.path().join("marked").exists());
    assert!(!nested.join("marked").exists());
}

#[test]
fn test_unknown_task_fails() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  build:
    run: touch built
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .arg("biuld")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task 'biuld' is not defined"));

    assert!(!temp_dir.path().join("built").exists());
}

#[test]
fn test_exit_code_propagates() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  broken:
    run: exit 3
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .args(["-q", "broken"])
        .assert()
        .code(3);
}

#[test]
fn test_dry_run_freedit_build() {
    let (temp_dir, _) = common::create_freedit_project();

    rundown()
        .current_dir(temp_dir.path())
        .args(["--dry-run", "build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tsc --noEmit"))
        .stderr(predicate::str::contains("vite build"))
        .stderr(predicate::str::contains("cargo build --release"));
}

#[test]
fn test_clean_server_via_cli() {
    let (temp_dir, _) = common::create_freedit_project();
    let server = temp_dir.path().join("apps/server");
    fs::write(server.join("freedit.db"), "data").unwrap();
    fs::create_dir_all(server.join("target/debug")).unwrap();
    fs::write(server.join("Cargo.toml"), "[package]").unwrap();

    rundown()
        .current_dir(temp_dir.path())
        .arg("clean-server")
        .assert()
        .success();

    assert!(!server.join("freedit.db").exists());
    assert!(!server.join("target").exists());
    assert!(server.join("Cargo.toml").exists());
}

#[test]
fn test_file_flag() {
    let (temp_dir, config_path) = common::create_test_config(
        r#"
tasks:
  mark:
    run: touch marked
"#,
    );
    let elsewhere = tempfile::TempDir::new().unwrap();

    rundown()
        .current_dir(elsewhere.path())
        .arg("-f")
        .arg(&config_path)
        .args(["-q", "mark"])
        .assert()
        .success();

    assert!(temp_dir.path().join("marked").exists());
}

#[test]
fn test_task_arguments() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  serve:
    args:
      - name: port
        default: "3001"
    run: echo "port=${port}" > port.txt
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .args(["-q", "serve", "8080"])
        .assert()
        .success();
    let port = fs::read_to_string(temp_dir.path().join("port.txt")).unwrap();
    assert_eq!(port.trim(), "port=8080");

    rundown()
        .current_dir(temp_dir.path())
        .args(["-q", "serve"])
        .assert()
        .success();
    let port = fs::read_to_string(temp_dir.path().join("port.txt")).unwrap();
    assert_eq!(port.trim(), "port=3001");
}

#[test]
fn test_invalid_task_file_reports_error() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  nuke:
    clean: [/etc]
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .arg("--list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsafe clean path"));
}

#[test]
fn test_default_task_with_chooser_flag() {
    let (temp_dir, _) = common::create_freedit_project();

    rundown()
        .current_dir(temp_dir.path())
        .args(["--chooser", "true"])
        .assert()
        .success();
}

#[test]
fn test_completions() {
    let (temp_dir, _) = common::create_freedit_project();

    rundown()
        .current_dir(temp_dir.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clean-server"));
}

#[test]
fn test_clustered_file_flag() {
    let (temp_dir, config_path) = common::create_test_config(
        r#"
tasks:
  mark:
    run: touch marked
"#,
    );
    let elsewhere = tempfile::TempDir::new().unwrap();

    rundown()
        .current_dir(elsewhere.path())
        .arg("-qf")
        .arg(&config_path)
        .arg("mark")
        .assert()
        .success();

    assert!(temp_dir.path().join("marked").exists());
}

#[test]
fn test_task_named_help_runs() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  help:
    run: echo "see docs/" > help.txt
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .args(["-q", "help"])
        .assert()
        .success();

    assert!(temp_dir.path().join("help.txt").exists());
}

#[test]
fn test_dry_run_echoes_print_text() {
    let (temp_dir, _) = common::create_test_config(
        r#"
tasks:
  package:
    run:
      - command:
          exec: tar czf dist.tgz target/release
          print: packaging release
"#,
    );

    rundown()
        .current_dir(temp_dir.path())
        .args(["--dry-run", "package"])
        .assert()
        .success()
        .stderr(predicate::str::contains("packaging release"))
        .stderr(predicate::str::contains("tar czf").not());

    assert!(!temp_dir.path().join("dist.tgz").exists());
}

#[test]
fn test_dotenv_reaches_commands_and_env_overrides_it() {
    let (temp_dir, _) = common::create_test_config(
        r#"
dotenv: true
env:
  FREEDIT_ADDR: 0.0.0.0:8080
tasks:
  show:
    run: echo "$FREEDIT_DB $FREEDIT_ADDR" > env.txt
"#,
    );
    fs::write(
        temp_dir.path().join(".env"),
        "FREEDIT_DB=freedit.db\nFREEDIT_ADDR=127.0.0.1:3001\n",
    )
    .unwrap();

    rundown()
        .current_dir(temp_dir.path())
        .env_remove("FREEDIT_DB")
        .env_remove("FREEDIT_ADDR")
        .args(["-q", "show"])
        .assert()
        .success();

    let out = fs::read_to_string(temp_dir.path().join("env.txt")).unwrap();
    assert_eq!(out.trim(), "freedit.db 0.0.0.0:8080");
}
