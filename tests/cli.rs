//! End-to-end runs of the `ursula` binary against a fake `ansible-playbook`.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

fn lock_spawn() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// `<root>/ansible-playbook` reporting `version`, and `<root>/env/hosts`.
fn setup(version: &str) -> (TempDir, PathBuf) {
    let root = TempDir::new().unwrap();
    let program = root.path().join("ansible-playbook");
    fs::write(
        &program,
        format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then echo 'ansible-playbook {version}'; exit 0; fi\n\
             echo \"ran $*\"\n\
             exit 4\n"
        ),
    )
    .unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

    fs::create_dir(root.path().join("env")).unwrap();
    fs::write(root.path().join("env").join("hosts"), "localhost\n").unwrap();
    (root, program)
}

fn ursula(program: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ursula"))
        .args(args)
        .env("URSULA_ANSIBLE_PLAYBOOK", program)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn exit_code_of_playbook_is_propagated() {
    let _lock = lock_spawn();
    let (root, program) = setup("1.7.2-bbg");
    let env_dir = root.path().join("env");

    let output = ursula(&program, &[env_dir.to_str().unwrap(), "site.yml", "--check"]);
    assert_eq!(output.status.code(), Some(4));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("ran --inventory-file "));
    assert!(stdout.trim_end().ends_with("site.yml --check"));
}

#[test]
fn missing_environment_exits_with_minus_one() {
    let _lock = lock_spawn();
    let (root, program) = setup("1.7.2-bbg");
    let missing = root.path().join("nope");

    let output = ursula(&program, &[missing.to_str().unwrap(), "site.yml"]);
    assert_eq!(output.status.code(), Some(255));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR"));
    assert!(stderr.contains("does not exist"));
}

#[test]
fn version_mismatch_exits_with_minus_one() {
    let _lock = lock_spawn();
    let (root, program) = setup("2.0.0");
    let env_dir = root.path().join("env");

    let output = ursula(&program, &[env_dir.to_str().unwrap(), "site.yml"]);
    assert_eq!(output.status.code(), Some(255));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("You are not using ansible-playbook '2.0.0'"));
}

#[test]
fn debug_logs_the_command() {
    let _lock = lock_spawn();
    let (root, program) = setup("1.7.2-bbg");
    let env_dir = root.path().join("env");

    let output = ursula(&program, &[env_dir.to_str().unwrap(), "site.yml", "--ursula-debug"]);
    assert_eq!(output.status.code(), Some(4));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Running command: "));
}

#[test]
fn help_exits_cleanly() {
    let output = Command::new(env!("CARGO_BIN_EXE_ursula"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("--ursula-test"));
}
