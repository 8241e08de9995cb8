//! Tests for profile persistence through the CLI (non-interactive paths only)
use std::fs;
use std::process::Command;
use std::sync::Mutex;

// Global lock to serialize tests that mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn run_sysdash(args: &[&str]) -> (bool, String) {
    let exe = env!("CARGO_BIN_EXE_sysdash");
    let output = Command::new(exe)
        .args(args)
        .env_remove("SYSDASH_BACKEND_URL")
        .output()
        .expect("run sysdash");
    let ok = output.status.success();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (ok, text)
}

fn isolate() -> tempfile::TempDir {
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());
    td
}

fn profiles_path() -> std::path::PathBuf {
    sysdash::profiles::profiles_path()
}

#[test]
fn test_profile_created_on_first_use() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = isolate();
    // Provide profile + url => should create profiles.json; --dry-run avoids any connection
    let (ok, _out) = run_sysdash(&["--profile", "unittest", "http://example:1", "--dry-run"]);
    assert!(ok);
    let data = fs::read_to_string(profiles_path()).expect("profiles.json created");
    assert!(
        data.contains("unittest"),
        "profiles.json missing profile entry: {data}"
    );
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = isolate();
    let (_ok, _out) = run_sysdash(&["--profile", "prod", "http://one:5000", "--dry-run"]); // create
    let first = fs::read_to_string(profiles_path()).unwrap();
    // Re-run identical (should not duplicate or corrupt)
    let (_ok2, _out2) = run_sysdash(&["--profile", "prod", "http://one:5000", "--dry-run"]);
    let second = fs::read_to_string(profiles_path()).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");
    // Changed URL without --save: the prompt reads EOF and declines
    let (_ok3, _out3) = run_sysdash(&["--profile", "prod", "http://two:5000", "--dry-run"]);
    let third = fs::read_to_string(profiles_path()).unwrap();
    assert_eq!(first, third, "Profile overwritten without confirmation");
    // Overwrite with different URL using --save (no prompt path)
    let (_ok4, _out4) =
        run_sysdash(&["--profile", "prod", "--save", "http://two:5000", "--dry-run"]);
    let fourth = fs::read_to_string(profiles_path()).unwrap();
    assert!(fourth.contains("two"), "Updated URL not written: {fourth}");
}

#[test]
fn test_saved_profile_is_loaded_by_name() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = isolate();
    let (_ok, _out) = run_sysdash(&["-P", "lab", "-i", "4", "https://lab.internal", "--dry-run"]);
    let data = fs::read_to_string(profiles_path()).unwrap();
    assert!(data.contains("\"interval\": 4"), "{data}");

    let (ok, out) = run_sysdash(&["-P", "lab", "--dry-run"]);
    assert!(ok);
    assert!(out.contains("stream: https://lab.internal/realmetrics?interval=4"), "{out}");
}

#[test]
fn test_unknown_profile_without_input_aborts() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = isolate();
    let (ok, out) = run_sysdash(&["--profile", "ghost", "--dry-run"]);
    assert!(ok);
    assert!(out.contains("does not exist yet"), "{out}");
    assert!(!profiles_path().exists());
}

#[test]
fn test_invalid_url_is_not_saved() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = isolate();
    let (ok, out) = run_sysdash(&["--profile", "bad", "ftp://h:1", "--dry-run"]);
    assert!(!ok);
    assert!(out.contains("unsupported scheme"), "{out}");
    assert!(
        !profiles_path().exists(),
        "invalid url was written to a profile"
    );
}

#[test]
fn test_invalid_url_entered_at_prompt_is_not_saved() {
    let _guard = ENV_LOCK.lock().unwrap();
    let _td = isolate();
    assert_cmd::Command::cargo_bin("sysdash")
        .unwrap()
        .args(["--profile", "typo", "--dry-run"])
        .env_remove("SYSDASH_BACKEND_URL")
        .write_stdin("ftp://h:1\n")
        .assert()
        .failure();
    assert!(!profiles_path().exists());

    // a valid answer is saved and used
    let output = assert_cmd::Command::cargo_bin("sysdash")
        .unwrap()
        .args(["--profile", "typo", "--dry-run"])
        .env_remove("SYSDASH_BACKEND_URL")
        .write_stdin("http://fixed:5000\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let data = fs::read_to_string(profiles_path()).unwrap();
    assert!(data.contains("http://fixed:5000"), "{data}");
}
