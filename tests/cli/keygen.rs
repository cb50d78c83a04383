//! Tests for `loadcred keygen`.

use crate::support::*;

#[test]
fn test_keygen_writes_key_array() {
    let t = Test::new();

    let output = t.keygen();
    assert_success(&output);
    assert_stdout_contains(&output, "key written");

    let path = t.path("resources/data/keyArray.json");
    let contents = std::fs::read_to_string(&path).unwrap();
    let bytes: Vec<u16> = serde_json::from_str(&contents).unwrap();
    assert_eq!(bytes.len(), 32);
    assert!(bytes.iter().all(|b| *b <= 255));
}

#[test]
fn test_keygen_warning_goes_to_stderr() {
    let t = Test::new();

    let output = t.keygen();
    assert_success(&output);
    assert_stdout_excludes(&output, "anyone with this file");
    assert_stderr_contains(&output, "anyone with this file can decrypt");
}

#[cfg(unix)]
#[test]
fn test_keygen_owner_only_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::with_key();
    let mode = std::fs::metadata(t.path("resources/data/keyArray.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_keygen_refuses_overwrite() {
    let t = Test::with_key();
    let before = std::fs::read_to_string(t.path("resources/data/keyArray.json")).unwrap();

    let output = t.keygen();
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    let after = std::fs::read_to_string(t.path("resources/data/keyArray.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_keygen_force_replaces_key() {
    let t = Test::with_key();
    let before = std::fs::read_to_string(t.path("resources/data/keyArray.json")).unwrap();

    let output = t.cmd().args(["keygen", "--force"]).output().unwrap();
    assert_success(&output);

    let after = std::fs::read_to_string(t.path("resources/data/keyArray.json")).unwrap();
    assert_ne!(before, after);
}

#[test]
fn test_keygen_custom_path() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["keygen", "--out", "secrets/k.json"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.path("secrets/k.json").exists());
    assert!(!t.path("resources/data/keyArray.json").exists());
}

#[test]
fn test_keygen_honours_config_path() {
    let t = Test::new();
    t.write_config("[keys]\nfile = \"conf/key.json\"\n");

    let output = t.keygen();
    assert_success(&output);
    assert!(t.path("conf/key.json").exists());
}
