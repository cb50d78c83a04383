//! Tests for `loadcred credential`.

use crate::support::*;

#[test]
fn test_credential_without_env_fails_with_hint() {
    let t = Test::new();

    let output = t.credential_reveal(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "ENCRYPTED_DATA");
    assert_stderr_contains(&output, "SECRET_DATA");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_credential_plain_secret() {
    let t = Test::new();

    let output = t.credential_reveal(&[("SECRET_DATA", "plain-pass")]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "plain-pass");
}

#[test]
fn test_credential_plain_needs_no_key() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("credential")
        .env("SECRET_DATA", "plain-pass")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "SECRET_DATA");
    assert_stdout_excludes(&output, "plain-pass");
}

#[test]
fn test_credential_encrypted_wins() {
    let t = Test::with_key();
    let envelope = t.envelope("sealed-pass");

    let output = t.credential_reveal(&[
        ("ENCRYPTED_DATA", envelope.as_str()),
        ("SECRET_DATA", "plain-pass"),
    ]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "sealed-pass");
}

#[test]
fn test_credential_empty_encrypted_falls_through() {
    let t = Test::new();

    let output = t.credential_reveal(&[("ENCRYPTED_DATA", ""), ("SECRET_DATA", "plain-pass")]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end(), "plain-pass");
}

#[test]
fn test_credential_bad_envelope_never_falls_back() {
    let t = Test::with_key();

    let output = t.credential_reveal(&[
        ("ENCRYPTED_DATA", "definitely-not-an-envelope"),
        ("SECRET_DATA", "plain-pass"),
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "ENCRYPTED_DATA");
    assert_stdout_excludes(&output, "plain-pass");
    assert_stdout_excludes(&output, "definitely-not-an-envelope");
}
