//! Tests for `loadcred totp`.

use crate::support::*;

fn code_line(output: &std::process::Output) -> String {
    stdout(output).lines().next().unwrap_or_default().to_string()
}

#[test]
fn test_totp_from_argument() {
    let t = Test::new();

    let output = t.cmd().args(["totp", MFA_SECRET]).output().unwrap();
    assert_success(&output);
    let code = code_line(&output);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_stdout_contains(&output, "valid for");
}

#[test]
fn test_totp_from_env() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("totp")
        .env("MFA_SECRET", MFA_SECRET)
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(code_line(&output).len(), 6);
}

#[test]
fn test_totp_configured_variable() {
    let t = Test::new();
    t.write_config("[signin]\nmfa_secret_var = \"OTHER_SECRET\"\n");

    let output = t
        .cmd()
        .arg("totp")
        .env("OTHER_SECRET", MFA_SECRET)
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn test_totp_missing_secret_fails() {
    let t = Test::new();

    let output = t.cmd().arg("totp").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "MFA_SECRET");
}

#[test]
fn test_totp_invalid_secret_fails() {
    let t = Test::new();

    let output = t.cmd().args(["totp", "not!base32"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid base32");
}
