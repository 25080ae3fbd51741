use assert_cmd::Command;
use predicates::str::contains;

// Nothing listens on this port; any attempted call fails fast and loudly.
const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("sme-health-cli").unwrap();
    cmd.env("SME_HEALTH_BASE_URL", UNREACHABLE_BACKEND)
        .env("SME_HEALTH_TIMEOUT_SECS", "2");
    cmd
}

#[test]
fn declined_confirmation_never_calls_the_backend() {
    cli()
        .arg("reset")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(contains("Reset aborted"));
}

#[test]
fn empty_confirmation_counts_as_a_decline() {
    cli()
        .arg("reset")
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(contains("Reset aborted"));
}

#[test]
fn confirmed_reset_reaches_for_the_backend() {
    // The backend is unreachable, so a confirmed reset must fail, which
    // proves the call was actually attempted.
    cli()
        .args(["reset", "--yes"])
        .assert()
        .failure()
        .stderr(contains("backend reset failed"));
}
