use std::fs::write;

use assert_cmd::Command;
use predicates::str::contains;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("sme-health-cli").unwrap();
    cmd.env("SME_HEALTH_BASE_URL", "http://127.0.0.1:9")
        .env("SME_HEALTH_TIMEOUT_SECS", "2");
    cmd
}

#[test]
fn unreadable_file_surfaces_the_upload_status_and_fails() {
    // The read fails before any network traffic, so this runs offline.
    cli()
        .args(["upload", "/nonexistent/ledger.csv"])
        .assert()
        .failure()
        .stdout(contains("Upload failed"))
        .stderr(contains("upload did not complete"));
}

#[test]
fn non_advisory_extension_is_noted_but_not_rejected() {
    cli()
        .args(["upload", "/nonexistent/notes.txt"])
        .assert()
        .failure()
        .stdout(contains("expected a .csv or .xlsx document"));
}

#[test]
fn valid_config_file_is_accepted() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write(
        file.path(),
        "base_url = \"http://backend:9000\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    Command::cargo_bin("sme-health-cli")
        .unwrap()
        .args(["--config", file.path().to_str().unwrap(), "strings"])
        .assert()
        .success()
        .stdout(contains("SME Financial Health Platform"));
}

#[test]
fn malformed_config_file_is_reported() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write(file.path(), "base_url = not quoted toml").unwrap();

    Command::cargo_bin("sme-health-cli")
        .unwrap()
        .args(["--config", file.path().to_str().unwrap(), "strings"])
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
}
