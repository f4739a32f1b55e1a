use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("device-flasher").unwrap();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("flash"))
        .stdout(predicate::str::contains("--platform-tools"));
}

#[test]
fn test_flash_help_mentions_image_and_parallel() {
    let mut cmd = Command::cargo_bin("device-flasher").unwrap();

    cmd.args(["flash", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--image"))
        .stdout(predicate::str::contains("--parallel"));
}

#[test]
fn test_missing_subcommand_is_an_error() {
    let mut cmd = Command::cargo_bin("device-flasher").unwrap();

    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}
