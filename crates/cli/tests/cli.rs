use assert_cmd::Command;
use predicates::prelude::*;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .env_remove("SHELF_ENV");
    cmd
}

#[test]
fn routes_lists_book_endpoints() {
    shelf()
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/books/{id}/read"))
        .stdout(predicate::str::contains("books.latest"))
        .stdout(predicate::str::contains("demo.weather"));
}

#[test]
fn config_prints_resolved_settings() {
    shelf()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"environment\": \"local\""))
        .stdout(predicate::str::contains("\"port\": 8080"));
}

#[test]
fn unknown_environment_fails() {
    shelf()
        .env("SHELF_ENV", "qa")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment"));
}
