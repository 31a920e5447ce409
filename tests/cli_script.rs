use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn natmath() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("natmath").expect("bin build");
    cmd.env_remove("NATMATH_AI_KEY").env_remove("OPENAI_API_KEY");
    cmd
}

#[test]
fn script_runs_each_line_and_skips_comments() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("calc.txt");
    fs::write(
        &path,
        "# warm-up\n1 + 2\n\n// powers\n2^3^2\nlog(100, 10)\n1/0\n",
    )
    .expect("write script");

    natmath()
        .arg("--local")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("1 + 2 = 3"))
        .stdout(contains("2^3^2 = 512"))
        .stdout(contains("log(100, 10) = 2"))
        .stdout(contains("warm-up").not())
        .stdout(contains("Script finished."))
        .stderr(contains("Error: 1/0: Result is not a finite number"));
}

#[test]
fn script_honors_degree_flag() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("trig.txt");
    fs::write(&path, "cos(60)\nsin(pi / 2 rad)\n").expect("write script");

    natmath()
        .args(["--deg", "--local"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("cos(60) = 0.5"))
        .stdout(contains("sin(pi / 2 rad) = 1"));
}

#[test]
fn missing_script_fails() {
    let dir = tempdir().expect("tempdir");
    natmath()
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure();
}
