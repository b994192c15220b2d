use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn trellis_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("trellis").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn trellis_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    trellis_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Render a retained-mode scene graph demo to PNG",
        ));
}

#[test]
fn out_path_is_required() {
    let temp = TempDir::new().unwrap();
    trellis_cmd(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn renders_demo_to_png() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("demo.png");

    trellis_cmd(&temp)
        .args(["--width", "160", "--height", "120", "--frames", "5", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn explicit_config_is_used() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("scene.toml");
    std::fs::write(
        &config,
        "[canvas]\nwidth = 64\nheight = 48\nbackground = \"black\"\n\n[animation]\ndefault_easing = \"quad-out\"\n",
    )
    .unwrap();
    let out = temp.path().join("small.png");

    trellis_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn malformed_config_reports_path() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("broken.toml");
    std::fs::write(&config, "[canvas\nwidth = ").unwrap();

    trellis_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .args(["--out", "unused.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn schema_dump_lists_sections() {
    Command::cargo_bin("dump_config_schema")
        .expect("binary exists")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"canvas\""))
        .stdout(predicate::str::contains("\"animation\""));
}
