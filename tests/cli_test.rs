//! Integration tests for the tvbuild binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLEAN_STATS: &str = r#"{"errors":[],"warnings":[]}"#;

fn setup_app(env: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let public = temp.path().join("public");
    fs::create_dir_all(&public).unwrap();
    fs::write(public.join("index.html"), "<div id=root></div>").unwrap();
    fs::write(public.join("favicon.ico"), "ico").unwrap();
    fs::write(temp.path().join(".env.production"), env).unwrap();
    temp
}

fn write_stats(dir: &Path, stats: &str) {
    fs::write(dir.join("stats.json"), stats).unwrap();
}

fn tvbuild(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("tvbuild"));
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("CI")
        .env_remove("NODE_ENV")
        .env_remove("PUBLIC_URL");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("tvbuild"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Production builds"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("env"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("tvbuild"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("tvbuild"));
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("tvbuild"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tvbuild"));
    Ok(())
}

#[test]
fn env_json_prints_stringified_constants() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    fs::write(
        temp.path().join(".env"),
        "REACT_APP_TITLE=\"Hello \\\"world\\\"\"\nDB_PASSWORD=secret\nPORT=4000\n",
    )?;

    let output = tvbuild(temp.path())
        .args(["env", "--json", "--public-url", "https://cdn.example.com/app"])
        .output()?;

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let env = &value["process.env"];
    assert_eq!(env["REACT_APP_TITLE"], r#""Hello \"world\"""#);
    assert_eq!(env["PORT"], "\"4000\"");
    assert_eq!(env["NODE_ENV"], "\"development\"");
    assert_eq!(env["PUBLIC_URL"], "\"/\"");
    assert!(env.get("DB_PASSWORD").is_none());
    Ok(())
}

#[test]
fn env_table_names_sources() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("REACT_APP_MODE=prod\n");

    tvbuild(temp.path())
        .args(["env", "--production"])
        .assert()
        .success()
        .stdout(predicate::str::contains("REACT_APP_MODE"))
        .stdout(predicate::str::contains("(app)"))
        .stdout(predicate::str::contains(".env.production (loaded)"));
    Ok(())
}

#[test]
fn env_rejects_malformed_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    fs::write(temp.path().join(".env"), "REACT_APP_OK=1\nthis line is broken\n")?;

    tvbuild(temp.path())
        .arg("env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"))
        .stderr(predicate::str::contains(".env"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_succeeds_and_reports_sizes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("REACT_APP_GREETING=hello\n");
    write_stats(temp.path(), CLEAN_STATS);
    let command = "test \"$REACT_APP_GREETING\" = hello && test \"$NODE_ENV\" = production \
                   && mkdir -p build/static/js \
                   && echo 'console.log(1)' > build/static/js/main.abc123.js \
                   && cat stats.json";

    tvbuild(temp.path())
        .args(["build", "--command", command])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled successfully."))
        .stdout(predicate::str::contains("File sizes after gzip:"))
        .stdout(predicate::str::contains("build/static/js/main.abc123.js"))
        .stdout(predicate::str::contains("The build folder is ready to be deployed."));

    let build = temp.path().join("build");
    assert!(build.join("favicon.ico").is_file());
    assert!(!build.join("index.html").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_clears_previous_output() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(temp.path(), CLEAN_STATS);
    fs::create_dir_all(temp.path().join("build"))?;
    fs::write(temp.path().join("build/stale.js"), "old")?;

    tvbuild(temp.path())
        .args(["build", "--command", "cat stats.json"])
        .assert()
        .success();

    assert!(!temp.path().join("build/stale.js").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_with_warnings_succeeds_outside_ci() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(
        temp.path(),
        r#"{"errors":[],"warnings":["./src/App.js\nLine 3:7: 'x' is assigned a value but never used"]}"#,
    );

    tvbuild(temp.path())
        .args(["build", "--command", "cat stats.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled with warnings."))
        .stdout(predicate::str::contains("never used"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_with_warnings_fails_in_ci() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(temp.path(), r#"{"errors":[],"warnings":["first","second"]}"#);

    tvbuild(temp.path())
        .env("CI", "true")
        .args(["build", "--command", "cat stats.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to compile."))
        .stdout(predicate::str::contains("Treating warnings as errors because CI = true."));
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_ci_false_is_lenient() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(temp.path(), r#"{"warnings":["only a warning"]}"#);

    tvbuild(temp.path())
        .env("CI", "false")
        .args(["build", "--command", "cat stats.json"])
        .assert()
        .success();
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_surfaces_first_error_only() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(
        temp.path(),
        r#"{"errors":["first problem","second problem","third problem"],"warnings":[]}"#,
    );

    tvbuild(temp.path())
        .args(["build", "--command", "cat stats.json; exit 2"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("first problem"))
        .stdout(predicate::str::contains("second problem").not());
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_crash_without_output_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");

    tvbuild(temp.path())
        .args(["build", "--command", "exit 3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown build error"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_crash_reports_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");

    tvbuild(temp.path())
        .args(["build", "--command", "echo 'bundler exploded' >&2; exit 2"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bundler exploded"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_honours_project_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(temp.path(), CLEAN_STATS);
    fs::write(
        temp.path().join(".tvbuild.yml"),
        "build:\n  command: cat stats.json\n  output_dir: dist\n",
    )?;

    tvbuild(temp.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("The dist folder is ready to be deployed."));

    assert!(temp.path().join("dist/favicon.ico").is_file());
    Ok(())
}

#[test]
fn build_rejects_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    fs::write(
        temp.path().join(".tvbuild.yml"),
        "build:\n  output_dir: public\n",
    )?;

    tvbuild(temp.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn build_refuses_to_empty_the_app_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("REACT_APP_KEEP=1\n");
    fs::create_dir_all(temp.path().join("src"))?;
    fs::write(temp.path().join("src/index.js"), "render()")?;
    fs::write(temp.path().join(".tvbuild.yml"), "build:\n  output_dir: .\n")?;

    tvbuild(temp.path())
        .args(["build", "--command", "echo ran > ran.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("build.output_dir"));

    assert!(temp.path().join("src/index.js").is_file());
    assert!(temp.path().join(".env.production").is_file());
    assert!(!temp.path().join("ran.txt").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_prints_phase_result_in_ci_logs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("");
    write_stats(temp.path(), CLEAN_STATS);

    tvbuild(temp.path())
        .args(["build", "--command", "cat stats.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating an optimized production build..."))
        .stdout(predicate::str::contains("Build finished in"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn build_reads_public_url_from_env_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("PUBLIC_URL=https://cdn.example.com/tv\n");
    write_stats(temp.path(), CLEAN_STATS);

    tvbuild(temp.path())
        .args(["build", "--command", "cat stats.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The project was built assuming it is hosted at https://cdn.example.com/tv.",
        ));
    Ok(())
}

#[test]
fn build_with_malformed_env_touches_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("REACT_APP_OK=1\n'broken\n");
    fs::create_dir_all(temp.path().join("build"))?;
    fs::write(temp.path().join("build/keep.js"), "kept")?;

    tvbuild(temp.path())
        .args(["build", "--command", "echo should-not-run > ran.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(".env.production"));

    assert!(temp.path().join("build/keep.js").exists());
    assert!(!temp.path().join("ran.txt").exists());
    Ok(())
}

#[test]
fn project_flag_selects_app_dir() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_app("REACT_APP_FROM_FLAG=yes\n");
    let elsewhere = TempDir::new()?;

    tvbuild(elsewhere.path())
        .args(["env", "--production", "--json", "--project"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("REACT_APP_FROM_FLAG"));
    Ok(())
}
