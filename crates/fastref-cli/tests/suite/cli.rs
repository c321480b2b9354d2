use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn fastref() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fastref"));
    cmd.env_remove("FASTREF_CONFIG_PATH").env_remove("RUST_LOG");
    cmd
}

fn junit_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("src/JUnitTest.kt")
        .write_str(
            r#"package sample

import org.junit.Test

class JUnitTest {
    @Test fun works() {}
}
"#,
        )
        .unwrap();
    temp.child("src/NgTest.kt")
        .write_str(
            r#"package sample

import org.testng.Test

class NgTest {
    @Test fun works() {}
}
"#,
        )
        .unwrap();
    temp.child("src/Mixed.kt")
        .write_str(
            r#"package sample

import org.junit.*
import org.testng.*

class Mixed {
    @Test fun works() {}
    fun make() = Test()
}
"#,
        )
        .unwrap();
    temp.child("build/Generated.kt")
        .write_str("import org.junit.Test\n@Test fun generated() {}\n")
        .unwrap();
    temp
}

#[test]
fn help_mentions_commands() {
    fastref().arg("--help").assert().success().stdout(
        predicate::str::contains("scan").and(predicate::str::contains("header")),
    );
}

#[test]
fn scan_json_reports_verdicts_and_summary() {
    let temp = junit_project();

    let output = fastref()
        .arg("scan")
        .arg(temp.path())
        .args(["--target", "org.junit.Test", "--conflict", "org.testng.Test", "--json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["target"], "org.junit.Test");
    assert_eq!(v["summary"]["files_scanned"], 3);
    assert_eq!(v["summary"]["match"], 1);
    assert_eq!(v["summary"]["no_match"], 1);
    assert_eq!(v["summary"]["indeterminate"], 2);
    assert_eq!(v["stats"]["attempts"], 4);

    let findings = v["findings"].as_array().unwrap();
    assert!(
        findings.iter().any(|f| {
            f["file"].as_str().unwrap().ends_with("JUnitTest.kt")
                && f["line"] == 6
                && f["role"] == "annotation_entry"
                && f["verdict"] == "match"
        }),
        "{findings:#?}"
    );
    assert!(
        findings
            .iter()
            .all(|f| !f["file"].as_str().unwrap().contains("Generated")),
        "build/ should be skipped: {findings:#?}"
    );
}

#[test]
fn scan_uses_discovered_config() {
    let temp = junit_project();
    temp.child("fastref.toml")
        .write_str("target = \"org.junit.Test\"\nconflicts = [\"org.testng.Test\"]\n")
        .unwrap();

    fastref()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("annotation Test => match")
                .and(predicate::str::contains("annotation Test => no_match"))
                .and(predicate::str::contains("other Test => indeterminate"))
                .and(predicate::str::contains(
                    "summary: 3 files, 1 match, 1 no_match, 2 indeterminate",
                )),
        );
}

#[test]
fn scan_discovers_dotfile_config_and_env_override() {
    let temp = junit_project();
    temp.child(".fastref.toml")
        .write_str("target = \"org.junit.Test\"\n")
        .unwrap();

    fastref()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("summary: 3 files"));

    temp.child("conf/ng.toml")
        .write_str("target = \"org.testng.Test\"\n")
        .unwrap();
    let output = fastref()
        .arg("scan")
        .arg(temp.path())
        .arg("--json")
        .env("FASTREF_CONFIG_PATH", "conf/ng.toml")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["target"], "org.testng.Test");
}

#[test]
fn scan_with_explicit_config_file() {
    let temp = junit_project();
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.child("custom.toml");
    config.write_str("target = \"org.testng.Test\"\n").unwrap();

    let output = fastref()
        .arg("scan")
        .arg(temp.path())
        .arg("--config")
        .arg(config.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["target"], "org.testng.Test");
    // Without org.junit.Test registered as a conflict the mixed file resolves to testng.
    assert_eq!(v["summary"]["match"], 2);
}

#[test]
fn scan_without_target_fails_with_exit_code_2() {
    let temp = junit_project();
    fastref()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no target class"));
}

#[test]
fn scan_rejects_malformed_target() {
    let temp = junit_project();
    fastref()
        .arg("scan")
        .arg(temp.path())
        .args(["--target", "org..Test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --target"));
}

#[test]
fn scan_reports_invalid_config() {
    let temp = junit_project();
    temp.child("fastref.toml")
        .write_str("target = \"org.junit.Test\"\nunknown = 1\n")
        .unwrap();
    fastref()
        .arg("scan")
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse toml config"));
}

#[test]
fn scan_single_file() {
    let temp = junit_project();
    let file = temp.child("src/JUnitTest.kt");
    fastref()
        .arg("scan")
        .arg(file.path())
        .args(["--target", "org.junit.Test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JUnitTest.kt:6:6: annotation Test => match"));
}

#[test]
fn header_prints_imports() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("A.kt");
    file.write_str("package a.b\n\nimport org.junit.Test\nimport org.testng.*\nimport java.lang.String as Str\n")
        .unwrap();

    fastref()
        .arg("header")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("package: a.b")
                .and(predicate::str::contains("import org.junit.Test"))
                .and(predicate::str::contains("import org.testng.*"))
                .and(predicate::str::contains("import java.lang.String as Str")),
        );

    let output = fastref()
        .arg("header")
        .arg(file.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["package"], "a.b");
    assert_eq!(v["imports"][1]["star"], true);
    assert_eq!(v["imports"][2]["alias"], "Str");
}

#[test]
fn header_on_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    fastref()
        .arg("header")
        .arg(temp.path().join("missing.kt"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}
