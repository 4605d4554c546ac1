//! Integration tests for crateup

mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::io::Write;

    fn crateup() -> Command {
        Command::cargo_bin("crateup").unwrap()
    }

    /// Config file pointing every network root at an unroutable address.
    fn offline_config() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[download]\n\
             distribution_root = \"http://127.0.0.1:1\"\n\
             registry_root = \"http://127.0.0.1:1\"\n\
             timeout_secs = 1\n"
        )
        .unwrap();
        file
    }

    #[test]
    fn help_displays() {
        crateup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Fast installer for Rust crate binaries"));
    }

    #[test]
    fn version_displays() {
        crateup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("crateup"));
    }

    #[test]
    fn install_requires_a_crate() {
        crateup().arg("install").assert().failure();
    }

    #[test]
    fn install_rejects_empty_crate_name() {
        crateup()
            .args(["install", ""])
            .assert()
            .failure()
            .stderr(predicate::str::contains("must not be empty"));
    }

    #[test]
    fn key_is_invariant_under_feature_order() {
        let a = crateup()
            .args(["key", "cross", "--version", "0.2.1", "--features", "serde,tokio"])
            .assert()
            .success();
        let b = crateup()
            .args(["key", "cross", "--version", "0.2.1", "--features", "tokio,serde"])
            .assert()
            .success();

        let a = String::from_utf8(a.get_output().stdout.clone()).unwrap();
        let b = String::from_utf8(b.get_output().stdout.clone()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("cross-0.2.1"));
    }

    #[test]
    fn key_carries_boolean_markers() {
        crateup()
            .args([
                "key",
                "cross",
                "--version",
                "0.2.1",
                "--all-features",
                "--no-default-features",
            ])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("no-default-features")
                    .and(predicate::str::contains("all-features")),
            );
    }

    #[test]
    fn key_defaults_to_latest_sentinel() {
        crateup()
            .args(["key", "cross"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cross-latest"));
    }

    #[test]
    fn config_path_prints_config_toml() {
        crateup()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_prints_sections() {
        crateup()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("[download]").and(predicate::str::contains("[install]")),
            );
    }

    #[test]
    fn resolve_fails_cleanly_when_registry_is_unreachable() {
        let config = offline_config();
        crateup()
            .args(["resolve", "cross"])
            .args(["--config", config.path().to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unable to reach the crate registry"));
    }
}
