//! Integration tests for CLI behavior
//!
//! These tests run the binary against plugin directories that never
//! need a checksum download.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Helper to create a command for the kensa CLI, run from `dir`.
fn kensa_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kensa"));
    cmd.current_dir(dir.path());
    cmd
}

fn plugin_source(name: &str, version: Option<&str>) -> String {
    let mut source = format!("<?php\n/**\n * Plugin Name: {}\n", name);
    if let Some(version) = version {
        source.push_str(&format!(" * Version: {}\n", version));
    }
    source.push_str(" */\n");
    source
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        let dir = TempDir::new().unwrap();
        kensa_cmd(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        let dir = TempDir::new().unwrap();
        kensa_cmd(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn plugins_help_lists_flags() {
        let dir = TempDir::new().unwrap();
        kensa_cmd(&dir)
            .args(["plugins", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--all"))
            .stdout(predicate::str::contains("--strict"))
            .stdout(predicate::str::contains("--version <VERSION>"))
            .stdout(predicate::str::contains("--insecure"));
    }
}

mod plugins_command {
    use super::*;

    #[test]
    fn requires_slugs_or_all() {
        let dir = TempDir::new().unwrap();
        dir.child("plugins").create_dir_all().unwrap();

        kensa_cmd(&dir)
            .args(["--plugins-dir", "plugins", "plugins"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(
                "You need to specify either one or more plugin slugs",
            ));
    }

    #[test]
    fn unknown_slugs_only_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        dir.child("plugins/hello.php")
            .write_str(&plugin_source("Hello Dolly", Some("1.7.2")))
            .unwrap();

        kensa_cmd(&dir)
            .args(["--plugins-dir", "plugins", "plugins", "ghost"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains(
                "The 'ghost' plugin could not be found.",
            ))
            .stderr(predicate::str::contains(
                "You need to specify either one or more plugin slugs",
            ));
    }

    #[test]
    fn missing_plugins_directory_is_fatal() {
        let dir = TempDir::new().unwrap();

        kensa_cmd(&dir)
            .args(["--plugins-dir", "nowhere", "plugins", "--all"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn all_with_no_plugins_prints_empty_list() {
        let dir = TempDir::new().unwrap();
        dir.child("plugins").create_dir_all().unwrap();

        kensa_cmd(&dir)
            .args(["--plugins-dir", "plugins", "plugins", "--all"])
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn plugin_without_version_fails_verification() {
        let dir = TempDir::new().unwrap();
        dir.child("plugins/draft/draft.php")
            .write_str(&plugin_source("Draft", None))
            .unwrap();

        kensa_cmd(&dir)
            .args(["--plugins-dir", "plugins", "plugins", "draft"])
            .assert()
            .code(1)
            .stdout(
                "[{\"name\":\"draft\",\"verified\":false,\"reason\":\"plugin_version_not_found\"}]\n",
            );
    }

    #[test]
    fn invalid_config_is_fatal() {
        let dir = TempDir::new().unwrap();
        dir.child("plugins").create_dir_all().unwrap();
        dir.child(".kensa.json")
            .write_str(r#"{"timeout": 0}"#)
            .unwrap();

        kensa_cmd(&dir)
            .args(["plugins", "--all"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Config validation failed"));
    }

    #[test]
    fn discovers_config_in_working_directory() {
        let dir = TempDir::new().unwrap();
        dir.child("site/plugins").create_dir_all().unwrap();
        dir.child(".kensa.json")
            .write_str(r#"{"plugins_dir": "site/plugins"}"#)
            .unwrap();

        kensa_cmd(&dir)
            .args(["plugins", "--all"])
            .assert()
            .success()
            .stdout("[]\n");
    }
}
