#![allow(clippy::disallowed_methods)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const HEADER: &str = "// Native Javascript for Bootstrap 4 v2.0.27 | © dnp_theme | MIT-License";

const BSN_VARS: &[&str] = &[
    "BSN_LIB_DIR",
    "BSN_MANIFEST",
    "BSN_VERSION",
    "BSN_LICENSE",
    "BSN_PRODUCT",
    "BSN_COPYRIGHT",
    "BSN_MINIFY",
    "BSN_MINIFIER",
    "BSN_ONLY",
    "BSN_IGNORE",
];

/// Helper function to get the path to a fixture file
fn get_fixture_path(relative_path: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative_path)
        .to_string_lossy()
        .to_string()
}

/// Run bsn-bundler from an empty working directory, isolated from user and
/// system config, and return (stdout, stderr, exit_code)
fn run_bundler_in(cwd: &Path, args: &[&str]) -> (String, String, i32) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_bsn-bundler"));
    command
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", cwd)
        .env("XDG_CONFIG_DIRS", cwd);
    for var in BSN_VARS {
        command.env_remove(var);
    }
    let output = command.output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn run_bundler(args: &[&str]) -> (String, String, i32) {
    let cwd = TempDir::new().expect("Failed to create temp dir");
    run_bundler_in(cwd.path(), args)
}

fn with_fixtures<'a>(lib_dir: &'a str, manifest: &'a str, args: &[&'a str]) -> Vec<&'a str> {
    let mut all = vec!["--lib-dir", lib_dir, "--manifest", manifest];
    all.extend_from_slice(args);
    all
}

#[test]
fn test_help_lists_selection_flags() {
    let (stdout, _, exit_code) = run_bundler(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("--only"));
    assert!(stdout.contains("--ignore"));
    assert!(stdout.contains("--minify"));
}

#[test]
fn test_only_conflicts_with_ignore() {
    let (stdout, stderr, exit_code) = run_bundler(&["--only", "Alert", "--ignore", "Modal"]);

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("cannot be used with"), "stderr: {stderr}");
}

#[test]
fn test_full_bundle_on_stdout() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(&lib_dir, &manifest, &[]));

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert_eq!(stdout.lines().next(), Some(HEADER));
    assert!(stdout.contains("Alert: Alert,\n    Button: Button,\n    Modal: Modal\n"));
    assert!(stdout.ends_with("}));\n"));

    // Build announcement goes to stderr only
    assert!(stderr.contains("Building Native Javascript for Bootstrap 4 v2.0.27"));
    assert!(stderr.contains("Unminified Build"));
    assert!(!stdout.contains("INFO"));
    assert!(!stdout.contains("Unminified Build"));
}

#[test]
fn test_unknown_only_name_is_skipped() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(
        &lib_dir,
        &manifest,
        &["--only", "Button,Bogus"],
    ));

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert_eq!(stdout.lines().next(), Some(HEADER));
    assert!(stdout.contains("return {\n      Button: Button\n    };"));
    assert!(!stdout.contains("Alert"));
    assert!(stderr.contains("Bogus is not a valid module name, continuing"));
}

#[test]
fn test_no_valid_names_fails_without_output() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(
        &lib_dir,
        &manifest,
        &["--only", "Bogus,Other"],
    ));

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("No valid module names, aborting"));
}

#[test]
fn test_missing_support_file_fails_without_output() {
    let lib_dir = get_fixture_path("broken/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(&lib_dir, &manifest, &[]));

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("utils-init.js"), "stderr: {stderr}");
}

#[test]
fn test_output_file_leaves_stdout_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("bootstrap-native-v4.js");
    let output = output_path.to_string_lossy().to_string();

    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler_in(
        temp_dir.path(),
        &with_fixtures(&lib_dir, &manifest, &["--ignore", "modal", "-o", &output]),
    );

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert!(stdout.is_empty());

    let written = fs::read_to_string(&output_path).expect("bundle file");
    assert_eq!(written.lines().next(), Some(HEADER));
    assert!(written.contains("Alert: Alert,\n    Button: Button\n"));
    assert!(!written.contains("var Modal"));
}

#[test]
fn test_quiet_suppresses_announcement() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(&lib_dir, &manifest, &["-q"]));

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.lines().next(), Some(HEADER));
    assert!(!stderr.contains("Building"));
}

#[test]
fn test_verbose_keeps_stdout_clean() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) =
        run_bundler(&with_fixtures(&lib_dir, &manifest, &["-vv"]));

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert!(stderr.contains("Module universe has 3 modules"));
    assert!(!stdout.contains("DEBUG"));
    assert_eq!(stdout.lines().next(), Some(HEADER));
}

#[test]
fn test_project_config_file_is_picked_up() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("bsn-bundler.toml"),
        format!(
            "lib-dir = {:?}\nmanifest = {:?}\nonly = [\"Modal\"]\n",
            get_fixture_path("lib/V4"),
            get_fixture_path("package.json")
        ),
    )
    .expect("write config");

    let (stdout, stderr, exit_code) = run_bundler_in(temp_dir.path(), &[]);

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert!(stdout.contains("return {\n      Modal: Modal\n    };"));
    assert!(!stdout.contains("var Alert"));
}

#[test]
#[cfg(unix)]
fn test_minify_keeps_header_on_first_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("minify.toml");
    fs::write(&config_path, "minifier = [\"tr\", \"-d\", \"\\n\"]\n").expect("write config");
    let config = config_path.to_string_lossy().to_string();

    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler_in(
        temp_dir.path(),
        &with_fixtures(&lib_dir, &manifest, &["--minify", "-c", &config]),
    );

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert_eq!(stdout.lines().next(), Some(HEADER));
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.ends_with("}));\n"));
    assert!(stderr.contains("Minified Build"));
}

#[test]
fn test_missing_minifier_fails_without_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("minify.toml");
    fs::write(
        &config_path,
        "minifier = [\"bsn-bundler-no-such-minifier\"]\n",
    )
    .expect("write config");
    let config = config_path.to_string_lossy().to_string();

    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler_in(
        temp_dir.path(),
        &with_fixtures(&lib_dir, &manifest, &["--minify", "-c", &config]),
    );

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to minify bundle"), "stderr: {stderr}");
}

#[test]
fn test_spaces_after_commas_are_trimmed() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(
        &lib_dir,
        &manifest,
        &["--only", "Alert, Modal,"],
    ));

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert!(stdout.contains("Alert: Alert,\n    Modal: Modal\n"));
    assert!(!stderr.contains("is not a valid module name"));
    assert!(stderr.contains("Included modules (2)"));
}

#[test]
fn test_ignore_entries_are_trimmed() {
    let lib_dir = get_fixture_path("lib/V4");
    let manifest = get_fixture_path("package.json");
    let (stdout, stderr, exit_code) = run_bundler(&with_fixtures(
        &lib_dir,
        &manifest,
        &["--ignore", "alert, modal"],
    ));

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert!(stdout.contains("return {\n      Button: Button\n    };"));
}

#[test]
fn test_cli_only_replaces_project_ignore() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("bsn-bundler.toml"),
        format!(
            "lib-dir = {:?}\nmanifest = {:?}\nignore = [\"Modal\"]\n",
            get_fixture_path("lib/V4"),
            get_fixture_path("package.json")
        ),
    )
    .expect("write config");

    let (stdout, stderr, exit_code) = run_bundler_in(temp_dir.path(), &["--only", "Modal"]);

    assert_eq!(exit_code, 0, "Command failed with stderr: {}", stderr);
    assert!(!stderr.contains("cannot specify both"));
    assert!(stdout.contains("return {\n      Modal: Modal\n    };"));
}

#[test]
fn test_both_lists_in_one_config_file_conflict() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("bsn-bundler.toml"),
        format!(
            "lib-dir = {:?}\nmanifest = {:?}\nonly = [\"Alert\"]\nignore = [\"Modal\"]\n",
            get_fixture_path("lib/V4"),
            get_fixture_path("package.json")
        ),
    )
    .expect("write config");

    let (stdout, stderr, exit_code) = run_bundler_in(temp_dir.path(), &[]);

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("You cannot specify both --only and --ignore"));
}
