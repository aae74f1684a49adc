//! CLI integration tests for porter.
//!
//! Each test writes a tag list or package index into a scratch project and
//! runs the real binary against it with an isolated home directory.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const TAGS: &str = "\
latest
latest-dev
3.12
3.12-dev
3.11
3.11-dev
";

const MAVEN_TAGS: &str = r#"{"name": "maven", "tags": ["3.8-jdk11-dev", "3.8-jdk17-dev", "3.9-jdk21-dev"]}"#;

const APKINDEX: &str = "\
C:Q1kQ2UQGmsm3mbS1uQvHQm1WqgdFo=
P:curl
V:8.11.1-r0

C:Q1S1p4HvO3m0iVd7FW4u6l5CPp0iA=
P:openssh-client
V:9.9_p1-r2

C:Q1gB6nZb0kR8WJzg4h2O0dLk1W7aQ=
P:openssh-server
V:9.9_p1-r2

C:Q1Ce9l1rPqzmX5hLqK5Y6Z6NQ2y1w=
P:openssl-dev
V:3.3.2-r4

C:Q1Fq0Rk9Qx7kqz6v8dJf4x0YzU0mA=
P:wget
V:1.25.0-r0
";

/// A scratch project plus an empty home so no user config leaks in.
struct Project {
    dir: TempDir,
    home: TempDir,
}

impl Project {
    fn new() -> Self {
        let project = Project {
            dir: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        };
        project.write("tags.txt", TAGS);
        project.write("maven.json", MAVEN_TAGS);
        project.write("APKINDEX", APKINDEX);
        project
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the porter binary command, run inside the project.
    fn porter(&self) -> Command {
        let mut cmd = Command::cargo_bin("porter").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.home.path())
            .env_remove("RUST_LOG");
        cmd
    }
}

// ============================================================================
// porter tag
// ============================================================================

#[test]
fn test_tag_exact_match() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "3.12", "--tags", "tags.txt"])
        .assert()
        .success()
        .stdout(predicate::eq("3.12\n"));
}

#[test]
fn test_tag_renders_image_reference() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "python:3.11", "--tags", "tags.txt", "--dev"])
        .assert()
        .success()
        .stdout(predicate::eq("cgr.dev/chainguard/python:3.11-dev\n"));
}

#[test]
fn test_tag_org_from_project_config() {
    let project = Project::new();
    project.write(".porter/config.toml", "[registry]\norg = \"acme.example\"\n");

    project
        .porter()
        .args(["tag", "python:3.12", "--tags", "tags.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cgr.dev/acme.example/python:3.12"));
}

#[test]
fn test_tag_jdk_version_is_respected() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "maven:3.8-eclipse-temurin-17", "--tags", "maven.json", "--dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maven:3.8-jdk17-dev"));
}

#[test]
fn test_tag_no_match_still_succeeds() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "9.1", "--tags", "tags.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no version component overlap"));
}

#[test]
fn test_tag_rank_lists_candidates() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "3.12", "--tags", "tags.txt", "--rank", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.00  3.12"));
}

#[test]
fn test_tag_json_output() {
    let project = Project::new();

    let output = project
        .porter()
        .args(["--message-format", "json", "tag", "3.12", "--tags", "tags.txt", "--variant", "dev"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(value["reason"], "tag-match");
    assert_eq!(value["matched_value"], "3.12-dev");
    assert_eq!(value["kind"], "fuzzy");
}

#[test]
fn test_tag_blank_is_invalid_input() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", " ", "--tags", "tags.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("non-empty tag"));
}

#[test]
fn test_tag_missing_file() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "3.12", "--tags", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_tag_rejects_unknown_variant() {
    let project = Project::new();

    project
        .porter()
        .args(["tag", "3.12", "--tags", "tags.txt", "--variant", "fat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown variant"));
}

// ============================================================================
// porter packages
// ============================================================================

#[test]
fn test_packages_install_line() {
    let project = Project::new();

    project
        .porter()
        .args(["packages", "--index", "APKINDEX", "--from", "apt", "ssh", "apt-utils", "curl"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "apk add --no-cache openssh-client openssh-server curl\n",
        ))
        .stderr(predicate::str::contains("can be dropped"));
}

#[test]
fn test_packages_from_install_command() {
    let project = Project::new();

    project
        .porter()
        .args([
            "packages",
            "--index",
            "APKINDEX",
            "apt-get install -y --no-install-recommends wget",
        ])
        .assert()
        .success()
        .stdout(predicate::eq("apk add --no-cache wget\n"));
}

#[test]
fn test_packages_from_run_line() {
    let project = Project::new();

    project
        .porter()
        .args([
            "packages",
            "--index",
            "APKINDEX",
            "apt-get update && apt-get install -y curl wget && rm -rf /var/lib/apt/lists/*",
        ])
        .assert()
        .success()
        .stdout(predicate::eq("apk add --no-cache curl wget\n"));
}

#[test]
fn test_packages_json_preserves_order() {
    let project = Project::new();

    let output = project
        .porter()
        .args([
            "--message-format",
            "json",
            "packages",
            "--index",
            "APKINDEX",
            "--from",
            "yum",
            "wget",
            "openssl-devel",
            "zzzzzzzzzz",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8(output.stdout).unwrap().trim()).unwrap();
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["query"], "wget");
    assert_eq!(results[1]["matched_value"], "openssl-dev");
    assert_eq!(results[2]["kind"], "none");
    assert_eq!(value["summary"], "wget openssl-dev");
}

#[test]
fn test_packages_custom_aliases() {
    let project = Project::new();
    project.write("aliases.toml", "[packages.debian]\nfetcher = [\"wget\", \"curl\"]\n");

    project
        .porter()
        .args(["packages", "--index", "APKINDEX", "--aliases", "aliases.toml", "fetcher"])
        .assert()
        .success()
        .stdout(predicate::eq("apk add --no-cache wget curl\n"));
}

#[test]
fn test_packages_requires_names() {
    let project = Project::new();

    project
        .porter()
        .args(["packages", "--index", "APKINDEX"])
        .assert()
        .failure();
}

// ============================================================================
// porter image
// ============================================================================

#[test]
fn test_image_maps_registry_reference() {
    let project = Project::new();

    project
        .porter()
        .args(["image", "docker.io/library/golang:1.22"])
        .assert()
        .success()
        .stdout(predicate::eq("cgr.dev/chainguard/go\n"));
}

#[test]
fn test_image_generic_base_warns() {
    let project = Project::new();

    project
        .porter()
        .args(["image", "ubuntu:22.04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chainguard-base"))
        .stderr(predicate::str::contains("generic base image"));
}

#[test]
fn test_image_json_output() {
    let project = Project::new();

    let output = project
        .porter()
        .args(["--message-format", "json", "image", "acme/nginx:1.27"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8(output.stdout).unwrap().trim()).unwrap();
    assert_eq!(value["reason"], "image-map");
    assert_eq!(value["name"], "acme/nginx");
    assert_eq!(value["kind"], "alias");
    assert_eq!(value["score"], 0.95);
    assert_eq!(value["references"][0], "cgr.dev/chainguard/nginx");
}

#[test]
fn test_image_custom_catalog() {
    let project = Project::new();
    project.write("images.toml", "[images]\n\"acme/api\" = [\"static\"]\n");

    project
        .porter()
        .args(["image", "ghcr.io/acme/api:v2", "--catalog", "images.toml", "--org", "acme.example"])
        .assert()
        .success()
        .stdout(predicate::eq("cgr.dev/acme.example/static\n"));
}

#[test]
fn test_image_unknown_still_succeeds() {
    let project = Project::new();

    project
        .porter()
        .args(["image", "qqqqqqqq"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no curated image close to 'qqqqqqqq'"));
}

// ============================================================================
// porter search
// ============================================================================

#[test]
fn test_search_substring() {
    let project = Project::new();

    project
        .porter()
        .args(["search", "ssh", "--index", "APKINDEX"])
        .assert()
        .success()
        .stdout(predicate::eq("openssh-client\nopenssh-server\n"));
}

#[test]
fn test_search_suggests_close_names() {
    let project = Project::new();

    project
        .porter()
        .args(["search", "wgett", "--index", "APKINDEX"])
        .assert()
        .success()
        .stderr(predicate::str::contains("did you mean: wget"));
}

// ============================================================================
// porter completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let project = Project::new();

    project
        .porter()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("porter"));
}

#[test]
fn test_help_lists_commands() {
    let project = Project::new();

    project
        .porter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tag"))
        .stdout(predicate::str::contains("packages"))
        .stdout(predicate::str::contains("image"))
        .stdout(predicate::str::contains("search"));
}
