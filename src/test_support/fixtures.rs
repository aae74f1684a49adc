//! Test fixtures for common matching scenarios.
//!
//! Tag lists and package indexes mirror what a registry and an APK
//! repository actually return, trimmed to a size that is easy to reason
//! about in assertions.

use std::path::{Path, PathBuf};

use crate::core::alias::AliasTable;
use crate::core::image::ImageCatalog;
use crate::core::index::CandidateIndex;

/// Tags of a Python image, one per line.
pub const PYTHON_TAGS: &str = "\
# python
latest
latest-dev
3.13
3.13-dev
3.12
3.12-dev
3.12.7
3.12.7-dev
3.11
3.11-dev
3.10
3.10-dev
";

/// Tags of a Maven image with several JDK builds.
pub const MAVEN_TAGS: &str = "\
latest
latest-dev
3.9-jdk17
3.9-jdk17-dev
3.9-jdk21
3.9-jdk21-dev
3.8-jdk11
3.8-jdk11-dev
3.8-jdk17
3.8-jdk17-dev
";

/// A small `APKINDEX` file.
pub const APKINDEX: &str = "\
C:Q1a7OhCNAIkLg2WmIbFD5ZKRz0Yqs=
P:bash
V:5.2.37-r0
T:The GNU Bourne Again shell

C:Q1vh5bPLCmH6b/mtV7wQ7Q8s3Lq2E=
P:build-base
V:1-r8
T:Meta package for build base

C:Q1Xs4Dp3qAnhu3KAr6jKP8hL7RN0A=
P:ca-certificates
V:20241121-r1

C:Q1kQ2UQGmsm3mbS1uQvHQm1WqgdFo=
P:curl
V:8.11.1-r0

C:Q1Zy1pvoJx4N6CH+VqmdCeHtmS8dw=
P:curl-dev
V:8.11.1-r0

C:Q1VtP6cN2Vn5JcfN9UhPKnwzCbqd0=
P:git
V:2.47.1-r0

C:Q1R6yJfzq9l1S1pVJ0hUdaYpS0C4Q=
P:libjpeg-turbo-dev
V:3.0.4-r0

C:Q1S1p4HvO3m0iVd7FW4u6l5CPp0iA=
P:openssh-client
V:9.9_p1-r2

C:Q1gB6nZb0kR8WJzg4h2O0dLk1W7aQ=
P:openssh-server
V:9.9_p1-r2

C:Q1Ce9l1rPqzmX5hLqK5Y6Z6NQ2y1w=
P:openssl-dev
V:3.3.2-r4

C:Q1B1B6pX0mQW6Qh8FqG0mYfWzQ2qE=
P:py3-pip
V:24.3.1-r0

C:Q1Fq0Rk9Qx7kqz6v8dJf4x0YzU0mA=
P:wget
V:1.25.0-r0

C:Q1mP9Wn9vX7l5m0Q7J1KZr6v0P2nY=
P:zlib-dev
V:1.3.1-r2
";

pub fn python_tags() -> CandidateIndex {
    CandidateIndex::from_lines(PYTHON_TAGS)
}

pub fn maven_tags() -> CandidateIndex {
    CandidateIndex::from_lines(MAVEN_TAGS)
}

pub fn apk_index() -> CandidateIndex {
    CandidateIndex::from_apkindex(APKINDEX)
}

/// The bundled alias dataset.
pub fn alias_table() -> AliasTable {
    AliasTable::bundled().expect("bundled alias dataset should parse")
}

/// The bundled image catalog.
pub fn image_catalog() -> ImageCatalog {
    ImageCatalog::bundled().expect("bundled image catalog should parse")
}

/// Files a porter invocation reads, written into a scratch directory.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    files: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    pub fn new() -> Self {
        ProjectFixture::default()
    }

    /// Project with the Python tag list and the sample `APKINDEX`.
    pub fn standard() -> Self {
        ProjectFixture::new()
            .with_file("tags.txt", PYTHON_TAGS)
            .with_file("APKINDEX", APKINDEX)
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Project config at `.porter/config.toml`.
    pub fn with_config(self, content: impl Into<String>) -> Self {
        self.with_file(".porter/config.toml", content)
    }

    /// Write every file below `base_path`.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<()> {
        for (rel_path, content) in &self.files {
            let full_path = base_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }
        Ok(())
    }
}
