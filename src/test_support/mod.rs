//! Test utilities for porter unit tests.
//!
//! ```rust,ignore
//! use porter::test_support::{create_test_project, ProjectFixture};
//!
//! #[test]
//! fn test_example() {
//!     let tmp = create_test_project(&ProjectFixture::standard());
//!     let tags = tmp.path().join("tags.txt");
//!     // Feed `tags` to an ops function...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;

/// Write a fixture into a fresh temporary directory.
///
/// Returns the TempDir handle - dropping it will clean up the directory.
pub fn create_test_project(fixture: &ProjectFixture) -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    fixture
        .write_to(tmp.path())
        .expect("failed to write fixture files");
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_indexes() {
        assert!(python_tags().contains("3.12-dev"));
        assert!(!python_tags().contains("# python"));
        assert!(maven_tags().contains("3.8-jdk17-dev"));
        assert_eq!(apk_index().len(), 13);
    }

    #[test]
    fn test_create_test_project() {
        let fixture = ProjectFixture::standard().with_config("[tags]\nmin_score = 0.5\n");
        let tmp = create_test_project(&fixture);
        assert!(tmp.path().join("tags.txt").is_file());
        assert!(tmp.path().join("APKINDEX").is_file());
        assert!(tmp.path().join(".porter/config.toml").is_file());
    }
}
