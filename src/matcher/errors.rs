//! Matching error types and diagnostics.
//!
//! Only malformed calls are errors. A query that runs fine but finds
//! nothing good enough returns a `Match` with `MatchKind::None`.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error for a single matching call.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum MatchError {
    #[error("invalid input: {0}")]
    #[diagnostic(code(porter::matcher::invalid_input))]
    InvalidInput(String),
}

impl MatchError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        MatchError::InvalidInput(message.into())
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            MatchError::InvalidInput(message) => {
                let mut diag = Diagnostic::error(message.clone());

                if message.contains("variant") {
                    diag = diag.with_suggestion(
                        "Use one of: none, distroless, slim, dev".to_string(),
                    );
                } else if message.contains("distro") {
                    diag = diag.with_suggestion("Use one of: apt, yum, dnf, auto".to_string());
                } else {
                    diag = diag.with_suggestion(
                        "Pass a non-empty tag, package or image name".to_string(),
                    );
                }

                diag
            }
        }
    }
}
