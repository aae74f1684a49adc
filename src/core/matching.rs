//! Match results shared by the tag matcher and the package mapper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a [`Match`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The query appeared verbatim among the candidates.
    Exact,
    /// The query was found in an alias table.
    Alias,
    /// Best-effort scored match.
    Fuzzy,
    /// Nothing scored high enough.
    None,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchKind::Exact => "exact",
            MatchKind::Alias => "alias",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::None => "none",
        };
        f.write_str(s)
    }
}

/// Result of one query.
///
/// `kind == Exact` always carries `score == 1.0`, and `kind == None`
/// always carries `score == 0.0` and no matched value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub query: String,
    pub matched_value: Option<String>,
    pub score: f64,
    pub kind: MatchKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Match {
    pub fn exact(query: impl Into<String>, value: impl Into<String>) -> Self {
        Match {
            query: query.into(),
            matched_value: Some(value.into()),
            score: 1.0,
            kind: MatchKind::Exact,
            warnings: Vec::new(),
        }
    }

    pub fn alias(query: impl Into<String>, targets: &[String]) -> Self {
        Match {
            query: query.into(),
            matched_value: Some(targets.join(" ")),
            score: 1.0,
            kind: MatchKind::Alias,
            warnings: Vec::new(),
        }
    }

    pub fn fuzzy(query: impl Into<String>, value: impl Into<String>, score: f64) -> Self {
        Match {
            query: query.into(),
            matched_value: Some(value.into()),
            score: score.clamp(0.0, 1.0),
            kind: MatchKind::Fuzzy,
            warnings: Vec::new(),
        }
    }

    /// A "ran fine, found nothing" result with the reason as a warning.
    pub fn none(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Match {
            query: query.into(),
            matched_value: None,
            score: 0.0,
            kind: MatchKind::None,
            warnings: vec![reason.into()],
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Prepend warnings collected before the match was decided.
    pub fn with_leading_warnings(mut self, mut warnings: Vec<String>) -> Self {
        warnings.append(&mut self.warnings);
        self.warnings = warnings;
        self
    }

    pub fn is_match(&self) -> bool {
        self.kind != MatchKind::None
    }

    /// Individual target values; alias matches may name several.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.matched_value
            .as_deref()
            .into_iter()
            .flat_map(str::split_whitespace)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matched_value {
            Some(value) if self.is_match() => write!(
                f,
                "{} -> {} ({}, {:.0}%)",
                self.query,
                value,
                self.kind,
                self.score * 100.0
            ),
            _ => write!(f, "{} -> (no match)", self.query),
        }
    }
}
