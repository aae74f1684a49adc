//! Source package names and their matching forms.
//!
//! The original name is never rewritten. Normalized forms are derived on
//! demand so that apt and yum spellings of the same library compare equal.

use std::fmt;

/// Name prefixes that mark Python 3 packages across distros.
const PYTHON_PREFIXES: &[&str] = &["py3-", "python3-"];

/// Name suffixes that mark split packages.
const SPLIT_SUFFIXES: &[&str] = &["-dev", "-dbg", "-doc"];

/// A package name as it appears in an apt/yum install line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    original: String,
    normalized: String,
}

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        let original = name.into();
        let normalized = normalize(&original);
        PackageName {
            original,
            normalized,
        }
    }

    /// The name exactly as given.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lower-cased, trimmed, `-devel` spelled `-dev`.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Lower-cased and trimmed only; the form alias tables are keyed by.
    pub fn lookup_key(&self) -> String {
        self.original.trim().to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn affixes(&self) -> Affixes {
        Affixes::of(&self.normalized)
    }

    /// Name with affixes and embedded soname digits removed.
    pub fn stem(&self) -> String {
        stem(&self.normalized)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Distro-specific decorations found on a package name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affixes {
    pub lib: bool,
    pub python: bool,
    pub dev: bool,
}

impl Affixes {
    pub fn of(name: &str) -> Affixes {
        Affixes {
            lib: name.starts_with("lib"),
            python: PYTHON_PREFIXES.iter().any(|p| name.starts_with(p)),
            dev: name.ends_with("-dev"),
        }
    }

    /// Number of affixes the source carries that the candidate shares.
    pub fn shared_with(&self, candidate: &Affixes) -> usize {
        usize::from(self.lib && candidate.lib)
            + usize::from(self.python && candidate.python)
            + usize::from(self.dev && candidate.dev)
    }
}

/// Lower-case and trim a name, rewriting the yum `-devel` suffix.
pub fn normalize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.strip_suffix("-devel") {
        Some(base) => format!("{}-dev", base),
        None => lowered,
    }
}

/// Strip `lib`/python prefixes, split-package suffixes and soname digits.
///
/// `libjpeg62-turbo-dev` and `libjpeg-turbo` share the stem `jpeg-turbo`.
pub fn stem(normalized: &str) -> String {
    let mut name = normalized;

    for suffix in SPLIT_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
            break;
        }
    }

    for prefix in PYTHON_PREFIXES.iter().chain(&["lib"]) {
        if let Some(stripped) = name.strip_prefix(prefix) {
            if !stripped.is_empty() {
                name = stripped;
            }
            break;
        }
    }

    let stripped: Vec<String> = name
        .split('-')
        .map(|segment| segment.trim_end_matches(|c: char| c.is_ascii_digit()))
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if stripped.is_empty() {
        name.to_string()
    } else {
        stripped.join("-")
    }
}
