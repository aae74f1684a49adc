//! Candidate index - the tags or package names a query is matched against.
//!
//! An index is a read-only snapshot handed in by whoever fetched it. It is
//! kept sorted and de-duplicated so iteration order never depends on the
//! order the registry happened to return entries in.

use std::collections::{BTreeMap, BTreeSet};

/// Read-only, sorted set of candidate strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateIndex {
    entries: Vec<String>,
    /// One-line descriptions, keyed by entry. Only APK indexes carry them.
    descriptions: BTreeMap<String, String>,
}

impl CandidateIndex {
    /// Build an index from any list of strings. Blank entries are dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        CandidateIndex {
            entries: set.into_iter().collect(),
            descriptions: BTreeMap::new(),
        }
    }

    pub fn empty() -> Self {
        CandidateIndex::default()
    }

    /// One entry per line; blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Self {
        CandidateIndex::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Package names and descriptions from the text of an `APKINDEX` file.
    ///
    /// Records are separated by blank lines; the `P:` field names the
    /// package and `T:` describes it.
    pub fn from_apkindex(text: &str) -> Self {
        let mut names = Vec::new();
        let mut descriptions = BTreeMap::new();
        let mut name: Option<&str> = None;
        let mut description: Option<&str> = None;

        for line in text.lines().chain(std::iter::once("")) {
            let line = line.trim_end();
            if line.is_empty() {
                if let Some(name) = name.take().filter(|n| !n.is_empty()) {
                    if let Some(text) = description.take().filter(|d| !d.is_empty()) {
                        descriptions.insert(name.to_string(), text.to_string());
                    }
                    names.push(name);
                }
                description = None;
            } else if let Some(value) = line.strip_prefix("P:") {
                name = Some(value.trim());
            } else if let Some(value) = line.strip_prefix("T:") {
                description = Some(value.trim());
            }
        }

        CandidateIndex::new(names).with_descriptions(descriptions)
    }

    /// Attach descriptions; entries not in the index are ignored.
    pub fn with_descriptions<I, K, V>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (entry, text) in descriptions {
            let entry = entry.into();
            if self.contains(&entry) {
                self.descriptions.insert(entry, text.into());
            }
        }
        self
    }

    pub fn description(&self, entry: &str) -> Option<&str> {
        self.descriptions.get(entry).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries
            .binary_search_by(|e| e.as_str().cmp(entry))
            .is_ok()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }

    /// Case-insensitive name search: exact, then prefix, then substring.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut prefix = Vec::new();
        let mut contains = Vec::new();

        for entry in self.iter() {
            let lowered = entry.to_lowercase();
            if lowered == query {
                exact.push(entry);
            } else if lowered.starts_with(&query) {
                prefix.push(entry);
            } else if lowered.contains(&query) {
                contains.push(entry);
            }
        }

        exact
            .into_iter()
            .chain(prefix)
            .chain(contains)
            .take(limit)
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CandidateIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CandidateIndex::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_and_deduplicated() {
        let index = CandidateIndex::new(["b", "a", " b ", "", "c"]);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(index.len(), 3);
        assert!(index.contains("b"));
        assert!(!index.contains("d"));
    }

    #[test]
    fn test_from_lines_skips_comments() {
        let index = CandidateIndex::from_lines("# tags\n3.12\n\n3.12-dev\n");
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["3.12", "3.12-dev"]);
    }

    #[test]
    fn test_from_apkindex() {
        let text = "C:Q1abc=\nP:curl\nV:8.5.0-r0\nT:URL retrieval utility\n\n\
                    C:Q1def=\nP:openssl-dev\nV:3.2.0-r1\n\n";
        let index = CandidateIndex::from_apkindex(text);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["curl", "openssl-dev"]);
        assert_eq!(index.description("curl"), Some("URL retrieval utility"));
        assert_eq!(index.description("openssl-dev"), None);
    }

    #[test]
    fn test_from_apkindex_without_trailing_blank_line() {
        let index = CandidateIndex::from_apkindex("P:wget\nV:1.25.0-r0\nT:Network utility");
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["wget"]);
        assert_eq!(index.description("wget"), Some("Network utility"));
    }

    #[test]
    fn test_reverse_iteration() {
        let index = CandidateIndex::new(["a", "c", "b"]);
        assert_eq!(index.iter().rev().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_search_priority() {
        let index = CandidateIndex::new(["py3-pip", "pip", "pipx", "python-pip"]);
        assert_eq!(
            index.search("pip", 10),
            vec!["pip", "pipx", "py3-pip", "python-pip"]
        );
        assert_eq!(index.search("pip", 2), vec!["pip", "pipx"]);
        assert!(index.search("  ", 10).is_empty());
    }
}
