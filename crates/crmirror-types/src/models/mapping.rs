use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::ConfigError;

/// A persistent binding between one local file and one resource coordinate.
///
/// Identity is the file path: at most one mapping per file. Created once at
/// startup, immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncMapping {
    /// Local JSON file being mirrored
    pub file_path: PathBuf,
    /// Resource type plural (e.g. "services")
    pub plural: String,
    /// Resource instance name (e.g. "service-info")
    pub name: String,
}

impl SyncMapping {
    pub fn new(
        file_path: impl Into<PathBuf>,
        plural: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self { file_path: file_path.into(), plural: plural.into(), name: name.into() }
    }
}

/// The parsed, ordered set of sync mappings.
///
/// Produced once from the raw mapping text and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MappingSet {
    mappings: Vec<SyncMapping>,
}

impl MappingSet {
    /// Parse mapping text where each non-blank line has the form
    /// `path=plural:name`.
    ///
    /// Blank lines are skipped; surrounding whitespace on each component is
    /// trimmed. Input order is preserved. Fails on a malformed line, an
    /// empty component, or a file path bound more than once.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut mappings = Vec::new();
        let mut seen_paths: HashSet<PathBuf> = HashSet::new();

        for (idx, raw_line) in raw.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (path_part, target_part) = trimmed.split_once('=').ok_or_else(|| {
                ConfigError::MalformedMapping { line, text: trimmed.to_string() }
            })?;
            let (plural_part, name_part) = target_part.split_once(':').ok_or_else(|| {
                ConfigError::MalformedMapping { line, text: trimmed.to_string() }
            })?;

            let path = path_part.trim();
            let plural = plural_part.trim();
            let name = name_part.trim();

            if path.is_empty() {
                return Err(ConfigError::EmptyField { field: "path".to_string(), line });
            }
            if plural.is_empty() {
                return Err(ConfigError::EmptyField { field: "plural".to_string(), line });
            }
            if name.is_empty() {
                return Err(ConfigError::EmptyField { field: "name".to_string(), line });
            }

            let file_path = PathBuf::from(path);
            if !seen_paths.insert(file_path.clone()) {
                return Err(ConfigError::DuplicateFilePath { path: path.to_string() });
            }

            mappings.push(SyncMapping { file_path, plural: plural.to_string(), name: name.to_string() });
        }

        Ok(Self { mappings })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyncMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn into_vec(self) -> Vec<SyncMapping> {
        self.mappings
    }
}

impl IntoIterator for MappingSet {
    type Item = SyncMapping;
    type IntoIter = std::vec::IntoIter<SyncMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_mapping() {
        let set = MappingSet::parse("/data/service.json=services:service-info").unwrap();

        assert_eq!(set.len(), 1);
        let m = set.iter().next().unwrap();
        assert_eq!(m.file_path, PathBuf::from("/data/service.json"));
        assert_eq!(m.plural, "services");
        assert_eq!(m.name, "service-info");
    }

    #[test]
    fn test_parse_preserves_order_and_skips_blanks() {
        let raw = "\n/a.json=as:a\n\n  /b.json = bs : b  \n";
        let set = MappingSet::parse(raw).unwrap();

        let paths: Vec<_> = set.iter().map(|m| m.file_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("/a.json"), PathBuf::from("/b.json")]);
        assert_eq!(set.iter().nth(1).unwrap().plural, "bs");
    }

    #[test]
    fn test_parse_rejects_missing_equals() {
        let err = MappingSet::parse("/a.json services:a").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedMapping { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_missing_colon() {
        let err = MappingSet::parse("/a.json=services").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedMapping { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_duplicate_path() {
        let raw = "/a.json=as:a\n/a.json=bs:b";
        let err = MappingSet::parse(raw).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateFilePath { path: "/a.json".to_string() });
    }

    #[test]
    fn test_parse_rejects_empty_components() {
        let err = MappingSet::parse("/a.json=:a").unwrap_err();
        assert_eq!(err, ConfigError::EmptyField { field: "plural".to_string(), line: 1 });

        let err = MappingSet::parse("/a.json=as:").unwrap_err();
        assert_eq!(err, ConfigError::EmptyField { field: "name".to_string(), line: 1 });

        let err = MappingSet::parse("=as:a").unwrap_err();
        assert_eq!(err, ConfigError::EmptyField { field: "path".to_string(), line: 1 });
    }

    #[test]
    fn test_parse_reports_line_numbers_after_blanks() {
        let raw = "/a.json=as:a\n\nbroken-line";
        let err = MappingSet::parse(raw).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedMapping { line: 3, .. }));
    }
}
