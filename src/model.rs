//! In-memory representation of per-file coverage results, independent of
//! whatever mechanism collected them. The uploader consumes a finished list
//! of `FileCoverage` records and never mutates it.

use std::path::Path;

use serde_json::Value;

use crate::error::{CovpostError, Result};

/// Per-line hit counts for a single source file.
///
/// `lines` holds one entry per source line, in order: `None` marks a line
/// that is not executable, `Some(n)` a line that was hit `n` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    pub path: String,
    pub lines: Vec<Option<u64>>,
}

impl FileCoverage {
    pub fn new(path: impl Into<String>, lines: Vec<Option<u64>>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }
}

/// Read coverage records from a JSON file of shape
/// `{"src/lib.rs": [null, 3, 0], ...}` (no leading sentinel; the uploader
/// adds it on serialization).
pub fn from_json_file(path: &Path) -> Result<Vec<FileCoverage>> {
    let bytes = std::fs::read(path)?;
    from_json_slice(&bytes)
}

pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<FileCoverage>> {
    let map: serde_json::Map<String, Value> = serde_json::from_slice(bytes)?;

    let mut files = Vec::with_capacity(map.len());
    for (path, value) in map {
        let entries = value.as_array().ok_or_else(|| {
            CovpostError::Parse(format!("expected an array of line hits for '{}'", path))
        })?;

        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Value::Null => lines.push(None),
                Value::Number(n) => {
                    let hits = n.as_u64().ok_or_else(|| {
                        CovpostError::Parse(format!(
                            "hit count must be a non-negative integer in '{}'",
                            path
                        ))
                    })?;
                    lines.push(Some(hits));
                }
                _ => {
                    return Err(CovpostError::Parse(format!(
                        "line entry must be null or a number in '{}'",
                        path
                    )))
                }
            }
        }
        files.push(FileCoverage { path, lines });
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coverage_json() {
        let files =
            from_json_slice(br#"{"src/lib.rs": [null, 3, 0], "src/main.rs": [1]}"#).unwrap();
        assert_eq!(files.len(), 2);

        let lib = files.iter().find(|f| f.path == "src/lib.rs").unwrap();
        assert_eq!(lib.lines, vec![None, Some(3), Some(0)]);

        let main = files.iter().find(|f| f.path == "src/main.rs").unwrap();
        assert_eq!(main.lines, vec![Some(1)]);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = from_json_slice(br#"{"src/lib.rs": "not an array"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_negative_hits() {
        let result = from_json_slice(br#"{"src/lib.rs": [null, -1]}"#);
        assert!(result.is_err());
    }
}
