//! Wire-format serialization of coverage records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::FileCoverage;

/// JSON body of an upload: `{"coverage": {"<path>": [null, ...], ...}}`.
#[derive(Debug, Serialize)]
pub struct Payload {
    pub coverage: BTreeMap<String, Vec<Option<u64>>>,
}

/// Assemble the upload body.
///
/// A leading `null` sentinel is prepended to each line sequence so that
/// array index matches 1-based line number. Paths are used verbatim as map
/// keys; when two records share a path, the later one wins. Line counts are
/// passed through unvalidated.
pub fn coverage_payload(files: &[FileCoverage]) -> Payload {
    let mut coverage = BTreeMap::new();
    for file in files {
        let mut lines = Vec::with_capacity(file.lines.len() + 1);
        lines.push(None);
        lines.extend(file.lines.iter().copied());
        coverage.insert(file.path.clone(), lines);
    }
    Payload { coverage }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn to_json(files: &[FileCoverage]) -> serde_json::Value {
        serde_json::to_value(coverage_payload(files)).unwrap()
    }

    #[test]
    fn test_leading_null_sentinel() {
        let files = vec![FileCoverage::new("src/lib.rs", vec![Some(3), None, Some(0)])];

        let value = to_json(&files);
        let lines = &value["coverage"]["src/lib.rs"];

        assert_eq!(lines, &json!([null, 3, null, 0]));
        assert_eq!(lines.as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_empty_line_sequence() {
        let files = vec![FileCoverage::new("empty.rs", vec![])];

        let value = to_json(&files);
        assert_eq!(value["coverage"]["empty.rs"], json!([null]));
    }

    #[test]
    fn test_duplicate_path_last_wins() {
        let files = vec![
            FileCoverage::new("a.rs", vec![Some(1)]),
            FileCoverage::new("a.rs", vec![Some(2)]),
        ];

        let value = to_json(&files);
        assert_eq!(value["coverage"]["a.rs"], json!([null, 2]));
        assert_eq!(value["coverage"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_paths_used_verbatim() {
        let files = vec![FileCoverage::new("./src/../src/lib.rs", vec![Some(1)])];

        let value = to_json(&files);
        assert!(value["coverage"]
            .as_object()
            .unwrap()
            .contains_key("./src/../src/lib.rs"));
    }
}
