//! Metric input files.
//!
//! ```json
//! {
//!   "coordinates": "t, r, \\theta, \\phi",
//!   "components": [["-(1 - 2M/r)", "", "", ""], ...]
//! }
//! ```
//!
//! `coordinates` may also be a JSON array. Empty cells are read as zero.

use std::path::Path;

use serde::Deserialize;

use fieldlens_core::MetricPayload;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinates {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct MetricFile {
    coordinates: Coordinates,
    components: Vec<Vec<String>>,
}

/// Read and validate a metric file.
pub fn load_metric(path: &Path) -> Result<MetricPayload, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: MetricFile = serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let payload = match file.coordinates {
        Coordinates::Text(text) => MetricPayload::from_coordinate_text(file.components, &text)?,
        Coordinates::List(list) => {
            let dimension = list.len();
            MetricPayload::new(file.components, dimension, list)?
        }
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_with_coordinate_text() {
        let json = r#"{"coordinates": "t, x", "components": [["-1", ""], ["", "1"]]}"#;
        let file = write_file(json);
        let payload = load_metric(file.path()).unwrap();
        assert_eq!(payload.dimension(), 2);
        assert_eq!(payload.component(0, 1), Some("0"));
    }

    #[test]
    fn test_load_with_coordinate_list() {
        let file = write_file(
            r#"{"coordinates": ["t", "x", "y"],
                "components": [["-1", "0", "0"], ["0", "1", "0"], ["0", "0", "1"]]}"#,
        );
        let payload = load_metric(file.path()).unwrap();
        assert_eq!(payload.coordinates(), ["t", "x", "y"]);
    }

    #[test]
    fn test_mismatched_metric_is_rejected() {
        let json = r#"{"coordinates": "t, x, y", "components": [["-1", "0"], ["0", "1"]]}"#;
        let file = write_file(json);
        let err = load_metric(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Metric(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_metric(Path::new("/nonexistent/metric.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
