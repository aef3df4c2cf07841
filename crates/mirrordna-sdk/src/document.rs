use crate::errors::SdkError;
use mirrordna_snapshot::SnapshotFormat;
use serde_json::Value;
use std::path::Path;

/// Reads a JSON or YAML document into an untyped value.
///
/// `.yaml` and `.yml` files (any case) are parsed as YAML; anything else as JSON.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value, SdkError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SdkError::NotFound(path.to_path_buf())
        } else {
            SdkError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let parse_error = |message: String| SdkError::Parse {
        path: path.to_path_buf(),
        message,
    };
    if SnapshotFormat::from_path(path) == SnapshotFormat::Yaml {
        serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))
    } else {
        serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_reads_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let json_path = temp_dir.path().join("doc.json");
        let yaml_path = temp_dir.path().join("doc.yml");
        std::fs::write(&json_path, r#"{"a": [1, 2]}"#).unwrap();
        std::fs::write(&yaml_path, "a:\n  - 1\n  - 2\n").unwrap();
        assert_eq!(read_document(&json_path).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(read_document(&yaml_path).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_yaml_extension_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("VAULT.YAML");
        std::fs::write(&path, "vault_id: v1\nname: Upper\n").unwrap();
        assert_eq!(
            read_document(&path).unwrap(),
            json!({"vault_id": "v1", "name": "Upper"})
        );
    }

    #[test]
    fn test_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(read_document(&missing), Err(SdkError::NotFound(_))));

        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, "{oops").unwrap();
        assert!(matches!(read_document(&bad), Err(SdkError::Parse { .. })));
    }
}
