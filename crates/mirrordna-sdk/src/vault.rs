use crate::document::read_document;
use crate::errors::SdkError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Fields every vault configuration must carry.
pub const REQUIRED_VAULT_FIELDS: &[&str] = &["vault_id", "name", "path", "created_at"];

/// A vault configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault identifier.
    pub vault_id: String,
    /// Human-readable name.
    pub name: String,
    /// Directory holding the vault's files.
    pub path: String,
    /// Creation time as written in the file.
    pub created_at: String,
    /// Any other fields, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loads a JSON or YAML vault configuration and checks its required fields.
pub fn load_vault_config(path: impl AsRef<Path>) -> Result<VaultConfig, SdkError> {
    let path = path.as_ref();
    let value = read_document(path)?;
    let Value::Object(fields) = value else {
        return Err(SdkError::Parse {
            path: path.to_path_buf(),
            message: "vault config must be a mapping".to_string(),
        });
    };

    let missing: Vec<String> = REQUIRED_VAULT_FIELDS
        .iter()
        .filter(|field| !fields.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SdkError::MissingFields {
            path: path.to_path_buf(),
            fields: missing,
        });
    }

    let config: VaultConfig =
        serde_json::from_value(Value::Object(fields)).map_err(|e| SdkError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    tracing::debug!(path = %path.display(), vault_id = %config.vault_id, "loaded vault config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_vault() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.yaml");
        fs::write(
            &path,
            "vault_id: vault_001\nname: Test Vault\npath: /tmp/vault\ncreated_at: \"2025-01-01T00:00:00Z\"\nowner: alice\n",
        )
        .unwrap();

        let config = load_vault_config(&path).unwrap();
        assert_eq!(config.vault_id, "vault_001");
        assert_eq!(config.name, "Test Vault");
        assert_eq!(config.extra["owner"], "alice");
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        fs::write(&path, r#"{"vault_id": "v", "path": "/tmp"}"#).unwrap();

        match load_vault_config(&path) {
            Err(SdkError::MissingFields { fields, .. }) => {
                assert_eq!(fields, vec!["name".to_string(), "created_at".to_string()]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_non_mapping_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(load_vault_config(&path), Err(SdkError::Parse { .. })));
        assert!(matches!(
            load_vault_config(temp_dir.path().join("none.json")),
            Err(SdkError::NotFound(_))
        ));
    }
}
