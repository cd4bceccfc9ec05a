//! Loading of the index mapping and settings files.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error};

use crate::errors::LoaderError;

/// Read and parse a JSON schema file named by the `setting` configuration key.
///
/// Both unreadable and unparseable files fail with `LoaderError::ResourceLoad`
/// naming the path.
pub async fn load_schema(setting: &'static str, path: &Path) -> Result<Value, LoaderError> {
    let resource_error = || LoaderError::ResourceLoad {
        setting,
        path: path.to_path_buf(),
    };

    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!(setting, path = %path.display(), error = %e, "Could not read schema file");
        resource_error()
    })?;

    let schema = serde_json::from_str(&contents).map_err(|e| {
        error!(setting, path = %path.display(), error = %e, "Could not parse schema file");
        resource_error()
    })?;

    debug!(setting, path = %path.display(), "Loaded schema file");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_schema() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"settings": {{"index": {{}}}}}}"#).unwrap();

        let schema = load_schema("settingsPath", file.path()).await.unwrap();

        assert!(schema["settings"]["index"].is_object());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chicken");

        let err = load_schema("settingsPath", &path).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("settingsPath cannot be loaded: {}", path.display())
        );
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_schema("mappingPath", file.path()).await.unwrap_err();

        assert!(matches!(
            err,
            LoaderError::ResourceLoad {
                setting: "mappingPath",
                ..
            }
        ));
    }
}
