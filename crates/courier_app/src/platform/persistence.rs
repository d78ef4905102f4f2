use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use client_logging::{client_error, client_info, client_warn};
use courier_client::{ensure_artifacts_dir, AtomicFileWriter};
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = ".courier_config.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedConfig {
    backend_url: String,
    updated_utc: String,
}

/// Stored backend URL, or `None` when no usable config exists. Unreadable or
/// unparsable files degrade to `None` with a logged warning.
pub(crate) fn load_backend_url(dir: &Path) -> Option<String> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            client_warn!("Failed to read client config from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<PersistedConfig>(&content) {
        Ok(config) if !config.backend_url.trim().is_empty() => {
            client_info!("Loaded backend URL from {:?}", path);
            Some(config.backend_url)
        }
        Ok(_) => None,
        Err(err) => {
            client_warn!("Failed to parse client config from {:?}: {}", path, err);
            None
        }
    }
}

pub(crate) fn save_backend_url(dir: &Path, backend_url: &str) {
    if let Err(err) = ensure_artifacts_dir(dir) {
        client_error!("Failed to ensure artifacts dir {:?}: {}", dir, err);
        return;
    }

    let config = PersistedConfig {
        backend_url: backend_url.to_string(),
        updated_utc: Utc::now().to_rfc3339(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&config, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_error!("Failed to serialize client config: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(dir));
    if let Err(err) = writer.write(CONFIG_FILENAME, content.as_bytes()) {
        client_error!("Failed to write client config to {:?}: {}", dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::{load_backend_url, save_backend_url};
    use tempfile::TempDir;

    #[test]
    fn round_trips_the_backend_url() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_backend_url(temp.path()), None);

        save_backend_url(temp.path(), "http://localhost:8000");
        assert_eq!(
            load_backend_url(temp.path()),
            Some("http://localhost:8000".to_string())
        );

        save_backend_url(temp.path(), "http://localhost:9000/");
        assert_eq!(
            load_backend_url(temp.path()),
            Some("http://localhost:9000/".to_string())
        );
    }

    #[test]
    fn garbage_config_degrades_to_none() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".courier_config.ron"), "not ron at all").unwrap();
        assert_eq!(load_backend_url(temp.path()), None);
    }

    #[test]
    fn blank_stored_url_is_ignored() {
        let temp = TempDir::new().unwrap();
        save_backend_url(temp.path(), "   ");
        assert_eq!(load_backend_url(temp.path()), None);
    }
}
