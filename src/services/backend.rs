use crate::core::{ProviderSettings, SettingKey, SettingsError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Persistence collaborator behind the settings store
///
/// Calls are made from a blocking worker, one at a time, in the order the
/// store issued them.
pub trait SettingsBackend: Send + Sync + 'static {
    /// Read the full settings document
    fn load(&self) -> Result<ProviderSettings, SettingsError>;

    /// Persist a single setting
    fn write(&self, key: SettingKey, value: &str) -> Result<(), SettingsError>;

    /// Name used in log output
    fn name(&self) -> &str;
}

/// Stores settings as a pretty-printed JSON document on disk
///
/// Each write re-reads the file, so values written by other clients since
/// the last load are kept.
pub struct JsonFileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<ProviderSettings, SettingsError> {
        if !self.path.exists() {
            return Ok(ProviderSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ProviderSettings::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_document(&self, document: &ProviderSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(document)?;
        // Sibling temp file, then rename over the document
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load(&self) -> Result<ProviderSettings, SettingsError> {
        self.read_document()
    }

    fn write(&self, key: SettingKey, value: &str) -> Result<(), SettingsError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| SettingsError::Lock(e.to_string()))?;
        let mut document = self.read_document()?;
        document.set(key, Some(value.to_string()));
        self.write_document(&document)?;
        debug!("Persisted {} to {}", key, self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Keeps settings in memory only; nothing survives the session
#[derive(Default)]
pub struct MemoryBackend {
    document: Mutex<ProviderSettings>,
}

impl MemoryBackend {
    pub fn new(initial: ProviderSettings) -> Self {
        Self {
            document: Mutex::new(initial),
        }
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<ProviderSettings, SettingsError> {
        self.document
            .lock()
            .map(|document| document.clone())
            .map_err(|e| SettingsError::Lock(e.to_string()))
    }

    fn write(&self, key: SettingKey, value: &str) -> Result<(), SettingsError> {
        self.document
            .lock()
            .map_err(|e| SettingsError::Lock(e.to_string()))?
            .set(key, Some(value.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("settings.json"));
        assert_eq!(backend.load().unwrap(), ProviderSettings::default());
    }

    #[test]
    fn test_write_then_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let backend = JsonFileBackend::new(&path);
        backend.load().unwrap();
        backend.write(SettingKey::NovaApiKey, "abc123").unwrap();
        backend
            .write(SettingKey::OpenaiBaseUrl, "https://api.openai.com/v1")
            .unwrap();

        let reopened = JsonFileBackend::new(&path);
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded.get(SettingKey::NovaApiKey), Some("abc123"));
        assert_eq!(
            loaded.get(SettingKey::OpenaiBaseUrl),
            Some("https://api.openai.com/v1")
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_write_keeps_values_from_other_clients() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let backend = JsonFileBackend::new(&path);
        backend.load().unwrap();

        std::fs::write(&path, r#"{"openai_base_url":"https://other-client"}"#).unwrap();
        backend.write(SettingKey::NovaApiKey, "abc").unwrap();

        let loaded = JsonFileBackend::new(&path).load().unwrap();
        assert_eq!(loaded.get(SettingKey::NovaApiKey), Some("abc"));
        assert_eq!(loaded.get(SettingKey::OpenaiBaseUrl), Some("https://other-client"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(backend.load(), Err(SettingsError::Serde(_))));
    }

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::default();
        backend.write(SettingKey::OpenaiApiKey, "sk-test").unwrap();
        assert_eq!(
            backend.load().unwrap().get(SettingKey::OpenaiApiKey),
            Some("sk-test")
        );
    }
}
