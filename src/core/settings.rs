use crate::core::types::SettingKey;
use serde::{Deserialize, Serialize};

/// The persisted settings document
///
/// One optional string per [`SettingKey`]. Absent values are omitted from the
/// serialized form so a fresh file stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nova_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nova_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,
}

impl ProviderSettings {
    pub fn get(&self, key: SettingKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: SettingKey, value: Option<String>) {
        *self.slot_mut(key) = value;
    }

    /// Keys whose value differs between `self` and `other`
    pub fn changed_keys(&self, other: &ProviderSettings) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|key| self.get(*key) != other.get(*key))
            .collect()
    }

    fn slot(&self, key: SettingKey) -> &Option<String> {
        match key {
            SettingKey::NovaApiKey => &self.nova_api_key,
            SettingKey::NovaBaseUrl => &self.nova_base_url,
            SettingKey::OpenaiApiKey => &self.openai_api_key,
            SettingKey::OpenaiBaseUrl => &self.openai_base_url,
        }
    }

    fn slot_mut(&mut self, key: SettingKey) -> &mut Option<String> {
        match key {
            SettingKey::NovaApiKey => &mut self.nova_api_key,
            SettingKey::NovaBaseUrl => &mut self.nova_base_url,
            SettingKey::OpenaiApiKey => &mut self.openai_api_key,
            SettingKey::OpenaiBaseUrl => &mut self.openai_base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_and_set_by_key() {
        let mut settings = ProviderSettings::default();
        assert_eq!(settings.get(SettingKey::NovaApiKey), None);

        settings.set(SettingKey::NovaApiKey, Some("abc123".to_string()));
        assert_eq!(settings.get(SettingKey::NovaApiKey), Some("abc123"));
        assert_eq!(settings.get(SettingKey::OpenaiApiKey), None);
    }

    #[test]
    fn test_absent_values_are_not_serialized() {
        let mut settings = ProviderSettings::default();
        settings.set(
            SettingKey::OpenaiBaseUrl,
            Some("https://api.openai.com/v1".to_string()),
        );
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"openai_base_url":"https://api.openai.com/v1"}"#);

        let restored: ProviderSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, ProviderSettings::default());
    }

    #[test]
    fn test_changed_keys() {
        let before = ProviderSettings::default();
        let mut after = before.clone();
        after.set(SettingKey::NovaBaseUrl, Some("https://x".to_string()));
        assert_eq!(before.changed_keys(&after), vec![SettingKey::NovaBaseUrl]);
    }
}
