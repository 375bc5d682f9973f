use crate::core::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a single editable setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    NovaApiKey,
    NovaBaseUrl,
    OpenaiApiKey,
    OpenaiBaseUrl,
}

impl SettingKey {
    /// Every key, in panel order
    pub const ALL: [SettingKey; 4] = [
        SettingKey::NovaApiKey,
        SettingKey::NovaBaseUrl,
        SettingKey::OpenaiApiKey,
        SettingKey::OpenaiBaseUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NovaApiKey => "nova_api_key",
            Self::NovaBaseUrl => "nova_base_url",
            Self::OpenaiApiKey => "openai_api_key",
            Self::OpenaiBaseUrl => "openai_base_url",
        }
    }

    /// Position of this key in [`SettingKey::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Self::NovaApiKey => 0,
            Self::NovaBaseUrl => 1,
            Self::OpenaiApiKey => 2,
            Self::OpenaiBaseUrl => 3,
        }
    }

    /// Provider this setting configures
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::NovaApiKey | Self::NovaBaseUrl => ProviderKind::Deepgram,
            Self::OpenaiApiKey | Self::OpenaiBaseUrl => ProviderKind::OpenAi,
        }
    }

    /// True for keys holding secrets that must be masked on screen
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::NovaApiKey | Self::OpenaiApiKey)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nova_api_key" => Ok(Self::NovaApiKey),
            "nova_base_url" => Ok(Self::NovaBaseUrl),
            "openai_api_key" => Ok(Self::OpenaiApiKey),
            "openai_base_url" => Ok(Self::OpenaiBaseUrl),
            _ => Err(SettingsError::UnknownKey(s.to_string())),
        }
    }
}

/// External AI provider configured by a pair of settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    Deepgram,
    OpenAi,
}

impl ProviderKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Deepgram => "Deepgram",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    pub fn api_key_setting(&self) -> SettingKey {
        match self {
            ProviderKind::Deepgram => SettingKey::NovaApiKey,
            ProviderKind::OpenAi => SettingKey::OpenaiApiKey,
        }
    }

    pub fn base_url_setting(&self) -> SettingKey {
        match self {
            ProviderKind::Deepgram => SettingKey::NovaBaseUrl,
            ProviderKind::OpenAi => SettingKey::OpenaiBaseUrl,
        }
    }

    /// Endpoint used when the base URL setting is empty
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Deepgram => "https://api.deepgram.com/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_key_names_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
            assert_eq!(SettingKey::ALL[key.index()], key);
        }
        assert!(matches!(
            "novaApiKey".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey(name)) if name == "novaApiKey"
        ));
    }

    #[test]
    fn test_setting_key_serializes_as_wire_name() {
        let json = serde_json::to_string(&SettingKey::NovaApiKey).unwrap();
        assert_eq!(json, "\"nova_api_key\"");
    }

    #[test]
    fn test_provider_pairs() {
        for provider in [ProviderKind::Deepgram, ProviderKind::OpenAi] {
            assert_eq!(provider.api_key_setting().provider(), provider);
            assert_eq!(provider.base_url_setting().provider(), provider);
            assert!(provider.api_key_setting().is_secret());
            assert!(!provider.base_url_setting().is_secret());
        }
    }
}
