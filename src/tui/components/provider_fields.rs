//! The provider credential and endpoint fields
use crate::core::{ProviderKind, SettingKey};
use crate::tui::components::bound_field::{FieldSpec, InputKind};

pub const NOVA_API_KEY: FieldSpec = FieldSpec {
    key: SettingKey::NovaApiKey,
    input_kind: InputKind::Password,
    placeholder: "Enter your Deepgram API Key...",
    label_key: "settings.novaApiKey.title",
    description_key: "settings.novaApiKey.description",
};

pub const NOVA_BASE_URL: FieldSpec = FieldSpec {
    key: SettingKey::NovaBaseUrl,
    input_kind: InputKind::Text,
    placeholder: "https://api.deepgram.com/v1",
    label_key: "settings.novaBaseUrl.title",
    description_key: "settings.novaBaseUrl.description",
};

pub const OPENAI_API_KEY: FieldSpec = FieldSpec {
    key: SettingKey::OpenaiApiKey,
    input_kind: InputKind::Password,
    placeholder: "Enter your OpenAI API Key...",
    label_key: "settings.openaiApiKey.title",
    description_key: "settings.openaiApiKey.description",
};

pub const OPENAI_BASE_URL: FieldSpec = FieldSpec {
    key: SettingKey::OpenaiBaseUrl,
    input_kind: InputKind::Text,
    placeholder: "https://api.openai.com/v1",
    label_key: "settings.openaiBaseUrl.title",
    description_key: "settings.openaiBaseUrl.description",
};

/// Fields in display order
pub fn all_specs() -> [FieldSpec; 4] {
    [NOVA_API_KEY, NOVA_BASE_URL, OPENAI_API_KEY, OPENAI_BASE_URL]
}

pub fn spec_for(key: SettingKey) -> FieldSpec {
    match key {
        SettingKey::NovaApiKey => NOVA_API_KEY,
        SettingKey::NovaBaseUrl => NOVA_BASE_URL,
        SettingKey::OpenaiApiKey => OPENAI_API_KEY,
        SettingKey::OpenaiBaseUrl => OPENAI_BASE_URL,
    }
}

/// Catalog key of the group heading for a provider
pub fn group_label_key(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Deepgram => "settings.group.deepgram",
        ProviderKind::OpenAi => "settings.group.openai",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;

    #[test]
    fn test_specs_follow_key_order() {
        let keys: Vec<SettingKey> = all_specs().iter().map(|spec| spec.key).collect();
        assert_eq!(keys, SettingKey::ALL.to_vec());
        for key in SettingKey::ALL {
            assert_eq!(spec_for(key).key, key);
        }
    }

    #[test]
    fn test_secrets_are_masked() {
        for spec in all_specs() {
            assert_eq!(spec.input_kind == InputKind::Password, spec.key.is_secret());
        }
    }

    #[test]
    fn test_base_url_placeholders_match_provider_defaults() {
        assert_eq!(NOVA_BASE_URL.placeholder, ProviderKind::Deepgram.default_base_url());
        assert_eq!(OPENAI_BASE_URL.placeholder, ProviderKind::OpenAi.default_base_url());
    }

    #[test]
    fn test_every_label_is_translated() {
        let catalog = Catalog::english();
        for spec in all_specs() {
            assert_ne!(catalog.text(spec.label_key), spec.label_key);
            assert_ne!(catalog.text(spec.description_key), spec.description_key);
        }
        for provider in [ProviderKind::Deepgram, ProviderKind::OpenAi] {
            assert_ne!(catalog.text(group_label_key(provider)), group_label_key(provider));
        }
    }
}
