//! Editor and plugin configuration

use guide_common::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Editor-wide settings, loaded from the `editor` section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Which bilingual field entity labels display
    #[serde(default)]
    pub language: Language,

    /// Prefixed to every `imagePath` when rendering cards
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,

    /// Upper bound on one entity-list fetch; expiry surfaces as a failed fetch
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Page size for entity lists (0 = let the API decide)
    #[serde(default)]
    pub page_limit: u32,
}

fn default_asset_base_url() -> String {
    "https://assets.shiftgiftme.com".to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            asset_base_url: default_asset_base_url(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            page_limit: 0,
        }
    }
}

impl EditorConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// The static slice handed to every plugin instance
    pub fn plugin_config(&self) -> PluginConfig {
        PluginConfig {
            language: self.language,
            asset_base_url: self.asset_base_url.clone(),
            page_limit: Some(self.page_limit).filter(|limit| *limit > 0),
        }
    }
}

/// Per-instance static configuration. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub language: Language,
    pub asset_base_url: String,
    pub page_limit: Option<u32>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        EditorConfig::default().plugin_config()
    }
}

impl PluginConfig {
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Absolute URL of a stored image path. Empty paths stay empty.
    pub fn asset_url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.asset_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.plugin_config().page_limit, None);
    }

    #[test]
    fn test_camel_case_fields() {
        let config: EditorConfig = serde_json::from_str(
            r#"{ "language": "ar", "assetBaseUrl": "https://cdn.test/", "pageLimit": 50 }"#,
        )
        .unwrap();
        let plugin = config.plugin_config();
        assert_eq!(plugin.language, Language::Ar);
        assert_eq!(plugin.page_limit, Some(50));
        assert_eq!(plugin.asset_url("/m.png"), "https://cdn.test/m.png");
    }

    #[test]
    fn test_asset_url() {
        let config = PluginConfig::default();
        assert_eq!(config.asset_url(""), "");
        assert_eq!(
            config.asset_url("m.png"),
            "https://assets.shiftgiftme.com/m.png"
        );
        assert_eq!(config.asset_url("https://x.test/a.png"), "https://x.test/a.png");
    }
}
