//! Settings type definitions with compiled defaults.
//!
//! Field names serialize as camelCase to match the settings file format.

use askdb_core::policy::DEFAULT_SENSITIVE_IDENTIFIERS;
use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AskdbSettings {
    /// Settings schema version.
    pub version: String,
    /// Database location.
    pub database: DatabaseSettings,
    /// Language-model provider.
    pub provider: ProviderSettings,
    /// Query journal location.
    pub journal: JournalSettings,
    /// Result pager behavior.
    pub pager: PagerSettings,
    /// Statement gate policy.
    pub policy: PolicySettings,
}

impl Default for AskdbSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            database: DatabaseSettings::default(),
            provider: ProviderSettings::default(),
            journal: JournalSettings::default(),
            pager: PagerSettings::default(),
            policy: PolicySettings::default(),
        }
    }
}

/// Database location settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Path to the `SQLite` database file.
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: home_joined(&[".askdb", "askdb.db"]),
        }
    }
}

/// Language-model provider settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// Text-generation endpoint URL.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// API key. Usually left unset in the file and supplied via the
    /// `ASKDB_API_KEY` or `DASHSCOPE_API_KEY` environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url:
                "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation"
                    .to_string(),
            model: "qwen-turbo".to_string(),
            api_key: None,
        }
    }
}

/// Query journal settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalSettings {
    /// Directory holding the journal files.
    pub dir: String,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            dir: home_joined(&[".askdb", "logs"]),
        }
    }
}

/// Result pager settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagerSettings {
    /// Rows per page in interactive display.
    pub page_size: usize,
}

impl Default for PagerSettings {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Statement gate policy settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    /// Forbidden identifier substrings, in match order.
    pub sensitive_fields: Vec<String>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            sensitive_fields: DEFAULT_SENSITIVE_IDENTIFIERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

fn home_joined(parts: &[&str]) -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let mut path = std::path::PathBuf::from(home);
    for p in parts {
        path.push(p);
    }
    path.to_string_lossy().into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
