use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration for the records module (`modules.records` in the YAML file)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecordsConfig {
    /// Also mount the `/api/...` route set used by older clients
    #[serde(default = "default_legacy_routes")]
    pub legacy_routes: bool,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            legacy_routes: default_legacy_routes(),
            chat: ChatConfig::default(),
        }
    }
}

fn default_legacy_routes() -> bool {
    true
}

/// Extra canned replies for the help-desk chatbot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Answer for messages that match nothing
    #[serde(default)]
    pub fallback: Option<String>,
    /// Question -> answer; keys are normalized the same way as incoming messages
    #[serde(default)]
    pub replies: BTreeMap<String, String>,
}
