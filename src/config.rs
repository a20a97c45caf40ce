// Runtime configuration, read from TOML

use crate::error::ConfigError;
use crate::output::{MessageKind, MessageTable};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Which pipeline sections are traced through the log
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Trace CHECK/DOES sections of verbs, exits and restrictions
    pub sections: bool,
    /// Trace parameter positions after each parse stage
    pub parsing: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trace: TraceConfig,
    /// Message template overrides, keyed by snake_case message kind
    pub messages: IndexMap<MessageKind, String>,
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Config::from_toml(&source)
    }

    pub fn message_table(&self) -> MessageTable {
        MessageTable::with_overrides(&self.messages)
    }
}
