use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::to_tab_json;

/// Settings file name, written to and read from the working directory.
pub const SETTINGS_FILE_NAME: &str = ".transc";

/// When set, overrides `authKey` from the settings file so the key can stay
/// out of version control.
pub const AUTH_KEY_ENV_VAR: &str = "DEEPL_AUTH_KEY";

/// The persisted run configuration. Created once by `transc init`, edited by
/// hand, read once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory holding the language files.
    pub path: String,
    /// File name of the source language inside `path`.
    pub source_lang_file: String,
    /// Target language codes, translated in this order.
    pub trans_lang_codes: Vec<String>,
    pub auth_key: String,
    /// Selects the api-free host for free-plan keys.
    #[serde(rename = "useDevAPI")]
    pub use_dev_api: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: "./i18n".to_string(),
            source_lang_file: "en.json".to_string(),
            trans_lang_codes: vec!["DE".to_string(), "FR".to_string()],
            auth_key: String::new(),
            use_dev_api: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("authKey is not set; edit the settings file or export DEEPL_AUTH_KEY")]
    MissingAuthKey,
    #[error("path is not set")]
    MissingPath,
    #[error("sourceLangFile is not set")]
    MissingSourceLangFile,
    #[error("transLangCodes is empty")]
    NoTargetLanguages,
}

impl Settings {
    /// Load the settings file from `dir`. Returns `Ok(None)` when no file
    /// exists; any other read or parse problem is an error.
    pub fn load(dir: &Path) -> Result<Option<Settings>> {
        let path = dir.join(SETTINGS_FILE_NAME);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let mut settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        settings.apply_auth_key_override(std::env::var(AUTH_KEY_ENV_VAR).ok());
        Ok(Some(settings))
    }

    fn apply_auth_key_override(&mut self, override_key: Option<String>) {
        if let Some(key) = override_key {
            if !key.is_empty() {
                self.auth_key = key;
            }
        }
    }

    /// Check that every field the run depends on is present.
    pub fn ensure_complete(&self) -> Result<(), SettingsError> {
        if self.auth_key.is_empty() {
            return Err(SettingsError::MissingAuthKey);
        }
        if self.path.is_empty() {
            return Err(SettingsError::MissingPath);
        }
        if self.source_lang_file.is_empty() {
            return Err(SettingsError::MissingSourceLangFile);
        }
        if self.trans_lang_codes.is_empty() {
            return Err(SettingsError::NoTargetLanguages);
        }
        Ok(())
    }

    /// Write a default settings file into `dir` unless one already exists.
    /// Returns whether a file was written.
    pub fn write_default(dir: &Path) -> Result<bool> {
        let path = dir.join(SETTINGS_FILE_NAME);
        if path.exists() {
            return Ok(false);
        }
        let pretty = to_tab_json(&Settings::default())?;
        fs::write(&path, pretty)
            .with_context(|| format!("Could not write file {}", path.display()))?;
        Ok(true)
    }
}
