use crate::data::persistence::Persistable;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Language used for all labels on screen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    pub fn default_date_format(self) -> &'static str {
        match self {
            Language::De => "%d.%m.%Y",
            Language::En => "%Y-%m-%d",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub language: Language,
    /// chrono strftime pattern for the retirement date. Empty means the
    /// language default.
    pub date_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            language: Language::De,
            date_format: String::new(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }

    pub fn effective_date_format(&self) -> &str {
        if self.date_format.trim().is_empty() {
            self.language.default_date_format()
        } else {
            &self.date_format
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        // An invalid user pattern makes chrono's Display fail; fall back to ISO.
        if write!(out, "{}", date.format(self.effective_date_format())).is_err() {
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}
