//! Message catalog
//!
//! Nested TOML tables are flattened into dotted keys
//! (`[report.actionBtns] submitReportBtn` becomes
//! `report.actionBtns.submitReportBtn`). Values may contain `{{name}}`
//! placeholders filled from translation parameters.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::errors::TranslationError;
use crate::workflow::traits::Translate;

const ENGLISH: &str = include_str!("../locales/en.toml");

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Built-in English copy
    pub fn english() -> Result<Self, TranslationError> {
        Self::from_toml_str(ENGLISH)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, TranslationError> {
        let table: toml::Table = source
            .parse()
            .map_err(|e: toml::de::Error| TranslationError::InvalidCatalog(e.to_string()))?;

        let mut messages = HashMap::new();
        flatten("", &table, &mut messages)?;
        Ok(Self { messages })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TranslationError> {
        let source = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TranslationError::InvalidCatalog(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Catalog with one key overridden or added
    pub fn with_message(mut self, key: &str, message: &str) -> Self {
        self.messages.insert(key.to_string(), message.to_string());
        self
    }

    /// Catalog with one key dropped
    pub fn without_message(mut self, key: &str) -> Self {
        self.messages.remove(key);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten(
    prefix: &str,
    table: &toml::Table,
    messages: &mut HashMap<String, String>,
) -> Result<(), TranslationError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::String(message) => {
                messages.insert(key, message.clone());
            }
            toml::Value::Table(nested) => flatten(&key, nested, messages)?,
            other => {
                return Err(TranslationError::InvalidCatalog(format!(
                    "{key} must be a string or table, found {}",
                    other.type_str()
                )))
            }
        }
    }
    Ok(())
}

impl Translate for Catalog {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> Result<String, TranslationError> {
        let template = self
            .messages
            .get(key)
            .ok_or_else(|| TranslationError::MissingKey {
                key: key.to_string(),
            })?;

        let mut missing = None;
        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match params.iter().find(|(param, _)| *param == name) {
                Some((_, value)) => value.to_string(),
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(param) => Err(TranslationError::MissingParam {
                key: key.to_string(),
                param,
            }),
            None => Ok(rendered.into_owned()),
        }
    }
}
