use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Ya360Error;

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Sectioned string key/value storage for credentials and token material.
///
/// `set` only changes the in-memory view; nothing reaches durable storage
/// until `flush` is called.
pub trait ConfigStore: Send + Sync {
    fn get(&self, section: &str, key: &str) -> Option<String>;

    fn set(&mut self, section: &str, key: &str, value: &str);

    fn flush(&mut self) -> Result<(), Ya360Error>;

    fn has_section(&self, section: &str) -> bool;

    fn remove_section(&mut self, section: &str);
}

impl std::fmt::Debug for dyn ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore").finish_non_exhaustive()
    }
}

/// In-process store. `flush` is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    sections: Sections,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> Result<(), Ya360Error> {
        Ok(())
    }

    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn remove_section(&mut self, section: &str) {
        self.sections.remove(section);
    }
}

/// TOML-file backed store: one table per section, string values.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    sections: Sections,
}

impl FileConfigStore {
    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Ya360Error> {
        let path = path.into();
        let sections = if path.exists() {
            load_sections(&path)?
        } else {
            Sections::new()
        };
        Ok(Self { path, sections })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> Result<(), Ya360Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = toml::to_string(&self.sections).map_err(|e| Ya360Error::ConfigError {
            path: self.path.clone(),
            detail: format!("Cannot serialize config: {e}"),
        })?;
        std::fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), "config flushed");
        Ok(())
    }

    fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    fn remove_section(&mut self, section: &str) {
        self.sections.remove(section);
    }
}

/// Read a TOML file into sections. Non-string scalars are kept in their
/// TOML text form; nested tables and arrays are rejected.
fn load_sections(path: &Path) -> Result<Sections, Ya360Error> {
    let content = std::fs::read_to_string(path).map_err(|e| Ya360Error::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    let table: toml::Table = content.parse().map_err(|e| Ya360Error::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Invalid TOML: {e}"),
    })?;

    let mut sections = Sections::new();
    for (name, value) in table {
        let toml::Value::Table(entries) = value else {
            return Err(Ya360Error::ConfigError {
                path: path.to_path_buf(),
                detail: format!("Top-level key '{name}' is not a section"),
            });
        };
        let mut section = BTreeMap::new();
        for (key, value) in entries {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(_)
                | toml::Value::Float(_)
                | toml::Value::Boolean(_)
                | toml::Value::Datetime(_) => value.to_string(),
                _ => {
                    return Err(Ya360Error::ConfigError {
                        path: path.to_path_buf(),
                        detail: format!("Value of '{name}.{key}' must be a string"),
                    })
                }
            };
            section.insert(key, text);
        }
        sections.insert(name, section);
    }
    Ok(sections)
}
