// ── Configuration loader ──
//
// Reads the YAML tree, merges it with corp defaults and field mappings,
// and produces the canonical records in `crate::model`. Every file is
// parsed at most once per loader and cached by path.

mod layout;
pub mod merge;
mod raw;
mod records;
mod tables;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::error::CoreError;

pub use layout::ProjectLayout;
pub use tables::ReferenceTables;

/// Cached reader over one project tree.
#[derive(Debug)]
pub struct ConfigLoader {
    layout: ProjectLayout,
    cache: DashMap<PathBuf, Arc<Value>>,
}

impl ConfigLoader {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            cache: DashMap::new(),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Number of files parsed so far.
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }

    /// Parse a YAML file, or return the cached parse. An empty file is `Null`.
    pub fn read_yaml(&self, path: &Path) -> Result<Arc<Value>, CoreError> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(Arc::clone(hit.value()));
        }
        let text = self.read_text(path)?;
        let value: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(&text).map_err(|source| CoreError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        debug!(path = %path.display(), "parsed YAML");
        let value = Arc::new(value);
        self.cache.insert(path.to_path_buf(), Arc::clone(&value));
        Ok(value)
    }

    /// Parse a cached YAML file into a typed shape.
    pub(crate) fn parse<T: DeserializeOwned>(&self, path: &Path) -> Result<T, CoreError> {
        let value = match Value::clone(&*self.read_yaml(path)?) {
            Value::Null => Value::Mapping(serde_yaml::Mapping::new()),
            other => other,
        };
        serde_yaml::from_value(value).map_err(|source| CoreError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_text(&self, path: &Path) -> Result<String, CoreError> {
        std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a freeform CLI file. A missing file is logged and skipped.
    pub fn read_freeform(&self, path: &Path) -> Result<Option<String>, CoreError> {
        if !path.is_file() {
            warn!(path = %path.display(), "freeform config file not found, skipping");
            return Ok(None);
        }
        self.read_text(path).map(Some)
    }

    /// Resolve a path written in YAML: absolute paths stay, relative
    /// ones are joined onto `base`.
    pub(crate) fn resolve(base: &Path, written: &str) -> PathBuf {
        let path = Path::new(written.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    // ── Reference tables ─────────────────────────────────────────────

    /// Defaults and mapping for `name`. Both files must exist.
    pub fn tables(&self, name: &str) -> Result<ReferenceTables, CoreError> {
        let defaults_path = self.layout.corp_defaults(name);
        let mapping_path = self.layout.field_mapping(name);
        for path in [&defaults_path, &mapping_path] {
            if !path.is_file() {
                return Err(CoreError::ConfigNotFound {
                    kind: "reference table".into(),
                    key: name.into(),
                    path: Some(path.clone()),
                });
            }
        }
        Ok(ReferenceTables {
            name: name.into(),
            defaults: self.read_yaml(&defaults_path)?,
            mapping: self.read_yaml(&mapping_path)?,
        })
    }

    /// Like [`Self::tables`], but missing files yield empty tables.
    pub fn optional_tables(&self, name: &str) -> Result<ReferenceTables, CoreError> {
        let defaults_path = self.layout.corp_defaults(name);
        let mapping_path = self.layout.field_mapping(name);
        let mut tables = ReferenceTables::empty(name);
        if defaults_path.is_file() {
            tables.defaults = self.read_yaml(&defaults_path)?;
        } else {
            debug!(table = name, "no corp defaults table");
        }
        if mapping_path.is_file() {
            tables.mapping = self.read_yaml(&mapping_path)?;
        }
        Ok(tables)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
