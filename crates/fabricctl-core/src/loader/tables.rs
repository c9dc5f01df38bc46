// ── Reference tables ──

use std::sync::Arc;

use indexmap::IndexMap;
use serde_yaml::Value;

use super::merge;
use crate::model::Scalar;

/// Corp defaults plus field-name mapping for one entity kind.
///
/// Loaded once through the [`ConfigLoader`](super::ConfigLoader) cache
/// and handed to payload builders explicitly.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub name: String,
    pub defaults: Arc<Value>,
    pub mapping: Arc<Value>,
}

impl ReferenceTables {
    /// Tables with no defaults and an identity mapping.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: Arc::new(Value::Null),
            mapping: Arc::new(Value::Null),
        }
    }

    pub fn from_values(name: impl Into<String>, defaults: Value, mapping: Value) -> Self {
        Self {
            name: name.into(),
            defaults: Arc::new(defaults),
            mapping: Arc::new(mapping),
        }
    }

    /// Top-level scalar from the defaults table (e.g. `networkTemplate`).
    pub fn default_str(&self, key: &str) -> Option<String> {
        self.defaults
            .get(key)
            .and_then(merge::to_scalar)
            .map(|s| s.to_string())
    }

    /// Defaults of `section` renamed through the same-named mapping section.
    /// Keys without a mapping keep their semantic name.
    pub fn mapped_section(&self, section: &str) -> IndexMap<String, Scalar> {
        let renames = merge::section_mapping(&self.mapping, section);
        merge::section_values(&self.defaults, section)
            .into_iter()
            .map(|(key, value)| {
                let wire = renames.get(&key).cloned().unwrap_or(key);
                (wire, value)
            })
            .collect()
    }

    /// Rename a user-supplied semantic key through `section`.
    pub fn wire_name(&self, section: &str, key: &str) -> String {
        merge::section_mapping(&self.mapping, section)
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mapped_section_renames_known_keys() {
        let tables = ReferenceTables::from_values(
            "network",
            serde_yaml::from_str(
                "networkTemplate: Custom_Net\nGeneral Parameters:\n  Multicast Group: 239.1.1.0\n  tag: 999\n",
            )
            .unwrap(),
            serde_yaml::from_str("General Parameters:\n  Multicast Group: mcastGroup\n").unwrap(),
        );
        let mapped = tables.mapped_section("General Parameters");
        assert_eq!(mapped.get("mcastGroup"), Some(&Scalar::from("239.1.1.0")));
        assert_eq!(mapped.get("tag"), Some(&Scalar::Int(999)));
        assert_eq!(tables.default_str("networkTemplate").as_deref(), Some("Custom_Net"));
        assert_eq!(tables.wire_name("General Parameters", "Other"), "Other");
    }
}
