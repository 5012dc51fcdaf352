//! Generation settings shared by the registry and the operations facade.

use serde::Deserialize;

use crate::Result;

/// Settings that shape generated statements.
///
/// ```
/// use entitysql_core::EntitySqlConfig;
///
/// let config = EntitySqlConfig::from_json(r#"{ "alias_suffix": "_t" }"#).unwrap();
/// assert_eq!(config.alias_suffix, "_t");
/// assert!(config.foreign_key_convention);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntitySqlConfig {
    /// Appended to the entity's type name to form its default alias.
    pub alias_suffix: String,
    /// Place non-null primary-key columns in the SET clause of a default
    /// `update` as well as in its WHERE clause.
    pub primary_keys_in_set: bool,
    /// Resolve a foreign key by the `<PARENT_TABLE>_<PARENT_KEY>` column name
    /// when the child declares no explicit reference to the parent table.
    pub foreign_key_convention: bool,
}

impl Default for EntitySqlConfig {
    fn default() -> Self {
        Self {
            alias_suffix: "_".to_string(),
            primary_keys_in_set: false,
            foreign_key_convention: true,
        }
    }
}

impl EntitySqlConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the default alias suffix.
    pub fn with_alias_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.alias_suffix = suffix.into();
        self
    }

    /// Set whether default updates keep primary keys in SET.
    pub fn with_primary_keys_in_set(mut self, value: bool) -> Self {
        self.primary_keys_in_set = value;
        self
    }

    /// Set whether the foreign-key naming convention is used.
    pub fn with_foreign_key_convention(mut self, value: bool) -> Self {
        self.foreign_key_convention = value;
        self
    }
}
