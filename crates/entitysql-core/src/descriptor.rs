//! Registered entity descriptors.
//!
//! An `EntityDescriptor` is the immutable, validated form of an entity's
//! declared metadata. The registry builds one per type and hands out shared
//! references to it; nothing mutates it afterwards.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::EntitySqlConfig;
use crate::entity::Entity;
use crate::error::{RegistrationError, RegistrationErrorKind, Result};
use crate::types::SqlType;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    })
}

/// Check that a table, alias, column or property name is a plain identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

/// One mapped column of a registered entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    property: &'static str,
    column: &'static str,
    primary_key: bool,
    sql_type: Option<SqlType>,
}

impl ColumnDescriptor {
    /// Property name read off instances.
    pub fn property_name(&self) -> &'static str {
        self.property
    }

    /// SQL column name.
    pub fn column_name(&self) -> &'static str {
        self.column
    }

    /// Whether the column is part of the primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Type tag for parameters bound from this column.
    pub fn sql_type(&self) -> Option<SqlType> {
        self.sql_type
    }
}

/// A declared `TABLE.COLUMN` reference from one of the entity's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referencing column on this entity
    pub column: &'static str,
    /// Referenced table
    pub target_table: &'static str,
    /// Referenced column on the target table
    pub target_column: &'static str,
}

/// A resolved child→parent column pair.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKeyMatch<'a> {
    /// Column on the child entity holding the reference
    pub column: &'a ColumnDescriptor,
    /// Column on the parent entity whose value is referenced
    pub target: &'a ColumnDescriptor,
}

/// Immutable table mapping of one registered entity type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    type_name: &'static str,
    table_name: &'static str,
    alias: String,
    param_prefix: String,
    columns: Vec<ColumnDescriptor>,
    foreign_keys: Vec<ForeignKey>,
}

impl EntityDescriptor {
    /// Build and validate the descriptor for `E`.
    pub fn of<E: Entity>(config: &EntitySqlConfig) -> Result<Self> {
        let type_name = E::NAME;
        let invalid = |what: &str, name: &str| RegistrationError {
            kind: RegistrationErrorKind::InvalidIdentifier,
            entity: type_name.to_string(),
            message: format!("{what} '{name}' of entity '{type_name}' is not a valid identifier"),
        };

        if !is_valid_identifier(E::TABLE_NAME) {
            return Err(invalid("table name", E::TABLE_NAME).into());
        }

        let alias = match E::ALIAS {
            Some(alias) => alias.to_string(),
            None => format!("{}{}", type_name, config.alias_suffix),
        };
        if !is_valid_identifier(&alias) {
            return Err(invalid("alias", &alias).into());
        }

        let mut columns: Vec<ColumnDescriptor> = Vec::with_capacity(E::fields().len());
        let mut foreign_keys = Vec::new();
        for field in E::fields() {
            if !is_valid_identifier(field.name) {
                return Err(invalid("property", field.name).into());
            }
            if !is_valid_identifier(field.column_name) {
                return Err(invalid("column", field.column_name).into());
            }
            if columns.iter().any(|c| c.property == field.name) {
                return Err(RegistrationError {
                    kind: RegistrationErrorKind::DuplicateProperty,
                    entity: type_name.to_string(),
                    message: format!("property '{}' declared twice on '{type_name}'", field.name),
                }
                .into());
            }
            if columns.iter().any(|c| c.column == field.column_name) {
                return Err(RegistrationError {
                    kind: RegistrationErrorKind::DuplicateColumn,
                    entity: type_name.to_string(),
                    message: format!(
                        "column '{}' mapped twice on '{type_name}'",
                        field.column_name
                    ),
                }
                .into());
            }

            if let Some(reference) = field.foreign_key {
                let parsed = reference
                    .split_once('.')
                    .filter(|(t, c)| is_valid_identifier(t) && is_valid_identifier(c));
                let Some((target_table, target_column)) = parsed else {
                    return Err(RegistrationError {
                        kind: RegistrationErrorKind::InvalidForeignKey,
                        entity: type_name.to_string(),
                        message: format!(
                            "foreign key '{reference}' on '{type_name}.{}' is not TABLE.COLUMN",
                            field.name
                        ),
                    }
                    .into());
                };
                foreign_keys.push(ForeignKey {
                    column: field.column_name,
                    target_table,
                    target_column,
                });
            }

            columns.push(ColumnDescriptor {
                property: field.name,
                column: field.column_name,
                primary_key: field.primary_key,
                sql_type: field.sql_type,
            });
        }

        Ok(Self {
            type_name,
            table_name: E::TABLE_NAME,
            alias,
            param_prefix: decapitalize(type_name),
            columns,
            foreign_keys,
        })
    }

    /// Simple type name of the entity.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Mapped table.
    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    /// Alias used to qualify columns in SELECT and UPDATE statements.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Prefix of entity-qualified parameter names (`badGirl` in `badGirl.fooid`).
    pub fn param_prefix(&self) -> &str {
        &self.param_prefix
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Primary-key columns in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Whether any primary-key column is declared.
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|c| c.primary_key)
    }

    /// Declared foreign keys.
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Resolve a property name to its column.
    pub fn column(&self, property: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.property == property)
    }

    /// Resolve a column name (case-insensitive) to its descriptor.
    pub fn column_by_name(&self, column: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.column.eq_ignore_ascii_case(column))
    }

    /// Find the column of this (child) entity that references `parent`.
    ///
    /// Declared references to the parent's table win. With `convention` on,
    /// a column named `<PARENT_TABLE>_<PARENT_KEY>` is accepted as well.
    pub fn foreign_key_to<'a>(
        &'a self,
        parent: &'a EntityDescriptor,
        convention: bool,
    ) -> Option<ForeignKeyMatch<'a>> {
        let declared = self
            .foreign_keys
            .iter()
            .filter(|fk| fk.target_table.eq_ignore_ascii_case(parent.table_name))
            .find_map(|fk| {
                Some(ForeignKeyMatch {
                    column: self.column_by_name(fk.column)?,
                    target: parent.column_by_name(fk.target_column)?,
                })
            });
        if declared.is_some() || !convention {
            return declared;
        }

        let mut keys = parent.primary_keys();
        let (Some(target), None) = (keys.next(), keys.next()) else {
            return None;
        };
        let conventional = format!("{}_{}", parent.table_name, target.column);
        Some(ForeignKeyMatch {
            column: self.column_by_name(&conventional)?,
            target,
        })
    }
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
