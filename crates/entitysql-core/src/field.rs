//! Declarative field and column metadata.

use crate::types::SqlType;

/// Metadata about one entity property and the column it maps to.
///
/// `FieldInfo` values are written once, usually in a `static` slice produced
/// by `#[derive(Entity)]`, and turned into a `ColumnDescriptor` when the
/// entity is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Property name as read off an instance
    pub name: &'static str,
    /// Database column name (may differ from the property name)
    pub column_name: &'static str,
    /// Type tag attached to parameters bound from this property
    pub sql_type: Option<SqlType>,
    /// Whether this column is (part of) the primary key
    pub primary_key: bool,
    /// Foreign key reference (`TABLE.COLUMN`)
    pub foreign_key: Option<&'static str>,
}

impl FieldInfo {
    /// Create a new field info with minimal required data.
    pub const fn new(name: &'static str, column_name: &'static str) -> Self {
        Self {
            name,
            column_name,
            sql_type: None,
            primary_key: false,
            foreign_key: None,
        }
    }

    /// Set the type tag.
    pub const fn sql_type(mut self, sql_type: SqlType) -> Self {
        self.sql_type = Some(sql_type);
        self
    }

    /// Set primary key flag.
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }

    /// Set foreign key reference.
    pub const fn foreign_key(mut self, reference: &'static str) -> Self {
        self.foreign_key = Some(reference);
        self
    }
}
