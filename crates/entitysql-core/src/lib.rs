//! Core types and traits for EntitySQL.
//!
//! This crate holds everything statement generation reads but never mutates:
//!
//! - `Entity` trait: the declarative table mapping of a type
//! - `FieldInfo` / `ColumnDescriptor`: per-column metadata
//! - `EntityDescriptor`: the validated, immutable form of an entity's mapping
//! - `EntityRegistry`: descriptors keyed by type, shared across threads
//! - `Value` / `SqlType`: bound values and their optional type tags
//! - `Error`: registration, mapping and argument failures

pub mod config;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod field;
pub mod registry;
pub mod types;
pub mod value;

pub use config::EntitySqlConfig;
pub use descriptor::{
    ColumnDescriptor, EntityDescriptor, ForeignKey, ForeignKeyMatch, is_valid_identifier,
};
pub use entity::Entity;
pub use error::{
    ArgumentError, ArgumentErrorKind, ConfigError, Error, MappingError, MappingErrorKind,
    RegistrationError, RegistrationErrorKind, Result,
};
pub use field::FieldInfo;
pub use registry::EntityRegistry;
pub use types::SqlType;
pub use value::Value;
