//! EntitySQL - compile entity instances into parameterized SQL statements.
//!
//! EntitySQL maps plain Rust structs to tables and generates INSERT, UPDATE,
//! DELETE, SELECT and COUNT statements from their current values:
//!
//! - Declarative mapping through `#[derive(Entity)]`
//! - An immutable, thread-safe registry of entity descriptors
//! - Named parameters (`:girl.name`, `:p0`) with their bound values
//! - No connections: the `(text, parameters)` pair goes to your driver
//!
//! # Quick Start
//!
//! ```ignore
//! use entitysql::prelude::*;
//!
//! #[derive(Entity)]
//! #[entity(table = "GIRL")]
//! struct BadGirl {
//!     #[entity(id, column = "ID")]
//!     fooid: Option<i32>,
//!     #[entity(column = "NAME")]
//!     fooname: Option<String>,
//!     #[entity(column = "SPECIALITY")]
//!     foospeciality: Option<String>,
//! }
//!
//! let registry = EntityRegistry::new();
//! registry.register::<BadGirl>()?;
//! let sql = EntitySql::new(&registry);
//!
//! let girl = BadGirl { fooid: Some(2), fooname: None, foospeciality: Some(".net".into()) };
//! let delete = sql.delete(&girl)?;
//! assert_eq!(
//!     delete.generate_query(),
//!     "delete from GIRL where (GIRL.ID=:badGirl.fooid and GIRL.SPECIALITY=:badGirl.foospeciality)"
//! );
//! assert_eq!(delete.query_parameters().len(), 2);
//! ```
//!
//! # Features
//!
//! - **Null-aware**: default operations skip null properties, `*_all` variants keep them
//! - **Key-aware**: primary keys drive UPDATE and `*_by_id` predicates
//! - **Foreign keys**: `find_foreign` follows declared or conventional references
//! - **Traceable**: every generated statement is logged through `tracing`

use serde::Serialize;

pub use entitysql_core::{
    ArgumentError, ArgumentErrorKind, ColumnDescriptor, ConfigError, Entity, EntityDescriptor,
    EntityRegistry, EntitySqlConfig, Error, FieldInfo, ForeignKey, MappingError,
    MappingErrorKind, RegistrationError, RegistrationErrorKind, Result, SqlType, Value,
};
pub use entitysql_macros::Entity;
pub use entitysql_query::{
    EntitySql, Inclusion, ParamName, ParameterValue, QueryParameters, StatementBuilder,
};

/// A finished statement in the form handed to an executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// Statement text with `:name` placeholders
    pub sql: String,
    /// Bound parameters in allocation order
    pub params: QueryParameters,
}

impl Statement {
    /// JSON form: `{"sql": "...", "params": [{"name", "value", "sql_type"}, ...]}`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<StatementBuilder> for Statement {
    fn from(builder: StatementBuilder) -> Self {
        let (sql, params) = builder.into_parts();
        Self { sql, params }
    }
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Entity, EntityRegistry, EntitySql, EntitySqlConfig, Error, Result, Statement,
        StatementBuilder, Value,
    };
}
