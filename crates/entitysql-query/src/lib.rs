//! Statement assembly for EntitySQL.
//!
//! `entitysql-query` is the **generation layer**. It turns registered
//! entity descriptors and instance values into statement text plus named
//! parameters.
//!
//! # Role In The Architecture
//!
//! - **Inclusion policy** (`assemble`): which columns an operation touches.
//! - **Parameters** (`param`): entity-qualified and positional names.
//! - **Clauses** (`clause`): typed fragments, rendered on demand.
//! - **Operations** (`entity_sql`): insert, update, delete, select and count.
//!
//! The resulting `(text, parameters)` pair is executed elsewhere; nothing in
//! this crate touches a connection. Most users reach these types through the
//! `entitysql` facade crate.

pub mod assemble;
pub mod builder;
pub mod clause;
pub mod entity_sql;
pub mod param;

pub use assemble::Inclusion;
pub use builder::StatementBuilder;
pub use clause::{Arithmetic, Assignment, Condition, Fragment, Predicate, PredicateShape};
pub use entity_sql::EntitySql;
pub use param::{ParamName, ParameterBinder, ParameterValue, QueryParameters};
