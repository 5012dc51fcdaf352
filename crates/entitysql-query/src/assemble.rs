//! Column inclusion policy.
//!
//! Decides which columns of an instance take part in a SET list, an INSERT
//! column list or a WHERE predicate, reads their values and registers each
//! included value with the binder.

use entitysql_core::{
    ArgumentError, ArgumentErrorKind, ColumnDescriptor, Entity, EntityDescriptor, Error, Result,
    Value,
};

use crate::clause::{Assignment, Predicate};
use crate::param::{ParamName, ParameterBinder};

/// Which instance columns a clause takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Only columns whose current value is non-null
    NonNull,
    /// Every declared column, null or not
    All,
}

impl Inclusion {
    fn admits(self, value: &Value) -> bool {
        self == Inclusion::All || !value.is_null()
    }
}

/// Read the current value of `column` off `entity`.
pub fn read_property<E: Entity>(
    descriptor: &EntityDescriptor,
    entity: &E,
    column: &ColumnDescriptor,
) -> Result<Value> {
    entity
        .property_value(column.property_name())
        .ok_or_else(|| Error::unknown_property(descriptor.type_name(), column.property_name()))
}

/// Columns and placeholders of an INSERT: every non-null property.
pub fn insert_values<E: Entity>(
    descriptor: &EntityDescriptor,
    entity: &E,
    binder: &mut ParameterBinder,
) -> Result<(Vec<&'static str>, Vec<ParamName>)> {
    let mut columns = Vec::new();
    let mut params = Vec::new();
    for column in descriptor.columns() {
        let value = read_property(descriptor, entity, column)?;
        if value.is_null() {
            continue;
        }
        columns.push(column.column_name());
        params.push(binder.bind_property(descriptor, column, value));
    }
    Ok((columns, params))
}

/// SET assignments of an UPDATE.
///
/// With `Inclusion::All` every column is assigned. Otherwise only non-null
/// columns are, and primary-key columns only when `keys_in_set` is set.
pub fn set_columns<E: Entity>(
    descriptor: &EntityDescriptor,
    entity: &E,
    inclusion: Inclusion,
    keys_in_set: bool,
    binder: &mut ParameterBinder,
) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::new();
    for column in descriptor.columns() {
        if inclusion == Inclusion::NonNull && column.is_primary_key() && !keys_in_set {
            continue;
        }
        let value = read_property(descriptor, entity, column)?;
        if !inclusion.admits(&value) {
            continue;
        }
        assignments.push(Assignment {
            column: column.column_name(),
            param: binder.bind_property(descriptor, column, value),
        });
    }
    Ok(assignments)
}

/// Grouped equality predicate over the columns `inclusion` admits.
pub fn match_columns<E: Entity>(
    descriptor: &EntityDescriptor,
    entity: &E,
    inclusion: Inclusion,
    qualifier: &str,
    binder: &mut ParameterBinder,
) -> Result<Predicate> {
    let mut predicate = Predicate::grouped(qualifier);
    for column in descriptor.columns() {
        let value = read_property(descriptor, entity, column)?;
        if !inclusion.admits(&value) {
            continue;
        }
        predicate.push(
            column.column_name(),
            binder.bind_property(descriptor, column, value),
        );
    }
    Ok(predicate)
}

/// Grouped equality predicate over the instance's primary-key columns.
///
/// A key column holding null is left out; with nothing left the predicate
/// renders as `(1=1)`.
pub fn match_keys<E: Entity>(
    descriptor: &EntityDescriptor,
    entity: &E,
    qualifier: &str,
    binder: &mut ParameterBinder,
) -> Result<Predicate> {
    let mut predicate = Predicate::grouped(qualifier);
    for column in descriptor.primary_keys() {
        let value = read_property(descriptor, entity, column)?;
        if value.is_null() {
            tracing::debug!(
                entity = descriptor.type_name(),
                property = column.property_name(),
                "Null primary key left out of predicate"
            );
            continue;
        }
        predicate.push(
            column.column_name(),
            binder.bind_property(descriptor, column, value),
        );
    }
    Ok(predicate)
}

/// The one primary-key column a literal id can be matched against.
pub fn single_key(descriptor: &EntityDescriptor) -> Result<&ColumnDescriptor> {
    let mut keys = descriptor.primary_keys();
    match (keys.next(), keys.next()) {
        (Some(key), None) => Ok(key),
        (None, _) => Err(Error::missing_primary_key(descriptor.type_name())),
        (Some(_), Some(_)) => Err(ArgumentError {
            kind: ArgumentErrorKind::IdArity,
            message: format!(
                "entity '{}' has a composite primary key; a single id cannot address it",
                descriptor.type_name()
            ),
        }
        .into()),
    }
}

/// Single unparenthesized `key=:pN` predicate for a caller-supplied id.
pub fn match_literal_key(
    descriptor: &EntityDescriptor,
    id: Value,
    qualifier: &str,
    binder: &mut ParameterBinder,
) -> Result<Predicate> {
    let key = single_key(descriptor)?;
    Ok(Predicate::single(
        qualifier,
        key.column_name(),
        binder.bind_literal(id),
    ))
}
