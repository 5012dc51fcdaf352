//! Statement generation for registered entities.
//!
//! `EntitySql` reads descriptors out of an [`EntityRegistry`] and turns an
//! instance (or a bare type) into a [`StatementBuilder`]. Nothing here opens
//! a connection; the text and parameters are handed to whatever executes
//! them.
//!
//! Column qualification:
//! - UPDATE, SELECT and COUNT predicates use the entity alias
//! - DELETE predicates and column arithmetic use the table name
//! - SET and INSERT columns are bare

use std::sync::Arc;

use entitysql_core::{
    ArgumentError, ArgumentErrorKind, Entity, EntityDescriptor, EntityRegistry, Error,
    MappingError, MappingErrorKind, Result, Value, is_valid_identifier,
};

use crate::assemble::{self, Inclusion};
use crate::builder::{Assembly, StatementBuilder};
use crate::clause::{Arithmetic, Assignment, Fragment, Predicate};

/// Statement generator bound to a registry.
#[derive(Debug, Clone, Copy)]
pub struct EntitySql<'r> {
    registry: &'r EntityRegistry,
}

impl<'r> EntitySql<'r> {
    /// Generate statements for the types registered in `registry`.
    pub fn new(registry: &'r EntityRegistry) -> Self {
        Self { registry }
    }

    /// Registry this generator reads from.
    pub fn registry(&self) -> &'r EntityRegistry {
        self.registry
    }

    fn descriptor<E: Entity>(&self) -> Result<Arc<EntityDescriptor>> {
        self.registry.lookup::<E>()
    }

    /// `insert into T (cols) values (:params)` over the non-null properties.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let (columns, params) = assemble::insert_values(&desc, entity, &mut sql.binder)?;
        require_columns(&desc, columns.is_empty(), "insert")?;
        sql.keyword("insert into ")
            .ident(desc.table_name())
            .keyword(" (")
            .push(Fragment::Columns {
                qualifier: None,
                columns,
            })
            .keyword(") values (")
            .push(Fragment::Values(params))
            .keyword(")");
        Ok(sql.finish())
    }

    /// `delete from T` for the instance's type.
    pub fn truncate<E: Entity>(&self, _entity: &E) -> Result<StatementBuilder> {
        self.truncate_type::<E>()
    }

    /// `delete from T`
    #[tracing::instrument(level = "debug", skip(self), fields(entity = E::NAME))]
    pub fn truncate_type<E: Entity>(&self) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        sql.keyword("delete from ").ident(desc.table_name());
        Ok(sql.finish())
    }

    /// Update the non-null, non-key properties, keyed by the primary key.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn update<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.update_with(entity, Inclusion::NonNull)
    }

    /// Update every property, nulls and keys included, keyed by the primary key.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn update_all<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.update_with(entity, Inclusion::All)
    }

    fn update_with<E: Entity>(&self, entity: &E, inclusion: Inclusion) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let keys_in_set = self.registry.config().primary_keys_in_set;
        let mut sql = Assembly::new();
        let set = assemble::set_columns(&desc, entity, inclusion, keys_in_set, &mut sql.binder)?;
        require_columns(&desc, set.is_empty(), "update")?;
        let predicate = assemble::match_keys(&desc, entity, desc.alias(), &mut sql.binder)?;
        sql.keyword("update ")
            .ident(desc.table_name())
            .keyword(" ")
            .ident(desc.alias())
            .keyword(" set ")
            .push(Fragment::Set(set))
            .keyword("  where ")
            .push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// Set one property to a literal value on the row the instance's key names.
    #[tracing::instrument(level = "debug", skip(self, entity, value), fields(entity = E::NAME))]
    pub fn update_column<E: Entity>(
        &self,
        entity: &E,
        property: &str,
        value: impl Into<Value>,
    ) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let column = desc
            .column(property)
            .ok_or_else(|| Error::unknown_property(desc.type_name(), property))?;
        let mut sql = Assembly::new();
        let param = sql.literal(value.into());
        let predicate = assemble::match_keys(&desc, entity, desc.alias(), &mut sql.binder)?;
        sql.keyword("update ")
            .ident(desc.table_name())
            .keyword(" ")
            .ident(desc.alias())
            .keyword(" set ")
            .push(Fragment::Set(vec![Assignment {
                column: column.column_name(),
                param,
            }]))
            .keyword(" where ")
            .push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// `update T set C=C+:p0 where T.ID=:p1`
    #[tracing::instrument(level = "debug", skip(self, id, amount), fields(entity = E::NAME))]
    pub fn increase_column<E: Entity>(
        &self,
        id: impl Into<Value>,
        property: &str,
        amount: impl Into<Value>,
        increase: bool,
    ) -> Result<StatementBuilder> {
        let op = if increase {
            Arithmetic::Increase
        } else {
            Arithmetic::Decrease
        };
        self.column_arithmetic::<E>(id.into(), property, amount.into(), op)
    }

    /// `update T set C=C-:p0 where T.ID=:p1`
    pub fn decrease_column<E: Entity>(
        &self,
        id: impl Into<Value>,
        property: &str,
        amount: impl Into<Value>,
    ) -> Result<StatementBuilder> {
        self.increase_column::<E>(id, property, amount, false)
    }

    fn column_arithmetic<E: Entity>(
        &self,
        id: Value,
        property: &str,
        amount: Value,
        op: Arithmetic,
    ) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let column = desc
            .column(property)
            .ok_or_else(|| Error::unknown_property(desc.type_name(), property))?;
        check_amount(&amount)?;
        assemble::single_key(&desc)?;

        let mut sql = Assembly::new();
        let param = sql.literal(amount);
        let predicate = assemble::match_literal_key(&desc, id, desc.table_name(), &mut sql.binder)?;
        sql.keyword("update ")
            .ident(desc.table_name())
            .keyword(" set ")
            .push(Fragment::ColumnArithmetic {
                column: column.column_name(),
                op,
                param,
            })
            .keyword(" where ")
            .push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// Delete rows matching every non-null property.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn delete<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.delete_matching(entity, Inclusion::NonNull)
    }

    /// Delete rows matching every property, nulls included.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn delete_by_all<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.delete_matching(entity, Inclusion::All)
    }

    fn delete_matching<E: Entity>(
        &self,
        entity: &E,
        inclusion: Inclusion,
    ) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate =
            assemble::match_columns(&desc, entity, inclusion, desc.table_name(), &mut sql.binder)?;
        Ok(delete_where(&desc, sql, predicate))
    }

    /// Delete the row the instance's primary key names.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn delete_by_id<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate = assemble::match_keys(&desc, entity, desc.table_name(), &mut sql.binder)?;
        Ok(delete_where(&desc, sql, predicate))
    }

    /// `delete from T where T.ID=:p0`
    #[tracing::instrument(level = "debug", skip(self, id), fields(entity = E::NAME))]
    pub fn delete_by_id_value<E: Entity>(&self, id: impl Into<Value>) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate =
            assemble::match_literal_key(&desc, id.into(), desc.table_name(), &mut sql.binder)?;
        Ok(delete_where(&desc, sql, predicate))
    }

    /// Projection of every column for the instance's type, no filter.
    pub fn from<E: Entity>(&self, _entity: &E) -> Result<StatementBuilder> {
        self.from_type::<E>()
    }

    /// Like [`from`](Self::from) with a caller-chosen alias.
    pub fn from_as<E: Entity>(&self, _entity: &E, alias: &str) -> Result<StatementBuilder> {
        self.from_type_as::<E>(alias)
    }

    /// `select A.C1, A.C2 from T A `
    #[tracing::instrument(level = "debug", skip(self), fields(entity = E::NAME))]
    pub fn from_type<E: Entity>(&self) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        select_from(&desc, desc.alias(), &mut sql);
        Ok(sql.finish())
    }

    /// `select a.C1, a.C2 from T a `
    #[tracing::instrument(level = "debug", skip(self), fields(entity = E::NAME))]
    pub fn from_type_as<E: Entity>(&self, alias: &str) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        check_alias(alias)?;
        let mut sql = Assembly::new();
        select_from(&desc, alias, &mut sql);
        Ok(sql.finish())
    }

    /// Select rows matching every non-null property.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn find<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.find_matching(entity, Inclusion::NonNull)
    }

    /// Select rows matching every property, nulls included.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn find_by_all<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.find_matching(entity, Inclusion::All)
    }

    fn find_matching<E: Entity>(&self, entity: &E, inclusion: Inclusion) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate =
            assemble::match_columns(&desc, entity, inclusion, desc.alias(), &mut sql.binder)?;
        select_from(&desc, desc.alias(), &mut sql);
        sql.keyword("where ").push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// Select the row the instance's primary key names.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn find_by_id<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate = assemble::match_keys(&desc, entity, desc.alias(), &mut sql.binder)?;
        select_from(&desc, desc.alias(), &mut sql);
        sql.keyword("where ").push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// `select ... from T A where A.ID=:p0`
    #[tracing::instrument(level = "debug", skip(self, id), fields(entity = E::NAME))]
    pub fn find_by_id_value<E: Entity>(&self, id: impl Into<Value>) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate =
            assemble::match_literal_key(&desc, id.into(), desc.alias(), &mut sql.binder)?;
        select_from(&desc, desc.alias(), &mut sql);
        sql.keyword("where ").push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// `select ... from T A where A.C=:p0`
    #[tracing::instrument(level = "debug", skip(self, value), fields(entity = E::NAME))]
    pub fn find_by_column<E: Entity>(
        &self,
        property: &str,
        value: impl Into<Value>,
    ) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let column = desc
            .column(property)
            .ok_or_else(|| Error::unknown_property(desc.type_name(), property))?;
        let mut sql = Assembly::new();
        let param = sql.literal(value.into());
        select_from(&desc, desc.alias(), &mut sql);
        sql.keyword("where ").push(Fragment::Where(Predicate::single(
            desc.alias(),
            column.column_name(),
            param,
        )));
        Ok(sql.finish())
    }

    /// Select the `C` rows that reference `parent`.
    ///
    /// The child's referencing column is resolved through its declared
    /// foreign keys first, then (when enabled) the `<PARENT_TABLE>_<KEY>`
    /// naming convention. The parent's key value is bound positionally.
    #[tracing::instrument(
        level = "debug",
        skip(self, parent),
        fields(child = C::NAME, parent = P::NAME)
    )]
    pub fn find_foreign<C: Entity, P: Entity>(&self, parent: &P) -> Result<StatementBuilder> {
        let child_desc = self.descriptor::<C>()?;
        let parent_desc = self.descriptor::<P>()?;
        let convention = self.registry.config().foreign_key_convention;
        let fk = child_desc
            .foreign_key_to(&parent_desc, convention)
            .ok_or_else(|| {
                Error::Mapping(MappingError {
                    kind: MappingErrorKind::UnresolvedForeignKey,
                    entity: child_desc.type_name().to_string(),
                    message: format!(
                        "no column of '{}' references table '{}'",
                        child_desc.type_name(),
                        parent_desc.table_name()
                    ),
                })
            })?;
        let key = assemble::read_property(&parent_desc, parent, fk.target)?;
        tracing::debug!(
            column = fk.column.column_name(),
            target = fk.target.column_name(),
            "Resolved foreign key"
        );

        let mut sql = Assembly::new();
        let param = sql.literal(key);
        select_from(&child_desc, child_desc.alias(), &mut sql);
        sql.keyword("where ").push(Fragment::Where(Predicate::single(
            child_desc.alias(),
            fk.column.column_name(),
            param,
        )));
        Ok(sql.finish())
    }

    /// Count rows matching every non-null property.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn count<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.count_matching(entity, Inclusion::NonNull)
    }

    /// Count rows matching every property, nulls included.
    #[tracing::instrument(level = "debug", skip(self, entity), fields(entity = E::NAME))]
    pub fn count_all<E: Entity>(&self, entity: &E) -> Result<StatementBuilder> {
        self.count_matching(entity, Inclusion::All)
    }

    fn count_matching<E: Entity>(&self, entity: &E, inclusion: Inclusion) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        let predicate =
            assemble::match_columns(&desc, entity, inclusion, desc.alias(), &mut sql.binder)?;
        count_from(&desc, &mut sql);
        sql.keyword(" where ").push(Fragment::Where(predicate));
        Ok(sql.finish())
    }

    /// `select count(*) from T A`
    #[tracing::instrument(level = "debug", skip(self), fields(entity = E::NAME))]
    pub fn count_type<E: Entity>(&self) -> Result<StatementBuilder> {
        let desc = self.descriptor::<E>()?;
        let mut sql = Assembly::new();
        count_from(&desc, &mut sql);
        Ok(sql.finish())
    }
}

fn delete_where(desc: &EntityDescriptor, mut sql: Assembly, predicate: Predicate) -> StatementBuilder {
    sql.keyword("delete from ")
        .ident(desc.table_name())
        .keyword(" where ")
        .push(Fragment::Where(predicate));
    sql.finish()
}

/// `select a.C1, a.C2 from T a ` (trailing space included)
fn select_from(desc: &EntityDescriptor, alias: &str, sql: &mut Assembly) {
    sql.keyword("select ")
        .push(Fragment::Columns {
            qualifier: Some(alias.to_string()),
            columns: desc.columns().iter().map(|c| c.column_name()).collect(),
        })
        .keyword(" from ")
        .ident(desc.table_name())
        .keyword(" ")
        .ident(alias)
        .keyword(" ");
}

fn count_from(desc: &EntityDescriptor, sql: &mut Assembly) {
    sql.keyword("select count(*) from ")
        .ident(desc.table_name())
        .keyword(" ")
        .ident(desc.alias());
}

fn check_amount(amount: &Value) -> Result<()> {
    if amount.is_null() {
        return Err(ArgumentError {
            kind: ArgumentErrorKind::NullAmount,
            message: "increase/decrease amount must not be null".to_string(),
        }
        .into());
    }
    if !amount.is_numeric() {
        return Err(ArgumentError {
            kind: ArgumentErrorKind::NonNumericAmount,
            message: format!(
                "increase/decrease amount must be numeric, got {}",
                amount.type_name()
            ),
        }
        .into());
    }
    Ok(())
}

fn require_columns(desc: &EntityDescriptor, empty: bool, operation: &str) -> Result<()> {
    if empty {
        return Err(ArgumentError {
            kind: ArgumentErrorKind::NoColumns,
            message: format!(
                "{operation} of '{}' has no column to write",
                desc.type_name()
            ),
        }
        .into());
    }
    Ok(())
}

fn check_alias(alias: &str) -> Result<()> {
    if is_valid_identifier(alias) {
        Ok(())
    } else {
        Err(ArgumentError {
            kind: ArgumentErrorKind::InvalidAlias,
            message: format!("'{alias}' is not a valid alias"),
        }
        .into())
    }
}
