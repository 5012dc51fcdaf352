//! Entity trait for table-mapped types.
//!
//! The `Entity` trait is the declarative metadata source the registry reads
//! at registration time, plus the one accessor statement assembly needs at
//! generation time: the current value of a property. It is typically derived
//! using `#[derive(Entity)]` from `entitysql-macros`.

use crate::field::FieldInfo;
use crate::value::Value;

/// Trait for types that map to a database table.
///
/// # Example
///
/// ```ignore
/// use entitysql::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "GIRL")]
/// struct BadGirl {
///     #[entity(column = "ID", id)]
///     fooid: Option<i32>,
///     #[entity(column = "NAME")]
///     fooname: Option<String>,
///     #[entity(column = "SPECIALITY")]
///     foospeciality: Option<String>,
/// }
/// ```
pub trait Entity: Sized + Send + Sync + 'static {
    /// Simple type name, e.g. `BadGirl`.
    const NAME: &'static str;

    /// The name of the database table.
    const TABLE_NAME: &'static str;

    /// Declared alias. When `None` the registry derives one from `NAME`.
    const ALIAS: Option<&'static str> = None;

    /// Field metadata for all columns, in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Current value of a property.
    ///
    /// Returns `None` when the entity has no such property and
    /// `Some(Value::Null)` when the property exists but holds no value.
    fn property_value(&self, property: &str) -> Option<Value>;
}
