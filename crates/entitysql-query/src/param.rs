//! Parameter names, bound values and the per-statement binder.

use std::fmt;

use entitysql_core::{ColumnDescriptor, EntityDescriptor, SqlType, Value};
use serde::Serialize;

/// Name of a bound parameter.
///
/// Values read off an entity instance are named after the entity and the
/// property they came from; literals passed by the caller are numbered in
/// the order the statement consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamName {
    /// `<prefix>.<property>`, e.g. `badGirl.fooid`
    Named { prefix: String, property: String },
    /// `p<index>`, e.g. `p0`
    Positional(usize),
}

impl ParamName {
    /// Entity-qualified name for a property of `descriptor`.
    pub fn named(descriptor: &EntityDescriptor, column: &ColumnDescriptor) -> Self {
        ParamName::Named {
            prefix: descriptor.param_prefix().to_string(),
            property: column.property_name().to_string(),
        }
    }

    /// Whether this is a positional (`pN`) name.
    pub fn is_positional(&self) -> bool {
        matches!(self, ParamName::Positional(_))
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamName::Named { prefix, property } => write!(f, "{prefix}.{property}"),
            ParamName::Positional(index) => write!(f, "p{index}"),
        }
    }
}

impl Serialize for ParamName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One bound parameter: its name, value and optional type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterValue {
    name: ParamName,
    value: Value,
    sql_type: Option<SqlType>,
}

impl ParameterValue {
    /// Parameter name.
    pub fn name(&self) -> &ParamName {
        &self.name
    }

    /// Bound value; may be `Value::Null`.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Declared type tag, if the value came from a tagged column.
    pub fn sql_type(&self) -> Option<SqlType> {
        self.sql_type
    }
}

/// Parameters of one statement, in allocation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryParameters {
    entries: Vec<ParameterValue>,
}

impl QueryParameters {
    /// Look up a parameter by its rendered name (`girl.id`, `p0`).
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries.iter().find(|p| p.name.to_string() == name)
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in allocation order.
    pub fn iter(&self) -> std::slice::Iter<'_, ParameterValue> {
        self.entries.iter()
    }

    /// Rendered names in allocation order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|p| p.name.to_string()).collect()
    }

    /// Values in allocation order.
    pub fn values(&self) -> Vec<&Value> {
        self.entries.iter().map(|p| &p.value).collect()
    }

    /// JSON form of the binding set, for handing to an executor.
    pub fn to_json(&self) -> entitysql_core::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<'a> IntoIterator for &'a QueryParameters {
    type Item = &'a ParameterValue;
    type IntoIter = std::slice::Iter<'a, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Allocates parameter names while one statement is assembled.
///
/// Positional names are handed out as `p0, p1, ...` in call order. Binding
/// the same entity property twice returns the existing name and keeps the
/// first value.
#[derive(Debug, Default)]
pub struct ParameterBinder {
    params: QueryParameters,
    next_positional: usize,
}

impl ParameterBinder {
    /// Create an empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value read off an instance of `descriptor`.
    pub fn bind_property(
        &mut self,
        descriptor: &EntityDescriptor,
        column: &ColumnDescriptor,
        value: Value,
    ) -> ParamName {
        let name = ParamName::named(descriptor, column);
        if !self.params.entries.iter().any(|p| p.name == name) {
            self.params.entries.push(ParameterValue {
                name: name.clone(),
                value,
                sql_type: column.sql_type(),
            });
        }
        name
    }

    /// Bind a caller-supplied literal under the next positional name.
    pub fn bind_literal(&mut self, value: Value) -> ParamName {
        let name = ParamName::Positional(self.next_positional);
        self.next_positional += 1;
        self.params.entries.push(ParameterValue {
            name: name.clone(),
            value,
            sql_type: None,
        });
        name
    }

    /// Finish binding and hand over the parameters.
    pub fn finish(self) -> QueryParameters {
        self.params
    }
}
