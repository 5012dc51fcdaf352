//! Generated statements.

use std::fmt;

use crate::clause::{self, Fragment};
use crate::param::{ParamName, ParameterBinder, QueryParameters};

/// A generated statement: its clause fragments plus the bound parameters.
///
/// Immutable once handed out. Rendering the text is deterministic, so
/// `generate_query` may be called any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementBuilder {
    fragments: Vec<Fragment>,
    params: QueryParameters,
}

impl StatementBuilder {
    /// Statement text with `:name` placeholders.
    pub fn generate_query(&self) -> String {
        let sql = clause::render(&self.fragments);
        tracing::trace!(sql = %sql, params = self.params.len(), "Generated statement");
        sql
    }

    /// Bound parameters in allocation order.
    pub fn query_parameters(&self) -> &QueryParameters {
        &self.params
    }

    /// Clause fragments the text is rendered from.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Statement text and parameters, consuming the builder.
    pub fn into_parts(self) -> (String, QueryParameters) {
        (self.generate_query(), self.params)
    }
}

impl fmt::Display for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&clause::render(&self.fragments))
    }
}

/// Statement under construction.
///
/// Dropped without a trace when assembly fails, so a caller only ever sees
/// finished statements.
#[derive(Debug, Default)]
pub(crate) struct Assembly {
    fragments: Vec<Fragment>,
    pub(crate) binder: ParameterBinder,
}

impl Assembly {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn keyword(&mut self, text: &'static str) -> &mut Self {
        self.fragments.push(Fragment::Keyword(text));
        self
    }

    pub(crate) fn ident(&mut self, name: impl Into<String>) -> &mut Self {
        self.fragments.push(Fragment::Ident(name.into()));
        self
    }

    pub(crate) fn push(&mut self, fragment: Fragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    pub(crate) fn literal(&mut self, value: entitysql_core::Value) -> ParamName {
        self.binder.bind_literal(value)
    }

    pub(crate) fn finish(self) -> StatementBuilder {
        StatementBuilder {
            fragments: self.fragments,
            params: self.binder.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Predicate;
    use entitysql_core::Value;

    fn delete_by_literal() -> StatementBuilder {
        let mut assembly = Assembly::new();
        let param = assembly.literal(Value::Int(1));
        assembly
            .keyword("delete from ")
            .ident("GIRL")
            .keyword(" where ")
            .push(Fragment::Where(Predicate::single("GIRL", "ID", param)));
        assembly.finish()
    }

    #[test]
    fn text_and_parameters() {
        let statement = delete_by_literal();
        assert_eq!(statement.generate_query(), "delete from GIRL where GIRL.ID=:p0");
        assert_eq!(statement.query_parameters().names(), vec!["p0"]);
        assert_eq!(statement.fragments().len(), 4);
    }

    #[test]
    fn generation_is_repeatable() {
        let statement = delete_by_literal();
        let first = statement.generate_query();
        assert_eq!(first, statement.generate_query());
        assert_eq!(first, statement.to_string());

        let (sql, params) = statement.into_parts();
        assert_eq!(sql, first);
        assert_eq!(params.get("p0").unwrap().value(), &Value::Int(1));
    }
}
