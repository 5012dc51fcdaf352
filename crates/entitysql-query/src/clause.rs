//! Typed clause fragments and their SQL text.
//!
//! A statement is an ordered list of `Fragment`s. Nothing is concatenated
//! until the statement text is asked for, and rendering is a pure function
//! of the fragment list.

use crate::param::ParamName;

/// Connector between the terms of a grouped predicate.
const AND: &str = " and ";

/// Predicate emitted when a filter was requested but no term qualified.
const TAUTOLOGY: &str = "1=1";

/// `<qualifier>.<column>=:<param>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: &'static str,
    pub param: ParamName,
}

/// How a predicate is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateShape {
    /// `(a=:x and b=:y)`, or `(1=1)` when empty
    Grouped,
    /// `a=:x`, used for a single explicit equality
    Single,
}

/// Equality terms of a WHERE clause, all qualified the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub qualifier: String,
    pub conditions: Vec<Condition>,
    pub shape: PredicateShape,
}

impl Predicate {
    /// Grouped predicate with no terms yet.
    pub fn grouped(qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            conditions: Vec::new(),
            shape: PredicateShape::Grouped,
        }
    }

    /// Single unparenthesized equality.
    pub fn single(qualifier: impl Into<String>, column: &'static str, param: ParamName) -> Self {
        Self {
            qualifier: qualifier.into(),
            conditions: vec![Condition { column, param }],
            shape: PredicateShape::Single,
        }
    }

    /// Add an equality term.
    pub fn push(&mut self, column: &'static str, param: ParamName) {
        self.conditions.push(Condition { column, param });
    }

    /// Whether no term was added (renders as the tautology).
    pub fn is_vacuous(&self) -> bool {
        self.conditions.is_empty()
    }

    fn render(&self, out: &mut String) {
        let grouped = self.shape == PredicateShape::Grouped || self.conditions.len() != 1;
        if grouped {
            out.push('(');
        }
        if self.conditions.is_empty() {
            out.push_str(TAUTOLOGY);
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                out.push_str(AND);
            }
            out.push_str(&self.qualifier);
            out.push('.');
            out.push_str(condition.column);
            out.push_str("=:");
            out.push_str(&condition.param.to_string());
        }
        if grouped {
            out.push(')');
        }
    }
}

/// `<column>=:<param>` inside a SET clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: &'static str,
    pub param: ParamName,
}

/// Sign of a column arithmetic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Increase,
    Decrease,
}

impl Arithmetic {
    fn operator(self) -> char {
        match self {
            Arithmetic::Increase => '+',
            Arithmetic::Decrease => '-',
        }
    }
}

/// One typed piece of statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Fixed SQL text, keywords and separators included verbatim
    Keyword(&'static str),
    /// Table name or alias
    Ident(String),
    /// Comma separated column list, optionally qualified
    Columns {
        qualifier: Option<String>,
        columns: Vec<&'static str>,
    },
    /// Comma separated placeholders of an INSERT
    Values(Vec<ParamName>),
    /// Comma separated SET assignments
    Set(Vec<Assignment>),
    /// `<column>=<column>+:<param>` / `-`
    ColumnArithmetic {
        column: &'static str,
        op: Arithmetic,
        param: ParamName,
    },
    /// WHERE predicate body (the `where` keyword is a separate fragment)
    Where(Predicate),
}

impl Fragment {
    /// Append this fragment's text to `out`.
    pub fn render(&self, out: &mut String) {
        match self {
            Fragment::Keyword(text) => out.push_str(text),
            Fragment::Ident(name) => out.push_str(name),
            Fragment::Columns { qualifier, columns } => {
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if let Some(qualifier) = qualifier {
                        out.push_str(qualifier);
                        out.push('.');
                    }
                    out.push_str(column);
                }
            }
            Fragment::Values(params) => {
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push(':');
                    out.push_str(&param.to_string());
                }
            }
            Fragment::Set(assignments) => {
                for (i, assignment) in assignments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(assignment.column);
                    out.push_str("=:");
                    out.push_str(&assignment.param.to_string());
                }
            }
            Fragment::ColumnArithmetic { column, op, param } => {
                out.push_str(column);
                out.push('=');
                out.push_str(column);
                out.push(op.operator());
                out.push(':');
                out.push_str(&param.to_string());
            }
            Fragment::Where(predicate) => predicate.render(out),
        }
    }
}

/// Render a fragment list into statement text.
pub fn render(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        fragment.render(&mut out);
    }
    out
}
