//! Compile-time checks for `#[derive(Entity)]`.
//!
//! The registry repeats these checks at runtime for hand-written `Entity`
//! impls; catching them here points the error at the offending attribute.

use std::collections::HashSet;

use proc_macro2::Span;
use syn::Error;

use crate::parse::EntityDef;

/// Validate a parsed entity, reporting every problem found at once.
pub fn validate_entity(entity: &EntityDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    if entity.fields.is_empty() {
        errors.push(Error::new(
            entity.name.span(),
            "Entity struct must have at least one mapped field",
        ));
    }
    check_identifier("table name", &entity.table_name, entity.table_span, &mut errors);
    if let Some(alias) = &entity.alias {
        check_identifier("alias", alias, entity.name.span(), &mut errors);
    }

    let mut seen_columns: HashSet<String> = HashSet::new();
    for field in &entity.fields {
        check_identifier("column name", &field.column_name, field.span, &mut errors);
        if !seen_columns.insert(field.column_name.to_uppercase()) {
            errors.push(Error::new(
                field.span,
                format!(
                    "duplicate column name '{}'; every field must map to a distinct column",
                    field.column_name
                ),
            ));
        }
        if let Some(reference) = &field.foreign_key {
            check_foreign_key(reference, field.span, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        let mut combined = errors.remove(0);
        for err in errors {
            combined.combine(err);
        }
        Err(combined)
    }
}

/// Same rule the registry applies: a letter or `_`, then letters, digits,
/// `_` or `$`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

fn check_identifier(what: &str, name: &str, span: Span, errors: &mut Vec<Error>) {
    if !is_identifier(name) {
        errors.push(Error::new(
            span,
            format!(
                "{what} '{name}' is not a valid SQL identifier; \
                 use letters, digits and underscores, starting with a letter or underscore"
            ),
        ));
    }
}

fn check_foreign_key(reference: &str, span: Span, errors: &mut Vec<Error>) {
    let valid = reference
        .split_once('.')
        .is_some_and(|(table, column)| is_identifier(table) && is_identifier(column));
    if !valid {
        errors.push(Error::new(
            span,
            format!("foreign_key '{reference}' must have the form \"TABLE.COLUMN\""),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_entity;
    use syn::{DeriveInput, parse_quote};

    fn validate(input: &DeriveInput) -> Result<(), Error> {
        validate_entity(&parse_entity(input).unwrap())
    }

    #[test]
    fn test_valid_entity() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "BOY")]
            struct BadBoy {
                #[entity(id, column = "ID")]
                ajdi: Option<i32>,
                #[entity(column = "GIRL_ID", foreign_key = "GIRL.ID")]
                cool_girl_id: Option<i32>,
            }
        };
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn test_duplicate_column() {
        let input: DeriveInput = parse_quote! {
            struct Girl {
                #[entity(column = "NAME")]
                name: Option<String>,
                #[entity(column = "name")]
                nick: Option<String>,
            }
        };
        let err = validate(&input).unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn test_bad_identifiers() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "GIRL; drop", alias = "1g")]
            struct Girl {
                id: Option<i32>,
            }
        };
        let messages: Vec<String> = validate(&input)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("table name"));
        assert!(messages[1].contains("alias"));
    }

    #[test]
    fn test_malformed_foreign_key() {
        let input: DeriveInput = parse_quote! {
            struct Boy {
                #[entity(foreign_key = "GIRL")]
                girl_id: Option<i32>,
            }
        };
        let err = validate(&input).unwrap_err();
        assert!(err.to_string().contains("TABLE.COLUMN"));
    }

    #[test]
    fn test_identifier_rule() {
        assert!(is_identifier("GIRL_ID"));
        assert!(is_identifier("_x$1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9A"));
        assert!(!is_identifier("A B"));
    }
}
