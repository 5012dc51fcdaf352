//! Parsing of `#[derive(Entity)]` input and `#[entity(...)]` attributes.

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Ident, Lit, Result, Type};

/// Parsed entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct name
    pub name: Ident,
    /// Table name (explicit or derived)
    pub table_name: String,
    /// Span of the `table = "..."` literal, or of the struct name
    pub table_span: Span,
    /// Alias override
    pub alias: Option<String>,
    /// Generics on the struct
    pub generics: syn::Generics,
    /// Mapped fields, `skip` fields already dropped
    pub fields: Vec<FieldDef>,
}

/// Parsed field definition.
#[derive(Debug)]
pub struct FieldDef {
    /// Field name in Rust
    pub name: Ident,
    /// Column name (explicit or derived)
    pub column_name: String,
    /// Rust type of the field
    pub ty: Type,
    /// Explicit `sql_type = "..."`
    pub sql_type: Option<String>,
    /// `id` / `primary_key`
    pub primary_key: bool,
    /// `foreign_key = "TABLE.COLUMN"`
    pub foreign_key: Option<String>,
    /// Span of the field for error reporting
    pub span: Span,
}

/// Parse a derive input into an `EntityDef`.
pub fn parse_entity(input: &DeriveInput) -> Result<EntityDef> {
    let name = input.ident.clone();

    let StructAttrs {
        table_name,
        table_span,
        alias,
    } = parse_struct_attrs(&input.attrs, &name)?;

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not unions",
            ));
        }
    };

    Ok(EntityDef {
        name,
        table_name,
        table_span,
        alias,
        generics: input.generics.clone(),
        fields,
    })
}

struct StructAttrs {
    table_name: String,
    table_span: Span,
    alias: Option<String>,
}

/// Parse struct-level `#[entity(...)]` attributes.
///
/// Supported keys:
/// - `table = "NAME"` (defaults to the struct name in UPPER_SNAKE case)
/// - `alias = "a"` (defaults to the struct name plus the configured suffix)
fn parse_struct_attrs(attrs: &[Attribute], struct_name: &Ident) -> Result<StructAttrs> {
    let mut table: Option<(String, Span)> = None;
    let mut alias: Option<String> = None;

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit = string_value(&meta, "table name")?;
                table = Some((lit.value(), lit.span()));
            } else if meta.path.is_ident("alias") {
                alias = Some(string_value(&meta, "alias")?.value());
            } else {
                return Err(meta.error(format!(
                    "unknown entity attribute `{}`; expected `table` or `alias`",
                    meta.path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string)
                )));
            }
            Ok(())
        })?;
    }

    let (table_name, table_span) = table.unwrap_or_else(|| {
        (
            to_upper_snake_case(&struct_name.to_string()),
            struct_name.span(),
        )
    });

    Ok(StructAttrs {
        table_name,
        table_span,
        alias,
    })
}

fn parse_fields(fields: &Fields) -> Result<Vec<FieldDef>> {
    let named = match fields {
        Fields::Named(named) => &named.named,
        Fields::Unnamed(_) => {
            return Err(Error::new(
                Span::call_site(),
                "Entity requires a struct with named fields, not a tuple struct",
            ));
        }
        Fields::Unit => {
            return Err(Error::new(
                Span::call_site(),
                "Entity requires a struct with fields, not a unit struct",
            ));
        }
    };

    let mut parsed = Vec::with_capacity(named.len());
    for field in named {
        if let Some(def) = parse_field(field)? {
            parsed.push(def);
        }
    }
    Ok(parsed)
}

/// Parse one field; `None` when it is marked `skip`.
fn parse_field(field: &Field) -> Result<Option<FieldDef>> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let attrs = parse_field_attrs(&field.attrs)?;
    if attrs.skip {
        return Ok(None);
    }

    let column_name = attrs
        .column
        .unwrap_or_else(|| to_upper_snake_case(&name.unraw().to_string()));

    Ok(Some(FieldDef {
        span: name.span(),
        name,
        column_name,
        ty: field.ty.clone(),
        sql_type: attrs.sql_type,
        primary_key: attrs.primary_key,
        foreign_key: attrs.foreign_key,
    }))
}

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    sql_type: Option<String>,
    primary_key: bool,
    foreign_key: Option<String>,
    skip: bool,
}

/// Parse all `#[entity(...)]` attributes on a field.
fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("id") || path.is_ident("primary_key") {
                result.primary_key = true;
            } else if path.is_ident("skip") {
                result.skip = true;
            } else if path.is_ident("column") {
                result.column = Some(string_value(&meta, "column name")?.value());
            } else if path.is_ident("sql_type") {
                result.sql_type = Some(string_value(&meta, "sql_type")?.value());
            } else if path.is_ident("foreign_key") {
                result.foreign_key = Some(string_value(&meta, "foreign_key")?.value());
            } else {
                return Err(meta.error(
                    "unknown entity field attribute; expected one of \
                     `id`, `primary_key`, `column`, `sql_type`, `foreign_key`, `skip`",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn string_value(meta: &syn::meta::ParseNestedMeta<'_>, what: &str) -> Result<syn::LitStr> {
    let value: Lit = meta.value()?.parse()?;
    match value {
        Lit::Str(lit) => Ok(lit),
        other => Err(Error::new_spanned(
            other,
            format!("expected string literal for {what}"),
        )),
    }
}

/// Convert `PascalCase` or `snake_case` to `UPPER_SNAKE_CASE`.
///
/// Examples:
/// - `Girl` -> `GIRL`
/// - `BadGirl` -> `BAD_GIRL`
/// - `girl_id` -> `GIRL_ID`
/// - `HTTPServer` -> `HTTP_SERVER`
pub fn to_upper_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(char::is_lowercase));
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.extend(c.to_uppercase());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_to_upper_snake_case() {
        assert_eq!(to_upper_snake_case("Girl"), "GIRL");
        assert_eq!(to_upper_snake_case("BadGirl"), "BAD_GIRL");
        assert_eq!(to_upper_snake_case("girl_id"), "GIRL_ID");
        assert_eq!(to_upper_snake_case("HTTPServer"), "HTTP_SERVER");
        assert_eq!(to_upper_snake_case("ID"), "ID");
    }

    #[test]
    fn test_defaults() {
        let input: DeriveInput = parse_quote! {
            struct BadBoy {
                #[entity(id)]
                ajdi: Option<i32>,
                cool_girl_id: Option<i32>,
            }
        };
        let def = parse_entity(&input).unwrap();
        assert_eq!(def.table_name, "BAD_BOY");
        assert!(def.alias.is_none());
        assert_eq!(def.fields[0].column_name, "AJDI");
        assert!(def.fields[0].primary_key);
        assert_eq!(def.fields[1].column_name, "COOL_GIRL_ID");
    }

    #[test]
    fn test_explicit_attributes() {
        let input: DeriveInput = parse_quote! {
            #[entity(table = "BOY", alias = "b")]
            struct BadBoy {
                #[entity(primary_key, column = "ID", sql_type = "INTEGER")]
                ajdi: Option<i32>,
                #[entity(column = "GIRL_ID", foreign_key = "GIRL.ID")]
                cool_girl_id: Option<i32>,
                #[entity(skip)]
                cache: Vec<String>,
            }
        };
        let def = parse_entity(&input).unwrap();
        assert_eq!(def.table_name, "BOY");
        assert_eq!(def.alias.as_deref(), Some("b"));
        assert_eq!(def.fields.len(), 2);
        assert_eq!(def.fields[0].sql_type.as_deref(), Some("INTEGER"));
        assert_eq!(def.fields[1].foreign_key.as_deref(), Some("GIRL.ID"));
        assert_eq!(def.fields.iter().filter(|f| f.primary_key).count(), 1);
    }

    #[test]
    fn test_rejects_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i32, i32);
        };
        assert!(parse_entity(&input).is_err());
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let input: DeriveInput = parse_quote! {
            struct Girl {
                #[entity(nullable)]
                name: Option<String>,
            }
        };
        assert!(parse_entity(&input).is_err());
    }
}
