//! SQL type tags inferred from Rust field types.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// Infer the type tag of a field from its Rust type.
///
/// `Option<T>` is looked through. Types the table below does not know yield
/// `None`, so the bound parameter carries no tag at all.
pub fn infer_sql_type(ty: &Type) -> TokenStream {
    let inner_ty = unwrap_option_type(ty);

    let tag = match type_to_string(inner_ty).as_str() {
        "bool" => quote! { entitysql_core::SqlType::Boolean },

        "i8" => quote! { entitysql_core::SqlType::TinyInt },
        "i16" | "u8" => quote! { entitysql_core::SqlType::SmallInt },
        "i32" | "u16" => quote! { entitysql_core::SqlType::Integer },
        "i64" | "u32" => quote! { entitysql_core::SqlType::BigInt },

        "f32" => quote! { entitysql_core::SqlType::Real },
        "f64" => quote! { entitysql_core::SqlType::Double },

        "String" | "&str" | "str" => quote! { entitysql_core::SqlType::Text },

        "Vec<u8>" => quote! { entitysql_core::SqlType::Blob },

        "[u8;16]" => quote! { entitysql_core::SqlType::Uuid },

        "serde_json::Value" => quote! { entitysql_core::SqlType::Json },

        _ => return quote! { None },
    };
    quote! { Some(#tag) }
}

/// Parse an explicit `sql_type = "..."` attribute into a type tag.
///
/// Accepts the usual spellings (`INT`, `VARCHAR(40)`, `DECIMAL(10,2)`, ...);
/// anything else becomes `SqlType::Custom` with the text as written.
pub fn parse_sql_type_attr(sql_type: &str) -> TokenStream {
    let upper = sql_type.to_uppercase();
    let trimmed = upper.trim();

    if let Some(len) = sized(trimmed, "VARCHAR(") {
        return quote! { entitysql_core::SqlType::VarChar(#len) };
    }
    if let Some(len) = sized(trimmed, "CHAR(") {
        return quote! { entitysql_core::SqlType::Char(#len) };
    }
    for prefix in ["DECIMAL(", "NUMERIC("] {
        if let Some((precision, scale)) = precision_scale(trimmed, prefix) {
            return quote! {
                entitysql_core::SqlType::Decimal { precision: #precision, scale: #scale }
            };
        }
    }

    match trimmed {
        "TINYINT" => quote! { entitysql_core::SqlType::TinyInt },
        "SMALLINT" | "INT2" => quote! { entitysql_core::SqlType::SmallInt },
        "INTEGER" | "INT" | "INT4" => quote! { entitysql_core::SqlType::Integer },
        "BIGINT" | "INT8" => quote! { entitysql_core::SqlType::BigInt },

        "REAL" | "FLOAT4" => quote! { entitysql_core::SqlType::Real },
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" | "FLOAT" => {
            quote! { entitysql_core::SqlType::Double }
        }

        "DECIMAL" | "NUMERIC" => {
            quote! { entitysql_core::SqlType::Decimal { precision: 38, scale: 18 } }
        }

        "BOOLEAN" | "BOOL" => quote! { entitysql_core::SqlType::Boolean },

        "TEXT" => quote! { entitysql_core::SqlType::Text },
        "VARCHAR" => quote! { entitysql_core::SqlType::VarChar(255) },
        "CHAR" => quote! { entitysql_core::SqlType::Char(1) },

        "BLOB" | "BYTEA" => quote! { entitysql_core::SqlType::Blob },

        "DATE" => quote! { entitysql_core::SqlType::Date },
        "TIME" => quote! { entitysql_core::SqlType::Time },
        "TIMESTAMP" | "DATETIME" => quote! { entitysql_core::SqlType::Timestamp },

        "UUID" => quote! { entitysql_core::SqlType::Uuid },
        "JSON" | "JSONB" => quote! { entitysql_core::SqlType::Json },

        _ => quote! { entitysql_core::SqlType::Custom(#sql_type) },
    }
}

fn sized(text: &str, prefix: &str) -> Option<u32> {
    text.strip_prefix(prefix)?
        .strip_suffix(')')?
        .trim()
        .parse()
        .ok()
}

fn precision_scale(text: &str, prefix: &str) -> Option<(u8, u8)> {
    let params = text.strip_prefix(prefix)?.strip_suffix(')')?;
    let (p, s) = params.split_once(',')?;
    Some((p.trim().parse().ok()?, s.trim().parse().ok()?))
}

/// Unwrap `Option<T>` to `T`, or return the type unchanged.
pub fn unwrap_option_type(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return inner;
                    }
                }
            }
        }
    }
    ty
}

fn type_to_string(ty: &Type) -> String {
    use quote::ToTokens;
    ty.to_token_stream().to_string().replace(' ', "")
}
