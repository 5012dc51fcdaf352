//! Procedural macros for EntitySQL.
//!
//! `entitysql-macros` is the **compile-time mapping layer**. `#[derive(Entity)]`
//! turns a plain struct into an `entitysql_core::Entity`: a static column
//! table plus a property accessor the statement generator reads values
//! through.
//!
//! The macro is used by application crates via the `entitysql` facade.

use proc_macro::TokenStream;
use syn::ext::IdentExt;

mod infer;
mod parse;
mod validate;

use parse::{EntityDef, parse_entity};

/// Derive macro for the `Entity` trait.
///
/// # Attributes
///
/// Struct level:
/// - `#[entity(table = "NAME")]` - Table name (defaults to the struct name in UPPER_SNAKE case)
/// - `#[entity(alias = "a")]` - Alias used to qualify columns (defaults to `<Struct>_`)
///
/// Field level:
/// - `#[entity(id)]` / `#[entity(primary_key)]` - Mark field as (part of) the primary key
/// - `#[entity(column = "NAME")]` - Column name (defaults to the field name in UPPER_SNAKE case)
/// - `#[entity(sql_type = "VARCHAR(40)")]` - Type tag for bound values (inferred otherwise)
/// - `#[entity(foreign_key = "TABLE.COLUMN")]` - Column references another table
/// - `#[entity(skip)]` - Field is not mapped
///
/// Every mapped field type must implement `Clone` and `Into<entitysql_core::Value>`;
/// `Option<T>` fields map `None` to SQL NULL.
///
/// # Example
///
/// ```ignore
/// use entitysql::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "BOY")]
/// struct BadBoy {
///     #[entity(id, column = "ID")]
///     ajdi: Option<i32>,
///
///     #[entity(column = "GIRL_ID", foreign_key = "GIRL.ID")]
///     cool_girl_id: Option<i32>,
///
///     #[entity(column = "NAME")]
///     nejm: Option<String>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let entity = match parse_entity(&input) {
        Ok(e) => e,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_entity(&entity) {
        return e.to_compile_error().into();
    }

    generate_entity_impl(&entity).into()
}

/// Generate the Entity trait implementation from a parsed definition.
fn generate_entity_impl(entity: &EntityDef) -> proc_macro2::TokenStream {
    let name = &entity.name;
    let name_lit = name.unraw().to_string();
    let table_name = &entity.table_name;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();

    let alias = match &entity.alias {
        Some(alias) => quote::quote! { Some(#alias) },
        None => quote::quote! { None },
    };

    let field_infos = generate_field_infos(entity);
    let value_arms = generate_value_arms(entity);

    quote::quote! {
        impl #impl_generics entitysql_core::Entity for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_lit;
            const TABLE_NAME: &'static str = #table_name;
            const ALIAS: Option<&'static str> = #alias;

            fn fields() -> &'static [entitysql_core::FieldInfo] {
                static FIELDS: &[entitysql_core::FieldInfo] = &[
                    #field_infos
                ];
                FIELDS
            }

            fn property_value(&self, property: &str) -> Option<entitysql_core::Value> {
                match property {
                    #value_arms
                    _ => None,
                }
            }
        }
    }
}

/// Static `FieldInfo` entries, one per mapped field, in declaration order.
fn generate_field_infos(entity: &EntityDef) -> proc_macro2::TokenStream {
    let mut field_ts = Vec::new();

    for field in &entity.fields {
        let property = field.name.unraw().to_string();
        let column_name = &field.column_name;
        let primary_key = field.primary_key;

        let sql_type_ts = match &field.sql_type {
            Some(explicit) => {
                let tag = infer::parse_sql_type_attr(explicit);
                quote::quote! { Some(#tag) }
            }
            None => infer::infer_sql_type(&field.ty),
        };

        let fk_ts = match &field.foreign_key {
            Some(fk) => quote::quote! { Some(#fk) },
            None => quote::quote! { None },
        };

        field_ts.push(quote::quote! {
            entitysql_core::FieldInfo {
                name: #property,
                column_name: #column_name,
                sql_type: #sql_type_ts,
                primary_key: #primary_key,
                foreign_key: #fk_ts,
            }
        });
    }

    quote::quote! { #(#field_ts),* }
}

/// `"property" => Some(Value::from(self.field.clone())),` per mapped field.
fn generate_value_arms(entity: &EntityDef) -> proc_macro2::TokenStream {
    let arms = entity.fields.iter().map(|field| {
        let ident = &field.name;
        let property = ident.unraw().to_string();
        quote::quote! {
            #property => Some(entitysql_core::Value::from(
                ::core::clone::Clone::clone(&self.#ident)
            )),
        }
    });
    quote::quote! { #(#arms)* }
}
