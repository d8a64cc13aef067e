//! Procedural macros for the Northwind association sample
//!
//! This crate provides macros to reduce boilerplate in the entity model:
//!
//! - `#[derive(Entity)]` - Generate table metadata and row decoding for an entity

use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Field, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
    parse_macro_input,
};

/// Derive table metadata and row decoding for a mapped entity.
///
/// # Usage
///
/// ```ignore
/// #[derive(Entity, Clone, Debug)]
/// #[entity(table = "Order Details")]
/// pub struct OrderDetail {
///     #[primary_key]
///     #[column(name = "OrderID")]
///     pub order_id: i64,
///
///     #[primary_key]
///     #[column(name = "ProductID")]
///     pub product_id: i64,
///
///     pub discount: f64,
/// }
/// ```
///
/// # Generated Code
///
/// - `DatabaseEntity` with the table name, primary key columns and key values
/// - `DatabaseSchema` with one `ColumnDef` per field
/// - `FromSqlRow` decoding every field by column name
///
/// Column names default to the PascalCase field name. SQL types are inferred
/// from the Rust type (`Option<T>` marks the column nullable) and can be
/// overridden with `#[column(sql_type = "...")]`.
#[proc_macro_derive(Entity, attributes(entity, primary_key, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_entity(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// One mapped struct field
struct EntityField {
    ident: Ident,
    column: String,
    sql_type: String,
    nullable: bool,
    primary_key: bool,
}

fn expand_entity(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let table = parse_table_name(input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Entity can only be derived for structs",
            ));
        }
    };

    let entity_fields = fields
        .iter()
        .map(parse_field)
        .collect::<syn::Result<Vec<_>>>()?;

    let primary: Vec<&EntityField> = entity_fields.iter().filter(|f| f.primary_key).collect();
    if primary.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "Entity requires at least one #[primary_key] field",
        ));
    }

    let pk_columns = primary.iter().map(|f| &f.column);
    let pk_idents = primary.iter().map(|f| &f.ident);
    let column_names: Vec<&String> = entity_fields.iter().map(|f| &f.column).collect();
    let idents: Vec<&Ident> = entity_fields.iter().map(|f| &f.ident).collect();

    let column_defs = entity_fields.iter().map(|f| {
        let column = &f.column;
        let sql_type = &f.sql_type;
        let nullable = f.nullable;
        let is_primary_key = f.primary_key;
        quote! {
            crate::orm::ColumnDef {
                name: #column,
                sql_type: #sql_type,
                nullable: #nullable,
                is_primary_key: #is_primary_key,
                default: ::std::option::Option::None,
            }
        }
    });

    let output = quote! {
        impl crate::orm::DatabaseEntity for #name {
            const TABLE_NAME: &'static str = #table;
            const PRIMARY_KEY: &'static [&'static str] = &[#(#pk_columns),*];

            fn primary_key_values(&self) -> ::std::vec::Vec<crate::orm::SqlValue> {
                ::std::vec![
                    #(crate::orm::SqlValue::from(::std::clone::Clone::clone(&self.#pk_idents))),*
                ]
            }
        }

        impl crate::orm::DatabaseSchema for #name {
            const COLUMNS: &'static [crate::orm::ColumnDef] = &[#(#column_defs),*];
        }

        impl crate::orm::FromSqlRow for #name {
            fn from_row(
                row: &::sqlx::sqlite::SqliteRow,
            ) -> ::std::result::Result<Self, ::sqlx::Error> {
                use ::sqlx::Row as _;

                ::std::result::Result::Ok(Self {
                    #(#idents: row.try_get(#column_names)?),*
                })
            }
        }
    };

    Ok(output)
}

/// Read `#[entity(table = "...")]`, defaulting to the pluralized struct name.
fn parse_table_name(input: &DeriveInput) -> syn::Result<String> {
    let mut table = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute"))
            }
        })?;
    }

    Ok(table.unwrap_or_else(|| format!("{}s", input.ident)))
}

fn parse_field(field: &Field) -> syn::Result<EntityField> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

    let mut column = None;
    let mut sql_type = None;
    let mut primary_key = false;

    for attr in &field.attrs {
        if attr.path().is_ident("primary_key") {
            primary_key = true;
        } else if attr.path().is_ident("column") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    column = Some(value.value());
                    Ok(())
                } else if meta.path.is_ident("sql_type") {
                    let value: LitStr = meta.value()?.parse()?;
                    sql_type = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported column attribute"))
                }
            })?;
        }
    }

    let (inner, nullable) = match option_inner(&field.ty) {
        Some(inner) => (inner, true),
        None => (&field.ty, false),
    };

    Ok(EntityField {
        column: column.unwrap_or_else(|| ident.to_string().to_case(Case::Pascal)),
        sql_type: sql_type.unwrap_or_else(|| infer_sql_type(inner).to_string()),
        ident,
        nullable,
        primary_key,
    })
}

/// Unwrap `Option<T>` to `T`
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// SQLite column type for a Rust field type
fn infer_sql_type(ty: &Type) -> &'static str {
    let Type::Path(type_path) = ty else {
        return "TEXT";
    };
    let Some(segment) = type_path.path.segments.last() else {
        return "TEXT";
    };

    match segment.ident.to_string().as_str() {
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "bool" => "INTEGER",
        "f32" | "f64" => "REAL",
        "NaiveDateTime" | "NaiveDate" | "DateTime" => "DATETIME",
        "Vec" => "BLOB",
        _ => "TEXT",
    }
}
