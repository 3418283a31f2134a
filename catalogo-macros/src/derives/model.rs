use heck::ToSnakeCase;
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

use crate::{
    attributes::{FromAttributes, ItemAttrs, RootAttrs},
    error::Error,
    util::{parse_struct_fields, DeriveMacro, Field},
};

const ID_TYPES: [&str; 2] = ["i32", "i64"];
const DB_TYPES: [&str; 8] = [
    "SmallInt", "Integer", "BigInt", "Numeric", "Float", "Double", "Text", "Bool",
];

pub struct DeriveModel {
    attrs: RootAttrs,
    fields: Vec<Field<ItemAttrs>>,
    ident: syn::Ident,
}

impl DeriveModel {
    fn table_name(&self) -> String {
        self.attrs
            .table
            .as_ref()
            .map(syn::LitStr::value)
            .unwrap_or_else(|| self.ident.to_string().to_snake_case())
    }

    fn expand_impl_database_schema(&self) -> syn::Result<TokenStream> {
        let Self { fields, ident, .. } = self;

        let table_name = self.table_name();

        if !fields.iter().any(|field| field.ident() == "id") {
            return Err(syn::Error::new(
                ident.span(),
                "database models must have an `id: i64` column",
            ));
        }

        let columns = fields
            .iter()
            .map(Self::expand_column)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(quote!(
            impl ::catalogo::database::IntoDatabaseSchema for #ident {
                fn database_schema() -> ::catalogo::database::DatabaseSchema {
                    ::catalogo::database::DatabaseSchema {
                        table_name: #table_name.to_string(),
                        columns: vec![ #( #columns, )* ],
                    }
                }
            }
        ))
    }

    fn expand_column(field: &Field<ItemAttrs>) -> syn::Result<TokenStream> {
        let name = field.name();
        let attrs = &field.attrs;
        let ty_span = field.field.ty.span();
        let is_id = name == "id";

        if is_id {
            Self::verify_id(field)?;
        }

        let mut ty = if let Some(db_type) = &attrs.db_type {
            Self::parse_db_type(db_type)?
        } else if let Some(db_type) = Self::rust_to_db_type(&field.field.ty) {
            db_type
        } else {
            return Err(syn::Error::new(ty_span, "type is not supported"));
        };
        let db_type_is_text = ty.to_string().ends_with(":: Text");
        if let Some(max_len) = &attrs.max_len {
            if !db_type_is_text {
                return Err(syn::Error::new(
                    max_len.span(),
                    "max_len can only be used on varchar & char types",
                ));
            }
            ty = quote!(#ty(Some(#max_len)));
        } else if db_type_is_text {
            ty = quote!(#ty(None));
        }

        let nullable = Self::is_type_option(&field.field.ty);

        let default = if let Some(default_raw) = &attrs.default_raw {
            quote!(Some(::catalogo::database::DatabaseDefault::Raw(#default_raw.to_string())))
        } else if let Some(default) = &attrs.default {
            if let Some(db_default) = Self::lit_to_db_default(default) {
                quote!(Some(#db_default))
            } else {
                return Err(syn::Error::new(
                    default.span(),
                    "default not supported: use a primitive type only",
                ));
            }
        } else {
            quote!(None)
        };

        let unique = attrs.unique.is_some();
        let non_blank = attrs.non_blank.is_some();
        if non_blank && !db_type_is_text {
            return Err(syn::Error::new(
                ty_span,
                "non_blank can only be used on varchar & char types",
            ));
        }
        let index = attrs.index.is_some();

        Ok(quote!(
            ::catalogo::database::DatabaseColumn {
                name: #name.to_string(),
                ty: #ty,
                nullable: #nullable,
                default: #default,
                unique: #unique,
                non_blank: #non_blank,
                index: #index,
                identity: #is_id,
                primary_key: #is_id,
            }
        ))
    }

    fn verify_id(field: &Field<ItemAttrs>) -> syn::Result<()> {
        let span = field.field.ty.span();
        if !ID_TYPES.contains(&field.ty_string().as_str()) {
            return Err(syn::Error::new(span, "`id` must be of type `i64` or `i32`"));
        }

        let attrs = &field.attrs;
        let forbidden: [(bool, &str); 6] = [
            (
                attrs.default.is_some() || attrs.default_raw.is_some(),
                "`id` cannot have a custom default",
            ),
            (attrs.unique.is_some(), "`id` cannot be marked as unique"),
            (attrs.index.is_some(), "`id` is already indexed as the primary key"),
            (attrs.max_len.is_some(), "`id` cannot have a max_len"),
            (attrs.non_blank.is_some(), "`id` cannot be marked non_blank"),
            (attrs.db_type.is_some(), "`id` cannot override its db_type"),
        ];
        match forbidden.iter().find(|(set, _)| *set) {
            Some((_, message)) => Err(syn::Error::new(span, message)),
            None => Ok(()),
        }
    }

    /// Accepts `"Variant"` or `"Variant(args)"` naming a `DatabaseType`.
    fn parse_db_type(db_type: &syn::LitStr) -> syn::Result<TokenStream> {
        let value = db_type.value();
        let variant = value.split('(').next().unwrap_or_default().trim();
        if !DB_TYPES.contains(&variant) {
            return Err(syn::Error::new(
                db_type.span(),
                format!("unknown db_type, expected one of {}", DB_TYPES.join(", ")),
            ));
        }
        match value.parse::<TokenStream>() {
            Ok(tokens) => Ok(quote!(::catalogo::database::DatabaseType::#tokens)),
            Err(_) => Err(syn::Error::new(db_type.span(), "invalid db_type")),
        }
    }

    fn expand_impl_field_values(&self) -> TokenStream {
        let ident = &self.ident;
        let values = self.fields.iter().map(|field| {
            let name = field.name();
            let field_ident = field.ident();
            quote!((
                #name,
                ::catalogo::database::Value::from(::std::clone::Clone::clone(&self.#field_ident)),
            ))
        });

        quote!(
            impl ::catalogo::database::FieldValues for #ident {
                fn field_values(
                    &self,
                ) -> ::std::vec::Vec<(&'static str, ::catalogo::database::Value)> {
                    vec![ #( #values, )* ]
                }
            }
        )
    }

    fn expand_impl_validate(&self) -> TokenStream {
        let ident = &self.ident;

        quote!(
            impl ::catalogo::validation::Validate for #ident {
                fn validate(
                    &self,
                ) -> ::std::result::Result<(), ::std::vec::Vec<::catalogo::validation::Violation>> {
                    ::catalogo::validation::validate(
                        &<Self as ::catalogo::database::IntoDatabaseSchema>::database_schema(),
                        &<Self as ::catalogo::database::FieldValues>::field_values(self),
                    )
                }
            }
        )
    }

    fn is_type_option(ty: &syn::Type) -> bool {
        match ty {
            syn::Type::Path(path) => path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "Option")
                .unwrap_or(false),
            _ => false,
        }
    }

    fn lit_to_db_default(lit: &syn::Lit) -> Option<TokenStream> {
        let db_default = match lit {
            syn::Lit::Bool(b) => quote!(::catalogo::database::DatabaseDefault::Bool(#b)),
            syn::Lit::Float(f) => quote!(::catalogo::database::DatabaseDefault::Float(#f)),
            syn::Lit::Int(i) => quote!(::catalogo::database::DatabaseDefault::Int(#i)),
            syn::Lit::Str(s) => {
                quote!(::catalogo::database::DatabaseDefault::String(#s.to_string()))
            }
            _ => return None,
        };
        Some(db_default)
    }

    fn rust_to_db_type(ty: &syn::Type) -> Option<TokenStream> {
        let ty_string = quote!(#ty).to_string().replace(' ', "");
        let ty_str = ty_string
            .strip_prefix("std::option::Option<")
            .or_else(|| ty_string.strip_prefix("Option<"))
            .and_then(|inner| inner.strip_suffix('>'))
            .unwrap_or(&ty_string);

        let db_type = match ty_str {
            // Numeric types
            "i16" | "u8" => quote!(SmallInt),
            "i32" | "u16" => quote!(Integer),
            "i64" | "u32" => quote!(BigInt),
            "f32" => quote!(Float),
            "f64" => quote!(Double),

            // Character types
            "String" => quote!(Text),

            // Boolean type
            "bool" => quote!(Bool),

            _ => return None,
        };

        Some(quote!(::catalogo::database::DatabaseType::#db_type))
    }
}

impl DeriveMacro for DeriveModel {
    fn new(input: syn::DeriveInput) -> Result<Self, Error> {
        let attrs = RootAttrs::from_attributes(&input.attrs)?;
        let fields = parse_struct_fields::<ItemAttrs>(input.data)?;

        let ident = input.ident;

        Ok(DeriveModel {
            attrs,
            fields,
            ident,
        })
    }

    fn expand(&self) -> syn::Result<TokenStream> {
        let expanded_impl_database_schema = self.expand_impl_database_schema()?;
        let expanded_impl_field_values = self.expand_impl_field_values();
        let expanded_impl_validate = self.expand_impl_validate();

        Ok(TokenStream::from_iter([
            expanded_impl_database_schema,
            expanded_impl_field_values,
            expanded_impl_validate,
        ]))
    }
}

pub fn expand_derive_model(input: syn::DeriveInput) -> syn::Result<TokenStream> {
    let ident_span: Span = input.ident.span();

    match DeriveModel::new(input) {
        Ok(model) => model.expand(),
        Err(Error::InputNotStruct) => Ok(quote_spanned! {
            ident_span => compile_error!("you can only derive Model on structs with named fields");
        }),
        Err(Error::Syn(err)) => Err(err),
    }
}
