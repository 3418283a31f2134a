use proc_macro2::TokenStream;

use crate::{attributes::FromAttributes, error::Error};

pub trait DeriveMacro: Sized {
    fn new(input: syn::DeriveInput) -> Result<Self, Error>;

    fn expand(&self) -> syn::Result<TokenStream>;
}

pub struct Field<Attr> {
    pub attrs: Attr,
    pub field: syn::Field,
}

impl<Attr> Field<Attr> {
    pub fn ident(&self) -> &syn::Ident {
        // Only named fields are collected.
        self.field.ident.as_ref().unwrap()
    }

    pub fn name(&self) -> String {
        self.ident().to_string()
    }

    pub fn ty_string(&self) -> String {
        let ty = &self.field.ty;
        quote::quote!(#ty).to_string().replace(' ', "")
    }
}

pub fn parse_struct_fields<Attr>(data: syn::Data) -> Result<Vec<Field<Attr>>, Error>
where
    Attr: FromAttributes,
{
    let fields = match data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(syn::FieldsNamed { named, .. }),
            ..
        }) => named,
        _ => return Err(Error::InputNotStruct),
    };

    fields
        .into_iter()
        .map(|field| {
            Ok(Field {
                attrs: Attr::from_attributes(&field.attrs)?,
                field,
            })
        })
        .collect::<Result<_, _>>()
}
