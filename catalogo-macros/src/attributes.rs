use proc_macro2::Span;
use syn::meta::ParseNestedMeta;

const ATTRIBUTE: &str = "catalogo";

pub trait FromAttributes: Default {
    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()>;

    fn from_attributes(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
            attr.parse_nested_meta(|meta| parsed.parse_meta(meta))?;
        }
        Ok(parsed)
    }
}

#[derive(Default)]
pub struct RootAttrs {
    pub table: Option<syn::LitStr>,
}

impl FromAttributes for RootAttrs {
    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("table") {
            self.table = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported catalogo attribute, expected `table`"))
        }
    }
}

#[derive(Default)]
pub struct ItemAttrs {
    pub db_type: Option<syn::LitStr>,
    pub default: Option<syn::Lit>,
    pub default_raw: Option<syn::LitStr>,
    pub index: Option<Span>,
    pub max_len: Option<syn::LitInt>,
    pub non_blank: Option<Span>,
    pub unique: Option<Span>,
}

impl FromAttributes for ItemAttrs {
    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.segments.first().map(|s| s.ident.span());
        if meta.path.is_ident("db_type") {
            self.db_type = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("default") {
            self.default = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("default_raw") {
            self.default_raw = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("index") {
            self.index = span;
        } else if meta.path.is_ident("max_len") {
            self.max_len = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("non_blank") {
            self.non_blank = span;
        } else if meta.path.is_ident("unique") {
            self.unique = span;
        } else {
            return Err(meta.error("unsupported catalogo attribute"));
        }
        Ok(())
    }
}
