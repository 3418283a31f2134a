pub enum Error {
    InputNotStruct,
    Syn(syn::Error),
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::Syn(err)
    }
}
