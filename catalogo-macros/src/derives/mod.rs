mod model;

pub use model::expand_derive_model;
