//! # catalogo
//!
//! The product catalog entity, [`Producto`](producto::Producto), declared once
//! with `#[derive(Model)]` and turned into a **database table**, an explicit
//! **validation** contract and typed **persistence** helpers.
//!
//! ```ignore
//! use catalogo::prelude::*;
//!
//! let schema = Schema::new().register::<Producto>();
//! let store = PgStore::connect("postgres://localhost/tienda", &schema).await?;
//! let camisa = store.create(NewProducto::new("Camisa", 2500)).await?;
//! assert!(camisa.disponible);
//! ```

extern crate self as catalogo;

pub use catalogo_macros as macros;

pub mod database;
pub mod error;
pub mod prelude;
pub mod producto;
pub mod schema;
pub mod store;
#[cfg(test)]
mod tests_cfg;
pub mod validation;
