pub use crate::database::{
    DatabaseColumn, DatabaseDefault, DatabaseIndex, DatabaseSchema, DatabaseType, FieldValues,
    IntoDatabaseSchema, Value,
};
pub use crate::macros::Model;
pub use crate::producto::{NewProducto, Producto};
pub use crate::schema::Schema;
pub use crate::store::{MemoryStore, PgStore, ProductoStore};
pub use crate::validation::{validate, Validate, Violation};
