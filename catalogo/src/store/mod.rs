use async_trait::async_trait;

use crate::{
    error::Result,
    producto::{NewProducto, Producto},
};

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;

mod memory;
mod postgres;

/// Durable storage of [`Producto`] records.
///
/// Implementations validate records before writing them and own id
/// assignment: ids are unique and never change once assigned.
#[async_trait]
pub trait ProductoStore: Send + Sync {
    /// Validates and stores a new record, returning it with its assigned id.
    async fn create(&self, producto: NewProducto) -> Result<Producto>;

    async fn get(&self, id: i64) -> Result<Producto>;

    /// Overwrites the stored record with the same id.
    async fn save(&self, producto: &Producto) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// Records whose `nombre` equals `nombre` exactly, ordered by id.
    async fn find_by_nombre(&self, nombre: &str) -> Result<Vec<Producto>>;

    /// Every record, ordered by id.
    async fn list(&self) -> Result<Vec<Producto>>;
}
