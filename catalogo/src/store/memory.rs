use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use crate::{
    error::{Error, Result},
    producto::{NewProducto, Producto},
    validation::Validate,
};

use super::ProductoStore;

/// Process-local store, mainly for tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Producto>,
    nombre_index: BTreeMap<String, BTreeSet<i64>>,
}

impl Inner {
    fn index(&mut self, producto: &Producto) {
        self.nombre_index
            .entry(producto.nombre.clone())
            .or_default()
            .insert(producto.id);
    }

    fn unindex(&mut self, producto: &Producto) {
        if let Some(ids) = self.nombre_index.get_mut(&producto.nombre) {
            ids.remove(&producto.id);
            if ids.is_empty() {
                self.nombre_index.remove(&producto.nombre);
            }
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductoStore for MemoryStore {
    async fn create(&self, producto: NewProducto) -> Result<Producto> {
        producto.validate()?;

        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let producto = producto.into_producto(inner.last_id);
        inner.index(&producto);
        inner.rows.insert(producto.id, producto.clone());

        debug!("created producto {}", producto.id);
        Ok(producto)
    }

    async fn get(&self, id: i64) -> Result<Producto> {
        self.inner
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    async fn save(&self, producto: &Producto) -> Result<()> {
        producto.validate()?;

        let mut inner = self.inner.write().await;
        let previous = inner
            .rows
            .get(&producto.id)
            .cloned()
            .ok_or(Error::NotFound(producto.id))?;
        inner.unindex(&previous);
        inner.index(producto);
        inner.rows.insert(producto.id, producto.clone());

        debug!("saved producto {}", producto.id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        let producto = inner.rows.remove(&id).ok_or(Error::NotFound(id))?;
        inner.unindex(&producto);

        debug!("deleted producto {}", id);
        Ok(())
    }

    async fn find_by_nombre(&self, nombre: &str) -> Result<Vec<Producto>> {
        let inner = self.inner.read().await;
        let productos = inner
            .nombre_index
            .get(nombre)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.rows.get(id).cloned())
            .collect();
        Ok(productos)
    }

    async fn list(&self) -> Result<Vec<Producto>> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::validation::Violation;

    #[tokio::test]
    async fn camisa_round_trips() {
        let store = MemoryStore::new();
        let created = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        assert_eq!(
            created,
            Producto {
                id: 1,
                nombre: "Camisa".to_string(),
                precio: 2500,
                disponible: true,
            }
        );
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn explicit_disponible_is_kept() {
        let store = MemoryStore::new();
        let created = store
            .create(NewProducto::new("Pantalón", 4000).disponible(false))
            .await
            .unwrap();
        assert!(!store.get(created.id).await.unwrap().disponible);
    }

    #[tokio::test]
    async fn long_nombre_is_rejected_and_not_stored() {
        let store = MemoryStore::new();
        let err = store
            .create(NewProducto::new("x".repeat(51), 1))
            .await
            .unwrap_err();
        match err {
            Error::Validation(violations) => assert_eq!(
                violations,
                vec![Violation::TooLong {
                    column: "nombre".to_string(),
                    max: 50,
                    actual: 51,
                }]
            ),
            other => panic!("unexpected error: {}", other),
        }
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_nombre_round_trips() {
        let store = MemoryStore::new();
        let created = store.create(NewProducto::new("", 10)).await.unwrap();
        assert_eq!(created.nombre, "");
        assert!(created.disponible);
        assert_eq!(store.get(created.id).await.unwrap(), created);
        assert_eq!(store.find_by_nombre("").await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn duplicate_nombres_coexist() {
        let store = MemoryStore::new();
        let first = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        let second = store.create(NewProducto::new("Camisa", 3000)).await.unwrap();
        assert_ne!(first.id, second.id);

        assert_eq!(store.get(first.id).await.unwrap().precio, 2500);
        assert_eq!(store.get(second.id).await.unwrap().precio, 3000);
        assert_eq!(
            store.find_by_nombre("Camisa").await.unwrap(),
            vec![first, second]
        );
    }

    #[tokio::test]
    async fn save_moves_index_entry() {
        let store = MemoryStore::new();
        let mut producto = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        producto.nombre = "Camiseta".to_string();
        producto.precio = 1800;
        store.save(&producto).await.unwrap();

        assert!(store.find_by_nombre("Camisa").await.unwrap().is_empty());
        assert_eq!(store.find_by_nombre("Camiseta").await.unwrap(), vec![producto.clone()]);
        assert_eq!(store.get(producto.id).await.unwrap(), producto);
    }

    #[tokio::test]
    async fn save_unknown_id() {
        let store = MemoryStore::new();
        let producto = NewProducto::new("Camisa", 2500).into_producto(7);
        assert!(matches!(store.save(&producto).await, Err(Error::NotFound(7))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_validates() {
        let store = MemoryStore::new();
        let mut producto = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        producto.nombre = "y".repeat(60);
        assert!(matches!(store.save(&producto).await, Err(Error::Validation(_))));
        assert_eq!(store.get(producto.id).await.unwrap().nombre, "Camisa");
    }

    #[tokio::test]
    async fn delete_removes_row_and_index() {
        let store = MemoryStore::new();
        let producto = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        store.delete(producto.id).await.unwrap();

        assert!(matches!(store.get(producto.id).await, Err(Error::NotFound(1))));
        assert!(store.find_by_nombre("Camisa").await.unwrap().is_empty());
        assert!(matches!(store.delete(producto.id).await, Err(Error::NotFound(1))));
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(NewProducto::new("Camisa", 2500)).await.unwrap();
        assert_eq!(second.id, 2);
    }
}
