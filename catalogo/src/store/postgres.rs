use async_trait::async_trait;
use log::{debug, info};
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};

use crate::{
    database::{DatabaseSchema, IntoDatabaseSchema},
    error::{Error, Result},
    producto::{NewProducto, Producto},
    schema::Schema,
    validation::Validate,
};

use super::ProductoStore;

/// [`ProductoStore`] backed by a PostgreSQL table.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    queries: Queries,
}

impl PgStore {
    /// Connects to `uri` and creates the tables of `schema` if needed.
    pub async fn connect(uri: &str, schema: &Schema) -> Result<Self> {
        let pool = PgPoolOptions::new().connect(uri).await?;
        Self::initialize(&pool, schema).await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        PgStore {
            pool,
            queries: Queries::new(&Producto::database_schema()),
        }
    }

    /// Runs the create statements of `schema`, returning how many ran.
    pub async fn initialize(pool: &PgPool, schema: &Schema) -> Result<usize> {
        let statements = schema.create_statements();
        for statement in &statements {
            info!("{}", statement);
            pool.execute(statement.as_str()).await?;
        }

        Ok(statements.len())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductoStore for PgStore {
    async fn create(&self, producto: NewProducto) -> Result<Producto> {
        producto.validate()?;

        let created: Producto = sqlx::query_as(&self.queries.insert)
            .bind(&producto.nombre)
            .bind(producto.precio)
            .bind(producto.disponible)
            .fetch_one(&self.pool)
            .await?;

        debug!("created producto {}", created.id);
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Producto> {
        sqlx::query_as(&self.queries.get)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound(id))
    }

    async fn save(&self, producto: &Producto) -> Result<()> {
        producto.validate()?;

        let result = sqlx::query(&self.queries.update)
            .bind(&producto.nombre)
            .bind(producto.precio)
            .bind(producto.disponible)
            .bind(producto.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(producto.id));
        }

        debug!("saved producto {}", producto.id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(&self.queries.delete)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }

        debug!("deleted producto {}", id);
        Ok(())
    }

    async fn find_by_nombre(&self, nombre: &str) -> Result<Vec<Producto>> {
        Ok(sqlx::query_as(&self.queries.find_by_nombre)
            .bind(nombre)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list(&self) -> Result<Vec<Producto>> {
        Ok(sqlx::query_as(&self.queries.list)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// Statements for one table, rendered once from its schema.
///
/// Parameters of `insert` and `update` follow the column order of the table,
/// identity columns excluded; `update` takes the id last.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Queries {
    insert: String,
    get: String,
    update: String,
    delete: String,
    find_by_nombre: String,
    list: String,
}

impl Queries {
    fn new(table: &DatabaseSchema) -> Self {
        let name = &table.table_name;
        let id = table
            .primary_key()
            .map(|column| column.name.as_str())
            .unwrap_or("id");
        let all = table
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let writable: Vec<_> = table.columns.iter().filter(|column| !column.identity).collect();

        let insert_columns = writable
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        // Omitted values fall back to the column default.
        let insert_values = writable
            .iter()
            .enumerate()
            .map(|(i, column)| match &column.default {
                Some(default) => format!("COALESCE(${}, {})", i + 1, default),
                None => format!("${}", i + 1),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = writable
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column.name, i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        Queries {
            insert: format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                name, insert_columns, insert_values, all
            ),
            get: format!("SELECT {} FROM {} WHERE {} = $1", all, name, id),
            update: format!(
                "UPDATE {} SET {} WHERE {} = ${}",
                name,
                assignments,
                id,
                writable.len() + 1
            ),
            delete: format!("DELETE FROM {} WHERE {} = $1", name, id),
            find_by_nombre: format!(
                "SELECT {} FROM {} WHERE nombre = $1 ORDER BY {}",
                all, name, id
            ),
            list: format!("SELECT {} FROM {} ORDER BY {}", all, name, id),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn producto_queries() {
        let queries = Queries::new(&Producto::database_schema());
        assert_eq!(
            queries,
            Queries {
                insert: "INSERT INTO productos_producto (nombre, precio, disponible) \
                         VALUES ($1, $2, COALESCE($3, true)) \
                         RETURNING id, nombre, precio, disponible"
                    .to_string(),
                get: "SELECT id, nombre, precio, disponible FROM productos_producto WHERE id = $1"
                    .to_string(),
                update: "UPDATE productos_producto SET nombre = $1, precio = $2, disponible = $3 \
                         WHERE id = $4"
                    .to_string(),
                delete: "DELETE FROM productos_producto WHERE id = $1".to_string(),
                find_by_nombre: "SELECT id, nombre, precio, disponible FROM productos_producto \
                                 WHERE nombre = $1 ORDER BY id"
                    .to_string(),
                list: "SELECT id, nombre, precio, disponible FROM productos_producto ORDER BY id"
                    .to_string(),
            }
        );
    }
}
