use crate::prelude::*;

/// An item of the product catalog.
///
/// `id` is assigned by the store on creation and never changes afterwards.
/// The unit of `precio` is left to the application.
#[derive(Clone, Debug, PartialEq, Eq, Model, sqlx::FromRow)]
#[catalogo(table = "productos_producto")]
pub struct Producto {
    pub id: i64,
    #[catalogo(max_len = 50, index)]
    pub nombre: String,
    pub precio: i32,
    #[catalogo(default = true)]
    pub disponible: bool,
}

/// Input for creating a [`Producto`]; `disponible` falls back to `true`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProducto {
    pub nombre: String,
    pub precio: i32,
    pub disponible: Option<bool>,
}

impl NewProducto {
    pub fn new(nombre: impl Into<String>, precio: i32) -> Self {
        NewProducto {
            nombre: nombre.into(),
            precio,
            disponible: None,
        }
    }

    pub fn disponible(mut self, disponible: bool) -> Self {
        self.disponible = Some(disponible);
        self
    }

    pub fn into_producto(self, id: i64) -> Producto {
        Producto {
            id,
            nombre: self.nombre,
            precio: self.precio,
            disponible: self.disponible.unwrap_or(true),
        }
    }
}

impl FieldValues for NewProducto {
    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("nombre", Value::from(self.nombre.as_str())),
            ("precio", Value::from(self.precio)),
            ("disponible", Value::from(self.disponible)),
        ]
    }
}

impl Validate for NewProducto {
    fn validate(&self) -> Result<(), Vec<Violation>> {
        validate(&Producto::database_schema(), &self.field_values())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn persisted_layout() {
        assert_eq!(
            Producto::database_schema().create_statements(),
            vec![
                "CREATE TABLE IF NOT EXISTS productos_producto (\n  \
                 id bigint NOT NULL GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,\n  \
                 nombre character varying(50) NOT NULL,\n  \
                 precio integer NOT NULL,\n  \
                 disponible boolean NOT NULL DEFAULT true\n\
                 );"
                .to_string(),
                "CREATE INDEX IF NOT EXISTS productos_producto_nombre_idx ON productos_producto (nombre);"
                    .to_string(),
                "CREATE INDEX IF NOT EXISTS productos_producto_nombre_like ON productos_producto (nombre varchar_pattern_ops);"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn columns() {
        let schema = Producto::database_schema();
        assert_eq!(schema.primary_key().map(|c| c.name.as_str()), Some("id"));

        let nombre = schema.column("nombre").unwrap();
        assert_eq!(nombre.ty, DatabaseType::Text(Some(50)));
        assert!(nombre.index);
        assert!(!nombre.unique);

        let disponible = schema.column("disponible").unwrap();
        assert_eq!(disponible.default, Some(DatabaseDefault::Bool(true)));
        assert!(!disponible.nullable);
    }

    #[test]
    fn disponible_defaults_to_true() {
        let producto = NewProducto::new("Camisa", 2500).into_producto(1);
        assert_eq!(
            producto,
            Producto {
                id: 1,
                nombre: "Camisa".to_string(),
                precio: 2500,
                disponible: true,
            }
        );

        let agotado = NewProducto::new("Camisa", 2500).disponible(false).into_producto(2);
        assert!(!agotado.disponible);
    }

    #[test]
    fn omitted_disponible_is_valid() {
        assert_eq!(NewProducto::new("Camisa", 2500).validate(), Ok(()));
    }

    #[test]
    fn nombre_over_fifty_is_rejected() {
        let nombre = "a".repeat(51);
        assert_eq!(
            NewProducto::new(nombre, 10).validate(),
            Err(vec![Violation::TooLong {
                column: "nombre".to_string(),
                max: 50,
                actual: 51,
            }])
        );
        assert_eq!(NewProducto::new("é".repeat(50), 10).validate(), Ok(()));
    }

    #[test]
    fn empty_nombre_is_valid() {
        assert_eq!(NewProducto::new("", 10).validate(), Ok(()));
    }

    #[test]
    fn saved_value_is_checked_too() {
        let mut producto = NewProducto::new("Camisa", 2500).into_producto(1);
        producto.nombre = "b".repeat(51);
        assert_eq!(
            producto.validate(),
            Err(vec![Violation::TooLong {
                column: "nombre".to_string(),
                max: 50,
                actual: 51,
            }])
        );
    }
}
