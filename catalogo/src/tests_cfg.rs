use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Model)]
pub struct Etiqueta {
    pub id: i32,
    #[catalogo(max_len = 30, unique, non_blank)]
    pub slug: String,
    #[catalogo(default = "gris")]
    pub color: String,
    #[catalogo(db_type = "SmallInt", index)]
    pub orden: Option<i32>,
    #[catalogo(default_raw = "42")]
    pub prioridad: Option<i64>,
    pub peso: Option<f64>,
}
