use crate::database::{DatabaseSchema, IntoDatabaseSchema};

/// The set of tables an application persists.
///
/// A `Schema` is built explicitly and handed to whatever initialises the
/// database; models are never registered behind the caller's back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    tables: Vec<DatabaseSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the table of `M`. Registering the same table twice keeps the
    /// first registration.
    pub fn register<M>(mut self) -> Self
    where
        M: IntoDatabaseSchema,
    {
        let table = M::database_schema();
        if self.table(&table.table_name).is_none() {
            self.tables.push(table);
        }
        self
    }

    pub fn tables(&self) -> &[DatabaseSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&DatabaseSchema> {
        self.tables.iter().find(|table| table.table_name == name)
    }

    pub fn create_statements(&self) -> Vec<String> {
        self.tables
            .iter()
            .flat_map(DatabaseSchema::create_statements)
            .collect()
    }
}
