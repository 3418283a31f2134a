use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatabaseType {
    SmallInt,
    Integer,
    BigInt,
    Numeric(Option<(u16, u16)>),
    Float,
    Double,
    Text(Option<i32>),
    Bool,
}

impl DatabaseType {
    /// Inclusive bounds of the integer types, `None` for everything else.
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            Self::SmallInt => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Integer => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::BigInt => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallInt => write!(f, "smallint"),
            Self::Integer => write!(f, "integer"),
            Self::BigInt => write!(f, "bigint"),
            Self::Numeric(Some((p, s))) => write!(f, "numeric({}, {})", p, s),
            Self::Numeric(None) => write!(f, "numeric"),
            Self::Float => write!(f, "real"),
            Self::Double => write!(f, "double precision"),
            Self::Text(Some(max)) => write!(f, "character varying({})", max),
            Self::Text(None) => write!(f, "character varying"),
            Self::Bool => write!(f, "boolean"),
        }
    }
}

#[derive(Clone, Debug, PartialOrd)]
pub enum DatabaseDefault {
    Bool(bool),
    Float(f64),
    Int(i64),
    Raw(String),
    String(String),
}

impl PartialEq for DatabaseDefault {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DatabaseDefault::Bool(v), DatabaseDefault::Bool(other)) => v == other,
            (DatabaseDefault::Float(v), DatabaseDefault::Float(other)) => v == other,
            (DatabaseDefault::Int(v), DatabaseDefault::Int(other)) => v == other,
            (DatabaseDefault::Raw(v), DatabaseDefault::Raw(other)) => {
                v.to_lowercase() == other.to_lowercase()
            }
            (DatabaseDefault::String(v), DatabaseDefault::String(other)) => v == other,
            _ => false,
        }
    }
}

impl fmt::Display for DatabaseDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseDefault::Bool(val) => write!(f, "{}", val),
            DatabaseDefault::Float(val) => write!(f, "{}", val),
            DatabaseDefault::Int(val) => write!(f, "{}", val),
            DatabaseDefault::Raw(val) => write!(f, "{}", val),
            DatabaseDefault::String(val) => write!(f, "'{}'", val.replace('\'', "''")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct DatabaseColumn {
    pub name: String,
    pub ty: DatabaseType,
    pub nullable: bool,
    pub default: Option<DatabaseDefault>,
    pub unique: bool,
    /// Rejects empty strings.
    pub non_blank: bool,
    pub index: bool,
    /// Value assigned by the database on insert.
    pub identity: bool,
    pub primary_key: bool,
}

impl DatabaseColumn {
    fn write_sql(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty)?;

        if !self.nullable {
            write!(f, " NOT NULL")?;
        }

        if let Some(default) = &self.default {
            write!(f, " DEFAULT {}", default)?;
        }

        if self.identity {
            write!(f, " GENERATED BY DEFAULT AS IDENTITY")?;
        }

        if self.primary_key {
            write!(f, " PRIMARY KEY")?;
        } else if self.unique {
            write!(f, " UNIQUE")?;
        }

        Ok(())
    }
}

impl fmt::Display for DatabaseColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_sql(f)
    }
}

/// A secondary lookup structure the database maintains for one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseIndex {
    pub name: String,
    pub table: String,
    pub column: String,
    pub opclass: Option<String>,
}

impl fmt::Display for DatabaseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE INDEX IF NOT EXISTS {} ON {} ({}",
            self.name, self.table, self.column
        )?;
        if let Some(opclass) = &self.opclass {
            write!(f, " {}", opclass)?;
        }
        write!(f, ");")
    }
}

pub trait IntoDatabaseSchema {
    fn database_schema() -> DatabaseSchema;
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseSchema {
    pub table_name: String,
    pub columns: Vec<DatabaseColumn>,
}

impl DatabaseSchema {
    pub fn column(&self, name: &str) -> Option<&DatabaseColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Option<&DatabaseColumn> {
        self.columns.iter().find(|column| column.primary_key)
    }

    /// Indexes requested by the columns, in column order.
    ///
    /// Text columns get a second `varchar_pattern_ops` index so that prefix
    /// `LIKE` filters can use an index regardless of the database collation.
    pub fn indexes(&self) -> Vec<DatabaseIndex> {
        self.columns
            .iter()
            .filter(|column| column.index && !column.primary_key && !column.unique)
            .flat_map(|column| {
                let mut indexes = vec![DatabaseIndex {
                    name: format!("{}_{}_idx", self.table_name, column.name),
                    table: self.table_name.clone(),
                    column: column.name.clone(),
                    opclass: None,
                }];
                if column.ty.is_text() {
                    indexes.push(DatabaseIndex {
                        name: format!("{}_{}_like", self.table_name, column.name),
                        table: self.table_name.clone(),
                        column: column.name.clone(),
                        opclass: Some("varchar_pattern_ops".to_string()),
                    });
                }
                indexes
            })
            .collect()
    }

    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| format!("  {}", column))
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
            self.table_name, columns
        )
    }

    /// Every statement needed to bring up the table on an empty database.
    ///
    /// Statements are idempotent and can be re-run against an initialised
    /// database.
    pub fn create_statements(&self) -> Vec<String> {
        let mut statements = vec![self.create_table_sql()];
        statements.extend(self.indexes().iter().map(ToString::to_string));
        statements
    }
}

/// Dynamic value of a single model field.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_value_from_int {
    ($( $ty: ty ),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(v as i64)
                }
            }
        )*
    };
}

impl_value_from_int!(i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

pub trait FieldValues {
    fn field_values(&self) -> Vec<(&'static str, Value)>;
}
