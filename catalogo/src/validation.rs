use std::fmt;

use crate::database::{DatabaseColumn, DatabaseSchema, DatabaseType, Value};

/// A constraint a candidate value breaks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    Required {
        column: String,
    },
    Blank {
        column: String,
    },
    TooLong {
        column: String,
        max: usize,
        actual: usize,
    },
    OutOfRange {
        column: String,
        value: i64,
    },
    TypeMismatch {
        column: String,
        expected: DatabaseType,
        found: &'static str,
    },
    UnknownField {
        field: String,
    },
}

impl Violation {
    pub fn column(&self) -> &str {
        match self {
            Violation::Required { column }
            | Violation::Blank { column }
            | Violation::TooLong { column, .. }
            | Violation::OutOfRange { column, .. }
            | Violation::TypeMismatch { column, .. } => column,
            Violation::UnknownField { field } => field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Required { column } => write!(f, "{} cannot be null", column),
            Violation::Blank { column } => write!(f, "{} cannot be blank", column),
            Violation::TooLong {
                column,
                max,
                actual,
            } => write!(
                f,
                "{} has at most {} characters (it has {})",
                column, max, actual
            ),
            Violation::OutOfRange { column, value } => {
                write!(f, "{} value {} is out of range", column, value)
            }
            Violation::TypeMismatch {
                column,
                expected,
                found,
            } => write!(f, "{} expects {} but got {}", column, expected, found),
            Violation::UnknownField { field } => write!(f, "unknown field {}", field),
        }
    }
}

/// Checks candidate field values against a table's column constraints.
///
/// Identity columns are skipped since the store assigns them. Every violation
/// is reported, in column order followed by unknown fields.
pub fn validate(
    schema: &DatabaseSchema,
    values: &[(&str, Value)],
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    for column in schema.columns.iter().filter(|column| !column.identity) {
        let value = values
            .iter()
            .find(|(name, _)| *name == column.name)
            .map(|(_, value)| value)
            .unwrap_or(&Value::Null);

        if let Some(violation) = check_column(column, value) {
            violations.push(violation);
        }
    }

    violations.extend(
        values
            .iter()
            .filter(|(name, _)| schema.column(name).is_none())
            .map(|(name, _)| Violation::UnknownField {
                field: name.to_string(),
            }),
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_column(column: &DatabaseColumn, value: &Value) -> Option<Violation> {
    let mismatch = || Violation::TypeMismatch {
        column: column.name.clone(),
        expected: column.ty.clone(),
        found: value.kind(),
    };

    match (value, &column.ty) {
        (Value::Null, _) => {
            if column.nullable || column.default.is_some() {
                None
            } else {
                Some(Violation::Required {
                    column: column.name.clone(),
                })
            }
        }
        (Value::Text(text), DatabaseType::Text(max_len)) => {
            if text.is_empty() && column.non_blank {
                return Some(Violation::Blank {
                    column: column.name.clone(),
                });
            }
            let max = (*max_len)?;
            let actual = text.chars().count();
            if actual > max as usize {
                Some(Violation::TooLong {
                    column: column.name.clone(),
                    max: max as usize,
                    actual,
                })
            } else {
                None
            }
        }
        (Value::Int(int), ty) => match ty.integer_range() {
            Some((min, max)) if *int < min || *int > max => Some(Violation::OutOfRange {
                column: column.name.clone(),
                value: *int,
            }),
            Some(_) => None,
            None if matches!(ty, DatabaseType::Numeric(_)) => None,
            None => Some(mismatch()),
        },
        (
            Value::Float(_),
            DatabaseType::Float | DatabaseType::Double | DatabaseType::Numeric(_),
        ) => None,
        (Value::Bool(_), DatabaseType::Bool) => None,
        _ => Some(mismatch()),
    }
}

/// Validation of a value against the table it is stored in.
///
/// `#[derive(Model)]` implements this by checking the model's own fields
/// against its own table.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<Violation>>;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{database::IntoDatabaseSchema, tests_cfg::Etiqueta};

    fn etiqueta() -> Etiqueta {
        Etiqueta {
            id: 0,
            slug: "oferta".to_string(),
            color: String::new(),
            orden: Some(1),
            prioridad: None,
            peso: None,
        }
    }

    #[test]
    fn valid_model() {
        assert_eq!(etiqueta().validate(), Ok(()));
    }

    #[test]
    fn blank_only_rejected_where_marked() {
        let mut etiqueta = etiqueta();
        etiqueta.slug = String::new();
        assert_eq!(
            etiqueta.validate(),
            Err(vec![Violation::Blank {
                column: "slug".to_string()
            }])
        );
    }

    #[test]
    fn empty_text_is_accepted_by_default() {
        let schema = Etiqueta::database_schema();
        let values = [
            ("slug", Value::Text("oferta".to_string())),
            ("color", Value::Text(String::new())),
        ];
        assert_eq!(validate(&schema, &values), Ok(()));
    }

    #[test]
    fn every_column_type_accepts_a_value() {
        let cases = [
            (DatabaseType::SmallInt, Value::Int(1)),
            (DatabaseType::Integer, Value::Int(1)),
            (DatabaseType::BigInt, Value::Int(1)),
            (DatabaseType::Numeric(Some((6, 2))), Value::Float(1.5)),
            (DatabaseType::Numeric(None), Value::Int(1)),
            (DatabaseType::Float, Value::Float(1.5)),
            (DatabaseType::Double, Value::Float(1.5)),
            (DatabaseType::Text(Some(4)), Value::Text("abcd".to_string())),
            (DatabaseType::Bool, Value::Bool(false)),
        ];
        for (ty, value) in cases {
            let schema = DatabaseSchema {
                table_name: "muestra".to_string(),
                columns: vec![DatabaseColumn {
                    name: "valor".to_string(),
                    ty: ty.clone(),
                    nullable: false,
                    default: None,
                    unique: false,
                    non_blank: false,
                    index: false,
                    identity: false,
                    primary_key: false,
                }],
            };
            assert_eq!(validate(&schema, &[("valor", value)]), Ok(()), "{}", ty);
        }
    }

    #[test]
    fn length_counts_characters() {
        let mut etiqueta = etiqueta();
        etiqueta.slug = "ñ".repeat(30);
        assert_eq!(etiqueta.validate(), Ok(()));

        etiqueta.slug = "ñ".repeat(31);
        assert_eq!(
            etiqueta.validate(),
            Err(vec![Violation::TooLong {
                column: "slug".to_string(),
                max: 30,
                actual: 31,
            }])
        );
    }

    #[test]
    fn integer_width_follows_column_type() {
        let mut etiqueta = etiqueta();
        etiqueta.orden = Some(i16::MAX as i32 + 1);
        assert_eq!(
            etiqueta.validate(),
            Err(vec![Violation::OutOfRange {
                column: "orden".to_string(),
                value: 32768,
            }])
        );
    }

    #[test]
    fn collects_every_violation() {
        let schema = Etiqueta::database_schema();
        let values = [
            ("slug", Value::Null),
            ("color", Value::Int(3)),
            ("orden", Value::Text("1".to_string())),
            ("sabor", Value::Bool(true)),
        ];
        let violations = validate(&schema, &values).unwrap_err();
        let columns: Vec<_> = violations.iter().map(Violation::column).collect();
        assert_eq!(columns, ["slug", "color", "orden", "sabor"]);
        assert_eq!(
            violations[1],
            Violation::TypeMismatch {
                column: "color".to_string(),
                expected: DatabaseType::Text(None),
                found: "integer",
            }
        );
    }

    #[test]
    fn missing_value_with_default_is_accepted() {
        let schema = Etiqueta::database_schema();
        let values = [("slug", Value::Text("nuevo".to_string()))];
        assert_eq!(validate(&schema, &values), Ok(()));
    }

    #[test]
    fn display() {
        let violation = Violation::TooLong {
            column: "nombre".to_string(),
            max: 50,
            actual: 51,
        };
        assert_eq!(
            violation.to_string(),
            "nombre has at most 50 characters (it has 51)"
        );
    }
}
