use std::str::FromStr;

use super::{DataStoreError, Field, Record, Value};

/// Column types reported by the columnar warehouse schema endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseType {
    Integer,
    Int64,
    Float,
    Float64,
    Numeric,
    BigNumeric,
    String,
    Bytes,
    Boolean,
    Date,
    Datetime,
    Timestamp,
    Time,
    Geography,
    Json,
    Record,
}

impl WarehouseType {
    /// Integer, floating point and fixed point decimal families
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            WarehouseType::Integer
                | WarehouseType::Int64
                | WarehouseType::Float
                | WarehouseType::Float64
                | WarehouseType::Numeric
                | WarehouseType::BigNumeric
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, WarehouseType::Integer | WarehouseType::Int64)
    }

    /// Calendar date and timestamp columns
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            WarehouseType::Date | WarehouseType::Datetime | WarehouseType::Timestamp
        )
    }

    /// Convert one raw textual cell into a typed [`Value`].
    ///
    /// Numeric cells that fail to parse become null rather than an error.
    pub fn decode(&self, cell: Option<&str>) -> Value {
        let Some(cell) = cell else {
            return Value::Null;
        };
        match self {
            t if t.is_integer() => cell
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .or_else(|_| cell.trim().parse::<f64>().map(Value::Float))
                .unwrap_or(Value::Null),
            t if t.is_numeric() => cell
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or(Value::Null),
            WarehouseType::Boolean => Value::Boolean(cell == "true"),
            _ => Value::String(cell.to_string()),
        }
    }
}

impl FromStr for WarehouseType {
    type Err = DataStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTEGER" | "INT" | "SMALLINT" | "TINYINT" | "BYTEINT" => Ok(WarehouseType::Integer),
            "INT64" | "BIGINT" => Ok(WarehouseType::Int64),
            "FLOAT" => Ok(WarehouseType::Float),
            "FLOAT64" | "DOUBLE" => Ok(WarehouseType::Float64),
            "NUMERIC" | "DECIMAL" => Ok(WarehouseType::Numeric),
            "BIGNUMERIC" | "BIGDECIMAL" => Ok(WarehouseType::BigNumeric),
            "STRING" | "VARCHAR" | "TEXT" => Ok(WarehouseType::String),
            "BYTES" => Ok(WarehouseType::Bytes),
            "BOOLEAN" | "BOOL" => Ok(WarehouseType::Boolean),
            "DATE" => Ok(WarehouseType::Date),
            "DATETIME" => Ok(WarehouseType::Datetime),
            "TIMESTAMP" => Ok(WarehouseType::Timestamp),
            "TIME" => Ok(WarehouseType::Time),
            "GEOGRAPHY" => Ok(WarehouseType::Geography),
            "JSON" => Ok(WarehouseType::Json),
            "RECORD" | "STRUCT" => Ok(WarehouseType::Record),
            _ => Err(DataStoreError::UnknownType(s.to_string())),
        }
    }
}

/// Build a [`Record`] from one warehouse result row.
///
/// `cells` are positional and line up with `fields`. Unknown types keep the
/// raw text, and a row shorter than its schema fills the rest with nulls.
pub fn decode_row(fields: &[Field], cells: &[Option<String>]) -> Record {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let cell = cells.get(idx).and_then(|c| c.as_deref());
            let value = match field.data_type.parse::<WarehouseType>() {
                Ok(data_type) => data_type.decode(cell),
                Err(_) => cell.map(Value::from).unwrap_or(Value::Null),
            };
            (field.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case::integer("INTEGER", WarehouseType::Integer)]
    #[case::lowercase("float64", WarehouseType::Float64)]
    #[case::bignumeric("BIGNUMERIC", WarehouseType::BigNumeric)]
    #[case::timestamp("TIMESTAMP", WarehouseType::Timestamp)]
    #[case::bool_alias("BOOL", WarehouseType::Boolean)]
    fn test_from_str(#[case] raw: &str, #[case] expected: WarehouseType) {
        assert_eq!(WarehouseType::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_from_str_unknown_type() {
        assert!(WarehouseType::from_str("INTERVAL_YEAR").is_err());
    }

    #[test]
    fn test_numeric_and_temporal_families_are_disjoint() {
        for raw in ["INTEGER", "INT64", "FLOAT", "FLOAT64", "NUMERIC", "BIGNUMERIC"] {
            let t = WarehouseType::from_str(raw).unwrap();
            assert!(t.is_numeric());
            assert!(!t.is_temporal());
        }
        for raw in ["DATE", "DATETIME", "TIMESTAMP"] {
            let t = WarehouseType::from_str(raw).unwrap();
            assert!(t.is_temporal());
            assert!(!t.is_numeric());
        }
    }

    #[test]
    fn test_decode_row() {
        let fields = vec![
            Field::new("campaign_name", "STRING"),
            Field::new("clicks", "INT64"),
            Field::new("spend", "FLOAT64"),
            Field::new("is_active", "BOOLEAN"),
            Field::new("reach", "INTEGER"),
            Field::new("date", "DATE"),
        ];
        let cells = vec![
            Some("Spring Sale".to_string()),
            Some("42".to_string()),
            Some("12.5".to_string()),
            Some("true".to_string()),
            None,
        ];

        let record = decode_row(&fields, &cells);

        assert_eq!(record["campaign_name"], Value::from("Spring Sale"));
        assert_eq!(record["clicks"], Value::Int(42));
        assert_eq!(record["spend"], Value::Float(12.5));
        assert_eq!(record["is_active"], Value::Boolean(true));
        assert_eq!(record["reach"], Value::Null);
        assert_eq!(record["date"], Value::Null);
    }

    #[test]
    fn test_decode_unparsable_number_is_null() {
        assert_eq!(WarehouseType::Float64.decode(Some("n/a")), Value::Null);
        assert_eq!(WarehouseType::Int64.decode(Some("1e3")), Value::Float(1000.0));
    }
}
