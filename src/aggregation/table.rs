use indexmap::IndexMap;

use super::{DataPoint, MAX_TABLE_ROWS};
use crate::chart::ChartConfig;
use crate::data_store::{Record, Value};

/// Point fields a raw column must not shadow in the serialized row
const RESERVED_KEYS: [&str; 4] = ["id", "category", "value", "value2"];

/// Table: the first rows in input order, restricted to the selected columns.
///
/// `category` and `value` are filled from the first textual and first
/// numeric selected column so rows still fit the common point shape.
pub(super) fn aggregate(records: &[Record], config: &ChartConfig) -> Vec<DataPoint> {
    let selected = config.selected_columns();
    if selected.is_empty() {
        return vec![];
    }

    records
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|record| table_row(record, selected))
        .collect()
}

fn table_row(record: &Record, selected: &[String]) -> DataPoint {
    let columns: IndexMap<String, Value> = selected
        .iter()
        .filter(|column| !RESERVED_KEYS.contains(&column.as_str()))
        .map(|column| {
            let value = match record.get(column) {
                None | Some(Value::Null) => Value::String(String::new()),
                Some(value) => value.clone(),
            };
            (column.clone(), value)
        })
        .collect();

    let category = selected
        .iter()
        .find_map(|column| record.get(column).and_then(Value::as_str))
        .or_else(|| record.values().find_map(Value::as_str))
        .unwrap_or("Unknown")
        .to_string();
    let value = selected
        .iter()
        .find_map(|column| record.get(column).and_then(Value::as_number))
        .unwrap_or(0.0);

    DataPoint {
        columns,
        ..DataPoint::new(category, value)
    }
}

#[cfg(test)]
mod test {
    use super::super::test::records;
    use super::super::aggregate;
    use super::*;
    use crate::chart::VisualType;

    fn table(columns: &[&str]) -> ChartConfig {
        ChartConfig {
            selected_columns: Some(columns.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_keep_selected_columns() {
        let data = records(
            r#"[
                {"campaign_name": "B", "platform": "fb", "clicks": 7, "spend": 1.256},
                {"campaign_name": "A", "platform": null, "clicks": 10}
            ]"#,
        );
        let points = aggregate(&data, &table(&["platform", "spend", "clicks"]), &VisualType::Table);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].category, "fb");
        assert_eq!(points[0].value, 1.26);
        assert_eq!(points[0].columns["spend"], Value::Float(1.256));
        assert_eq!(
            points[0].columns.keys().collect::<Vec<_>>(),
            vec!["platform", "spend", "clicks"]
        );

        // null and missing cells render as empty text; category falls back
        // to the first textual cell of the whole record
        assert_eq!(points[1].columns["platform"], Value::from(""));
        assert_eq!(points[1].columns["spend"], Value::from(""));
        assert_eq!(points[1].category, "A");
        assert_eq!(points[1].value, 10.0);
    }

    #[test]
    fn test_category_unknown_without_text() {
        let data = records(r#"[{"clicks": 3}]"#);
        let points = aggregate(&data, &table(&["clicks"]), &VisualType::Table);
        assert_eq!(points[0].category, "Unknown");
        assert_eq!(points[0].value, 3.0);
    }

    #[test]
    fn test_first_hundred_rows_in_input_order() {
        let data: Vec<Record> = (0..150)
            .map(|i| records(&format!(r#"[{{"ad_name": "ad {i}"}}]"#)).remove(0))
            .collect();
        let points = aggregate(&data, &table(&["ad_name"]), &VisualType::Table);
        assert_eq!(points.len(), MAX_TABLE_ROWS);
        assert_eq!(points[0].category, "ad 0");
        assert_eq!(points[99].category, "ad 99");
        assert!(points.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_computed_fields_win_over_same_named_columns() {
        let data = records(r#"[{"campaign_name": "A", "value": "high", "clicks": 10}]"#);
        let points = aggregate(
            &data,
            &table(&["campaign_name", "value", "clicks"]),
            &VisualType::Table,
        );

        assert!(!points[0].columns.contains_key("value"));
        let json = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(json["value"], 10.0);
        assert_eq!(json["category"], "A");
        assert_eq!(json["clicks"], 10);

        let text = serde_json::to_string(&points[0]).unwrap();
        assert_eq!(text.matches("\"value\"").count(), 1);
    }

    #[test]
    fn test_table_row_serializes_flat() {
        let data = records(r#"[{"campaign_name": "A", "clicks": 10}]"#);
        let points = aggregate(&data, &table(&["campaign_name", "clicks"]), &VisualType::Table);
        let json = serde_json::to_value(&points[0]).unwrap();
        assert_eq!(json["campaign_name"], "A");
        assert_eq!(json["clicks"], 10);
        assert_eq!(json["category"], "A");
    }
}
