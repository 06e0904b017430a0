use indexmap::IndexMap;

use super::{
    compare_values, label_or_unknown, numeric_cell, Accumulator, DataPoint, MATRIX_RATE_FIELDS,
    MAX_MATRIX_POINTS,
};
use crate::chart::ChartConfig;
use crate::data_store::Record;
use crate::utils::text::truncate_chars;

const MAX_CATEGORY_CHARS: usize = 50;
const KEY_SEPARATOR: &str = " | ";
const TOTAL_KEY: &str = "Total";

/// Row fields then column fields, joined; `Total` when none are selected
fn matrix_key(record: &Record, rows: &[String], columns: &[String]) -> String {
    let parts: Vec<String> = rows
        .iter()
        .chain(columns)
        .map(|field| label_or_unknown(record, field))
        .collect();
    if parts.is_empty() {
        TOTAL_KEY.to_string()
    } else {
        parts.join(KEY_SEPARATOR)
    }
}

/// Matrix: the measure per row/column combination, largest first
pub(super) fn aggregate(records: &[Record], config: &ChartConfig) -> Vec<DataPoint> {
    let Some(measure) = config.measure() else {
        return vec![];
    };
    let is_rate = MATRIX_RATE_FIELDS.contains(&measure);
    let (rows, columns) = (config.matrix_rows(), config.matrix_columns());

    let mut cells: IndexMap<String, Accumulator> = IndexMap::new();
    for record in records {
        cells
            .entry(matrix_key(record, rows, columns))
            .or_default()
            .add(numeric_cell(record, measure));
    }

    let mut points: Vec<DataPoint> = cells
        .into_iter()
        .map(|(key, acc)| DataPoint::new(truncate_chars(&key, MAX_CATEGORY_CHARS), acc.total(is_rate)))
        .collect();
    points.sort_by(|a, b| compare_values(b.value, a.value));
    points.truncate(MAX_MATRIX_POINTS);
    points
}
