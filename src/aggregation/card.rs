use super::{numeric_cell, DataPoint};
use crate::chart::{Calculation, ChartConfig};
use crate::data_store::Record;

/// KPI card: one point reducing every numeric value of the measure.
///
/// `Last` takes the first numeric value in input order, which relies on
/// the record source returning rows most recent first.
pub(super) fn aggregate(records: &[Record], config: &ChartConfig) -> Vec<DataPoint> {
    let Some(measure) = config.measure() else {
        return vec![];
    };

    let values: Vec<f64> = records
        .iter()
        .filter_map(|record| numeric_cell(record, measure))
        .collect();

    let value = if values.is_empty() {
        0.0
    } else {
        match config.calculation() {
            Calculation::Sum => values.iter().sum(),
            Calculation::Average => values.iter().sum::<f64>() / values.len() as f64,
            Calculation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Calculation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Calculation::Count => values.len() as f64,
            Calculation::Last => values[0],
        }
    };

    vec![DataPoint::new(measure.to_string(), value)]
}
