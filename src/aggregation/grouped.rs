use indexmap::IndexMap;

use super::{
    label_or_unknown, numeric_cell, sort_points, Accumulator, DataPoint, MAX_GROUPED_POINTS,
    RATE_FIELDS,
};
use crate::chart::{ChartConfig, DateGranularity};
use crate::data_store::{Record, Value};
use crate::time_bucket::bucket;
use crate::utils::text::truncate_chars;

const MAX_CATEGORY_CHARS: usize = 30;

fn is_rate_field(measure: &str) -> bool {
    RATE_FIELDS.contains(&measure)
}

/// Group value, suffixed with the record's time bucket when a granularity is set
fn group_key(
    record: &Record,
    group_by: &str,
    granularity: DateGranularity,
    date_column: &str,
) -> String {
    let mut key = label_or_unknown(record, group_by);
    if granularity != DateGranularity::None {
        if let Some(date) = record
            .get(date_column)
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
        {
            key.push_str(" - ");
            key.push_str(&bucket(date, granularity));
        }
    }
    key
}

/// One linear pass; groups come out in first-seen order
fn accumulate<const N: usize>(
    records: &[Record],
    measures: [&str; N],
    group_by: &str,
    granularity: DateGranularity,
    date_column: &str,
) -> IndexMap<String, [Accumulator; N]> {
    let mut groups: IndexMap<String, [Accumulator; N]> = IndexMap::new();
    for record in records {
        let key = group_key(record, group_by, granularity, date_column);
        let entry = groups.entry(key).or_insert([Accumulator::default(); N]);
        for (acc, measure) in entry.iter_mut().zip(measures) {
            acc.add(numeric_cell(record, measure));
        }
    }
    groups
}

fn finish(mut points: Vec<DataPoint>, config: &ChartConfig) -> Vec<DataPoint> {
    sort_points(&mut points, config.sort_order());
    points.truncate(MAX_GROUPED_POINTS);
    points
}

/// Bar, line, area, pie, combo and any other single-measure chart
pub(super) fn aggregate(records: &[Record], config: &ChartConfig, date_column: &str) -> Vec<DataPoint> {
    let (Some(measure), Some(group_by)) = (config.measure(), config.group_by()) else {
        return vec![];
    };
    let is_rate = is_rate_field(measure);

    let points = accumulate(records, [measure], group_by, config.date_granularity, date_column)
        .into_iter()
        .map(|(key, [acc])| DataPoint::new(truncate_chars(&key, MAX_CATEGORY_CHARS), acc.total(is_rate)))
        .collect();
    finish(points, config)
}

/// Multi-line chart: two measures over the same groups
pub(super) fn aggregate_pair(
    records: &[Record],
    config: &ChartConfig,
    date_column: &str,
) -> Vec<DataPoint> {
    let (Some(measure), Some(measure2), Some(group_by)) =
        (config.measure(), config.measure2(), config.group_by())
    else {
        return vec![];
    };
    let (is_rate, is_rate2) = (is_rate_field(measure), is_rate_field(measure2));

    let points = accumulate(
        records,
        [measure, measure2],
        group_by,
        config.date_granularity,
        date_column,
    )
    .into_iter()
    .map(|(key, [first, second])| {
        let mut point = DataPoint::new(
            truncate_chars(&key, MAX_CATEGORY_CHARS),
            first.total(is_rate),
        );
        point.value2 = Some(super::round2(second.total(is_rate2)));
        point
    })
    .collect();
    finish(points, config)
}
