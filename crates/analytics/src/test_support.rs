use chrono::{Duration, TimeZone, Utc};
use core_types::{Column, PriceTable, TimeFrame};

/// Builds a daily-indexed table starting 2024-01-01 from named columns.
pub fn table(columns: Vec<(&str, Vec<Option<f64>>)>) -> PriceTable {
    let len = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let index = (0..len).map(|i| start + Duration::days(i as i64)).collect();
    TimeFrame::new(
        index,
        columns.into_iter().map(|(n, v)| Column::new(n, v)).collect(),
    )
    .unwrap()
}

pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}
