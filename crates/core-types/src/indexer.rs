use crate::error::CoreError;
use crate::raw::RawTable;
use crate::table::{Column, PriceTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// The name of the date field in the upstream CSV layout.
pub const DEFAULT_DATE_FIELD: &str = "Date";

/// Parses a single date cell into a UTC timestamp.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM:SS±HH:MM`
/// and RFC 3339. Returns `None` if none of them match.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Parses a single price cell.
///
/// Empty cells and the usual missing markers (`NaN`, `null`, `NA`) are missing
/// observations, not errors. Returns `None` if the cell is not a number at all,
/// or is an infinite one.
pub fn parse_price(value: &str) -> Option<Option<f64>> {
    let value = value.trim();
    if value.is_empty()
        || ["nan", "null", "na"]
            .iter()
            .any(|m| value.eq_ignore_ascii_case(m))
    {
        return Some(None);
    }

    match value.parse::<f64>() {
        Ok(p) if p.is_nan() => Some(None),
        Ok(p) if p.is_finite() => Some(Some(p)),
        _ => None,
    }
}

/// The Time Indexer.
///
/// Consumes a raw table, parses every value of `date_field` into a timestamp and
/// promotes it to the row key. Rows are ordered by timestamp and the date field
/// is removed from the data columns. Every other column becomes a numeric column.
///
/// Fails with `CoreError::Parse` on the first unparseable date or price, and with
/// `CoreError::Schema` if the date field is absent or two rows share a timestamp.
pub fn index_by_date(raw: RawTable, date_field: &str) -> Result<PriceTable, CoreError> {
    let (headers, records) = raw.into_parts();

    let date_pos = headers
        .iter()
        .position(|h| h == date_field)
        .ok_or_else(|| CoreError::Schema(format!("date field '{}' not found", date_field)))?;

    let mut rows = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        let timestamp = parse_timestamp(&record[date_pos]).ok_or_else(|| CoreError::Parse {
            field: date_field.to_string(),
            value: record[date_pos].clone(),
            row,
        })?;

        let mut prices = Vec::with_capacity(headers.len() - 1);
        for (col, cell) in record.iter().enumerate() {
            if col == date_pos {
                continue;
            }
            let price = parse_price(cell).ok_or_else(|| CoreError::Parse {
                field: headers[col].clone(),
                value: cell.clone(),
                row,
            })?;
            prices.push(price);
        }
        rows.push((timestamp, prices));
    }

    // Stable, so equal keys keep their input order for the duplicate report below.
    rows.sort_by_key(|(ts, _)| *ts);

    if let Some(w) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(CoreError::Schema(format!("duplicate timestamp {}", w[0].0)));
    }

    let names: Vec<&String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_pos)
        .map(|(_, h)| h)
        .collect();

    let mut columns: Vec<Column> = names
        .iter()
        .map(|name| Column::new(name.as_str(), Vec::with_capacity(rows.len())))
        .collect();
    let mut index = Vec::with_capacity(rows.len());

    for (timestamp, prices) in rows {
        index.push(timestamp);
        for (column, price) in columns.iter_mut().zip(prices) {
            column.values.push(price);
        }
    }

    tracing::debug!(
        rows = index.len(),
        columns = columns.len(),
        "Indexed table by '{}'.",
        date_field
    );

    PriceTable::new(index, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(records: &[[&str; 3]]) -> RawTable {
        RawTable::new(
            vec!["Date".into(), "TSLA".into(), "SPY".into()],
            records
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn parses_supported_date_formats() {
        let expected = Utc.with_ymd_and_hms(2015, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2015-01-02"), Some(expected));
        assert_eq!(parse_timestamp("2015-01-02 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2015-01-02 00:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2015-01-02T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("02/01/2015"), None);
    }

    #[test]
    fn parses_missing_prices() {
        assert_eq!(parse_price(""), Some(None));
        assert_eq!(parse_price("NaN"), Some(None));
        assert_eq!(parse_price(" 101.5 "), Some(Some(101.5)));
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn infinite_prices_are_not_numbers() {
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("-inf"), None);
        assert_eq!(parse_price("Infinity"), None);
        assert_eq!(parse_price("1e400"), None);
    }

    #[test]
    fn sorts_rows_and_removes_date_column() {
        let table = index_by_date(
            raw(&[
                ["2024-01-03", "2.0", "20.0"],
                ["2024-01-02", "1.0", ""],
            ]),
            DEFAULT_DATE_FIELD,
        )
        .unwrap();

        assert_eq!(table.tickers(), vec!["TSLA", "SPY"]);
        assert_eq!(table.index()[0], Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(table.column("TSLA").unwrap().values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(table.column("SPY").unwrap().values, vec![None, Some(20.0)]);
    }

    #[test]
    fn unparseable_date_fails_the_whole_table() {
        let err = index_by_date(
            raw(&[["2024-01-02", "1.0", "2.0"], ["not a date", "1.0", "2.0"]]),
            DEFAULT_DATE_FIELD,
        )
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::Parse {
                field: "Date".into(),
                value: "not a date".into(),
                row: 1
            }
        );
    }

    #[test]
    fn infinite_price_fails_the_whole_table() {
        let err = index_by_date(
            raw(&[["2024-01-02", "1.0", "2.0"], ["2024-01-03", "inf", "2.0"]]),
            DEFAULT_DATE_FIELD,
        )
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::Parse {
                field: "TSLA".into(),
                value: "inf".into(),
                row: 1
            }
        );
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let err = index_by_date(
            raw(&[["2024-01-02", "1.0", "2.0"], ["2024-01-02", "1.5", "2.5"]]),
            DEFAULT_DATE_FIELD,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }

    #[test]
    fn missing_date_field_is_a_schema_error() {
        let err = index_by_date(raw(&[["2024-01-02", "1.0", "2.0"]]), "Timestamp").unwrap_err();
        assert!(matches!(err, CoreError::Schema(_)));
    }
}
