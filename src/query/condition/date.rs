//! Date reinterpretation for `isDate` conditions
//!
//! Dates are emitted as MongoDB Extended JSON: `{ "$date": "<RFC 3339>" }`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::error::QueryError;
use crate::query::types::{ConditionValue, Scalar};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Reinterpret a condition value as a date (or a list of dates)
pub fn reinterpret(value: &ConditionValue) -> Result<Value, QueryError> {
    match value {
        ConditionValue::Scalar(scalar) => scalar_to_date(scalar).map(to_extended_json),
        ConditionValue::List(items) => items
            .iter()
            .map(|item| scalar_to_date(item).map(to_extended_json))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

fn scalar_to_date(scalar: &Scalar) -> Result<DateTime<Utc>, QueryError> {
    match scalar {
        Scalar::String(s) => parse_date(s),
        // Numbers are milliseconds since the epoch
        Scalar::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(|| QueryError::invalid_date(n, "not a timestamp"))?;
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| QueryError::invalid_date(n, "timestamp out of range"))
        }
        Scalar::Bool(b) => Err(QueryError::invalid_date(b, "booleans cannot be dates")),
    }
}

fn parse_date(input: &str) -> Result<DateTime<Utc>, QueryError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| QueryError::invalid_date(format!("'{}'", input), "unrecognized date format"))
}

fn to_extended_json(dt: DateTime<Utc>) -> Value {
    json!({ "$date": dt.to_rfc3339_opts(SecondsFormat::Millis, true) })
}
