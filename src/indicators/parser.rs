use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::indicators::error::IndicatorError;
use crate::indicators::validation::validate_prediction;
use crate::models::indicators::{Candle, PriceWindow};
use crate::models::signal::ExternalPrediction;

pub const REQUIRED_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];
pub const TIMESTAMP_COLUMN: &str = "timestamp";

fn normalize_keys<V: Clone>(data: &HashMap<String, V>) -> HashMap<String, V> {
    data.iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}

fn parse_timestamp_millis(value: f64) -> Result<DateTime<Utc>, IndicatorError> {
    let invalid = || IndicatorError::InvalidNumericValue {
        field: TIMESTAMP_COLUMN.to_string(),
        value,
    };
    if !value.is_finite() {
        return Err(invalid());
    }
    DateTime::from_timestamp_millis(value as i64).ok_or_else(invalid)
}

/// Build a price window from column vectors (`open`, `high`, `low`, `close`,
/// `volume`, optional `timestamp` in epoch milliseconds).
///
/// Column names are matched case-insensitively.
pub fn parse_price_window(
    columns: &HashMap<String, Vec<f64>>,
) -> Result<PriceWindow, IndicatorError> {
    let columns = normalize_keys(columns);

    let mut required = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        let column = columns
            .get(name)
            .ok_or_else(|| IndicatorError::MissingColumn(name.to_string()))?;
        required.push(column);
    }

    let expected = required[0].len();
    for (name, column) in REQUIRED_COLUMNS.iter().zip(&required) {
        if column.len() != expected {
            return Err(IndicatorError::ColumnLengthMismatch {
                column: name.to_string(),
                expected,
                actual: column.len(),
            });
        }
    }

    let timestamps = match columns.get(TIMESTAMP_COLUMN) {
        Some(ts) if ts.len() != expected => {
            return Err(IndicatorError::ColumnLengthMismatch {
                column: TIMESTAMP_COLUMN.to_string(),
                expected,
                actual: ts.len(),
            })
        }
        Some(ts) => Some(
            ts.iter()
                .map(|&v| parse_timestamp_millis(v))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    let candles = (0..expected)
        .map(|i| {
            let candle = Candle::new(
                required[0][i],
                required[1][i],
                required[2][i],
                required[3][i],
                required[4][i],
            );
            match &timestamps {
                Some(ts) => candle.with_timestamp(ts[i]),
                None => candle,
            }
        })
        .collect();

    PriceWindow::new(candles)
}

fn row_field(row: &serde_json::Map<String, Value>, name: &str) -> Result<Option<f64>, IndicatorError> {
    let value = row
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v);
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
            IndicatorError::InvalidNumericValue {
                field: name.to_string(),
                value: f64::NAN,
            }
        }),
    }
}

/// Build a price window from JSON: either an object of columns or an array
/// of bar objects.
pub fn parse_price_window_json(value: &Value) -> Result<PriceWindow, IndicatorError> {
    match value {
        Value::Object(map) => {
            let mut columns = HashMap::with_capacity(REQUIRED_COLUMNS.len() + 1);
            for (key, column) in map {
                let name = key.to_lowercase();
                if name == TIMESTAMP_COLUMN || REQUIRED_COLUMNS.contains(&name.as_str()) {
                    columns.insert(name.clone(), numeric_column(&name, column)?);
                }
            }
            parse_price_window(&columns)
        }
        Value::Array(rows) => {
            let mut candles = Vec::with_capacity(rows.len());
            for row in rows {
                let row = row.as_object().ok_or_else(|| {
                    IndicatorError::InvalidFormat("each bar must be an object".to_string())
                })?;
                let mut fields = [0.0; 5];
                for (slot, name) in fields.iter_mut().zip(REQUIRED_COLUMNS) {
                    *slot = row_field(row, name)?
                        .ok_or_else(|| IndicatorError::MissingColumn(name.to_string()))?;
                }
                let candle = Candle::new(fields[0], fields[1], fields[2], fields[3], fields[4]);
                let candle = match row_field(row, TIMESTAMP_COLUMN)? {
                    Some(ts) => candle.with_timestamp(parse_timestamp_millis(ts)?),
                    None => candle,
                };
                candles.push(candle);
            }
            PriceWindow::new(candles)
        }
        _ => Err(IndicatorError::InvalidFormat(
            "expected an object of columns or an array of bars".to_string(),
        )),
    }
}

/// Numeric column from JSON; other keys of the body are ignored by the caller
fn numeric_column(name: &str, column: &Value) -> Result<Vec<f64>, IndicatorError> {
    let values = column.as_array().ok_or_else(|| {
        IndicatorError::InvalidFormat(format!("column {name} must be an array of numbers"))
    })?;
    values
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| IndicatorError::InvalidNumericValue {
                field: name.to_string(),
                value: f64::NAN,
            })
        })
        .collect()
}

pub fn parse_prediction(prediction: ExternalPrediction) -> Result<ExternalPrediction, IndicatorError> {
    validate_prediction(&prediction)?;
    Ok(prediction)
}

/// Deserialize and validate a prediction from raw JSON
pub fn parse_prediction_json(value: &Value) -> Result<ExternalPrediction, IndicatorError> {
    let prediction: ExternalPrediction = serde_json::from_value(value.clone())
        .map_err(|e| IndicatorError::InvalidPrediction(e.to_string()))?;
    parse_prediction(prediction)
}
