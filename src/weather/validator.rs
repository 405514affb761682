//! Shape check for archive API payloads.

use crate::types::daily_variable::{DailyVariable, TIME_FIELD};
use crate::weather::error::SchemaError;
use crate::weather::series::DailySeries;
use serde_json::{Map, Number, Value};

/// Top-level key holding the daily arrays.
pub const DAILY_FIELD: &str = "daily";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemType {
    String,
    Number,
}

impl ItemType {
    fn name(self) -> &'static str {
        match self {
            ItemType::String => "string",
            ItemType::Number => "number",
        }
    }
}

/// Required arrays of the `daily` object and their item types. Every array needs at
/// least one item. Lengths are not compared with each other.
const DAILY_SCHEMA: [(&str, ItemType); 4] = [
    (TIME_FIELD, ItemType::String),
    ("temperature_2m_mean", ItemType::Number),
    ("precipitation_sum", ItemType::Number),
    ("wind_speed_10m_max", ItemType::Number),
];

/// Checks a decoded payload against the daily schema and extracts the series.
///
/// # Errors
///
/// Returns a [`SchemaError`] naming the first violation found: a payload that is
/// not an object, a missing or non-object `daily` key, a missing required array,
/// an empty array, or an item of the wrong type (`null` included).
///
/// # Examples
///
/// ```
/// use meteo_eda::validate;
/// use serde_json::json;
///
/// let payload = json!({
///     "daily": {
///         "time": ["2010-01-01"],
///         "temperature_2m_mean": [10.0],
///         "precipitation_sum": [0.5],
///         "wind_speed_10m_max": [3.0],
///     }
/// });
/// let series = validate(&payload).unwrap();
/// assert_eq!(series.len(), 1);
/// ```
pub fn validate(payload: &Value) -> Result<DailySeries, SchemaError> {
    let object = payload.as_object().ok_or(SchemaError::NotAnObject)?;
    let daily = object
        .get(DAILY_FIELD)
        .ok_or(SchemaError::MissingDaily)?
        .as_object()
        .ok_or(SchemaError::DailyNotAnObject)?;

    for (field, item_type) in DAILY_SCHEMA {
        check_array(daily, field, item_type)?;
    }

    Ok(DailySeries {
        time: string_array(daily, TIME_FIELD)?,
        temperature_mean: number_array(daily, DailyVariable::TemperatureMean.api_name())?,
        precipitation_sum: number_array(daily, DailyVariable::PrecipitationSum.api_name())?,
        wind_speed_max: number_array(daily, DailyVariable::WindSpeedMax.api_name())?,
    })
}

fn required_array<'a>(daily: &'a Map<String, Value>, field: &str) -> Result<&'a [Value], SchemaError> {
    daily
        .get(field)
        .ok_or_else(|| SchemaError::MissingArray(field.to_string()))?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| SchemaError::NotAnArray(field.to_string()))
}

fn check_array(daily: &Map<String, Value>, field: &str, item_type: ItemType) -> Result<(), SchemaError> {
    let items = required_array(daily, field)?;
    if items.is_empty() {
        return Err(SchemaError::EmptyArray(field.to_string()));
    }
    let mismatch = items.iter().position(|item| match item_type {
        ItemType::String => !item.is_string(),
        ItemType::Number => !item.is_number(),
    });
    match mismatch {
        Some(index) => Err(SchemaError::WrongItemType {
            field: field.to_string(),
            index,
            expected: item_type.name(),
        }),
        None => Ok(()),
    }
}

fn string_array(daily: &Map<String, Value>, field: &str) -> Result<Vec<String>, SchemaError> {
    required_array(daily, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().map(str::to_owned).ok_or(SchemaError::WrongItemType {
                field: field.to_string(),
                index,
                expected: ItemType::String.name(),
            })
        })
        .collect()
}

fn number_array(daily: &Map<String, Value>, field: &str) -> Result<Vec<Number>, SchemaError> {
    required_array(daily, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_number().cloned().ok_or(SchemaError::WrongItemType {
                field: field.to_string(),
                index,
                expected: ItemType::Number.name(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "latitude": 40.4,
            "daily_units": { "time": "iso8601" },
            "daily": {
                "time": ["2010-01-01", "2010-01-02"],
                "temperature_2m_mean": [10.0, 12.0],
                "precipitation_sum": [0.5, 1.0],
                "wind_speed_10m_max": [3.0, 5.0],
            }
        })
    }

    #[test]
    fn returns_daily_object_unchanged() {
        let payload = valid_payload();
        let series = validate(&payload).unwrap();
        assert_eq!(serde_json::to_value(&series).unwrap(), payload["daily"]);
    }

    #[test]
    fn rejects_missing_daily() {
        let payload = json!({ "hourly": {} });
        assert_eq!(validate(&payload), Err(SchemaError::MissingDaily));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert_eq!(validate(&json!([1, 2])), Err(SchemaError::NotAnObject));
        assert_eq!(validate(&json!({ "daily": [] })), Err(SchemaError::DailyNotAnObject));
    }

    #[test]
    fn rejects_empty_array() {
        let payload = json!({
            "daily": {
                "time": ["2010-01-01", "2010-01-02"],
                "temperature_2m_mean": [10.0],
                "precipitation_sum": [0.5],
                "wind_speed_10m_max": [],
            }
        });
        assert_eq!(
            validate(&payload),
            Err(SchemaError::EmptyArray("wind_speed_10m_max".to_string()))
        );
    }

    #[test]
    fn rejects_missing_required_array() {
        let mut payload = valid_payload();
        payload["daily"]
            .as_object_mut()
            .unwrap()
            .remove("precipitation_sum");
        assert_eq!(
            validate(&payload),
            Err(SchemaError::MissingArray("precipitation_sum".to_string()))
        );
    }

    #[test]
    fn rejects_wrong_item_type() {
        let mut payload = valid_payload();
        payload["daily"]["temperature_2m_mean"] = json!([10.0, null]);
        assert_eq!(
            validate(&payload),
            Err(SchemaError::WrongItemType {
                field: "temperature_2m_mean".to_string(),
                index: 1,
                expected: "number",
            })
        );

        let mut payload = valid_payload();
        payload["daily"]["time"] = json!([20100101, "2010-01-02"]);
        assert!(matches!(
            validate(&payload),
            Err(SchemaError::WrongItemType { index: 0, .. })
        ));
    }

    #[test]
    fn accepts_unequal_lengths() {
        let payload = json!({
            "daily": {
                "time": ["2010-01-01", "2010-01-02"],
                "temperature_2m_mean": [10.0],
                "precipitation_sum": [0.5, 1.0],
                "wind_speed_10m_max": [3.0, 5.0],
            }
        });
        let series = validate(&payload).unwrap();
        assert_eq!(series.temperature_mean.len(), 1);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn integer_numbers_round_trip_unchanged() {
        let mut payload = valid_payload();
        payload["daily"]["precipitation_sum"] = json!([0, 1]);
        payload["daily"]["temperature_2m_mean"] = json!([-3, 12.5]);

        let series = validate(&payload).unwrap();

        assert_eq!(serde_json::to_value(&series).unwrap(), payload["daily"]);
        assert_eq!(
            series.values(DailyVariable::PrecipitationSum),
            vec![0.0, 1.0]
        );
    }
}
