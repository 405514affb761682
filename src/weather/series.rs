//! The validated `daily` object of an archive API response.

use crate::types::daily_variable::DailyVariable;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Daily arrays returned by the archive API, one entry per calendar day.
///
/// A `DailySeries` is only produced by [`crate::validate`], which guarantees that
/// every array is present, non-empty and holds values of the right type. It does
/// *not* guarantee that the arrays share a length; [`crate::reshape`] checks that.
///
/// Numbers are kept as the API wrote them (`0` stays `0`, not `0.0`), so
/// serializing a `DailySeries` yields the same JSON object the API sent, restricted
/// to the four required arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// ISO dates (`YYYY-MM-DD`).
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_mean")]
    pub temperature_mean: Vec<Number>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation_sum: Vec<Number>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Vec<Number>,
}

impl DailySeries {
    /// The raw numbers recorded for one variable.
    pub fn numbers(&self, variable: DailyVariable) -> &[Number] {
        match variable {
            DailyVariable::TemperatureMean => &self.temperature_mean,
            DailyVariable::PrecipitationSum => &self.precipitation_sum,
            DailyVariable::WindSpeedMax => &self.wind_speed_max,
        }
    }

    /// The values recorded for one variable, as `f64`.
    pub fn values(&self, variable: DailyVariable) -> Vec<f64> {
        self.numbers(variable)
            .iter()
            .map(|n| n.as_f64().unwrap_or(f64::NAN))
            .collect()
    }

    /// Number of days, taken from the `time` array.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_and_float_numbers_read_as_f64() {
        let series: DailySeries = serde_json::from_value(json!({
            "time": ["2010-01-01", "2010-01-02"],
            "temperature_2m_mean": [10.5, 12],
            "precipitation_sum": [0, 1],
            "wind_speed_10m_max": [3.0, 5.0],
        }))
        .unwrap();

        assert_eq!(series.values(DailyVariable::TemperatureMean), vec![10.5, 12.0]);
        assert_eq!(series.values(DailyVariable::PrecipitationSum), vec![0.0, 1.0]);
        assert_eq!(series.numbers(DailyVariable::PrecipitationSum)[0], Number::from(0));
    }
}
