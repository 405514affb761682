//! Defines the daily variables requested from the archive API and how they map
//! onto observation table columns.

use std::fmt;

/// Name of the date array in the `daily` payload object.
pub const TIME_FIELD: &str = "time";

/// Name of the date column in observation tables.
pub const DATE_COLUMN: &str = "date";

/// A numeric daily variable requested from the archive API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyVariable {
    /// Mean air temperature at 2 m, in °C.
    TemperatureMean,
    /// Daily precipitation sum, in mm.
    PrecipitationSum,
    /// Maximum wind speed at 10 m.
    WindSpeedMax,
}

impl DailyVariable {
    pub const fn all() -> &'static [DailyVariable] {
        &[
            DailyVariable::TemperatureMean,
            DailyVariable::PrecipitationSum,
            DailyVariable::WindSpeedMax,
        ]
    }

    /// The variable name used by the API, both in the query and in the payload.
    pub fn api_name(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMean => "temperature_2m_mean",
            DailyVariable::PrecipitationSum => "precipitation_sum",
            DailyVariable::WindSpeedMax => "wind_speed_10m_max",
        }
    }

    /// The column this variable becomes in an observation table.
    pub fn column_name(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMean => "temperature",
            DailyVariable::PrecipitationSum => "precipitation",
            DailyVariable::WindSpeedMax => "wind_speed",
        }
    }

    /// Human readable axis label.
    pub fn label(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMean => "Temperature (°C)",
            DailyVariable::PrecipitationSum => "Precipitation (mm)",
            DailyVariable::WindSpeedMax => "Wind Speed (m/s)",
        }
    }

    /// Comma-joined list of API names, as sent in the `daily` query parameter.
    pub fn query_list(variables: &[DailyVariable]) -> String {
        variables
            .iter()
            .map(DailyVariable::api_name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for DailyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_list_joins_api_names_in_order() {
        assert_eq!(
            DailyVariable::query_list(DailyVariable::all()),
            "temperature_2m_mean,precipitation_sum,wind_speed_10m_max"
        );
    }

    #[test]
    fn display_uses_api_name() {
        assert_eq!(DailyVariable::WindSpeedMax.to_string(), "wind_speed_10m_max");
    }
}
