//! HTTP access to the Open-Meteo historical archive.

use crate::types::daily_variable::DailyVariable;
use crate::types::location::LatLon;
use crate::types::period::DateRange;
use crate::weather::error::WeatherError;
use crate::weather::series::DailySeries;
use crate::weather::validator::validate;
use bon::bon;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEZONE: &str = "Europe/Madrid";

/// Sends a single GET request and decodes the body as JSON.
///
/// Any transport problem (connection failure, timeout, non-2xx status, body that is
/// not JSON) is returned as a [`WeatherError`]; the request is never retried.
pub async fn fetch_json<P>(http: &Client, endpoint: &str, params: &P) -> Result<Value, WeatherError>
where
    P: Serialize + ?Sized,
{
    debug!("Requesting {}", endpoint);

    let response = http
        .get(endpoint)
        .query(params)
        .send()
        .await
        .map_err(|e| WeatherError::NetworkRequest(endpoint.to_string(), e))?;

    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", endpoint, e);
            return Err(if let Some(status) = e.status() {
                WeatherError::HttpStatus {
                    url: endpoint.to_string(),
                    status,
                    source: e,
                }
            } else {
                WeatherError::NetworkRequest(endpoint.to_string(), e)
            });
        }
    };

    response
        .json::<Value>()
        .await
        .map_err(|e| WeatherError::JsonDecode(endpoint.to_string(), e))
}

/// Client for the archive API.
///
/// Holds one `reqwest::Client` for the whole run; construct it once and pass it by
/// reference to whatever needs weather data.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    endpoint: String,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_endpoint(ARCHIVE_URL)
    }

    /// Uses a different archive endpoint, e.g. a local mock server.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl OpenMeteoClient {
    /// Fetches and validates the daily series for one location.
    ///
    /// Starts a builder; `period` is required, `timezone` defaults to
    /// [`DEFAULT_TIMEZONE`].
    ///
    /// # Errors
    ///
    /// Transport variants of [`WeatherError`] if the request fails, and
    /// [`WeatherError::Schema`] if the payload does not match the daily schema.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use meteo_eda::{DateRange, LatLon, OpenMeteoClient, WeatherError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = OpenMeteoClient::new();
    /// let period = DateRange::new(
    ///     NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2010, 12, 31).unwrap(),
    /// )?;
    /// let series = client
    ///     .daily_series(LatLon(40.416775, -3.703790))
    ///     .period(period)
    ///     .call()
    ///     .await?;
    /// println!("{} days", series.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = daily_series)]
    #[doc(hidden)]
    pub async fn build_daily_series(
        &self,
        #[builder(start_fn)] location: LatLon,
        period: DateRange,
        timezone: Option<&str>,
    ) -> Result<DailySeries, WeatherError> {
        let params = [
            ("latitude", location.latitude().to_string()),
            ("longitude", location.longitude().to_string()),
            ("start_date", DateRange::format_bound(period.start())),
            ("end_date", DateRange::format_bound(period.end())),
            ("daily", DailyVariable::query_list(DailyVariable::all())),
            ("timezone", timezone.unwrap_or(DEFAULT_TIMEZONE).to_string()),
        ];

        let payload = fetch_json(&self.http, &self.endpoint, &params).await?;
        let series = validate(&payload)?;
        info!(
            "Received {} days for ({}, {}) over {}",
            series.len(),
            location.latitude(),
            location.longitude(),
            period
        );
        Ok(series)
    }
}
