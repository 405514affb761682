//! Runs fetch → validate → reshape → aggregate → plot for each city.

use crate::report::RunReport;
use crate::types::location::City;
use crate::types::period::DateRange;
use crate::weather::aggregator::aggregate_monthly;
use crate::weather::error::WeatherError;
use crate::weather::fetcher::{OpenMeteoClient, DEFAULT_TIMEZONE};
use crate::weather::plot::plot_monthly;
use crate::weather::reshaper::reshape;
use log::info;
use std::path::{Path, PathBuf};

/// What processing one city produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CityOutcome {
    pub city: String,
    pub days: usize,
    pub months: usize,
    /// `None` when there was nothing to plot.
    pub chart: Option<PathBuf>,
}

/// The weather pipeline for one period, sharing a single API client across cities.
pub struct WeatherPipeline<'a> {
    client: &'a OpenMeteoClient,
    period: DateRange,
    timezone: String,
    out_dir: PathBuf,
}

impl<'a> WeatherPipeline<'a> {
    pub fn new(client: &'a OpenMeteoClient, period: DateRange, out_dir: &Path) -> Self {
        Self {
            client,
            period,
            timezone: DEFAULT_TIMEZONE.to_string(),
            out_dir: out_dir.to_path_buf(),
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Processes one city end to end.
    pub async fn process_city(&self, city: &City) -> Result<CityOutcome, WeatherError> {
        info!("Fetching data for {}...", city.name);
        let series = self
            .client
            .daily_series(city.location)
            .period(self.period)
            .timezone(&self.timezone)
            .call()
            .await?;

        let table = reshape(&series)?;
        let aggregate = aggregate_monthly(&table)?;
        let chart = plot_monthly(&aggregate, city, &self.period, &self.out_dir)?;

        Ok(CityOutcome {
            city: city.name.clone(),
            days: table.height(),
            months: aggregate.height(),
            chart,
        })
    }

    /// Processes every city in order. A failing city is recorded and skipped.
    pub async fn run(&self, cities: &[City]) -> (RunReport, Vec<CityOutcome>) {
        let mut report = RunReport::new("weather");
        let mut outcomes = Vec::with_capacity(cities.len());

        for city in cities {
            match self.process_city(city).await {
                Ok(outcome) => {
                    report.record_success(&city.name);
                    outcomes.push(outcome);
                }
                Err(e) => report.record_failure(&city.name, e.kind(), &e),
            }
        }

        (report, outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::types::location::LatLon;
    use chrono::NaiveDate;
    use mockito::Matcher;
    use serde_json::json;

    fn period() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2010, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn failing_city_does_not_stop_the_run() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("latitude".into(), "1".into()))
            .with_status(200)
            .with_body(
                json!({
                    "daily": {
                        "time": ["2010-01-01", "2010-01-02"],
                        "temperature_2m_mean": [10.0, 12.0],
                        "precipitation_sum": [0.5, 1.0],
                        "wind_speed_10m_max": [3.0, 5.0],
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("latitude".into(), "2".into()))
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("latitude".into(), "3".into()))
            .with_status(200)
            .with_body(json!({ "hourly": {} }).to_string())
            .create_async()
            .await;

        let out = tempfile::tempdir().unwrap();
        let client = OpenMeteoClient::with_endpoint(server.url());
        let pipeline = WeatherPipeline::new(&client, period(), out.path());
        let cities = vec![
            City::new("Broken", LatLon(2.0, 0.0)),
            City::new("Good", LatLon(1.0, 0.0)),
            City::new("Shapeless", LatLon(3.0, 0.0)),
        ];

        let (report, outcomes) = pipeline.run(&cities).await;

        assert_eq!(report.completed(), ["Good".to_string()]);
        let kinds: Vec<_> = report
            .failures()
            .iter()
            .map(|f| (f.entity.as_str(), f.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Broken", FailureKind::Transport),
                ("Shapeless", FailureKind::Schema)
            ]
        );
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].days, 2);
        assert_eq!(outcomes[0].months, 1);
        assert!(outcomes[0].chart.as_ref().is_some_and(|p| p.exists()));
    }
}
