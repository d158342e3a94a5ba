//! FRED macro-data connector.
//!
//! Fetches observations for a macroeconomic series (CPI, unemployment rate,
//! yield spreads) from the FRED `series/observations` endpoint. The API key
//! is read from the `FRED_API_KEY` environment variable by the connector —
//! the pipeline core never sees it.
//!
//! FRED reports missing readings as the literal string `"."`; those map to
//! the explicit missing marker, never to zero.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, FetchResult, SeriesProvider, SourceKind};
use crate::domain::RawObservation;

/// Environment variable holding the FRED API key.
pub const API_KEY_ENV: &str = "FRED_API_KEY";

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

/// FRED macro-data provider.
pub struct FredProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    api_key: String,
    max_retries: u32,
    base_delay: Duration,
}

impl FredProvider {
    pub fn new(api_key: impl Into<String>, circuit_breaker: Arc<CircuitBreaker>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            circuit_breaker,
            api_key: api_key.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Build a provider with the API key from `FRED_API_KEY`.
    pub fn from_env(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(Self::new(key, circuit_breaker)),
            _ => Err(DataError::AuthenticationRequired(format!(
                "set {API_KEY_ENV} to use the FRED connector"
            ))),
        }
    }

    fn observations_url(&self, series_id: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "https://api.stlouisfed.org/fred/series/observations\
             ?series_id={series_id}&api_key={}&file_type=json\
             &observation_start={start}&observation_end={end}",
            self.api_key
        )
    }

    /// Parse the observations response.
    ///
    /// Dates stay as the raw strings FRED emitted; the cleaner owns date
    /// parsing. `"."` and anything non-numeric become missing values.
    fn parse_response(resp: ObservationsResponse) -> Vec<RawObservation> {
        resp.observations
            .into_iter()
            .map(|o| {
                let value = match o.value.as_str() {
                    "." => None,
                    s => s.parse::<f64>().ok(),
                };
                RawObservation::new(o.date, value)
            })
            .collect()
    }

    fn fetch_with_retry(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawObservation>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = self.observations_url(series_id, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        self.circuit_breaker.trip();
                        return Err(DataError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: 60,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::BAD_REQUEST {
                        // FRED answers 400 for unknown series ids and bad keys
                        return Err(DataError::SeriesNotFound {
                            series: series_id.to_string(),
                        });
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error =
                            Some(DataError::Other(format!("HTTP {status} for {series_id}")));
                        continue;
                    }

                    let parsed: ObservationsResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {series_id}: {e}"
                        ))
                    })?;

                    self.circuit_breaker.record_success();
                    return Ok(Self::parse_response(parsed));
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl SeriesProvider for FredProvider {
    fn name(&self) -> &str {
        "fred"
    }

    fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let observations = self.fetch_with_retry(series_id, start, end)?;
        Ok(FetchResult {
            series_id: series_id.to_string(),
            observations,
            source: SourceKind::Fred,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_dot_to_missing() {
        let resp = ObservationsResponse {
            observations: vec![
                FredObservation {
                    date: "2024-01-01".into(),
                    value: "308.417".into(),
                },
                FredObservation {
                    date: "2024-02-01".into(),
                    value: ".".into(),
                },
            ],
        };
        let obs = FredProvider::parse_response(resp);
        assert_eq!(obs[0].value, Some(308.417));
        assert_eq!(obs[1].value, None);
        assert_eq!(obs[1].date, "2024-02-01");
    }

    #[test]
    fn parse_keeps_unparseable_values_as_missing() {
        let resp = ObservationsResponse {
            observations: vec![FredObservation {
                date: "2024-01-01".into(),
                value: "n/a".into(),
            }],
        };
        let obs = FredProvider::parse_response(resp);
        assert_eq!(obs[0].value, None);
    }

    #[test]
    fn observations_url_carries_window() {
        let provider = FredProvider::new("testkey", Arc::new(CircuitBreaker::default_provider()));
        let url = provider.observations_url(
            "CPIAUCSL",
            NaiveDate::from_ymd_opt(2004, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        );
        assert!(url.contains("series_id=CPIAUCSL"));
        assert!(url.contains("observation_start=2004-01-02"));
        assert!(url.contains("observation_end=2020-12-31"));
        assert!(url.contains("file_type=json"));
    }
}
