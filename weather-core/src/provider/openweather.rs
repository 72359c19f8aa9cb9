use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::LookupError,
    model::{Condition, CurrentConditions, ForecastSample, SearchQuery, Units, WeatherReport},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: impl Into<String>, units: Units) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            units,
            http: Client::new(),
        }
    }

    /// GET `{base_url}/{endpoint}` and decode the body.
    ///
    /// The error is the internal reason; callers fold it into `LookupError`.
    /// Reqwest errors carry the request URL, which includes `appid`; they are
    /// stripped of it before becoming part of the reason.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &SearchQuery,
    ) -> Result<T, String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "Requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                format!("Failed to send request to OpenWeather ({endpoint}): {e}")
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                let e = e.without_url();
                format!("Failed to read OpenWeather {endpoint} response body: {e}")
            })?;

        if !status.is_success() {
            return Err(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body)
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn first_condition(weather: Vec<OwWeather>) -> Condition {
    weather
        .into_iter()
        .next()
        .map(|w| Condition { id: w.id, main: w.main, description: w.description, icon: w.icon })
        .unwrap_or_else(Condition::unknown)
}

fn into_report(
    query: &SearchQuery,
    current: OwCurrentResponse,
    forecast: OwForecastResponse,
) -> Result<WeatherReport, LookupError> {
    let observation_time = unix_to_utc(current.dt).ok_or_else(|| {
        let reason = format!("invalid timestamp {}", current.dt);
        LookupError::place_lookup_failed(query.as_str(), reason)
    })?;

    let samples = forecast
        .list
        .into_iter()
        .map(|entry| {
            let time = unix_to_utc(entry.dt).ok_or_else(|| {
                LookupError::place_lookup_failed(
                    query.as_str(),
                    format!("invalid forecast timestamp {}", entry.dt),
                )
            })?;
            Ok(ForecastSample {
                time,
                temperature: entry.main.temp,
                condition: first_condition(entry.weather),
            })
        })
        .collect::<Result<Vec<_>, LookupError>>()?;

    Ok(WeatherReport {
        current: CurrentConditions {
            location_name: current.name,
            country: current.sys.country,
            observation_time,
            temperature: current.main.temp,
            feels_like: current.main.feels_like,
            humidity_pct: current.main.humidity,
            wind_speed: current.wind.speed,
            pressure_hpa: current.main.pressure,
            condition: first_condition(current.weather),
        },
        forecast: samples,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip_all, fields(place = %query))]
    async fn lookup(&self, query: &SearchQuery) -> Result<WeatherReport, LookupError> {
        let (current, forecast) = tokio::join!(
            self.fetch::<OwCurrentResponse>("weather", query),
            self.fetch::<OwForecastResponse>("forecast", query),
        );

        let (current, forecast) = match (current, forecast) {
            (Ok(current), Ok(forecast)) => (current, forecast),
            (Err(reason), _) | (_, Err(reason)) => {
                warn!(%reason, "Place lookup failed");
                return Err(LookupError::place_lookup_failed(query.as_str(), reason));
            }
        };

        let report = into_report(query, current, forecast).inspect_err(|err| {
            warn!(reason = err.reason(), "Place lookup failed");
        })?;

        info!(
            location = %report.current.location_name,
            samples = report.forecast.len(),
            "Place lookup succeeded"
        );

        Ok(report)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
