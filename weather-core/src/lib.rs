//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetch layer behind the `WeatherProvider` seam
//! - Daily and hourly forecast view models
//! - The dashboard's screen state machine
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::{LookupError, PLACE_NOT_FOUND_MESSAGE};
pub use forecast::{DailyAggregate, Dashboard, daily_forecast, hourly_forecast, round_temp};
pub use model::{Condition, CurrentConditions, ForecastSample, SearchQuery, Units, WeatherReport};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use session::{SearchTicket, Session, UiState, search};
