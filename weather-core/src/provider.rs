use crate::{
    Config, LookupError, SearchQuery, WeatherReport, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions and the forecast for `query` together.
    ///
    /// Either both succeed or the whole lookup fails.
    async fn lookup(&self, query: &SearchQuery) -> Result<WeatherReport, LookupError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned(), config.base_url(), config.units)))
}
