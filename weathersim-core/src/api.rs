use crate::{
    Config, SimulationError, SimulationRequest, SimulationResponse, WeatherOptions,
    WeatherSnapshot, api::http::HttpSimulatorApi,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

pub const SIMULATE_PATH: &str = "/api/simulate";
pub const WEATHER_OPTIONS_PATH: &str = "/api/weather-options";
pub const CURRENT_WEATHER_PATH: &str = "/api/current-weather";

/// Backend that runs simulations and knows the manipulation types.
///
/// Only the response body governs the outcome; status codes are not part of
/// the contract.
#[async_trait]
pub trait SimulatorApi: Send + Sync + Debug {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, SimulationError>;

    async fn weather_options(&self) -> Result<WeatherOptions, SimulationError>;

    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, SimulationError>;
}

#[async_trait]
impl<T: SimulatorApi + ?Sized> SimulatorApi for Box<T> {
    async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, SimulationError> {
        (**self).simulate(request).await
    }

    async fn weather_options(&self) -> Result<WeatherOptions, SimulationError> {
        (**self).weather_options().await
    }

    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, SimulationError> {
        (**self).current_weather(city).await
    }
}

/// Construct the HTTP backend client from config.
pub fn api_from_config(
    config: &Config,
    base_url_override: Option<&str>,
) -> anyhow::Result<Box<dyn SimulatorApi>> {
    let base_url = config.resolve_base_url(base_url_override);
    let api = HttpSimulatorApi::new(&base_url)?;

    Ok(Box::new(api))
}
