//! Core library for the `weathersim` client.
//!
//! This crate defines:
//! - Configuration of the simulation backend
//! - The backend API abstraction and its HTTP client
//! - Shared domain models (requests, responses, options)
//! - The page abstraction and the form-driven simulation controller
//!
//! It is used by `weathersim-cli`, but any host that can implement [`View`]
//! can drive the controller.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod view;

pub use api::{SimulatorApi, api_from_config, http::HttpSimulatorApi};
pub use config::Config;
pub use controller::{PageState, SimulationController};
pub use error::SimulationError;
pub use model::{
    FormValues, SimulationRequest, SimulationResponse, SimulationResults, WeatherOption,
    WeatherOptions, WeatherSnapshot,
};
pub use render::format_text;
pub use view::{ElementId, PageEvent, SelectOption, View};
