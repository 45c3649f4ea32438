//! HTTP clients: the project backend and the Open-Meteo weather service.

pub mod backend;
pub mod error;
pub mod weather;

pub use backend::BackendClient;
pub use error::RemoteError;
pub use reqwest::Url;
pub use weather::{DailyWeather, Location, Metric, WeatherClient, WeatherMap, WeatherWindows};
