pub mod geocoding;
pub mod weather_api;
