//! Weather tools module.
//!
//! - `table`: the static city → weather lookup table
//! - `get_weather`: the `get_weather` tool backed by that table

pub mod get_weather;
pub mod table;

pub use get_weather::{GetWeatherParams, GetWeatherTool};
pub use table::{Condition, WeatherReport, WeatherTable};
