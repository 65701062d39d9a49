//! Static weather lookup table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Weather condition reported for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    Rainy,
    Cloudy,
}

/// A single weather record, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub weather: Condition,
    pub temperature: i32,
}

/// Built-in records: city, condition, temperature in °C.
const BUILTIN_RECORDS: &[(&str, Condition, i32)] = &[
    ("東京", Condition::Sunny, 25),
    ("大阪", Condition::Sunny, 26),
    ("福岡", Condition::Sunny, 24),
    ("ロンドン", Condition::Rainy, 15),
    ("シアトル", Condition::Rainy, 14),
    ("パリ", Condition::Cloudy, 18),
    ("ニューヨーク", Condition::Cloudy, 20),
];

/// Read-only mapping from city name to weather record.
///
/// Keys are matched exactly; no case folding or trimming is applied.
#[derive(Debug, Clone)]
pub struct WeatherTable {
    records: HashMap<&'static str, (Condition, i32)>,
}

impl WeatherTable {
    /// Build the table from the built-in records.
    pub fn builtin() -> Self {
        Self {
            records: BUILTIN_RECORDS
                .iter()
                .map(|&(city, condition, temperature)| (city, (condition, temperature)))
                .collect(),
        }
    }

    /// Look up a city.
    pub fn lookup(&self, city: &str) -> Option<WeatherReport> {
        self.records
            .get_key_value(city)
            .map(|(&city, &(weather, temperature))| WeatherReport {
                city: city.to_string(),
                weather,
                temperature,
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for WeatherTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_size() {
        let table = WeatherTable::builtin();
        assert_eq!(table.len(), 7);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_lookup_hit() {
        let table = WeatherTable::builtin();
        assert_eq!(
            table.lookup("ロンドン"),
            Some(WeatherReport {
                city: "ロンドン".to_string(),
                weather: Condition::Rainy,
                temperature: 15,
            })
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = WeatherTable::builtin();
        assert_eq!(table.lookup("Tokyo"), None);
        assert_eq!(table.lookup(" 東京"), None);
        assert_eq!(table.lookup(""), None);
    }

    #[test]
    fn test_condition_serializes_lowercase() {
        let json = serde_json::to_string(&Condition::Cloudy).unwrap();
        assert_eq!(json, "\"cloudy\"");
    }
}
