use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analyzers::types::Reading;

// Rothfusz regression coefficients.
const C1: f64 = -42.379;
const C2: f64 = 2.04901523;
const C3: f64 = 10.14333127;
const C4: f64 = -0.22475541;
const C5: f64 = -0.0068783;
const C6: f64 = -0.05481717;
const C7: f64 = 0.00122874;
const C8: f64 = 0.00085282;
const C9: f64 = -0.00000199;

/// Scoring formula that collapses a temperature/humidity reading into one scalar.
///
/// | Formula             | Score                                  |
/// |---------------------|----------------------------------------|
/// | `mean`              | `(T + RH) / 2`                         |
/// | `heat_index`        | full Rothfusz regression over T and RH |
/// | `simple_heat_index` | `T + 0.33 * RH - 0.7`                  |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    #[value(name = "mean")]
    Mean,
    #[value(name = "heat_index")]
    HeatIndex,
    #[value(name = "simple_heat_index")]
    SimpleHeatIndex,
}

impl Formula {
    /// Every formula, in the order output directories are produced.
    pub const ALL: [Formula; 3] = [Formula::Mean, Formula::HeatIndex, Formula::SimpleHeatIndex];

    pub fn apply(self, reading: Reading) -> f64 {
        let t = reading.temperature;
        let rh = reading.humidity;
        match self {
            Formula::Mean => (t + rh) / 2.0,
            Formula::HeatIndex => {
                C1 + C2 * t
                    + C3 * rh
                    + C4 * t * rh
                    + C5 * t.powi(2)
                    + C6 * rh.powi(2)
                    + C7 * t.powi(2) * rh
                    + C8 * t * rh.powi(2)
                    + C9 * t.powi(2) * rh.powi(2)
            }
            Formula::SimpleHeatIndex => t + 0.33 * rh - 0.7,
        }
    }

    /// Name used for the output subdirectory.
    pub fn as_str(self) -> &'static str {
        match self {
            Formula::Mean => "mean",
            Formula::HeatIndex => "heat_index",
            Formula::SimpleHeatIndex => "simple_heat_index",
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, humidity: f64) -> Reading {
        Reading {
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_mean_of_temperature_and_humidity() {
        assert_eq!(Formula::Mean.apply(reading(20.0, 60.0)), 40.0);
        assert_eq!(Formula::Mean.apply(reading(-4.0, 4.0)), 0.0);
    }

    #[test]
    fn test_simple_heat_index_known_values() {
        let cases = [
            (reading(30.0, 50.0), 45.8),
            (reading(25.0, 60.0), 44.1),
            (reading(20.0, 80.0), 45.7),
        ];
        for (r, expected) in cases {
            let hi = Formula::SimpleHeatIndex.apply(r);
            assert!((hi - expected).abs() < 1e-9, "{r:?} -> {hi}, want {expected}");
        }
    }

    #[test]
    fn test_heat_index_at_origin_is_first_coefficient() {
        assert_eq!(Formula::HeatIndex.apply(reading(0.0, 0.0)), C1);
    }

    #[test]
    fn test_heat_index_matches_expanded_regression() {
        let (t, rh) = (90.0_f64, 40.0_f64);
        let expected = -42.379 + 2.04901523 * t + 10.14333127 * rh
            - 0.22475541 * t * rh
            - 0.0068783 * t * t
            - 0.05481717 * rh * rh
            + 0.00122874 * t * t * rh
            + 0.00085282 * t * rh * rh
            - 0.00000199 * t * t * rh * rh;
        let hi = Formula::HeatIndex.apply(reading(t, rh));
        assert!((hi - expected).abs() < 1e-9);
        // published NWS table value for 90 F / 40 % is 91 F
        assert!((hi - 91.0).abs() < 1.0);
    }

    #[test]
    fn test_formula_names() {
        assert_eq!(Formula::Mean.to_string(), "mean");
        assert_eq!(Formula::HeatIndex.to_string(), "heat_index");
        assert_eq!(Formula::SimpleHeatIndex.to_string(), "simple_heat_index");
        let parsed: Formula = serde_json::from_str("\"simple_heat_index\"").unwrap();
        assert_eq!(parsed, Formula::SimpleHeatIndex);
    }
}
