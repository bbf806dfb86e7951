//! Scenario loading
//!
//! A scenario file is a JSON list of named core layouts. Each layout map is a
//! row-major grid of slot indices with `null` for empty positions.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{FuelError, FuelResult};
use crate::layout::CoreLayout;

/// Locations tried by `Scenario::load_default`
const SCENARIO_PATHS: [&str; 2] = ["config/scenarios.json", "../config/scenarios.json"];

/// Side length of the generated fallback core
pub const FALLBACK_SIDE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLayout {
    pub map: Vec<Vec<Option<usize>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub layout: ScenarioLayout,
}

impl Scenario {
    pub fn load_many_from_file(path: impl AsRef<Path>) -> FuelResult<Vec<Scenario>> {
        let contents = fs::read_to_string(path.as_ref())?;
        let scenarios: Vec<Scenario> = serde_json::from_str(&contents)?;
        info!("Loaded {} scenario(s) from {}", scenarios.len(), path.as_ref().display());
        Ok(scenarios)
    }

    /// Scenarios from the first readable config path, or the generated fallback.
    pub fn load_default() -> Vec<Scenario> {
        for path in SCENARIO_PATHS {
            match Self::load_many_from_file(path) {
                Ok(scenarios) if !scenarios.is_empty() => return scenarios,
                Ok(_) => warn!("Scenario file {path} is empty"),
                Err(FuelError::Io(_)) => {}
                Err(e) => warn!("Could not parse {path}: {e}"),
            }
        }
        warn!("No scenario file found, using fallback circular core");
        vec![Self::fallback(FALLBACK_SIDE)]
    }

    /// Circular core inscribed in a `side`×`side` square, slots numbered row-major.
    ///
    /// The disc is centered on the grid so it maps onto itself under rotation.
    pub fn fallback(side: usize) -> Scenario {
        let center = (side as f64 - 1.0) / 2.0;
        let radius = side as f64 / 2.0;
        let mut next_slot = 0;
        let map = (0..side)
            .map(|r| {
                (0..side)
                    .map(|c| {
                        let (dr, dc) = (r as f64 - center, c as f64 - center);
                        if dr * dr + dc * dc <= radius * radius {
                            next_slot += 1;
                            Some(next_slot - 1)
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .collect();
        Scenario {
            name: format!("Fallback {side}x{side} circular core"),
            layout: ScenarioLayout { map },
        }
    }

    /// Parsed and symmetry-checked layout
    pub fn core_layout(&self) -> FuelResult<CoreLayout> {
        let layout = CoreLayout::parse(&self.layout.map)?;
        layout.check_symmetry()?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridPos;

    #[test]
    fn test_fallback_is_symmetric() {
        for side in 1..=9 {
            let scenario = Scenario::fallback(side);
            let layout = scenario.core_layout().unwrap_or_else(|e| panic!("side {side}: {e}"));
            assert_eq!(layout.shape(), (side, side));
            assert!(layout.number_of_fuel_slots() > 0);
        }
    }

    #[test]
    fn test_fallback_trims_corners() {
        let layout = Scenario::fallback(FALLBACK_SIDE).core_layout().unwrap();
        assert!(!layout.is_fuel(GridPos::new(0, 0)));
        assert!(layout.is_fuel(GridPos::new(2, 2)));
    }

    #[test]
    fn test_parse_scenario_json() {
        let json = r#"[
            { "name": "tiny", "layout": { "map": [[null, 0, null], [1, 2, 3], [null, 4, null]] } },
            { "layout": { "map": [[0]] } }
        ]"#;
        let scenarios: Vec<Scenario> = serde_json::from_str(json).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "tiny");
        assert_eq!(scenarios[1].name, "");
        assert_eq!(scenarios[0].core_layout().unwrap().number_of_fuel_slots(), 5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Scenario::load_many_from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, FuelError::Io(_)), "{err}");
    }

    #[test]
    fn test_asymmetric_scenario_rejected() {
        let scenario = Scenario {
            name: "lopsided".into(),
            layout: ScenarioLayout { map: vec![vec![Some(0), None], vec![Some(1), Some(2)]] },
        };
        assert!(matches!(scenario.core_layout(), Err(FuelError::SymmetryViolation { .. })));
    }
}
