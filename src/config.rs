//! Simulation parameters
//!
//! The values are fixed for the fuel-management simulator but kept in one
//! place (and overridable through `SimulationConfig`) so tests can vary them.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{FuelError, FuelResult};

/// Fixed parameters of the burnup model
pub mod constants {
    /// Oldest fuel generation a slot may hold [cycles]
    pub const MAX_AGE: u8 = 4;
    /// Age of a freshly loaded element
    pub const FRESH_FUEL_AGE: u8 = 0;
    /// Length of one operating cycle [years]
    pub const CYCLE_LENGTH: f64 = 1.0;
    /// Number of burnup steps per cycle (the sequence holds one more)
    pub const NUMBER_OF_STEPS: usize = 20;
    /// Raw smoothing weights, normalized once when the engine is built
    pub const RAW_KERNEL: [[f64; 3]; 3] = [
        [0.04, 0.08, 0.04],
        [0.08, 0.36, 0.08],
        [0.04, 0.08, 0.04],
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_max_age")]
    pub max_age: u8,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: f64,       // [years]
    #[serde(default = "default_number_of_steps")]
    pub number_of_steps: usize,
    #[serde(default = "default_raw_kernel")]
    pub raw_kernel: [[f64; 3]; 3],
}

fn default_max_age() -> u8 {
    constants::MAX_AGE
}
fn default_cycle_length() -> f64 {
    constants::CYCLE_LENGTH
}
fn default_number_of_steps() -> usize {
    constants::NUMBER_OF_STEPS
}
fn default_raw_kernel() -> [[f64; 3]; 3] {
    constants::RAW_KERNEL
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_age: default_max_age(),
            cycle_length: default_cycle_length(),
            number_of_steps: default_number_of_steps(),
            raw_kernel: default_raw_kernel(),
        }
    }
}

impl SimulationConfig {
    /// Burnup accumulated per step at unit power [years]
    pub fn burnup_step_size(&self) -> f64 {
        self.cycle_length / self.number_of_steps as f64
    }

    pub fn validate(&self) -> FuelResult<()> {
        if self.number_of_steps == 0 {
            return Err(FuelError::Config("number_of_steps must be at least 1".into()));
        }
        if !self.cycle_length.is_finite() || self.cycle_length <= 0.0 {
            return Err(FuelError::Config(format!(
                "cycle_length must be positive, got {}",
                self.cycle_length
            )));
        }
        let raw_sum: f64 = self.raw_kernel.iter().flatten().sum();
        if !raw_sum.is_finite() || raw_sum <= 0.0 {
            return Err(FuelError::Config(format!(
                "smoothing kernel weights must have a positive sum, got {raw_sum}"
            )));
        }
        Ok(())
    }
}

/// Scale the raw weights so they sum to exactly 1.0.
///
/// Callers must have checked the raw sum is positive (see `SimulationConfig::validate`).
pub fn normalize_kernel(raw: &[[f64; 3]; 3]) -> Array2<f64> {
    let raw_sum: f64 = raw.iter().flatten().sum();
    Array2::from_shape_fn((3, 3), |(i, j)| raw[i][j] / raw_sum)
}
