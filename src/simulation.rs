//! Burnup simulation engine
//!
//! Walks one operating cycle in fixed burnup steps. Each step derives a
//! reactivity proxy (kinf) from local burnup, smooths it into a power
//! distribution with a 3×3 kernel, normalizes power to a fuel-cell mean of
//! 1.0, measures outer-ring leakage, then burns every cell in proportion to
//! its power. The engine holds no state between calls.

use log::debug;
use ndarray::Array2;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::config::{constants, normalize_kernel, SimulationConfig};
use crate::error::FuelResult;
use crate::fuel::FuelAgeGrid;
use crate::layout::{CoreLayout, GridPos};

/// Dense field with an explicit definedness mask.
///
/// Empty core positions are undefined: they read as `NaN`, serialize as
/// `null` and never enter sums or means.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap {
    values: Array2<f64>,
    defined: Array2<bool>,
}

impl FieldMap {
    /// Defined exactly on the layout's fuel slots, zero elsewhere.
    pub fn zeros_like(layout: &CoreLayout) -> Self {
        let defined = Array2::from_shape_fn(layout.shape(), |(r, c)| layout.is_fuel(GridPos::new(r, c)));
        Self { values: Array2::zeros(layout.shape()), defined }
    }

    fn from_parts(values: Array2<f64>, defined: Array2<bool>) -> Self {
        Self { values, defined }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn is_defined(&self, row: usize, col: usize) -> bool {
        self.defined.get((row, col)).copied().unwrap_or(false)
    }

    /// Value at a cell, `NaN` when undefined or outside the grid
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.value(row, col).unwrap_or(f64::NAN)
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if self.is_defined(row, col) {
            Some(self.values[[row, col]])
        } else {
            None
        }
    }

    /// Raw values with undefined cells zeroed
    pub fn zero_filled(&self) -> Array2<f64> {
        let mut out = self.values.clone();
        out.zip_mut_with(&self.defined, |v, &d| {
            if !d {
                *v = 0.0;
            }
        });
        out
    }

    pub fn defined_count(&self) -> usize {
        self.defined.iter().filter(|&&d| d).count()
    }

    pub fn sum_defined(&self) -> f64 {
        self.values
            .iter()
            .zip(self.defined.iter())
            .filter(|(_, d)| **d)
            .map(|(v, _)| *v)
            .sum()
    }

    /// Mean over defined cells, `None` if nothing is defined
    pub fn mean_defined(&self) -> Option<f64> {
        let count = self.defined_count();
        (count > 0).then(|| self.sum_defined() / count as f64)
    }

    pub fn max_defined(&self) -> Option<f64> {
        self.values
            .iter()
            .zip(self.defined.iter())
            .filter(|(_, d)| **d)
            .map(|(v, _)| *v)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Apply `f` to defined cells; undefined cells stay undefined.
    pub fn map_defined(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut values = self.values.clone();
        values.zip_mut_with(&self.defined, |v, &d| {
            *v = if d { f(*v) } else { 0.0 };
        });
        Self::from_parts(values, self.defined.clone())
    }

    /// Row-major rows, `None` on undefined cells
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        let (rows, cols) = self.shape();
        (0..rows)
            .map(|r| (0..cols).map(|c| self.value(r, c)).collect())
            .collect()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

/// One instant within the cycle
#[derive(Debug, Clone, Serialize)]
pub struct BurnupStep {
    pub burnup: f64,              // Position in cycle [years]
    pub burnup_map: FieldMap,     // Cumulative burnup [years]
    pub reactivity_map: FieldMap, // kinf proxy
    pub power_map: FieldMap,      // Relative power, fuel-cell mean 1.0
    pub leakage: f64,             // [%]
}

/// Fuel inventory at the time of computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub age_counts: BTreeMap<u8, usize>,
    pub total_fuel_elements: usize,
}

impl AnalysisSummary {
    /// Counts for every age in `0..=max_age`, zero counts included.
    pub fn from_ages(ages: &FuelAgeGrid, max_age: u8) -> Self {
        let mut age_counts: BTreeMap<u8, usize> = (0..=max_age).map(|age| (age, 0)).collect();
        for (_, age) in ages.fuel_ages() {
            *age_counts.entry(age).or_insert(0) += 1;
        }
        let total_fuel_elements = age_counts.values().sum();
        Self { age_counts, total_fuel_elements }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub summary: AnalysisSummary,
    pub steps: Vec<BurnupStep>,
}

impl SimulationResult {
    /// Highest local power seen anywhere in the cycle
    pub fn peak_power(&self) -> Option<f64> {
        self.steps
            .iter()
            .filter_map(|step| step.power_map.max_defined())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    pub fn final_step(&self) -> Option<&BurnupStep> {
        self.steps.last()
    }
}

/// kinf proxy: a sharp rise near zero burnup followed by linear depletion.
pub fn reactivity_proxy(burnup: f64) -> f64 {
    -0.4 * (-burnup / 0.4).exp().sqrt() + 1.45 - burnup * 0.15
}

pub fn reactivity_map(burnup_map: &FieldMap) -> FieldMap {
    burnup_map.map_defined(reactivity_proxy)
}

/// 2-D convolution, zero padding, output the same shape as the input.
pub fn convolve_same(input: &Array2<f64>, kernel: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = input.dim();
    let (k_rows, k_cols) = kernel.dim();
    let (k_r0, k_c0) = (k_rows / 2, k_cols / 2);

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let mut acc = 0.0;
        for m in 0..k_rows {
            for n in 0..k_cols {
                // input index r - (m - k_r0), kept in usize
                let (Some(ir), Some(ic)) = ((r + k_r0).checked_sub(m), (c + k_c0).checked_sub(n)) else {
                    continue;
                };
                if ir < rows && ic < cols {
                    acc += input[[ir, ic]] * kernel[[m, n]];
                }
            }
        }
        acc
    })
}

/// Smooth a source field into power; undefined source cells stay undefined.
pub fn spatial_coupling(source: &FieldMap, kernel: &Array2<f64>) -> FieldMap {
    let values = convolve_same(&source.zero_filled(), kernel);
    FieldMap::from_parts(values, source.defined.clone())
}

/// Scale so the mean over defined cells is exactly 1.0.
///
/// A field with no defined cells, or a zero mean, is returned unchanged.
pub fn normalize_power(power: &FieldMap) -> FieldMap {
    match power.mean_defined() {
        Some(mean) if mean != 0.0 => power.map_defined(|p| p / mean),
        _ => power.clone(),
    }
}

/// Share of total power produced on the outer ring [%]; 0.0 when there is no power.
pub fn leakage_percent(power: &FieldMap) -> f64 {
    let total = power.sum_defined();
    if total == 0.0 {
        return 0.0;
    }
    let (rows, cols) = power.shape();
    let mut ring = 0.0;
    for r in 0..rows {
        for c in 0..cols {
            let on_ring = r == 0 || c == 0 || r + 1 == rows || c + 1 == cols;
            if on_ring {
                if let Some(p) = power.value(r, c) {
                    ring += p;
                }
            }
        }
    }
    ring / total * 100.0
}

/// Burnup simulation engine
#[derive(Debug, Clone)]
pub struct BurnupEngine {
    config: SimulationConfig,
    kernel: Array2<f64>,
}

impl Default for BurnupEngine {
    fn default() -> Self {
        let config = SimulationConfig::default();
        let kernel = normalize_kernel(&config.raw_kernel);
        Self { config, kernel }
    }
}

impl BurnupEngine {
    pub fn new(config: SimulationConfig) -> FuelResult<Self> {
        config.validate()?;
        let kernel = normalize_kernel(&config.raw_kernel);
        Ok(Self { config, kernel })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Normalized smoothing kernel
    pub fn kernel(&self) -> &Array2<f64> {
        &self.kernel
    }

    /// Full cycle: `number_of_steps + 1` steps from the given fuel ages.
    pub fn simulate(&self, layout: &CoreLayout, ages: &FuelAgeGrid) -> FuelResult<SimulationResult> {
        ages.validate(layout, self.config.max_age)?;

        let summary = AnalysisSummary::from_ages(ages, self.config.max_age);
        let step_size = self.config.burnup_step_size();

        let mut burnup_map = FieldMap::zeros_like(layout);
        for (pos, age) in ages.fuel_ages() {
            burnup_map.values[[pos.row, pos.col]] = f64::from(age);
        }

        let mut steps = Vec::with_capacity(self.config.number_of_steps + 1);
        for s in 0..=self.config.number_of_steps {
            let reactivity = reactivity_map(&burnup_map);
            let power = normalize_power(&spatial_coupling(&reactivity, &self.kernel));
            let leakage = leakage_percent(&power);

            debug!(
                "step {}: burnup {:.3} y, peak power {:.3}, leakage {:.2}%",
                s,
                s as f64 * step_size,
                power.max_defined().unwrap_or(0.0),
                leakage
            );

            // Cells burn in proportion to their local power
            let mut next_burnup = burnup_map.clone();
            next_burnup.values.zip_mut_with(&power.zero_filled(), |b, &p| *b += step_size * p);

            steps.push(BurnupStep {
                burnup: s as f64 * step_size,
                burnup_map,
                reactivity_map: reactivity,
                power_map: power,
                leakage,
            });
            burnup_map = next_burnup;
        }

        Ok(SimulationResult { summary, steps })
    }
}

/// Simulate with the default parameters.
pub fn simulate(layout: &CoreLayout, ages: &FuelAgeGrid) -> FuelResult<SimulationResult> {
    BurnupEngine::default().simulate(layout, ages)
}

/// Step count of a default run, handy for renderers sizing their output.
pub const DEFAULT_STEP_COUNT: usize = constants::NUMBER_OF_STEPS + 1;
