//! Symmetric fuel-age edits
//!
//! An operator changes one slot by one generation; every slot in its
//! symmetry orbit follows. All checks run before the first write, so a
//! rejected edit leaves the grid untouched.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::constants;
use crate::error::{EditError, FuelError};
use crate::fuel::FuelAgeGrid;
use crate::layout::{CoreLayout, GridPos};

/// One step younger or older
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeDelta {
    Decrease,
    Increase,
}

impl AgeDelta {
    pub fn as_i32(self) -> i32 {
        match self {
            AgeDelta::Decrease => -1,
            AgeDelta::Increase => 1,
        }
    }
}

impl TryFrom<i32> for AgeDelta {
    type Error = FuelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(AgeDelta::Decrease),
            1 => Ok(AgeDelta::Increase),
            other => Err(FuelError::InvalidState(format!("age delta must be -1 or +1, got {other}"))),
        }
    }
}

/// Change the age at (`row`, `col`) and its symmetry images, bounded by `MAX_AGE`.
pub fn adjust(
    ages: &mut FuelAgeGrid,
    layout: &CoreLayout,
    row: usize,
    col: usize,
    delta: AgeDelta,
) -> Result<BTreeSet<GridPos>, EditError> {
    adjust_with_max_age(ages, layout, row, col, delta, constants::MAX_AGE)
}

/// Returns the changed positions. Every position in the orbit ends up with
/// the triggering cell's new age, whatever it held before.
pub fn adjust_with_max_age(
    ages: &mut FuelAgeGrid,
    layout: &CoreLayout,
    row: usize,
    col: usize,
    delta: AgeDelta,
    max_age: u8,
) -> Result<BTreeSet<GridPos>, EditError> {
    ages.validate(layout, max_age)?;

    let pos = GridPos::new(row, col);
    let orbit = layout.orbit(pos)?;

    let current = ages
        .age(pos)
        .ok_or_else(|| FuelError::InvalidState(format!("no age at row={row}, col={col}")))?;
    let new_age = i32::from(current) + delta.as_i32();
    if new_age < 0 || new_age > i32::from(max_age) {
        warn!("Rejected edit at ({row}, {col}): age {new_age} outside 0..={max_age}");
        return Err(FuelError::OutOfRange { row, col, age: new_age, max_age });
    }
    let new_age = new_age as u8;

    for &member in &orbit {
        ages.set(member, new_age);
    }
    debug!("Set {} slot(s) around ({row}, {col}) to age {new_age}", orbit.len());

    Ok(orbit)
}
