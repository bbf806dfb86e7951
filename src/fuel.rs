//! Per-slot fuel age
//!
//! The grid is owned by whoever drives the editing session. The simulation
//! only reads it; the symmetric edit operator is the only writer.

use serde::{Deserialize, Serialize};

use crate::config::constants;
use crate::error::{FuelError, FuelResult};
use crate::layout::{CoreLayout, GridPos};

/// Fuel age per grid position [cycles], `None` on empty positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelAgeGrid {
    ages: Vec<Vec<Option<u8>>>,
}

impl FuelAgeGrid {
    /// Every fuel slot loaded with fresh fuel
    pub fn fresh(layout: &CoreLayout) -> Self {
        let ages = (0..layout.rows())
            .map(|r| {
                (0..layout.cols())
                    .map(|c| layout.is_fuel(GridPos::new(r, c)).then_some(constants::FRESH_FUEL_AGE))
                    .collect()
            })
            .collect();
        Self { ages }
    }

    /// Unchecked construction; use `validate` before trusting it against a layout.
    pub fn from_rows(ages: Vec<Vec<Option<u8>>>) -> Self {
        Self { ages }
    }

    pub fn rows(&self) -> usize {
        self.ages.len()
    }

    pub fn age(&self, pos: GridPos) -> Option<u8> {
        self.ages.get(pos.row).and_then(|row| row.get(pos.col)).copied().flatten()
    }

    /// (position, age) for every position holding an age, row-major
    pub fn fuel_ages(&self) -> impl Iterator<Item = (GridPos, u8)> + '_ {
        self.ages.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, age)| age.map(|a| (GridPos::new(r, c), a)))
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<Option<u8>>> {
        self.ages.clone()
    }

    /// The grid must match the layout exactly: same shape, an age on every
    /// fuel slot and nowhere else, all ages within `0..=max_age`.
    pub fn validate(&self, layout: &CoreLayout, max_age: u8) -> FuelResult<()> {
        if self.ages.len() != layout.rows() {
            return Err(FuelError::InvalidState(format!(
                "grid has {} rows, layout has {}",
                self.ages.len(),
                layout.rows()
            )));
        }
        for (r, row) in self.ages.iter().enumerate() {
            if row.len() != layout.cols() {
                return Err(FuelError::InvalidState(format!(
                    "grid row {r} has {} cells, layout has {}",
                    row.len(),
                    layout.cols()
                )));
            }
            for (c, age) in row.iter().enumerate() {
                let pos = GridPos::new(r, c);
                match (layout.is_fuel(pos), age) {
                    (true, None) => {
                        return Err(FuelError::InvalidState(format!(
                            "fuel slot row={r}, col={c} has no age"
                        )))
                    }
                    (false, Some(_)) => {
                        return Err(FuelError::InvalidState(format!(
                            "empty position row={r}, col={c} has an age"
                        )))
                    }
                    (true, Some(a)) if *a > max_age => {
                        return Err(FuelError::InvalidState(format!(
                            "age {a} at row={r}, col={c} exceeds {max_age}"
                        )))
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Caller has validated `pos` against the layout.
    pub(crate) fn set(&mut self, pos: GridPos, age: u8) {
        self.ages[pos.row][pos.col] = Some(age);
    }
}

/// Display label for one fuel age
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuelGeneration {
    pub age: u8,
    pub label: String,
}

/// One generation per selectable age, fresh fuel first
pub fn fuel_generations(max_age: u8) -> Vec<FuelGeneration> {
    (0..=max_age)
        .map(|age| FuelGeneration {
            age,
            label: if age == constants::FRESH_FUEL_AGE {
                "Fresh".to_string()
            } else {
                format!("{age}-year")
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CoreLayout {
        CoreLayout::parse(&[
            vec![None, Some(0), None],
            vec![Some(1), Some(2), Some(3)],
            vec![None, Some(4), None],
        ])
        .unwrap()
    }

    #[test]
    fn test_fresh_grid_matches_layout() {
        let layout = layout();
        let grid = FuelAgeGrid::fresh(&layout);
        grid.validate(&layout, constants::MAX_AGE).unwrap();
        assert_eq!(grid.fuel_ages().count(), 5);
        assert!(grid.fuel_ages().all(|(_, age)| age == 0));
        assert_eq!(grid.age(GridPos::new(0, 0)), None);
        assert_eq!(grid.age(GridPos::new(1, 1)), Some(0));
        assert_eq!(grid.age(GridPos::new(9, 9)), None);
    }

    #[test]
    fn test_missing_age_is_invalid_state() {
        let grid = FuelAgeGrid::from_rows(vec![
            vec![None, Some(0), None],
            vec![Some(1), None, Some(3)],
            vec![None, Some(4), None],
        ]);
        let err = grid.validate(&layout(), constants::MAX_AGE).unwrap_err();
        assert!(matches!(err, FuelError::InvalidState(_)), "{err}");
    }

    #[test]
    fn test_age_on_empty_cell_is_invalid_state() {
        let grid = FuelAgeGrid::from_rows(vec![
            vec![Some(0), Some(0), None],
            vec![Some(0), Some(0), Some(0)],
            vec![None, Some(0), None],
        ]);
        assert!(grid.validate(&layout(), constants::MAX_AGE).is_err());
    }

    #[test]
    fn test_age_above_max_is_invalid_state() {
        let grid = FuelAgeGrid::from_rows(vec![
            vec![None, Some(5), None],
            vec![Some(0), Some(0), Some(0)],
            vec![None, Some(0), None],
        ]);
        assert!(grid.validate(&layout(), constants::MAX_AGE).is_err());
    }

    #[test]
    fn test_shape_mismatch_is_invalid_state() {
        let grid = FuelAgeGrid::from_rows(vec![vec![Some(0)]]);
        assert!(grid.validate(&layout(), constants::MAX_AGE).is_err());
    }

    #[test]
    fn test_generation_labels() {
        let generations = fuel_generations(constants::MAX_AGE);
        assert_eq!(generations.len(), 5);
        assert_eq!(generations[0].label, "Fresh");
        assert_eq!(generations[3].label, "3-year");
    }
}
