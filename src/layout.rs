//! Core layout model
//!
//! A fixed rectangular grid of positions, each either structurally empty or
//! holding one fuel slot. Layouts are parsed once from scenario data and only
//! read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{FuelError, FuelResult};

/// Grid coordinate (row-major)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    FuelSlot(usize),
}

/// Symmetry group the operator edits are constrained by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symmetry {
    /// Square core, quarter symmetric: 4-fold rotation
    Rotational4,
    /// Non-square core: each cell is its own orbit
    Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreLayout {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    fuel_slots: usize,
    symmetry: Symmetry,
}

impl CoreLayout {
    /// Build a layout from a row-major grid of slot indices (`None` = empty).
    pub fn parse(raw: &[Vec<Option<usize>>]) -> FuelResult<Self> {
        let rows = raw.len();
        let cols = raw.first().map_or(0, Vec::len);

        if let Some((r, row)) = raw.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(FuelError::MalformedLayout(format!(
                "row {r} has {} cells, expected {cols}",
                row.len()
            )));
        }

        let cells: Vec<Cell> = raw
            .iter()
            .flatten()
            .map(|slot| match slot {
                Some(index) => Cell::FuelSlot(*index),
                None => Cell::Empty,
            })
            .collect();

        let indices: Vec<usize> = cells
            .iter()
            .filter_map(|cell| match cell {
                Cell::FuelSlot(index) => Some(*index),
                Cell::Empty => None,
            })
            .collect();
        let fuel_slots = indices.len();

        let mut seen = vec![false; fuel_slots];
        for index in indices {
            if index >= fuel_slots {
                return Err(FuelError::MalformedLayout(format!(
                    "slot index {index} out of range for {fuel_slots} fuel slots"
                )));
            }
            if seen[index] {
                return Err(FuelError::MalformedLayout(format!("duplicate slot index {index}")));
            }
            seen[index] = true;
        }

        let symmetry = if rows == cols { Symmetry::Rotational4 } else { Symmetry::Identity };

        Ok(Self { rows, cols, cells, fuel_slots, symmetry })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    pub fn number_of_fuel_slots(&self) -> usize {
        self.fuel_slots
    }

    /// Cell at a position, `None` when outside the grid
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(self.cells[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    pub fn is_fuel(&self, pos: GridPos) -> bool {
        matches!(self.cell(pos), Some(Cell::FuelSlot(_)))
    }

    /// Fuel positions in row-major order
    pub fn fuel_positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| match cell {
            Cell::FuelSlot(_) => Some(GridPos::new(i / self.cols, i % self.cols)),
            Cell::Empty => None,
        })
    }

    /// All positions that must be edited together with `pos`.
    ///
    /// For a square core of side N: (r,c) → (c, N-1-r) → (N-1-r, N-1-c) → (N-1-c, r).
    /// Odd and even N use the same rotation.
    pub fn orbit(&self, pos: GridPos) -> FuelResult<BTreeSet<GridPos>> {
        if !self.is_fuel(pos) {
            return Err(FuelError::InvalidState(format!(
                "row={}, col={} is not a fuel slot",
                pos.row, pos.col
            )));
        }
        let images = match self.symmetry {
            Symmetry::Identity => vec![pos],
            Symmetry::Rotational4 => {
                let last = self.rows - 1;
                let (r, c) = (pos.row, pos.col);
                vec![
                    GridPos::new(r, c),
                    GridPos::new(c, last - r),
                    GridPos::new(last - r, last - c),
                    GridPos::new(last - c, r),
                ]
            }
        };

        let mut orbit = BTreeSet::new();
        for image in images {
            if !self.is_fuel(image) {
                return Err(FuelError::SymmetryViolation { row: image.row, col: image.col });
            }
            orbit.insert(image);
        }
        Ok(orbit)
    }

    /// Check every fuel slot's orbit, so a broken layout fails at load time.
    pub fn check_symmetry(&self) -> FuelResult<()> {
        for pos in self.fuel_positions() {
            self.orbit(pos)?;
        }
        Ok(())
    }

    /// Row-major slot grid, the shape scenario files use
    pub fn to_raw(&self) -> Vec<Vec<Option<usize>>> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| match self.cells[r * self.cols + c] {
                        Cell::FuelSlot(index) => Some(index),
                        Cell::Empty => None,
                    })
                    .collect()
            })
            .collect()
    }
}
