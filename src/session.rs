//! Fuel-management editing session
//!
//! Holds the live fuel-age grid for one loaded scenario. Every edit is
//! followed by a full re-simulation under the same lock, so no reader ever
//! sees a half-applied symmetric edit or results from a stale grid.

use log::info;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use crate::edit::{adjust_with_max_age, AgeDelta};
use crate::error::{FuelError, FuelResult};
use crate::fuel::FuelAgeGrid;
use crate::layout::{CoreLayout, GridPos};
use crate::simulation::{BurnupEngine, SimulationResult};

/// Outcome of an accepted edit
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub changed: BTreeSet<GridPos>,
    pub result: SimulationResult,
}

pub struct FuelManagementSession {
    layout: CoreLayout,
    engine: BurnupEngine,
    ages: Mutex<FuelAgeGrid>,
}

impl FuelManagementSession {
    /// Start with a fully fresh core.
    pub fn new(layout: CoreLayout, engine: BurnupEngine) -> Self {
        let ages = FuelAgeGrid::fresh(&layout);
        info!(
            "Session started: {}x{} core, {} fuel slots",
            layout.rows(),
            layout.cols(),
            layout.number_of_fuel_slots()
        );
        Self { layout, engine, ages: Mutex::new(ages) }
    }

    pub fn layout(&self) -> &CoreLayout {
        &self.layout
    }

    pub fn engine(&self) -> &BurnupEngine {
        &self.engine
    }

    fn lock_ages(&self) -> FuelResult<MutexGuard<'_, FuelAgeGrid>> {
        self.ages.lock().map_err(|_| FuelError::LockPoisoned("fuel ages".into()))
    }

    /// Snapshot of the current ages
    pub fn fuel_ages(&self) -> FuelResult<FuelAgeGrid> {
        Ok(self.lock_ages()?.clone())
    }

    /// Simulate the current grid
    pub fn simulate(&self) -> FuelResult<SimulationResult> {
        let ages = self.lock_ages()?;
        self.engine.simulate(&self.layout, &ages)
    }

    /// Edit one slot (and its orbit), then re-simulate.
    ///
    /// A rejected edit returns the error and leaves the grid as it was.
    pub fn adjust(&self, row: usize, col: usize, delta: AgeDelta) -> FuelResult<SessionUpdate> {
        let mut ages = self.lock_ages()?;
        let changed = adjust_with_max_age(&mut ages, &self.layout, row, col, delta, self.engine.config().max_age)?;
        let result = self.engine.simulate(&self.layout, &ages)?;
        Ok(SessionUpdate { changed, result })
    }

    /// Reload every slot with fresh fuel.
    pub fn reset(&self) -> FuelResult<()> {
        let mut ages = self.lock_ages()?;
        *ages = FuelAgeGrid::fresh(&self.layout);
        info!("Session reset to fresh core");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn session() -> FuelManagementSession {
        let layout = CoreLayout::parse(&[
            vec![None, Some(0), Some(1), None],
            vec![Some(2), Some(3), Some(4), Some(5)],
            vec![Some(6), Some(7), Some(8), Some(9)],
            vec![None, Some(10), Some(11), None],
        ])
        .unwrap();
        FuelManagementSession::new(layout, BurnupEngine::default())
    }

    #[test]
    fn test_adjust_resimulates() {
        let session = session();
        let update = session.adjust(1, 1, AgeDelta::Increase).unwrap();
        assert_eq!(update.changed.len(), 4);
        assert_eq!(update.result.summary.age_counts[&1], 4);
        assert_eq!(update.result.summary.age_counts[&0], 8);
        assert_eq!(update.result.steps.len(), 21);
    }

    #[test]
    fn test_rejected_edit_keeps_state() {
        let session = session();
        let before = session.fuel_ages().unwrap();
        let err = session.adjust(1, 1, AgeDelta::Decrease).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(session.fuel_ages().unwrap(), before);
    }

    #[test]
    fn test_reset_returns_to_fresh() {
        let session = session();
        session.adjust(0, 1, AgeDelta::Increase).unwrap();
        session.reset().unwrap();
        let result = session.simulate().unwrap();
        assert_eq!(result.summary.age_counts[&0], 12);
    }

    #[test]
    fn test_concurrent_edits_stay_symmetric() {
        let session = Arc::new(session());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    let (row, col) = if i % 2 == 0 { (1, 1) } else { (0, 1) };
                    session.adjust(row, col, AgeDelta::Increase).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let ages = session.fuel_ages().unwrap();
        for orbit_start in [GridPos::new(1, 1), GridPos::new(0, 1)] {
            let orbit = session.layout().orbit(orbit_start).unwrap();
            let values: BTreeSet<_> = orbit.iter().map(|&p| ages.age(p)).collect();
            assert_eq!(values.len(), 1, "orbit of {orbit_start:?} diverged: {values:?}");
            assert_eq!(values.into_iter().next().flatten(), Some(2));
        }
    }
}
