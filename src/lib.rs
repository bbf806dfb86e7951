//! Reactor-Core Fuel-Management Simulator Library
//!
//! Simulates burnup, power distribution and neutron leakage across one
//! operating cycle of a quarter-symmetric core, and applies operator fuel
//! edits under the core's rotational symmetry.

pub mod config;
pub mod edit;
pub mod error;
pub mod fuel;
pub mod layout;
pub mod scenario;
pub mod session;
pub mod simulation;

pub use config::{constants, SimulationConfig};
pub use edit::{adjust, AgeDelta};
pub use error::{EditError, FuelError, FuelResult};
pub use fuel::{fuel_generations, FuelAgeGrid, FuelGeneration};
pub use layout::{Cell, CoreLayout, GridPos, Symmetry};
pub use scenario::Scenario;
pub use session::{FuelManagementSession, SessionUpdate};
pub use simulation::{simulate, AnalysisSummary, BurnupEngine, BurnupStep, FieldMap, SimulationResult};
