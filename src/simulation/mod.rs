pub mod branch;
pub mod engine;
pub mod free_card;
pub mod report;

pub use branch::{Simulation, SimulationBranch};
pub use engine::run_trial;
pub use free_card::FreeCardError;
pub use report::{generate_report, SimulationReport};
