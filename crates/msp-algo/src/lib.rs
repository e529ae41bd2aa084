//! MILP model for the weekly recycling/substitution schedule: variable
//! and constraint construction, the weighted objective, backend
//! selection and solving, and result extraction.

pub mod constraints;
pub mod error;
pub mod extract;
pub mod objective;
pub mod solver;
pub mod variables;

pub use error::{AlgoError, AlgoResult};
pub use extract::ExtractedResult;
pub use solver::{solve, Backend, SolverConfig};

use msp_core::MissionData;

/// Builds, solves and extracts a result for a mission in one call.
pub fn solve_mission(mission: &MissionData, config: &SolverConfig) -> AlgoResult<ExtractedResult> {
    solve(mission, config)
}
