//! Backend selection and the top-level solve entry point.
//!
//! Backend preference is CBC first (true branch-and-cut MILP, the
//! preferred open-source backend), then HiGHS (also a true MIP solver),
//! falling back to Clarabel only when neither is compiled in. Clarabel is
//! an interior-point LP solver: it does not enforce `y[r,t]` integrality,
//! so a Clarabel solve only produces the LP relaxation. The caller is
//! warned via `tracing` whenever that fallback happens.

use good_lp::{ProblemVariables, Solution, SolverModel};

use msp_core::MissionData;

use crate::constraints::add_constraints;
use crate::error::{classify_resolution_error, AlgoError, AlgoResult};
use crate::extract::{extract, ExtractedResult};
use crate::objective::build_objective;
use crate::variables::build_variables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cbc,
    Highs,
    Clarabel,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Cbc => "cbc",
            Backend::Highs => "highs",
            Backend::Clarabel => "clarabel",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Logged for operator visibility; not currently wired into a
    /// backend-specific timeout parameter (see DESIGN.md).
    pub time_limit_seconds: Option<f64>,
}

pub fn select_backend() -> Option<Backend> {
    #[cfg(feature = "solver-cbc")]
    {
        return Some(Backend::Cbc);
    }
    #[cfg(all(not(feature = "solver-cbc"), feature = "solver-highs"))]
    {
        return Some(Backend::Highs);
    }
    #[cfg(all(
        not(feature = "solver-cbc"),
        not(feature = "solver-highs"),
        feature = "solver-clarabel"
    ))]
    {
        tracing::warn!(
            "falling back to the clarabel backend; it solves the LP relaxation only and does \
             not enforce method-running integrality"
        );
        return Some(Backend::Clarabel);
    }
    #[allow(unreachable_code)]
    None
}

pub fn solve(mission: &MissionData, config: &SolverConfig) -> AlgoResult<ExtractedResult> {
    let backend = select_backend().ok_or(AlgoError::NoBackendAvailable)?;

    if let Some(limit) = config.time_limit_seconds {
        tracing::info!(time_limit_seconds = limit, backend = backend.name(), "solving mission");
    } else {
        tracing::info!(backend = backend.name(), "solving mission");
    }

    let mut vars = ProblemVariables::new();
    let model_vars = build_variables(&mut vars, mission);
    let objective = build_objective(&model_vars, mission);
    let constraints = add_constraints(&model_vars, mission);

    let objective_value;
    let status_name;
    let result;

    match backend {
        #[cfg(feature = "solver-cbc")]
        Backend::Cbc => {
            use good_lp::solvers::coin_cbc::coin_cbc;
            let mut model = vars.maximise(objective.clone()).using(coin_cbc);
            for c in constraints {
                model = model.with(c);
            }
            let solution = model.solve().map_err(classify_resolution_error)?;
            objective_value = solution.eval(&objective);
            status_name = backend.name();
            result = extract(&solution, &model_vars, mission, objective_value, status_name);
        }
        #[cfg(feature = "solver-highs")]
        Backend::Highs => {
            use good_lp::solvers::highs::highs;
            let mut model = vars.maximise(objective.clone()).using(highs);
            for c in constraints {
                model = model.with(c);
            }
            let solution = model.solve().map_err(classify_resolution_error)?;
            objective_value = solution.eval(&objective);
            status_name = backend.name();
            result = extract(&solution, &model_vars, mission, objective_value, status_name);
        }
        #[cfg(feature = "solver-clarabel")]
        Backend::Clarabel => {
            use good_lp::solvers::clarabel::clarabel;
            let mut model = vars.maximise(objective.clone()).using(clarabel);
            for c in constraints {
                model = model.with(c);
            }
            let solution = model.solve().map_err(classify_resolution_error)?;
            objective_value = solution.eval(&objective);
            status_name = backend.name();
            result = extract(&solution, &model_vars, mission, objective_value, status_name);
        }
        #[allow(unreachable_patterns)]
        _ => return Err(AlgoError::NoBackendAvailable),
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_backend_returns_some_when_a_solver_feature_is_compiled_in() {
        assert!(select_backend().is_some());
    }
}
