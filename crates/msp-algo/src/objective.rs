//! Builds the weighted multi-objective of §4.2, maximized:
//!
//! `w_mass·ΣOprod − w_crew·Σcrew − w_energy·Σenergy − w_risk·Σrisk
//!  + w_value·Σ output_values·Oprod + w_make·Σ substitute_values·make_sub
//!  + w_carry·Σ item_mass·carried_used − w_shortage·Σ item_short`
//!
//! Signs are preserved exactly as specified: `carry` is conventionally ≤0
//! so this term already penalizes carried-stock consumption without an
//! extra negation, and `shortage` is explicitly subtracted.

use good_lp::Expression;
use msp_core::MissionData;

use crate::variables::ModelVariables;

pub fn build_objective(vars: &ModelVariables, mission: &MissionData) -> Expression {
    let weights = &mission.weights;
    let weeks = mission.sorted_weeks();

    let mut total_oprod = Expression::from(0.0);
    let mut value_weighted_oprod = Expression::from(0.0);
    for output in &mission.outputs {
        let value = mission.output_values.get(output).copied().unwrap_or(0.0);
        for &t in &weeks {
            let o_prod = vars.o_prod[&(output.clone(), t)];
            total_oprod += o_prod;
            if value != 0.0 {
                value_weighted_oprod += value * o_prod;
            }
        }
    }

    let mut crew_total = Expression::from(0.0);
    let mut energy_total = Expression::from(0.0);
    let mut risk_total = Expression::from(0.0);
    for method in &mission.methods {
        let crew_cost = mission.crew_cost.get(method).copied().unwrap_or(0.0);
        let energy_cost = mission.energy_cost.get(method).copied().unwrap_or(0.0);
        let risk_cost = mission.risk_cost.get(method).copied().unwrap_or(0.0);
        for &t in &weeks {
            let q = vars.q[&(method.clone(), t)];
            if crew_cost != 0.0 {
                crew_total += crew_cost * q;
            }
            if energy_cost != 0.0 {
                energy_total += energy_cost * q;
            }
            if risk_cost != 0.0 {
                risk_total += risk_cost * q;
            }
        }
    }

    let mut make_weighted = Expression::from(0.0);
    for sub in &mission.substitutes {
        let crew_cost = mission.substitute_assembly_crew.get(sub).copied().unwrap_or(0.0);
        let energy_cost = mission.substitute_assembly_energy.get(sub).copied().unwrap_or(0.0);
        let value = mission.substitute_values.get(sub).copied().unwrap_or(0.0);
        for &t in &weeks {
            let make_sub = vars.make_sub[&(sub.clone(), t)];
            if crew_cost != 0.0 {
                crew_total += crew_cost * make_sub;
            }
            if energy_cost != 0.0 {
                energy_total += energy_cost * make_sub;
            }
            if value != 0.0 {
                make_weighted += value * make_sub;
            }
        }
    }

    let mut carry_weighted = Expression::from(0.0);
    let mut shortage_total = Expression::from(0.0);
    for item in &mission.items {
        let mass = mission.item_mass.get(item).copied().unwrap_or(0.0);
        for &t in &weeks {
            if mass != 0.0 {
                carry_weighted += mass * vars.carried_used[&(item.clone(), t)];
            }
            shortage_total += vars.item_short[&(item.clone(), t)];
        }
    }

    weights.mass * total_oprod - weights.crew * crew_total - weights.energy * energy_total
        - weights.risk * risk_total
        + weights.value * value_weighted_oprod
        + weights.make * make_weighted
        + weights.carry * carry_weighted
        - weights.shortage * shortage_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use good_lp::ProblemVariables;
    use msp_core::{ItemId, MaterialId, MethodId, OutputId, SubstituteId, Week};

    #[test]
    fn test_build_objective_does_not_panic_on_minimal_mission() {
        let mut mission = MissionData::default();
        mission.materials = vec![MaterialId::new("plastic")];
        mission.methods = vec![MethodId::new("extrude")];
        mission.outputs = vec![OutputId::new("filament")];
        mission.items = vec![ItemId::new("spare_part")];
        mission.substitutes = vec![SubstituteId::new("printed_part")];
        mission.weeks = vec![Week::new(1)];
        mission.weights.shortage = 10000.0;
        mission.weights.carry = -2.0;

        let mut vars = ProblemVariables::new();
        let model_vars = crate::variables::build_variables(&mut vars, &mission);
        let _objective = build_objective(&model_vars, &mission);
    }
}
