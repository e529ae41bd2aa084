//! Declares every decision variable named in the model (§4.2's variable
//! table) and registers it with good_lp's `ProblemVariables`.
//!
//! `sub_used_for[s,k,t]` is only created for eligible `(s,k)` pairs
//! (`mission.is_eligible`). An ineligible pair simply has no variable, so
//! every expression that would sum over it contributes nothing — this is
//! the eligibility constraint (§4.2 item 8) enforced by construction rather
//! than by an explicit `== 0` constraint.

use std::collections::HashMap;

use good_lp::{variable, ProblemVariables, Variable};
use msp_core::{ItemId, MaterialId, MethodId, MissionData, OutputId, SubstituteId, Week};

pub struct ModelVariables {
    pub p: HashMap<(MaterialId, MethodId, Week), Variable>,
    pub q: HashMap<(MethodId, Week), Variable>,
    pub y: HashMap<(MethodId, Week), Variable>,
    pub o_prod: HashMap<(OutputId, Week), Variable>,
    pub o_inv: HashMap<(OutputId, Week), Variable>,
    pub m_inv: HashMap<(MaterialId, Week), Variable>,
    pub make_sub: HashMap<(SubstituteId, Week), Variable>,
    pub sub_inv: HashMap<(SubstituteId, Week), Variable>,
    pub sub_used_for: HashMap<(SubstituteId, ItemId, Week), Variable>,
    pub carried_used: HashMap<(ItemId, Week), Variable>,
    pub carried_inv: HashMap<(ItemId, Week), Variable>,
    pub item_used: HashMap<(ItemId, Week), Variable>,
    pub item_short: HashMap<(ItemId, Week), Variable>,
}

impl ModelVariables {
    pub fn p_of(&self, m: &MaterialId, r: &MethodId, t: Week) -> Variable {
        self.p[&(m.clone(), r.clone(), t)]
    }

    pub fn sub_used_for_of(&self, s: &SubstituteId, k: &ItemId, t: Week) -> Option<Variable> {
        self.sub_used_for.get(&(s.clone(), k.clone(), t)).copied()
    }
}

pub fn build_variables(vars: &mut ProblemVariables, mission: &MissionData) -> ModelVariables {
    let weeks = mission.sorted_weeks();

    let mut p = HashMap::new();
    for material in &mission.materials {
        for method in &mission.methods {
            for &t in &weeks {
                p.insert((material.clone(), method.clone(), t), vars.add(variable().min(0.0)));
            }
        }
    }

    let mut q = HashMap::new();
    let mut y = HashMap::new();
    for method in &mission.methods {
        for &t in &weeks {
            q.insert((method.clone(), t), vars.add(variable().min(0.0)));
            y.insert((method.clone(), t), vars.add(variable().binary()));
        }
    }

    let mut o_prod = HashMap::new();
    let mut o_inv = HashMap::new();
    for output in &mission.outputs {
        let cap = mission.output_capacity.get(output).copied().unwrap_or(f64::INFINITY);
        for &t in &weeks {
            o_prod.insert((output.clone(), t), vars.add(variable().min(0.0)));
            o_inv.insert((output.clone(), t), vars.add(variable().min(0.0).max(cap)));
        }
    }

    let mut m_inv = HashMap::new();
    for material in &mission.materials {
        let cap = mission.input_capacity.get(material).copied().unwrap_or(f64::INFINITY);
        for &t in &weeks {
            m_inv.insert((material.clone(), t), vars.add(variable().min(0.0).max(cap)));
        }
    }

    let mut make_sub = HashMap::new();
    let mut sub_inv = HashMap::new();
    for sub in &mission.substitutes {
        for &t in &weeks {
            make_sub.insert((sub.clone(), t), vars.add(variable().min(0.0)));
            sub_inv.insert((sub.clone(), t), vars.add(variable().min(0.0)));
        }
    }

    let mut sub_used_for = HashMap::new();
    for (item, eligible_subs) in &mission.substitutes_can_replace {
        for sub in eligible_subs {
            for &t in &weeks {
                sub_used_for.insert((sub.clone(), item.clone(), t), vars.add(variable().min(0.0)));
            }
        }
    }

    let mut carried_used = HashMap::new();
    let mut carried_inv = HashMap::new();
    let mut item_used = HashMap::new();
    let mut item_short = HashMap::new();
    for item in &mission.items {
        for &t in &weeks {
            carried_used.insert((item.clone(), t), vars.add(variable().min(0.0)));
            carried_inv.insert((item.clone(), t), vars.add(variable().min(0.0)));
            item_used.insert((item.clone(), t), vars.add(variable().min(0.0)));
            item_short.insert((item.clone(), t), vars.add(variable().min(0.0)));
        }
    }

    ModelVariables {
        p,
        q,
        y,
        o_prod,
        o_inv,
        m_inv,
        make_sub,
        sub_inv,
        sub_used_for,
        carried_used,
        carried_inv,
        item_used,
        item_short,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msp_core::Week;

    fn tiny_mission() -> MissionData {
        let mut mission = MissionData::default();
        mission.materials = vec![MaterialId::new("plastic")];
        mission.methods = vec![MethodId::new("extrude")];
        mission.outputs = vec![OutputId::new("filament")];
        mission.items = vec![ItemId::new("spare_part")];
        mission.substitutes = vec![SubstituteId::new("printed_part")];
        mission.weeks = vec![Week::new(1), Week::new(2)];
        mission
            .substitutes_can_replace
            .entry(ItemId::new("spare_part"))
            .or_default()
            .insert(SubstituteId::new("printed_part"));
        mission
    }

    #[test]
    fn test_build_variables_counts() {
        let mission = tiny_mission();
        let mut vars = ProblemVariables::new();
        let model_vars = build_variables(&mut vars, &mission);

        assert_eq!(model_vars.p.len(), 2); // 1 material * 1 method * 2 weeks
        assert_eq!(model_vars.y.len(), 2);
        assert_eq!(model_vars.sub_used_for.len(), 2); // eligible pair * 2 weeks
    }

    #[test]
    fn test_ineligible_pair_has_no_variable() {
        let mut mission = tiny_mission();
        mission.items.push(ItemId::new("insulation_patch"));
        // insulation_patch has no eligible substitute.
        let mut vars = ProblemVariables::new();
        let model_vars = build_variables(&mut vars, &mission);
        assert!(model_vars
            .sub_used_for_of(&SubstituteId::new("printed_part"), &ItemId::new("insulation_patch"), Week::new(1))
            .is_none());
    }
}
