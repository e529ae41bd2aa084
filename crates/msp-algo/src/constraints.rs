//! Builds the constraint groups of §4.2 as a flat `Vec<good_lp::Constraint>`.
//!
//! Groups are numbered to match the specification's own numbering so a
//! reviewer can cross-check each loop against the constraint it implements.
//! Group 8 (eligibility) has no loop here: it is enforced by
//! [`crate::variables::build_variables`] never creating a `sub_used_for`
//! variable for an ineligible pair.

use good_lp::{constraint, Constraint, Expression};
use msp_core::{MissionData, Week};

use crate::variables::ModelVariables;

pub fn add_constraints(vars: &ModelVariables, mission: &MissionData) -> Vec<Constraint> {
    let weeks = mission.sorted_weeks();
    let mut constraints = Vec::new();

    method_aggregation(vars, mission, &weeks, &mut constraints);
    production_yield(vars, mission, &weeks, &mut constraints);
    output_balance(vars, mission, &weeks, &mut constraints);
    material_balance(vars, mission, &weeks, &mut constraints);
    substitute_balance(vars, mission, &weeks, &mut constraints);
    carried_balance(vars, mission, &weeks, &mut constraints);
    demand_decomposition(vars, mission, &weeks, &mut constraints);
    capacity_availability_lot_size(vars, mission, &weeks, &mut constraints);
    resource_envelopes(vars, mission, &weeks, &mut constraints);
    deadlines(vars, mission, &mut constraints);

    constraints
}

/// 1. `Q[r,t] = Σ_m P[m,r,t]`.
fn method_aggregation(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for method in &mission.methods {
        for &t in weeks {
            let mut sum = Expression::from(0.0);
            for material in &mission.materials {
                sum += vars.p_of(material, method, t);
            }
            let q = vars.q[&(method.clone(), t)];
            out.push(constraint!(q == sum));
        }
    }
}

/// 2. `Oprod[o,t] = Σ_{m,r} yields[(m,r,o)] · P[m,r,t]`.
fn production_yield(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for output in &mission.outputs {
        for &t in weeks {
            let mut sum = Expression::from(0.0);
            for ((material, method, o), yield_rate) in &mission.yields {
                if o == output {
                    sum += *yield_rate * vars.p_of(material, method, t);
                }
            }
            let o_prod = vars.o_prod[&(output.clone(), t)];
            out.push(constraint!(o_prod == sum));
        }
    }
}

/// 3. Output inventory balance with optional `output_capacity` bound
/// (applied as the variable's upper bound at creation time, not here).
fn output_balance(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for output in &mission.outputs {
        for &t in weeks {
            let prev_inv = prev_value_expr(
                mission,
                t,
                mission.initial_inventory.outputs.get(output).copied().unwrap_or(0.0),
                |prev_t| vars.o_inv[&(output.clone(), prev_t)].into(),
            );

            let mut consumed = Expression::from(0.0);
            for ((sub, o), recipe_rate) in &mission.substitute_make_recipe {
                if o == output {
                    consumed += *recipe_rate * vars.make_sub[&(sub.clone(), t)];
                }
            }

            let o_inv = vars.o_inv[&(output.clone(), t)];
            let o_prod = vars.o_prod[&(output.clone(), t)];
            out.push(constraint!(o_inv == prev_inv + o_prod - consumed));
        }
    }
}

/// 4. Material balance with lifetime-delayed waste from consumed items and
/// substitutes (`CarriedWaste`/`SubWaste`). `input_capacity` is applied as
/// the variable's upper bound at creation time.
fn material_balance(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    let week_set: std::collections::HashSet<Week> = weeks.iter().copied().collect();

    for material in &mission.materials {
        for &t in weeks {
            let prev_inv = prev_value_expr(
                mission,
                t,
                mission
                    .initial_inventory
                    .materials
                    .get(material)
                    .copied()
                    .unwrap_or(0.0),
                |prev_t| vars.m_inv[&(material.clone(), prev_t)].into(),
            );

            let mut carried_waste = Expression::from(0.0);
            for item in &mission.items {
                let lifetime = mission.item_lifetime.get(item).copied().unwrap_or(0) as i64;
                let tau = Week::new(t.value() - lifetime);
                if !week_set.contains(&tau) {
                    continue;
                }
                let rate = mission
                    .item_waste
                    .get(&(item.clone(), material.clone()))
                    .copied()
                    .unwrap_or(0.0);
                if rate != 0.0 {
                    carried_waste += rate * vars.carried_used[&(item.clone(), tau)];
                }
            }

            let mut sub_waste = Expression::from(0.0);
            for sub in &mission.substitutes {
                let lifetime = mission.substitute_lifetime.get(sub).copied().unwrap_or(0) as i64;
                let tau = Week::new(t.value() - lifetime);
                if !week_set.contains(&tau) {
                    continue;
                }
                let rate = mission
                    .substitute_waste
                    .get(&(sub.clone(), material.clone()))
                    .copied()
                    .unwrap_or(0.0);
                if rate == 0.0 {
                    continue;
                }
                for item in &mission.items {
                    if let Some(used) = vars.sub_used_for_of(sub, item, tau) {
                        sub_waste += rate * used;
                    }
                }
            }

            let mut processed = Expression::from(0.0);
            for method in &mission.methods {
                processed += vars.p_of(material, method, t);
            }

            let m_inv = vars.m_inv[&(material.clone(), t)];
            out.push(constraint!(m_inv == prev_inv + carried_waste + sub_waste - processed));
        }
    }
}

/// 5. `sub_inv[s,t] = prev_sub_inv + make_sub[s,t] − Σ_k sub_used_for[s,k,t]`.
fn substitute_balance(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for sub in &mission.substitutes {
        for &t in weeks {
            let prev_inv = prev_value_expr(
                mission,
                t,
                mission
                    .initial_inventory
                    .substitutes
                    .get(sub)
                    .copied()
                    .unwrap_or(0.0),
                |prev_t| vars.sub_inv[&(sub.clone(), prev_t)].into(),
            );

            let mut used = Expression::from(0.0);
            for item in &mission.items {
                if let Some(v) = vars.sub_used_for_of(sub, item, t) {
                    used += v;
                }
            }

            let sub_inv = vars.sub_inv[&(sub.clone(), t)];
            let make_sub = vars.make_sub[&(sub.clone(), t)];
            out.push(constraint!(sub_inv == prev_inv + make_sub - used));
        }
    }
}

/// 6. `carried_inv[k,t] = prev_carried_inv − carried_used[k,t]`.
fn carried_balance(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for item in &mission.items {
        for &t in weeks {
            let prev_inv = prev_value_expr(
                mission,
                t,
                mission.initial_inventory.items.get(item).copied().unwrap_or(0.0),
                |prev_t| vars.carried_inv[&(item.clone(), prev_t)].into(),
            );
            let carried_inv = vars.carried_inv[&(item.clone(), t)];
            let carried_used = vars.carried_used[&(item.clone(), t)];
            out.push(constraint!(carried_inv == prev_inv - carried_used));
        }
    }
}

/// 7. `item_used[k,t] = carried_used[k,t] + Σ_s sub_used_for[s,k,t]` and
/// `item_used[k,t] + item_short[k,t] = item_demands[(k,t)]`.
fn demand_decomposition(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for item in &mission.items {
        for &t in weeks {
            let mut from_subs = Expression::from(0.0);
            for sub in &mission.substitutes {
                if let Some(v) = vars.sub_used_for_of(sub, item, t) {
                    from_subs += v;
                }
            }
            let carried_used = vars.carried_used[&(item.clone(), t)];
            let item_used = vars.item_used[&(item.clone(), t)];
            out.push(constraint!(item_used == carried_used + from_subs));

            let demand = mission.item_demands.get(&(item.clone(), t)).copied().unwrap_or(0.0);
            let item_short = vars.item_short[&(item.clone(), t)];
            out.push(constraint!(item_used + item_short == demand));
        }
    }
}

/// 9. `Q[r,t] ≤ max_capacity[(r,t)] · y[r,t]`; `y[r,t] = 0` when unavailable;
/// `min_lot_size[r] · y[r,t] ≤ Q[r,t]`.
fn capacity_availability_lot_size(
    vars: &ModelVariables,
    mission: &MissionData,
    weeks: &[Week],
    out: &mut Vec<Constraint>,
) {
    for method in &mission.methods {
        let lot_size = mission.min_lot_size.get(method).copied().unwrap_or(0.0);
        for &t in weeks {
            let capacity = mission
                .max_capacity
                .get(&(method.clone(), t))
                .copied()
                .unwrap_or(0.0);
            let q = vars.q[&(method.clone(), t)];
            let y = vars.y[&(method.clone(), t)];
            out.push(constraint!(q <= capacity * y));
            out.push(constraint!(lot_size * y <= q));

            let available = mission
                .availability
                .get(&(method.clone(), t))
                .copied()
                .unwrap_or(true);
            if !available {
                out.push(constraint!(y == 0.0));
            }
        }
    }
}

/// 10. Weekly crew/energy budgets, skipped (no constraint) when the budget
/// is absent (the default is `+∞`, i.e. unconstrained).
fn resource_envelopes(vars: &ModelVariables, mission: &MissionData, weeks: &[Week], out: &mut Vec<Constraint>) {
    for &t in weeks {
        if let Some(&crew_budget) = mission.crew_available.get(&t) {
            let mut crew_used = Expression::from(0.0);
            for method in &mission.methods {
                let cost = mission.crew_cost.get(method).copied().unwrap_or(0.0);
                if cost != 0.0 {
                    crew_used += cost * vars.q[&(method.clone(), t)];
                }
            }
            for sub in &mission.substitutes {
                let cost = mission.substitute_assembly_crew.get(sub).copied().unwrap_or(0.0);
                if cost != 0.0 {
                    crew_used += cost * vars.make_sub[&(sub.clone(), t)];
                }
            }
            out.push(constraint!(crew_used <= crew_budget));
        }

        if let Some(&energy_budget) = mission.energy_available.get(&t) {
            let mut energy_used = Expression::from(0.0);
            for method in &mission.methods {
                let cost = mission.energy_cost.get(method).copied().unwrap_or(0.0);
                if cost != 0.0 {
                    energy_used += cost * vars.q[&(method.clone(), t)];
                }
            }
            for sub in &mission.substitutes {
                let cost = mission.substitute_assembly_energy.get(sub).copied().unwrap_or(0.0);
                if cost != 0.0 {
                    energy_used += cost * vars.make_sub[&(sub.clone(), t)];
                }
            }
            out.push(constraint!(energy_used <= energy_budget));
        }
    }
}

/// 11. `Σ_{τ ≤ t} item_used[k,τ] ≥ a` for every `{k,t,a}` in `deadlines`.
fn deadlines(vars: &ModelVariables, mission: &MissionData, out: &mut Vec<Constraint>) {
    for deadline in &mission.deadlines {
        let mut cumulative = Expression::from(0.0);
        for &tau in &mission.sorted_weeks() {
            if tau > deadline.week {
                break;
            }
            if let Some(&v) = vars.item_used.get(&(deadline.item.clone(), tau)) {
                cumulative += v;
            }
        }
        out.push(constraint!(cumulative >= deadline.amount));
    }
}

/// Builds `prev_value_expr`: `initial` if `t` is the first week of the
/// horizon, else the referenced variable at `prev(t)`. `lookup` converts a
/// previous-week `Variable` into an `Expression` (typically via `.into()`).
fn prev_value_expr(
    mission: &MissionData,
    t: Week,
    initial: f64,
    lookup: impl FnOnce(Week) -> Expression,
) -> Expression {
    match mission.prev_week(t) {
        Some(prev_t) => lookup(prev_t),
        None => Expression::from(initial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use good_lp::ProblemVariables;
    use msp_core::{ItemId, MaterialId, MethodId, OutputId, SubstituteId, Week};

    fn tiny_mission() -> MissionData {
        let mut mission = MissionData::default();
        mission.materials = vec![MaterialId::new("plastic")];
        mission.methods = vec![MethodId::new("extrude")];
        mission.outputs = vec![OutputId::new("filament")];
        mission.items = vec![ItemId::new("spare_part")];
        mission.substitutes = vec![SubstituteId::new("printed_part")];
        mission.weeks = vec![Week::new(1), Week::new(2)];
        mission
            .yields
            .insert((MaterialId::new("plastic"), MethodId::new("extrude"), OutputId::new("filament")), 0.8);
        mission
            .substitute_make_recipe
            .insert((SubstituteId::new("printed_part"), OutputId::new("filament")), 1.0);
        mission
            .substitutes_can_replace
            .entry(ItemId::new("spare_part"))
            .or_default()
            .insert(SubstituteId::new("printed_part"));
        mission
    }

    #[test]
    fn test_add_constraints_builds_nonempty_set() {
        let mission = tiny_mission();
        let mut vars = ProblemVariables::new();
        let model_vars = crate::variables::build_variables(&mut vars, &mission);
        let constraints = add_constraints(&model_vars, &mission);
        assert!(!constraints.is_empty());
    }

    #[test]
    fn test_unavailable_method_forces_y_zero() {
        let mut mission = tiny_mission();
        mission
            .availability
            .insert((MethodId::new("extrude"), Week::new(1)), false);
        let mut vars = ProblemVariables::new();
        let model_vars = crate::variables::build_variables(&mut vars, &mission);
        let constraints = add_constraints(&model_vars, &mission);
        // One extra constraint beyond the always-present capacity/lot-size pair.
        assert!(constraints.len() > 2 * mission.methods.len() * mission.weeks.len());
    }

    #[test]
    fn test_deadline_constraint_only_sums_up_to_its_week() {
        let mut mission = tiny_mission();
        mission.deadlines.push(msp_core::Deadline {
            item: ItemId::new("spare_part"),
            week: Week::new(1),
            amount: 5.0,
        });
        let mut vars = ProblemVariables::new();
        let model_vars = crate::variables::build_variables(&mut vars, &mission);
        let before = add_constraints(&model_vars, &{
            let mut m = mission.clone();
            m.deadlines.clear();
            m
        })
        .len();
        let after = add_constraints(&model_vars, &mission).len();
        assert_eq!(after, before + 1);
    }
}
