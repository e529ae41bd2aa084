//! Reads solved decision-variable values back into the canonical result
//! document described in §4.3. Every accessor treats a variable that
//! couldn't be looked up (shouldn't happen, but numerically-degenerate
//! solves are explicitly tolerated by the spec) as 0 rather than panicking.

use std::collections::HashMap;

use good_lp::Solution;
use serde::Serialize;

use msp_core::{MissionData, Week};

use crate::variables::ModelVariables;

#[derive(Debug, Clone, Serialize)]
pub struct MethodScheduleEntry {
    pub processed_kg: f64,
    pub is_running: bool,
    pub by_material: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleWeek {
    pub week: i64,
    pub methods: HashMap<String, MethodScheduleEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputWeekEntry {
    pub produced_kg: f64,
    pub inventory_kg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputResult {
    pub output: String,
    pub weeks: HashMap<i64, OutputWeekEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubstituteWeekEntry {
    pub made: f64,
    pub inventory: f64,
    pub used_for: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubstituteResult {
    pub substitute: String,
    pub weeks: HashMap<i64, SubstituteWeekEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemWeekEntry {
    pub used_total: f64,
    pub used_carried: f64,
    pub shortage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub item: String,
    pub weeks: HashMap<i64, ItemWeekEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub objective_value: f64,
    pub total_processed_kg: f64,
    pub total_output_produced_kg: f64,
    pub total_substitutes_made: f64,
    pub substitute_breakdown: HashMap<String, f64>,
    pub total_initial_carriage_weight: f64,
    pub total_final_carriage_weight: f64,
    pub total_carried_weight_loss: f64,
    pub carried_weight_loss_by_item: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolverStatusReport {
    pub status: String,
    pub termination_condition: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedResult {
    pub schedule: Vec<ScheduleWeek>,
    pub outputs: Vec<OutputResult>,
    pub substitutes: Vec<SubstituteResult>,
    pub items: Vec<ItemResult>,
    pub summary: Summary,
    pub solver_status: SolverStatusReport,
}

pub fn extract(
    solution: &impl Solution,
    vars: &ModelVariables,
    mission: &MissionData,
    objective_value: f64,
    backend_name: &str,
) -> ExtractedResult {
    let weeks = mission.sorted_weeks();
    let value_of = |v: Option<good_lp::Variable>| v.map(|v| solution.value(v)).unwrap_or(0.0);

    let schedule = weeks
        .iter()
        .map(|&t| {
            let methods = mission
                .methods
                .iter()
                .map(|method| {
                    let q = value_of(vars.q.get(&(method.clone(), t)).copied());
                    let y = value_of(vars.y.get(&(method.clone(), t)).copied());
                    let by_material = mission
                        .materials
                        .iter()
                        .map(|material| {
                            (
                                material.to_string(),
                                value_of(vars.p.get(&(material.clone(), method.clone(), t)).copied()),
                            )
                        })
                        .collect();
                    (
                        method.to_string(),
                        MethodScheduleEntry {
                            processed_kg: q,
                            is_running: y >= 0.5,
                            by_material,
                        },
                    )
                })
                .collect();
            ScheduleWeek { week: t.value(), methods }
        })
        .collect();

    let outputs = mission
        .outputs
        .iter()
        .map(|output| {
            let weeks_map = weeks
                .iter()
                .map(|&t| {
                    (
                        t.value(),
                        OutputWeekEntry {
                            produced_kg: value_of(vars.o_prod.get(&(output.clone(), t)).copied()),
                            inventory_kg: value_of(vars.o_inv.get(&(output.clone(), t)).copied()),
                        },
                    )
                })
                .collect();
            OutputResult {
                output: output.to_string(),
                weeks: weeks_map,
            }
        })
        .collect();

    let substitutes = mission
        .substitutes
        .iter()
        .map(|sub| {
            let weeks_map = weeks
                .iter()
                .map(|&t| {
                    let used_for = mission
                        .items
                        .iter()
                        .filter_map(|item| {
                            vars.sub_used_for_of(sub, item, t)
                                .map(|v| (item.to_string(), solution.value(v)))
                        })
                        .collect();
                    (
                        t.value(),
                        SubstituteWeekEntry {
                            made: value_of(vars.make_sub.get(&(sub.clone(), t)).copied()),
                            inventory: value_of(vars.sub_inv.get(&(sub.clone(), t)).copied()),
                            used_for,
                        },
                    )
                })
                .collect();
            SubstituteResult {
                substitute: sub.to_string(),
                weeks: weeks_map,
            }
        })
        .collect();

    let items = mission
        .items
        .iter()
        .map(|item| {
            let weeks_map = weeks
                .iter()
                .map(|&t| {
                    (
                        t.value(),
                        ItemWeekEntry {
                            used_total: value_of(vars.item_used.get(&(item.clone(), t)).copied()),
                            used_carried: value_of(vars.carried_used.get(&(item.clone(), t)).copied()),
                            shortage: value_of(vars.item_short.get(&(item.clone(), t)).copied()),
                        },
                    )
                })
                .collect();
            ItemResult {
                item: item.to_string(),
                weeks: weeks_map,
            }
        })
        .collect();

    let summary = build_summary(solution, vars, mission, &weeks, objective_value);

    ExtractedResult {
        schedule,
        outputs,
        substitutes,
        items,
        summary,
        solver_status: SolverStatusReport {
            status: "optimal".to_string(),
            termination_condition: backend_name.to_string(),
        },
    }
}

fn build_summary(
    solution: &impl Solution,
    vars: &ModelVariables,
    mission: &MissionData,
    weeks: &[Week],
    objective_value: f64,
) -> Summary {
    let total_processed_kg: f64 = vars.p.values().map(|&v| solution.value(v)).sum();
    let total_output_produced_kg: f64 = vars.o_prod.values().map(|&v| solution.value(v)).sum();

    let mut substitute_breakdown = HashMap::new();
    for sub in &mission.substitutes {
        let total: f64 = weeks
            .iter()
            .map(|&t| vars.make_sub.get(&(sub.clone(), t)).map(|&v| solution.value(v)).unwrap_or(0.0))
            .sum();
        substitute_breakdown.insert(sub.to_string(), total);
    }
    let total_substitutes_made: f64 = substitute_breakdown.values().sum();

    let total_initial_carriage_weight: f64 = mission
        .items
        .iter()
        .map(|item| {
            let mass = mission.item_mass.get(item).copied().unwrap_or(0.0);
            let initial = mission.initial_inventory.items.get(item).copied().unwrap_or(0.0);
            mass * initial
        })
        .sum();

    let last_week = weeks.last().copied();
    let total_final_carriage_weight: f64 = mission
        .items
        .iter()
        .map(|item| {
            let mass = mission.item_mass.get(item).copied().unwrap_or(0.0);
            let final_inv = last_week
                .and_then(|t| vars.carried_inv.get(&(item.clone(), t)))
                .map(|&v| solution.value(v))
                .unwrap_or(0.0);
            mass * final_inv
        })
        .sum();

    let mut carried_weight_loss_by_item = HashMap::new();
    for item in &mission.items {
        let mass = mission.item_mass.get(item).copied().unwrap_or(0.0);
        let consumed: f64 = weeks
            .iter()
            .map(|&t| vars.carried_used.get(&(item.clone(), t)).map(|&v| solution.value(v)).unwrap_or(0.0))
            .sum();
        carried_weight_loss_by_item.insert(item.to_string(), mass * consumed);
    }
    let sum_carried_used_weight: f64 = carried_weight_loss_by_item.values().sum();
    // Starting carriage weight minus what remains minus what was actively
    // drawn down, giving the weight that left the carried pool this horizon.
    let total_carried_weight_loss: f64 =
        total_initial_carriage_weight - total_final_carriage_weight + sum_carried_used_weight;

    Summary {
        objective_value,
        total_processed_kg,
        total_output_produced_kg,
        total_substitutes_made,
        substitute_breakdown,
        total_initial_carriage_weight,
        total_final_carriage_weight,
        total_carried_weight_loss,
        carried_weight_loss_by_item,
    }
}
