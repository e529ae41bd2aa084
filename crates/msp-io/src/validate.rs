//! Validates a normalized [`MissionData`] against the invariants every
//! downstream model-builder assumes: every indexed parameter references a
//! known entity, required entity sets are non-empty, and no quantity that
//! must be non-negative has slipped through negative.
//!
//! Unlike normalization, validation never aborts early — it enumerates every
//! violation it finds into a single [`Diagnostics`] collection so a caller
//! can report the whole list at once rather than one round-trip per error.

use std::collections::HashSet;

use msp_core::diagnostics::Diagnostics;
use msp_core::{ItemId, MaterialId, MethodId, MissionData, OutputId, SubstituteId, Week};

/// Runs every structural and referential check against `mission` and
/// returns the accumulated diagnostics. The caller decides what counts as
/// fatal; `diagnostics.has_errors()` is the conventional gate before a job
/// proceeds to `msp-algo`.
pub fn validate(mission: &MissionData) -> Diagnostics {
    let mut diag = Diagnostics::new();

    check_required_sets_nonempty(mission, &mut diag);
    check_entity_references(mission, &mut diag);
    check_non_negative(mission, &mut diag);

    diag
}

fn check_required_sets_nonempty(mission: &MissionData, diag: &mut Diagnostics) {
    if mission.materials.is_empty() {
        diag.add_error("structure", "no materials defined");
    }
    if mission.methods.is_empty() {
        diag.add_error("structure", "no recycling methods defined");
    }
    if mission.outputs.is_empty() {
        diag.add_error("structure", "no outputs defined");
    }
    if mission.items.is_empty() {
        diag.add_error("structure", "no items defined");
    }
    if mission.weeks.is_empty() {
        diag.add_error("structure", "planning horizon has no weeks");
    }
    if mission.substitutes.is_empty() {
        diag.add_warning("structure", "no substitutes defined; fabrication is unavailable");
    }
}

fn check_entity_references(mission: &MissionData, diag: &mut Diagnostics) {
    let materials: HashSet<&MaterialId> = mission.materials.iter().collect();
    let methods: HashSet<&MethodId> = mission.methods.iter().collect();
    let outputs: HashSet<&OutputId> = mission.outputs.iter().collect();
    let items: HashSet<&ItemId> = mission.items.iter().collect();
    let substitutes: HashSet<&SubstituteId> = mission.substitutes.iter().collect();
    let weeks: HashSet<&Week> = mission.weeks.iter().collect();

    let ref_item = |item: &ItemId, diag: &mut Diagnostics, field: &str| {
        if !items.contains(item) {
            diag.add_error_with_entity("reference", &format!("{field} references unknown item"), item.as_str());
        }
    };
    let ref_material = |material: &MaterialId, diag: &mut Diagnostics, field: &str| {
        if !materials.contains(material) {
            diag.add_error_with_entity(
                "reference",
                &format!("{field} references unknown material"),
                material.as_str(),
            );
        }
    };
    let ref_method = |method: &MethodId, diag: &mut Diagnostics, field: &str| {
        if !methods.contains(method) {
            diag.add_error_with_entity("reference", &format!("{field} references unknown method"), method.as_str());
        }
    };
    let ref_output = |output: &OutputId, diag: &mut Diagnostics, field: &str| {
        if !outputs.contains(output) {
            diag.add_error_with_entity("reference", &format!("{field} references unknown output"), output.as_str());
        }
    };
    let ref_substitute = |sub: &SubstituteId, diag: &mut Diagnostics, field: &str| {
        if !substitutes.contains(sub) {
            diag.add_error_with_entity(
                "reference",
                &format!("{field} references unknown substitute"),
                sub.as_str(),
            );
        }
    };
    let ref_week = |week: &Week, diag: &mut Diagnostics, field: &str| {
        if !weeks.contains(week) {
            diag.add_error_with_entity(
                "reference",
                &format!("{field} references week outside the planning horizon"),
                &week.to_string(),
            );
        }
    };

    for item in mission.initial_inventory.items.keys() {
        ref_item(item, diag, "initial_inventory.items");
    }
    for material in mission.initial_inventory.materials.keys() {
        ref_material(material, diag, "initial_inventory.materials");
    }
    for output in mission.initial_inventory.outputs.keys() {
        ref_output(output, diag, "initial_inventory.outputs");
    }
    for sub in mission.initial_inventory.substitutes.keys() {
        ref_substitute(sub, diag, "initial_inventory.substitutes");
    }

    for item in mission.item_mass.keys() {
        ref_item(item, diag, "item_mass");
    }
    for item in mission.item_lifetime.keys() {
        ref_item(item, diag, "item_lifetime");
    }
    for sub in mission.substitute_lifetime.keys() {
        ref_substitute(sub, diag, "substitute_lifetime");
    }
    for (item, material) in mission.item_waste.keys() {
        ref_item(item, diag, "item_waste");
        ref_material(material, diag, "item_waste");
    }
    for (sub, material) in mission.substitute_waste.keys() {
        ref_substitute(sub, diag, "substitute_waste");
        ref_material(material, diag, "substitute_waste");
    }
    for (item, week) in mission.item_demands.keys() {
        ref_item(item, diag, "item_demands");
        ref_week(week, diag, "item_demands");
    }
    for (material, method, output) in mission.yields.keys() {
        ref_material(material, diag, "yields");
        ref_method(method, diag, "yields");
        ref_output(output, diag, "yields");
    }
    for (method, week) in mission.max_capacity.keys() {
        ref_method(method, diag, "max_capacity");
        ref_week(week, diag, "max_capacity");
    }
    for method in mission.min_lot_size.keys() {
        ref_method(method, diag, "min_lot_size");
    }
    for (method, week) in mission.availability.keys() {
        ref_method(method, diag, "availability");
        ref_week(week, diag, "availability");
    }
    for method in mission.crew_cost.keys() {
        ref_method(method, diag, "crew_cost");
    }
    for method in mission.energy_cost.keys() {
        ref_method(method, diag, "energy_cost");
    }
    for week in mission.crew_available.keys() {
        ref_week(week, diag, "crew_available");
    }
    for week in mission.energy_available.keys() {
        ref_week(week, diag, "energy_available");
    }
    for method in mission.risk_cost.keys() {
        ref_method(method, diag, "risk_cost");
    }
    for output in mission.output_capacity.keys() {
        ref_output(output, diag, "output_capacity");
    }
    for material in mission.input_capacity.keys() {
        ref_material(material, diag, "input_capacity");
    }
    for output in mission.output_values.keys() {
        ref_output(output, diag, "output_values");
    }
    for sub in mission.substitute_values.keys() {
        ref_substitute(sub, diag, "substitute_values");
    }
    for (sub, output) in mission.substitute_make_recipe.keys() {
        ref_substitute(sub, diag, "substitute_make_recipe");
        ref_output(output, diag, "substitute_make_recipe");
    }
    for sub in mission.substitute_assembly_crew.keys() {
        ref_substitute(sub, diag, "substitute_assembly_crew");
    }
    for sub in mission.substitute_assembly_energy.keys() {
        ref_substitute(sub, diag, "substitute_assembly_energy");
    }
    for (item, subs) in &mission.substitutes_can_replace {
        ref_item(item, diag, "substitutes_can_replace");
        for sub in subs {
            ref_substitute(sub, diag, "substitutes_can_replace");
        }
    }
    for deadline in &mission.deadlines {
        ref_item(&deadline.item, diag, "deadlines");
        ref_week(&deadline.week, diag, "deadlines");
    }
}

fn check_non_negative(mission: &MissionData, diag: &mut Diagnostics) {
    let mut nonneg = |value: f64, field: &str, entity: &str| {
        if value < 0.0 {
            diag.add_error_with_entity("range", &format!("{field} must be non-negative, got {value}"), entity);
        }
    };

    for (item, value) in &mission.item_mass {
        nonneg(*value, "item_mass", item.as_str());
    }
    for (item, value) in &mission.initial_inventory.items {
        nonneg(*value, "initial_inventory.items", item.as_str());
    }
    for (material, value) in &mission.initial_inventory.materials {
        nonneg(*value, "initial_inventory.materials", material.as_str());
    }
    for (output, value) in &mission.initial_inventory.outputs {
        nonneg(*value, "initial_inventory.outputs", output.as_str());
    }
    for (sub, value) in &mission.initial_inventory.substitutes {
        nonneg(*value, "initial_inventory.substitutes", sub.as_str());
    }
    for ((item, material), value) in &mission.item_waste {
        nonneg(*value, "item_waste", &format!("{item}/{material}"));
    }
    for ((sub, material), value) in &mission.substitute_waste {
        nonneg(*value, "substitute_waste", &format!("{sub}/{material}"));
    }
    for ((item, week), value) in &mission.item_demands {
        nonneg(*value, "item_demands", &format!("{item}/{week}"));
    }
    for ((material, method, output), value) in &mission.yields {
        nonneg(*value, "yields", &format!("{material}/{method}/{output}"));
    }
    for ((method, week), value) in &mission.max_capacity {
        nonneg(*value, "max_capacity", &format!("{method}/{week}"));
    }
    for (method, value) in &mission.min_lot_size {
        nonneg(*value, "min_lot_size", method.as_str());
    }
    for (method, value) in &mission.crew_cost {
        nonneg(*value, "crew_cost", method.as_str());
    }
    for (method, value) in &mission.energy_cost {
        nonneg(*value, "energy_cost", method.as_str());
    }
    for (week, value) in &mission.crew_available {
        nonneg(*value, "crew_available", &week.to_string());
    }
    for (week, value) in &mission.energy_available {
        nonneg(*value, "energy_available", &week.to_string());
    }
    for (method, value) in &mission.risk_cost {
        nonneg(*value, "risk_cost", method.as_str());
    }
    for (output, value) in &mission.output_capacity {
        nonneg(*value, "output_capacity", output.as_str());
    }
    for (material, value) in &mission.input_capacity {
        nonneg(*value, "input_capacity", material.as_str());
    }
    for (output, value) in &mission.output_values {
        nonneg(*value, "output_values", output.as_str());
    }
    for (sub, value) in &mission.substitute_values {
        nonneg(*value, "substitute_values", sub.as_str());
    }
    for ((sub, output), value) in &mission.substitute_make_recipe {
        nonneg(*value, "substitute_make_recipe", &format!("{sub}/{output}"));
    }
    for (sub, value) in &mission.substitute_assembly_crew {
        nonneg(*value, "substitute_assembly_crew", sub.as_str());
    }
    for (sub, value) in &mission.substitute_assembly_energy {
        nonneg(*value, "substitute_assembly_energy", sub.as_str());
    }
    for deadline in &mission.deadlines {
        nonneg(deadline.amount, "deadlines.amount", deadline.item.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msp_core::{Deadline, MaterialId, MethodId, OutputId};

    fn minimal_valid_mission() -> MissionData {
        let mut mission = MissionData::default();
        mission.materials = vec![MaterialId::new("plastic")];
        mission.methods = vec![MethodId::new("extrude")];
        mission.outputs = vec![OutputId::new("filament")];
        mission.items = vec![ItemId::new("spare_part")];
        mission.substitutes = vec![SubstituteId::new("printed_part")];
        mission.weeks = vec![Week::new(1), Week::new(2)];
        mission
    }

    #[test]
    fn test_valid_mission_has_no_errors() {
        let mission = minimal_valid_mission();
        let diag = validate(&mission);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_missing_entity_sets_report_errors() {
        let mission = MissionData::default();
        let diag = validate(&mission);
        assert!(diag.has_errors());
        assert!(diag.error_count() >= 5);
    }

    #[test]
    fn test_dangling_item_reference_is_reported() {
        let mut mission = minimal_valid_mission();
        mission
            .item_demands
            .insert((ItemId::new("ghost_item"), Week::new(1)), 3.0);
        let diag = validate(&mission);
        assert!(diag
            .errors()
            .any(|i| i.category == "reference" && i.message.contains("item_demands")));
    }

    #[test]
    fn test_week_outside_horizon_is_reported() {
        let mut mission = minimal_valid_mission();
        mission
            .item_demands
            .insert((ItemId::new("spare_part"), Week::new(99)), 3.0);
        let diag = validate(&mission);
        assert!(diag
            .errors()
            .any(|i| i.category == "reference" && i.message.contains("planning horizon")));
    }

    #[test]
    fn test_negative_value_is_reported() {
        let mut mission = minimal_valid_mission();
        mission.item_mass.insert(ItemId::new("spare_part"), -1.0);
        let diag = validate(&mission);
        assert!(diag
            .errors()
            .any(|i| i.category == "range" && i.message.contains("item_mass")));
    }

    #[test]
    fn test_empty_substitutes_is_a_warning_not_an_error() {
        let mut mission = minimal_valid_mission();
        mission.substitutes.clear();
        let diag = validate(&mission);
        assert!(!diag.has_errors());
        assert!(diag.has_warnings());
    }

    #[test]
    fn test_deadline_referencing_unknown_item_is_reported() {
        let mut mission = minimal_valid_mission();
        mission.deadlines.push(Deadline {
            item: ItemId::new("ghost_item"),
            week: Week::new(1),
            amount: 5.0,
        });
        let diag = validate(&mission);
        assert!(diag
            .errors()
            .any(|i| i.category == "reference" && i.message.contains("deadlines")));
    }
}
