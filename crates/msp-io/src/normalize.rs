//! Converts a raw wire-format JSON payload into a [`MissionData`].
//!
//! Mirrors the normalization step of the reference implementation's
//! `_normalize_input`: stringified tuple keys become structured keys,
//! digit-string week keys become integers, and every optional nested
//! sub-map is materialized (never left absent) before validation runs.

use std::collections::{HashMap, HashSet};

use msp_core::diagnostics::NormalizationDiagnostics;
use msp_core::{
    Deadline, InitialInventory, ItemId, MaterialId, MethodId, MissionData, OutputId, SubstituteId,
    Week, Weights,
};
use serde_json::{Map, Value};

use crate::error::IoError;
use crate::keys::{parse_scalar_week_key, parse_tuple_key};

/// Top-level normalization entry point. Fails only if `raw` isn't a JSON
/// object; every other malformed-input condition is recorded in the
/// returned diagnostics instead of aborting, so validation can report a
/// complete list of problems.
pub fn normalize(raw: &Value) -> Result<(MissionData, NormalizationDiagnostics), IoError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| IoError::NotAnObject(value_kind(raw)))?;

    let mut diag = NormalizationDiagnostics::new();
    let mut mission = MissionData::default();

    mission.materials = string_list(obj, "materials").into_iter().map(MaterialId::new).collect();
    mission.methods = string_list(obj, "methods").into_iter().map(MethodId::new).collect();
    mission.outputs = string_list(obj, "outputs").into_iter().map(OutputId::new).collect();
    mission.items = string_list(obj, "items").into_iter().map(ItemId::new).collect();
    mission.substitutes = string_list(obj, "substitutes").into_iter().map(SubstituteId::new).collect();
    mission.weeks = int_list(obj, "weeks").into_iter().map(Week::new).collect();

    diag.stats.materials = mission.materials.len();
    diag.stats.methods = mission.methods.len();
    diag.stats.outputs = mission.outputs.len();
    diag.stats.items = mission.items.len();
    diag.stats.substitutes = mission.substitutes.len();
    diag.stats.weeks = mission.weeks.len();

    mission.initial_inventory = normalize_initial_inventory(obj);

    mission.item_mass = f64_map_by_key(obj, "item_mass", ItemId::new);
    mission.item_lifetime = u32_map_by_key(obj, "item_lifetime", ItemId::new, &mut diag);
    mission.substitute_lifetime = u32_map_by_key(obj, "substitute_lifetime", SubstituteId::new, &mut diag);

    mission.item_waste = tuple2_map(obj, "item_waste", ItemId::new, MaterialId::new, &mut diag);
    mission.substitute_waste =
        tuple2_map(obj, "substitute_waste", SubstituteId::new, MaterialId::new, &mut diag);
    mission.item_demands = tuple2_week_map(obj, "item_demands", ItemId::new, &mut diag);
    mission.yields = tuple3_map(
        obj,
        "yields",
        MaterialId::new,
        MethodId::new,
        OutputId::new,
        &mut diag,
    );
    mission.max_capacity = tuple2_week_first_map(obj, "max_capacity", MethodId::new, &mut diag);
    mission.min_lot_size = f64_map_by_key(obj, "min_lot_size", MethodId::new);
    mission.availability = availability_map(obj, "availability", &mut diag);

    mission.crew_cost = f64_map_by_key(obj, "crew_cost", MethodId::new);
    mission.energy_cost = f64_map_by_key(obj, "energy_cost", MethodId::new);
    mission.crew_available = scalar_week_map(obj, "crew_available", &mut diag);
    mission.energy_available = scalar_week_map(obj, "energy_available", &mut diag);
    mission.risk_cost = f64_map_by_key(obj, "risk_cost", MethodId::new);

    mission.output_capacity = f64_map_by_key(obj, "output_capacity", OutputId::new);
    mission.input_capacity = f64_map_by_key(obj, "input_capacity", MaterialId::new);
    mission.output_values = f64_map_by_key(obj, "output_values", OutputId::new);
    mission.substitute_values = f64_map_by_key(obj, "substitute_values", SubstituteId::new);

    mission.substitute_make_recipe = tuple2_map(
        obj,
        "substitute_make_recipe",
        SubstituteId::new,
        OutputId::new,
        &mut diag,
    );
    mission.substitute_assembly_crew = f64_map_by_key(obj, "substitute_assembly_crew", SubstituteId::new);
    mission.substitute_assembly_energy =
        f64_map_by_key(obj, "substitute_assembly_energy", SubstituteId::new);

    mission.substitutes_can_replace = normalize_eligibility(obj);
    mission.deadlines = normalize_deadlines(obj, &mut diag);
    mission.weights = normalize_weights(obj);

    Ok((mission, diag))
}

fn value_kind(v: &Value) -> String {
    match v {
        Value::Null => "null".into(),
        Value::Bool(_) => "bool".into(),
        Value::Number(_) => "number".into(),
        Value::String(_) => "string".into(),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Vec<String> {
    obj.get(field)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn int_list(obj: &Map<String, Value>, field: &str) -> Vec<i64> {
    obj.get(field)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_initial_inventory(obj: &Map<String, Value>) -> InitialInventory {
    let sub = obj.get("initial_inventory").and_then(Value::as_object);
    InitialInventory {
        materials: sub_f64_map(sub, "materials", MaterialId::new),
        outputs: sub_f64_map(sub, "outputs", OutputId::new),
        items: sub_f64_map(sub, "items", ItemId::new),
        substitutes: sub_f64_map(sub, "substitutes", SubstituteId::new),
    }
}

fn sub_f64_map<K, F>(sub: Option<&Map<String, Value>>, field: &str, make_id: F) -> HashMap<K, f64>
where
    K: std::hash::Hash + Eq,
    F: Fn(&str) -> K,
{
    sub.and_then(|m| m.get(field))
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| as_f64(v).map(|f| (make_id(k), f)))
                .collect()
        })
        .unwrap_or_default()
}

/// `f64_map_by_key` is the workhorse for every flat `EntityId -> f64` map at
/// the top level of the payload: iterate the named object field, coerce the
/// value to a float, key by `make_id(raw_key)`.
fn f64_map_by_key<K, F>(obj: &Map<String, Value>, field: &str, make_id: F) -> HashMap<K, f64>
where
    K: std::hash::Hash + Eq,
    F: Fn(&str) -> K,
{
    obj.get(field)
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| as_f64(v).map(|f| (make_id(k), f)))
                .collect()
        })
        .unwrap_or_default()
}

fn u32_map_by_key<K, F>(
    obj: &Map<String, Value>,
    field: &str,
    make_id: F,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<K, u32>
where
    K: std::hash::Hash + Eq,
    F: Fn(&str) -> K,
{
    let mut result = HashMap::new();
    if let Some(m) = obj.get(field).and_then(Value::as_object) {
        for (k, v) in m {
            match as_f64(v) {
                Some(f) if f >= 0.0 => {
                    result.insert(make_id(k), f.round() as u32);
                }
                _ => diag.add_error(
                    "parse",
                    &format!("{field}[{k}] must be a non-negative integer, got {v}"),
                ),
            }
        }
    }
    result
}

fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

fn as_bool01(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.as_str() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn tuple_obj<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Map<String, Value>> {
    obj.get(field).and_then(Value::as_object)
}

fn tuple2_map<K1, K2, F1, F2>(
    obj: &Map<String, Value>,
    field: &str,
    make_k1: F1,
    make_k2: F2,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<(K1, K2), f64>
where
    K1: std::hash::Hash + Eq,
    K2: std::hash::Hash + Eq,
    F1: Fn(&str) -> K1,
    F2: Fn(&str) -> K2,
{
    let mut result = HashMap::new();
    let Some(m) = tuple_obj(obj, field) else {
        return result;
    };
    for (raw_key, v) in m {
        let Some(f) = as_f64(v) else {
            diag.add_error("parse", &format!("{field}[{raw_key}] is not numeric"));
            continue;
        };
        match parse_tuple_key(raw_key) {
            Ok(parts) if parts.len() == 2 => {
                let (Some(a), Some(b)) = (parts[0].as_str(), parts[1].as_str()) else {
                    diag.add_malformed_key(raw_key, &format!("{field} key components must be entity names"));
                    continue;
                };
                result.insert((make_k1(a), make_k2(b)), f);
            }
            Ok(parts) => diag.add_malformed_key(
                raw_key,
                &format!("{field} expects a 2-tuple key, got {} components", parts.len()),
            ),
            Err(reason) => diag.add_malformed_key(raw_key, &reason),
        }
    }
    result
}

fn tuple2_week_map<K1, F1>(
    obj: &Map<String, Value>,
    field: &str,
    make_k1: F1,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<(K1, Week), f64>
where
    K1: std::hash::Hash + Eq,
    F1: Fn(&str) -> K1,
{
    let mut result = HashMap::new();
    let Some(m) = tuple_obj(obj, field) else {
        return result;
    };
    for (raw_key, v) in m {
        let Some(f) = as_f64(v) else {
            diag.add_error("parse", &format!("{field}[{raw_key}] is not numeric"));
            continue;
        };
        match parse_tuple_key(raw_key) {
            Ok(parts) if parts.len() == 2 => {
                let Some(a) = parts[0].as_str() else {
                    diag.add_malformed_key(raw_key, &format!("{field} first component must be an entity name"));
                    continue;
                };
                let Some(t) = parts[1].as_int() else {
                    diag.add_malformed_key(raw_key, &format!("{field} second component must be an integer week"));
                    continue;
                };
                result.insert((make_k1(a), Week::new(t)), f);
            }
            Ok(parts) => diag.add_malformed_key(
                raw_key,
                &format!("{field} expects a 2-tuple key, got {} components", parts.len()),
            ),
            Err(reason) => diag.add_malformed_key(raw_key, &reason),
        }
    }
    result
}

/// `max_capacity[(r,t)]`/`availability[(r,t)]` share the `(Method, Week)` shape.
fn tuple2_week_first_map<F1>(
    obj: &Map<String, Value>,
    field: &str,
    make_method: F1,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<(MethodId, Week), f64>
where
    F1: Fn(&str) -> MethodId,
{
    tuple2_week_map(obj, field, make_method, diag)
}

fn availability_map(
    obj: &Map<String, Value>,
    field: &str,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<(MethodId, Week), bool> {
    let mut result = HashMap::new();
    let Some(m) = tuple_obj(obj, field) else {
        return result;
    };
    for (raw_key, v) in m {
        let Some(b) = as_bool01(v) else {
            diag.add_error(
                "validation",
                &format!("{field}[{raw_key}] must be 0 or 1, got {v}"),
            );
            continue;
        };
        match parse_tuple_key(raw_key) {
            Ok(parts) if parts.len() == 2 => {
                let (Some(r), Some(t)) = (parts[0].as_str(), parts[1].as_int()) else {
                    diag.add_malformed_key(raw_key, &format!("{field} key must be (method, week)"));
                    continue;
                };
                result.insert((MethodId::new(r), Week::new(t)), b);
            }
            Ok(parts) => diag.add_malformed_key(
                raw_key,
                &format!("{field} expects a 2-tuple key, got {} components", parts.len()),
            ),
            Err(reason) => diag.add_malformed_key(raw_key, &reason),
        }
    }
    result
}

fn tuple3_map<K1, K2, K3, F1, F2, F3>(
    obj: &Map<String, Value>,
    field: &str,
    make_k1: F1,
    make_k2: F2,
    make_k3: F3,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<(K1, K2, K3), f64>
where
    K1: std::hash::Hash + Eq,
    K2: std::hash::Hash + Eq,
    K3: std::hash::Hash + Eq,
    F1: Fn(&str) -> K1,
    F2: Fn(&str) -> K2,
    F3: Fn(&str) -> K3,
{
    let mut result = HashMap::new();
    let Some(m) = tuple_obj(obj, field) else {
        return result;
    };
    for (raw_key, v) in m {
        let Some(f) = as_f64(v) else {
            diag.add_error("parse", &format!("{field}[{raw_key}] is not numeric"));
            continue;
        };
        match parse_tuple_key(raw_key) {
            Ok(parts) if parts.len() == 3 => {
                let (Some(a), Some(b), Some(c)) =
                    (parts[0].as_str(), parts[1].as_str(), parts[2].as_str())
                else {
                    diag.add_malformed_key(raw_key, &format!("{field} key components must be entity names"));
                    continue;
                };
                result.insert((make_k1(a), make_k2(b), make_k3(c)), f);
            }
            Ok(parts) => diag.add_malformed_key(
                raw_key,
                &format!("{field} expects a 3-tuple key, got {} components", parts.len()),
            ),
            Err(reason) => diag.add_malformed_key(raw_key, &reason),
        }
    }
    result
}

/// Absent weeks are simply not present in the returned map; callers treat a
/// missing entry as `+∞` availability per §4.1's default-filling rule rather
/// than having that default materialized here.
fn scalar_week_map(
    obj: &Map<String, Value>,
    field: &str,
    diag: &mut NormalizationDiagnostics,
) -> HashMap<Week, f64> {
    let mut result = HashMap::new();
    let Some(m) = obj.get(field).and_then(Value::as_object) else {
        return result;
    };
    for (raw_key, v) in m {
        let Some(f) = as_f64(v) else {
            diag.add_error("parse", &format!("{field}[{raw_key}] is not numeric"));
            continue;
        };
        match parse_scalar_week_key(raw_key) {
            Ok(week) => {
                result.insert(Week::new(week), f);
            }
            Err(reason) => diag.add_malformed_key(raw_key, &reason),
        }
    }
    result
}

fn normalize_eligibility(obj: &Map<String, Value>) -> HashMap<ItemId, HashSet<SubstituteId>> {
    let mut result = HashMap::new();
    let Some(m) = obj.get("substitutes_can_replace").and_then(Value::as_object) else {
        return result;
    };
    for (item_key, v) in m {
        let set: HashSet<SubstituteId> = v
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|e| e.as_str().map(SubstituteId::new))
                    .collect()
            })
            .unwrap_or_default();
        result.insert(ItemId::new(item_key.clone()), set);
    }
    result
}

fn normalize_deadlines(obj: &Map<String, Value>, diag: &mut NormalizationDiagnostics) -> Vec<Deadline> {
    let Some(arr) = obj.get("deadlines").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut result = Vec::with_capacity(arr.len());
    for entry in arr {
        let Some(record) = entry.as_object() else {
            diag.add_error("parse", "deadline entry must be an object");
            continue;
        };
        let item = record.get("item").and_then(Value::as_str);
        let week = record
            .get("week")
            .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));
        let amount = record.get("amount").and_then(as_f64);
        match (item, week, amount) {
            (Some(item), Some(week), Some(amount)) => result.push(Deadline {
                item: ItemId::new(item),
                week: Week::new(week),
                amount,
            }),
            _ => diag.add_error(
                "parse",
                "deadline entry missing one of {item, week, amount}",
            ),
        }
    }
    result
}

fn normalize_weights(obj: &Map<String, Value>) -> Weights {
    let w = obj.get("weights").and_then(Value::as_object);
    let field = |name: &str| -> f64 {
        w.and_then(|w| w.get(name)).and_then(as_f64).unwrap_or(0.0)
    };
    Weights {
        mass: field("mass"),
        value: field("value"),
        crew: field("crew"),
        energy: field("energy"),
        risk: field("risk"),
        make: field("make"),
        carry: field("carry"),
        shortage: field("shortage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_entity_sets_and_weeks() {
        let raw = json!({
            "materials": ["plastic", "textile"],
            "methods": ["extrude", "compress"],
            "outputs": ["filament", "insulation"],
            "items": ["spare_part"],
            "substitutes": ["printed_part"],
            "weeks": [1, 2, 3],
        });
        let (mission, diag) = normalize(&raw).unwrap();
        assert_eq!(mission.materials.len(), 2);
        assert_eq!(mission.weeks, vec![Week::new(1), Week::new(2), Week::new(3)]);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_normalize_yields_tuple_key() {
        let raw = json!({
            "yields": { "('plastic', 'extrude', 'filament')": 0.8 }
        });
        let (mission, diag) = normalize(&raw).unwrap();
        assert_eq!(
            mission.yields.get(&(
                MaterialId::new("plastic"),
                MethodId::new("extrude"),
                OutputId::new("filament")
            )),
            Some(&0.8)
        );
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_normalize_item_demands_string_and_int_week() {
        let raw = json!({
            "item_demands": { "('spare_part', 2)": 5.0, "('spare_part', '4')": 4.0 }
        });
        let (mission, _diag) = normalize(&raw).unwrap();
        assert_eq!(
            mission.item_demands.get(&(ItemId::new("spare_part"), Week::new(2))),
            Some(&5.0)
        );
    }

    #[test]
    fn test_normalize_malformed_key_recorded_not_panicking() {
        let raw = json!({
            "yields": { "plastic,extrude,filament": 0.8 }
        });
        let (_mission, diag) = normalize(&raw).unwrap();
        assert!(diag.has_errors());
        assert_eq!(diag.stats.malformed_keys, 1);
    }

    #[test]
    fn test_normalize_availability_defaults_and_bool_coercion() {
        let raw = json!({
            "availability": { "('extrude', 3)": 0, "('compress', 1)": 1 }
        });
        let (mission, diag) = normalize(&raw).unwrap();
        assert_eq!(
            mission.availability.get(&(MethodId::new("extrude"), Week::new(3))),
            Some(&false)
        );
        assert_eq!(
            mission.availability.get(&(MethodId::new("compress"), Week::new(1))),
            Some(&true)
        );
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_normalize_initial_inventory_defaults_to_empty() {
        let raw = json!({});
        let (mission, _diag) = normalize(&raw).unwrap();
        assert!(mission.initial_inventory.materials.is_empty());
        assert!(mission.initial_inventory.outputs.is_empty());
    }

    #[test]
    fn test_normalize_deadlines() {
        let raw = json!({
            "deadlines": [
                {"item": "spare_part", "week": 4, "amount": 9.0},
                {"item": "spare_part", "week": "6", "amount": 15.0},
            ]
        });
        let (mission, diag) = normalize(&raw).unwrap();
        assert_eq!(mission.deadlines.len(), 2);
        assert_eq!(mission.deadlines[1].week, Week::new(6));
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_normalize_weights_defaults() {
        let raw = json!({ "weights": { "shortage": 10000.0, "carry": -2.0 } });
        let (mission, _diag) = normalize(&raw).unwrap();
        assert_eq!(mission.weights.shortage, 10000.0);
        assert_eq!(mission.weights.carry, -2.0);
        assert_eq!(mission.weights.mass, 0.0);
    }

    #[test]
    fn test_normalize_not_an_object_errors() {
        let raw = json!([1, 2, 3]);
        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_normalize_eligibility() {
        let raw = json!({
            "substitutes_can_replace": { "spare_part": ["printed_part"] }
        });
        let (mission, _diag) = normalize(&raw).unwrap();
        assert!(mission.is_eligible(&SubstituteId::new("printed_part"), &ItemId::new("spare_part")));
        assert!(!mission.is_eligible(&SubstituteId::new("insulation_pad"), &ItemId::new("spare_part")));
    }
}
