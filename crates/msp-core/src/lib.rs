//! # msp-core: Mission Supply Planning Data Model
//!
//! Provides the fundamental data structures shared across the mission-supply
//! optimization pipeline: entity identifiers, the normalized mission record,
//! and the diagnostics/error types used by every downstream crate.
//!
//! ## Design Philosophy
//!
//! A mission is modeled as a flat record over six entity sets — materials,
//! methods, outputs, items, substitutes, weeks — and a collection of
//! scalar/indexed parameters keyed by tuples of those entities. This mirrors
//! the wire format directly: the normalizer ([`msp-io`](../msp_io/index.html))
//! is responsible for turning stringified tuple keys into the structured keys
//! used here; this crate only defines what "structured" means.
//!
//! ## Quick Start
//!
//! ```rust
//! use msp_core::*;
//!
//! let mut mission = MissionData::default();
//! mission.materials.push(MaterialId::new("plastic"));
//! mission.methods.push(MethodId::new("extrude"));
//! mission.outputs.push(OutputId::new("filament"));
//! mission.weeks.push(Week::new(1));
//! mission.weeks.push(Week::new(2));
//!
//! mission.yields.insert(
//!     (
//!         MaterialId::new("plastic"),
//!         MethodId::new("extrude"),
//!         OutputId::new("filament"),
//!     ),
//!     0.8,
//! );
//!
//! assert_eq!(mission.first_week(), Some(Week::new(1)));
//! assert_eq!(mission.prev_week(Week::new(2)), Some(Week::new(1)));
//! assert_eq!(mission.prev_week(Week::new(1)), None);
//! ```
//!
//! ## Core Data Structures
//!
//! - [`MissionData`] - the normalized job input (entity sets + all parameters from §3)
//! - Type-safe IDs: [`MaterialId`], [`MethodId`], [`OutputId`], [`ItemId`], [`SubstituteId`], [`Week`]
//! - [`Deadline`], [`Weights`] - the remaining scalar/list-shaped parameters
//!
//! ## ID System
//!
//! Entity identifiers in the wire format are strings (`"plastic"`, `"extrude"`,
//! ...); weeks are integers. Every newtype wraps the natural representation
//! and derives `Hash`/`Eq` so they can key the parameter maps directly:
//! - **Entity IDs**: opaque strings, compared by value
//! - **Week**: a signed integer; the horizon need not start at 1
//!
//! IDs enable:
//! - Type safety: can't confuse a material key with a method key
//! - Consistent round-trip between the wire format and the internal model
//!
//! ## Modules
//!
//! - [`diagnostics`] - issue collection for normalization and validation
//! - [`error`] - the unified [`error::CoreError`] type
//!
//! ## Integration with msp-io and msp-algo
//!
//! `msp-io` parses the wire payload (tuple-encoded JSON keys) into a
//! [`MissionData`] and validates its invariants. `msp-algo` consumes a
//! validated `MissionData` to build and solve the MILP.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub mod diagnostics;
pub mod error;

pub use diagnostics::{
    DiagnosticIssue, Diagnostics, NormalizationDiagnostics, NormalizationStats, Severity,
};
pub use error::{CoreError, CoreResult};

// ============================================================================
// Entity identifiers
// ============================================================================

macro_rules! string_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[inline]
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_string())
            }
        }
    };
}

string_id!(MaterialId, "A raw recyclable material (entity set M).");
string_id!(MethodId, "A recycling method/process (entity set R).");
string_id!(OutputId, "An intermediate good produced by recycling (entity set O).");
string_id!(ItemId, "A carried consumable article (entity set K).");
string_id!(SubstituteId, "A fabricated article (entity set S).");

/// A planning week (entity set T). Not necessarily 1-based; the smallest
/// observed value is the first week of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Week(i64);

impl Week {
    #[inline]
    pub fn new(value: i64) -> Self {
        Week(value)
    }
    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Week {
    fn from(value: i64) -> Self {
        Week(value)
    }
}

// ============================================================================
// Initial inventory
// ============================================================================

/// Starting stock levels per entity set, all defaulting to 0 kg/units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitialInventory {
    pub materials: HashMap<MaterialId, f64>,
    pub outputs: HashMap<OutputId, f64>,
    pub items: HashMap<ItemId, f64>,
    pub substitutes: HashMap<SubstituteId, f64>,
}

// ============================================================================
// Deadlines and objective weights
// ============================================================================

/// A cumulative-use-by-week requirement: `Σ_{τ ≤ week} item_used[item,τ] ≥ amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
    pub item: ItemId,
    pub week: Week,
    pub amount: f64,
}

/// Objective weights. `carry` is conventionally ≤ 0 so that drawing down
/// carried stock is penalized relative to fabricating substitutes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Weights {
    pub mass: f64,
    pub value: f64,
    pub crew: f64,
    pub energy: f64,
    pub risk: f64,
    pub make: f64,
    pub carry: f64,
    pub shortage: f64,
}

// ============================================================================
// Mission data: the normalized job input
// ============================================================================

/// The fully normalized, strictly-typed job input described in §3 of the
/// data model: six entity sets plus every scalar/indexed parameter keyed
/// over them.
///
/// Every `HashMap` here uses structured keys (tuples of entity IDs, or
/// `Week`) rather than the stringified-tuple keys of the wire format;
/// turning one into the other is the normalizer's job, not this crate's.
/// Missing entries in any map default to 0 per §3's parameter table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionData {
    // Entity sets
    pub materials: Vec<MaterialId>,
    pub methods: Vec<MethodId>,
    pub outputs: Vec<OutputId>,
    pub items: Vec<ItemId>,
    pub substitutes: Vec<SubstituteId>,
    pub weeks: Vec<Week>,

    // Scalar/indexed parameters
    pub initial_inventory: InitialInventory,
    pub item_mass: HashMap<ItemId, f64>,
    pub item_lifetime: HashMap<ItemId, u32>,
    pub substitute_lifetime: HashMap<SubstituteId, u32>,
    pub item_waste: HashMap<(ItemId, MaterialId), f64>,
    pub substitute_waste: HashMap<(SubstituteId, MaterialId), f64>,
    pub item_demands: HashMap<(ItemId, Week), f64>,
    pub yields: HashMap<(MaterialId, MethodId, OutputId), f64>,
    pub max_capacity: HashMap<(MethodId, Week), f64>,
    pub min_lot_size: HashMap<MethodId, f64>,
    pub availability: HashMap<(MethodId, Week), bool>,
    pub crew_cost: HashMap<MethodId, f64>,
    pub energy_cost: HashMap<MethodId, f64>,
    pub crew_available: HashMap<Week, f64>,
    pub energy_available: HashMap<Week, f64>,
    pub risk_cost: HashMap<MethodId, f64>,
    pub output_capacity: HashMap<OutputId, f64>,
    pub input_capacity: HashMap<MaterialId, f64>,
    pub output_values: HashMap<OutputId, f64>,
    pub substitute_values: HashMap<SubstituteId, f64>,
    pub substitute_make_recipe: HashMap<(SubstituteId, OutputId), f64>,
    pub substitute_assembly_crew: HashMap<SubstituteId, f64>,
    pub substitute_assembly_energy: HashMap<SubstituteId, f64>,
    pub substitutes_can_replace: HashMap<ItemId, HashSet<SubstituteId>>,
    pub deadlines: Vec<Deadline>,
    pub weights: Weights,
}

impl MissionData {
    /// `first_week := min(T)`, per §3. `None` if the horizon is empty.
    pub fn first_week(&self) -> Option<Week> {
        self.weeks.iter().copied().min()
    }

    /// The largest week strictly before `t` among the planning horizon.
    /// `None` for the first week (and for any week not preceded by another).
    pub fn prev_week(&self, t: Week) -> Option<Week> {
        self.weeks.iter().copied().filter(|&w| w < t).max()
    }

    /// Weeks in ascending order, deduplicated. Downstream components should
    /// iterate this rather than `weeks` directly to get a deterministic,
    /// chronological order regardless of input ordering.
    pub fn sorted_weeks(&self) -> Vec<Week> {
        let mut weeks = self.weeks.clone();
        weeks.sort_unstable();
        weeks.dedup();
        weeks
    }

    /// Whether `s` is eligible to satisfy demand for `k` (§3's eligibility invariant).
    pub fn is_eligible(&self, s: &SubstituteId, k: &ItemId) -> bool {
        self.substitutes_can_replace
            .get(k)
            .map(|set| set.contains(s))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mission() -> MissionData {
        let mut mission = MissionData::default();
        mission.weeks = vec![Week::new(3), Week::new(1), Week::new(2)];
        mission
    }

    #[test]
    fn test_first_week_is_minimum_not_hardcoded() {
        let mission = sample_mission();
        assert_eq!(mission.first_week(), Some(Week::new(1)));
    }

    #[test]
    fn test_prev_week() {
        let mission = sample_mission();
        assert_eq!(mission.prev_week(Week::new(1)), None);
        assert_eq!(mission.prev_week(Week::new(2)), Some(Week::new(1)));
        assert_eq!(mission.prev_week(Week::new(3)), Some(Week::new(2)));
    }

    #[test]
    fn test_sorted_weeks_dedup() {
        let mut mission = sample_mission();
        mission.weeks.push(Week::new(2));
        assert_eq!(
            mission.sorted_weeks(),
            vec![Week::new(1), Week::new(2), Week::new(3)]
        );
    }

    #[test]
    fn test_eligibility_default_false() {
        let mission = MissionData::default();
        let s = SubstituteId::new("printed_part");
        let k = ItemId::new("spare_part");
        assert!(!mission.is_eligible(&s, &k));
    }

    #[test]
    fn test_eligibility_present() {
        let mut mission = MissionData::default();
        let s = SubstituteId::new("printed_part");
        let k = ItemId::new("spare_part");
        mission
            .substitutes_can_replace
            .entry(k.clone())
            .or_default()
            .insert(s.clone());
        assert!(mission.is_eligible(&s, &k));
        assert!(!mission.is_eligible(&SubstituteId::new("insulation_pad"), &k));
    }

    #[test]
    fn test_entity_id_display_and_conversion() {
        let m: MaterialId = "plastic".into();
        assert_eq!(m.as_str(), "plastic");
        assert_eq!(format!("{}", m), "plastic");
    }
}
