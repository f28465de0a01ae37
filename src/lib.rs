//! Water-energy-food-ecosystem (WEFE) nexus scoring and policy simulation.
//!
//! Scores a Living Lab's indicators, projects the effect of selected
//! policies, and recommends a budget- and time-constrained set of
//! interventions:
//!
//! - **Catalog**: validated indicator, policy, and intervention catalogs with
//!   stable display numbering derived from catalog order.
//! - **Scoring**: min-max normalization to `[0, 1]` and weighted pillar and
//!   overall aggregation.
//! - **Impact**: sum-then-clamp composition of overlapping policy and
//!   intervention effects.
//! - **Search**: policies and interventions affecting one indicator, ordered
//!   by magnitude.
//! - **Optimizer**: exact or greedy-plus-local-search subset selection under
//!   two knapsack constraints, with add/remove/replace edits.
//! - **Simulation**: the end-to-end run and pure session transitions.
//! - **Rank**: the rule-based ordering engine used by search and
//!   recommendations.
//!
//! # Architecture
//!
//! Every operation is a pure function of its inputs. Catalogs are loaded
//! elsewhere and passed in by reference; session state is owned by the
//! caller. Nothing here performs I/O or keeps state between calls, so
//! simulations for different labs can run concurrently without locking.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for catalog, state, and result types.
//! - `parallel`: rayon-backed [`simulation::Simulator::run_batch`].

pub mod catalog;
pub mod error;
pub mod impact;
mod math;
pub mod optimizer;
pub mod rank;
pub mod scoring;
pub mod search;
pub mod simulation;

pub use error::{WefeError, WefeResult};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::catalog::{Indicator, IndicatorCatalog, Intervention, Pillar, Policy};
    use crate::impact::PolicySelection;
    use crate::optimizer::Constraints;
    use crate::simulation::SimulationState;

    #[test]
    fn test_indicator_catalog_from_json() {
        let json = r#"[
            {"id": "access", "name": "Water access", "unit": "%", "pillar": "water",
             "category": "supply", "min": 0.0, "max": 100.0, "direction": "higher_is_better"},
            {"id": "emissions", "name": "Emissions", "unit": "t", "pillar": "energy",
             "category": "climate", "min": 0.0, "max": 50.0, "direction": "lower_is_better"}
        ]"#;
        let catalog: IndicatorCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.number("emissions"), Some(2));
    }

    #[test]
    fn test_degenerate_bounds_rejected_on_load() {
        let json = r#"[{"id": "flat", "name": "Flat", "unit": "", "pillar": "food",
            "category": "", "min": 1.0, "max": 1.0, "direction": "higher_is_better"}]"#;
        assert!(serde_json::from_str::<IndicatorCatalog>(json).is_err());
    }

    #[test]
    fn test_state_round_trip() {
        let indicators = IndicatorCatalog::new(vec![Indicator::new(
            "access",
            "Water access",
            Pillar::Water,
            0.0,
            100.0,
        )])
        .unwrap();
        let policies = crate::catalog::PolicyCatalog::new(
            vec![Policy::new("wash", "WASH").with_effect("access", 5.0)],
            &indicators,
        )
        .unwrap();

        let mut state = SimulationState::new("nile", Constraints::new(10.0, 4.0));
        state.policies = PolicySelection::from_ids(&policies, ["wash"]).unwrap();
        state.plan.accepted.push("wells".into());

        let json = serde_json::to_string(&state).unwrap();
        let back: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_intervention_from_json() {
        let json = r#"{"id": "wells", "name": "Wells", "cost": 3.0, "duration": 1.0,
            "effects": {"access": 10.0}, "policy_ids": ["wash"]}"#;
        let iv: Intervention = serde_json::from_str(json).unwrap();
        assert_eq!(iv.effect_on("access"), 10.0);
        assert!(iv.is_linked_to(["wash"].into_iter()));
    }
}
