//! Property-based checks of classification, style application, and
//! rebuild coalescing.

use mdl_core::registry::{Classification, registry};
use mdl_harness::strategies::{descriptor, markdown, structure_assignment, style_assignment};
use mdl_harness::{built_label, recorded_label};
use proptest::prelude::*;

// ============================================================================
// Classification
// ============================================================================

proptest! {
    #[test]
    fn classification_is_total_and_stable(d in descriptor()) {
        let first = registry().classify(d.name);
        prop_assert_eq!(first.clone(), Ok(d.classification()));
        prop_assert_eq!(registry().classify(d.name), first);
        prop_assert_eq!(
            d.style_rule().is_some(),
            d.classification() == Classification::StyleOnly
        );
    }

    #[test]
    fn unregistered_names_are_rejected(name in "[a-z_]{1,24}") {
        let known = registry().names().any(|n| n == name);
        prop_assert_eq!(registry().classify(&name).is_ok(), known);
    }
}

// ============================================================================
// Style application
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn style_changes_preserve_identity(
        text in markdown(),
        changes in prop::collection::vec(style_assignment(), 1..8),
    ) {
        let (mut label, log) = built_label(&text);
        let before = label.identity_set();
        for (name, value) in changes {
            let report = label.set_property(name, value.clone()).unwrap();
            prop_assert_eq!(report.rebuild, None);
            prop_assert_eq!(label.property(name), Some(&registry().normalize(name, value).unwrap().1));
        }
        prop_assert_eq!(label.identity_set(), before);
        prop_assert!(!label.is_rebuild_pending());
        prop_assert_eq!(log.count(), 0);
    }

    #[test]
    fn style_survives_rebuild(
        text in markdown(),
        changes in prop::collection::vec(style_assignment(), 1..6),
    ) {
        let (mut replayed, _) = built_label("seed");
        for (name, value) in &changes {
            replayed.set_property(name, value.clone()).unwrap();
        }
        replayed.set_text(text.as_str()).unwrap();
        replayed.tick().unwrap();

        let (mut fresh, _) = built_label(&text);
        for (name, value) in &changes {
            fresh.set_property(name, value.clone()).unwrap();
        }
        prop_assert_eq!(replayed.tree().snapshot(), fresh.tree().snapshot());
    }
}

// ============================================================================
// Structure changes
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn structure_batches_coalesce_to_one_build_of_final_values(
        text in markdown(),
        changes in prop::collection::vec(structure_assignment(), 1..8),
    ) {
        let (mut label, log) = built_label(&text);
        let before = label.identity_set();
        for (name, value) in &changes {
            let report = label.set_property(name, value.clone()).unwrap();
            prop_assert!(report.requested_rebuild());
        }
        prop_assert_eq!(log.count(), 0);
        prop_assert!(label.is_rebuild_pending());

        prop_assert!(label.tick().unwrap());
        prop_assert_eq!(log.count(), 1);
        let record = log.last().unwrap();
        for name in registry().structure_names() {
            prop_assert_eq!(record.get(name), label.property(name));
        }
        prop_assert!(before.is_disjoint(&label.identity_set()));
    }

    #[test]
    fn empty_label_builds_once_from_mixed_batch(
        style in prop::collection::vec(style_assignment(), 0..4),
        structure in prop::collection::vec(structure_assignment(), 1..4),
    ) {
        let (mut label, log) = recorded_label();
        let entries: Vec<_> = style.into_iter().chain(structure).collect();
        label.apply_batch(entries).unwrap();
        prop_assert_eq!(label.tick(), Ok(true));
        prop_assert_eq!(label.tick(), Ok(false));
        prop_assert_eq!(log.count(), 1);
    }
}
