//! Integration tests for the mutual-exclusion engine.
//!
//! Tests cover:
//! - Convergence to at most one active member per group
//! - Idempotent updates and unknown keys
//! - Reset to a clean state

#![cfg(test)]

use sqlmapctl::logic::{EXCLUSION_GROUPS, ExclusionEngine, StateChange, apply_update};
use sqlmapctl::registry::OptionName;
use sqlmapctl::state::OptionValue;

/// What: Every option that belongs to at least one group.
fn grouped_options() -> Vec<OptionName> {
    let mut names: Vec<OptionName> = EXCLUSION_GROUPS
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// What: Assert the at-most-one-active property over all groups.
fn assert_converged(engine: &ExclusionEngine) {
    for group in engine.groups() {
        let active = engine.active_members(group);
        assert!(active.len() <= 1, "{}: {active:?}", group.name);
    }
}

#[test]
/// What: Any sequence of updates leaves each group with at most one active option.
///
/// Inputs:
/// - 500 updates per seed, cycling through grouped options with a linear congruential
///   generator choosing active/inactive values, for several seeds.
///
/// Output:
/// - The property holds after every single step.
fn integration_engine_converges_for_any_sequence() {
    let names = grouped_options();
    let values = [
        OptionValue::Bool(true),
        OptionValue::Bool(false),
        OptionValue::Unset,
        OptionValue::Text("x".into()),
        OptionValue::Text("   ".into()),
        OptionValue::Integer(4),
        OptionValue::Integer(0),
    ];
    for seed in [1_u64, 7, 42, 1234, 99_991] {
        let mut state = seed;
        let mut engine = ExclusionEngine::default();
        for _ in 0..500 {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let name = names[usize::try_from(state >> 33).expect("fits") % names.len()];
            let value = values[usize::try_from((state >> 17) & 0xff).expect("fits") % values.len()].clone();
            engine = apply_update(engine, name, value);
            assert_converged(&engine);
        }
    }
}

#[test]
/// What: Re-sending the same value produces no transitions.
///
/// Inputs:
/// - `tor = true` twice.
///
/// Output:
/// - First call disables `proxy`; second call reports nothing.
fn integration_repeated_value_is_noop() {
    let mut engine = ExclusionEngine::default();
    let first = engine.update(OptionName::Tor, OptionValue::Bool(true));
    assert!(matches!(
        first.as_slice(),
        [StateChange::Disabled { option: OptionName::Proxy, .. }]
    ));
    assert!(engine.update(OptionName::Tor, OptionValue::Bool(true)).is_empty());
    assert!(engine.update_key("no_such_option", OptionValue::Bool(true)).is_empty());
}

#[test]
/// What: Clearing the winner re-enables the rest of its group.
///
/// Inputs:
/// - `dump_all` active, then cleared.
///
/// Output:
/// - `dump` and `sql_query` disabled, then enabled again.
fn integration_clearing_winner_reenables_group() {
    let mut engine = ExclusionEngine::default();
    engine.update(OptionName::DumpAll, OptionValue::Bool(true));
    assert!(!engine.is_enabled(OptionName::Dump));
    assert!(!engine.is_enabled(OptionName::SqlQuery));
    let changes = engine.update(OptionName::DumpAll, OptionValue::Bool(false));
    assert!(changes.contains(&StateChange::Enabled(OptionName::Dump)));
    assert!(changes.contains(&StateChange::Enabled(OptionName::SqlQuery)));
    assert!(engine.disabled_options().is_empty());
}

#[test]
fn integration_reset_all_clears_everything() {
    let mut engine = ExclusionEngine::default();
    engine.update(OptionName::Url, OptionValue::Text("http://h/".into()));
    engine.update(OptionName::Crawl, OptionValue::Integer(2));
    assert!(!engine.disabled_options().is_empty());
    let changes = engine.reset_all();
    assert!(changes.iter().all(|c| matches!(c, StateChange::Enabled(_))));
    assert!(engine.disabled_options().is_empty());
    assert_converged(&engine);
}
