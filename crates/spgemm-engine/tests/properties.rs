//! Property tests over randomly generated single-row triple streams.
//!
//! Each property is quantified over arbitrary streams within one row, since
//! row partitioning (P3/P5) is already exercised directly by the boundary
//! tests in `reference_scenarios.rs`.

use proptest::prelude::*;
use spgemm_engine::{Engine, EngineConfig, NullSink, Triple};
use std::collections::HashMap;

const BANK_COUNT: u16 = 8;
const BANK_DEPTH: u16 = 256;
const COLUMN_COUNT: u32 = BANK_COUNT as u32 * BANK_DEPTH as u32;

fn config() -> EngineConfig {
    EngineConfig::new(BANK_COUNT, BANK_DEPTH)
}

/// A single row's worth of `(col, value)` contributions, `col` kept in range
/// so every proptest case exercises P1-P6 without also hitting P7.
fn row_contributions() -> impl Strategy<Value = Vec<(u16, i32)>> {
    prop::collection::vec((0..COLUMN_COUNT as u16, any::<i32>()), 1..64)
}

fn run_row(contributions: &[(u16, i32)]) -> Vec<(u16, i32)> {
    let mut engine = Engine::new(config()).unwrap();
    let mut sink = NullSink;
    let last_index = contributions.len() - 1;
    for (i, &(col, value)) in contributions.iter().enumerate() {
        engine.submit(Triple { row: 0, col, value, last: i == last_index }, &mut sink);
    }
    let mut out = Vec::new();
    while let Some(record) = engine.poll_output(&mut sink) {
        out.push((record.col, record.value));
        engine.ack_output(&mut sink);
    }
    out
}

fn expected_sums(contributions: &[(u16, i32)]) -> HashMap<u16, i32> {
    let mut sums: HashMap<u16, i32> = HashMap::new();
    for &(col, value) in contributions {
        sums.entry(col)
            .and_modify(|v| *v = v.wrapping_add(value))
            .or_insert(value);
    }
    sums
}

proptest! {
    /// P1: each emitted value equals the wrapping sum of every contribution
    /// at that column.
    #[test]
    fn accumulation_matches_wrapping_sum(contributions in row_contributions()) {
        let out = run_row(&contributions);
        let expected = expected_sums(&contributions);
        let emitted: HashMap<u16, i32> = out.into_iter().collect();
        prop_assert_eq!(emitted, expected);
    }

    /// P2: emitted columns are strictly ascending.
    #[test]
    fn output_columns_are_strictly_ascending(contributions in row_contributions()) {
        let out = run_row(&contributions);
        for pair in out.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0);
        }
    }

    /// P4: every column that received a contribution appears exactly once
    /// in the output (this implementation does not suppress zero sums).
    #[test]
    fn every_contributed_column_is_emitted_exactly_once(contributions in row_contributions()) {
        let out = run_row(&contributions);
        let expected = expected_sums(&contributions);
        prop_assert_eq!(out.len(), expected.len());
    }

    /// P6: after a row fully drains, the engine is idle and a fresh row
    /// starts from a clean store (no leftover values from the prior row).
    #[test]
    fn clear_after_drain_is_idempotent(contributions in row_contributions()) {
        let mut engine = Engine::new(config()).unwrap();
        let mut sink = NullSink;
        let last_index = contributions.len() - 1;
        for (i, &(col, value)) in contributions.iter().enumerate() {
            engine.submit(Triple { row: 0, col, value, last: i == last_index }, &mut sink);
        }
        while engine.poll_output(&mut sink).is_some() {
            engine.ack_output(&mut sink);
        }
        prop_assert!(engine.is_idle());

        // A second row reusing the same columns must not see row 0's values.
        let outcome = engine.submit(Triple::last(1, contributions[0].0, 0), &mut sink);
        prop_assert_eq!(outcome, spgemm_engine::SubmitOutcome::Accepted);
        let mut out = Vec::new();
        while let Some(record) = engine.poll_output(&mut sink) {
            out.push(record);
            engine.ack_output(&mut sink);
        }
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].value, 0);
    }

    /// P7: any triple whose column falls outside `[0, B*D)` never produces
    /// an output record at that column.
    #[test]
    fn out_of_range_columns_never_emit(
        contributions in row_contributions(),
        extra_col in COLUMN_COUNT..=u32::from(u16::MAX),
        extra_value in any::<i32>(),
    ) {
        let mut engine = Engine::new(config()).unwrap();
        let mut sink = NullSink;
        for &(col, value) in &contributions {
            engine.submit(Triple::new(0, col, value), &mut sink);
        }
        let extra_col = extra_col as u16;
        let outcome = engine.submit(Triple::new(0, extra_col, extra_value), &mut sink);
        prop_assert_eq!(outcome, spgemm_engine::SubmitOutcome::Refused);

        let last = contributions.last().copied().unwrap_or((0, 0));
        engine.submit(Triple::last(0, last.0, 0), &mut sink);

        let mut out = Vec::new();
        while let Some(record) = engine.poll_output(&mut sink) {
            out.push(record);
            engine.ack_output(&mut sink);
        }
        prop_assert!(out.iter().all(|r| r.col != extra_col));
    }
}
