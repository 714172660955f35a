//! Property tests for the transition engine's structural invariants.
//!
//! For any sequence of operations over a small id universe:
//! - a record id is present in at most one stage collection (exclusivity);
//! - every record's tracking id is `<PREFIX>-<base_id>` for its stage;
//! - undo/redo only ever produce boards that held earlier in the session,
//!   so the same invariants hold after them too.

use chrono::NaiveDate;
use lugnut_core::{ManualClock, MemoryRemote, PartRecord, RefData, Stage, Workshop};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::sync::Arc;

const UNIVERSE: usize = 8;
const T0: i64 = 1_717_243_200_000;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    CommitMain(Vec<usize>),
    CallList(Vec<usize>),
    Archive(Vec<usize>, bool),
    Reorder(Vec<usize>),
    Book(Vec<usize>),
    Delete(Vec<usize>),
    Undo,
    Redo,
}

fn arb_targets() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..UNIVERSE, 1..4)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..UNIVERSE).prop_map(Op::Add),
        arb_targets().prop_map(Op::CommitMain),
        arb_targets().prop_map(Op::CallList),
        (arb_targets(), any::<bool>()).prop_map(|(t, r)| Op::Archive(t, r)),
        arb_targets().prop_map(Op::Reorder),
        arb_targets().prop_map(Op::Book),
        arb_targets().prop_map(Op::Delete),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn record(idx: usize) -> PartRecord {
    PartRecord {
        id: format!("p{idx}"),
        base_id: format!("{idx}"),
        customer: "D. Okafor".into(),
        phone: "07700 900123".into(),
        vehicle: "Astra J".into(),
        registration: "AB12 CDE".into(),
        part_name: "Front brake discs".into(),
        status: "Ordered".into(),
        ..PartRecord::default()
    }
}

fn ids(targets: &[usize]) -> Vec<String> {
    targets.iter().map(|i| format!("p{i}")).collect()
}

fn apply(ws: &mut Workshop<MemoryRemote>, op: &Op) {
    match op {
        Op::Add(idx) => {
            // duplicate ids are rejected; that is fine here
            let _ = ws.add_order(record(*idx));
        }
        Op::CommitMain(targets) => {
            // all generated records are strict-complete
            let _ = ws.commit_to_main_sheet(&ids(targets));
        }
        Op::CallList(targets) => {
            ws.send_to_call_list(&ids(targets));
        }
        Op::Archive(targets, with_reason) => {
            let reason = with_reason.then_some("completed");
            ws.send_to_archive(&ids(targets), reason);
        }
        Op::Reorder(targets) => {
            ws.send_to_reorder(&ids(targets), "needs reordering");
        }
        Op::Book(targets) => {
            ws.send_to_booking(
                &ids(targets),
                NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date"),
                None,
                None,
            );
        }
        Op::Delete(targets) => {
            ws.delete_records(&ids(targets));
        }
        Op::Undo => {
            ws.undo();
        }
        Op::Redo => {
            ws.redo();
        }
    }
}

fn assert_invariants(ws: &Workshop<MemoryRemote>) -> Result<(), TestCaseError> {
    for idx in 0..UNIVERSE {
        let id = format!("p{idx}");
        let occurrences: usize = Stage::ALL
            .into_iter()
            .map(|stage| {
                ws.board
                    .collection(stage)
                    .iter()
                    .filter(|r| r.id == id)
                    .count()
            })
            .sum();
        prop_assert!(
            occurrences <= 1,
            "record {id} present in {occurrences} stage collections"
        );
    }

    for (stage, rec) in ws.board.all_records() {
        prop_assert_eq!(
            &rec.tracking_id,
            &stage.tracking_id(&rec.base_id),
            "tracking id mismatch in stage {}",
            stage
        );
        prop_assert!(rec.tracking_id.starts_with(stage.prefix()));
    }
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn stage_exclusivity_holds_under_any_op_sequence(ops in prop::collection::vec(arb_op(), 1..40)) {
        let clock = Arc::new(ManualClock::new(T0));
        let mut ws = Workshop::with_clock(MemoryRemote::new(), RefData::default(), clock);

        for op in &ops {
            apply(&mut ws, op);
            assert_invariants(&ws)?;
        }
    }

    #[test]
    fn undo_round_trips_any_single_mutation(targets in arb_targets()) {
        let clock = Arc::new(ManualClock::new(T0));
        let mut ws = Workshop::with_clock(MemoryRemote::new(), RefData::default(), clock);
        for idx in 0..UNIVERSE {
            let _ = ws.add_order(record(idx));
        }
        ws.commit_save("seed");

        let before = ws.board.clone();
        ws.commit_to_main_sheet(&ids(&targets)).expect("complete records commit");
        let after = ws.board.clone();

        ws.undo();
        prop_assert_eq!(&ws.board, &before);
        ws.redo();
        prop_assert_eq!(&ws.board, &after);
    }
}
