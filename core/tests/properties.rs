//! Property tests: numbering and partition invariants over random operation sequences.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use ticket_queue_core::{LedgerError, TicketId, TicketState};
use ticket_queue_testing::test_ledger;

#[derive(Debug, Clone)]
enum Op {
    Create { blank: bool },
    Transition { pick: usize, target: TicketState },
    Advance { pick: usize },
    Remove { pick: usize },
}

fn state_strategy() -> impl Strategy<Value = TicketState> {
    prop_oneof![
        Just(TicketState::Waiting),
        Just(TicketState::InProgress),
        Just(TicketState::Done),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::bool::weighted(0.25).prop_map(|blank| Op::Create { blank }),
        2 => (any::<usize>(), state_strategy()).prop_map(|(pick, target)| Op::Transition { pick, target }),
        2 => any::<usize>().prop_map(|pick| Op::Advance { pick }),
        1 => any::<usize>().prop_map(|pick| Op::Remove { pick }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ledger_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        runtime().block_on(async {
            let (ledger, _store) = test_ledger();
            // Every id ever created, including removed ones
            let mut created: Vec<TicketId> = Vec::new();
            let mut issued: Vec<u64> = Vec::new();

            for op in ops {
                match op {
                    Op::Create { blank } => {
                        let name = if blank { "   " } else { "visitor" };
                        match ledger.create_ticket(name, "reason").await {
                            Ok(ticket) => {
                                prop_assert!(!blank);
                                created.push(ticket.id());
                                issued.push(ticket.number().get());
                            }
                            Err(error) => {
                                prop_assert!(blank);
                                let is_validation = matches!(error, LedgerError::Validation { .. });
                                prop_assert!(is_validation);
                            }
                        }
                    }
                    Op::Transition { pick, target } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = created[pick % created.len()];
                        let before = ledger.get(id).await.unwrap();
                        let result = ledger.transition(id, target).await;
                        let after = ledger.get(id).await.unwrap();

                        match before {
                            None => prop_assert_eq!(result, Err(LedgerError::NotFound(id))),
                            Some(before) if before.state().can_transition_to(target) => {
                                prop_assert_eq!(result, Ok(()));
                                prop_assert_eq!(after.map(|t| t.state()), Some(target));
                            }
                            Some(before) => {
                                let is_illegal = matches!(result, Err(LedgerError::IllegalTransition { .. }));
                                prop_assert!(is_illegal);
                                prop_assert_eq!(after.map(|t| t.state()), Some(before.state()));
                            }
                        }
                    }
                    Op::Advance { pick } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = created[pick % created.len()];
                        let before = ledger.get(id).await.unwrap();
                        let result = ledger.advance(id).await;
                        let after = ledger.get(id).await.unwrap();

                        match before.map(|t| t.state()) {
                            None => prop_assert_eq!(result, Err(LedgerError::NotFound(id))),
                            Some(state) => match state.next() {
                                Some(next) => {
                                    prop_assert_eq!(result, Ok(next));
                                    prop_assert_eq!(after.map(|t| t.state()), Some(next));
                                }
                                None => {
                                    let is_illegal = matches!(result, Err(LedgerError::IllegalTransition { .. }));
                                    prop_assert!(is_illegal);
                                    prop_assert_eq!(after.map(|t| t.state()), Some(state));
                                }
                            },
                        }
                    }
                    Op::Remove { pick } => {
                        if created.is_empty() {
                            continue;
                        }
                        let id = created[pick % created.len()];
                        prop_assert_eq!(ledger.remove(id).await, Ok(()));
                        prop_assert_eq!(ledger.get(id).await, Ok(None));
                    }
                }

                // Partition is disjoint and exhaustive.
                let all: HashSet<TicketId> =
                    ledger.list_all().await.unwrap().iter().map(|t| t.id()).collect();
                let view = ledger.list_by_state().await.unwrap();
                let mut seen = HashSet::new();
                for state in TicketState::ALL {
                    for ticket in view.get(state) {
                        prop_assert_eq!(ticket.state(), state);
                        prop_assert!(seen.insert(ticket.id()));
                    }
                }
                prop_assert_eq!(seen, all);
            }

            // Numbers are consecutive from 1, in issue order, never reused.
            let expected: Vec<u64> = (1..=issued.len() as u64).collect();
            prop_assert_eq!(&issued, &expected);
            let unique: BTreeSet<u64> = issued.iter().copied().collect();
            prop_assert_eq!(unique.len(), issued.len());
            Ok(())
        })?;
    }
}
