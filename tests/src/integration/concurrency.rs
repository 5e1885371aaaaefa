//! # Concurrency
//!
//! Threads race through the gateway on shared keys. Correctness rests on
//! commit-time read-set validation alone: no component takes a lock.
//!
//! | Race | Shared key | Expected |
//! |------|------------|----------|
//! | IssuePermit, same voter | VOTER | one success, rest AlreadyIssued |
//! | CastVote, same permit | PERMIT | one success, rest AlreadySpent |
//! | CastVote, same candidate | TALLY | all succeed after re-simulation |
//! | CastVote, different candidates | none | all succeed |

#[cfg(test)]
mod tests {
    use crate::fixtures::TestLedger;
    use ledger_runtime::GatewayError;
    use proptest::prelude::*;
    use serde_json::Value;
    use shared_types::{ContractError, StoreError};
    use std::sync::Barrier;
    use std::thread;

    const THREADS: usize = 8;

    /// Run `op` on `THREADS` threads released together.
    fn race<F>(op: F) -> Vec<Result<Value, GatewayError>>
    where
        F: Fn(usize) -> Result<Value, GatewayError> + Sync,
    {
        let barrier = Barrier::new(THREADS);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    let barrier = &barrier;
                    let op = &op;
                    scope.spawn(move || {
                        barrier.wait();
                        op(i)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("worker panicked"))
                .collect()
        })
    }

    fn successes(results: &[Result<Value, GatewayError>]) -> usize {
        results.iter().filter(|r| r.is_ok()).count()
    }

    #[test]
    fn test_concurrent_issue_for_same_voter() {
        let ledger = TestLedger::started("E1", "General");

        let results = race(|i| {
            ledger.call(
                "permit",
                "IssuePermit",
                &["E1", "voterHashA", &format!("secret{i}")],
            )
        });

        assert_eq!(successes(&results), 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                matches!(
                    err,
                    GatewayError::Contract(ContractError::AlreadyIssued { .. })
                ),
                "unexpected error: {err}"
            );
        }

        // Exactly one permit exists: the winner's.
        let issued: Vec<_> = (0..THREADS)
            .filter(|i| {
                let hash = shared_types::permit_hash(&format!("secret{i}"));
                ledger
                    .call("permit", "GetPermitStatus", &["E1", &hash])
                    .is_ok()
            })
            .collect();
        assert_eq!(issued.len(), 1);
    }

    #[test]
    fn test_concurrent_spend_of_one_permit() {
        let ledger = TestLedger::started("E1", "General");
        ledger.issue("E1", "voterHashA", "secret1");

        let results = race(|i| {
            let candidate = format!("CAND{}", i % 2);
            ledger.call("tally", "CastVote", &["E1", "C1", &candidate, "secret1"])
        });

        assert_eq!(successes(&results), 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert_eq!(err, &GatewayError::Contract(ContractError::AlreadySpent));
        }

        ledger.call("election", "FinishElection", &["E1"]).unwrap();
        let tallies = ledger.call("tally", "GetElectionTallies", &["E1"]).unwrap();
        let total: u64 = tallies
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["voteCount"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_spend_race_without_resimulation() {
        let ledger = TestLedger::with_retries(0);
        ledger.open("E1", "General");
        ledger.issue("E1", "voterHashA", "secret1");

        let results = race(|_| ledger.call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"]));

        assert_eq!(successes(&results), 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            match err {
                GatewayError::Contract(ContractError::AlreadySpent) => {}
                GatewayError::RetriesExhausted { attempts, last } => {
                    assert_eq!(*attempts, 1);
                    assert!(last.is_retryable());
                    assert!(matches!(last, StoreError::MvccReadConflict { .. }));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_concurrent_votes_for_same_candidate_all_count() {
        // A thread can lose at most THREADS - 1 commit races.
        let ledger = TestLedger::with_retries(THREADS as u32);
        ledger.open("E1", "General");
        for i in 0..THREADS {
            ledger.issue("E1", &format!("voter{i}"), &format!("secret{i}"));
        }

        let results = race(|i| {
            ledger.call(
                "tally",
                "CastVote",
                &["E1", "C1", "CAND1", &format!("secret{i}")],
            )
        });
        assert_eq!(successes(&results), THREADS);

        let mut counts: Vec<u64> = results
            .iter()
            .map(|r| r.as_ref().unwrap()["voteCount"].as_u64().unwrap())
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, (1..=THREADS as u64).collect::<Vec<_>>());

        ledger.call("election", "FinishElection", &["E1"]).unwrap();
        let tally = ledger
            .call("tally", "GetCandidateTally", &["E1", "C1", "CAND1"])
            .unwrap();
        assert_eq!(tally["voteCount"], THREADS as u64);
    }

    #[test]
    fn test_votes_for_distinct_candidates_commit_independently() {
        let ledger = TestLedger::with_retries(0);
        ledger.open("E1", "General");
        for i in 0..THREADS {
            ledger.issue("E1", &format!("voter{i}"), &format!("secret{i}"));
        }

        let results = race(|i| {
            ledger.call(
                "tally",
                "CastVote",
                &["E1", "C1", &format!("CAND{i}"), &format!("secret{i}")],
            )
        });

        // Disjoint tally and permit keys: no re-simulation needed.
        assert_eq!(successes(&results), THREADS);
        for result in &results {
            assert_eq!(result.as_ref().unwrap()["voteCount"], 1);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_constituency_sum_equals_successful_votes(
            choices in prop::collection::vec(0usize..3, THREADS)
        ) {
            let ledger = TestLedger::with_retries(THREADS as u32);
            ledger.open("E1", "General");
            for i in 0..THREADS {
                ledger.issue("E1", &format!("voter{i}"), &format!("secret{i}"));
            }

            let results = race(|i| {
                ledger.call(
                    "tally",
                    "CastVote",
                    &["E1", "C1", &format!("CAND{}", choices[i]), &format!("secret{i}")],
                )
            });
            let cast = successes(&results) as u64;

            ledger.call("election", "FinishElection", &["E1"]).unwrap();
            let tallies = ledger
                .call("tally", "GetConstituencyTallies", &["E1", "C1"])
                .unwrap();
            let sum: u64 = tallies
                .as_array()
                .unwrap()
                .iter()
                .map(|t| t["voteCount"].as_u64().unwrap())
                .sum();
            prop_assert_eq!(cast, THREADS as u64);
            prop_assert_eq!(sum, cast);
        }
    }
}
