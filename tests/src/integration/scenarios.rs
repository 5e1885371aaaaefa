//! # Election Scenarios
//!
//! End-to-end flows through the gateway: lifecycle, permit issuance, voting
//! and sealed results.
//!
//! ```text
//! Initialize ──→ StartElection ──→ IssuePermit ──→ CastVote ──→ FinishElection ──→ Get*Tally
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::TestLedger;
    use el_01_ledger_store::{execute, LedgerKey};
    use el_02_election_lifecycle::{ElectionRecord, ElectionStatus};
    use ledger_runtime::{handle_line, GatewayError};
    use serde_json::json;
    use shared_types::{permit_hash, ContractError, ErrorKind, OperationMode};

    fn kind(result: Result<serde_json::Value, GatewayError>) -> ErrorKind {
        result.expect_err("expected an error").kind()
    }

    // =============================================================================
    // FULL ELECTION
    // =============================================================================

    #[test]
    fn test_full_election_flow() {
        let ledger = TestLedger::new();

        // Initialize, then a vote before start is refused and writes nothing.
        let out = ledger
            .call("election", "Initialize", &["E1", "General"])
            .unwrap();
        assert_eq!(out["status"], "initialized");
        ledger.issue("E1", "voterHashEarly", "early");
        let err = ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "early"])
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Contract(ContractError::ElectionNotActive("E1".into()))
        );

        // Start, issue, vote once.
        let out = ledger.call("election", "StartElection", &["E1"]).unwrap();
        assert_eq!(out["status"], "started");
        let h1 = ledger.issue("E1", "voterHashA", "secret1");
        assert_eq!(h1, permit_hash("secret1"));

        let out = ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"])
            .unwrap();
        assert_eq!(out, json!({ "voteCount": 1 }));
        let err = ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"])
            .unwrap_err();
        assert_eq!(err, GatewayError::Contract(ContractError::AlreadySpent));

        // A second voter for the same candidate.
        ledger.issue("E1", "voterHashB", "secret2");
        let out = ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret2"])
            .unwrap();
        assert_eq!(out["voteCount"], 2);

        // Results are sealed until the election finishes.
        let err = ledger.call("tally", "GetCandidateTally", &["E1", "C1", "CAND1"]);
        assert_eq!(kind(err), ErrorKind::Precondition);

        let out = ledger.call("election", "FinishElection", &["E1"]).unwrap();
        assert_eq!(out["status"], "finished");
        let tally = ledger
            .call("tally", "GetCandidateTally", &["E1", "C1", "CAND1"])
            .unwrap();
        assert_eq!(tally["voteCount"], 2);
        assert_eq!(tally["candidateId"], "CAND1");

        let err = ledger
            .call("election", "StartElection", &["E1"])
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Contract(ContractError::AlreadyFinished("E1".into()))
        );
    }

    // =============================================================================
    // LIFECYCLE
    // =============================================================================

    #[test]
    fn test_election_names_are_unique() {
        let ledger = TestLedger::new();
        ledger
            .call("election", "Initialize", &["E1", "General"])
            .unwrap();
        let err = ledger.call("election", "Initialize", &["E2", "General"]);
        assert_eq!(kind(err), ErrorKind::Conflict);

        let all = ledger.call("election", "getAllElections", &[]).unwrap();
        assert_eq!(all.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_replayed_reset_cannot_reopen_finished_election() {
        let ledger = TestLedger::started("E1", "General");
        ledger.call("election", "FinishElection", &["E1"]).unwrap();

        // An out-of-order write puts the election back to Initialized.
        let container = ledger.gateway.container();
        let key = LedgerKey::election("E1").unwrap();
        execute(
            container.store.as_ref(),
            container.clock.as_ref(),
            OperationMode::Mutating,
            |ctx| {
                let mut record: ElectionRecord = ctx.get_json(&key)?.expect("record");
                record.status = ElectionStatus::Initialized;
                ctx.put_json(&key, &record)?;
                Ok(())
            },
        )
        .unwrap();

        let err = ledger.call("election", "StartElection", &["E1"]);
        assert_eq!(kind(err), ErrorKind::Conflict);
        let finished = ledger
            .call("election", "checkAlreadyFinished", &["E1"])
            .unwrap();
        assert_eq!(finished, true);

        // Results stay readable: the history still shows Finished.
        let tallies = ledger.call("tally", "GetElectionTallies", &["E1"]).unwrap();
        assert_eq!(tallies, json!([]));
    }

    #[test]
    fn test_history_is_an_audit_trail() {
        let ledger = TestLedger::new();
        ledger
            .call("election", "Initialize", &["E1", "General"])
            .unwrap();
        ledger.clock.advance(chrono::Duration::minutes(5));
        ledger.call("election", "StartElection", &["E1"]).unwrap();
        ledger.clock.advance(chrono::Duration::minutes(5));
        ledger.call("election", "FinishElection", &["E1"]).unwrap();

        let history = ledger
            .call("election", "GetElectionHistory", &["E1"])
            .unwrap();
        let entries = history.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["timestamp"], "1970-01-01T00:00:00Z");
        assert_eq!(entries[1]["record"]["status"], "started");
        assert_eq!(entries[2]["timestamp"], "1970-01-01T00:10:00Z");
        assert_eq!(entries[2]["record"]["updatedAt"], "1970-01-01T00:10:00Z");
        assert_ne!(entries[0]["txId"], entries[1]["txId"]);
    }

    #[test]
    fn test_nul_in_key_arguments_is_validation() {
        let ledger = TestLedger::started("E1", "General");
        ledger.issue("E1", "voterHashA", "secret1");
        let keys_before = ledger.gateway.container().store.len();

        let calls: [(&str, &str, &[&str]); 7] = [
            ("election", "Initialize", &["E\u{0}9", "Other"]),
            ("election", "StartElection", &["E\u{0}1"]),
            ("permit", "IssuePermit", &["E1", "voter\u{0}B", "secret2"]),
            ("permit", "HasVoted", &["E1", "voter\u{0}A"]),
            ("tally", "CastVote", &["E\u{0}1", "C1", "CAND1", "secret1"]),
            ("tally", "CastVote", &["E1", "C\u{0}1", "CAND1", "secret1"]),
            ("tally", "CastVote", &["E1", "C1", "CAND\u{0}1", "secret1"]),
        ];
        for (component, function, args) in calls {
            let err = ledger.call(component, function, args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{function} {args:?}: {err}");
        }
        assert_eq!(ledger.gateway.container().store.len(), keys_before);

        // The permit survived the refused votes.
        let out = ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"])
            .unwrap();
        assert_eq!(out["voteCount"], 1);

        // Secrets never reach a key: only their hash does.
        let hash = ledger.issue("E1", "voterHashB", "sec\u{0}ret");
        assert_eq!(hash, permit_hash("sec\u{0}ret"));
    }

    // =============================================================================
    // PERMITS
    // =============================================================================

    #[test]
    fn test_one_permit_per_voter() {
        let ledger = TestLedger::started("E1", "General");
        ledger.issue("E1", "voterHashA", "secret1");

        let err = ledger.call("permit", "IssuePermit", &["E1", "voterHashA", "secret9"]);
        assert_eq!(kind(err), ErrorKind::Conflict);

        // The same voter may hold a permit in another election.
        ledger.open("E2", "Local");
        ledger.issue("E2", "voterHashA", "secret2");

        let has = ledger
            .call("permit", "HasVoted", &["E1", "voterHashA"])
            .unwrap();
        assert_eq!(has, json!({ "has": true }));
        let has = ledger
            .call("permit", "HasVoted", &["E1", "voterHashZ"])
            .unwrap();
        assert_eq!(has, json!({ "has": false }));
    }

    #[test]
    fn test_voter_can_verify_permit_was_counted() {
        let ledger = TestLedger::started("E1", "General");
        let hash = ledger.issue("E1", "voterHashA", "secret1");

        let status = ledger
            .call("permit", "GetPermitStatus", &["E1", &hash])
            .unwrap();
        assert_eq!(status["status"], "issued");

        ledger.clock.advance(chrono::Duration::seconds(30));
        ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"])
            .unwrap();
        let status = ledger
            .call("permit", "GetPermitStatus", &["E1", &hash])
            .unwrap();
        assert_eq!(status["status"], "spent");
        assert_eq!(status["spentAt"], "1970-01-01T00:00:30Z");
    }

    #[test]
    fn test_refused_vote_keeps_permit_usable() {
        let ledger = TestLedger::new();
        ledger
            .call("election", "Initialize", &["E1", "General"])
            .unwrap();
        let hash = ledger.issue("E1", "voterHashA", "secret1");

        let err = ledger.call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"]);
        assert_eq!(kind(err), ErrorKind::Precondition);
        let status = ledger
            .call("permit", "GetPermitStatus", &["E1", &hash])
            .unwrap();
        assert_eq!(status["status"], "issued");

        ledger.call("election", "StartElection", &["E1"]).unwrap();
        let out = ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"])
            .unwrap();
        assert_eq!(out["voteCount"], 1);
    }

    #[test]
    fn test_permit_is_bound_to_its_election() {
        let ledger = TestLedger::started("E1", "General");
        ledger.open("E2", "Local");
        ledger.issue("E1", "voterHashA", "secret1");

        let err = ledger.call("tally", "CastVote", &["E2", "C1", "CAND1", "secret1"]);
        assert_eq!(kind(err), ErrorKind::NotFound);
    }

    // =============================================================================
    // TALLIES
    // =============================================================================

    #[test]
    fn test_tally_queries_after_finish() {
        let ledger = TestLedger::started("E1", "General");
        let votes = [
            ("C1", "CAND1"),
            ("C1", "CAND2"),
            ("C1", "CAND1"),
            ("C2", "CAND3"),
        ];
        for (i, &(constituency, candidate)) in votes.iter().enumerate() {
            let secret = format!("secret{i}");
            ledger.issue("E1", &format!("voter{i}"), &secret);
            ledger
                .call("tally", "CastVote", &["E1", constituency, candidate, &secret])
                .unwrap();
        }
        ledger.call("election", "FinishElection", &["E1"]).unwrap();

        let c1 = ledger
            .call("tally", "GetConstituencyTallies", &["E1", "C1"])
            .unwrap();
        let counts: Vec<(String, u64)> = c1
            .as_array()
            .unwrap()
            .iter()
            .map(|t| {
                (
                    t["candidateId"].as_str().unwrap().to_string(),
                    t["voteCount"].as_u64().unwrap(),
                )
            })
            .collect();
        assert_eq!(counts, [("CAND1".to_string(), 2), ("CAND2".to_string(), 1)]);

        let all = ledger.call("tally", "GetElectionTallies", &["E1"]).unwrap();
        let total: u64 = all
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["voteCount"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 4);

        // Zero votes after finish is a zero record, not an error.
        let zero = ledger
            .call("tally", "GetCandidateTally", &["E1", "C2", "CAND9"])
            .unwrap();
        assert_eq!(zero["voteCount"], 0);
        assert!(zero.get("updatedAt").is_none());
    }

    #[test]
    fn test_tallies_never_reference_voters() {
        let ledger = TestLedger::started("E1", "General");
        let hash = ledger.issue("E1", "voterHashA", "secret1");
        ledger
            .call("tally", "CastVote", &["E1", "C1", "CAND1", "secret1"])
            .unwrap();
        ledger.call("election", "FinishElection", &["E1"]).unwrap();

        let all = ledger
            .call("tally", "GetElectionTallies", &["E1"])
            .unwrap()
            .to_string();
        assert!(!all.contains("voterHashA"));
        assert!(!all.contains(&hash));
        assert!(!all.contains("secret1"));
    }

    // =============================================================================
    // WIRE PROTOCOL
    // =============================================================================

    #[test]
    fn test_request_lines() {
        let ledger = TestLedger::new();
        let gw = &ledger.gateway;

        let ok = handle_line(
            gw,
            r#"{"component":"electioncc","function":"Initialize","args":["E1","General"]}"#,
        );
        assert!(ok.ok);

        let bad = handle_line(gw, r#"{"component":"election","function":"Initialize","args":["E1"]}"#);
        assert_eq!(bad.kind.as_deref(), Some("validation"));

        let bad = handle_line(gw, r#"{"component":"election","function":"Initialize","args":["E2",""]}"#);
        assert_eq!(bad.kind.as_deref(), Some("validation"));
    }
}
