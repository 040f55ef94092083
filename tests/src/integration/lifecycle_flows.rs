//! # Lifecycle Flows
//!
//! Issue, read, verify, revoke and the expansion reads, driven through the
//! service the way a client would.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use nl_02_notarization::prelude::*;

    // =========================================================================
    // SCENARIO INS-1
    // =========================================================================

    #[tokio::test]
    async fn test_issue_verify_revoke_scenario() -> anyhow::Result<()> {
        let h = Harness::new();

        let issued = h.issue("ins-1", false).await?;
        assert_eq!(issued.status, InstrumentStatus::Issued);
        assert_eq!(issued.issued_at, "2024-01-01T00:00:00Z");
        assert_eq!(h.get("ins-1").await?, issued);

        let verify = |hash: &'static str| {
            request("InstrumentVerify", ["ins-1", hash], notary(OTHER_ORG), 1)
        };
        let hit: VerificationResult =
            serde_json::from_slice(&h.service.evaluate(verify("abcdef0123")).await?)?;
        assert!(hit.hash_match);
        assert_eq!(hit.instrument_no, "N-ins-1");

        let miss: VerificationResult =
            serde_json::from_slice(&h.service.evaluate(verify("abcdef0124")).await?)?;
        assert!(!miss.hash_match);
        assert_eq!(miss.status, InstrumentStatus::Issued);

        let revoked = h.revoke(supervisor(ISSUER), "ins-1", "forged signature", 60).await?;
        assert_eq!(revoked.status, InstrumentStatus::Revoked);
        assert_eq!(revoked.revoked_at.as_deref(), Some("2024-01-01T00:01:00Z"));
        assert_eq!(revoked.revoked_reason.as_deref(), Some("forged signature"));

        let height = h.ledger.block_height();
        let again = h.revoke(oversight(), "ins-1", "other reason", 120).await?;
        assert_eq!(again, revoked);
        assert_eq!(again.revoked_reason.as_deref(), Some("forged signature"));
        // The no-op revoke commits a read-only transaction.
        assert_eq!(h.ledger.block_height(), height + 1);
        assert_eq!(h.ledger.history("INS|ins-1").len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_revoked_never_returns_to_issued() -> anyhow::Result<()> {
        let h = Harness::with_config(ServiceConfig {
            notarization: NotarizationConfig::default().with_reissue(true),
            ..ServiceConfig::default()
        });
        h.issue("ins-1", false).await?;
        h.revoke(supervisor(ISSUER), "ins-1", "", 10).await?;

        let err = h.issue("ins-1", false).await.unwrap_err();
        let err = err.downcast::<ServiceError>()?;
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(h.get("ins-1").await?.status, InstrumentStatus::Revoked);
        Ok(())
    }

    // =========================================================================
    // REJECTED INVOCATIONS LEAVE NOTHING BEHIND
    // =========================================================================

    #[tokio::test]
    async fn test_missing_content_hash_leaves_nothing() {
        let h = Harness::new();
        let payload = r#"{"id":"ins-1","caseId":"c-1","instrumentNo":"N-1"}"#;

        let err = h
            .service
            .submit(request("InstrumentIssue", [payload, "false"], notary(ISSUER), 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("contentHash"));

        assert!(h.ledger.public_keys().is_empty());
        assert!(h.ledger.notifications().is_empty());
        assert_eq!(h.ledger.block_height(), 0);
    }

    #[tokio::test]
    async fn test_non_notary_issue_is_rejected() {
        let h = Harness::new();
        for caller in [supervisor(ISSUER), oversight(), shared_types::Credential::new(ISSUER)] {
            let err = h
                .service
                .submit(request(
                    "InstrumentIssue",
                    [issue_payload("ins-1", "N-1", "aa"), "false".to_string()],
                    caller,
                    0,
                ))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authorization);
        }
        assert!(h.ledger.public_keys().is_empty());
        assert_eq!(h.service.stats().await.failed_invocations, 3);
    }

    #[tokio::test]
    async fn test_duplicate_issue_rejected() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;

        let err = h.issue("ins-1", false).await.unwrap_err();
        assert_eq!(err.downcast::<ServiceError>()?.kind(), ErrorKind::AlreadyExists);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_function_and_arity() {
        let h = Harness::new();
        let err = h
            .service
            .evaluate(request("InstrumentDelete", ["ins-1"], notary(ISSUER), 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = h
            .service
            .evaluate(request("InstrumentVerify", ["ins-1"], notary(ISSUER), 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = h
            .service
            .evaluate(request(
                "InstrumentIssue",
                [issue_payload("ins-1", "N-1", "aa"), "maybe".to_string()],
                notary(ISSUER),
                0,
            ))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_identity() {
        let h = Harness::new();
        let err = h
            .service
            .evaluate(InvocationRequest::new("InstrumentGet", ["ins-1"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Identity);
    }

    // =========================================================================
    // EXPANSION READS
    // =========================================================================

    #[tokio::test]
    async fn test_history_lists_every_modification() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;
        h.revoke(supervisor(ISSUER), "ins-1", "void", 30).await?;

        let bytes = h
            .service
            .evaluate(request("InstrumentHistory", ["ins-1"], notary(OTHER_ORG), 40))
            .await?;
        let history: Vec<HistoryEntry> = serde_json::from_slice(&bytes)?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, "ISSUED");
        assert_eq!(history[0].timestamp, T0);
        assert_eq!(history[1].status, "REVOKED");
        assert_eq!(history[1].timestamp, T0 + 30);
        assert!(history.iter().all(|e| !e.is_delete));

        let err = h
            .service
            .evaluate(request("InstrumentHistory", ["nope"], notary(OTHER_ORG), 40))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_instrument_no_ignores_case() -> anyhow::Result<()> {
        let h = Harness::new();
        for (id, no) in [("ins-b", "NOT-2024-1"), ("ins-a", "not-2024-1"), ("ins-c", "NOT-2024-2")] {
            h.service
                .submit(request(
                    "InstrumentIssue",
                    [issue_payload(id, no, "aa"), "0".to_string()],
                    notary(ISSUER),
                    0,
                ))
                .await?;
        }

        let find = |no: &'static str| request("InstrumentFindByNo", [no], notary(OTHER_ORG), 0);
        let found: Vec<Instrument> =
            serde_json::from_slice(&h.service.evaluate(find("Not-2024-1")).await?)?;
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["ins-a", "ins-b"]);

        let none: Vec<Instrument> =
            serde_json::from_slice(&h.service.evaluate(find("NOT-1999")).await?)?;
        assert!(none.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_namespaced_function_names() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;

        let bytes = h
            .service
            .evaluate(request(
                "NotarizationContract:InstrumentGet",
                ["ins-1"],
                notary(OTHER_ORG),
                0,
            ))
            .await?;
        let instrument: Instrument = serde_json::from_slice(&bytes)?;
        assert_eq!(instrument.id, "ins-1");
        assert_eq!(h.service.contract_name(), contract_name());
        Ok(())
    }
}
