//! # Concurrency
//!
//! Two proposals simulated against the same committed state: the first to
//! commit wins, the second is rejected by the read-set check and must be
//! resubmitted under a new transaction id.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use nl_01_ledger_substrate::prelude::*;
    use nl_02_notarization::prelude::*;
    use std::sync::Arc;

    fn proposal(tx: &str, offset: i64, caller: Credential) -> Proposal {
        Proposal::new(TxId::new(tx), TxTimestamp::from_seconds(T0 + offset), caller)
    }

    #[tokio::test]
    async fn test_concurrent_revokes_second_commit_conflicts() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;

        let config = NotarizationConfig::default();
        let lifecycle = InstrumentLifecycle::new(&config);

        let mut first = h.ledger.begin(proposal("rev-a", 10, supervisor(ISSUER)));
        let mut second = h
            .ledger
            .begin(proposal("rev-b", 11, oversight()).endorsed_by(ISSUER));
        lifecycle.revoke(&mut first, "ins-1", "first")?;
        lifecycle.revoke(&mut second, "ins-1", "second")?;

        first.commit()?;
        let err = second.commit().unwrap_err();
        assert!(matches!(err, SubstrateError::MvccReadConflict { ref key } if key == "INS|ins-1"));
        assert!(err.is_retryable());

        assert_eq!(h.get("ins-1").await?.revoked_reason.as_deref(), Some("first"));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_issue_of_same_id_conflicts() {
        let ledger = InMemoryLedger::new();
        let config = NotarizationConfig::default();
        let lifecycle = InstrumentLifecycle::new(&config);
        let payload = issue_payload("ins-1", "N-1", "aa");

        let mut a = ledger.begin(proposal("iss-a", 0, notary(ISSUER)));
        let mut b = ledger.begin(proposal("iss-b", 0, notary(OTHER_ORG)));
        lifecycle.issue(&mut a, &payload, false).unwrap();
        lifecycle.issue(&mut b, &payload, false).unwrap();

        a.commit().unwrap();
        assert!(matches!(b.commit(), Err(SubstrateError::MvccReadConflict { .. })));

        let stored: Instrument =
            serde_json::from_slice(&ledger.committed_state("INS|ins-1").unwrap()).unwrap();
        assert_eq!(stored.issuing_organization, OrgId::new(ISSUER));
    }

    #[tokio::test]
    async fn test_retry_after_conflict_sees_new_state() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;
        let config = NotarizationConfig::default();
        let lifecycle = InstrumentLifecycle::new(&config);

        let mut stale = h.ledger.begin(proposal("stale", 5, supervisor(ISSUER)));
        lifecycle.revoke(&mut stale, "ins-1", "stale")?;
        h.revoke(supervisor(ISSUER), "ins-1", "winner", 6).await?;
        assert!(stale.commit().unwrap_err().is_retryable());

        // Resubmitted: already revoked, so nothing changes.
        let retried = h.revoke(supervisor(ISSUER), "ins-1", "stale", 7).await?;
        assert_eq!(retried.revoked_reason.as_deref(), Some("winner"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_submits_on_distinct_ids() -> anyhow::Result<()> {
        let h = Arc::new(Harness::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let h = Arc::clone(&h);
                tokio::spawn(async move { h.issue(&format!("ins-{i}"), i % 2 == 0).await })
            })
            .collect();
        for handle in handles {
            handle.await??;
        }

        assert_eq!(h.ledger.block_height(), 16);
        assert_eq!(h.service.stats().await.committed, 16);
        assert_eq!(h.ledger.notifications().len(), 16);
        Ok(())
    }
}
