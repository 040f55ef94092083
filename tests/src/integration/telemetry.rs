//! # Telemetry
//!
//! Invocations show up in the Prometheus registry labelled by function and
//! outcome.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use nl_02_notarization::prelude::*;
    use notary_telemetry::{encode_metrics, INSTRUMENTS_REVOKED};

    #[tokio::test]
    async fn test_invocations_exported() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;
        let before = INSTRUMENTS_REVOKED.get();
        h.revoke(supervisor(ISSUER), "ins-1", "void", 10).await?;
        assert!(h.issue("ins-1", false).await.is_err());

        assert!(INSTRUMENTS_REVOKED.get() >= before + 1.0);
        let text = encode_metrics()?;
        assert!(text.contains("nl_instruments_issued_total"));
        assert!(text.contains(r#"function="InstrumentIssue",outcome="ok""#));
        assert!(text.contains(r#"function="InstrumentIssue",outcome="ALREADY_EXISTS""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_track_outcomes() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;
        h.service
            .evaluate(request("InstrumentGet", ["ins-1"], notary(ISSUER), 1))
            .await?;
        assert!(h.issue("ins-1", false).await.is_err());

        let stats = h.service.stats().await;
        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.committed, 1);
        assert_eq!(stats.evaluated, 1);
        assert_eq!(stats.failed_invocations, 1);
        Ok(())
    }
}
