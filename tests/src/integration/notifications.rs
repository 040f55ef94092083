//! # Notifications
//!
//! Committed notifications reach bus subscribers; rejected or no-op
//! invocations publish nothing; repeated deliveries are filtered by
//! subscribers that ask for it.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use nl_02_notarization::prelude::*;
    use shared_bus::{EventFilter, NotificationPublisher};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_issue_and_revoke_notifications() -> anyhow::Result<()> {
        let h = Harness::new();
        let mut sub = h.bus.subscribe(EventFilter::all());

        h.issue("ins-1", false).await?;
        h.revoke(supervisor(ISSUER), "ins-1", "void", 10).await?;

        let issued = timeout(Duration::from_millis(100), sub.recv())
            .await?
            .expect("issued notification");
        assert_eq!(issued.name, topics::INSTRUMENT_ISSUED);
        let payload: InstrumentIssuedPayload = issued.payload_json()?;
        assert_eq!(payload.id, "ins-1");
        assert_eq!(payload.instrument_no, "N-ins-1");
        assert_eq!(payload.issuing_organization.as_str(), ISSUER);
        assert_eq!(payload.issued_at, "2024-01-01T00:00:00Z");

        let revoked = timeout(Duration::from_millis(100), sub.recv())
            .await?
            .expect("revoked notification");
        assert_eq!(revoked.name, topics::INSTRUMENT_REVOKED);
        let payload: InstrumentRevokedPayload = revoked.payload_json()?;
        assert_eq!(payload.id, "ins-1");
        assert_eq!(payload.reason, "void");
        Ok(())
    }

    #[tokio::test]
    async fn test_notification_carries_committing_tx_id() -> anyhow::Result<()> {
        let h = Harness::new();
        let mut sub = h.bus.subscribe(EventFilter::all());

        let response = h
            .service
            .submit(request(
                "InstrumentIssue",
                [issue_payload("ins-1", "N-1", "aa"), "false".to_string()],
                notary(ISSUER),
                0,
            ))
            .await?;
        let received = sub.recv().await.expect("notification");
        assert_eq!(received.originating_transaction_id, response.tx_id);
        assert_eq!(Some(received), response.notification);
        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_published_for_rejections_and_noops() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;
        h.revoke(supervisor(ISSUER), "ins-1", "void", 10).await?;

        let mut sub = h.bus.subscribe(EventFilter::all());

        // No-op second revoke.
        h.revoke(supervisor(ISSUER), "ins-1", "again", 20).await?;
        // Rejected issue.
        assert!(h.issue("ins-1", false).await.is_err());
        // Evaluate of a submit function.
        h.service
            .evaluate(request(
                "InstrumentIssue",
                [issue_payload("ins-2", "N-2", "aa"), "false".to_string()],
                notary(ISSUER),
                30,
            ))
            .await?;

        assert_eq!(sub.try_recv()?, None);
        assert_eq!(h.ledger.notifications().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_name_filter() -> anyhow::Result<()> {
        let h = Harness::new();
        let mut revocations = h.bus.subscribe(EventFilter::names([topics::INSTRUMENT_REVOKED]));

        h.issue("ins-1", false).await?;
        h.issue("ins-2", false).await?;
        h.revoke(supervisor(ISSUER), "ins-2", "void", 10).await?;

        let only = revocations.try_recv()?.expect("revocation");
        assert_eq!(only.payload_json::<InstrumentRevokedPayload>()?.id, "ins-2");
        assert_eq!(revocations.try_recv()?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_delivery_filtered() -> anyhow::Result<()> {
        let h = Harness::new();
        let mut raw = h.bus.subscribe(EventFilter::all());
        let mut deduped = h.bus.subscribe(EventFilter::all()).deduplicated(64);

        h.issue("ins-1", false).await?;
        let committed = h.ledger.notifications()[0].clone();
        // At-least-once relays may repeat a notification.
        h.bus.publish(committed.clone()).await;

        assert_eq!(raw.try_recv()?, Some(committed.clone()));
        assert_eq!(raw.try_recv()?, Some(committed.clone()));
        assert_eq!(deduped.try_recv()?, Some(committed));
        assert_eq!(deduped.try_recv()?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_relay_disabled() -> anyhow::Result<()> {
        let h = Harness::with_config(ServiceConfig {
            relay_notifications: false,
            ..ServiceConfig::default()
        });
        let mut sub = h.bus.subscribe(EventFilter::all());

        h.issue("ins-1", false).await?;
        assert_eq!(sub.try_recv()?, None);
        assert_eq!(h.ledger.notifications().len(), 1);
        assert_eq!(h.bus.notifications_published(), 0);
        assert_eq!(h.service.stats().await.notifications_relayed, 0);
        Ok(())
    }
}
