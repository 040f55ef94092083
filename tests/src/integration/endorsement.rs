//! # State-Based Endorsement
//!
//! Every instrument key carries its own validation policy. These flows check
//! that the reference ledger enforces what the lifecycle installs.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use nl_01_ledger_substrate::prelude::*;
    use nl_02_notarization::prelude::*;

    fn installed_policy(h: &Harness, id: &str) -> EndorsementPolicy {
        let bytes = h
            .ledger
            .validation_parameter(&instrument_key(id))
            .expect("instrument carries a validation parameter");
        EndorsementPolicy::from_bytes(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_issue_installs_issuer_policy() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("plain", false).await?;
        h.issue("extra", true).await?;

        let plain = installed_policy(&h, "plain");
        assert_eq!(plain.required_orgs.len(), 1);
        assert!(plain.requires(&OrgId::new(ISSUER)));

        let extra = installed_policy(&h, "extra");
        assert!(extra.requires(&OrgId::new(ISSUER)));
        assert!(extra.requires(&OrgId::new(OVERSIGHT)));
        Ok(())
    }

    #[tokio::test]
    async fn test_post_revoke_writes_need_oversight() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;
        h.revoke(supervisor(ISSUER), "ins-1", "void", 10).await?;
        assert_eq!(installed_policy(&h, "ins-1"), {
            let mut p = EndorsementPolicy::new(PrincipalRole::Peer);
            p.add_orgs([OrgId::new(ISSUER), OrgId::new(OVERSIGHT)]);
            p
        });

        // The issuer alone can no longer touch the record.
        let tamper = |tx: &str| {
            Proposal::new(TxId::new(tx), TxTimestamp::from_seconds(T0 + 20), notary(ISSUER))
        };
        let mut sim = h.ledger.begin(tamper("tamper-1"));
        sim.put_state(&instrument_key("ins-1"), b"{}".to_vec())?;
        match sim.commit() {
            Err(SubstrateError::EndorsementPolicyFailure { key, missing }) => {
                assert_eq!(key, "INS|ins-1");
                assert_eq!(missing, vec![OrgId::new(OVERSIGHT)]);
            }
            other => panic!("expected endorsement failure, got {other:?}"),
        }

        let mut sim = h.ledger.begin(tamper("tamper-2").endorsed_by(OVERSIGHT));
        sim.put_state(&instrument_key("ins-1"), b"{}".to_vec())?;
        sim.commit()?;
        Ok(())
    }

    #[tokio::test]
    async fn test_extra_approval_revoke_needs_oversight_endorsement() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", true).await?;

        let err = h
            .revoke(supervisor(ISSUER), "ins-1", "void", 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Commit(SubstrateError::EndorsementPolicyFailure { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::Substrate);
        assert_eq!(h.get("ins-1").await?.status, InstrumentStatus::Issued);

        let response = h
            .service
            .submit(
                request("InstrumentRevoke", ["ins-1", "void"], supervisor(ISSUER), 11)
                    .endorsed_by(OVERSIGHT),
            )
            .await?;
        let revoked: Instrument = response.json()?;
        assert_eq!(revoked.status, InstrumentStatus::Revoked);
        Ok(())
    }

    #[tokio::test]
    async fn test_oversight_revoke_needs_issuer_endorsement() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;

        let err = h.revoke(oversight(), "ins-1", "court order", 5).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Commit(SubstrateError::EndorsementPolicyFailure { .. })
        ));

        let response = h
            .service
            .submit(
                request("InstrumentRevoke", ["ins-1", "court order"], oversight(), 6)
                    .endorsed_by(ISSUER),
            )
            .await?;
        assert_eq!(response.json::<Instrument>()?.status, InstrumentStatus::Revoked);
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_supervisor_cannot_revoke() -> anyhow::Result<()> {
        let h = Harness::new();
        h.issue("ins-1", false).await?;

        let err = h
            .revoke(supervisor(OTHER_ORG), "ins-1", "void", 5)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        Ok(())
    }
}
