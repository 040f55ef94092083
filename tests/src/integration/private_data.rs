//! # Private Data
//!
//! Blobs handed over in the transient map land in the caller organization's
//! implicit collection and nowhere else.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use nl_01_ledger_substrate::prelude::*;
    use nl_02_notarization::prelude::*;

    const BLOB: &[u8] = b"{\"nationalId\":\"0801-1990-00001\"}";

    fn put_request(caller: Credential, case_id: &str, blob: &[u8]) -> InvocationRequest {
        request("PutPrivateRecord", [case_id], caller, 0).with_transient("pii", blob.to_vec())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[tokio::test]
    async fn test_private_blob_never_public() -> anyhow::Result<()> {
        let h = Harness::new();
        let response = h
            .service
            .submit(put_request(Credential::new(ISSUER), "case-ins-1", BLOB))
            .await?;
        assert!(response.payload.is_empty());
        assert!(response.notification.is_none());
        h.issue("ins-1", false).await?;

        assert_eq!(
            h.ledger.private_data("_implicit_org_Org1MSP", "PII|case-ins-1"),
            Some(BLOB.to_vec())
        );
        for key in h.ledger.public_keys() {
            let value = h.ledger.committed_state(&key).unwrap_or_default();
            assert!(!contains(&value, BLOB), "blob leaked into {key}");
            for entry in h.ledger.history(&key) {
                assert!(!contains(&entry.value.unwrap_or_default(), BLOB));
            }
        }
        for notification in h.ledger.notifications() {
            assert!(!contains(&notification.payload, BLOB));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_private_record_visible_to_owner_only() -> anyhow::Result<()> {
        let h = Harness::new();
        h.service
            .submit(put_request(Credential::new(ISSUER), "case-1", BLOB))
            .await?;

        let own = h
            .service
            .evaluate(request("GetPrivateRecord", ["case-1"], Credential::new(ISSUER), 0))
            .await?;
        assert_eq!(own, BLOB);

        let other = h
            .service
            .evaluate(request("GetPrivateRecord", ["case-1"], Credential::new(OTHER_ORG), 0))
            .await
            .unwrap_err();
        assert_eq!(other.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_collection_read_denied() {
        let ledger = InMemoryLedger::new();
        let mut sim = ledger.begin(Proposal::new(
            TxId::new("peek"),
            TxTimestamp::from_seconds(T0),
            Credential::new(OTHER_ORG),
        ));
        let err = sim
            .get_private_data("_implicit_org_Org1MSP", "PII|case-1")
            .unwrap_err();
        assert!(matches!(err, SubstrateError::PrivateDataAccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_missing_or_empty_transient() {
        let h = Harness::new();

        let err = h
            .service
            .submit(request("PutPrivateRecord", ["case-1"], Credential::new(ISSUER), 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPayload);

        let err = h
            .service
            .submit(put_request(Credential::new(ISSUER), "case-1", b""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPayload);

        let err = h
            .service
            .submit(put_request(Credential::new(ISSUER), " ", BLOB))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(h.ledger.block_height(), 0);
    }

    #[tokio::test]
    async fn test_private_write_needs_no_role() -> anyhow::Result<()> {
        let h = Harness::new();
        for caller in [notary(ISSUER), supervisor(ISSUER), oversight()] {
            h.service.submit(put_request(caller, "case-x", BLOB)).await?;
        }
        assert!(h.ledger.private_data("_implicit_org_MOJMSP", "PII|case-x").is_some());
        Ok(())
    }
}
