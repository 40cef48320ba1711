//! DNSSEC delegation record operations.

use crate::client::{ApiDnssecRecord, PorkbunApi};
use crate::error::PorkbunError;
use crate::models::{DnsRecordDeleted, DnssecRecord};

pub fn to_dnssec_record(raw: &ApiDnssecRecord) -> DnssecRecord {
    DnssecRecord {
        key_tag: raw.key_tag.clone(),
        algorithm: raw.algorithm.clone(),
        digest_type: raw.digest_type.clone(),
        digest: raw.digest.clone(),
    }
}

pub async fn list(api: &dyn PorkbunApi, domain: &str) -> Result<Vec<DnssecRecord>, PorkbunError> {
    let records = api
        .dnssec_list(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "list DNSSEC records for {domain}"
        )))?;
    Ok(records.iter().map(to_dnssec_record).collect())
}

/// Creates a DS record at the registry. The response echoes the record as
/// submitted; the registry does not return a copy.
pub async fn create(
    api: &dyn PorkbunApi,
    domain: &str,
    record: DnssecRecord,
) -> Result<DnssecRecord, PorkbunError> {
    let raw = ApiDnssecRecord {
        key_tag: record.key_tag.clone(),
        algorithm: record.algorithm.clone(),
        digest_type: record.digest_type.clone(),
        digest: record.digest.clone(),
    };

    api.dnssec_create(domain, &raw)
        .await
        .map_err(PorkbunError::upstream(format!(
            "create DNSSEC record for {domain}"
        )))?;

    Ok(record)
}

pub async fn delete(
    api: &dyn PorkbunApi,
    domain: &str,
    key_tag: &str,
) -> Result<DnsRecordDeleted, PorkbunError> {
    api.dnssec_delete(domain, key_tag)
        .await
        .map_err(PorkbunError::upstream(format!(
            "delete DNSSEC record {key_tag} for {domain}"
        )))?;

    Ok(DnsRecordDeleted {
        status: "deleted".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mocks::{dnssec_record, MockPorkbunApi};

    #[tokio::test]
    async fn list_translates_registry_records() {
        let mock = MockPorkbunApi::new();
        mock.set_dnssec_records(vec![dnssec_record("64087")]);

        let records = list(&mock, "example.com").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key_tag, "64087");
        assert_eq!(mock.calls(), vec!["dnssec.list example.com"]);
    }

    #[tokio::test]
    async fn create_echoes_the_submitted_record() {
        let mock = MockPorkbunApi::new();

        let record = DnssecRecord {
            key_tag: "64087".to_string(),
            algorithm: "13".to_string(),
            digest_type: "2".to_string(),
            digest: "abc123".to_string(),
        };
        let created = create(&mock, "example.com", record).await.unwrap();

        assert_eq!(created.key_tag, "64087");
        assert_eq!(created.digest, "abc123");
        assert_eq!(mock.calls(), vec!["dnssec.create example.com"]);
    }

    #[tokio::test]
    async fn delete_reports_deleted_status() {
        let mock = MockPorkbunApi::new();

        let deleted = delete(&mock, "example.com", "64087").await.unwrap();

        assert_eq!(deleted.status, "deleted");
        assert_eq!(mock.calls(), vec!["dnssec.delete example.com 64087"]);
    }
}
