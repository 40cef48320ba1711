//! DNS record operations and their response translators.

use crate::client::{ApiDnsRecord, DnsRecordDraft, PorkbunApi};
use crate::error::PorkbunError;
use crate::models::{DnsRecord, DnsRecordCreated, DnsRecordDeleted, DnsRecordEdited};

pub const VALID_RECORD_TYPES: [&str; 12] = [
    "A", "AAAA", "MX", "TXT", "CNAME", "NS", "SRV", "TLSA", "CAA", "ALIAS", "HTTPS", "SVCB",
];

/// Validates and canonicalizes a DNS record type before anything is sent
/// upstream.
pub fn validate_record_type(record_type: &str) -> Result<String, PorkbunError> {
    let canonical = record_type.trim().to_uppercase();
    if VALID_RECORD_TYPES.contains(&canonical.as_str()) {
        Ok(canonical)
    } else {
        Err(PorkbunError::InvalidInput(format!(
            "Unknown record type: {record_type}. Valid types: {}",
            VALID_RECORD_TYPES.join(", ")
        )))
    }
}

/// Translates an upstream DNS record. Total over anything the client can
/// produce: unparseable TTLs fall back to the upstream default, empty
/// priority/notes map to an absent value.
pub fn to_dns_record(raw: &ApiDnsRecord) -> DnsRecord {
    DnsRecord {
        id: raw.id.clone(),
        record_type: raw.record_type.clone(),
        name: raw.name.clone(),
        content: raw.content.clone(),
        ttl: raw
            .ttl
            .as_deref()
            .and_then(|ttl| ttl.parse().ok())
            .unwrap_or(600),
        priority: raw
            .prio
            .as_deref()
            .filter(|prio| !prio.is_empty())
            .and_then(|prio| prio.parse().ok()),
        notes: raw.notes.clone().filter(|notes| !notes.is_empty()),
    }
}

pub async fn list(api: &dyn PorkbunApi, domain: &str) -> Result<Vec<DnsRecord>, PorkbunError> {
    let records = api
        .dns_list(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "list DNS records for {domain}"
        )))?;
    Ok(records.iter().map(to_dns_record).collect())
}

pub async fn get(
    api: &dyn PorkbunApi,
    domain: &str,
    record_id: &str,
) -> Result<DnsRecord, PorkbunError> {
    let record = api
        .dns_get(domain, record_id)
        .await
        .map_err(PorkbunError::upstream(format!(
            "get DNS record {record_id} for {domain}"
        )))?;

    match record {
        Some(raw) => Ok(to_dns_record(&raw)),
        None => Err(PorkbunError::NotFound(format!(
            "DNS record {record_id} not found for {domain}"
        ))),
    }
}

pub async fn get_by_name_type(
    api: &dyn PorkbunApi,
    domain: &str,
    record_type: &str,
    subdomain: Option<&str>,
) -> Result<Vec<DnsRecord>, PorkbunError> {
    let record_type = validate_record_type(record_type)?;
    let records = api
        .dns_get_by_name_type(domain, &record_type, subdomain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "get {record_type} records for {domain}"
        )))?;
    Ok(records.iter().map(to_dns_record).collect())
}

pub async fn create(
    api: &dyn PorkbunApi,
    domain: &str,
    mut draft: DnsRecordDraft,
) -> Result<DnsRecordCreated, PorkbunError> {
    draft.record_type = validate_record_type(&draft.record_type)?;
    let record_id = api
        .dns_create(domain, &draft)
        .await
        .map_err(PorkbunError::upstream(format!(
            "create DNS record for {domain}"
        )))?;

    Ok(DnsRecordCreated {
        status: "created".to_string(),
        record_id,
    })
}

pub async fn edit(
    api: &dyn PorkbunApi,
    domain: &str,
    record_id: &str,
    mut draft: DnsRecordDraft,
) -> Result<DnsRecordEdited, PorkbunError> {
    draft.record_type = validate_record_type(&draft.record_type)?;
    api.dns_edit(domain, record_id, &draft)
        .await
        .map_err(PorkbunError::upstream(format!(
            "edit DNS record {record_id} for {domain}"
        )))?;

    Ok(DnsRecordEdited {
        status: "edited".to_string(),
        record_id: record_id.to_string(),
    })
}

pub async fn delete(
    api: &dyn PorkbunApi,
    domain: &str,
    record_id: &str,
) -> Result<DnsRecordDeleted, PorkbunError> {
    api.dns_delete(domain, record_id)
        .await
        .map_err(PorkbunError::upstream(format!(
            "delete DNS record {record_id} for {domain}"
        )))?;

    Ok(DnsRecordDeleted {
        status: "deleted".to_string(),
    })
}

/// Edits the single record matching (subdomain, type). The match is resolved
/// with a lookup first; zero or multiple candidates is an error, never a
/// guess.
#[allow(clippy::too_many_arguments)]
pub async fn edit_by_name_type(
    api: &dyn PorkbunApi,
    domain: &str,
    record_type: &str,
    subdomain: Option<&str>,
    content: &str,
    ttl: Option<u32>,
    prio: Option<u16>,
    notes: Option<String>,
) -> Result<DnsRecordEdited, PorkbunError> {
    let record_type = validate_record_type(record_type)?;
    let target = resolve_single(api, domain, &record_type, subdomain).await?;

    let draft = DnsRecordDraft {
        name: Some(subdomain_of(&target.name, domain)),
        record_type,
        content: content.to_string(),
        ttl: ttl.or_else(|| target.ttl.as_deref().and_then(|t| t.parse().ok())),
        prio: prio.or_else(|| target.prio.as_deref().and_then(|p| p.parse().ok())),
        notes: notes.or_else(|| target.notes.clone()),
    };

    api.dns_edit(domain, &target.id, &draft)
        .await
        .map_err(PorkbunError::upstream(format!(
            "edit DNS record {} for {domain}",
            target.id
        )))?;

    Ok(DnsRecordEdited {
        status: "edited".to_string(),
        record_id: target.id,
    })
}

/// Deletes the single record matching (subdomain, type), with the same
/// resolve-then-act contract as [`edit_by_name_type`].
pub async fn delete_by_name_type(
    api: &dyn PorkbunApi,
    domain: &str,
    record_type: &str,
    subdomain: Option<&str>,
) -> Result<DnsRecordDeleted, PorkbunError> {
    let record_type = validate_record_type(record_type)?;
    let target = resolve_single(api, domain, &record_type, subdomain).await?;

    api.dns_delete(domain, &target.id)
        .await
        .map_err(PorkbunError::upstream(format!(
            "delete DNS record {} for {domain}",
            target.id
        )))?;

    Ok(DnsRecordDeleted {
        status: "deleted".to_string(),
    })
}

async fn resolve_single(
    api: &dyn PorkbunApi,
    domain: &str,
    record_type: &str,
    subdomain: Option<&str>,
) -> Result<ApiDnsRecord, PorkbunError> {
    let name = subdomain.filter(|s| !s.is_empty()).unwrap_or("@");
    let mut candidates = api
        .dns_get_by_name_type(domain, record_type, subdomain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "get {record_type} records for {domain}"
        )))?;

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(PorkbunError::NotFound(format!(
            "no {record_type} record found for {name}.{domain}"
        ))),
        n => Err(PorkbunError::NotFound(format!(
            "found {n} {record_type} records for {name}.{domain}; not acting on an ambiguous target"
        ))),
    }
}

/// Strips the zone from a fully qualified record name, leaving the subdomain
/// the edit endpoint expects (empty for the apex).
fn subdomain_of(name: &str, domain: &str) -> String {
    if name == domain {
        return String::new();
    }
    name.strip_suffix(&format!(".{domain}"))
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mocks::{dns_record, MockPorkbunApi};

    #[test]
    fn record_type_validation_canonicalizes() {
        assert_eq!(validate_record_type("a").unwrap(), "A");
        assert_eq!(validate_record_type(" mx ").unwrap(), "MX");
        assert_eq!(validate_record_type("SVCB").unwrap(), "SVCB");
    }

    #[test]
    fn record_type_validation_rejects_unknown() {
        let err = validate_record_type("INVALID").unwrap_err();
        assert!(matches!(err, PorkbunError::InvalidInput(_)));
        assert!(err.to_string().contains("Unknown record type"));
    }

    #[test]
    fn translator_maps_absent_fields_to_none() {
        let raw = ApiDnsRecord {
            id: "12345".to_string(),
            name: "www.example.com".to_string(),
            record_type: "A".to_string(),
            content: "192.0.2.1".to_string(),
            ttl: Some("600".to_string()),
            prio: None,
            notes: None,
        };

        let record = to_dns_record(&raw);
        assert_eq!(record.ttl, 600);
        assert_eq!(record.priority, None);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn translator_keeps_present_optional_fields() {
        let raw = ApiDnsRecord {
            id: "12345".to_string(),
            name: "example.com".to_string(),
            record_type: "MX".to_string(),
            content: "mail.example.com".to_string(),
            ttl: Some("3600".to_string()),
            prio: Some("10".to_string()),
            notes: Some("primary MX".to_string()),
        };

        let record = to_dns_record(&raw);
        assert_eq!(record.priority, Some(10));
        assert_eq!(record.notes.as_deref(), Some("primary MX"));
    }

    #[test]
    fn translator_treats_empty_strings_as_absent() {
        let raw = ApiDnsRecord {
            id: "1".to_string(),
            name: "example.com".to_string(),
            record_type: "A".to_string(),
            content: "192.0.2.1".to_string(),
            ttl: None,
            prio: Some(String::new()),
            notes: Some(String::new()),
        };

        let record = to_dns_record(&raw);
        assert_eq!(record.ttl, 600);
        assert_eq!(record.priority, None);
        assert_eq!(record.notes, None);
    }

    #[tokio::test]
    async fn list_translates_upstream_records() {
        let mock = MockPorkbunApi::new();
        mock.set_dns_records(vec![dns_record("12345")]);

        let records = list(&mock, "example.com").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "12345");
        assert_eq!(mock.calls(), vec!["dns.list example.com"]);
    }

    #[tokio::test]
    async fn get_returns_the_matching_record() {
        let mock = MockPorkbunApi::new();
        mock.set_dns_record(dns_record("12345"));

        let record = get(&mock, "example.com", "12345").await.unwrap();

        assert_eq!(record.id, "12345");
        assert_eq!(record.record_type, "A");
        assert_eq!(mock.calls(), vec!["dns.get example.com 12345"]);
    }

    #[tokio::test]
    async fn get_missing_record_is_not_found() {
        let mock = MockPorkbunApi::new();

        let err = get(&mock, "example.com", "99999").await.unwrap_err();

        assert!(matches!(err, PorkbunError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn create_returns_created_status() {
        let mock = MockPorkbunApi::new();

        let draft = DnsRecordDraft {
            record_type: "A".to_string(),
            content: "192.0.2.1".to_string(),
            ..DnsRecordDraft::default()
        };
        let created = create(&mock, "example.com", draft).await.unwrap();

        assert_eq!(created.status, "created");
        assert_eq!(created.record_id, "12345");
        assert_eq!(mock.calls(), vec!["dns.create example.com"]);
    }

    #[tokio::test]
    async fn create_rejects_invalid_type_before_any_upstream_call() {
        let mock = MockPorkbunApi::new();

        let draft = DnsRecordDraft {
            record_type: "INVALID".to_string(),
            content: "test".to_string(),
            ..DnsRecordDraft::default()
        };
        let err = create(&mock, "example.com", draft).await.unwrap_err();

        assert!(matches!(err, PorkbunError::InvalidInput(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn delete_issues_exactly_one_upstream_call() {
        let mock = MockPorkbunApi::new();

        let deleted = delete(&mock, "example.com", "12345").await.unwrap();

        assert_eq!(deleted.status, "deleted");
        assert_eq!(mock.calls(), vec!["dns.delete example.com 12345"]);
    }

    #[tokio::test]
    async fn delete_by_name_type_acts_on_single_match() {
        let mock = MockPorkbunApi::new();
        mock.set_dns_records(vec![dns_record("12345")]);

        let deleted = delete_by_name_type(&mock, "example.com", "A", Some("www"))
            .await
            .unwrap();

        assert_eq!(deleted.status, "deleted");
        assert_eq!(
            mock.calls(),
            vec![
                "dns.get_by_name_type example.com A www",
                "dns.delete example.com 12345",
            ]
        );
    }

    #[tokio::test]
    async fn delete_by_name_type_zero_matches_is_not_found() {
        let mock = MockPorkbunApi::new();

        let err = delete_by_name_type(&mock, "example.com", "A", Some("www"))
            .await
            .unwrap_err();

        assert!(matches!(err, PorkbunError::NotFound(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn delete_by_name_type_multiple_matches_is_refused() {
        let mock = MockPorkbunApi::new();
        mock.set_dns_records(vec![dns_record("1"), dns_record("2")]);

        let err = delete_by_name_type(&mock, "example.com", "A", Some("www"))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, PorkbunError::NotFound(_)));
        assert!(message.contains('2'));
        assert!(message.contains("ambiguous"));
        // The lookup happened, the delete did not.
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn edit_by_name_type_preserves_unspecified_fields() {
        let mock = MockPorkbunApi::new();
        let mut existing = dns_record("12345");
        existing.ttl = Some("3600".to_string());
        mock.set_dns_records(vec![existing]);

        let edited = edit_by_name_type(
            &mock,
            "example.com",
            "A",
            Some("www"),
            "203.0.113.9",
            None,
            None,
            None,
        )
        .await
        .unwrap();

        assert_eq!(edited.status, "edited");
        assert_eq!(edited.record_id, "12345");
        let draft = mock.last_dns_edit_draft().unwrap();
        assert_eq!(draft.content, "203.0.113.9");
        assert_eq!(draft.ttl, Some(3600));
        assert_eq!(draft.name.as_deref(), Some("www"));
    }

    #[test]
    fn subdomain_of_handles_apex_and_children() {
        assert_eq!(subdomain_of("example.com", "example.com"), "");
        assert_eq!(subdomain_of("www.example.com", "example.com"), "www");
        assert_eq!(subdomain_of("a.b.example.com", "example.com"), "a.b");
    }
}
