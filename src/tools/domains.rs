//! Domain portfolio operations: listing, nameservers, availability checks,
//! URL forwarding, and glue records.

use crate::client::{ApiDomain, ApiGlueHost, ApiUrlForward, PorkbunApi, UrlForwardDraft};
use crate::error::PorkbunError;
use crate::models::{
    DomainAvailability, DomainInfo, GlueRecord, GlueRecordCreated, Nameservers, UrlForward,
    UrlForwardCreated,
};

pub fn to_domain_info(raw: &ApiDomain) -> DomainInfo {
    DomainInfo {
        domain: raw.domain.clone(),
        status: raw.status.clone(),
        tld: raw.tld.clone(),
        create_date: raw.create_date.clone(),
        expire_date: raw.expire_date.clone(),
        security_lock: raw.security_lock,
        whois_privacy: raw.whois_privacy,
        auto_renew: raw.auto_renew,
    }
}

pub fn to_url_forward(raw: &ApiUrlForward) -> UrlForward {
    UrlForward {
        id: raw.id.clone(),
        subdomain: raw.subdomain.clone(),
        location: raw.location.clone(),
        forward_type: raw.forward_type.clone(),
        include_path: raw.include_path,
        wildcard: raw.wildcard,
    }
}

pub fn to_glue_record(raw: &ApiGlueHost) -> GlueRecord {
    GlueRecord {
        hostname: raw.0.clone(),
        ipv4: raw.1.v4.clone(),
        ipv6: raw.1.v6.clone(),
    }
}

pub async fn list(api: &dyn PorkbunApi) -> Result<Vec<DomainInfo>, PorkbunError> {
    let domains = api
        .domains_list()
        .await
        .map_err(PorkbunError::upstream("list domains"))?;
    Ok(domains.iter().map(to_domain_info).collect())
}

pub async fn get_nameservers(
    api: &dyn PorkbunApi,
    domain: &str,
) -> Result<Nameservers, PorkbunError> {
    let nameservers = api
        .get_nameservers(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "get nameservers for {domain}"
        )))?;

    Ok(Nameservers {
        domain: domain.to_string(),
        nameservers,
    })
}

/// Replaces the authoritative nameserver set. The response echoes the set as
/// submitted.
pub async fn update_nameservers(
    api: &dyn PorkbunApi,
    domain: &str,
    nameservers: Vec<String>,
) -> Result<Nameservers, PorkbunError> {
    api.update_nameservers(domain, &nameservers)
        .await
        .map_err(PorkbunError::upstream(format!(
            "update nameservers for {domain}"
        )))?;

    Ok(Nameservers {
        domain: domain.to_string(),
        nameservers,
    })
}

pub async fn check_availability(
    api: &dyn PorkbunApi,
    domain: &str,
) -> Result<DomainAvailability, PorkbunError> {
    let check = api
        .check_domain(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "check availability of {domain}"
        )))?;

    Ok(DomainAvailability {
        domain: domain.to_string(),
        available: check.available,
        price: check.price,
        premium: check.premium,
    })
}

pub async fn get_url_forwards(
    api: &dyn PorkbunApi,
    domain: &str,
) -> Result<Vec<UrlForward>, PorkbunError> {
    let forwards = api
        .get_url_forwards(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "get URL forwards for {domain}"
        )))?;
    Ok(forwards.iter().map(to_url_forward).collect())
}

pub async fn add_url_forward(
    api: &dyn PorkbunApi,
    domain: &str,
    forward: UrlForwardDraft,
) -> Result<UrlForwardCreated, PorkbunError> {
    api.add_url_forward(domain, &forward)
        .await
        .map_err(PorkbunError::upstream(format!(
            "add URL forward for {domain}"
        )))?;

    Ok(UrlForwardCreated {
        status: "created".to_string(),
    })
}

pub async fn delete_url_forward(
    api: &dyn PorkbunApi,
    domain: &str,
    forward_id: &str,
) -> Result<UrlForwardCreated, PorkbunError> {
    api.delete_url_forward(domain, forward_id)
        .await
        .map_err(PorkbunError::upstream(format!(
            "delete URL forward {forward_id} for {domain}"
        )))?;

    Ok(UrlForwardCreated {
        status: "deleted".to_string(),
    })
}

pub async fn get_glue_records(
    api: &dyn PorkbunApi,
    domain: &str,
) -> Result<Vec<GlueRecord>, PorkbunError> {
    let hosts = api
        .get_glue_records(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "get glue records for {domain}"
        )))?;
    Ok(hosts.iter().map(to_glue_record).collect())
}

pub async fn create_glue_record(
    api: &dyn PorkbunApi,
    domain: &str,
    subdomain: &str,
    ips: Vec<String>,
) -> Result<GlueRecordCreated, PorkbunError> {
    if ips.is_empty() {
        return Err(PorkbunError::InvalidInput(
            "glue record requires at least one IP address".to_string(),
        ));
    }

    api.create_glue_record(domain, subdomain, &ips)
        .await
        .map_err(PorkbunError::upstream(format!(
            "create glue record {subdomain}.{domain}"
        )))?;

    Ok(GlueRecordCreated {
        status: "created".to_string(),
    })
}

pub async fn update_glue_record(
    api: &dyn PorkbunApi,
    domain: &str,
    subdomain: &str,
    ips: Vec<String>,
) -> Result<GlueRecordCreated, PorkbunError> {
    if ips.is_empty() {
        return Err(PorkbunError::InvalidInput(
            "glue record requires at least one IP address".to_string(),
        ));
    }

    api.update_glue_record(domain, subdomain, &ips)
        .await
        .map_err(PorkbunError::upstream(format!(
            "update glue record {subdomain}.{domain}"
        )))?;

    Ok(GlueRecordCreated {
        status: "updated".to_string(),
    })
}

pub async fn delete_glue_record(
    api: &dyn PorkbunApi,
    domain: &str,
    subdomain: &str,
) -> Result<GlueRecordCreated, PorkbunError> {
    api.delete_glue_record(domain, subdomain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "delete glue record {subdomain}.{domain}"
        )))?;

    Ok(GlueRecordCreated {
        status: "deleted".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_mocks::{domain, MockPorkbunApi};

    #[tokio::test]
    async fn list_translates_portfolio() {
        let mock = MockPorkbunApi::new();
        mock.set_domains(vec![domain("example.com")]);

        let domains = list(&mock).await.unwrap();

        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].domain, "example.com");
        assert!(domains[0].whois_privacy);
        assert_eq!(mock.calls(), vec!["domains.list"]);
    }

    #[tokio::test]
    async fn update_nameservers_echoes_submitted_set() {
        let mock = MockPorkbunApi::new();

        let ns = vec![
            "ns1.example.net".to_string(),
            "ns2.example.net".to_string(),
        ];
        let updated = update_nameservers(&mock, "example.com", ns.clone())
            .await
            .unwrap();

        assert_eq!(updated.domain, "example.com");
        assert_eq!(updated.nameservers, ns);
        assert_eq!(mock.calls(), vec!["domains.update_ns example.com"]);
    }

    #[tokio::test]
    async fn check_availability_maps_upstream_fields() {
        let mock = MockPorkbunApi::new();

        let availability = check_availability(&mock, "available-domain.com")
            .await
            .unwrap();

        assert_eq!(availability.domain, "available-domain.com");
        assert!(availability.available);
        assert_eq!(availability.price.as_deref(), Some("9.68"));
        assert_eq!(mock.calls(), vec!["domains.check available-domain.com"]);
    }

    #[tokio::test]
    async fn url_forward_lifecycle_statuses() {
        let mock = MockPorkbunApi::new();

        let forward = UrlForwardDraft {
            subdomain: None,
            location: "https://example.net".to_string(),
            forward_type: "temporary".to_string(),
            include_path: false,
            wildcard: true,
        };
        let created = add_url_forward(&mock, "example.com", forward).await.unwrap();
        assert_eq!(created.status, "created");

        let deleted = delete_url_forward(&mock, "example.com", "7777")
            .await
            .unwrap();
        assert_eq!(deleted.status, "deleted");

        assert_eq!(
            mock.calls(),
            vec![
                "domains.add_url_forward example.com",
                "domains.delete_url_forward example.com 7777",
            ]
        );
    }

    #[tokio::test]
    async fn glue_records_translate_host_pairs() {
        let mock = MockPorkbunApi::new();

        let records = get_glue_records(&mock, "example.com").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hostname, "ns1.example.com");
        assert_eq!(records[0].ipv4, vec!["192.0.2.53"]);
        assert!(records[0].ipv6.is_empty());
    }

    #[tokio::test]
    async fn glue_record_lifecycle_statuses() {
        let mock = MockPorkbunApi::new();

        let ips = vec!["192.0.2.53".to_string()];
        let created = create_glue_record(&mock, "example.com", "ns1", ips.clone())
            .await
            .unwrap();
        assert_eq!(created.status, "created");

        let updated = update_glue_record(&mock, "example.com", "ns1", ips)
            .await
            .unwrap();
        assert_eq!(updated.status, "updated");

        let deleted = delete_glue_record(&mock, "example.com", "ns1")
            .await
            .unwrap();
        assert_eq!(deleted.status, "deleted");
    }

    #[tokio::test]
    async fn glue_record_requires_an_ip() {
        let mock = MockPorkbunApi::new();

        let err = create_glue_record(&mock, "example.com", "ns1", vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, PorkbunError::InvalidInput(_)));
        assert_eq!(mock.call_count(), 0);
    }
}
