//! Tool parameter schemas. Each struct maps to one tool's input and derives
//! `JsonSchema` so rmcp can publish it to clients.

use rmcp::schemars;
use serde::Deserialize;

use crate::client::{DnsRecordDraft, UrlForwardDraft};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DomainParam {
    /// Domain name, e.g. "example.com".
    pub domain: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnsGetParams {
    pub domain: String,
    /// Numeric record identifier as returned by the list tools.
    pub record_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnsQueryByNameTypeParams {
    pub domain: String,
    /// Record type: A, AAAA, MX, TXT, CNAME, NS, SRV, TLSA, CAA, ALIAS, HTTPS, or SVCB.
    pub record_type: String,
    /// Subdomain to match. Omit for the domain apex.
    pub subdomain: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnsCreateParams {
    pub domain: String,
    /// Record type: A, AAAA, MX, TXT, CNAME, NS, SRV, TLSA, CAA, ALIAS, HTTPS, or SVCB.
    pub record_type: String,
    /// Record content, e.g. an IP address for A records.
    pub content: String,
    /// Subdomain for the record. Omit for the domain apex.
    pub name: Option<String>,
    /// Time to live in seconds. Defaults to 600 upstream.
    pub ttl: Option<u32>,
    /// Priority, for MX and SRV records.
    pub prio: Option<u16>,
    /// Free-form note attached to the record.
    pub notes: Option<String>,
}

impl DnsCreateParams {
    pub fn draft(&self) -> DnsRecordDraft {
        DnsRecordDraft {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            content: self.content.clone(),
            ttl: self.ttl,
            prio: self.prio,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnsEditParams {
    pub domain: String,
    /// Identifier of the record to replace.
    pub record_id: String,
    pub record_type: String,
    pub content: String,
    pub name: Option<String>,
    pub ttl: Option<u32>,
    pub prio: Option<u16>,
    pub notes: Option<String>,
}

impl DnsEditParams {
    pub fn draft(&self) -> DnsRecordDraft {
        DnsRecordDraft {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            content: self.content.clone(),
            ttl: self.ttl,
            prio: self.prio,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnsEditByNameTypeParams {
    pub domain: String,
    pub record_type: String,
    /// Subdomain of the record to edit. Omit for the domain apex.
    pub subdomain: Option<String>,
    /// New record content.
    pub content: String,
    /// New TTL. Omitted fields keep their current value.
    pub ttl: Option<u32>,
    pub prio: Option<u16>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnsDeleteParams {
    pub domain: String,
    pub record_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnssecCreateParams {
    pub domain: String,
    /// DS key tag.
    pub key_tag: String,
    /// DNSSEC algorithm number, e.g. "13" for ECDSA P-256.
    pub algorithm: String,
    /// Digest type number, e.g. "2" for SHA-256.
    pub digest_type: String,
    /// Hex-encoded digest of the DNSKEY record.
    pub digest: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DnssecDeleteParams {
    pub domain: String,
    /// Key tag of the DS record to remove.
    pub key_tag: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateNameserversParams {
    pub domain: String,
    /// Full replacement set of authoritative nameservers.
    pub nameservers: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddUrlForwardParams {
    pub domain: String,
    /// Destination URL.
    pub location: String,
    /// Forward type: "temporary" or "permanent".
    pub forward_type: String,
    /// Subdomain to forward. Omit for the domain apex.
    pub subdomain: Option<String>,
    /// Append the request path to the destination.
    #[serde(default)]
    pub include_path: bool,
    /// Also forward all subdomains.
    #[serde(default)]
    pub wildcard: bool,
}

impl AddUrlForwardParams {
    pub fn draft(&self) -> UrlForwardDraft {
        UrlForwardDraft {
            subdomain: self.subdomain.clone(),
            location: self.location.clone(),
            forward_type: self.forward_type.clone(),
            include_path: self.include_path,
            wildcard: self.wildcard,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteUrlForwardParams {
    pub domain: String,
    /// Identifier of the forward as returned by the list tool.
    pub forward_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GlueWriteParams {
    pub domain: String,
    /// Host label for the glue record, e.g. "ns1".
    pub subdomain: String,
    /// IPv4 and IPv6 addresses for the host. At least one is required.
    pub ips: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GlueDeleteParams {
    pub domain: String,
    pub subdomain: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_params_accept_minimal_input() {
        let params: DnsCreateParams = serde_json::from_value(serde_json::json!({
            "domain": "example.com",
            "record_type": "A",
            "content": "192.0.2.1",
        }))
        .unwrap();

        let draft = params.draft();
        assert_eq!(draft.record_type, "A");
        assert_eq!(draft.name, None);
        assert_eq!(draft.ttl, None);
    }

    #[test]
    fn url_forward_flags_default_to_off() {
        let params: AddUrlForwardParams = serde_json::from_value(serde_json::json!({
            "domain": "example.com",
            "location": "https://example.net",
            "forward_type": "temporary",
        }))
        .unwrap();

        let draft = params.draft();
        assert!(!draft.include_path);
        assert!(!draft.wildcard);
        assert_eq!(draft.subdomain, None);
    }
}
