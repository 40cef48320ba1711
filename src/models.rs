//! Output entities returned to MCP callers. Every value here is a fresh
//! translation of an upstream response; nothing is cached between calls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResult {
    pub status: String,
    pub your_ip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecordCreated {
    pub status: String,
    pub record_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecordEdited {
    pub status: String,
    pub record_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecordDeleted {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnssecRecord {
    pub key_tag: String,
    pub algorithm: String,
    pub digest_type: String,
    pub digest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainInfo {
    pub domain: String,
    pub status: String,
    pub tld: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<String>,
    pub security_lock: bool,
    pub whois_privacy: bool,
    pub auto_renew: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nameservers {
    pub domain: String,
    pub nameservers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainAvailability {
    pub domain: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlForward {
    pub id: String,
    pub subdomain: String,
    pub location: String,
    #[serde(rename = "type")]
    pub forward_type: String,
    pub include_path: bool,
    pub wildcard: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlForwardCreated {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlueRecord {
    pub hostname: String,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlueRecordCreated {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SslBundle {
    pub domain: String,
    pub certificate_chain: String,
    pub private_key: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediate_certificate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TldPricing {
    pub tld: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer: Option<String>,
}
