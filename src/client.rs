//! Upstream Porkbun API client.
//!
//! Every endpoint is a POST with a JSON body; authenticated endpoints carry
//! the credential pair merged into the body. Responses share an envelope with
//! `status: "SUCCESS" | "ERROR"` and an error `message`. The upstream JSON is
//! loose about types (ids and TTLs arrive as strings or numbers, booleans as
//! `"yes"/"no"` or `"1"/"0"`), so the response structs here absorb that with
//! tolerant deserializers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::config::{Settings, API_KEY_VAR, SECRET_KEY_VAR};

pub const API_BASE: &str = "https://api.porkbun.com/api/json/v3";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API credentials missing: set {API_KEY_VAR} and {SECRET_KEY_VAR}")]
    MissingCredentials,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Porkbun API error: {0}")]
    Api(String),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Capability interface over the upstream registrar API, one async method per
/// consumed endpoint. Handlers depend on this trait so tests can substitute a
/// call-recording double.
#[async_trait]
pub trait PorkbunApi: Send + Sync {
    async fn ping(&self) -> ApiResult<String>;

    async fn dns_list(&self, domain: &str) -> ApiResult<Vec<ApiDnsRecord>>;
    async fn dns_get(&self, domain: &str, record_id: &str) -> ApiResult<Option<ApiDnsRecord>>;
    async fn dns_get_by_name_type(
        &self,
        domain: &str,
        record_type: &str,
        subdomain: Option<&str>,
    ) -> ApiResult<Vec<ApiDnsRecord>>;
    async fn dns_create(&self, domain: &str, draft: &DnsRecordDraft) -> ApiResult<String>;
    async fn dns_edit(
        &self,
        domain: &str,
        record_id: &str,
        draft: &DnsRecordDraft,
    ) -> ApiResult<()>;
    async fn dns_delete(&self, domain: &str, record_id: &str) -> ApiResult<()>;

    async fn dnssec_list(&self, domain: &str) -> ApiResult<Vec<ApiDnssecRecord>>;
    async fn dnssec_create(&self, domain: &str, record: &ApiDnssecRecord) -> ApiResult<()>;
    async fn dnssec_delete(&self, domain: &str, key_tag: &str) -> ApiResult<()>;

    async fn domains_list(&self) -> ApiResult<Vec<ApiDomain>>;
    async fn get_nameservers(&self, domain: &str) -> ApiResult<Vec<String>>;
    async fn update_nameservers(&self, domain: &str, nameservers: &[String]) -> ApiResult<()>;
    async fn check_domain(&self, domain: &str) -> ApiResult<ApiDomainCheck>;
    async fn get_url_forwards(&self, domain: &str) -> ApiResult<Vec<ApiUrlForward>>;
    async fn add_url_forward(&self, domain: &str, forward: &UrlForwardDraft) -> ApiResult<()>;
    async fn delete_url_forward(&self, domain: &str, forward_id: &str) -> ApiResult<()>;
    async fn get_glue_records(&self, domain: &str) -> ApiResult<Vec<ApiGlueHost>>;
    async fn create_glue_record(
        &self,
        domain: &str,
        subdomain: &str,
        ips: &[String],
    ) -> ApiResult<()>;
    async fn update_glue_record(
        &self,
        domain: &str,
        subdomain: &str,
        ips: &[String],
    ) -> ApiResult<()>;
    async fn delete_glue_record(&self, domain: &str, subdomain: &str) -> ApiResult<()>;

    async fn ssl_retrieve(&self, domain: &str) -> ApiResult<ApiSslBundle>;

    /// Public endpoint, works without credentials.
    async fn get_pricing(&self) -> ApiResult<BTreeMap<String, ApiTldPricing>>;
}

// Upstream response shapes.

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDnsRecord {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub ttl: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub prio: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDnssecRecord {
    #[serde(rename = "keyTag", deserialize_with = "de_string")]
    pub key_tag: String,
    #[serde(rename = "alg", deserialize_with = "de_string")]
    pub algorithm: String,
    #[serde(rename = "digestType", deserialize_with = "de_string")]
    pub digest_type: String,
    pub digest: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDomain {
    pub domain: String,
    pub status: String,
    pub tld: String,
    #[serde(rename = "createDate", default, deserialize_with = "de_opt_string")]
    pub create_date: Option<String>,
    #[serde(rename = "expireDate", default, deserialize_with = "de_opt_string")]
    pub expire_date: Option<String>,
    #[serde(rename = "securityLock", default, deserialize_with = "de_flag")]
    pub security_lock: bool,
    #[serde(rename = "whoisPrivacy", default, deserialize_with = "de_flag")]
    pub whois_privacy: bool,
    #[serde(rename = "autoRenew", default, deserialize_with = "de_flag")]
    pub auto_renew: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDomainCheck {
    #[serde(rename = "avail", deserialize_with = "de_flag")]
    pub available: bool,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "de_opt_flag")]
    pub premium: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUrlForward {
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    #[serde(default)]
    pub subdomain: String,
    pub location: String,
    #[serde(rename = "type")]
    pub forward_type: String,
    #[serde(rename = "includePath", default, deserialize_with = "de_flag")]
    pub include_path: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub wildcard: bool,
}

/// Glue host entry, arriving as a `[hostname, {v4, v6}]` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGlueHost(pub String, pub ApiGlueIps);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiGlueIps {
    #[serde(default)]
    pub v4: Vec<String>,
    #[serde(default)]
    pub v6: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSslBundle {
    #[serde(rename = "certificatechain")]
    pub certificate_chain: String,
    #[serde(rename = "privatekey")]
    pub private_key: String,
    #[serde(rename = "publickey")]
    pub public_key: String,
    #[serde(rename = "intermediatecertificate", default)]
    pub intermediate_certificate: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTldPricing {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub registration: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub renewal: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub transfer: Option<String>,
}

// Upstream request shapes.

#[derive(Debug, Clone, Default)]
pub struct DnsRecordDraft {
    pub name: Option<String>,
    pub record_type: String,
    pub content: String,
    pub ttl: Option<u32>,
    pub prio: Option<u16>,
    pub notes: Option<String>,
}

impl DnsRecordDraft {
    fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".into(), json!(self.name.as_deref().unwrap_or("")));
        body.insert("type".into(), json!(self.record_type));
        body.insert("content".into(), json!(self.content));
        if let Some(ttl) = self.ttl {
            body.insert("ttl".into(), json!(ttl.to_string()));
        }
        if let Some(prio) = self.prio {
            body.insert("prio".into(), json!(prio.to_string()));
        }
        if let Some(notes) = &self.notes {
            body.insert("notes".into(), json!(notes));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone)]
pub struct UrlForwardDraft {
    pub subdomain: Option<String>,
    pub location: String,
    pub forward_type: String,
    pub include_path: bool,
    pub wildcard: bool,
}

impl UrlForwardDraft {
    fn to_body(&self) -> Value {
        json!({
            "subdomain": self.subdomain.as_deref().unwrap_or(""),
            "location": self.location,
            "type": self.forward_type,
            "includePath": yes_no(self.include_path),
            "wildcard": yes_no(self.wildcard),
        })
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

// Response envelopes.

#[derive(Deserialize)]
struct PingEnvelope {
    #[serde(rename = "yourIp")]
    your_ip: String,
}

#[derive(Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    records: Vec<ApiDnsRecord>,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
    #[serde(deserialize_with = "de_string")]
    id: String,
}

#[derive(Deserialize)]
struct DnssecEnvelope {
    #[serde(default)]
    records: DnssecRecords,
}

/// The DNSSEC listing is a map keyed by key tag, except that an empty listing
/// arrives as an empty array.
#[derive(Deserialize)]
#[serde(untagged)]
enum DnssecRecords {
    Map(BTreeMap<String, ApiDnssecRecord>),
    List(Vec<ApiDnssecRecord>),
}

impl Default for DnssecRecords {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DnssecRecords {
    fn into_vec(self) -> Vec<ApiDnssecRecord> {
        match self {
            Self::Map(map) => map.into_values().collect(),
            Self::List(list) => list,
        }
    }
}

#[derive(Deserialize)]
struct DomainsEnvelope {
    #[serde(default)]
    domains: Vec<ApiDomain>,
}

#[derive(Deserialize)]
struct NameserversEnvelope {
    #[serde(default)]
    ns: Vec<String>,
}

#[derive(Deserialize)]
struct CheckEnvelope {
    response: ApiDomainCheck,
}

#[derive(Deserialize)]
struct ForwardsEnvelope {
    #[serde(default)]
    forwards: Vec<ApiUrlForward>,
}

#[derive(Deserialize)]
struct GlueEnvelope {
    #[serde(default)]
    hosts: Vec<ApiGlueHost>,
}

#[derive(Deserialize)]
struct PricingEnvelope {
    #[serde(default)]
    pricing: BTreeMap<String, ApiTldPricing>,
}

/// Reqwest-backed implementation talking to the live API.
pub struct PorkbunClient {
    http: reqwest::Client,
    credentials: Option<(String, String)>,
    base_url: String,
}

impl PorkbunClient {
    pub fn new(settings: &Settings) -> Self {
        let credentials = match (&settings.api_key, &settings.secret_key) {
            (Some(api_key), Some(secret_key)) => Some((api_key.clone(), secret_key.clone())),
            _ => None,
        };

        Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("porkbun-mcp/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            credentials,
            base_url: API_BASE.to_string(),
        }
    }

    fn auth_body(&self, extra: Value) -> ApiResult<Value> {
        let (api_key, secret_key) = self
            .credentials
            .as_ref()
            .ok_or(ApiError::MissingCredentials)?;

        let mut body = match extra {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.insert("apikey".into(), json!(api_key));
        body.insert("secretapikey".into(), json!(secret_key));
        Ok(Value::Object(body))
    }

    async fn call_raw(&self, path: &str, body: Value) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(&body).send().await?;
        let envelope: Value = response.json().await?;

        if envelope.get("status").and_then(Value::as_str) != Some("SUCCESS") {
            let message = envelope
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown API error")
                .to_string();
            return Err(ApiError::Api(message));
        }
        Ok(envelope)
    }

    async fn call<T: serde::de::DeserializeOwned>(&self, path: &str, body: Value) -> ApiResult<T> {
        let envelope = self.call_raw(path, self.auth_body(body)?).await?;
        serde_json::from_value(envelope).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn command(&self, path: &str, body: Value) -> ApiResult<()> {
        self.call_raw(path, self.auth_body(body)?).await?;
        Ok(())
    }
}

#[async_trait]
impl PorkbunApi for PorkbunClient {
    async fn ping(&self) -> ApiResult<String> {
        let envelope: PingEnvelope = self.call("/ping", json!({})).await?;
        Ok(envelope.your_ip)
    }

    async fn dns_list(&self, domain: &str) -> ApiResult<Vec<ApiDnsRecord>> {
        let envelope: RecordsEnvelope = self
            .call(&format!("/dns/retrieve/{domain}"), json!({}))
            .await?;
        Ok(envelope.records)
    }

    async fn dns_get(&self, domain: &str, record_id: &str) -> ApiResult<Option<ApiDnsRecord>> {
        let envelope: RecordsEnvelope = self
            .call(&format!("/dns/retrieve/{domain}/{record_id}"), json!({}))
            .await?;
        Ok(envelope.records.into_iter().next())
    }

    async fn dns_get_by_name_type(
        &self,
        domain: &str,
        record_type: &str,
        subdomain: Option<&str>,
    ) -> ApiResult<Vec<ApiDnsRecord>> {
        let path = match subdomain {
            Some(subdomain) if !subdomain.is_empty() => {
                format!("/dns/retrieveByNameType/{domain}/{record_type}/{subdomain}")
            }
            _ => format!("/dns/retrieveByNameType/{domain}/{record_type}"),
        };
        let envelope: RecordsEnvelope = self.call(&path, json!({})).await?;
        Ok(envelope.records)
    }

    async fn dns_create(&self, domain: &str, draft: &DnsRecordDraft) -> ApiResult<String> {
        let envelope: CreatedEnvelope = self
            .call(&format!("/dns/create/{domain}"), draft.to_body())
            .await?;
        Ok(envelope.id)
    }

    async fn dns_edit(
        &self,
        domain: &str,
        record_id: &str,
        draft: &DnsRecordDraft,
    ) -> ApiResult<()> {
        self.command(&format!("/dns/edit/{domain}/{record_id}"), draft.to_body())
            .await
    }

    async fn dns_delete(&self, domain: &str, record_id: &str) -> ApiResult<()> {
        self.command(&format!("/dns/delete/{domain}/{record_id}"), json!({}))
            .await
    }

    async fn dnssec_list(&self, domain: &str) -> ApiResult<Vec<ApiDnssecRecord>> {
        let envelope: DnssecEnvelope = self
            .call(&format!("/dns/getDnssecRecords/{domain}"), json!({}))
            .await?;
        Ok(envelope.records.into_vec())
    }

    async fn dnssec_create(&self, domain: &str, record: &ApiDnssecRecord) -> ApiResult<()> {
        let body = serde_json::to_value(record).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.command(&format!("/dns/createDnssecRecord/{domain}"), body)
            .await
    }

    async fn dnssec_delete(&self, domain: &str, key_tag: &str) -> ApiResult<()> {
        self.command(
            &format!("/dns/deleteDnssecRecord/{domain}/{key_tag}"),
            json!({}),
        )
        .await
    }

    async fn domains_list(&self) -> ApiResult<Vec<ApiDomain>> {
        let envelope: DomainsEnvelope = self.call("/domain/listAll", json!({})).await?;
        Ok(envelope.domains)
    }

    async fn get_nameservers(&self, domain: &str) -> ApiResult<Vec<String>> {
        let envelope: NameserversEnvelope = self
            .call(&format!("/domain/getNs/{domain}"), json!({}))
            .await?;
        Ok(envelope.ns)
    }

    async fn update_nameservers(&self, domain: &str, nameservers: &[String]) -> ApiResult<()> {
        self.command(
            &format!("/domain/updateNs/{domain}"),
            json!({ "ns": nameservers }),
        )
        .await
    }

    async fn check_domain(&self, domain: &str) -> ApiResult<ApiDomainCheck> {
        let envelope: CheckEnvelope = self
            .call(&format!("/domain/checkDomain/{domain}"), json!({}))
            .await?;
        Ok(envelope.response)
    }

    async fn get_url_forwards(&self, domain: &str) -> ApiResult<Vec<ApiUrlForward>> {
        let envelope: ForwardsEnvelope = self
            .call(&format!("/domain/getUrlForwarding/{domain}"), json!({}))
            .await?;
        Ok(envelope.forwards)
    }

    async fn add_url_forward(&self, domain: &str, forward: &UrlForwardDraft) -> ApiResult<()> {
        self.command(&format!("/domain/addUrlForward/{domain}"), forward.to_body())
            .await
    }

    async fn delete_url_forward(&self, domain: &str, forward_id: &str) -> ApiResult<()> {
        self.command(
            &format!("/domain/deleteUrlForward/{domain}/{forward_id}"),
            json!({}),
        )
        .await
    }

    async fn get_glue_records(&self, domain: &str) -> ApiResult<Vec<ApiGlueHost>> {
        let envelope: GlueEnvelope = self
            .call(&format!("/domain/getGlue/{domain}"), json!({}))
            .await?;
        Ok(envelope.hosts)
    }

    async fn create_glue_record(
        &self,
        domain: &str,
        subdomain: &str,
        ips: &[String],
    ) -> ApiResult<()> {
        self.command(
            &format!("/domain/createGlue/{domain}/{subdomain}"),
            json!({ "ips": ips }),
        )
        .await
    }

    async fn update_glue_record(
        &self,
        domain: &str,
        subdomain: &str,
        ips: &[String],
    ) -> ApiResult<()> {
        self.command(
            &format!("/domain/updateGlue/{domain}/{subdomain}"),
            json!({ "ips": ips }),
        )
        .await
    }

    async fn delete_glue_record(&self, domain: &str, subdomain: &str) -> ApiResult<()> {
        self.command(&format!("/domain/deleteGlue/{domain}/{subdomain}"), json!({}))
            .await
    }

    async fn ssl_retrieve(&self, domain: &str) -> ApiResult<ApiSslBundle> {
        self.call(&format!("/ssl/retrieve/{domain}"), json!({})).await
    }

    async fn get_pricing(&self) -> ApiResult<BTreeMap<String, ApiTldPricing>> {
        // No credentials required for pricing.
        let envelope = self.call_raw("/pricing/get", json!({})).await?;
        let envelope: PricingEnvelope =
            serde_json::from_value(envelope).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(envelope.pricing)
    }
}

// Tolerant deserializers for the upstream's loose JSON.

fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn de_opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string, number or null, got {other}"
        ))),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.to_lowercase().as_str(), "1" | "yes" | "true"),
        _ => false,
    }
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(truthy(&Value::deserialize(deserializer)?))
}

fn de_opt_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => Ok(Some(truthy(&value))),
    }
}
