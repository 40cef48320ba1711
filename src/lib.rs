pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod schemas;
pub mod tools;

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Serialize;
use serde_json::json;

use crate::client::{PorkbunApi, PorkbunClient};
use crate::config::Settings;
use crate::error::PorkbunError;
use crate::schemas::{
    AddUrlForwardParams, DeleteUrlForwardParams, DnsCreateParams, DnsDeleteParams,
    DnsEditByNameTypeParams, DnsEditParams, DnsGetParams, DnsQueryByNameTypeParams,
    DnssecCreateParams, DnssecDeleteParams, DomainParam, GlueDeleteParams, GlueWriteParams,
    UpdateNameserversParams,
};

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// MCP server fronting the Porkbun registrar API.
///
/// The server starts read-only. Every mutating tool checks the mode before
/// touching the upstream API; `--get-muddy` at startup is the only way to
/// enable writes.
#[derive(Clone)]
pub struct PorkbunServer {
    api: Arc<dyn PorkbunApi>,
    read_only: bool,
    tool_router: ToolRouter<PorkbunServer>,
}

#[tool_router]
impl PorkbunServer {
    pub fn new(settings: &Settings) -> Self {
        Self::with_api(Arc::new(PorkbunClient::new(settings)), !settings.get_muddy)
    }

    pub fn with_api(api: Arc<dyn PorkbunApi>, read_only: bool) -> Self {
        Self {
            api,
            read_only,
            tool_router: Self::tool_router(),
        }
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    fn require_writes(&self) -> Result<(), PorkbunError> {
        if self.read_only {
            Err(PorkbunError::ReadOnly)
        } else {
            Ok(())
        }
    }

    #[tool(description = "Test API connectivity and return your public IP address")]
    async fn ping(&self) -> Result<CallToolResult, McpError> {
        let result = tools::ping::ping(self.api.as_ref()).await?;
        json_result(&result)
    }

    #[tool(description = "List all DNS records for a domain")]
    async fn dns_list(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let records = tools::dns::list(self.api.as_ref(), &domain).await?;
        json_result(&records)
    }

    #[tool(description = "Get a single DNS record by its identifier")]
    async fn dns_get(
        &self,
        Parameters(DnsGetParams { domain, record_id }): Parameters<DnsGetParams>,
    ) -> Result<CallToolResult, McpError> {
        let record = tools::dns::get(self.api.as_ref(), &domain, &record_id).await?;
        json_result(&record)
    }

    #[tool(description = "Get DNS records matching a subdomain and record type")]
    async fn dns_get_by_name_type(
        &self,
        Parameters(params): Parameters<DnsQueryByNameTypeParams>,
    ) -> Result<CallToolResult, McpError> {
        let records = tools::dns::get_by_name_type(
            self.api.as_ref(),
            &params.domain,
            &params.record_type,
            params.subdomain.as_deref(),
        )
        .await?;
        json_result(&records)
    }

    #[tool(description = "Create a DNS record (requires write mode)")]
    async fn dns_create(
        &self,
        Parameters(params): Parameters<DnsCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let created = tools::dns::create(self.api.as_ref(), &params.domain, params.draft()).await?;
        json_result(&created)
    }

    #[tool(description = "Replace a DNS record by its identifier (requires write mode)")]
    async fn dns_edit(
        &self,
        Parameters(params): Parameters<DnsEditParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let edited = tools::dns::edit(
            self.api.as_ref(),
            &params.domain,
            &params.record_id,
            params.draft(),
        )
        .await?;
        json_result(&edited)
    }

    #[tool(
        description = "Edit the single DNS record matching a subdomain and type (requires write mode)"
    )]
    async fn dns_edit_by_name_type(
        &self,
        Parameters(params): Parameters<DnsEditByNameTypeParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let edited = tools::dns::edit_by_name_type(
            self.api.as_ref(),
            &params.domain,
            &params.record_type,
            params.subdomain.as_deref(),
            &params.content,
            params.ttl,
            params.prio,
            params.notes,
        )
        .await?;
        json_result(&edited)
    }

    #[tool(description = "Delete a DNS record by its identifier (requires write mode)")]
    async fn dns_delete(
        &self,
        Parameters(DnsDeleteParams { domain, record_id }): Parameters<DnsDeleteParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let deleted = tools::dns::delete(self.api.as_ref(), &domain, &record_id).await?;
        json_result(&deleted)
    }

    #[tool(
        description = "Delete the single DNS record matching a subdomain and type (requires write mode)"
    )]
    async fn dns_delete_by_name_type(
        &self,
        Parameters(params): Parameters<DnsQueryByNameTypeParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let deleted = tools::dns::delete_by_name_type(
            self.api.as_ref(),
            &params.domain,
            &params.record_type,
            params.subdomain.as_deref(),
        )
        .await?;
        json_result(&deleted)
    }

    #[tool(description = "List DNSSEC DS records registered for a domain")]
    async fn dnssec_list(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let records = tools::dnssec::list(self.api.as_ref(), &domain).await?;
        json_result(&records)
    }

    #[tool(description = "Register a DNSSEC DS record at the registry (requires write mode)")]
    async fn dnssec_create(
        &self,
        Parameters(params): Parameters<DnssecCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let record = models::DnssecRecord {
            key_tag: params.key_tag,
            algorithm: params.algorithm,
            digest_type: params.digest_type,
            digest: params.digest,
        };
        let created = tools::dnssec::create(self.api.as_ref(), &params.domain, record).await?;
        json_result(&created)
    }

    #[tool(description = "Remove a DNSSEC DS record by key tag (requires write mode)")]
    async fn dnssec_delete(
        &self,
        Parameters(DnssecDeleteParams { domain, key_tag }): Parameters<DnssecDeleteParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let deleted = tools::dnssec::delete(self.api.as_ref(), &domain, &key_tag).await?;
        json_result(&deleted)
    }

    #[tool(description = "List all domains in the account")]
    async fn domains_list(&self) -> Result<CallToolResult, McpError> {
        let domains = tools::domains::list(self.api.as_ref()).await?;
        json_result(&domains)
    }

    #[tool(description = "Get the authoritative nameservers for a domain")]
    async fn domains_get_nameservers(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let nameservers = tools::domains::get_nameservers(self.api.as_ref(), &domain).await?;
        json_result(&nameservers)
    }

    #[tool(description = "Replace the authoritative nameservers for a domain (requires write mode)")]
    async fn domains_update_nameservers(
        &self,
        Parameters(UpdateNameserversParams {
            domain,
            nameservers,
        }): Parameters<UpdateNameserversParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let updated =
            tools::domains::update_nameservers(self.api.as_ref(), &domain, nameservers).await?;
        json_result(&updated)
    }

    #[tool(description = "Check whether a domain is available for registration")]
    async fn domains_check_availability(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let availability =
            tools::domains::check_availability(self.api.as_ref(), &domain).await?;
        json_result(&availability)
    }

    #[tool(description = "List URL forwards configured for a domain")]
    async fn domains_get_url_forwards(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let forwards = tools::domains::get_url_forwards(self.api.as_ref(), &domain).await?;
        json_result(&forwards)
    }

    #[tool(description = "Add a URL forward to a domain (requires write mode)")]
    async fn domains_add_url_forward(
        &self,
        Parameters(params): Parameters<AddUrlForwardParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let created =
            tools::domains::add_url_forward(self.api.as_ref(), &params.domain, params.draft())
                .await?;
        json_result(&created)
    }

    #[tool(description = "Delete a URL forward by its identifier (requires write mode)")]
    async fn domains_delete_url_forward(
        &self,
        Parameters(DeleteUrlForwardParams { domain, forward_id }): Parameters<
            DeleteUrlForwardParams,
        >,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let deleted =
            tools::domains::delete_url_forward(self.api.as_ref(), &domain, &forward_id).await?;
        json_result(&deleted)
    }

    #[tool(description = "List glue records (host records) for a domain")]
    async fn domains_get_glue_records(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let records = tools::domains::get_glue_records(self.api.as_ref(), &domain).await?;
        json_result(&records)
    }

    #[tool(description = "Create a glue record for a host (requires write mode)")]
    async fn domains_create_glue_record(
        &self,
        Parameters(GlueWriteParams {
            domain,
            subdomain,
            ips,
        }): Parameters<GlueWriteParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let created =
            tools::domains::create_glue_record(self.api.as_ref(), &domain, &subdomain, ips).await?;
        json_result(&created)
    }

    #[tool(description = "Replace the IPs of a glue record (requires write mode)")]
    async fn domains_update_glue_record(
        &self,
        Parameters(GlueWriteParams {
            domain,
            subdomain,
            ips,
        }): Parameters<GlueWriteParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let updated =
            tools::domains::update_glue_record(self.api.as_ref(), &domain, &subdomain, ips).await?;
        json_result(&updated)
    }

    #[tool(description = "Delete a glue record (requires write mode)")]
    async fn domains_delete_glue_record(
        &self,
        Parameters(GlueDeleteParams { domain, subdomain }): Parameters<GlueDeleteParams>,
    ) -> Result<CallToolResult, McpError> {
        self.require_writes()?;
        let deleted =
            tools::domains::delete_glue_record(self.api.as_ref(), &domain, &subdomain).await?;
        json_result(&deleted)
    }

    #[tool(description = "Retrieve the SSL certificate bundle Porkbun issued for a domain")]
    async fn ssl_retrieve(
        &self,
        Parameters(DomainParam { domain }): Parameters<DomainParam>,
    ) -> Result<CallToolResult, McpError> {
        let bundle = tools::ssl::retrieve(self.api.as_ref(), &domain).await?;
        json_result(&bundle)
    }

    #[tool(description = "Get registration, renewal, and transfer pricing for all TLDs")]
    async fn pricing_get(&self) -> Result<CallToolResult, McpError> {
        let pricing = tools::pricing::get(self.api.as_ref()).await?;
        json_result(&pricing)
    }
}

impl PorkbunServer {
    /// Resolves a `porkbun://` URI to its JSON payload. `Ok(None)` means the
    /// URI does not name a known resource.
    async fn resource_text(&self, uri: &str) -> Result<Option<String>, McpError> {
        let text = match uri {
            "porkbun://domains" => {
                let domains = tools::domains::list(self.api.as_ref()).await?;
                serde_json::to_string_pretty(&domains)
            }
            "porkbun://pricing" => {
                let pricing = tools::pricing::get(self.api.as_ref()).await?;
                serde_json::to_string_pretty(&pricing)
            }
            other => {
                if let Some(domain) = other.strip_prefix("porkbun://dns/") {
                    let records = tools::dns::list(self.api.as_ref(), domain).await?;
                    serde_json::to_string_pretty(&records)
                } else if let Some(domain) = other.strip_prefix("porkbun://ssl/") {
                    let bundle = tools::ssl::retrieve(self.api.as_ref(), domain).await?;
                    serde_json::to_string_pretty(&bundle)
                } else {
                    return Ok(None);
                }
            }
        };

        text.map(Some)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}

#[tool_handler]
impl ServerHandler for PorkbunServer {
    fn get_info(&self) -> ServerInfo {
        let mode = if self.read_only {
            "The server is in read-only mode: write tools are disabled. \
             Restart with --get-muddy to enable them."
        } else {
            "Write operations are ENABLED (--get-muddy)."
        };

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "porkbun-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(format!(
                "Porkbun MCP Server - Manage DNS records, DNSSEC, nameservers, URL forwards, \
                 glue records, SSL bundles, and domain availability through the Porkbun API. \
                 {mode} \
                 Resources: porkbun://domains, porkbun://pricing, porkbun://dns/{{domain}}, \
                 porkbun://ssl/{{domain}}"
            )),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut domains = RawResource::new("porkbun://domains", "domains");
        domains.description = Some("All domains in the account".to_string());
        domains.mime_type = Some("application/json".to_string());

        let mut pricing = RawResource::new("porkbun://pricing", "pricing");
        pricing.description = Some("Registration, renewal, and transfer pricing per TLD".to_string());
        pricing.mime_type = Some("application/json".to_string());

        Ok(ListResourcesResult {
            resources: vec![domains.no_annotation(), pricing.no_annotation()],
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: vec![
                RawResourceTemplate {
                    uri_template: "porkbun://dns/{domain}".to_string(),
                    name: "dns-records".to_string(),
                    description: Some("DNS records for a domain".to_string()),
                    mime_type: Some("application/json".to_string()),
                }
                .no_annotation(),
                RawResourceTemplate {
                    uri_template: "porkbun://ssl/{domain}".to_string(),
                    name: "ssl-bundle".to_string(),
                    description: Some("SSL certificate bundle for a domain".to_string()),
                    mime_type: Some("application/json".to_string()),
                }
                .no_annotation(),
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match self.resource_text(&uri).await? {
            Some(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri)],
            }),
            None => Err(McpError::resource_not_found(
                "unknown resource URI",
                Some(json!({ "uri": uri })),
            )),
        }
    }
}

#[cfg(test)]
#[path = "test_mocks.rs"]
pub(crate) mod test_mocks;
