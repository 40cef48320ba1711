//! SSL certificate bundle retrieval.

use crate::client::{ApiSslBundle, PorkbunApi};
use crate::error::PorkbunError;
use crate::models::SslBundle;

/// Translates an upstream certificate bundle, tagging it with the domain it
/// was fetched for. An empty intermediate certificate maps to an absent one.
pub fn to_ssl_bundle(domain: &str, raw: &ApiSslBundle) -> SslBundle {
    SslBundle {
        domain: domain.to_string(),
        certificate_chain: raw.certificate_chain.clone(),
        private_key: raw.private_key.clone(),
        public_key: raw.public_key.clone(),
        intermediate_certificate: raw
            .intermediate_certificate
            .clone()
            .filter(|cert| !cert.is_empty()),
    }
}

pub async fn retrieve(api: &dyn PorkbunApi, domain: &str) -> Result<SslBundle, PorkbunError> {
    let bundle = api
        .ssl_retrieve(domain)
        .await
        .map_err(PorkbunError::upstream(format!(
            "retrieve SSL bundle for {domain}"
        )))?;
    Ok(to_ssl_bundle(domain, &bundle))
}
