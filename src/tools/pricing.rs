//! Registry pricing. The upstream endpoint is public and needs no
//! credentials.

use crate::client::{ApiTldPricing, PorkbunApi};
use crate::error::PorkbunError;
use crate::models::TldPricing;

pub fn to_tld_pricing(tld: &str, raw: &ApiTldPricing) -> TldPricing {
    TldPricing {
        tld: tld.to_string(),
        registration: raw.registration.clone(),
        renewal: raw.renewal.clone(),
        transfer: raw.transfer.clone(),
    }
}

pub async fn get(api: &dyn PorkbunApi) -> Result<Vec<TldPricing>, PorkbunError> {
    let pricing = api
        .get_pricing()
        .await
        .map_err(PorkbunError::upstream("get TLD pricing"))?;

    Ok(pricing
        .iter()
        .map(|(tld, raw)| to_tld_pricing(tld, raw))
        .collect())
}
