pub mod dns;
pub mod dnssec;
pub mod domains;
pub mod ping;
pub mod pricing;
pub mod ssl;
