//! Server metadata from the environment.
//!
//! Tools that cannot ask a live driver for its metadata describe the target
//! server with environment variables:
//! - `QUARRY_DB_PRODUCT`: product name as the driver reports it
//! - `QUARRY_DB_VERSION`: product version (optional)
//! - `QUARRY_DB_URL`: connection URL (optional)
//!
//! Either the product or the URL is required.

use std::env;

use crate::sql::dialect::{jdbc_protocol, VendorProbe};

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub const PRODUCT_VAR: &str = "QUARRY_DB_PRODUCT";
pub const VERSION_VAR: &str = "QUARRY_DB_VERSION";
pub const URL_VAR: &str = "QUARRY_DB_URL";

/// Load a [`VendorProbe`] from `QUARRY_DB_*` variables.
pub fn probe_from_env() -> Result<VendorProbe, ConnectionError> {
    probe_from_vars(|name| env::var(name).ok())
}

/// Same as [`probe_from_env`], reading variables through `lookup`.
pub fn probe_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<VendorProbe, ConnectionError> {
    let product = lookup(PRODUCT_VAR).filter(|p| !p.trim().is_empty());
    let url = lookup(URL_VAR).filter(|u| !u.trim().is_empty());

    if product.is_none() && url.is_none() {
        return Err(ConnectionError::MissingEnvVar(PRODUCT_VAR.to_string()));
    }
    if let Some(url) = &url {
        if jdbc_protocol(url).is_none() {
            return Err(ConnectionError::InvalidConfig(format!(
                "{} has no protocol prefix: {}",
                URL_VAR, url
            )));
        }
    }

    let mut probe = VendorProbe::new(product.unwrap_or_default());
    if let Some(version) = lookup(VERSION_VAR) {
        probe = probe.with_version(version);
    }
    if let Some(url) = url {
        probe = probe.with_url(url);
    }
    Ok(probe)
}
