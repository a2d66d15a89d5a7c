//! Region discovery.
//!
//! The store region is taken from, in order: the `[store] region` setting,
//! the `AWS_REGION` environment variable, instance metadata (IMDSv2), and
//! finally a fixed fallback. Discovery never fails.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::config::{MetadataConfig, StoreConfig};
use crate::core::constants;
use crate::core::types::RegionName;
use crate::error::MetadataError;

/// Where the region came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    Configured,
    Environment,
    Metadata,
    Fallback,
}

impl fmt::Display for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configured => "config",
            Self::Environment => "environment",
            Self::Metadata => "instance metadata",
            Self::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

/// A discovered region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: RegionName,
    pub source: RegionSource,
}

/// Minimal IMDSv2 client.
pub struct MetadataClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl MetadataClient {
    /// Create a client with a per-request timeout. Proxies are bypassed: the
    /// endpoint is link-local.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MetadataError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Obtain a session token.
    pub fn token(&self) -> Result<String, MetadataError> {
        let token = self
            .http
            .put(format!("{}/latest/api/token", self.endpoint))
            .header(
                constants::METADATA_TOKEN_TTL_HEADER,
                constants::METADATA_TOKEN_TTL,
            )
            .send()?
            .error_for_status()?
            .text()?;
        Ok(token.trim().to_string())
    }

    /// Region of the running instance.
    pub fn region(&self) -> Result<RegionName, MetadataError> {
        let token = self.token()?;
        let region = self
            .http
            .get(format!("{}/latest/meta-data/placement/region", self.endpoint))
            .header(constants::METADATA_TOKEN_HEADER, token)
            .send()?
            .error_for_status()?
            .text()?;

        let region = region.trim();
        if region.is_empty() {
            return Err(MetadataError::EmptyRegion);
        }
        Ok(region.to_string())
    }
}

/// Discover the store region.
///
/// `env_region` is the value of `AWS_REGION`, passed in so callers and tests
/// control it.
pub fn discover(
    store: &StoreConfig,
    metadata: &MetadataConfig,
    env_region: Option<&str>,
) -> Region {
    if let Some(name) = non_empty(store.region.as_deref()) {
        debug!(region = name, "using configured region");
        return Region {
            name: name.to_string(),
            source: RegionSource::Configured,
        };
    }

    if let Some(name) = non_empty(env_region) {
        debug!(region = name, "using region from environment");
        return Region {
            name: name.to_string(),
            source: RegionSource::Environment,
        };
    }

    let looked_up = MetadataClient::new(&metadata.endpoint, metadata.timeout())
        .and_then(|client| client.region());
    match looked_up {
        Ok(name) => {
            info!(region = %name, "region discovered from instance metadata");
            Region {
                name,
                source: RegionSource::Metadata,
            }
        }
        Err(e) => {
            warn!(
                error = %e,
                fallback = %metadata.fallback_region,
                "instance metadata unavailable, using fallback region"
            );
            Region {
                name: metadata.fallback_region.clone(),
                source: RegionSource::Fallback,
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
