//! AWS store backend.
//!
//! Reads secret documents from Secrets Manager and parameters from SSM
//! Parameter Store. Enable with `--features aws` (on by default).
//!
//! Credentials come from the default provider chain; on an instance that
//! is the attached role.

use aws_sdk_secretsmanager::error::DisplayErrorContext;
use tokio::runtime::Runtime;
use tracing::trace;

use super::ConfigStore;
use crate::error::{Result, StoreError};

/// Secrets Manager and SSM clients for one region.
///
/// The SDK is async; each call blocks on a private current-thread runtime.
pub struct AwsStore {
    runtime: Runtime,
    secrets: aws_sdk_secretsmanager::Client,
    parameters: aws_sdk_ssm::Client,
}

impl AwsStore {
    /// Build clients for `region`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Runtime` if the async runtime cannot start.
    pub fn connect(region: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Runtime(e.to_string()))?;

        let sdk_config = runtime.block_on(
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.to_string()))
                .load(),
        );

        trace!(region, "aws clients ready");
        Ok(Self {
            secrets: aws_sdk_secretsmanager::Client::new(&sdk_config),
            parameters: aws_sdk_ssm::Client::new(&sdk_config),
            runtime,
        })
    }
}

impl ConfigStore for AwsStore {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn get_secret(&self, id: &str) -> Result<String> {
        trace!(secret_id = %id, "GetSecretValue");

        let output = self
            .runtime
            .block_on(self.secrets.get_secret_value().secret_id(id).send())
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception());
                if not_found {
                    StoreError::NotFound(id.to_string())
                } else {
                    StoreError::Request {
                        name: id.to_string(),
                        reason: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| {
                StoreError::InvalidSecret {
                    id: id.to_string(),
                    reason: "secret has no string value".to_string(),
                }
                .into()
            })
    }

    fn get_parameter(&self, name: &str, decrypt: bool) -> Result<String> {
        trace!(parameter = %name, decrypt, "GetParameter");

        let output = self
            .runtime
            .block_on(
                self.parameters
                    .get_parameter()
                    .name(name)
                    .with_decryption(decrypt)
                    .send(),
            )
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found());
                if not_found {
                    StoreError::NotFound(name.to_string())
                } else {
                    StoreError::Request {
                        name: name.to_string(),
                        reason: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string)
            .ok_or_else(|| StoreError::NotFound(name.to_string()).into())
    }
}
