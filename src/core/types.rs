//! Type aliases for domain concepts.

/// An environment variable name (e.g., BOT_TOKEN).
///
/// Must be a valid environment variable name.
pub type EnvKey = String;

/// Identifier of a secret document in the store (name or ARN).
pub type SecretId = String;

/// Fully-qualified parameter name (e.g., `/discord/env`).
pub type ParameterName = String;

/// AWS region name (e.g., `eu-west-1`).
pub type RegionName = String;
