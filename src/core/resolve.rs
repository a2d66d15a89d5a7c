//! Configuration resolution.
//!
//! Reads every declared parameter from the store, applies the retry policy
//! and the required/optional rules, and builds the [`Env`] that is written to
//! the env file.
//!
//! Rules:
//! - A required parameter that fails every attempt aborts resolution.
//! - A required parameter that is empty, or whose secret lacks the field,
//!   aborts immediately. Reading it again would not change the answer.
//! - An optional parameter falls back to its default (or `""`) on any
//!   failure and never aborts.
//! - A secret document is fetched at most once, however many fields are read
//!   from it.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::core::config::{Config, RetryConfig};
use crate::core::constants;
use crate::core::domain::{Env, Parameter, Source};
use crate::core::retry::{retry, RetryPolicy, Sleeper};
use crate::core::store::ConfigStore;
use crate::core::types::EnvKey;
use crate::error::{Error, ResolveError, Result, StoreError};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from the store.
    Store,
    /// Written as configured.
    Literal,
    /// Optional parameter that could not be resolved.
    Fallback,
    /// The discovered region.
    Region,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Store => "store",
            Self::Literal => "literal",
            Self::Fallback => "default",
            Self::Region => "region",
        };
        write!(f, "{}", name)
    }
}

/// How one key was resolved. Carries no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub env: EnvKey,
    /// Parameter name, or the env key for literals.
    pub name: String,
    pub origin: Origin,
    /// Store requests made for this key; 0 when served from cache.
    pub attempts: u32,
}

/// Result of resolving the whole configuration.
#[derive(Debug)]
pub struct Resolved {
    pub env: Env,
    pub report: Vec<Resolution>,
}

enum Failure {
    Exhausted { attempts: u32, reason: String },
    MissingField { secret_id: String, field: String },
}

/// Resolves parameters against one store.
pub struct Resolver<'a> {
    store: &'a dyn ConfigStore,
    sleeper: &'a dyn Sleeper,
    policy: RetryPolicy,
    retry_optional: bool,
    documents: HashMap<String, Map<String, Value>>,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn ConfigStore, sleeper: &'a dyn Sleeper, retry: &RetryConfig) -> Self {
        Self {
            store,
            sleeper,
            policy: retry.policy(),
            retry_optional: retry.retry_optional,
            documents: HashMap::new(),
        }
    }

    /// Resolve one parameter to its value and report line.
    ///
    /// # Errors
    ///
    /// Returns a `ResolveError` for a required parameter that cannot be
    /// resolved. Optional parameters never fail.
    pub fn resolve(&mut self, param: &Parameter) -> Result<(String, Resolution)> {
        let name = param.name();
        let report = |origin, attempts| Resolution {
            env: param.env.clone(),
            name: name.clone(),
            origin,
            attempts,
        };

        let policy = if param.required || self.retry_optional {
            self.policy
        } else {
            RetryPolicy::once()
        };

        let outcome = match &param.source {
            Source::Literal(value) if value.is_empty() => {
                if param.required {
                    return Err(ResolveError::EmptyValue { name }.into());
                }
                debug!(env = %param.env, "empty literal, using default");
                return Ok((param.fallback().to_string(), report(Origin::Fallback, 0)));
            }
            Source::Literal(value) => {
                debug!(env = %param.env, "literal value");
                return Ok((value.clone(), report(Origin::Literal, 0)));
            }
            Source::SecretField { secret_id, field } => {
                self.secret_field(secret_id, field, &policy)
            }
            Source::Parameter {
                name: parameter,
                decrypt,
            } => retry(&policy, self.sleeper, &name, || {
                self.store.get_parameter(parameter, *decrypt)
            })
            .map_err(|e| Failure::Exhausted {
                attempts: e.attempts,
                reason: e.last.to_string(),
            }),
        };

        match outcome {
            Ok((value, attempts)) if !value.is_empty() => {
                info!(env = %param.env, source = %param.source, attempts, "resolved");
                Ok((value, report(Origin::Store, attempts)))
            }
            Ok((_, attempts)) => {
                if param.required {
                    return Err(ResolveError::EmptyValue { name }.into());
                }
                debug!(env = %param.env, "empty value, using default");
                Ok((param.fallback().to_string(), report(Origin::Fallback, attempts)))
            }
            Err(Failure::Exhausted { attempts, reason }) => {
                if param.required {
                    return Err(ResolveError::RequiredUnavailable {
                        name,
                        attempts,
                        reason,
                    }
                    .into());
                }
                warn!(
                    env = %param.env,
                    name = %name,
                    attempts,
                    error = %reason,
                    "optional parameter unavailable, using default"
                );
                Ok((param.fallback().to_string(), report(Origin::Fallback, attempts)))
            }
            Err(Failure::MissingField { secret_id, field }) => {
                if param.required {
                    return Err(ResolveError::MissingField { secret_id, field }.into());
                }
                warn!(
                    env = %param.env,
                    name = %name,
                    "optional field missing from secret, using default"
                );
                Ok((param.fallback().to_string(), report(Origin::Fallback, 0)))
            }
        }
    }

    fn secret_field(
        &mut self,
        secret_id: &str,
        field: &str,
        policy: &RetryPolicy,
    ) -> std::result::Result<(String, u32), Failure> {
        let mut attempts = 0;
        if !self.documents.contains_key(secret_id) {
            let store = self.store;
            let (document, used) = retry(policy, self.sleeper, secret_id, || {
                let raw = store.get_secret(secret_id)?;
                parse_document(secret_id, &raw)
            })
            .map_err(|e| Failure::Exhausted {
                attempts: e.attempts,
                reason: e.last.to_string(),
            })?;
            self.documents.insert(secret_id.to_string(), document);
            attempts = used;
        } else {
            debug!(secret_id, "secret document cached");
        }

        self.documents
            .get(secret_id)
            .and_then(|document| field_value(document, field))
            .map(|value| (value, attempts))
            .ok_or_else(|| Failure::MissingField {
                secret_id: secret_id.to_string(),
                field: field.to_string(),
            })
    }
}

fn parse_document(secret_id: &str, raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(invalid_secret(secret_id, "expected a JSON object")),
        Err(e) => Err(invalid_secret(secret_id, &format!("not valid JSON: {}", e))),
    }
}

fn invalid_secret(secret_id: &str, reason: &str) -> Error {
    StoreError::InvalidSecret {
        id: secret_id.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// String form of a document field. `null` counts as absent.
fn field_value(document: &Map<String, Value>, field: &str) -> Option<String> {
    match document.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolve every parameter of `config` in declaration order.
///
/// # Errors
///
/// Returns the first fatal `ResolveError`, or a `ValidationError` for a
/// value that cannot be written to the env file. Nothing is written here.
pub fn resolve_environment(
    config: &Config,
    store: &dyn ConfigStore,
    sleeper: &dyn Sleeper,
    region: &str,
) -> Result<Resolved> {
    let parameters = config.parameters()?;
    info!(
        parameters = parameters.len(),
        store = store.name(),
        region,
        "resolving configuration"
    );

    let mut resolver = Resolver::new(store, sleeper, &config.retry);
    let mut env = Env::new();
    let mut report = Vec::with_capacity(parameters.len() + 1);

    for param in &parameters {
        let (value, resolution) = resolver.resolve(param)?;
        env.push(&param.env, value)?;
        report.push(resolution);
    }

    if config.store.export_region && !env.contains(constants::REGION_ENV_KEY) {
        env.push(constants::REGION_ENV_KEY, region)?;
        report.push(Resolution {
            env: constants::REGION_ENV_KEY.to_string(),
            name: constants::REGION_ENV_KEY.to_string(),
            origin: Origin::Region,
            attempts: 0,
        });
    }

    Ok(Resolved { env, report })
}
