//! Parameter type.
//!
//! A configuration parameter names the environment key it fills and where
//! its value comes from.

use std::fmt;

use crate::core::types::{EnvKey, ParameterName, SecretId};

/// Where a parameter's value is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A string field of a JSON secret document.
    SecretField { secret_id: SecretId, field: String },
    /// A parameter-store value, optionally decrypted.
    Parameter { name: ParameterName, decrypt: bool },
    /// A constant written as-is.
    Literal(String),
}

impl Source {
    /// Whether the value comes from the encrypted store.
    pub fn is_secret(&self) -> bool {
        match self {
            Self::SecretField { .. } => true,
            Self::Parameter { decrypt, .. } => *decrypt,
            Self::Literal(_) => false,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretField { secret_id, field } => write!(f, "secret {}#{}", secret_id, field),
            Self::Parameter { name, .. } => write!(f, "parameter {}", name),
            Self::Literal(_) => write!(f, "literal"),
        }
    }
}

/// A configuration parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Environment key written to the env file.
    pub env: EnvKey,
    /// Value source.
    pub source: Source,
    /// Whether resolution failure aborts the bootstrap.
    pub required: bool,
    /// Fallback for optional parameters; the empty string when absent.
    pub default: Option<String>,
}

impl Parameter {
    /// Fully-qualified name used in logs and diagnostics.
    pub fn name(&self) -> String {
        match &self.source {
            Source::SecretField { secret_id, field } => format!("{}#{}", secret_id, field),
            Source::Parameter { name, .. } => name.clone(),
            Source::Literal(_) => self.env.clone(),
        }
    }

    /// Value used when an optional parameter cannot be resolved.
    pub fn fallback(&self) -> &str {
        self.default.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_param() -> Parameter {
        Parameter {
            env: "BOT_TOKEN".to_string(),
            source: Source::SecretField {
                secret_id: "discord-bot/secrets".to_string(),
                field: "bot_token".to_string(),
            },
            required: true,
            default: None,
        }
    }

    #[test]
    fn test_name_for_secret_field() {
        assert_eq!(secret_param().name(), "discord-bot/secrets#bot_token");
    }

    #[test]
    fn test_name_for_parameter() {
        let p = Parameter {
            env: "ENV".to_string(),
            source: Source::Parameter {
                name: "/discord/env".to_string(),
                decrypt: false,
            },
            required: false,
            default: Some("PROD".to_string()),
        };
        assert_eq!(p.name(), "/discord/env");
        assert_eq!(p.fallback(), "PROD");
        assert!(!p.source.is_secret());
    }

    #[test]
    fn test_fallback_defaults_to_empty() {
        let mut p = secret_param();
        p.required = false;
        assert_eq!(p.fallback(), "");
        assert!(p.source.is_secret());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            secret_param().source.to_string(),
            "secret discord-bot/secrets#bot_token"
        );
        assert_eq!(Source::Literal("x".to_string()).to_string(), "literal");
    }
}
