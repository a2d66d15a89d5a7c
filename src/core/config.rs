//! Configuration file management.
//!
//! Handles reading, validating and templating `firstboot.toml`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::domain::{Parameter, Source};
use crate::core::retry::RetryPolicy;
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// Provisioner configuration stored in `firstboot.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application identity and install location
    pub app: AppConfig,
    /// Runtime and dependency installation
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Application source repository
    pub source: SourceConfig,
    /// Configuration store backend
    #[serde(default)]
    pub store: StoreConfig,
    /// Instance metadata access for region discovery
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Retry policy for store reads
    #[serde(default)]
    pub retry: RetryConfig,
    /// systemd unit settings
    pub service: ServiceConfig,
    /// Parameters resolved into the env file, in order
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

/// `[app]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name; also the systemd unit name
    pub name: String,
    /// Directory the source is checked out into
    pub install_dir: PathBuf,
    /// Env file path; defaults to `<install_dir>/.env`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<PathBuf>,
    /// Directory for the run journal
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

/// `[runtime]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// "auto", "dnf", "yum", "apt" or "none"
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    /// Upgrade installed packages before installing new ones
    #[serde(default = "default_true")]
    pub update: bool,
    /// System packages providing the runtime
    #[serde(default)]
    pub packages: Vec<String>,
    /// Dependency installer command (e.g. `["pip3", "install"]`)
    #[serde(default)]
    pub installer: Vec<String>,
    /// Dependencies passed to the installer
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Git URL of the application
    pub repository: String,
    /// Branch to check out; the remote default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Requirements file, relative to the install dir, fed to the installer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

/// Supported store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// AWS Secrets Manager and SSM Parameter Store
    #[default]
    Aws,
    /// A local TOML document
    File,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Store document for the `file` backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Region override; skips metadata discovery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Append `AWS_REGION=<region>` to the env file
    #[serde(default = "default_true")]
    pub export_region: bool,
}

/// `[metadata]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_fallback_region")]
    pub fallback_region: String,
}

/// `[retry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff")]
    pub backoff_secs: u64,
    /// Apply the same retries to optional parameters
    #[serde(default = "default_true")]
    pub retry_optional: bool,
}

/// `[service]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unprivileged user the service runs as
    pub user: String,
    /// Group for ownership; defaults to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Start command
    pub exec_start: String,
    #[serde(default = "default_restart")]
    pub restart: String,
    #[serde(default = "default_after")]
    pub after: String,
    #[serde(default = "default_wanted_by")]
    pub wanted_by: String,
    /// Extra `Environment=` entries
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Add an `EnvironmentFile=` line for the env file
    #[serde(default = "default_true")]
    pub load_env_file: bool,
    #[serde(default = "default_unit_dir")]
    pub unit_dir: PathBuf,
    /// Seconds between start and status check
    #[serde(default = "default_settle")]
    pub settle_secs: u64,
}

/// One `[[parameters]]` entry as written in the file.
///
/// Exactly one of `secret`, `parameter` or `value` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Environment key to populate
    pub env: String,
    /// Secret document id; requires `field`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Field of the secret document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Parameter-store name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Decrypt SecureString parameters
    #[serde(default = "default_true")]
    pub decrypt: bool,
    /// Literal value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Fallback for optional parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn default_true() -> bool {
    true
}
fn default_state_dir() -> PathBuf {
    PathBuf::from(constants::STATE_DIR)
}
fn default_package_manager() -> String {
    "auto".to_string()
}
fn default_metadata_endpoint() -> String {
    constants::METADATA_ENDPOINT.to_string()
}
fn default_metadata_timeout() -> u64 {
    constants::METADATA_TIMEOUT_SECS
}
fn default_fallback_region() -> String {
    constants::FALLBACK_REGION.to_string()
}
fn default_max_attempts() -> u32 {
    constants::MAX_ATTEMPTS
}
fn default_backoff() -> u64 {
    constants::BACKOFF_SECS
}
fn default_restart() -> String {
    "always".to_string()
}
fn default_after() -> String {
    "network.target".to_string()
}
fn default_wanted_by() -> String {
    "multi-user.target".to_string()
}
fn default_unit_dir() -> PathBuf {
    PathBuf::from(constants::UNIT_DIR)
}
fn default_settle() -> u64 {
    constants::SETTLE_SECS
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            update: true,
            packages: Vec::new(),
            installer: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            region: None,
            export_region: true,
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            endpoint: default_metadata_endpoint(),
            timeout_secs: default_metadata_timeout(),
            fallback_region: default_fallback_region(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff(),
            retry_optional: true,
        }
    }
}

impl RetryConfig {
    /// Policy applied to required reads.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.backoff_secs))
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServiceConfig {
    /// Group used for ownership of the install dir.
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.user)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl TryFrom<&ParameterConfig> for Parameter {
    type Error = ConfigError;

    fn try_from(raw: &ParameterConfig) -> std::result::Result<Self, Self::Error> {
        let invalid = |reason: &str| ConfigError::InvalidParameter {
            env: raw.env.clone(),
            reason: reason.to_string(),
        };

        let source = match (&raw.secret, &raw.parameter, &raw.value) {
            (Some(secret_id), None, None) => {
                let field = raw
                    .field
                    .clone()
                    .ok_or_else(|| invalid("`secret` requires `field`"))?;
                Source::SecretField {
                    secret_id: secret_id.clone(),
                    field,
                }
            }
            (None, Some(name), None) => Source::Parameter {
                name: name.clone(),
                decrypt: raw.decrypt,
            },
            (None, None, Some(value)) => Source::Literal(value.clone()),
            (None, None, None) => {
                return Err(invalid("one of `secret`, `parameter` or `value` is required"))
            }
            _ => {
                return Err(invalid(
                    "only one of `secret`, `parameter` or `value` may be set",
                ))
            }
        };

        if raw.field.is_some() && !matches!(source, Source::SecretField { .. }) {
            return Err(invalid("`field` is only valid with `secret`"));
        }
        if raw.required && matches!(&source, Source::Literal(value) if value.is_empty()) {
            return Err(invalid("required `value` cannot be empty"));
        }
        if raw.required && raw.default.is_some() {
            return Err(invalid("required parameters cannot have a `default`"));
        }

        Ok(Parameter {
            env: raw.env.clone(),
            source,
            required: raw.required,
            default: raw.default.clone(),
        })
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or a validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;

        debug!(
            app = %config.app.name,
            parameters = config.parameters.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Commented starter configuration written by `firstboot init`.
    pub fn template() -> &'static str {
        TEMPLATE
    }

    /// Path of the env file handed to the application.
    pub fn env_file(&self) -> PathBuf {
        self.app
            .env_file
            .clone()
            .unwrap_or_else(|| self.app.install_dir.join(constants::ENV_FILE))
    }

    /// Path of the systemd unit file.
    pub fn unit_path(&self) -> PathBuf {
        self.service
            .unit_dir
            .join(format!("{}.service", self.app.name))
    }

    /// Path of the run journal.
    pub fn journal_path(&self) -> PathBuf {
        self.app.state_dir.join(constants::JOURNAL_FILE)
    }

    /// Domain parameters in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` for a malformed entry.
    pub fn parameters(&self) -> Result<Vec<Parameter>> {
        self.parameters
            .iter()
            .map(|raw| Parameter::try_from(raw).map_err(Into::into))
            .collect()
    }

    /// Validate the configuration structure and contents.
    ///
    /// Checks:
    /// - Names, paths and commands are present
    /// - The service user is not root
    /// - Every parameter has exactly one source and a valid, unique key
    /// - Retry and metadata settings are usable
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.app.name.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "app.name" }.into());
        }
        if self
            .app
            .name
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@')))
        {
            return Err(ConfigError::InvalidValue {
                field: "app.name",
                reason: format!("'{}' is not a valid unit name", self.app.name),
            }
            .into());
        }
        if !self.app.install_dir.is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: "app.install_dir",
                reason: "must be an absolute path".to_string(),
            }
            .into());
        }
        if self.source.repository.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source.repository",
            }
            .into());
        }
        if !matches!(
            self.runtime.package_manager.as_str(),
            "auto" | "dnf" | "yum" | "apt" | "apt-get" | "none"
        ) {
            return Err(ConfigError::InvalidValue {
                field: "runtime.package_manager",
                reason: format!("unknown package manager '{}'", self.runtime.package_manager),
            }
            .into());
        }
        if !self.runtime.dependencies.is_empty() && self.runtime.installer.is_empty() {
            return Err(ConfigError::MissingField {
                field: "runtime.installer",
            }
            .into());
        }
        if self.source.requirements.is_some() && self.runtime.installer.is_empty() {
            return Err(ConfigError::MissingField {
                field: "runtime.installer",
            }
            .into());
        }
        if self.store.backend == StoreBackend::File && self.store.path.is_none() {
            return Err(ConfigError::MissingField { field: "store.path" }.into());
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.metadata.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metadata.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.service.user.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "service.user",
            }
            .into());
        }
        if self.service.user == "root" {
            return Err(ConfigError::InvalidValue {
                field: "service.user",
                reason: "the service must run as an unprivileged user".to_string(),
            }
            .into());
        }
        if self.service.exec_start.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "service.exec_start",
            }
            .into());
        }
        for key in self.service.environment.keys() {
            validation::validate_key(key)?;
        }

        let mut seen = HashSet::new();
        for raw in &self.parameters {
            validation::validate_key(&raw.env)?;
            let param = Parameter::try_from(raw)?;
            if let Source::Literal(value) = &param.source {
                validation::validate_value(&param.env, value)?;
            }
            if let Some(default) = &param.default {
                validation::validate_value(&param.env, default)?;
            }
            if !seen.insert(raw.env.as_str()) {
                return Err(ConfigError::DuplicateKey(raw.env.clone()).into());
            }
        }
        if self.store.export_region && seen.contains(constants::REGION_ENV_KEY) {
            return Err(ConfigError::DuplicateKey(constants::REGION_ENV_KEY.to_string()).into());
        }

        Ok(())
    }
}

const TEMPLATE: &str = r#"# firstboot configuration.
#
# Run at first boot with:
#   firstboot run --config /etc/firstboot.toml

[app]
name = "discord-bot"
install_dir = "/opt/discord-bot"
# env_file = "/opt/discord-bot/.env"
# state_dir = "/var/lib/firstboot"

[runtime]
# auto | dnf | yum | apt | none
package_manager = "auto"
update = true
packages = ["python3-pip", "git"]
installer = ["pip3", "install"]
dependencies = ["pipenv"]

[source]
repository = "https://github.com/codespent/discord-web-clipper.git"
# branch = "main"
requirements = "requirements.txt"

[store]
# aws | file
backend = "aws"
# region = "us-east-1"
export_region = true

[metadata]
endpoint = "http://169.254.169.254"
timeout_secs = 2
fallback_region = "us-east-1"

[retry]
max_attempts = 3
backoff_secs = 5
retry_optional = true

[service]
description = "Discord Bot Service"
user = "ec2-user"
exec_start = "/usr/bin/python3 /opt/discord-bot/main.py"
restart = "always"
settle_secs = 5

[service.environment]
PYTHONUNBUFFERED = "1"

[[parameters]]
env = "BOT_TOKEN"
secret = "discord-bot/secrets"
field = "bot_token"
required = true

[[parameters]]
env = "TOPGG_TOKEN"
secret = "discord-bot/secrets"
field = "topgg_token"
required = true

[[parameters]]
env = "SENTRY_DSN"
secret = "discord-bot/secrets"
field = "sentry_dsn"

[[parameters]]
env = "YOUTUBE_API_KEY"
secret = "discord-bot/secrets"
field = "youtube_api_key"

[[parameters]]
env = "PROXYSCRAPE_API_KEY"
secret = "discord-bot/secrets"
field = "proxyscrape_api_key"

[[parameters]]
env = "GUILD_IDS"
parameter = "/discord/dev_guild_ids"
decrypt = false

[[parameters]]
env = "ENV"
parameter = "/discord/env"
decrypt = false
default = "PROD"

[[parameters]]
env = "TOPGG_BOT_ID"
value = "1334225517603192902"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[app]
name = "bot"
install_dir = "/opt/bot"

[source]
repository = "https://example.com/bot.git"

[service]
user = "bot"
exec_start = "/usr/bin/python3 main.py"
"#;

    fn with_params(params: &str) -> String {
        format!("{}\n{}", MINIMAL, params)
    }

    #[test]
    fn test_template_is_valid() {
        let config = Config::parse(Config::template()).unwrap();
        assert_eq!(config.app.name, "discord-bot");
        let params = config.parameters().unwrap();
        assert_eq!(params.len(), 8);
        assert_eq!(params[7].env, "TOPGG_BOT_ID");
        assert_eq!(
            params[7].source,
            Source::Literal("1334225517603192902".to_string())
        );
        assert_eq!(config.service.environment["PYTHONUNBUFFERED"], "1");
    }

    #[test]
    fn test_minimal_defaults() {
        let config = Config::parse(MINIMAL).unwrap();

        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_secs, 5);
        assert!(config.retry.retry_optional);
        assert_eq!(config.service.settle_secs, 5);
        assert_eq!(config.service.restart, "always");
        assert_eq!(config.service.wanted_by, "multi-user.target");
        assert_eq!(config.metadata.timeout_secs, 2);
        assert_eq!(config.metadata.fallback_region, "us-east-1");
        assert_eq!(config.store.backend, StoreBackend::Aws);
        assert_eq!(config.runtime.package_manager, "auto");
        assert_eq!(config.env_file(), PathBuf::from("/opt/bot/.env"));
        assert_eq!(
            config.unit_path(),
            PathBuf::from("/etc/systemd/system/bot.service")
        );
        assert_eq!(
            config.journal_path(),
            PathBuf::from("/var/lib/firstboot/journal.json")
        );
        assert_eq!(config.service.group(), "bot");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MINIMAL).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.app.name, "bot");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/firstboot.toml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_parameter_sources() {
        let config = Config::parse(&with_params(
            r#"
[[parameters]]
env = "BOT_TOKEN"
secret = "bot/secrets"
field = "bot_token"
required = true

[[parameters]]
env = "GUILD_IDS"
parameter = "/bot/guilds"
decrypt = false

[[parameters]]
env = "BOT_ID"
value = "1334225517603192902"
"#,
        ))
        .unwrap();

        let params = config.parameters().unwrap();
        assert_eq!(
            params[0].source,
            Source::SecretField {
                secret_id: "bot/secrets".to_string(),
                field: "bot_token".to_string()
            }
        );
        assert!(params[0].required);
        assert_eq!(
            params[1].source,
            Source::Parameter {
                name: "/bot/guilds".to_string(),
                decrypt: false
            }
        );
        assert!(!params[1].required);
        assert_eq!(
            params[2].source,
            Source::Literal("1334225517603192902".to_string())
        );
    }

    #[test]
    fn test_parameter_requires_a_source() {
        let err = Config::parse(&with_params("[[parameters]]\nenv = \"X\"\n")).unwrap_err();
        assert!(err.to_string().contains("is required"));
    }

    #[test]
    fn test_parameter_rejects_two_sources() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"X\"\nparameter = \"/a\"\nvalue = \"b\"\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("only one of"));
    }

    #[test]
    fn test_secret_requires_field() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"X\"\nsecret = \"s\"\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("requires `field`"));
    }

    #[test]
    fn test_required_with_default_rejected() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"X\"\nparameter = \"/a\"\nrequired = true\ndefault = \"d\"\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("cannot have a `default`"));
    }

    #[test]
    fn test_required_empty_literal_rejected() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"BOT_TOKEN\"\nvalue = \"\"\nrequired = true\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_optional_empty_literal_allowed() {
        let config = Config::parse(&with_params(
            "[[parameters]]\nenv = \"GUILD_IDS\"\nvalue = \"\"\n",
        ))
        .unwrap();
        assert_eq!(config.parameters().unwrap()[0].source, Source::Literal(String::new()));
    }

    #[test]
    fn test_duplicate_env_key_rejected() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"X\"\nvalue = \"1\"\n\n[[parameters]]\nenv = \"X\"\nvalue = \"2\"\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("duplicate environment key: X"));
    }

    #[test]
    fn test_region_key_conflicts_with_export() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"AWS_REGION\"\nvalue = \"eu-west-1\"\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("AWS_REGION"));
    }

    #[test]
    fn test_invalid_env_key_rejected() {
        let err = Config::parse(&with_params(
            "[[parameters]]\nenv = \"BOT-TOKEN\"\nvalue = \"1\"\n",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("BOT-TOKEN"));
    }

    #[test]
    fn test_root_user_rejected() {
        let text = MINIMAL.replace("user = \"bot\"", "user = \"root\"");
        let err = Config::parse(&text).unwrap_err();
        assert!(err.to_string().contains("unprivileged"));
    }

    #[test]
    fn test_relative_install_dir_rejected() {
        let text = MINIMAL.replace("/opt/bot", "opt/bot");
        assert!(Config::parse(&text).is_err());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let text = format!("{}\n[store]\nbackend = \"file\"\n", MINIMAL);
        let err = Config::parse(&text).unwrap_err();
        assert!(err.to_string().contains("store.path"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let text = format!("{}\n[retry]\nmax_attempts = 0\n", MINIMAL);
        assert!(Config::parse(&text).is_err());
    }

    #[test]
    fn test_unknown_package_manager_rejected() {
        let text = format!("{}\n[runtime]\npackage_manager = \"pacman\"\n", MINIMAL);
        assert!(Config::parse(&text).is_err());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config::parse(MINIMAL).unwrap();
        let policy = config.retry.policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(5));
    }
}
