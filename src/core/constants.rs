//! Constants used throughout firstboot.
//!
//! Centralizes default paths, timings and protocol strings.

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/firstboot.toml";

/// Environment variable that overrides the configuration path.
pub const CONFIG_ENV: &str = "FIRSTBOOT_CONFIG";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "FIRSTBOOT_LOG";

/// Set to `json` for one JSON object per log line.
pub const LOG_FORMAT_ENV: &str = "FIRSTBOOT_LOG_FORMAT";

/// Name of the env file inside the install directory when none is configured.
pub const ENV_FILE: &str = ".env";

/// Directory holding the run journal.
pub const STATE_DIR: &str = "/var/lib/firstboot";

/// Journal file name inside the state directory.
pub const JOURNAL_FILE: &str = "journal.json";

/// Attempts per store read before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between store read attempts, in seconds.
pub const BACKOFF_SECS: u64 = 5;

/// Delay between starting the service and checking it, in seconds.
pub const SETTLE_SECS: u64 = 5;

/// Instance metadata endpoint (IMDSv2).
pub const METADATA_ENDPOINT: &str = "http://169.254.169.254";

/// Per-request metadata timeout, in seconds.
pub const METADATA_TIMEOUT_SECS: u64 = 2;

/// Region used when metadata cannot be reached.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Lifetime requested for IMDSv2 session tokens, in seconds.
pub const METADATA_TOKEN_TTL: &str = "21600";

/// Header carrying the requested token lifetime.
pub const METADATA_TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";

/// Header carrying the session token.
pub const METADATA_TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";

/// Environment key carrying the discovered region.
pub const REGION_ENV_KEY: &str = "AWS_REGION";

/// Directory for systemd unit files.
pub const UNIT_DIR: &str = "/etc/systemd/system";

/// Mode of the environment file.
pub const ENV_FILE_MODE: u32 = 0o600;

/// Mode of the unit file and the journal.
pub const PUBLIC_FILE_MODE: u32 = 0o644;

/// Lines of stderr kept in command failure messages.
pub const STDERR_TAIL_LINES: usize = 20;
