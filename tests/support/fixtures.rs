//! Test fixtures and constants.

/// Metadata endpoint on the discard port; connections are refused.
pub const CLOSED_METADATA_ENDPOINT: &str = "http://127.0.0.1:9";

/// Store contents for the standard bot deployment.
pub const STANDARD_STORE: &str = r#"
[secrets."discord-bot/secrets"]
bot_token = "abc"
topgg_token = "xyz"

[parameters]
"/discord/dev_guild_ids" = ""
"/discord/env" = "PROD"
"#;

/// Parameters of the standard bot deployment.
pub const STANDARD_PARAMETERS: &str = r#"
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

/// Env file expected from the standard store and parameters.
pub const STANDARD_ENV: &str = "BOT_TOKEN=abc\n\
TOPGG_TOKEN=xyz\n\
SENTRY_DSN=\n\
GUILD_IDS=\n\
ENV=PROD\n\
TOPGG_BOT_ID=1334225517603192902\n\
AWS_REGION=eu-west-1\n";
