//! Service configuration, loaded once from the environment at startup.
//!
//! Database credentials may arrive either verbatim or Base64-encoded (when `NODE_ENV` is
//! `production`). Both forms are normalized into one [`DbConfig`] here, so nothing past this module
//! knows how the credentials were delivered.

use std::{
    fmt::{self, Debug, Display, Formatter},
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// The port the HTTP server listens on if `SERVICE_PORT` isn't set.
pub const DEFAULT_SERVICE_PORT: u16 = 3000;

/// The address the HTTP server binds to if `SERVICE_HOST` isn't set.
pub const DEFAULT_SERVICE_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// The database port used if `DB_PORT` isn't set.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// The maximum number of pooled database connections if `DB_MAX_CONNECTIONS` isn't set.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a pooled connection if `DB_ACQUIRE_TIMEOUT_SECS` isn't set.
pub const DEFAULT_DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// The `NODE_ENV` value under which credentials are expected to be Base64-encoded.
const PRODUCTION: &str = "production";

/// Standard Base64 that accepts input with or without trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The complete service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The socket address the HTTP server listens on.
    pub listen_addr: SocketAddr,

    /// How to reach the database.
    pub db: DbConfig,

    /// Behavior toggles for the HTTP API.
    pub api: ApiConfig,
}

/// Normalized database connection settings.
#[derive(Clone, Debug)]
pub struct DbConfig {
    /// The database host name or address.
    pub host: String,

    /// The database port.
    pub port: u16,

    /// The database user, already decoded.
    pub user: String,

    /// The database name, already decoded.
    pub name: String,

    /// The database password, already decoded.
    pub password: Password,

    /// How the credentials were encoded before normalization.
    pub encoding: CredentialEncoding,

    /// The upper bound on simultaneously open connections.
    pub max_connections: u32,

    /// How long a request may wait for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Builds the driver's connection options from these settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose())
            .database(&self.name)
    }
}

/// Behavior toggles for the HTTP API.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ApiConfig {
    /// Whether `POST /postData` rejects a missing or empty `todo` field.
    pub validate_todo: bool,

    /// Whether responses carry permissive CORS headers.
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            validate_todo: true,
            cors_enabled: true,
        }
    }
}

/// A database password. Its [`Debug`] output is redacted so it can't end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Gets the password in plain text.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self(password)
    }
}

/// How the database user, name, and password are delivered in the environment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CredentialEncoding {
    /// The values are used verbatim.
    Plain,

    /// The values are Base64-encoded and must be decoded before use.
    Base64,
}

impl CredentialEncoding {
    /// Determines the encoding from the value of `NODE_ENV`.
    pub fn from_node_env(node_env: Option<&str>) -> Self {
        if node_env == Some(PRODUCTION) {
            Self::Base64
        } else {
            Self::Plain
        }
    }

    /// Decodes the value of the environment variable `var` according to this encoding.
    ///
    /// # Errors
    ///
    /// Fails if the encoding is [`Self::Base64`] and the value isn't valid Base64 or doesn't
    /// decode to UTF-8.
    pub fn decode(self, var: &'static str, value: String) -> Result<String, Error> {
        match self {
            Self::Plain => Ok(value),
            Self::Base64 => {
                let bytes = LENIENT_BASE64
                    .decode(value.trim())
                    .map_err(|source| Error::Base64 { var, source })?;

                String::from_utf8(bytes).map_err(|_| Error::Utf8 { var })
            }
        }
    }
}

impl Display for CredentialEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Base64 => "base64",
        })
    }
}

/// An error loading the [`Config`]. Never includes the offending value, since it may be a secret.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required variable wasn't set.
    #[error("environment variable `{0}` should be set")]
    Missing(&'static str),

    /// A variable couldn't be parsed into its expected type.
    #[error("environment variable `{var}` is invalid: {reason}")]
    Invalid {
        /// The name of the variable.
        var: &'static str,

        /// Why the value was rejected.
        reason: String,
    },

    /// A variable expected to be Base64-encoded wasn't valid Base64.
    #[error("environment variable `{var}` isn't valid Base64")]
    Base64 {
        /// The name of the variable.
        var: &'static str,

        /// The decoding failure.
        #[source]
        source: base64::DecodeError,
    },

    /// A Base64-encoded variable didn't decode to valid UTF-8.
    #[error("environment variable `{var}` doesn't decode to valid UTF-8")]
    Utf8 {
        /// The name of the variable.
        var: &'static str,
    },
}

impl Config {
    /// Loads the configuration from the process environment, including a `.env` file if one
    /// exists.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| dotenvy::var(var).ok())
    }

    /// Loads the configuration using `lookup` to get the value of each variable.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing, if a variable can't be parsed, or if a credential
    /// can't be decoded.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, Error> {
        let encoding = CredentialEncoding::from_node_env(lookup("NODE_ENV").as_deref());

        let host: IpAddr = parse_or(&lookup, "SERVICE_HOST", DEFAULT_SERVICE_HOST)?;
        let port = parse_or(&lookup, "SERVICE_PORT", DEFAULT_SERVICE_PORT)?;

        let acquire_timeout_secs = parse_or(
            &lookup,
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_DB_ACQUIRE_TIMEOUT.as_secs(),
        )?;

        let db = DbConfig {
            host: required(&lookup, "DB_HOST")?,
            port: parse_or(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            user: encoding.decode("DB_USER", required(&lookup, "DB_USER")?)?,
            name: encoding.decode("DB_NAME", required(&lookup, "DB_NAME")?)?,
            password: encoding
                .decode("DB_PASS", required(&lookup, "DB_PASS")?)?
                .into(),
            encoding,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        };

        let defaults = ApiConfig::default();
        let api = ApiConfig {
            validate_todo: flag_or(&lookup, "VALIDATE_TODO", defaults.validate_todo)?,
            cors_enabled: flag_or(&lookup, "CORS_ENABLED", defaults.cors_enabled)?,
        };

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            db,
            api,
        })
    }
}

/// Gets a variable that must be set.
fn required<F: Fn(&str) -> Option<String>>(lookup: &F, var: &'static str) -> Result<String, Error> {
    lookup(var).ok_or(Error::Missing(var))
}

/// Parses a variable, falling back to `default` if it's unset or blank.
fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|error: T::Err| Error::Invalid {
                var,
                reason: error.to_string(),
            })
        }
        _ => Ok(default),
    }
}

/// Parses a boolean variable, falling back to `default` if it's unset or blank.
fn flag_or<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    var: &'static str,
    default: bool,
) -> Result<bool, Error> {
    let Some(value) = lookup(var).filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Invalid {
            var,
            reason: "expected a boolean".into(),
        }),
    }
}
