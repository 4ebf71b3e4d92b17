//! Server configuration.
//!
//! Each setting is taken from the command line if given there, otherwise from the environment,
//! otherwise from a default:
//!
//! | flag | environment | default |
//! |---|---|---|
//! | `--host` | `HOST` | `127.0.0.1` |
//! | `--port` | `PORT` | `5000` |
//! | `--database-url` | `DATABASE_URL` | none; the in-memory store is used |
//! | `--max-depth` | `DYNASCHEMA_MAX_DEPTH` | `32` |

use arrrg_derive::CommandLine;

use crate::ValidationLimits;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 5000;

const HOST_VAR: &str = "HOST";
const PORT_VAR: &str = "PORT";
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const MAX_DEPTH_VAR: &str = "DYNASCHEMA_MAX_DEPTH";

/// Command line flags of the `dynaschemad` daemon.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ServerArgs {
    /// Host to bind the HTTP server.
    #[arrrg(optional, "Host to bind the HTTP server")]
    pub host: Option<String>,
    /// Port to bind the HTTP server.
    #[arrrg(optional, "Port to bind the HTTP server")]
    pub port: Option<u16>,
    /// PostgreSQL connection URL.
    #[arrrg(optional, "PostgreSQL database URL; omit to keep data in memory")]
    pub database_url: Option<String>,
    /// Maximum schema nesting depth.
    #[arrrg(optional, "Maximum nesting depth accepted in schema attributes")]
    pub max_depth: Option<usize>,
    /// Enable debug logging.
    #[arrrg(flag, "Enable verbose logging")]
    pub verbose: bool,
}

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape.
    #[error("invalid value {value:?} for {var}")]
    InvalidValue {
        /// The variable name.
        var: &'static str,
        /// Its value.
        value: String,
    },
    /// The nesting depth was zero.
    #[error("max depth must be at least 1")]
    ZeroDepth,
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// PostgreSQL URL, if persistence is wanted.
    pub database_url: Option<String>,
    /// Validation limits for schema structure.
    pub limits: ValidationLimits,
    /// Whether debug logging is on.
    pub verbose: bool,
}

impl ServerConfig {
    /// Resolves `args` against the process environment.
    pub fn from_args(args: ServerArgs) -> Result<Self, ConfigError> {
        Self::resolve(args, |var| std::env::var(var).ok())
    }

    /// Resolves `args` against the environment lookup `env`.
    pub fn resolve<F>(args: ServerArgs, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = args
            .host
            .or_else(|| env(HOST_VAR))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match args.port {
            Some(port) => port,
            None => parse_env(&env, PORT_VAR)?.unwrap_or(DEFAULT_PORT),
        };
        let database_url = args
            .database_url
            .or_else(|| env(DATABASE_URL_VAR))
            .filter(|url| !url.trim().is_empty());
        let max_depth = match args.max_depth {
            Some(depth) => depth,
            None => parse_env(&env, MAX_DEPTH_VAR)?.unwrap_or(ValidationLimits::default().max_depth),
        };
        if max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(Self {
            host,
            port,
            database_url,
            limits: ValidationLimits { max_depth },
            verbose: args.verbose,
        })
    }

    /// The `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<F, T>(env: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match env(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
