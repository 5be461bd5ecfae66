use std::env;
use std::fmt;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;
pub const DEFAULT_BCRYPT_COST: u32 = 12;
/// Cost bounds accepted by bcrypt.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
/// Upper bound for `TOKEN_TTL_HOURS`, a little over a century.
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 366 * 100;

/// A missing or unparseable environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings, read from the environment (and `.env` via `dotenv` in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    /// Token lifetime in hours. `None` issues tokens without an `exp` claim.
    pub token_ttl_hours: Option<u64>,
    pub bcrypt_cost: u32,
    /// When set, listing a project's tasks requires owning the project.
    pub strict_task_listing: bool,
}

impl Config {
    /// Defaults for everything except the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: Some(DEFAULT_TOKEN_TTL_HOURS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            strict_task_listing: false,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => return Err(ConfigError("JWT_SECRET must be set".into())),
        };

        let mut config = Self::new(jwt_secret);

        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = parse_var::<u16>("SERVER_PORT")? {
            config.server_port = port;
        }
        if let Some(hours) = parse_var::<u64>("TOKEN_TTL_HOURS")? {
            if hours > MAX_TOKEN_TTL_HOURS {
                return Err(ConfigError(format!(
                    "TOKEN_TTL_HOURS must be at most {}",
                    MAX_TOKEN_TTL_HOURS
                )));
            }
            config.token_ttl_hours = if hours == 0 { None } else { Some(hours) };
        }
        if let Some(cost) = parse_var::<u32>("BCRYPT_COST")? {
            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                return Err(ConfigError(format!(
                    "BCRYPT_COST must be between {} and {}",
                    MIN_BCRYPT_COST, MAX_BCRYPT_COST
                )));
            }
            config.bcrypt_cost = cost;
        }
        if let Some(strict) = parse_var::<bool>("STRICT_TASK_LISTING")? {
            config.strict_task_listing = strict;
        }

        Ok(config)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
