use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Cookie signing secret used when none is configured. Anyone who knows it
/// can forge a session, so deployments should override it.
pub const DEFAULT_SECRET_KEY: &str = "\u{c9}ixnRb\u{e4}0\u{d4}\u{a5}\u{7f}\u{03}\u{d0}y6\u{01}\u{1f}\u{96}\u{ea}o+\u{8a}\u{9f}\u{e4}";

/// Everything the application needs at startup, passed explicitly into
/// `AppState`.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite file, or `:memory:` for a store that lives with the process.
    pub db_path: PathBuf,
    pub secret_key: String,
    /// Drop and reseed the store before serving. When off, only missing
    /// seed accounts are added.
    pub reset_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            db_path: PathBuf::from(portal_db::IN_MEMORY),
            secret_key: DEFAULT_SECRET_KEY.into(),
            reset_on_start: true,
        }
    }
}

impl Config {
    /// Defaults overridden by any `PORTAL_*` variables in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("PORTAL_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORTAL_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("PORTAL_PORT is not a valid port: {port:?}"))?;
        }
        if let Some(path) = lookup("PORTAL_DB_PATH") {
            config.db_path = path.into();
        }
        if let Some(secret) = lookup("PORTAL_SECRET_KEY") {
            if secret.is_empty() {
                bail!("PORTAL_SECRET_KEY is set but empty");
            }
            config.secret_key = secret;
        }
        if let Some(flag) = lookup("PORTAL_RESET_ON_START") {
            config.reset_on_start = parse_flag(&flag)
                .with_context(|| format!("PORTAL_RESET_ON_START is not a boolean: {flag:?}"))?;
        }

        Ok(config)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised flag value {other:?}"),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("secret_key", &"<redacted>")
            .field("reset_on_start", &self.reset_on_start)
            .finish()
    }
}
