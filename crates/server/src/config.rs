//! Configuration loading for the server binary.
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. The TOML file, if it exists
//! 3. Legacy deployment variables (`PORT`, `DB_HOST`, `DB_PORT`, `DB_USER`,
//!    `DB_PASSWORD`, `DB_NAME`), read from the process environment or,
//!    failing that, from a `.env` file in the working directory or a parent
//! 4. `ROSTER_`-prefixed variables, nested with `__`
//!    (e.g. `ROSTER_SERVER__UPLOAD_DIR`)

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::{Dict, Value};
use roster_core::config::AppConfig;
use std::collections::HashMap;
use std::path::Path;

/// Prefix for structured environment overrides.
pub const ENV_PREFIX: &str = "ROSTER_";

/// Legacy database variables and the `database.*` key each one sets.
const LEGACY_DB_VARS: [(&str, &str); 5] = [
    ("DB_HOST", "host"),
    ("DB_PORT", "port"),
    ("DB_USER", "username"),
    ("DB_PASSWORD", "password"),
    ("DB_NAME", "database"),
];

/// Load the application configuration.
///
/// A missing file is not an error; defaults and the environment still
/// apply.
pub fn load_config(path: &Path) -> Result<AppConfig, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if path.exists() {
        tracing::info!(config_path = %path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path.display());
    }

    let dotenv = dotenv_vars()?;

    figment
        .merge(Serialized::defaults(legacy_env(&dotenv)?))
        // ROSTER_CONFIG names the file and is not a config key.
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__"))
        .extract()
}

/// Entries of the nearest `.env` file; empty if there is none.
///
/// The file is read without touching the process environment.
fn dotenv_vars() -> Result<HashMap<String, String>, figment::Error> {
    let entries = match dotenvy::dotenv_iter() {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(figment::Error::from(format!("failed to read .env file: {e}"))),
    };

    let vars = entries
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| figment::Error::from(format!("invalid .env file: {e}")))?;
    tracing::debug!(entries = vars.len(), "Loaded .env file");
    Ok(vars)
}

/// Map the legacy deployment variables onto config keys.
///
/// A variable set in the process environment wins over the same name in
/// `.env`. Values are kept as strings (ports parsed) so that a numeric
/// password is not turned into a number.
fn legacy_env(dotenv: &HashMap<String, String>) -> Result<Dict, figment::Error> {
    let lookup = |name: &str| {
        std::env::var(name)
            .ok()
            .or_else(|| dotenv.get(name).cloned())
            .filter(|v| !v.trim().is_empty())
    };

    let mut root = Dict::new();

    if let Some(port) = lookup("PORT") {
        let port = parse_port("PORT", &port)?;
        let mut server = Dict::new();
        server.insert("port".to_string(), Value::from(port));
        root.insert("server".to_string(), Value::from(server));
    }

    let mut database = Dict::new();
    for (var, key) in LEGACY_DB_VARS {
        let Some(raw) = lookup(var) else {
            continue;
        };
        let value = if key == "port" {
            Value::from(parse_port(var, &raw)?)
        } else {
            Value::from(raw)
        };
        database.insert(key.to_string(), value);
    }

    if !database.is_empty() {
        tracing::debug!("Using legacy DB_* variables for a PostgreSQL store");
        database.insert("type".to_string(), Value::from("postgres"));
        root.insert("database".to_string(), Value::from(database));
    }

    Ok(root)
}

fn parse_port(var: &str, raw: &str) -> Result<u16, figment::Error> {
    raw.trim()
        .parse()
        .map_err(|_| figment::Error::from(format!("{var} is not a valid port: {raw:?}")))
}
