use crate::domain_model::UserRecord;
use anyhow::{Result, anyhow};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use warp::http::Uri;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub http: Http,
    pub log: Log,
    #[serde(default)]
    pub soap: Soap,
}

#[derive(Deserialize)]
pub struct Database {
    pub backend: String, // "fake" or "real"
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    pub query_timeout_secs: Option<u64>,
    #[serde(default)]
    pub fake_users: Vec<UserRecord>,
}

// Keeps the password out of the startup log.
impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("fake_users", &self.fake_users.len())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Http {
    #[serde(default = "default_address")]
    pub address: String,
    pub allowed_origin: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub ansi: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Compact,
}

#[derive(Debug, Deserialize)]
pub struct Soap {
    #[serde(default = "default_true")]
    pub escape_values: bool,
}

impl Default for Soap {
    fn default() -> Self {
        Soap {
            escape_values: true,
        }
    }
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_address() -> String {
    "0.0.0.0:5016".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

const ENV_PREFIX: &str = "USER_SOAP";

/// Plain environment variables honoured on top of the settings file.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("POSTGRESQL_HOST", "database.host"),
    ("POSTGRESQL_PORT", "database.port"),
    ("POSTGRESQL_USER", "database.username"),
    ("POSTGRESQL_PASSWORD", "database.password"),
    ("POSTGRESQL_DATABASE", "database.name"),
    ("ALLOWED_ORIGIN", "http.allowed_origin"),
];

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    // A missing .env is fine, the variables may come from the real environment.
    dotenv::dotenv().ok();

    let builder = Config::builder()
        .add_source(File::with_name(path))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    build_settings(builder, |name| std::env::var(name).ok())
}

/// Parses settings from TOML text, with `lookup` standing in for the environment.
pub fn parse_settings_str<F>(toml: &str, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
    build_settings(builder, lookup)
}

fn build_settings<F>(mut builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in ENV_OVERRIDES {
        builder = builder
            .set_override_option(*key, lookup(var))
            .map_err(|e| anyhow!(e))?;
    }

    let settings: Settings = builder
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<()> {
        let origin: Uri = self
            .http
            .allowed_origin
            .parse()
            .map_err(|e| anyhow!("invalid allowed_origin {:?}: {}", self.http.allowed_origin, e))?;
        if origin.scheme().is_none() || origin.authority().is_none() {
            return Err(anyhow!(
                "allowed_origin must be scheme://host[:port], got {:?}",
                self.http.allowed_origin
            ));
        }

        if self.http.cert_path.is_some() != self.http.key_path.is_some() {
            return Err(anyhow!("cert_path and key_path must be set together"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DEV: &str = r#"
[database]
backend = "real"
host = "db.internal"
port = 6543
username = "app"
password = "secret"
name = "users"

[http]
allowed_origin = "http://3.212.132.24:8080"

[log]
filter = "info"
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_file_values_and_defaults() {
        let settings = parse_settings_str(DEV, no_env).unwrap();

        assert_eq!(settings.database.host, "db.internal");
        assert_eq!(settings.database.port, 6543);
        assert_eq!(settings.database.ssl_mode, "disable");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.database.query_timeout_secs, None);
        assert_eq!(settings.http.address, "0.0.0.0:5016");
        assert_eq!(settings.log.format, LogFormat::Text);
        assert!(settings.soap.escape_values);
    }

    #[test]
    fn postgresql_variables_override_file() {
        let env: HashMap<&str, &str> = [
            ("POSTGRESQL_HOST", "pooler.example.com"),
            ("POSTGRESQL_PORT", "5433"),
            ("POSTGRESQL_PASSWORD", "from-env"),
            ("ALLOWED_ORIGIN", "http://3.227.120.143:8080"),
        ]
        .into_iter()
        .collect();

        let settings =
            parse_settings_str(DEV, |name| env.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.database.host, "pooler.example.com");
        assert_eq!(settings.database.port, 5433);
        assert_eq!(settings.database.password, "from-env");
        assert_eq!(settings.database.username, "app");
        assert_eq!(settings.http.allowed_origin, "http://3.227.120.143:8080");
    }

    #[test]
    fn rejects_origin_without_scheme() {
        let toml = DEV.replace("http://3.212.132.24:8080", "3.212.132.24");
        assert!(parse_settings_str(&toml, no_env).is_err());
    }

    #[test]
    fn rejects_half_configured_tls() {
        let toml = DEV.replace(
            "[http]\n",
            "[http]\ncert_path = \"settings/cert.pem\"\n",
        );
        assert!(parse_settings_str(&toml, no_env).is_err());
    }

    #[test]
    fn reads_fake_users() {
        let toml = DEV.replace("backend = \"real\"", "backend = \"fake\"")
            + r#"
[[database.fake_users]]
id = "42"
username = "alice"
"#;
        let settings = parse_settings_str(&toml, no_env).unwrap();

        assert_eq!(settings.database.backend, "fake");
        assert_eq!(
            settings.database.fake_users,
            vec![UserRecord::new("42", "alice")]
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let settings = parse_settings_str(DEV, no_env).unwrap();
        let printed = format!("{:?}", settings);

        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }
}
