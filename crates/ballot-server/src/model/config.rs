//! Configuration management for Ballot server
//!
//! Sources are layered: built-in defaults, `conf/application.yml`,
//! `BALLOT_` environment variables, then command line overrides.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigBuilder, Environment, builder::DefaultState};
use tracing::Level;

use ballot_auth::{
    BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_PASSWORD, DEFAULT_TOKEN_EXPIRE_SECONDS,
    PASSWORD_HASH_COST, TOKEN_EXPIRE_SECONDS, TOKEN_SECRET_KEY,
};
use ballot_persistence::sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::startup::LoggingConfig;

pub const CONFIG_FILE: &str = "conf/application.yml";
pub const ENV_PREFIX: &str = "BALLOT";

pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const SERVER_CONTEXT_PATH: &str = "server.contextPath";
pub const BALLOT_ENV: &str = "ballot.env";
pub const POSITIONS_DIR: &str = "ballot.positions.dir";
pub const POSITIONS_FILES: &str = "ballot.positions.files";
pub const DB_URL: &str = "db.url";

pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_CONTEXT_PATH: &str = "/api";
pub const DEFAULT_POSITIONS_DIR: &str = "conf/positions";
pub const DEFAULT_POSITIONS_FILES: [&str; 2] = [
    "primaries_elections_config.json",
    "internal_party_elections_config.json",
];
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 10;
pub const PRODUCTION: &str = "production";

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "ballot-server", version, about)]
pub struct Cli {
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long = "positions-dir")]
    pub positions_dir: Option<String>,
    /// Deployment environment, e.g. `development` or `production`
    #[arg(short = 'e', long = "env")]
    pub env: Option<String>,
}

/// Bootstrap SuperAdmin credentials
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration for the running process, reading the command line.
    pub fn new() -> anyhow::Result<Self> {
        Self::load(Cli::parse())
    }

    pub fn load(args: Cli) -> anyhow::Result<Self> {
        let mut builder = Self::defaults()?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.port {
            builder = builder.set_override(SERVER_PORT, i64::from(v))?;
        }
        if let Some(v) = args.database_url {
            builder = builder.set_override(DB_URL, v)?;
        }
        if let Some(v) = args.positions_dir {
            builder = builder.set_override(POSITIONS_DIR, v)?;
        }
        if let Some(v) = args.env {
            builder = builder.set_override(BALLOT_ENV, v)?;
        }

        Ok(Configuration {
            config: builder.build()?,
        })
    }

    /// Wrap an already built `Config`, on top of the built-in defaults.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        Ok(Configuration {
            config: Self::defaults()?.add_source(config).build()?,
        })
    }

    fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default(SERVER_ADDRESS, "0.0.0.0")?
            .set_default(SERVER_PORT, i64::from(DEFAULT_SERVER_PORT))?
            .set_default(SERVER_CONTEXT_PATH, DEFAULT_CONTEXT_PATH)?
            .set_default(BALLOT_ENV, "development")?
            .set_default(POSITIONS_DIR, DEFAULT_POSITIONS_DIR)?
            .set_default(TOKEN_EXPIRE_SECONDS, DEFAULT_TOKEN_EXPIRE_SECONDS)?
            .set_default(PASSWORD_HASH_COST, i64::from(DEFAULT_PASSWORD_HASH_COST))?)
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn context_path(&self) -> String {
        let path = self
            .config
            .get_string(SERVER_CONTEXT_PATH)
            .unwrap_or(DEFAULT_CONTEXT_PATH.to_string());

        match path.trim_end_matches('/') {
            "" => String::new(),
            trimmed if trimmed.starts_with('/') => trimmed.to_string(),
            trimmed => format!("/{}", trimmed),
        }
    }

    pub fn environment(&self) -> String {
        self.config
            .get_string(BALLOT_ENV)
            .unwrap_or("development".to_string())
    }

    pub fn is_production(&self) -> bool {
        self.environment().eq_ignore_ascii_case(PRODUCTION)
    }

    // ========================================================================
    // Auth Configuration
    // ========================================================================

    /// Base64 encoded HS256 secret
    pub fn token_secret_key(&self) -> String {
        self.config.get_string(TOKEN_SECRET_KEY).unwrap_or_default()
    }

    pub fn token_expire_seconds(&self) -> i64 {
        self.config
            .get_int(TOKEN_EXPIRE_SECONDS)
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_SECONDS)
    }

    pub fn password_hash_cost(&self) -> u32 {
        self.config
            .get_int(PASSWORD_HASH_COST)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(DEFAULT_PASSWORD_HASH_COST)
    }

    pub fn bootstrap_admin(&self) -> Option<BootstrapAdmin> {
        let email = self.config.get_string(BOOTSTRAP_ADMIN_EMAIL).ok()?;
        let password = self.config.get_string(BOOTSTRAP_ADMIN_PASSWORD).ok()?;

        if email.trim().is_empty() || password.is_empty() {
            return None;
        }

        Some(BootstrapAdmin { email, password })
    }

    // ========================================================================
    // Position Configuration
    // ========================================================================

    pub fn positions_config_files(&self) -> Vec<PathBuf> {
        let dir = PathBuf::from(
            self.config
                .get_string(POSITIONS_DIR)
                .unwrap_or(DEFAULT_POSITIONS_DIR.to_string()),
        );

        let files = self
            .config
            .get_array(POSITIONS_FILES)
            .ok()
            .map(|values| {
                values
                    .into_iter()
                    .filter_map(|v| v.into_string().ok())
                    .collect::<Vec<_>>()
            })
            .filter(|files| !files.is_empty())
            .unwrap_or_else(|| DEFAULT_POSITIONS_FILES.map(str::to_string).to_vec());

        files.into_iter().map(|file| dir.join(file)).collect()
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        let defaults = LoggingConfig::default();
        let level = self
            .config
            .get_string("logging.level")
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(defaults.level);

        LoggingConfig {
            log_dir: self
                .config
                .get_string("logging.dir")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            console_output: self
                .config
                .get_bool("logging.console")
                .unwrap_or(defaults.console_output),
            file_logging: self
                .config
                .get_bool("logging.file")
                .unwrap_or(defaults.file_logging),
            level,
        }
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_url(&self) -> anyhow::Result<String> {
        Ok(self.config.get_string(DB_URL)?)
    }

    pub fn database_max_connections(&self) -> u32 {
        self.config
            .get_int("db.pool.maximumPoolSize")
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(20)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self.database_max_connections();
        let min_connections = self
            .config
            .get_int("db.pool.minimumPoolSize")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("db.pool.connectionTimeout")
            .unwrap_or(30) as u64;
        let acquire_timeout = self
            .config
            .get_int("db.pool.acquireTimeout")
            .unwrap_or(8) as u64;
        let idle_timeout = self.config.get_int("db.pool.idleTimeout").unwrap_or(600) as u64;
        let max_lifetime = self.config.get_int("db.pool.maxLifetime").unwrap_or(1800) as u64;
        let sqlx_logging = self
            .config
            .get_bool("db.pool.sqlxLogging")
            .unwrap_or(false);

        let mut opt = ConnectOptions::new(self.database_url()?);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            "Connecting to database"
        );

        Ok(Database::connect(opt).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn from_yaml(yaml: &str) -> Configuration {
        let config = Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap();
        Configuration::from_config(config).unwrap()
    }

    #[test]
    fn test_defaults() {
        let configuration = Configuration::from_config(Config::default()).unwrap();
        assert_eq!(configuration.server_port(), DEFAULT_SERVER_PORT);
        assert_eq!(configuration.context_path(), "/api");
        assert_eq!(configuration.token_expire_seconds(), 3600);
        assert_eq!(configuration.password_hash_cost(), 10);
        assert!(!configuration.is_production());
        assert!(configuration.bootstrap_admin().is_none());
        assert!(configuration.database_url().is_err());
        assert_eq!(
            configuration.positions_config_files(),
            vec![
                PathBuf::from("conf/positions/primaries_elections_config.json"),
                PathBuf::from("conf/positions/internal_party_elections_config.json"),
            ]
        );
    }

    #[test]
    fn test_values_from_yaml() {
        let configuration = from_yaml(
            r#"
server:
  port: 9090
  contextPath: "v1/"
ballot:
  env: Production
  admin:
    email: admin@ballot.local
    password: Secret123
  positions:
    dir: /etc/ballot
    files: [primaries.json]
  auth:
    token:
      expire:
        seconds: 600
logging:
  level: debug
  console: false
"#,
        );

        assert_eq!(configuration.server_port(), 9090);
        assert_eq!(configuration.context_path(), "/v1");
        assert!(configuration.is_production());
        assert_eq!(configuration.token_expire_seconds(), 600);
        assert_eq!(
            configuration.bootstrap_admin(),
            Some(BootstrapAdmin {
                email: "admin@ballot.local".to_string(),
                password: "Secret123".to_string(),
            })
        );
        assert_eq!(
            configuration.positions_config_files(),
            vec![PathBuf::from("/etc/ballot/primaries.json")]
        );

        let logging = configuration.logging_config();
        assert_eq!(logging.level, Level::DEBUG);
        assert!(!logging.console_output);
    }

    #[test]
    fn test_yaml_file_source() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "db:\n  url: sqlite::memory:").unwrap();

        let config = Config::builder()
            .add_source(config::File::from(file.path()))
            .build()
            .unwrap();
        let configuration = Configuration::from_config(config).unwrap();

        assert_eq!(configuration.database_url().unwrap(), "sqlite::memory:");
    }

    #[test]
    fn test_cli_overrides() {
        let args = Cli::parse_from([
            "ballot-server",
            "--port",
            "7000",
            "--env",
            "production",
            "--db-url",
            "sqlite::memory:",
        ]);
        let configuration = Configuration::load(args).unwrap();

        assert_eq!(configuration.server_port(), 7000);
        assert!(configuration.is_production());
        assert_eq!(configuration.database_url().unwrap(), "sqlite::memory:");
    }
}
