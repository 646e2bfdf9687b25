//! File based logging with per-component log files.
//!
//! | Log File          | Component                         | Target Prefixes                                |
//! |-------------------|-----------------------------------|------------------------------------------------|
//! | ballot.log        | Root logger (all components)      | (all)                                          |
//! | workflow.log      | Gateway, approvals, election rules| ballot_workflow                                |
//! | auth.log          | Authentication and authorization  | ballot_auth, ballot_server::middleware, ...    |
//! | position.log      | Position resolver                 | ballot_position                                |
//! | persistence.log   | Database access                   | ballot_persistence, ballot_migration, sea_orm  |
//!
//! Log files go to `~/ballot/logs` unless `logging.dir` says otherwise.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// A component log file and the targets routed to it.
struct ComponentLogDef {
    file_name: &'static str,
    targets: &'static [&'static str],
}

const ROOT_LOG_FILE: &str = "ballot.log";

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "workflow.log",
        targets: &["ballot_workflow"],
    },
    ComponentLogDef {
        file_name: "auth.log",
        targets: &["ballot_auth", "ballot_server::middleware", "ballot_server::secured"],
    },
    ComponentLogDef {
        file_name: "position.log",
        targets: &["ballot_position"],
    },
    ComponentLogDef {
        file_name: "persistence.log",
        targets: &["ballot_persistence", "ballot_migration", "sea_orm"],
    },
];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub file_logging: bool,
    /// Used when `RUST_LOG` is not set
    pub level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        Self {
            log_dir: PathBuf::from(format!("{}/ballot/logs", home)),
            console_output: true,
            file_logging: true,
            level: Level::INFO,
        }
    }
}

/// Keeps the non-blocking writers flushing; hold it for the process lifetime.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install the global subscriber: console output, the root `ballot.log` file
/// and one daily rolling file per component.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(env_filter(config.level));
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        let root_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, ROOT_LOG_FILE);
        let (root_nb, root_guard) = tracing_appender::non_blocking(root_appender);
        guards.push(root_guard);

        let root_layer = fmt::layer()
            .with_writer(root_nb)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(env_filter(config.level));
        layers.push(Box::new(root_layer));

        for component in COMPONENT_LOGS {
            let appender =
                RollingFileAppender::new(Rotation::DAILY, &config.log_dir, component.file_name);
            let (nb, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let level = LevelFilter::from_level(config.level);
            let targets = component
                .targets
                .iter()
                .fold(Targets::new(), |targets, target| targets.with_target(*target, level));

            let layer = fmt::layer()
                .with_writer(nb)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(targets);
            layers.push(Box::new(layer));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            "File logging initialized: {} (root) + {} component log files",
            ROOT_LOG_FILE,
            COMPONENT_LOGS.len()
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
