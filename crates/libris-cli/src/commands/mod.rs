//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use libris_core::config::AppConfig;
use libris_core::error::AppError;
use libris_database::{DatabasePool, MemoryNamespaceStore};
use libris_service::LibraryService;

use crate::output::OutputFormat;

/// Libris: folder tree management for the study library
#[derive(Debug, Parser)]
#[command(name = "libris", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Run against an empty in-memory store instead of PostgreSQL
    #[arg(long, global = true)]
    pub memory: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// File placement and cleanup
    File(file::FileArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Folder(args) => {
                let backend = Backend::open(config, self.memory).await?;
                let result = folder::execute(args, &backend.library, self.format).await;
                backend.close().await;
                result
            }
            Commands::File(args) => {
                let backend = Backend::open(config, self.memory).await?;
                let result = file::execute(args, &backend.library, self.format).await;
                backend.close().await;
                result
            }
            Commands::Migrate(args) => migrate::execute(args, config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// The services plus whatever connection has to be closed afterwards.
pub struct Backend {
    pub library: LibraryService,
    pool: Option<DatabasePool>,
}

impl Backend {
    /// Wire the services over PostgreSQL, or over a fresh in-memory store.
    pub async fn open(config: &AppConfig, memory: bool) -> Result<Self, AppError> {
        let storage = libris_storage::build_provider(&config.storage).await?;

        if memory {
            info!("Using in-memory metadata store");
            let store = Arc::new(MemoryNamespaceStore::new());
            let library = LibraryService::new(store.clone(), store, storage, &config.namespace);
            return Ok(Self {
                library,
                pool: None,
            });
        }

        let pool = DatabasePool::connect(&config.database).await?;
        let library = LibraryService::new(
            Arc::new(pool.folders()),
            Arc::new(pool.files()),
            storage,
            &config.namespace,
        );
        Ok(Self {
            library,
            pool: Some(pool),
        })
    }

    async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}
