use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use catalogo::{schema::Schema, store::PgStore};
use clap::Args;
use log::debug;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use tokio::fs;

pub const DEFAULT_CONFIG_FILE: &str = "catalogo.toml";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read config file '{}'", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("config file '{}' is invalid", path.display()))
    }

    /// Loads `path`, or `catalogo.toml` from the working directory when it
    /// exists, or falls back to an empty config.
    pub async fn discover(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Config::load(path).await,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Config::load(DEFAULT_CONFIG_FILE).await
            }
            None => Ok(Config::default()),
        }
    }
}

/// Connection flags shared by every command that talks to the database.
#[derive(Args, Clone, Debug, Default)]
pub struct DatabaseArgs {
    /// Postgres connection string, overrides the config file
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
    /// Path of the config file [default: ./catalogo.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Prints more information
    #[arg(short, long)]
    pub verbose: bool,
}

impl DatabaseArgs {
    pub async fn config(&self) -> Result<Config> {
        let mut config = Config::discover(self.config.as_deref()).await?;
        if let Some(database_url) = &self.database_url {
            config.database_url = Some(database_url.clone());
        }
        Ok(config)
    }

    pub async fn pool(&self) -> Result<sqlx::PgPool> {
        let config = self.config().await?;
        let database_url = config.database_url.ok_or_else(|| {
            anyhow!(
                "no database url: pass --database-url, set DATABASE_URL \
                 or add it to the config file"
            )
        })?;

        debug!("connecting to database");
        PgPoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
            .connect(&database_url)
            .await
            .context("could not connect to database")
    }

    pub async fn store(&self) -> Result<PgStore> {
        Ok(PgStore::from_pool(self.pool().await?))
    }
}

pub fn schema() -> Schema {
    Schema::new().register::<catalogo::producto::Producto>()
}
