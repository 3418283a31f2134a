use anyhow::{Context, Result};
use async_trait::async_trait;
use catalogo::store::PgStore;
use clap::Parser;
use log::info;

use crate::{config::{self, DatabaseArgs}, Runnable};

/// Creates the catalog tables and indexes in the database
#[derive(Parser)]
pub struct Init {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[async_trait]
impl Runnable for Init {
    async fn run(&mut self) -> Result<()> {
        let pool = self.database.pool().await?;
        let executed = PgStore::initialize(&pool, &config::schema())
            .await
            .context("could not create tables")?;

        info!("database ready ({} statements executed)", executed);
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.database.verbose
    }
}
