use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;

use crate::{config, Runnable};

/// Prints the SQL that creates the catalog tables
#[derive(Parser)]
pub struct PrintSchema {
    /// Prints more information
    #[arg(short, long)]
    pub verbose: bool,
}

#[async_trait]
impl Runnable for PrintSchema {
    async fn run(&mut self) -> Result<()> {
        for statement in config::schema().create_statements() {
            println!("{}", statement);
        }
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}
