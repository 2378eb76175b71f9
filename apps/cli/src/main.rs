//! lessonforge CLI — lesson content generation for the learning roadmap.
//!
//! Searches the web for authoritative sources, synthesizes lesson bodies
//! with a language model, and persists markdown plus source provenance.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
