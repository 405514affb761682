mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use env_logger::Env;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Weather {
            start,
            end,
            timezone,
            out,
        } => cli::weather(*start, *end, timezone, out).await,
        Commands::Groceries {
            data_dir,
            out,
            env_file,
        } => cli::groceries(data_dir.clone(), out, env_file).await,
    }
}
