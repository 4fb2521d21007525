use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsdesk::app::AppContext;
use newsdesk::cli::{commands, Cli, Commands};
use newsdesk::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.store.db_path = Some(db);
    }
    if cli.offline {
        config.connectivity.offline = true;
    }
    if let Commands::Headlines {
        country: Some(country),
        ..
    } = &cli.command
    {
        config.feed.country = country.clone();
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Headlines { pages, save, .. } => {
            commands::headlines(&ctx, pages, save).await?;
        }
        Commands::Search { term, pages, save } => {
            commands::search(&ctx, &term, pages, save).await?;
        }
        Commands::Prompt => {
            commands::prompt(&ctx).await?;
        }
        Commands::Saved => {
            commands::list_saved(&ctx)?;
        }
        Commands::Remove { url } => {
            commands::remove_saved(&ctx, &url)?;
        }
    }

    Ok(())
}
