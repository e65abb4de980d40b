use anyhow::Result;
use clap::Parser;

use super::{Cli, Commands};
use crate::cli_cmds::*;
use crate::store::JsonFileStore;
use crate::{app, init, logging};

pub(crate) async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    if let Some(Commands::Init) = cli.command {
        return init::run_init().await;
    }

    let mut config = app::Config::load()?;
    if let Some(bin) = cli.tag_bin {
        // Leading arguments belong to the configured executable.
        config.tag.binary = bin;
        config.tag.leading_args.clear();
    }
    let gateway = config.gateway();
    tracing::debug!(tag_tool = %gateway.program().display(), "tag tool configured");
    let mut store = JsonFileStore::open_default();

    match cli.command {
        Some(Commands::List { path }) => {
            cmd_list(&gateway, &path).await?;
        }
        Some(Commands::Add { path, tags }) => {
            cmd_add(&gateway, &path, &tags).await?;
        }
        Some(Commands::Remove { path, tags }) => {
            cmd_remove(&gateway, &path, &tags).await?;
        }
        Some(Commands::Set { path, tags }) => {
            cmd_set(&gateway, &path, &tags).await?;
        }
        Some(Commands::Files { path }) => {
            cmd_files(&store, path.or(cli.dir)).await?;
        }
        Some(Commands::Working { action }) => {
            cmd_working(&mut store, action)?;
        }
        Some(Commands::Init) => {}
        None => {
            app::run_tui(config, gateway, Box::new(store), cli.dir).await?;
        }
    }

    Ok(())
}
