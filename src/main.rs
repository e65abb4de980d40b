mod alert;
mod app;
mod cli;
mod cli_cmds;
mod gateway;
mod init;
mod logging;
mod preview;
mod session;
mod store;
mod ui;
mod utils;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
