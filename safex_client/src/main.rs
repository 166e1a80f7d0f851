use std::process::ExitCode;

use clap::Parser;
use safex_client::frameworks::runtime::init_tracing;
use safex_client::{Cli, ClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = ClientConfig::load()?;
    init_tracing();
    safex_client::run(cli, config).await
}
