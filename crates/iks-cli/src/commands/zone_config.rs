//! Zone configuration report command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ZoneConfigArgs {}

pub async fn run(connect: &ConnectArgs, _args: ZoneConfigArgs) -> Result<()> {
    let session = CliSession::open(connect)?;

    output::note("Generating zone configuration...");
    let report = session
        .service()
        .zone_config()
        .build(session.target())
        .await
        .context("Failed to build zone configuration")?;

    output::json_pretty(&report)?;
    session.persist().await
}
