//! VLAN commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct VlansCommand {
    #[command(subcommand)]
    pub command: VlansSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VlansSubcommand {
    /// List the VLANs of a datacenter
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Datacenter (zone), e.g. dal10
    #[arg(long)]
    pub zone: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn handle(connect: &ConnectArgs, cmd: VlansCommand) -> Result<()> {
    match cmd.command {
        VlansSubcommand::List(args) => list(connect, args).await,
    }
}

async fn list(connect: &ConnectArgs, args: ListArgs) -> Result<()> {
    let session = CliSession::open(connect)?;

    let vlans = session
        .service()
        .vlans()
        .list(&args.zone, session.target())
        .await
        .context("Failed to list VLANs")?;

    output::json_lines(&vlans, args.pretty, "No VLANs found.")?;
    session.persist().await
}
