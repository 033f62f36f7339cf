//! Zones command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ZonesArgs {
    /// List the machine types of this zone instead of the zones
    #[arg(long)]
    pub machine_types: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(connect: &ConnectArgs, args: ZonesArgs) -> Result<()> {
    let session = CliSession::open(connect)?;
    let service = session.service();
    let zones = service.zones();

    match args.machine_types.as_deref() {
        Some(zone) => {
            let flavors = zones
                .machine_types(zone, session.target())
                .await
                .context("Failed to list machine types")?;
            output::json_lines(&flavors, args.pretty, "No machine types found.")?;
        }
        None => {
            let list = zones
                .list(session.target())
                .await
                .context("Failed to list zones")?;
            output::json_lines(&list, args.pretty, "No zones found.")?;
        }
    }

    session.persist().await
}
