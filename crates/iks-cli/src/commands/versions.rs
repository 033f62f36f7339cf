//! Versions command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Group versions by platform
    #[arg(long)]
    pub by_platform: bool,
}

pub async fn run(connect: &ConnectArgs, args: VersionsArgs) -> Result<()> {
    let session = CliSession::open(connect)?;
    let service = session.service();
    let versions = service.kube_versions();

    if args.by_platform {
        let map = versions
            .list_v1(session.target())
            .await
            .context("Failed to list versions")?;
        output::json_pretty(&map)?;
    } else {
        let list = versions
            .list(session.target())
            .await
            .context("Failed to list versions")?;
        output::json_lines(&list, false, "No versions found.")?;
    }

    session.persist().await
}
