//! Worker commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct WorkersCommand {
    #[command(subcommand)]
    pub command: WorkersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkersSubcommand {
    /// List the workers of a cluster
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Cluster id or name
    #[arg(long)]
    pub cluster: String,

    /// Only workers of this pool
    #[arg(long)]
    pub pool: Option<String>,

    /// Include deleted workers
    #[arg(long)]
    pub show_deleted: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn handle(connect: &ConnectArgs, cmd: WorkersCommand) -> Result<()> {
    match cmd.command {
        WorkersSubcommand::List(args) => list(connect, args).await,
    }
}

async fn list(connect: &ConnectArgs, args: ListArgs) -> Result<()> {
    let session = CliSession::open(connect)?;
    let service = session.service();
    let workers = service.workers();

    let list = match args.pool.as_deref() {
        Some(pool) => {
            workers
                .list_by_worker_pool(&args.cluster, pool, args.show_deleted, session.target())
                .await
        }
        None => {
            workers
                .list_workers(&args.cluster, args.show_deleted, session.target())
                .await
        }
    }
    .context("Failed to list workers")?;

    output::json_lines(&list, args.pretty, "No workers found.")?;
    session.persist().await
}
