//! Cluster commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cskit_container::ClusterCreateRequest;
use cskit_container::clusters::STATE_NORMAL;

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ClustersCommand {
    #[command(subcommand)]
    pub command: ClustersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ClustersSubcommand {
    /// List clusters
    List(ListArgs),

    /// Show one cluster
    Get(GetArgs),

    /// Create a cluster
    Create(CreateArgs),

    /// Delete a cluster
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Cluster id or name
    pub cluster: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Cluster name
    #[arg(long)]
    pub name: String,

    /// Datacenter (zone), e.g. dal10
    #[arg(long)]
    pub zone: String,

    /// Worker machine type
    #[arg(long)]
    pub machine_type: String,

    /// Number of workers
    #[arg(long, default_value_t = 1)]
    pub workers: u32,

    /// Public VLAN id
    #[arg(long, default_value = "")]
    pub public_vlan: String,

    /// Private VLAN id
    #[arg(long, default_value = "")]
    pub private_vlan: String,

    /// Kubernetes version for the master
    #[arg(long)]
    pub kube_version: Option<String>,

    /// Poll until the cluster is ready, bounded by --max-retries and --retry-delay
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Cluster id or name
    pub cluster: String,
}

pub async fn handle(connect: &ConnectArgs, cmd: ClustersCommand) -> Result<()> {
    let session = CliSession::open(connect)?;

    match cmd.command {
        ClustersSubcommand::List(args) => list(&session, args).await?,
        ClustersSubcommand::Get(args) => get(&session, args).await?,
        ClustersSubcommand::Create(args) => create(&session, args).await?,
        ClustersSubcommand::Delete(args) => delete(&session, args).await?,
    }

    session.persist().await
}

async fn list(session: &CliSession, args: ListArgs) -> Result<()> {
    let clusters = session
        .service()
        .clusters()
        .list(session.target())
        .await
        .context("Failed to list clusters")?;

    output::json_lines(&clusters, args.pretty, "No clusters found.")
}

async fn get(session: &CliSession, args: GetArgs) -> Result<()> {
    let cluster = session
        .service()
        .clusters()
        .get(&args.cluster, session.target())
        .await
        .with_context(|| format!("Failed to get cluster {}", args.cluster))?;

    output::json_pretty(&cluster)
}

async fn create(session: &CliSession, args: CreateArgs) -> Result<()> {
    let mut request =
        ClusterCreateRequest::new(&args.name, &args.zone, &args.machine_type, args.workers)
            .with_vlans(&args.public_vlan, &args.private_vlan);
    if let Some(version) = &args.kube_version {
        request = request.with_master_version(version);
    }

    let service = session.service();
    let clusters = service.clusters();

    let created = clusters
        .create(&request, session.target())
        .await
        .context("Failed to create cluster")?;
    output::success(&format!("Cluster {} requested", args.name));

    if !args.wait {
        return output::json(&created);
    }

    let policy = session.retry_policy();
    output::note(&format!(
        "Waiting for cluster to become {} (up to {} polls, {}s apart)...",
        STATE_NORMAL,
        policy.max_retries + 1,
        policy.delay.as_secs()
    ));

    let cluster = clusters
        .wait_for_state(&created.id, STATE_NORMAL, policy, session.target())
        .await
        .context("Failed while waiting for cluster")?;

    output::json_pretty(&cluster)?;
    if cluster.state != STATE_NORMAL {
        anyhow::bail!(
            "Cluster {} still {} after {} polls",
            created.id,
            cluster.state,
            policy.max_retries + 1
        );
    }
    Ok(())
}

async fn delete(session: &CliSession, args: DeleteArgs) -> Result<()> {
    session
        .service()
        .clusters()
        .delete(&args.cluster, session.target())
        .await
        .with_context(|| format!("Failed to delete cluster {}", args.cluster))?;

    output::success(&format!("Cluster {} deleted", args.cluster));
    Ok(())
}
