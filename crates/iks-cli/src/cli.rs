//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{
    clusters::ClustersCommand, login::LoginArgs, logout::LogoutArgs, token::TokenArgs,
    versions::VersionsArgs, vlans::VlansCommand, workers::WorkersCommand,
    zone_config::ZoneConfigArgs, zones::ZonesArgs,
};

/// Kubernetes container service CLI.
#[derive(Parser, Debug)]
#[command(name = "iks")]
#[command(author, version = env!("IKS_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connect: ConnectArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials, endpoints and request target, shared by every command.
///
/// Flags win over environment variables, which win over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// IAM API key
    #[arg(long, env = "IC_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// IAM username (with --password)
    #[arg(long, env = "IC_USERNAME", global = true)]
    pub username: Option<String>,

    /// IAM password (with --username)
    #[arg(long, env = "IC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Region, e.g. us-south
    #[arg(long, env = "IC_REGION", global = true)]
    pub region: Option<String>,

    /// Container service base URL, overriding the region lookup
    #[arg(long, env = "IKS_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Identity service base URL, overriding the region lookup
    #[arg(long, env = "IKS_IAM_ENDPOINT", global = true)]
    pub iam_endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Polls made by --wait after the first one
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Seconds between polls made by --wait
    #[arg(long, global = true)]
    pub retry_delay: Option<u64>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "IKS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Account id sent as a target header
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Resource group id sent as a target header
    #[arg(long, global = true)]
    pub resource_group: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and show the token
    Token(TokenArgs),

    /// Authenticate and store the token pair for later commands
    Login(LoginArgs),

    /// Remove the stored token pair
    Logout(LogoutArgs),

    /// Cluster operations
    Clusters(ClustersCommand),

    /// Worker operations
    Workers(WorkersCommand),

    /// VLAN operations
    Vlans(VlansCommand),

    /// List supported Kubernetes versions
    Versions(VersionsArgs),

    /// List zones, or the machine types of one zone
    Zones(ZonesArgs),

    /// Print machine types, VLANs and versions for every zone
    ZoneConfig(ZoneConfigArgs),
}
