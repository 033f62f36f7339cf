//! Subcommand implementations.

pub mod clusters;
pub mod login;
pub mod logout;
pub mod token;
pub mod versions;
pub mod vlans;
pub mod workers;
pub mod zone_config;
pub mod zones;

use anyhow::Result;

use crate::cli::{Commands, ConnectArgs};

pub async fn handle(connect: ConnectArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Token(args) => token::run(&connect, args).await,
        Commands::Login(args) => login::run(&connect, args).await,
        Commands::Logout(args) => logout::run(args),
        Commands::Clusters(cmd) => clusters::handle(&connect, cmd).await,
        Commands::Workers(cmd) => workers::handle(&connect, cmd).await,
        Commands::Vlans(cmd) => vlans::handle(&connect, cmd).await,
        Commands::Versions(args) => versions::run(&connect, args).await,
        Commands::Zones(args) => zones::run(&connect, args).await,
        Commands::ZoneConfig(args) => zone_config::run(&connect, args).await,
    }
}
