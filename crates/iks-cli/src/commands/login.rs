//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {}

pub async fn run(connect: &ConnectArgs, _args: LoginArgs) -> Result<()> {
    let session = CliSession::fresh(connect)?;

    output::note("Logging in...");
    session
        .session()
        .ensure_valid_token()
        .await
        .context("Failed to login")?;

    let path = session.save().await.context("Failed to save tokens")?;

    output::success("Logged in successfully");
    output::field("Region", session.session().region());
    output::field("Endpoint", session.session().endpoint().as_str());
    if let Some(path) = path {
        output::field("Tokens", &path.display().to_string());
    }

    Ok(())
}
