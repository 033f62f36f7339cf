//! Token command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::ConnectArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Include the access token itself in the output
    #[arg(long)]
    pub show_secret: bool,
}

#[derive(Debug, Serialize)]
struct TokenInfo<'a> {
    region: &'a str,
    endpoint: &'a str,
    identity_endpoint: &'a str,
    expiry: Option<DateTime<Utc>>,
    has_refresh_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

pub async fn run(connect: &ConnectArgs, args: TokenArgs) -> Result<()> {
    let session = CliSession::open(connect)?;
    let inner = session.session();

    let token = inner
        .ensure_valid_token()
        .await
        .context("Failed to authenticate")?;
    let pair = inner.export_tokens().await;

    output::json_pretty(&TokenInfo {
        region: inner.region(),
        endpoint: inner.endpoint().as_str(),
        identity_endpoint: inner.identity_endpoint().as_str(),
        expiry: pair.as_ref().and_then(|p| p.expiry),
        has_refresh_token: pair.as_ref().is_some_and(|p| p.refresh_token.is_some()),
        access_token: args.show_secret.then_some(token.as_str()),
    })?;

    session.persist().await
}
