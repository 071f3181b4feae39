use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use collab_invite::{
    config::{find_config_file, read_config},
    github::GhCli,
    run_inviter,
};

/// Looks up the GitHub account behind every token in tokens.json and
/// invites the ones we haven't seen before as collaborators.
///
/// Run it without arguments from the folder holding tokens.json.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Config file to use instead of ./collab-invite.toml or ~/.collab-invite/config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder holding tokens.json, token_cache.json and usernames.txt
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let dir = match opts.dir {
        Some(d) => d,
        None => env::current_dir()?,
    };

    let config_path = find_config_file(opts.config, &dir)?;
    let config = read_config(&config_path)
        .context(format!("Failed to load the config from {:?}", config_path))?;

    let client = GhCli::new(
        config.gh_program(),
        config.owner_token()?,
        config.permission(),
    );

    let summary = run_inviter(&client, &config, &dir).await?;

    // Not a debug log, this is the output of this command
    println!(
        "{} token(s): {} resolved, {} failed. {} new username(s), {} invited, {} invite(s) failed.",
        summary.tokens,
        summary.resolved.len(),
        summary.unresolved,
        summary.recorded.len(),
        summary.invites.invited.len(),
        summary.invites.failed.len(),
    );

    Ok(())
}
