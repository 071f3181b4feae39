use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::{
    config::Config,
    github::{GitHub, TargetRepo},
    invite::{invite_targets, send_invites, InviteReport},
    resolve::resolve_tokens,
    store::{append_usernames, read_token_cache, read_usernames, write_token_cache},
    tokens::read_tokens,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tokens: usize,
    pub resolved: Vec<String>,
    pub unresolved: usize,
    pub recorded: Vec<String>,
    pub invites: InviteReport,
}

/// The whole job: resolve every token in `dir`'s tokens file, save the cache,
/// record usernames we haven't seen before and invite them.
pub async fn run_inviter<G: GitHub + ?Sized>(
    client: &G,
    config: &Config,
    dir: &Path,
) -> Result<RunSummary> {
    let tokens_path = config.tokens_path(dir);
    let cache_path = config.token_cache_path(dir);
    let usernames_path = config.usernames_path(dir);

    let tokens = read_tokens(&tokens_path)?;
    info!("read {} token(s) from {:?}", tokens.len(), tokens_path);

    let mut cache = read_token_cache(&cache_path)?;
    let known = read_usernames(&usernames_path)?;
    info!(
        "{} username(s) already recorded in {:?}",
        known.len(),
        usernames_path
    );

    let resolution = resolve_tokens(client, &tokens, &mut cache).await;

    write_token_cache(&cache_path, &cache).context("Failed to save the token cache")?;
    info!("token cache saved to {:?}", cache_path);

    // Only names GitHub just told us about get recorded. A cached name missing
    // from the usernames file keeps getting invited until it's added by hand.
    let discovered = invite_targets(&resolution.fresh, &known);
    append_usernames(&usernames_path, &discovered)
        .context("Failed to record the new usernames")?;
    if !discovered.is_empty() {
        info!(
            "recorded {} new username(s) in {:?}",
            discovered.len(),
            usernames_path
        );
    }

    let targets = invite_targets(&resolution.usernames, &known);
    if targets.is_empty() {
        info!("every username is already recorded, nothing to invite");
    }

    let repo = TargetRepo {
        owner: config.owner.username.clone(),
        name: config.owner.repo.clone(),
    };
    let invites = send_invites(client, &targets, &repo, config.delay()).await;

    Ok(RunSummary {
        tokens: tokens.len(),
        resolved: resolution.usernames,
        unresolved: resolution.failed,
        recorded: discovered,
        invites,
    })
}
