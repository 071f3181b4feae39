use tracing::{info, warn};

use crate::{github::GitHub, store::TokenCache};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Every username a token resolved to, in token order
    pub usernames: Vec<String>,
    /// The subset that came from an API call rather than the cache
    pub fresh: Vec<String>,
    pub failed: usize,
}

/// Maps each token to its username, asking GitHub only for tokens the cache
/// doesn't know yet. New answers are added to `cache`; nothing is ever removed.
/// Tokens GitHub rejects are logged and dropped, they don't stop the pass.
pub async fn resolve_tokens<G: GitHub + ?Sized>(
    client: &G,
    tokens: &[String],
    cache: &mut TokenCache,
) -> Resolution {
    let mut resolution = Resolution::default();
    let total = tokens.len();

    for (i, token) in tokens.iter().enumerate() {
        if let Some(username) = cache.get(token) {
            info!("({}/{}) cached: {}", i + 1, total, username);
            resolution.usernames.push(username.clone());
            continue;
        }

        info!("({}/{}) looking up a new token", i + 1, total);
        match client.username(token).await {
            Ok(username) => {
                info!("found username {}", username);
                cache.insert(token.clone(), username.clone());
                resolution.usernames.push(username.clone());
                resolution.fresh.push(username);
            }
            Err(e) => {
                warn!("skipping token #{}, it's invalid or the API failed: {}", i + 1, e);
                resolution.failed += 1;
            }
        }
    }

    resolution
}
