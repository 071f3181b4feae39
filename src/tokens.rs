use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

// What's stored in tokens.json
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct TokenList {
    pub tokens: Vec<String>,
}

/// Reads the credential list. Unlike the cache and the usernames file this one
/// has no sensible fallback, so a missing or malformed file stops the run.
pub fn read_tokens(filepath: &Path) -> Result<Vec<String>> {
    let f = fs::read_to_string(filepath).context(format!(
        "Can't read {:?}. Make sure it exists and looks like {{\"tokens\": [\"ghp_...\"]}}",
        filepath
    ))?;
    let list: TokenList = serde_json::from_str(f.as_str()).context(format!(
        "{:?} isn't a JSON object with a 'tokens' array of strings",
        filepath
    ))?;

    Ok(list.tokens)
}
