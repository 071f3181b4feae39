use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, HashSet},
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};
use tracing::warn;

/// token -> username, as stored in token_cache.json
pub type TokenCache = BTreeMap<String, String>;

/// Loads the token cache. A missing file is an empty cache, and so is a
/// corrupt one: the cache only saves API calls, it's never the source of truth.
pub fn read_token_cache(filepath: &Path) -> Result<TokenCache> {
    let f = match fs::read_to_string(filepath) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TokenCache::new()),
        Err(e) => return Err(e).context(format!("Can't read token cache {:?}", filepath)),
    };

    match serde_json::from_str::<TokenCache>(f.as_str()) {
        Ok(cache) => Ok(cache),
        Err(e) => {
            warn!(
                "Ignoring token cache {:?}, it isn't a JSON object of strings: {}",
                filepath, e
            );
            Ok(TokenCache::new())
        }
    }
}

pub fn write_token_cache(filepath: &Path, cache: &TokenCache) -> Result<()> {
    let json = serde_json::to_string_pretty(cache).context("Failed to serialize the token cache")?;

    fs::write(filepath, json).context(format!("Failed to write token cache {:?}", filepath))?;

    Ok(())
}

pub fn read_usernames(filepath: &Path) -> Result<HashSet<String>> {
    let f = match fs::read_to_string(filepath) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e).context(format!("Can't read usernames file {:?}", filepath)),
    };

    Ok(f.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Appends one username per line. The file is only ever appended to.
pub fn append_usernames(filepath: &Path, usernames: &[String]) -> Result<()> {
    if usernames.is_empty() {
        return Ok(());
    }

    // A previous writer may have left the last line unterminated
    let needs_newline = match fs::read(filepath) {
        Ok(existing) => !existing.is_empty() && !existing.ends_with(b"\n"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e).context(format!("Can't read usernames file {:?}", filepath)),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(filepath)
        .context(format!("Failed to open usernames file {:?}", filepath))?;

    let mut buf = String::new();
    if needs_newline {
        buf.push('\n');
    }
    for username in usernames {
        buf.push_str(username);
        buf.push('\n');
    }

    file.write_all(buf.as_bytes())
        .context(format!("Failed to append to usernames file {:?}", filepath))?;

    Ok(())
}
