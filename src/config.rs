use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const LOCAL_CONFIG_NAME: &str = "collab-invite.toml";
pub const OWNER_TOKEN_ENV: &str = "COLLAB_INVITE_OWNER_TOKEN";

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct OwnerConfig {
    // Needs admin rights on the repo, it's what sends the invites
    pub token: Option<String>,
    pub username: String,
    pub repo: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct FilesConfig {
    pub tokens: Option<PathBuf>,
    pub token_cache: Option<PathBuf>,
    pub usernames: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct InviteConfig {
    pub permission: Option<String>,
    pub delay_secs: Option<u64>,
    pub gh: Option<String>,
}

// What's stored in collab-invite.toml
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    pub owner: OwnerConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub invite: InviteConfig,
}

impl Config {
    pub fn owner_token(&self) -> Result<String> {
        self.owner.token.clone().ok_or(anyhow!(
            "No owner token configured. Set 'owner.token' in your config file or the ${} environment variable.",
            OWNER_TOKEN_ENV
        ))
    }

    pub fn tokens_path(&self, dir: &Path) -> PathBuf {
        dir.join(
            self.files
                .tokens
                .clone()
                .unwrap_or_else(|| PathBuf::from("tokens.json")),
        )
    }

    pub fn token_cache_path(&self, dir: &Path) -> PathBuf {
        dir.join(
            self.files
                .token_cache
                .clone()
                .unwrap_or_else(|| PathBuf::from("token_cache.json")),
        )
    }

    pub fn usernames_path(&self, dir: &Path) -> PathBuf {
        dir.join(
            self.files
                .usernames
                .clone()
                .unwrap_or_else(|| PathBuf::from("usernames.txt")),
        )
    }

    pub fn permission(&self) -> String {
        self.invite
            .permission
            .clone()
            .unwrap_or_else(|| "push".to_string())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.invite.delay_secs.unwrap_or(2))
    }

    pub fn gh_program(&self) -> String {
        self.invite.gh.clone().unwrap_or_else(|| "gh".to_string())
    }
}

pub fn get_global_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(anyhow!(
        "Can't find your $HOME directory (aka: '~'), which is where collab-invite
looks for a config file when there's no collab-invite.toml in the working
directory. Pass one explicitly with --config instead."
    ))?;

    Ok(Path::new(&home).join(".collab-invite"))
}

/// Picks the config file to use: an explicit path wins, then a
/// collab-invite.toml next to the data files, then ~/.collab-invite/config.
pub fn find_config_file(explicit: Option<PathBuf>, dir: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let local = dir.join(LOCAL_CONFIG_NAME);
    if local.is_file() {
        return Ok(local);
    }

    Ok(get_global_config_dir()?.join("config"))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(contents).context("The config file isn't valid collab-invite TOML")?;

    Ok(config)
}

pub fn read_config(filepath: &Path) -> Result<Config> {
    read_config_with_owner_token(filepath, env::var(OWNER_TOKEN_ENV).ok())
}

/// Like `read_config`, with the value of $COLLAB_INVITE_OWNER_TOKEN passed in.
/// A blank value leaves the file's token alone.
pub fn read_config_with_owner_token(filepath: &Path, env_token: Option<String>) -> Result<Config> {
    let f = fs::read_to_string(filepath)
        .context(format!("Can't read config file {:?}", filepath))?;
    let mut config =
        parse_config(f.as_str()).context(format!("Failed to parse config file {:?}", filepath))?;

    if let Some(tok) = env_token {
        if !tok.trim().is_empty() {
            config.owner.token = Some(tok.trim().to_string());
        }
    }

    Ok(config)
}
