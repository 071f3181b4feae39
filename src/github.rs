use async_trait::async_trait;
use std::process::Output;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GhError {
    #[error("Failed to run '{program}'. Is the GitHub CLI installed and on your $PATH? ({source})")]
    FailedToSpawn {
        program: String,
        source: std::io::Error,
    },
    #[error("'{command}' failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error("'{command}' succeeded but printed nothing")]
    EmptyOutput { command: String },
}

/// The repository collaborators get added to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRepo {
    pub owner: String,
    pub name: String,
}

impl TargetRepo {
    pub fn collaborator_endpoint(&self, username: &str) -> String {
        format!("repos/{}/{}/collaborators/{}", self.owner, self.name, username)
    }
}

#[async_trait]
pub trait GitHub {
    /// The login of the account that owns `token`.
    async fn username(&self, token: &str) -> Result<String, GhError>;

    /// Invites `username` to `repo` with the elevated owner token.
    async fn add_collaborator(&self, repo: &TargetRepo, username: &str) -> Result<(), GhError>;
}

/// Talks to GitHub through the `gh` CLI, passing credentials in $GH_TOKEN.
#[derive(Clone, Debug)]
pub struct GhCli {
    program: String,
    owner_token: String,
    permission: String,
}

impl GhCli {
    pub fn new(program: String, owner_token: String, permission: String) -> GhCli {
        GhCli {
            program,
            owner_token,
            permission,
        }
    }

    async fn run(&self, token: &str, args: &[&str]) -> Result<String, GhError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("running {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .env("GH_TOKEN", token)
            .output()
            .await
            .map_err(|source| GhError::FailedToSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GhError::CommandFailed {
                command,
                message: failure_message(&output),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn failure_message(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    format!("{} {}", stdout.trim(), stderr.trim())
        .trim()
        .to_string()
}

#[async_trait]
impl GitHub for GhCli {
    async fn username(&self, token: &str) -> Result<String, GhError> {
        let args = ["api", "user", "--jq", ".login"];
        let login = self.run(token, &args).await?;

        if login.is_empty() {
            return Err(GhError::EmptyOutput {
                command: format!("{} {}", self.program, args.join(" ")),
            });
        }

        Ok(login)
    }

    async fn add_collaborator(&self, repo: &TargetRepo, username: &str) -> Result<(), GhError> {
        let permission = format!("permission={}", self.permission);
        let endpoint = repo.collaborator_endpoint(username);

        self.run(
            &self.owner_token,
            &["api", "--silent", "-X", "PUT", "-f", &permission, &endpoint],
        )
        .await?;

        Ok(())
    }
}
