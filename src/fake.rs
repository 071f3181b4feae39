use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use crate::github::{GhError, GitHub, TargetRepo};

/// In-memory GitHub that records every call it gets.
#[derive(Default)]
pub struct FakeGitHub {
    logins: HashMap<String, String>,
    rejected: HashSet<String>,
    lookups: Mutex<Vec<String>>,
    invites: Mutex<Vec<String>>,
}

impl FakeGitHub {
    pub fn new() -> FakeGitHub {
        FakeGitHub::default()
    }

    pub fn with_login(mut self, token: &str, username: &str) -> FakeGitHub {
        self.logins.insert(token.to_string(), username.to_string());
        self
    }

    /// Invites to `username` fail, like they do for existing collaborators.
    pub fn rejecting(mut self, username: &str) -> FakeGitHub {
        self.rejected.insert(username.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn invites(&self) -> Vec<String> {
        self.invites.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitHub for FakeGitHub {
    async fn username(&self, token: &str) -> Result<String, GhError> {
        self.lookups.lock().unwrap().push(token.to_string());

        self.logins
            .get(token)
            .cloned()
            .ok_or_else(|| GhError::CommandFailed {
                command: "gh api user --jq .login".to_string(),
                message: "HTTP 401: Bad credentials".to_string(),
            })
    }

    async fn add_collaborator(&self, repo: &TargetRepo, username: &str) -> Result<(), GhError> {
        self.invites.lock().unwrap().push(username.to_string());

        if self.rejected.contains(username) {
            return Err(GhError::CommandFailed {
                command: format!("gh api -X PUT {}", repo.collaborator_endpoint(username)),
                message: "HTTP 422: Validation Failed".to_string(),
            });
        }

        Ok(())
    }
}
