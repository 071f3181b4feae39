use itertools::Itertools;
use std::{collections::HashSet, time::Duration};
use tracing::{info, warn};

use crate::github::{GitHub, TargetRepo};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InviteReport {
    pub invited: Vec<String>,
    pub failed: Vec<String>,
    pub skipped_owner: Vec<String>,
}

impl InviteReport {
    pub fn attempts(&self) -> usize {
        self.invited.len() + self.failed.len()
    }
}

/// Usernames that resolved but aren't in the known set, first-seen order, no repeats.
pub fn invite_targets(resolved: &[String], known: &HashSet<String>) -> Vec<String> {
    resolved
        .iter()
        .filter(|u| !known.contains(*u))
        .unique()
        .cloned()
        .collect()
}

/// Invites each target one at a time, waiting `delay` between calls. A failed
/// invite usually means they're already a collaborator or the account is gone;
/// either way it's logged and the rest still go out.
pub async fn send_invites<G: GitHub + ?Sized>(
    client: &G,
    targets: &[String],
    repo: &TargetRepo,
    delay: Duration,
) -> InviteReport {
    let mut report = InviteReport::default();

    for username in targets {
        if username.to_lowercase() == repo.owner.to_lowercase() {
            info!("skipping @{}, they own the repository", username);
            report.skipped_owner.push(username.clone());
            continue;
        }

        if report.attempts() > 0 {
            tokio::time::sleep(delay).await;
        }

        info!("inviting @{}", username);
        match client.add_collaborator(repo, username).await {
            Ok(()) => {
                info!("invited @{}", username);
                report.invited.push(username.clone());
            }
            Err(e) => {
                warn!(
                    "couldn't invite @{} (maybe already a collaborator, or the user doesn't exist): {}",
                    username, e
                );
                report.failed.push(username.clone());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, time::Duration};

    use crate::{
        fake::FakeGitHub,
        github::TargetRepo,
        invite::{invite_targets, send_invites},
    };

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    fn repo() -> TargetRepo {
        TargetRepo {
            owner: "Octocat".to_string(),
            name: "hello-world".to_string(),
        }
    }

    #[test]
    fn test_targets_exclude_known_and_repeats() {
        let known: HashSet<String> = names(&["bob"]).into_iter().collect();

        let targets = invite_targets(&names(&["carol", "bob", "alice", "carol"]), &known);

        assert_eq!(targets, vec!["carol", "alice"]);
    }

    #[tokio::test]
    async fn test_one_attempt_per_new_username() {
        let gh = FakeGitHub::new();
        let targets = invite_targets(&names(&["alice", "bob", "carol"]), &HashSet::new());

        let report = send_invites(&gh, &targets, &repo(), Duration::ZERO).await;

        assert_eq!(gh.invites(), vec!["alice", "bob", "carol"]);
        assert_eq!(report.attempts(), 3);
    }

    #[tokio::test]
    async fn test_owner_is_never_invited() {
        let gh = FakeGitHub::new();
        let targets = names(&["alice", "octocat", "bob"]);

        let report = send_invites(&gh, &targets, &repo(), Duration::ZERO).await;

        assert_eq!(gh.invites(), vec!["alice", "bob"]);
        assert_eq!(report.skipped_owner, vec!["octocat"]);
    }

    #[tokio::test]
    async fn test_failures_dont_stop_the_rest() {
        let gh = FakeGitHub::new().rejecting("alice");

        let report = send_invites(&gh, &names(&["alice", "bob"]), &repo(), Duration::ZERO).await;

        assert_eq!(report.failed, vec!["alice"]);
        assert_eq!(report.invited, vec!["bob"]);
        assert_eq!(report.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invites_are_paced() {
        let gh = FakeGitHub::new();
        let start = tokio::time::Instant::now();

        send_invites(
            &gh,
            &names(&["alice", "octocat", "bob", "carol"]),
            &repo(),
            Duration::from_secs(2),
        )
        .await;

        // three calls, two pauses; the owner costs nothing
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(5));
    }
}
