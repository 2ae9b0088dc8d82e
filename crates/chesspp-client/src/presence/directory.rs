use std::sync::RwLock;

use tokio::sync::watch;
use tracing::debug;

use crate::protocol::{LobbyUser, UserStatus};

use super::types::RosterChange;

/// Reconciles server roster snapshots against the locally-known roster.
///
/// The server's snapshots are authoritative for membership, but a snapshot
/// can race a local status change: marking an opponent `Invited` the moment
/// a challenge goes out must survive a snapshot that still says `Online`.
/// Reconciliation is idempotent, so replaying the same snapshot yields no
/// deltas.
pub struct PresenceDirectory {
    local_user: RwLock<String>,
    roster: watch::Sender<Vec<LobbyUser>>,
}

impl PresenceDirectory {
    pub fn new(local_user: impl Into<String>) -> Self {
        let (roster, _) = watch::channel(Vec::new());
        Self {
            local_user: RwLock::new(local_user.into()),
            roster,
        }
    }

    /// Apply a full roster snapshot, returning join/leave deltas.
    ///
    /// The local user's own join is suppressed; the first snapshot after
    /// connecting always contains it and it is not news. A local `Invited`
    /// mark beats a snapshot that still reports the user `Online`.
    pub fn reconcile(&self, snapshot: Vec<LobbyUser>) -> Vec<RosterChange> {
        let mut changes = Vec::new();
        let local_user = self.local_user();

        self.roster.send_modify(|roster| {
            for user in &snapshot {
                if user.username != local_user
                    && !roster.iter().any(|u| u.username == user.username)
                {
                    changes.push(RosterChange::Joined(user.username.clone()));
                }
            }
            for user in roster.iter() {
                if !snapshot.iter().any(|u| u.username == user.username) {
                    changes.push(RosterChange::Left(user.username.clone()));
                }
            }

            let merged: Vec<LobbyUser> = snapshot
                .into_iter()
                .map(|mut user| {
                    let local_invited = roster
                        .iter()
                        .any(|u| u.username == user.username && u.status == UserStatus::Invited);
                    if local_invited && user.status == UserStatus::Online {
                        user.status = UserStatus::Invited;
                    }
                    user
                })
                .collect();
            *roster = merged;
        });

        if !changes.is_empty() {
            debug!(changes = changes.len(), "roster reconciled");
        }
        changes
    }

    /// Set one user's status, inserting them if the roster does not know
    /// them yet.
    pub fn set_status(&self, username: &str, status: UserStatus) {
        self.roster.send_modify(|roster| {
            match roster.iter_mut().find(|u| u.username == username) {
                Some(user) => user.status = status,
                None => roster.push(LobbyUser::new(username, status)),
            }
        });
    }

    /// Look up one user's current status.
    pub fn status_of(&self, username: &str) -> Option<UserStatus> {
        self.roster
            .borrow()
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.status)
    }

    /// Current roster snapshot.
    pub fn roster(&self) -> Vec<LobbyUser> {
        self.roster.borrow().clone()
    }

    /// Change feed for the roster.
    pub fn subscribe(&self) -> watch::Receiver<Vec<LobbyUser>> {
        self.roster.subscribe()
    }

    /// Remove one user from the roster.
    pub fn remove(&self, username: &str) {
        self.roster
            .send_modify(|roster| roster.retain(|u| u.username != username));
    }

    /// Forget everyone. Used when the lobby session is torn down.
    pub fn clear(&self) {
        self.roster.send_replace(Vec::new());
    }

    pub fn local_user(&self) -> String {
        self.local_user
            .read()
            .map(|name| name.clone())
            .unwrap_or_default()
    }

    /// Record that the server accepted a new name for the local user.
    pub fn set_local_user(&self, username: &str) {
        let previous = self.local_user();
        if let Ok(mut name) = self.local_user.write() {
            *name = username.to_string();
        }
        self.roster.send_modify(|roster| {
            if let Some(user) = roster.iter_mut().find(|u| u.username == previous) {
                user.username = username.to_string();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online(name: &str) -> LobbyUser {
        LobbyUser::new(name, UserStatus::Online)
    }

    #[test]
    fn first_snapshot_reports_joins_except_self() {
        let directory = PresenceDirectory::new("alice");
        let changes = directory.reconcile(vec![online("alice"), online("bob")]);
        assert_eq!(changes, vec![RosterChange::Joined("bob".into())]);
    }

    #[test]
    fn diff_reports_joins_and_leaves() {
        let directory = PresenceDirectory::new("carol");
        directory.reconcile(vec![online("alice"), online("bob")]);

        let changes = directory.reconcile(vec![online("bob"), online("dave")]);
        assert_eq!(
            changes,
            vec![
                RosterChange::Joined("dave".into()),
                RosterChange::Left("alice".into()),
            ]
        );
        let names: Vec<_> = directory.roster().iter().map(|u| u.username.clone()).collect();
        assert_eq!(names, vec!["bob", "dave"]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let directory = PresenceDirectory::new("carol");
        let snapshot = vec![online("alice"), online("bob")];
        directory.reconcile(snapshot.clone());
        assert!(directory.reconcile(snapshot).is_empty());
    }

    #[test]
    fn local_invited_survives_stale_snapshot() {
        let directory = PresenceDirectory::new("alice");
        directory.reconcile(vec![online("alice"), online("bob")]);
        directory.set_status("bob", UserStatus::Invited);

        directory.reconcile(vec![online("alice"), online("bob")]);
        assert_eq!(directory.status_of("bob"), Some(UserStatus::Invited));
    }

    #[test]
    fn snapshot_overrides_other_statuses() {
        let directory = PresenceDirectory::new("alice");
        directory.reconcile(vec![online("alice"), online("bob")]);
        directory.set_status("bob", UserStatus::Invited);

        // Server says bob moved on; that wins over the local mark.
        directory.reconcile(vec![
            online("alice"),
            LobbyUser::new("bob", UserStatus::InGame),
        ]);
        assert_eq!(directory.status_of("bob"), Some(UserStatus::InGame));
    }

    #[test]
    fn set_status_inserts_unknown_users() {
        let directory = PresenceDirectory::new("alice");
        directory.set_status("bob", UserStatus::Configuring);
        assert_eq!(directory.status_of("bob"), Some(UserStatus::Configuring));
    }

    #[test]
    fn clear_empties_the_roster() {
        let directory = PresenceDirectory::new("alice");
        directory.reconcile(vec![online("alice"), online("bob")]);
        directory.clear();
        assert!(directory.roster().is_empty());
    }

    #[test]
    fn remove_drops_only_the_named_user() {
        let directory = PresenceDirectory::new("alice");
        directory.reconcile(vec![online("alice"), online("bob")]);
        directory.remove("bob");
        assert_eq!(directory.status_of("bob"), None);
        assert_eq!(directory.status_of("alice"), Some(UserStatus::Online));
    }

    #[test]
    fn renaming_local_user_updates_roster_and_suppression() {
        let directory = PresenceDirectory::new("alice");
        directory.reconcile(vec![online("alice"), online("bob")]);
        directory.set_local_user("alice2");

        assert_eq!(directory.status_of("alice2"), Some(UserStatus::Online));
        assert_eq!(directory.status_of("alice"), None);

        // A fresh snapshot under the new name is not a join.
        let changes = directory.reconcile(vec![online("alice2"), online("bob")]);
        assert!(changes.is_empty());
    }
}
