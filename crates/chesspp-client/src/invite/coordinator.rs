use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use chesspp_common::{new_challenge_id, ApplicationError};

use crate::protocol::UserStatus;

use super::types::{eligible, Invite, InviteState};

/// Tracks the single active challenge and its countdown.
///
/// Incoming challenges tick down once a second on the active-invite feed;
/// hitting zero clears the invite and emits it on the expiry channel, where
/// the router turns it into a decline. Any answer, local or remote, stops
/// the countdown.
pub struct InviteCoordinator {
    countdown_secs: u64,
    active: watch::Sender<Option<Invite>>,
    expired_tx: mpsc::Sender<Invite>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl InviteCoordinator {
    /// Returns the coordinator and the feed of challenges that expired
    /// unanswered.
    pub fn new(countdown_secs: u64) -> (Self, mpsc::Receiver<Invite>) {
        let (active, _) = watch::channel(None);
        let (expired_tx, expired_rx) = mpsc::channel(8);
        let coordinator = Self {
            countdown_secs,
            active,
            expired_tx,
            timer: Mutex::new(None),
        };
        (coordinator, expired_rx)
    }

    /// Issue an outgoing challenge. Fails when either side's presence
    /// status rules it out.
    pub fn issue(
        &self,
        inviter: &str,
        invitee: &str,
        inviter_status: UserStatus,
        invitee_status: UserStatus,
    ) -> Result<Invite, ApplicationError> {
        if !eligible(inviter_status, invitee_status) {
            return Err(ApplicationError::InviteIneligible(invitee.to_string()));
        }

        self.stop_timer();
        let invite = Invite {
            id: new_challenge_id(),
            inviter: inviter.to_string(),
            invitee: invitee.to_string(),
            remaining_secs: 0,
            state: InviteState::Pending,
        };
        info!(invitee, challenge_id = %invite.id, "challenge issued");
        self.active.send_replace(Some(invite.clone()));
        Ok(invite)
    }

    /// Register an incoming challenge and start its countdown. A challenge
    /// already on screen is replaced and returned so the caller can decline
    /// it on the wire.
    pub fn receive(&self, challenger: &str, invitee: &str, id: &str) -> Option<Invite> {
        self.stop_timer();
        let replaced = self.active.send_replace(Some(Invite {
            id: id.to_string(),
            inviter: challenger.to_string(),
            invitee: invitee.to_string(),
            remaining_secs: self.countdown_secs,
            state: InviteState::Pending,
        }));
        info!(challenger, challenge_id = id, "challenge received");

        let active = self.active.clone();
        let expired_tx = self.expired_tx.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;

                let mut expired = None;
                active.send_modify(|slot| {
                    if let Some(invite) = slot {
                        invite.remaining_secs = invite.remaining_secs.saturating_sub(1);
                        if invite.remaining_secs == 0 {
                            invite.state = InviteState::Expired;
                            expired = slot.take();
                        }
                    }
                });

                if let Some(invite) = expired {
                    debug!(challenge_id = %invite.id, "challenge expired");
                    let _ = expired_tx.send(invite).await;
                    return;
                }
            }
        });
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(old) = slot.replace(task) {
                old.abort();
            }
        }

        replaced.filter(|invite| invite.state == InviteState::Pending)
    }

    /// Answer the active challenge. Stops the countdown and clears the
    /// invite.
    pub fn respond(&self, accept: bool) -> Result<Invite, ApplicationError> {
        self.stop_timer();
        let mut invite = self
            .active
            .send_replace(None)
            .ok_or(ApplicationError::NoActiveInvite)?;
        invite.state = if accept {
            InviteState::Accepted
        } else {
            InviteState::Declined
        };
        Ok(invite)
    }

    /// The remote side answered our outgoing challenge.
    pub fn resolve_remote(&self, accepted: bool) -> Option<Invite> {
        self.stop_timer();
        self.active.send_replace(None).map(|mut invite| {
            invite.state = if accepted {
                InviteState::Accepted
            } else {
                InviteState::Declined
            };
            invite
        })
    }

    /// The currently active challenge, if any.
    pub fn active(&self) -> Option<Invite> {
        self.active.borrow().clone()
    }

    /// Change feed for the active challenge; countdown ticks arrive here.
    pub fn subscribe(&self) -> watch::Receiver<Option<Invite>> {
        self.active.subscribe()
    }

    /// Drop whatever challenge is active without answering it.
    pub fn clear(&self) {
        self.stop_timer();
        self.active.send_replace(None);
    }

    fn stop_timer(&self) {
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}

impl Drop for InviteCoordinator {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn unanswered_challenge_expires_into_a_decline() {
        let (coordinator, mut expired_rx) = InviteCoordinator::new(5);
        coordinator.receive("alice", "bob", "ch-1");

        let expired = expired_rx.recv().await.unwrap();
        assert_eq!(expired.id, "ch-1");
        assert_eq!(expired.state, InviteState::Expired);
        assert!(coordinator.active().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_are_visible() {
        let (coordinator, _expired_rx) = InviteCoordinator::new(5);
        let mut feed = coordinator.subscribe();
        coordinator.receive("alice", "bob", "ch-1");

        let seen = feed
            .wait_for(|slot| {
                slot.as_ref()
                    .is_some_and(|invite| invite.remaining_secs <= 3)
            })
            .await
            .unwrap();
        assert_eq!(seen.as_ref().unwrap().state, InviteState::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn answering_stops_the_countdown() {
        let (coordinator, mut expired_rx) = InviteCoordinator::new(5);
        coordinator.receive("alice", "bob", "ch-1");

        let answered = coordinator.respond(true).unwrap();
        assert_eq!(answered.state, InviteState::Accepted);
        assert!(coordinator.active().is_none());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(expired_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_challenge_replaces_and_silences_the_old_one() {
        let (coordinator, mut expired_rx) = InviteCoordinator::new(5);
        coordinator.receive("alice", "carol", "ch-1");

        let replaced = coordinator.receive("bob", "carol", "ch-2").unwrap();
        assert_eq!(replaced.id, "ch-1");

        // Only the replacement may expire.
        let expired = expired_rx.recv().await.unwrap();
        assert_eq!(expired.id, "ch-2");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(expired_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn issue_requires_eligibility() {
        let (coordinator, _expired_rx) = InviteCoordinator::new(5);

        let err = coordinator
            .issue("alice", "bob", UserStatus::Online, UserStatus::InGame)
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InviteIneligible(_)));
        assert!(coordinator.active().is_none());

        let invite = coordinator
            .issue("alice", "bob", UserStatus::Online, UserStatus::Online)
            .unwrap();
        assert_eq!(invite.state, InviteState::Pending);
        assert_eq!(coordinator.active().unwrap().id, invite.id);
    }

    #[tokio::test]
    async fn remote_answer_resolves_our_challenge() {
        let (coordinator, _expired_rx) = InviteCoordinator::new(5);
        coordinator
            .issue("alice", "bob", UserStatus::Online, UserStatus::Online)
            .unwrap();

        let resolved = coordinator.resolve_remote(false).unwrap();
        assert_eq!(resolved.state, InviteState::Declined);
        assert!(coordinator.active().is_none());
    }

    #[tokio::test]
    async fn respond_without_active_challenge_fails() {
        let (coordinator, _expired_rx) = InviteCoordinator::new(5);
        assert!(matches!(
            coordinator.respond(false),
            Err(ApplicationError::NoActiveInvite)
        ));
    }
}
