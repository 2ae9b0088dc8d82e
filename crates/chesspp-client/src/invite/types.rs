use crate::protocol::UserStatus;

/// Where a challenge currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteState {
    Pending,
    Accepted,
    Declined,
    Expired,
}

/// One challenge, incoming or outgoing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub id: String,
    pub inviter: String,
    pub invitee: String,
    pub remaining_secs: u64,
    pub state: InviteState,
}

/// Whether `inviter` may challenge `invitee` right now.
///
/// A user who already has a challenge out may re-challenge (their own
/// status reads `Invited`), but the target must be plainly online.
pub fn eligible(inviter: UserStatus, invitee: UserStatus) -> bool {
    matches!(inviter, UserStatus::Online | UserStatus::Invited)
        && invitee == UserStatus::Online
}
