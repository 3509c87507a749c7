use thiserror::Error;

use crate::models::School;

/// Every way a submission can be turned away. All variants are user-facing
/// and recoverable; the caller renders the message and the voter tries again
/// with a corrected payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("unknown school: {name}")]
    UnknownSchool { name: String },

    #[error("the voting lines are closed")]
    VotingClosed,

    #[error("invalid, unapproved, or already used voting code")]
    InvalidOrUsedCode,

    #[error("a ballot may not award points to the voter's own school ({school})")]
    SelfVote { school: School },

    #[error("point values must match the contest point scale exactly, each used once")]
    MalformedPointSet,

    #[error("recipients must be every school except the voter's own, each exactly once")]
    MalformedRecipientSet,

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("application not found: {id}")]
    UnknownApplication { id: String },
}

impl VoteError {
    /// Stable machine-readable tag for the transport contract.
    pub fn kind(&self) -> &'static str {
        match self {
            VoteError::UnknownSchool { .. } => "unknown_school",
            VoteError::VotingClosed => "voting_closed",
            VoteError::InvalidOrUsedCode => "invalid_or_used_code",
            VoteError::SelfVote { .. } => "self_vote",
            VoteError::MalformedPointSet => "malformed_point_set",
            VoteError::MalformedRecipientSet => "malformed_recipient_set",
            VoteError::MissingField { .. } => "missing_field",
            VoteError::UnknownApplication { .. } => "unknown_application",
        }
    }
}
