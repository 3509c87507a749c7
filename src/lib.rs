//! Ballot validation and jury aggregation for a school-festival contest.
//!
//! Each participating school casts exactly one ranked-points ballot for the
//! other schools; a per-school moderator approves applicants, who receive a
//! one-time voting code; the aggregator folds the accepted ballots into
//! Eurovision-style jury rankings and a final total. Transport, photo
//! storage, and mail delivery live with the host; this crate owns the state
//! and the arithmetic.

pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod voting;

pub use error::VoteError;
pub use handlers::Contest;
pub use ledger::VoteLedger;
pub use models::{
    Application, ApplicationStatus, Ballot, PointScale, REFERENCE_SCHOOLS, ReviewAction, Roster,
    School, VotePayload, VoteResponse,
};
pub use registry::ApplicationRegistry;
pub use voting::{
    FinalStanding, JuryRankings, compute_final_result, compute_jury_rankings, validate_ballot,
};
