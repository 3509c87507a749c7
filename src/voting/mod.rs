pub mod jury;
pub mod validator;

pub use jury::{FinalStanding, JuryRankings, compute_final_result, compute_jury_rankings};
pub use validator::validate_ballot;
