use std::collections::HashMap;

use crate::error::VoteError;
use crate::models::{Ballot, PointScale, Roster};

/// Check a submitted point distribution for a voting school and turn it into
/// an accepted `Ballot`. Checks run in a fixed order and the first failure
/// wins, so callers always get the most specific rejection reason:
///
/// 1. the voter is on the roster;
/// 2. the distribution is present at all;
/// 3. the voter's own school received no points, under any spelling;
/// 4. the values are exactly the contest scale, each used once;
/// 5. the recipients are exactly every other roster school.
pub fn validate_ballot(
    roster: &Roster,
    scale: &PointScale,
    voter: &str,
    distribution: &HashMap<String, i64>,
) -> Result<Ballot, VoteError> {
    let voter = roster
        .resolve(voter)
        .ok_or_else(|| VoteError::UnknownSchool {
            name: voter.to_string(),
        })?;

    if distribution.is_empty() {
        return Err(VoteError::MissingField {
            field: "distribution",
        });
    }

    for key in distribution.keys() {
        if roster.resolve(key).is_some_and(|school| school == voter) {
            return Err(VoteError::SelfVote {
                school: voter.clone(),
            });
        }
    }

    let values: Vec<i64> = distribution.values().copied().collect();
    if !scale.matches(&values) {
        return Err(VoteError::MalformedPointSet);
    }

    // Normalize the recipient keys. Every key must resolve, resolve uniquely,
    // and together they must cover the whole roster minus the voter.
    let mut points = HashMap::with_capacity(distribution.len());
    for (key, &value) in distribution {
        let recipient = roster.resolve(key).ok_or_else(|| VoteError::UnknownSchool {
            name: key.clone(),
        })?;
        // Scale values are non-negative, so the cast is exact.
        if points.insert(recipient, value as u32).is_some() {
            return Err(VoteError::MalformedRecipientSet);
        }
    }
    if points.len() != roster.len() - 1 {
        return Err(VoteError::MalformedRecipientSet);
    }

    Ok(Ballot::new(voter, points))
}
