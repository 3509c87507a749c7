use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::VoteLedger;
use crate::models::{PointScale, Roster, School};

/// Per voting school, the jury points it hands to every other school after
/// its received averages are re-ranked onto the point scale.
pub type JuryRankings = HashMap<School, HashMap<School, u32>>;

/// One row of the final result, as handed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalStanding {
    pub school: School,
    pub points: u32,
}

/// Derive each voting school's jury ranking from the ledger. Schools without
/// a ballot are skipped entirely; they contribute nothing to any total.
///
/// For every recipient the points are averaged over the ballots in the
/// school's ledger slot (a single ballot under the standard configuration),
/// the recipients are ordered by descending average, and the scale is applied
/// by rank. The sort is stable, so ties keep roster enumeration order.
pub fn compute_jury_rankings(
    ledger: &VoteLedger,
    roster: &Roster,
    scale: &PointScale,
) -> JuryRankings {
    let mut rankings = JuryRankings::new();

    for school in roster.iter() {
        let ballots = ledger.ballots_for(&school);
        if ballots.is_empty() {
            continue;
        }

        let others: Vec<School> = roster.iter().filter(|s| *s != school).collect();

        let mut averages: HashMap<School, f64> = HashMap::with_capacity(others.len());
        for recipient in &others {
            let total: f64 = ballots
                .iter()
                .map(|ballot| f64::from(ballot.points_for(recipient).unwrap_or(0)))
                .sum();
            averages.insert(recipient.clone(), total / ballots.len() as f64);
        }

        let mut ranked = others;
        ranked.sort_by(|a, b| {
            averages[b]
                .partial_cmp(&averages[a])
                .unwrap_or(Ordering::Equal)
        });

        let jury_points: HashMap<School, u32> = ranked
            .into_iter()
            .enumerate()
            .map(|(rank, recipient)| (recipient, scale.for_rank(rank)))
            .collect();

        rankings.insert(school, jury_points);
    }

    rankings
}

/// Sum the jury points per recipient into the final standings. Every roster
/// school starts at zero, so a school nobody awarded points to still shows
/// up at the bottom. The descending sort is stable; ties keep roster
/// enumeration order, with no secondary numeric tie-break.
pub fn compute_final_result(rankings: &JuryRankings, roster: &Roster) -> Vec<FinalStanding> {
    let mut standings: Vec<FinalStanding> = roster
        .iter()
        .map(|school| FinalStanding { school, points: 0 })
        .collect();
    let index: HashMap<School, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, school)| (school, i))
        .collect();

    for jury_points in rankings.values() {
        for (recipient, &points) in jury_points {
            if let Some(&i) = index.get(recipient) {
                standings[i].points += points;
            }
        }
    }

    standings.sort_by(|a, b| b.points.cmp(&a.points));
    standings
}
