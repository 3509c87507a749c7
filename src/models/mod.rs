use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::error::VoteError;

// The twelve schools of the reference deployment, in enumeration order.
// Enumeration order doubles as the tie-break order for rankings.
pub const REFERENCE_SCHOOLS: [&str; 12] = [
    "Antwerpen",
    "Arnhem",
    "ATKA",
    "Brussel",
    "Den Bosch",
    "Filmacademie",
    "Gent",
    "Leuven",
    "Maastricht",
    "Rotterdam",
    "Tilburg",
    "Utrecht",
];

/// A contest participant, always the canonical spelling from the roster.
/// Only a `Roster` can mint one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct School(String);

impl School {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed, ordered set of schools taking part in the contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    schools: Vec<String>,
}

impl Roster {
    pub fn new(names: &[&str]) -> Self {
        Self {
            schools: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The roster of the reference deployment.
    pub fn reference() -> Self {
        Self::new(&REFERENCE_SCHOOLS)
    }

    /// Normalize a free-form name to its canonical roster entry,
    /// case-insensitively. The single place raw strings become `School`s.
    pub fn resolve(&self, name: &str) -> Option<School> {
        let name = name.trim();
        self.schools
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .map(|s| School(s.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = School> + '_ {
        self.schools.iter().map(|s| School(s.clone()))
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }
}

/// The fixed descending point sequence a ballot hands out, one value per
/// recipient school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PointScale(Vec<u32>);

impl PointScale {
    /// Values are kept descending and distinct.
    pub fn new(mut values: Vec<u32>) -> Self {
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.dedup();
        Self(values)
    }

    /// The classic 12-10-8-...-0 jury scale.
    pub fn eurovision() -> Self {
        Self(vec![12, 10, 8, 7, 6, 5, 4, 3, 2, 1, 0])
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points awarded at a rank position; ranks past the end get 0.
    pub fn for_rank(&self, rank: usize) -> u32 {
        self.0.get(rank).copied().unwrap_or(0)
    }

    /// Exact multiset match: same count, the 0 present, every scale value
    /// used exactly once.
    pub fn matches(&self, values: &[i64]) -> bool {
        values.len() == self.0.len()
            && values.contains(&0)
            && self
                .0
                .iter()
                .all(|&p| values.iter().filter(|&&v| v == i64::from(p)).count() == 1)
    }
}

/// One school's accepted point distribution over all other schools.
/// Produced only by the ballot validator.
#[derive(Debug, Clone, Serialize)]
pub struct Ballot {
    pub voter: School,
    points: HashMap<School, u32>,
    pub submitted_at: DateTime<Utc>,
}

impl Ballot {
    pub(crate) fn new(voter: School, points: HashMap<School, u32>) -> Self {
        Self {
            voter,
            points,
            submitted_at: Utc::now(),
        }
    }

    pub fn points_for(&self, recipient: &School) -> Option<u32> {
        self.points.get(recipient).copied()
    }

    pub fn points(&self) -> &HashMap<School, u32> {
        &self.points
    }
}

/// Raw vote submission as the transport layer hands it over.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VotePayload {
    pub school: Option<String>,
    pub code: Option<String>,
    pub distribution: Option<HashMap<String, i64>>,
}

/// Tagged outcome returned to the transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<School, VoteError>> for VoteResponse {
    fn from(result: Result<School, VoteError>) -> Self {
        match result {
            Ok(_) => Self {
                accepted: true,
                reason: None,
                message: None,
            },
            Err(err) => Self {
                accepted: false,
                reason: Some(err.kind().to_string()),
                message: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    New,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// A participant's request to vote, pending moderator review. The photo
/// itself lives with the upload layer; only its URL is tracked here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    pub id: String,
    pub school: School,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub status: ApplicationStatus,
    pub code: Option<String>,
    pub has_voted: bool,
    pub approved_by: Vec<String>,
    pub rejected_by: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Application {
    pub(crate) fn new(school: School, name: &str, email: &str, photo_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            school,
            name: name.to_string(),
            email: email.to_string(),
            photo_url,
            status: ApplicationStatus::New,
            code: None,
            has_voted: false,
            approved_by: Vec::new(),
            rejected_by: Vec::new(),
            submitted_at: Utc::now(),
        }
    }
}
