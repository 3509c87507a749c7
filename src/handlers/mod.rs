use std::collections::HashMap;

use log::{debug, info, warn};

use crate::error::VoteError;
use crate::ledger::VoteLedger;
use crate::models::{Application, PointScale, ReviewAction, Roster, School, VotePayload};
use crate::registry::ApplicationRegistry;
use crate::voting::jury::{FinalStanding, JuryRankings};
use crate::voting::{self, validator};

/// All mutable contest state, owned explicitly by the host. The host is
/// responsible for serializing access (a single lock around the whole value
/// is plenty at this entity count); nothing in here blocks or does I/O.
pub struct Contest {
    roster: Roster,
    scale: PointScale,
    registry: ApplicationRegistry,
    ledger: VoteLedger,
    lines_open: bool,
}

impl Contest {
    /// A fresh contest with open voting lines and no state.
    pub fn new(roster: Roster, scale: PointScale) -> Self {
        Self {
            roster,
            scale,
            registry: ApplicationRegistry::new(),
            ledger: VoteLedger::new(),
            lines_open: true,
        }
    }

    /// The reference deployment: twelve schools, Eurovision scale.
    pub fn reference() -> Self {
        Self::new(Roster::reference(), PointScale::eurovision())
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn scale(&self) -> &PointScale {
        &self.scale
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &ApplicationRegistry {
        &self.registry
    }

    pub fn lines_open(&self) -> bool {
        self.lines_open
    }

    /// Open or close the voting lines. While closed, every vote submission
    /// is rejected uniformly, however valid its payload.
    pub fn set_lines_open(&mut self, open: bool) {
        self.lines_open = open;
        info!("Voting lines are now {}", if open { "open" } else { "closed" });
    }

    /// Administrative wipe: every ballot, application, and issued code.
    pub fn reset(&mut self) {
        self.ledger.clear();
        self.registry.clear();
        info!("Contest state reset");
    }

    fn resolve(&self, name: &str) -> Result<School, VoteError> {
        self.roster
            .resolve(name)
            .ok_or_else(|| VoteError::UnknownSchool {
                name: name.to_string(),
            })
    }

    /// File a participant application for moderation.
    pub fn submit_application(
        &mut self,
        school: &str,
        name: &str,
        email: &str,
        photo_url: Option<String>,
    ) -> Result<String, VoteError> {
        if school.trim().is_empty() {
            return Err(VoteError::MissingField { field: "school" });
        }
        let school = self.resolve(school)?;
        self.registry.submit(school, name, email, photo_url)
    }

    /// Approve or reject an application as a school's moderator. On first
    /// approval the issued code is returned for the mail layer to deliver.
    pub fn review_application(
        &mut self,
        id: &str,
        school: &str,
        action: ReviewAction,
        reviewer: &str,
    ) -> Result<Option<String>, VoteError> {
        let school = self.resolve(school)?;
        self.registry.review(id, &school, action, reviewer)
    }

    /// Moderator view of one school's applications.
    pub fn applications_for(&self, school: &str) -> Result<Vec<&Application>, VoteError> {
        let school = self.resolve(school)?;
        Ok(self.registry.applications_for(&school))
    }

    /// Admin overview: every application, grouped per school in roster order.
    pub fn overview(&self) -> Vec<(School, Vec<&Application>)> {
        self.roster
            .iter()
            .map(|school| {
                let applications = self.registry.applications_for(&school);
                (school, applications)
            })
            .collect()
    }

    /// Check a voting code without spending it.
    pub fn verify_code(&self, code: &str) -> Result<School, VoteError> {
        self.registry.verify_code(code)
    }

    /// Handle a raw vote submission. The lines gate runs first, then code
    /// redemption, then ballot validation; only a fully accepted ballot
    /// reaches the ledger and burns its code.
    pub fn submit_vote(&mut self, payload: &VotePayload) -> Result<School, VoteError> {
        if !self.lines_open {
            warn!("Vote rejected: lines are closed");
            return Err(VoteError::VotingClosed);
        }

        let outcome = if let Some(code) = payload.code.as_deref() {
            self.vote_with_code(code, payload.distribution.as_ref())
        } else if let Some(school) = payload.school.as_deref() {
            // Host-authenticated path: the caller already knows who is
            // voting and there is no code to spend.
            self.cast_ballot(school, payload.distribution.as_ref())
        } else {
            Err(VoteError::MissingField { field: "code" })
        };

        match &outcome {
            Ok(school) => {
                info!("Vote received from {}", school);
                debug!("Ledger now holds ballots from {} schools", self.ledger.len());
            }
            Err(err) => warn!("Vote rejected: {}", err),
        }
        outcome
    }

    fn vote_with_code(
        &mut self,
        code: &str,
        distribution: Option<&HashMap<String, i64>>,
    ) -> Result<School, VoteError> {
        let voter = self.registry.redeem(code)?;
        let distribution = distribution.ok_or(VoteError::MissingField {
            field: "distribution",
        })?;
        let ballot = validator::validate_ballot(&self.roster, &self.scale, voter.name(), distribution)?;
        self.ledger.record(ballot);
        // Only burn the code once the ballot is in; a rejected submission
        // must leave the code redeemable.
        self.registry.mark_voted(code);
        Ok(voter)
    }

    fn cast_ballot(
        &mut self,
        school: &str,
        distribution: Option<&HashMap<String, i64>>,
    ) -> Result<School, VoteError> {
        let distribution = distribution.ok_or(VoteError::MissingField {
            field: "distribution",
        })?;
        let ballot = validator::validate_ballot(&self.roster, &self.scale, school, distribution)?;
        let voter = ballot.voter.clone();
        self.ledger.record(ballot);
        Ok(voter)
    }

    /// Current jury rankings, recomputed from the ledger on every call.
    pub fn jury_rankings(&self) -> JuryRankings {
        voting::compute_jury_rankings(&self.ledger, &self.roster, &self.scale)
    }

    /// Current final standings, recomputed on every call. The first entry,
    /// if any votes were cast, is the winner.
    pub fn final_result(&self) -> Vec<FinalStanding> {
        voting::compute_final_result(&self.jury_rankings(), &self.roster)
    }
}
