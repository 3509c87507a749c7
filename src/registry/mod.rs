use std::collections::HashMap;

use log::info;
use uuid::Uuid;

use crate::error::VoteError;
use crate::models::{Application, ApplicationStatus, ReviewAction, School};

/// Tracks participant applications and the one-time voting codes issued on
/// approval. Codes are stored uppercase; lookups trim and uppercase the
/// input, so the code from the confirmation mail can be typed in any case.
#[derive(Debug, Clone, Default)]
pub struct ApplicationRegistry {
    applications: Vec<Application>,
    codes: HashMap<String, String>, // voting code -> application id
}

impl ApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a new application. The photo has already been stored by the
    /// upload layer; we only keep its URL.
    pub fn submit(
        &mut self,
        school: School,
        name: &str,
        email: &str,
        photo_url: Option<String>,
    ) -> Result<String, VoteError> {
        if name.trim().is_empty() {
            return Err(VoteError::MissingField { field: "name" });
        }
        if email.trim().is_empty() {
            return Err(VoteError::MissingField { field: "email" });
        }

        let application = Application::new(school, name.trim(), email.trim(), photo_url);
        let id = application.id.clone();
        info!("New application {} for {}", id, application.school);
        self.applications.push(application);
        Ok(id)
    }

    /// Moderator view: all applications filed for one school.
    pub fn applications_for(&self, school: &School) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|a| a.school == *school)
            .collect()
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    /// Approve or reject an application on behalf of a school's moderator.
    /// Approval issues the one-time voting code exactly once; the code is
    /// returned so the caller can hand it to the mail layer. Re-approving
    /// an application never issues a second code.
    pub fn review(
        &mut self,
        id: &str,
        school: &School,
        action: ReviewAction,
        reviewer: &str,
    ) -> Result<Option<String>, VoteError> {
        let application = self
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.school == *school)
            .ok_or_else(|| VoteError::UnknownApplication { id: id.to_string() })?;

        match action {
            ReviewAction::Approve => {
                application.status = ApplicationStatus::Approved;
                if !application.approved_by.iter().any(|r| r == reviewer) {
                    application.approved_by.push(reviewer.to_string());
                }
                if application.code.is_some() {
                    return Ok(None);
                }
                let code = loop {
                    let candidate = generate_code();
                    if !self.codes.contains_key(&candidate) {
                        break candidate;
                    }
                };
                application.code = Some(code.clone());
                self.codes.insert(code.clone(), application.id.clone());
                info!("Issued voting code for application {}", id);
                Ok(Some(code))
            }
            ReviewAction::Reject => {
                application.status = ApplicationStatus::Rejected;
                if !application.rejected_by.iter().any(|r| r == reviewer) {
                    application.rejected_by.push(reviewer.to_string());
                }
                info!("Application {} rejected by {}", id, reviewer);
                Ok(None)
            }
        }
    }

    fn find_by_code(&self, code: &str) -> Option<&Application> {
        let code = code.trim().to_uppercase();
        let id = self.codes.get(&code)?;
        self.applications.iter().find(|a| a.id == *id)
    }

    /// Pre-vote check for the front end: the code exists and belongs to an
    /// approved application. Whether it has been spent is not checked here.
    pub fn verify_code(&self, code: &str) -> Result<School, VoteError> {
        let application = self.find_by_code(code).ok_or(VoteError::InvalidOrUsedCode)?;
        if application.status != ApplicationStatus::Approved {
            return Err(VoteError::InvalidOrUsedCode);
        }
        Ok(application.school.clone())
    }

    /// Voting-path gate: the code must exist, be approved, and not have been
    /// spent yet. Read-only; the code is only burned by `mark_voted` after
    /// the ballot has actually been accepted.
    pub fn redeem(&self, code: &str) -> Result<School, VoteError> {
        let application = self.find_by_code(code).ok_or(VoteError::InvalidOrUsedCode)?;
        if application.status != ApplicationStatus::Approved || application.has_voted {
            return Err(VoteError::InvalidOrUsedCode);
        }
        Ok(application.school.clone())
    }

    /// Burn a code after its ballot was accepted.
    pub fn mark_voted(&mut self, code: &str) {
        let code = code.trim().to_uppercase();
        if let Some(id) = self.codes.get(&code).cloned() {
            if let Some(application) = self.applications.iter_mut().find(|a| a.id == id) {
                application.has_voted = true;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Whole-contest reset: drops every application and issued code.
    pub fn clear(&mut self) {
        self.applications.clear();
        self.codes.clear();
    }
}

// Short uppercase code in the shape the confirmation mail expects.
fn generate_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(12);
    code.to_uppercase()
}
