use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// Named checks on the pre-submission screening checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningCheck {
    PhoneScreenDone,
    RateDiscussed,
    RtrConfirmed,
    OtherSubmissionsChecked,
    AvailabilityConfirmed,
    VisaStatusChecked,
    SkillsVerified,
    ExperienceVerified,
    ReferencesAvailable,
    CommuteDiscussed,
}

impl ScreeningCheck {
    /// The allow-list the submission gate enforces, in reporting order.
    pub const MANDATORY: [Self; 6] = [
        Self::PhoneScreenDone,
        Self::RateDiscussed,
        Self::RtrConfirmed,
        Self::OtherSubmissionsChecked,
        Self::AvailabilityConfirmed,
        Self::VisaStatusChecked,
    ];

    pub const OPTIONAL: [Self; 4] = [
        Self::SkillsVerified,
        Self::ExperienceVerified,
        Self::ReferencesAvailable,
        Self::CommuteDiscussed,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::PhoneScreenDone => "phone_screen_done",
            Self::RateDiscussed => "rate_discussed",
            Self::RtrConfirmed => "rtr_confirmed",
            Self::OtherSubmissionsChecked => "other_submissions_checked",
            Self::AvailabilityConfirmed => "availability_confirmed",
            Self::VisaStatusChecked => "visa_status_checked",
            Self::SkillsVerified => "skills_verified",
            Self::ExperienceVerified => "experience_verified",
            Self::ReferencesAvailable => "references_available",
            Self::CommuteDiscussed => "commute_discussed",
        }
    }
}

/// Checklist a recruiter completes before presenting a candidate to a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningChecklist {
    pub phone_screen_done: bool,
    pub rate_discussed: bool,
    pub rtr_confirmed: bool,
    pub other_submissions_checked: bool,
    pub availability_confirmed: bool,
    pub visa_status_checked: bool,
    pub skills_verified: bool,
    pub experience_verified: bool,
    pub references_available: bool,
    pub commute_discussed: bool,
    pub candidate_rate: Option<String>,
    pub rtr_expiry: Option<NaiveDate>,
    pub available_from: Option<NaiveDate>,
    pub notice_period: Option<String>,
    pub visa_type: Option<String>,
    pub notes: Option<String>,
}

impl ScreeningChecklist {
    pub fn is_checked(&self, check: ScreeningCheck) -> bool {
        match check {
            ScreeningCheck::PhoneScreenDone => self.phone_screen_done,
            ScreeningCheck::RateDiscussed => self.rate_discussed,
            ScreeningCheck::RtrConfirmed => self.rtr_confirmed,
            ScreeningCheck::OtherSubmissionsChecked => self.other_submissions_checked,
            ScreeningCheck::AvailabilityConfirmed => self.availability_confirmed,
            ScreeningCheck::VisaStatusChecked => self.visa_status_checked,
            ScreeningCheck::SkillsVerified => self.skills_verified,
            ScreeningCheck::ExperienceVerified => self.experience_verified,
            ScreeningCheck::ReferencesAvailable => self.references_available,
            ScreeningCheck::CommuteDiscussed => self.commute_discussed,
        }
    }

    pub fn set(&mut self, check: ScreeningCheck, value: bool) {
        let slot = match check {
            ScreeningCheck::PhoneScreenDone => &mut self.phone_screen_done,
            ScreeningCheck::RateDiscussed => &mut self.rate_discussed,
            ScreeningCheck::RtrConfirmed => &mut self.rtr_confirmed,
            ScreeningCheck::OtherSubmissionsChecked => &mut self.other_submissions_checked,
            ScreeningCheck::AvailabilityConfirmed => &mut self.availability_confirmed,
            ScreeningCheck::VisaStatusChecked => &mut self.visa_status_checked,
            ScreeningCheck::SkillsVerified => &mut self.skills_verified,
            ScreeningCheck::ExperienceVerified => &mut self.experience_verified,
            ScreeningCheck::ReferencesAvailable => &mut self.references_available,
            ScreeningCheck::CommuteDiscussed => &mut self.commute_discussed,
        };
        *slot = value;
    }

    /// Mandatory checks that are still false, in `ScreeningCheck::MANDATORY` order.
    pub fn missing_mandatory(&self) -> Vec<ScreeningCheck> {
        ScreeningCheck::MANDATORY
            .into_iter()
            .filter(|check| !self.is_checked(*check))
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        ScreeningCheck::MANDATORY
            .into_iter()
            .chain(ScreeningCheck::OPTIONAL)
            .filter(|check| self.is_checked(*check))
            .count()
    }
}

/// Submission gate. Optional checks never block.
pub fn is_screening_complete(checklist: &ScreeningChecklist) -> Result<(), WorkflowError> {
    let missing_fields = checklist.missing_mandatory();
    if missing_fields.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::ScreeningIncomplete { missing_fields })
    }
}
