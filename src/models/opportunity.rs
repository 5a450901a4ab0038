use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityStatus {
    Applied,
    #[default]
    Waiting,
    InterviewScheduled,
    Rejected,
}

impl OpportunityStatus {
    pub const ALL: [OpportunityStatus; 4] = [
        OpportunityStatus::Applied,
        OpportunityStatus::Waiting,
        OpportunityStatus::InterviewScheduled,
        OpportunityStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Applied => "APPLIED",
            OpportunityStatus::Waiting => "WAITING",
            OpportunityStatus::InterviewScheduled => "INTERVIEW_SCHEDULED",
            OpportunityStatus::Rejected => "REJECTED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OpportunityStatus::Applied => "Applied",
            OpportunityStatus::Waiting => "Waiting for response",
            OpportunityStatus::InterviewScheduled => "Interview scheduled",
            OpportunityStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown opportunity status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OpportunityStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpportunityStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for OpportunityStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A job opportunity row. Phones hold digits only; empty optional text is
/// stored as an empty string, matching what the validator emits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Opportunity {
    pub id: Uuid,
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub company_website: String,
    pub company_mobile_phone: String,
    pub company_landline_phone: String,
    pub job_title: String,
    pub job_description: String,
    pub reference_site: String,
    pub interview_datetime: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: OpportunityStatus,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
