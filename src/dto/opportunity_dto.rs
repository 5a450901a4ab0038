use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::opportunity::{Opportunity, OpportunityStatus};
use crate::services::opportunity_service::OpportunityList;
use crate::utils::{phone::display_phone, time::format_interview_datetime};

/// A submitted value as received. Anything that is not a JSON string is kept
/// so the validator can report it against its field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        RawField::Text(value)
    }
}

/// Raw create/update submission. `None` means the key was omitted or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpportunityForm {
    #[serde(alias = "empresa_nome")]
    pub company_name: Option<RawField>,
    #[serde(alias = "empresa_endereco")]
    pub company_address: Option<RawField>,
    #[serde(alias = "empresa_email")]
    pub company_email: Option<RawField>,
    #[serde(alias = "empresa_site")]
    pub company_website: Option<RawField>,
    #[serde(alias = "empresa_telefone_celular")]
    pub company_mobile_phone: Option<RawField>,
    #[serde(alias = "empresa_telefone_comercial")]
    pub company_landline_phone: Option<RawField>,
    #[serde(alias = "cargo_titulo")]
    pub job_title: Option<RawField>,
    #[serde(alias = "cargo_descricao")]
    pub job_description: Option<RawField>,
    #[serde(alias = "site_referencia")]
    pub reference_site: Option<RawField>,
    #[serde(alias = "data_hora_entrevista")]
    pub interview_datetime: Option<RawField>,
    #[serde(alias = "situacao")]
    pub status: Option<RawField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub value: OpportunityStatus,
    pub label: String,
}

impl From<OpportunityStatus> for StatusView {
    fn from(value: OpportunityStatus) -> Self {
        Self {
            value,
            label: value.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityResponse {
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
    pub interview_datetime: Option<DateTime<FixedOffset>>,
    pub interview_datetime_display: Option<String>,
    pub status: StatusView,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpportunityResponse {
    /// Renders a stored row for display, with timestamps shifted to `offset`.
    pub fn from_model(value: Opportunity, offset: &FixedOffset) -> Self {
        let interview = value
            .interview_datetime
            .map(|dt| dt.with_timezone(offset));

        Self {
            id: value.id,
            company_name: value.company_name,
            company_address: value.company_address,
            company_email: value.company_email,
            company_website: value.company_website,
            company_mobile_phone: display_optional_phone(&value.company_mobile_phone),
            company_landline_phone: display_optional_phone(&value.company_landline_phone),
            job_title: value.job_title,
            job_description: value.job_description,
            reference_site: value.reference_site,
            interview_datetime_display: interview.as_ref().map(format_interview_datetime),
            interview_datetime: interview,
            status: value.status.into(),
            registered_at: value.registered_at,
            updated_at: value.updated_at,
        }
    }
}

fn display_optional_phone(stored: &str) -> String {
    if stored.is_empty() {
        String::new()
    } else {
        display_phone(stored)
    }
}

/// Body returned after a successful create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunitySavedResponse {
    pub message: String,
    pub opportunity: OpportunityResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityListResponse {
    pub items: Vec<OpportunityResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl OpportunityListResponse {
    pub fn from_list(value: OpportunityList, offset: &FixedOffset) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(|item| OpportunityResponse::from_model(item, offset))
                .collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisteredOrder {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpportunityListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Unknown values are ignored and the list is not filtered.
    pub status: Option<String>,
    pub order: Option<RegisteredOrder>,
}

impl OpportunityListQuery {
    pub fn status_filter(&self) -> Option<OpportunityStatus> {
        self.status.as_deref().and_then(|raw| raw.parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusListResponse {
    pub items: Vec<StatusView>,
}
