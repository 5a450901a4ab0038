use chrono::{DateTime, FixedOffset, Utc};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::{Host, Url};
use validator::ValidateEmail;

use crate::dto::opportunity_dto::{OpportunityForm, RawField};
use crate::models::opportunity::{Opportunity, OpportunityStatus};
use crate::utils::phone::{parse_phone, LANDLINE_RE, MOBILE_RE};
use crate::utils::time::{parse_interview_datetime, truncate_to_minute, Clock};

use super::errors::{ErrorCode, ErrorMap, FieldError};

pub const COMPANY_NAME_MAX: usize = 100;
pub const COMPANY_ADDRESS_MAX: usize = 200;
pub const JOB_TITLE_MAX: usize = 50;

/// A submission that passed every rule, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOpportunity {
    pub company_name: String,
    pub company_address: String,
    pub company_email: String,
    pub company_website: String,
    /// Digits only.
    pub company_mobile_phone: String,
    /// Digits only.
    pub company_landline_phone: String,
    pub job_title: String,
    pub job_description: String,
    pub reference_site: String,
    pub interview_datetime: Option<DateTime<FixedOffset>>,
    pub status: OpportunityStatus,
}

/// What the validator knows about the record being saved. Controls whether a
/// scheduled interview must not lie in the past.
#[derive(Debug, Clone, Copy)]
pub enum RecordState<'a> {
    /// No identifier yet; the interview must not be in the past.
    New,
    /// Already stored and no snapshot given; the past check is skipped.
    Persisted,
    /// Already stored; the past check applies only when the submission
    /// schedules an interview or moves the scheduled one.
    Previous(&'a Opportunity),
}

impl RecordState<'_> {
    fn checks_schedule(&self, status: OpportunityStatus, at: &DateTime<FixedOffset>) -> bool {
        match self {
            RecordState::New => true,
            RecordState::Persisted => false,
            RecordState::Previous(previous) => {
                let at = truncate_to_minute(at.with_timezone(&Utc));
                previous.status != status
                    || previous.interview_datetime.map(truncate_to_minute) != Some(at)
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Field {
    name: &'static str,
    label: &'static str,
}

const COMPANY_NAME: Field = Field { name: "company_name", label: "Company name" };
const COMPANY_ADDRESS: Field = Field { name: "company_address", label: "Company address" };
const COMPANY_EMAIL: Field = Field { name: "company_email", label: "Company email" };
const COMPANY_WEBSITE: Field = Field { name: "company_website", label: "Company website" };
const MOBILE_PHONE: Field = Field { name: "company_mobile_phone", label: "Mobile phone" };
const LANDLINE_PHONE: Field = Field { name: "company_landline_phone", label: "Landline phone" };
const JOB_TITLE: Field = Field { name: "job_title", label: "Job title" };
const JOB_DESCRIPTION: Field = Field { name: "job_description", label: "Job description" };
const REFERENCE_SITE: Field = Field { name: "reference_site", label: "Reference site" };
const INTERVIEW: Field = Field { name: "interview_datetime", label: "Interview date and time" };
const STATUS: Field = Field { name: "status", label: "Status" };

#[derive(Clone)]
pub struct OpportunityValidator {
    clock: Arc<dyn Clock>,
}

impl OpportunityValidator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn validate(
        &self,
        form: &OpportunityForm,
        is_new_record: bool,
    ) -> Result<ValidOpportunity, ErrorMap> {
        let state = if is_new_record {
            RecordState::New
        } else {
            RecordState::Persisted
        };
        self.validate_against(form, state)
    }

    pub fn validate_against(
        &self,
        form: &OpportunityForm,
        state: RecordState<'_>,
    ) -> Result<ValidOpportunity, ErrorMap> {
        let now = self.clock.now();
        let mut errors = ErrorMap::new();

        let company_name = required_text(
            &mut errors,
            COMPANY_NAME,
            &form.company_name,
            COMPANY_NAME_MAX,
        );
        let company_address = optional_text(
            &mut errors,
            COMPANY_ADDRESS,
            &form.company_address,
            COMPANY_ADDRESS_MAX,
        );
        let company_email = email(&mut errors, COMPANY_EMAIL, &form.company_email);
        let company_website = web_address(&mut errors, COMPANY_WEBSITE, &form.company_website);
        let company_mobile_phone = phone(
            &mut errors,
            MOBILE_PHONE,
            &form.company_mobile_phone,
            PhoneKind::Mobile,
        );
        let company_landline_phone = phone(
            &mut errors,
            LANDLINE_PHONE,
            &form.company_landline_phone,
            PhoneKind::Landline,
        );
        let job_title = required_text(&mut errors, JOB_TITLE, &form.job_title, JOB_TITLE_MAX);
        let job_description = text(&mut errors, JOB_DESCRIPTION, &form.job_description);
        let reference_site = web_address(&mut errors, REFERENCE_SITE, &form.reference_site);
        let interview_datetime = interview(&mut errors, &form.interview_datetime, now.offset());
        let status = status(&mut errors, &form.status);

        if let (Some(status), Some(interview_datetime)) = (status, &interview_datetime) {
            check_schedule(&mut errors, status, interview_datetime.as_ref(), &now, &state);
        }

        // An extractor yields `None` only after recording an error for its field.
        let record = (|| {
            Some(ValidOpportunity {
                company_name: company_name?,
                company_address: company_address?,
                company_email: company_email?,
                company_website: company_website?,
                company_mobile_phone: company_mobile_phone?,
                company_landline_phone: company_landline_phone?,
                job_title: job_title?,
                job_description: job_description?,
                reference_site: reference_site?,
                interview_datetime: interview_datetime?,
                status: status?,
            })
        })();

        match record {
            Some(record) if errors.is_empty() => Ok(record),
            _ => Err(errors),
        }
    }
}

/// Trimmed text of a raw value. Non-string JSON values are recorded as
/// `INVALID_FORMAT` and yield `None`.
fn text(errors: &mut ErrorMap, field: Field, raw: &Option<RawField>) -> Option<String> {
    match raw {
        None => Some(String::new()),
        Some(RawField::Text(value)) => Some(value.trim().to_string()),
        Some(RawField::Other(_)) => {
            errors.add(
                field.name,
                FieldError::new(
                    ErrorCode::InvalidFormat,
                    format!("The {} field must contain text.", field.label),
                ),
            );
            None
        }
    }
}

fn too_long(errors: &mut ErrorMap, field: Field, value: &str, max: usize) -> bool {
    if value.chars().count() > max {
        errors.add(
            field.name,
            FieldError::new(
                ErrorCode::TooLong,
                format!("The {} field may contain at most {} characters.", field.label, max),
            ),
        );
        return true;
    }
    false
}

fn missing(errors: &mut ErrorMap, field: Field, value: &str) -> bool {
    if value.is_empty() {
        errors.add(
            field.name,
            FieldError::new(
                ErrorCode::Required,
                format!("The {} field is required.", field.label),
            ),
        );
        return true;
    }
    false
}

fn required_text(
    errors: &mut ErrorMap,
    field: Field,
    raw: &Option<RawField>,
    max: usize,
) -> Option<String> {
    let value = text(errors, field, raw)?;
    if missing(errors, field, &value) || too_long(errors, field, &value, max) {
        return None;
    }
    Some(value)
}

fn optional_text(
    errors: &mut ErrorMap,
    field: Field,
    raw: &Option<RawField>,
    max: usize,
) -> Option<String> {
    let value = text(errors, field, raw)?;
    if too_long(errors, field, &value, max) {
        return None;
    }
    Some(value)
}

fn email(errors: &mut ErrorMap, field: Field, raw: &Option<RawField>) -> Option<String> {
    let value = text(errors, field, raw)?;
    if value.is_empty() || is_valid_email(&value) {
        return Some(value);
    }
    errors.add(
        field.name,
        FieldError::new(
            ErrorCode::InvalidFormat,
            format!("The {} field must contain a valid email.", field.label),
        ),
    );
    None
}

pub fn is_valid_email(value: &str) -> bool {
    if !value.validate_email() {
        return false;
    }
    match value.rsplit_once('@') {
        Some((_, domain)) => is_dotted_domain(domain),
        None => false,
    }
}

fn is_dotted_domain(domain: &str) -> bool {
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

fn web_address(errors: &mut ErrorMap, field: Field, raw: &Option<RawField>) -> Option<String> {
    let value = text(errors, field, raw)?;
    if missing(errors, field, &value) {
        return None;
    }
    if is_valid_web_address(&value) {
        return Some(value);
    }
    errors.add(
        field.name,
        FieldError::new(
            ErrorCode::InvalidFormat,
            format!("The {} field must contain a valid web address.", field.label),
        ),
    );
    None
}

/// Absolute `http`/`https` URL with an explicit `://` and a usable host.
pub fn is_valid_web_address(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost" || is_dotted_domain(domain),
        Some(Host::Ipv4(_)) => raw_host(value).is_some_and(|host| DOTTED_QUAD_RE.is_match(host)),
        Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

/// Four dot-separated decimal octets, as written by the user.
static DOTTED_QUAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$").expect("valid regex")
});

/// Host as it appears in the input, before the URL parser normalizes it.
fn raw_host(value: &str) -> Option<&str> {
    let (_, rest) = value.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host_port.starts_with('[') {
        return host_port.split_once(']').map(|(host, _)| &host[1..]);
    }
    Some(host_port.split_once(':').map_or(host_port, |(host, _)| host))
}

#[derive(Clone, Copy)]
enum PhoneKind {
    Mobile,
    Landline,
}

fn phone(
    errors: &mut ErrorMap,
    field: Field,
    raw: &Option<RawField>,
    kind: PhoneKind,
) -> Option<String> {
    let value = text(errors, field, raw)?;
    if value.is_empty() {
        return Some(value);
    }
    let (pattern, example) = match kind {
        PhoneKind::Mobile => (&*MOBILE_RE, "(DD) 99999-9999"),
        PhoneKind::Landline => (&*LANDLINE_RE, "(DD) 9999-9999"),
    };
    if pattern.is_match(&value) {
        return Some(parse_phone(&value));
    }
    errors.add(
        field.name,
        FieldError::new(
            ErrorCode::InvalidFormat,
            format!(
                "The {} field must contain a valid number. E.g.: {}",
                field.label, example
            ),
        ),
    );
    None
}

/// `Some(None)` is a valid empty value; `None` means an error was recorded.
fn interview(
    errors: &mut ErrorMap,
    raw: &Option<RawField>,
    offset: &FixedOffset,
) -> Option<Option<DateTime<FixedOffset>>> {
    let value = text(errors, INTERVIEW, raw)?;
    if value.is_empty() {
        return Some(None);
    }
    match parse_interview_datetime(&value, offset) {
        Some(at) => Some(Some(at)),
        None => {
            errors.add(
                INTERVIEW.name,
                FieldError::new(
                    ErrorCode::InvalidFormat,
                    format!(
                        "The {} field must contain a valid date and time. E.g.: day/month/year hours:minutes",
                        INTERVIEW.label
                    ),
                ),
            );
            None
        }
    }
}

fn status(errors: &mut ErrorMap, raw: &Option<RawField>) -> Option<OpportunityStatus> {
    if raw.is_none() {
        return Some(OpportunityStatus::default());
    }
    let value = text(errors, STATUS, raw)?;
    if missing(errors, STATUS, &value) {
        return None;
    }
    match value.parse() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.add(
                STATUS.name,
                FieldError::new(
                    ErrorCode::InvalidChoice,
                    format!("The {} field contains an invalid value.", STATUS.label),
                ),
            );
            None
        }
    }
}

fn check_schedule(
    errors: &mut ErrorMap,
    status: OpportunityStatus,
    at: Option<&DateTime<FixedOffset>>,
    now: &DateTime<FixedOffset>,
    state: &RecordState<'_>,
) {
    let scheduled = status == OpportunityStatus::InterviewScheduled;
    match at {
        None if scheduled => errors.add(
            INTERVIEW.name,
            FieldError::new(
                ErrorCode::MustBePresent,
                format!(
                    "The {} field must be filled in when the status is '{}'.",
                    INTERVIEW.label,
                    status.label()
                ),
            ),
        ),
        Some(_) if !scheduled => errors.add(
            INTERVIEW.name,
            FieldError::new(
                ErrorCode::MustBeAbsent,
                format!(
                    "The {} field must be empty when the status is '{}'.",
                    INTERVIEW.label,
                    status.label()
                ),
            ),
        ),
        Some(at) if state.checks_schedule(status, at) => {
            if truncate_to_minute(*at) < truncate_to_minute(*now) {
                errors.add(
                    INTERVIEW.name,
                    FieldError::new(
                        ErrorCode::PastDatetime,
                        format!(
                            "The {} field cannot be earlier than the current date and time.",
                            INTERVIEW.label
                        ),
                    ),
                );
            }
        }
        _ => {}
    }
}
