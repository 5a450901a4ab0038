use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key for errors that concern the submission as a whole rather than one field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Required,
    TooLong,
    InvalidFormat,
    InvalidChoice,
    MustBePresent,
    MustBeAbsent,
    PastDatetime,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::Required => "REQUIRED",
            ErrorCode::TooLong => "TOO_LONG",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidChoice => "INVALID_CHOICE",
            ErrorCode::MustBePresent => "MUST_BE_PRESENT",
            ErrorCode::MustBeAbsent => "MUST_BE_ABSENT",
            ErrorCode::PastDatetime => "PAST_DATETIME",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Field name to the ordered list of errors raised for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<&'static str, Vec<FieldError>>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.0.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[FieldError]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Codes raised for `field`, in the order they were added.
    pub fn codes(&self, field: &str) -> Vec<ErrorCode> {
        self.get(field)
            .map(|errors| errors.iter().map(|e| e.code).collect())
            .unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_errors_in_insertion_order_per_field() {
        let mut errors = ErrorMap::new();
        errors.add("job_title", FieldError::new(ErrorCode::Required, "first"));
        errors.add("job_title", FieldError::new(ErrorCode::TooLong, "second"));
        assert_eq!(
            errors.codes("job_title"),
            vec![ErrorCode::Required, ErrorCode::TooLong]
        );
        assert!(errors.codes("status").is_empty());
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut errors = ErrorMap::new();
        errors.add(
            "company_name",
            FieldError::new(ErrorCode::Required, "The Company name field is required."),
        );
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "company_name": [
                    { "code": "REQUIRED", "message": "The Company name field is required." }
                ]
            })
        );
    }
}
