pub mod errors;
pub mod opportunity;

pub use errors::{ErrorCode, ErrorMap, FieldError, NON_FIELD_ERRORS};
pub use opportunity::{OpportunityValidator, RecordState, ValidOpportunity};
