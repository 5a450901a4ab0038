use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::opportunity_dto::{
        OpportunityForm, OpportunityListQuery, OpportunityListResponse, OpportunityResponse,
        OpportunitySavedResponse, StatusListResponse,
    },
    error::{Error, Result},
    models::opportunity::OpportunityStatus,
    validation::{ErrorCode, ErrorMap, FieldError, RecordState, NON_FIELD_ERRORS},
    AppState,
};

pub const CREATE_FAILED: &str =
    "An error occurred while registering the entry. Please check the submitted fields.";
pub const UPDATE_FAILED: &str =
    "An error occurred while updating the entry. Please check the submitted fields.";
pub const CREATED: &str = "Opportunity registered successfully.";
pub const UPDATED: &str = "Opportunity updated successfully.";

fn rejected(banner: &str, errors: ErrorMap) -> Error {
    let fields: Vec<&str> = errors.fields().collect();
    tracing::warn!(?fields, "Opportunity submission rejected");
    Error::validation(banner, errors)
}

/// A body that cannot be read as a form is reported like any other rejected submission.
fn read_form(
    payload: std::result::Result<Json<OpportunityForm>, JsonRejection>,
    banner: &str,
) -> Result<OpportunityForm> {
    payload.map(|Json(form)| form).map_err(|rejection| {
        let mut errors = ErrorMap::new();
        errors.add(
            NON_FIELD_ERRORS,
            FieldError::new(ErrorCode::InvalidFormat, rejection.body_text()),
        );
        rejected(banner, errors)
    })
}

#[utoipa::path(
    post,
    path = "/api/opportunities",
    responses(
        (status = 201, description = "Opportunity registered"),
        (status = 422, description = "Submitted fields failed validation")
    )
)]
#[axum::debug_handler]
pub async fn create_opportunity(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OpportunityForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let form = read_form(payload, CREATE_FAILED)?;
    let record = state
        .validator
        .validate_against(&form, RecordState::New)
        .map_err(|errors| rejected(CREATE_FAILED, errors))?;
    let opportunity = state.opportunity_service.create(record).await?;

    let body = OpportunitySavedResponse {
        message: CREATED.to_string(),
        opportunity: OpportunityResponse::from_model(opportunity, &state.local_offset),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    put,
    path = "/api/opportunities/{id}",
    params(
        ("id" = Uuid, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 200, description = "Opportunity updated"),
        (status = 404, description = "Opportunity not found"),
        (status = 422, description = "Submitted fields failed validation")
    )
)]
#[axum::debug_handler]
pub async fn update_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<OpportunityForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let form = read_form(payload, UPDATE_FAILED)?;
    let previous = state.opportunity_service.get_by_id(id).await?;
    let record = state
        .validator
        .validate_against(&form, RecordState::Previous(&previous))
        .map_err(|errors| rejected(UPDATE_FAILED, errors))?;
    let opportunity = state.opportunity_service.update(id, record).await?;

    Ok(Json(OpportunitySavedResponse {
        message: UPDATED.to_string(),
        opportunity: OpportunityResponse::from_model(opportunity, &state.local_offset),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/opportunities/{id}",
    params(
        ("id" = Uuid, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 204, description = "Opportunity removed"),
        (status = 404, description = "Opportunity not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.opportunity_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/opportunities",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("order" = Option<String>, Query, description = "newest or oldest registration first")
    ),
    responses(
        (status = 200, description = "List of opportunities")
    )
)]
#[axum::debug_handler]
pub async fn list_opportunities(
    State(state): State<AppState>,
    Query(query): Query<OpportunityListQuery>,
) -> Result<impl IntoResponse> {
    let result = state.opportunity_service.list(query).await?;
    Ok(Json(OpportunityListResponse::from_list(
        result,
        &state.local_offset,
    )))
}

#[utoipa::path(
    get,
    path = "/api/opportunities/{id}",
    params(
        ("id" = Uuid, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 200, description = "Opportunity found"),
        (status = 404, description = "Opportunity not found")
    )
)]
#[axum::debug_handler]
pub async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let opportunity = state.opportunity_service.get_by_id(id).await?;
    Ok(Json(OpportunityResponse::from_model(
        opportunity,
        &state.local_offset,
    )))
}

#[axum::debug_handler]
pub async fn list_statuses() -> impl IntoResponse {
    Json(StatusListResponse {
        items: OpportunityStatus::ALL.into_iter().map(Into::into).collect(),
    })
}
