use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use partnerdesk_application::{AddApprovalInput, ApprovalListQuery};
use partnerdesk_core::{AppError, UserIdentity};
use partnerdesk_domain::{
    ApprovalId, ApprovalPriority, ApprovalStatus, ApprovalType, ApprovalUpdate,
};

use crate::dto::{
    ApprovalListParams, ApprovalResponse, ApprovalStatusSummaryResponse, CreateApprovalRequest,
    CreateApprovalResponse, ReviewDecisionRequest, UpdateApprovalRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

/// GET /api/approvals - Filtered listing, most recent first.
pub async fn list_approvals_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ApprovalListParams>,
) -> ApiResult<Json<Vec<ApprovalResponse>>> {
    let query = ApprovalListQuery {
        status: parse_optional::<ApprovalStatus>(params.status.as_deref())?,
        approval_type: parse_optional::<ApprovalType>(params.approval_type.as_deref())?,
        limit: Some(
            params
                .limit
                .unwrap_or(DEFAULT_LIST_LIMIT)
                .min(MAX_LIST_LIMIT),
        ),
        offset: params.offset.unwrap_or(0),
    };

    let approvals = state
        .approval_service
        .list_approvals(&user, query)
        .await?
        .into_iter()
        .map(ApprovalResponse::from)
        .collect();

    Ok(Json(approvals))
}

/// POST /api/approvals - Submit a request; it always starts pending.
pub async fn create_approval_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateApprovalRequest>,
) -> ApiResult<(StatusCode, Json<CreateApprovalResponse>)> {
    let input = AddApprovalInput {
        approval_type: ApprovalType::from_str(payload.approval_type.trim())?,
        subject: payload.subject,
        description: payload.description.unwrap_or_default(),
        priority: parse_optional::<ApprovalPriority>(payload.priority.as_deref())?
            .unwrap_or_default(),
        requested_status: parse_optional::<ApprovalStatus>(payload.status.as_deref())?,
        metadata: payload.metadata.unwrap_or_default(),
    };

    let approval_id = state.approval_service.add_approval(&user, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateApprovalResponse {
            approval_id: approval_id.to_string(),
        }),
    ))
}

/// GET /api/approvals/pending
pub async fn pending_approvals_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<ApprovalResponse>>> {
    let approvals = state
        .approval_service
        .get_pending_approvals(&user)
        .await?
        .into_iter()
        .map(ApprovalResponse::from)
        .collect();

    Ok(Json(approvals))
}

/// GET /api/approvals/summary
pub async fn approval_summary_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<ApprovalStatusSummaryResponse>> {
    let summary = state.approval_service.status_summary(&user).await?;

    Ok(Json(ApprovalStatusSummaryResponse::from(summary)))
}

/// GET /api/approvals/{approval_id}
pub async fn get_approval_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(approval_id): Path<String>,
) -> ApiResult<Json<ApprovalResponse>> {
    let approval_id = approval_id_from_path(&approval_id)?;
    let approval = state
        .approval_service
        .get_approval(&user, &approval_id)
        .await?;

    Ok(Json(ApprovalResponse::from(approval)))
}

/// PATCH /api/approvals/{approval_id} - Partial update.
///
/// A terminal status is attributed to the session user.
pub async fn update_approval_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(approval_id): Path<String>,
    Json(payload): Json<UpdateApprovalRequest>,
) -> ApiResult<Json<ApprovalResponse>> {
    let approval_id = approval_id_from_path(&approval_id)?;
    let status = parse_optional::<ApprovalStatus>(payload.status.as_deref())?;
    let reviewed_by = status
        .filter(ApprovalStatus::is_terminal)
        .map(|_| user.display_name().to_owned());

    let update = ApprovalUpdate {
        status,
        reviewed_by,
        review_comment: payload.review_comment,
        metadata: payload.metadata.unwrap_or_default(),
    };

    let approval = state
        .approval_service
        .update_approval(&user, &approval_id, update)
        .await?;

    Ok(Json(ApprovalResponse::from(approval)))
}

/// POST /api/approvals/{approval_id}/approve
pub async fn approve_approval_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(approval_id): Path<String>,
    payload: Option<Json<ReviewDecisionRequest>>,
) -> ApiResult<Json<ApprovalResponse>> {
    let approval_id = approval_id_from_path(&approval_id)?;
    let comment = payload.and_then(|Json(payload)| payload.comment);
    let approval = state
        .approval_service
        .approve(&user, &approval_id, comment)
        .await?;

    Ok(Json(ApprovalResponse::from(approval)))
}

/// POST /api/approvals/{approval_id}/reject
pub async fn reject_approval_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(approval_id): Path<String>,
    payload: Option<Json<ReviewDecisionRequest>>,
) -> ApiResult<Json<ApprovalResponse>> {
    let approval_id = approval_id_from_path(&approval_id)?;
    let comment = payload.and_then(|Json(payload)| payload.comment);
    let approval = state
        .approval_service
        .reject(&user, &approval_id, comment)
        .await?;

    Ok(Json(ApprovalResponse::from(approval)))
}

/// A malformed id names no request, so it is reported as missing.
fn approval_id_from_path(value: &str) -> Result<ApprovalId, AppError> {
    ApprovalId::parse(value)
        .map_err(|_| AppError::NotFound(format!("approval '{value}' does not exist")))
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = AppError>,
{
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(T::from_str)
        .transpose()
}

#[cfg(test)]
mod tests;
