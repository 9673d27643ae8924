use axum::Json;
use axum::extract::{Extension, Query, State};
use partnerdesk_application::AuditLogQuery;
use partnerdesk_core::UserIdentity;

use crate::dto::{AuditLogEntryResponse, AuditLogParams};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_AUDIT_LIMIT: usize = 50;
const MAX_AUDIT_LIMIT: usize = 200;

/// GET /api/audit-log - Audit trail, newest first.
pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<AuditLogParams>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let query = AuditLogQuery {
        limit: params
            .limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .min(MAX_AUDIT_LIMIT),
        offset: params.offset.unwrap_or(0),
    };

    let entries = state
        .audit_log_service
        .list_audit_log(&user, query)
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
