use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use partnerdesk_core::{AppError, UserIdentity};
use partnerdesk_domain::RoleTemplate;
use partnerdesk_infrastructure::Argon2PasswordHasher;

use crate::api_services::build_app_state_with_hasher;
use crate::dto::{
    ApprovalListParams, CreateApprovalRequest, ReviewDecisionRequest, UpdateApprovalRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::{
    approval_summary_handler, approve_approval_handler, create_approval_handler,
    get_approval_handler, list_approvals_handler, pending_approvals_handler,
    reject_approval_handler, update_approval_handler,
};

fn test_state() -> AppState {
    let hasher = Argon2PasswordHasher::with_params(1024, 1, 1).unwrap_or_else(|_| unreachable!());
    build_app_state_with_hasher("http://localhost:3000", Arc::new(hasher))
}

fn user_with_role(subject: &str, display_name: &str, role: &str) -> UserIdentity {
    let privileges = RoleTemplate::find(role)
        .map(|template| template.privileges)
        .unwrap_or(&[]);
    UserIdentity::new(
        subject,
        display_name,
        format!("{subject}@partnerdesk.test"),
        role,
        privileges.iter().copied(),
    )
}

fn hotlist_payload() -> CreateApprovalRequest {
    CreateApprovalRequest {
        approval_type: "hotlist".to_owned(),
        subject: "Hotlist Card - ****4532".to_owned(),
        description: Some("Card reported stolen".to_owned()),
        priority: Some("high".to_owned()),
        status: None,
        metadata: Some(BTreeMap::from([(
            "cardNumber".to_owned(),
            "****4532".to_owned(),
        )])),
    }
}

async fn create_hotlist(state: &AppState, user: &UserIdentity) -> String {
    let (status, Json(created)) = create_approval_handler(
        State(state.clone()),
        Extension(user.clone()),
        Json(hotlist_payload()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(status, StatusCode::CREATED);
    created.approval_id
}

#[tokio::test]
async fn create_then_approve_attributes_session_user() {
    let state = test_state();
    let card_ops = user_with_role("card-ops", "Sam", "Card Operations");
    let manager = user_with_role("ops-manager", "Jane", "Operations Manager");

    let approval_id = create_hotlist(&state, &card_ops).await;
    assert_eq!(approval_id, "APR-001");

    let Json(approved) = approve_approval_handler(
        State(state.clone()),
        Extension(manager),
        Path(approval_id.clone()),
        Some(Json(ReviewDecisionRequest {
            comment: Some("confirmed".to_owned()),
        })),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewed_by.as_deref(), Some("Jane"));
    assert_eq!(approved.review_comment.as_deref(), Some("confirmed"));
    assert_eq!(approved.requested_by, "Sam");
    assert_eq!(approved.requested_by_email, "card-ops@partnerdesk.test");
    assert_eq!(approved.priority, "high");
}

#[tokio::test]
async fn create_ignores_requested_status() {
    let state = test_state();
    let card_ops = user_with_role("card-ops", "Sam", "Card Operations");

    let mut payload = hotlist_payload();
    payload.status = Some("approved".to_owned());
    let (_, Json(created)) =
        create_approval_handler(State(state.clone()), Extension(card_ops.clone()), Json(payload))
            .await
            .unwrap_or_else(|_| unreachable!());

    let Json(stored) = get_approval_handler(
        State(state),
        Extension(card_ops),
        Path(created.approval_id),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(stored.status, "pending");
    assert!(stored.reviewed_by.is_none());
}

#[tokio::test]
async fn unknown_approval_type_is_bad_request() {
    let state = test_state();
    let card_ops = user_with_role("card-ops", "Sam", "Card Operations");

    let mut payload = hotlist_payload();
    payload.approval_type = "teleport".to_owned();
    let result = create_approval_handler(State(state), Extension(card_ops), Json(payload)).await;

    let response = result.map(IntoResponse::into_response);
    assert!(matches!(response, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn support_agent_cannot_list_approvals() {
    let state = test_state();
    let support = user_with_role("support", "Riley", "Support Agent");

    let result = list_approvals_handler(
        State(state),
        Extension(support),
        Query(ApprovalListParams::default()),
    )
    .await;

    let response = match result {
        Ok(_) => unreachable!(),
        Err(error) => error.into_response(),
    };
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_and_unknown_ids_are_not_found() {
    let state = test_state();
    let auditor = user_with_role("auditor", "Alex", "Auditor");

    for raw in ["not-an-id", "APR-999"] {
        let result = get_approval_handler(
            State(state.clone()),
            Extension(auditor.clone()),
            Path(raw.to_owned()),
        )
        .await;

        let response = match result {
            Ok(_) => unreachable!(),
            Err(error) => error.into_response(),
        };
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn second_decision_conflicts() {
    let state = test_state();
    let card_ops = user_with_role("card-ops", "Sam", "Card Operations");
    let manager = user_with_role("ops-manager", "Jane", "Operations Manager");
    let approval_id = create_hotlist(&state, &card_ops).await;

    let first = reject_approval_handler(
        State(state.clone()),
        Extension(manager.clone()),
        Path(approval_id.clone()),
        None,
    )
    .await;
    assert!(first.is_ok());

    let second = approve_approval_handler(
        State(state),
        Extension(manager),
        Path(approval_id),
        None,
    )
    .await;
    let response = match second {
        Ok(_) => unreachable!(),
        Err(error) => error.into_response(),
    };
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn patch_with_terminal_status_uses_session_reviewer() {
    let state = test_state();
    let card_ops = user_with_role("card-ops", "Sam", "Card Operations");
    let manager = user_with_role("ops-manager", "Jane", "Operations Manager");
    let approval_id = create_hotlist(&state, &card_ops).await;

    let Json(rejected) = update_approval_handler(
        State(state),
        Extension(manager),
        Path(approval_id),
        Json(UpdateApprovalRequest {
            status: Some("rejected".to_owned()),
            review_comment: Some("duplicate".to_owned()),
            metadata: None,
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.reviewed_by.as_deref(), Some("Jane"));
    assert_eq!(rejected.review_comment.as_deref(), Some("duplicate"));
}

#[tokio::test]
async fn pending_list_and_summary_track_decisions() {
    let state = test_state();
    let card_ops = user_with_role("card-ops", "Sam", "Card Operations");
    let manager = user_with_role("ops-manager", "Jane", "Operations Manager");

    let first = create_hotlist(&state, &card_ops).await;
    let second = create_hotlist(&state, &card_ops).await;
    let _ = approve_approval_handler(
        State(state.clone()),
        Extension(manager.clone()),
        Path(first),
        None,
    )
    .await;

    let Json(pending) = pending_approvals_handler(State(state.clone()), Extension(manager.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second);

    let Json(summary) = approval_summary_handler(State(state.clone()), Extension(manager.clone()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.rejected, 0);
    assert_eq!(summary.total, 2);

    let Json(approved) = list_approvals_handler(
        State(state),
        Extension(manager),
        Query(ApprovalListParams {
            status: Some("approved".to_owned()),
            approval_type: Some("hotlist".to_owned()),
            limit: None,
            offset: None,
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, "APR-001");
}
