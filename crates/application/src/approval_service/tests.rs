use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use partnerdesk_core::{AppError, AppResult, UserIdentity};
use partnerdesk_domain::{
    ALL_PRIVILEGES_TOKEN, ApprovalId, ApprovalMetadata, ApprovalPriority, ApprovalRequest,
    ApprovalStatus, ApprovalType, ApprovalUpdate, AuditAction, NewApproval, RoleTemplate,
};
use tokio::sync::Mutex;

use crate::{
    AddApprovalInput, ApprovalListQuery, ApprovalRepository, ApprovalStatusSummary, AuditEvent,
    AuditRepository, AuthorizationService,
};

use super::ApprovalService;

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct UnavailableAuditRepository;

#[async_trait]
impl AuditRepository for UnavailableAuditRepository {
    async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
        Err(AppError::Internal("audit sink unavailable".to_owned()))
    }
}

#[derive(Default)]
struct FakeApprovalRepository {
    state: Mutex<(u32, VecDeque<ApprovalRequest>)>,
}

#[async_trait]
impl ApprovalRepository for FakeApprovalRepository {
    async fn insert_approval(
        &self,
        draft: NewApproval,
        created_at: DateTime<Utc>,
    ) -> AppResult<ApprovalRequest> {
        let mut state = self.state.lock().await;
        state.0 += 1;
        let request = ApprovalRequest::create(ApprovalId::from_sequence(state.0), draft, created_at);
        state.1.push_front(request.clone());
        Ok(request)
    }

    async fn find_approval(&self, approval_id: &ApprovalId) -> AppResult<Option<ApprovalRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .1
            .iter()
            .find(|request| request.id() == approval_id)
            .cloned())
    }

    async fn list_approvals(&self, query: ApprovalListQuery) -> AppResult<Vec<ApprovalRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .1
            .iter()
            .filter(|request| query.matches(request))
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn update_approval(
        &self,
        approval_id: &ApprovalId,
        update: ApprovalUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<ApprovalRequest> {
        let mut state = self.state.lock().await;
        let request = state
            .1
            .iter_mut()
            .find(|request| request.id() == approval_id)
            .ok_or_else(|| AppError::NotFound(format!("approval '{approval_id}' does not exist")))?;
        request.apply_update(update, now)?;
        Ok(request.clone())
    }

    async fn status_summary(&self) -> AppResult<ApprovalStatusSummary> {
        let mut summary = ApprovalStatusSummary::default();
        for request in &self.state.lock().await.1 {
            summary.record(request.status());
        }
        Ok(summary)
    }
}

struct Harness {
    service: ApprovalService,
    repository: Arc<FakeApprovalRepository>,
    audit: Arc<FakeAuditRepository>,
}

fn harness() -> Harness {
    let repository = Arc::new(FakeApprovalRepository::default());
    let audit = Arc::new(FakeAuditRepository::default());
    let service = ApprovalService::new(
        AuthorizationService::new(),
        repository.clone(),
        audit.clone(),
    );

    Harness {
        service,
        repository,
        audit,
    }
}

fn actor_with_role(subject: &str, display_name: &str, role: &str) -> UserIdentity {
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

fn card_operator() -> UserIdentity {
    actor_with_role("sam", "Sam Operator", "Card Operations")
}

fn reviewer() -> UserIdentity {
    actor_with_role("jane", "Jane", "Operations Manager")
}

fn hotlist_input() -> AddApprovalInput {
    AddApprovalInput {
        approval_type: ApprovalType::Hotlist,
        subject: "Hotlist Card - ****4532".to_owned(),
        description: "Customer reported the card lost".to_owned(),
        priority: ApprovalPriority::High,
        requested_status: None,
        metadata: ApprovalMetadata::from([
            ("cardNumber".to_owned(), "4532".to_owned()),
            ("reason".to_owned(), "Lost Card".to_owned()),
        ]),
    }
}

fn input_of(approval_type: ApprovalType, subject: &str) -> AddApprovalInput {
    AddApprovalInput {
        approval_type,
        subject: subject.to_owned(),
        description: String::new(),
        priority: ApprovalPriority::Medium,
        requested_status: None,
        metadata: ApprovalMetadata::new(),
    }
}

#[tokio::test]
async fn hotlist_request_is_created_pending_and_approved_by_reviewer() {
    let harness = harness();

    let approval_id = harness
        .service
        .add_approval(&card_operator(), hotlist_input())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(approval_id.as_str(), "APR-001");

    let pending = harness
        .service
        .get_pending_approvals(&reviewer())
        .await
        .unwrap_or_default();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].requested_by(), "Sam Operator");
    assert_eq!(pending[0].requested_by_email(), "sam@partnerdesk.test");

    let approved = harness
        .service
        .approve(&reviewer(), &approval_id, Some("verified".to_owned()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(approved.status(), ApprovalStatus::Approved);
    assert_eq!(approved.reviewed_by(), Some("Jane"));
    assert_eq!(approved.review_comment(), Some("verified"));
    assert!(approved.updated_at() >= approved.created_at());
    assert_eq!(
        approved.metadata().get("reason").map(String::as_str),
        Some("Lost Card")
    );

    let pending = harness
        .service
        .get_pending_approvals(&reviewer())
        .await
        .unwrap_or_default();
    assert!(pending.is_empty());

    let events = harness.audit.events.lock().await;
    let actions: Vec<AuditAction> = events.iter().map(|event| event.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::ApprovalCreated, AuditAction::ApprovalApproved]
    );
    assert_eq!(events[1].subject, "jane");
    assert_eq!(events[1].resource_id, "APR-001");
}

#[tokio::test]
async fn caller_supplied_status_is_ignored_and_audited() {
    let harness = harness();
    let mut input = hotlist_input();
    input.requested_status = Some(ApprovalStatus::Approved);

    let approval_id = harness
        .service
        .add_approval(&card_operator(), input)
        .await
        .unwrap_or_else(|_| unreachable!());

    let stored = harness
        .service
        .get_approval(&reviewer(), &approval_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(stored.status(), ApprovalStatus::Pending);
    assert_eq!(stored.reviewed_by(), None);

    let events = harness.audit.events.lock().await;
    assert!(
        events[0]
            .detail
            .as_deref()
            .is_some_and(|detail| detail.contains("requested status 'approved' ignored"))
    );
}

#[tokio::test]
async fn submission_requires_type_privilege() {
    let harness = harness();
    let support = actor_with_role("lee", "Lee Support", "Support Agent");

    let result = harness
        .service
        .add_approval(&support, hotlist_input())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let config_change = harness
        .service
        .add_approval(
            &card_operator(),
            input_of(ApprovalType::ConfigChange, "Raise daily ATM limit"),
        )
        .await;
    assert!(matches!(config_change, Err(AppError::Forbidden(_))));

    assert!(harness.repository.state.lock().await.1.is_empty());
    assert!(harness.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn invalid_submission_leaves_store_untouched() {
    let harness = harness();

    let result = harness
        .service
        .add_approval(&card_operator(), input_of(ApprovalType::Reissue, "   "))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let state = harness.repository.state.lock().await;
    assert_eq!(state.0, 0);
    assert!(state.1.is_empty());
}

#[tokio::test]
async fn stored_changes_stand_when_audit_sink_fails() {
    let repository = Arc::new(FakeApprovalRepository::default());
    let service = ApprovalService::new(
        AuthorizationService::new(),
        repository.clone(),
        Arc::new(UnavailableAuditRepository),
    );

    let approval_id = service
        .add_approval(&card_operator(), hotlist_input())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(repository.state.lock().await.1.len(), 1);

    let approved = service
        .approve(&reviewer(), &approval_id, None)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(approved.status(), ApprovalStatus::Approved);

    let stored = service
        .get_approval(&reviewer(), &approval_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(stored.status(), ApprovalStatus::Approved);
}

#[tokio::test]
async fn second_decision_conflicts_and_first_decision_survives() {
    let harness = harness();
    let approval_id = harness
        .service
        .add_approval(&card_operator(), hotlist_input())
        .await
        .unwrap_or_else(|_| unreachable!());

    let first = harness
        .service
        .reject(&reviewer(), &approval_id, Some("duplicate".to_owned()))
        .await;
    assert!(first.is_ok());

    let omar = actor_with_role("omar", "Omar", "Super Admin");
    let second = harness.service.approve(&omar, &approval_id, None).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let metadata_edit = harness
        .service
        .update_approval(
            &omar,
            &approval_id,
            ApprovalUpdate {
                metadata: ApprovalMetadata::from([("note".to_owned(), "late".to_owned())]),
                ..ApprovalUpdate::default()
            },
        )
        .await;
    assert!(matches!(metadata_edit, Err(AppError::Conflict(_))));

    let stored = harness
        .service
        .get_approval(&reviewer(), &approval_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(stored.status(), ApprovalStatus::Rejected);
    assert_eq!(stored.reviewed_by(), Some("Jane"));
    assert_eq!(stored.review_comment(), Some("duplicate"));
    assert!(!stored.metadata().contains_key("note"));
}

#[tokio::test]
async fn decisions_require_review_privilege() {
    let harness = harness();
    let approval_id = harness
        .service
        .add_approval(&card_operator(), hotlist_input())
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = harness
        .service
        .approve(&card_operator(), &approval_id, None)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let via_update = harness
        .service
        .update_approval(
            &card_operator(),
            &approval_id,
            ApprovalUpdate::decision(ApprovalStatus::Approved, "Sam Operator", None),
        )
        .await;
    assert!(matches!(via_update, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn metadata_only_update_keeps_request_pending() {
    let harness = harness();
    let approval_id = harness
        .service
        .add_approval(&card_operator(), hotlist_input())
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = harness
        .service
        .update_approval(
            &card_operator(),
            &approval_id,
            ApprovalUpdate {
                metadata: ApprovalMetadata::from([(
                    "reason".to_owned(),
                    "Stolen Card".to_owned(),
                )]),
                ..ApprovalUpdate::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.status(), ApprovalStatus::Pending);
    assert_eq!(
        updated.metadata().get("reason").map(String::as_str),
        Some("Stolen Card")
    );
    let events = harness.audit.events.lock().await;
    let last = events.last();
    assert_eq!(
        last.map(|event| event.action),
        Some(AuditAction::ApprovalUpdated)
    );
    assert_eq!(
        last.and_then(|event| event.detail.as_deref()),
        Some("updated 1 metadata entries")
    );
}

#[tokio::test]
async fn unknown_id_is_absent_or_not_found() {
    let harness = harness();
    let unknown = ApprovalId::from_sequence(404);

    let lookup = harness
        .service
        .get_approval_by_id(&reviewer(), &unknown)
        .await;
    assert!(matches!(lookup, Ok(None)));

    let strict = harness.service.get_approval(&reviewer(), &unknown).await;
    assert!(matches!(strict, Err(AppError::NotFound(_))));

    let decision = harness.service.approve(&reviewer(), &unknown, None).await;
    assert!(matches!(decision, Err(AppError::NotFound(_))));
    assert!(harness.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn reads_require_view_privilege() {
    let harness = harness();
    let support = actor_with_role("lee", "Lee Support", "Support Agent");

    assert!(matches!(
        harness.service.get_pending_approvals(&support).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        harness.service.status_summary(&support).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn listings_are_most_recent_first_and_filterable() {
    let harness = harness();
    let admin = UserIdentity::new(
        "root",
        "Ada Admin",
        "admin@partnerdesk.test",
        "Super Admin",
        [ALL_PRIVILEGES_TOKEN],
    );

    let mut ids = Vec::new();
    for (approval_type, subject) in [
        (ApprovalType::CardRequest, "Card Request - 50 cards"),
        (ApprovalType::Hotlist, "Hotlist Card - ****1111"),
        (ApprovalType::Reissue, "Reissue Card - ****2222"),
        (ApprovalType::Hotlist, "Hotlist Card - ****3333"),
    ] {
        let approval_id = harness
            .service
            .add_approval(&admin, input_of(approval_type, subject))
            .await
            .unwrap_or_else(|_| unreachable!());
        ids.push(approval_id);
    }
    assert!(harness.service.reject(&admin, &ids[1], None).await.is_ok());

    let pending: Vec<String> = harness
        .service
        .get_pending_approvals(&admin)
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.id().to_string())
        .collect();
    assert_eq!(pending, vec!["APR-004", "APR-003", "APR-001"]);

    let hotlists = harness
        .service
        .list_approvals(
            &admin,
            ApprovalListQuery {
                approval_type: Some(ApprovalType::Hotlist),
                ..ApprovalListQuery::default()
            },
        )
        .await
        .unwrap_or_default();
    assert_eq!(hotlists.len(), 2);

    let page = harness
        .service
        .list_approvals(
            &admin,
            ApprovalListQuery {
                limit: Some(2),
                offset: 1,
                ..ApprovalListQuery::default()
            },
        )
        .await
        .unwrap_or_default();
    let page_ids: Vec<&str> = page.iter().map(|request| request.id().as_str()).collect();
    assert_eq!(page_ids, vec!["APR-003", "APR-002"]);

    let summary = harness
        .service
        .status_summary(&admin)
        .await
        .unwrap_or_default();
    assert_eq!(summary.pending, 3);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.approved, 0);
    assert_eq!(summary.total(), 4);
}
