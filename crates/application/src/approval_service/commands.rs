use chrono::Utc;
use partnerdesk_domain::{
    ApprovalId, ApprovalRequest, ApprovalStatus, ApprovalUpdate, AuditAction, NewApproval,
};

use crate::{AddApprovalInput, AuditEvent};

use super::*;

impl ApprovalService {
    /// Submits a new approval request and returns its id.
    ///
    /// The request is always stored pending; a caller-supplied status is
    /// recorded in the audit detail and otherwise ignored.
    pub async fn add_approval(
        &self,
        actor: &UserIdentity,
        input: AddApprovalInput,
    ) -> AppResult<ApprovalId> {
        self.authorization_service.require_all(
            actor,
            &[
                Privilege::ApprovalsCreate,
                input.approval_type.submit_privilege(),
            ],
        )?;

        let draft = NewApproval::new(
            input.approval_type,
            actor.display_name(),
            actor.email(),
            input.subject,
            input.description,
            input.priority,
            input.metadata,
        )?;

        let created = self.repository.insert_approval(draft, Utc::now()).await?;

        let mut detail = format!(
            "submitted {} request '{}'",
            created.approval_type().as_str(),
            created.subject()
        );
        if let Some(status) = input
            .requested_status
            .filter(|status| *status != ApprovalStatus::Pending)
        {
            detail.push_str(&format!("; requested status '{}' ignored", status.as_str()));
        }

        self.record_committed(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::ApprovalCreated,
            resource_type: APPROVAL_RESOURCE_TYPE.to_owned(),
            resource_id: created.id().to_string(),
            detail: Some(detail),
        })
        .await;

        Ok(created.id().clone())
    }

    /// Merges a partial update into a pending request.
    ///
    /// Review fields need `approvals.review`; metadata-only edits need
    /// `approvals.create`.
    pub async fn update_approval(
        &self,
        actor: &UserIdentity,
        approval_id: &ApprovalId,
        update: ApprovalUpdate,
    ) -> AppResult<ApprovalRequest> {
        let required = if update.is_review() {
            Privilege::ApprovalsReview
        } else {
            Privilege::ApprovalsCreate
        };
        self.require(actor, required)?;

        let decided = update.decided_status();
        let changed_entries = update.metadata.len();
        let updated = self
            .repository
            .update_approval(approval_id, update, Utc::now())
            .await?;

        let (action, detail) = match decided {
            Some(ApprovalStatus::Approved) => (
                AuditAction::ApprovalApproved,
                format!("approved by '{}'", updated.reviewed_by().unwrap_or_default()),
            ),
            Some(ApprovalStatus::Rejected) => (
                AuditAction::ApprovalRejected,
                format!("rejected by '{}'", updated.reviewed_by().unwrap_or_default()),
            ),
            _ => (
                AuditAction::ApprovalUpdated,
                format!("updated {changed_entries} metadata entries"),
            ),
        };

        self.record_committed(AuditEvent {
            subject: actor.subject().to_owned(),
            action,
            resource_type: APPROVAL_RESOURCE_TYPE.to_owned(),
            resource_id: approval_id.to_string(),
            detail: Some(detail),
        })
        .await;

        Ok(updated)
    }

    /// Approves a pending request on behalf of the actor.
    pub async fn approve(
        &self,
        actor: &UserIdentity,
        approval_id: &ApprovalId,
        review_comment: Option<String>,
    ) -> AppResult<ApprovalRequest> {
        self.decide(actor, approval_id, ApprovalStatus::Approved, review_comment)
            .await
    }

    /// Rejects a pending request on behalf of the actor.
    pub async fn reject(
        &self,
        actor: &UserIdentity,
        approval_id: &ApprovalId,
        review_comment: Option<String>,
    ) -> AppResult<ApprovalRequest> {
        self.decide(actor, approval_id, ApprovalStatus::Rejected, review_comment)
            .await
    }

    async fn decide(
        &self,
        actor: &UserIdentity,
        approval_id: &ApprovalId,
        status: ApprovalStatus,
        review_comment: Option<String>,
    ) -> AppResult<ApprovalRequest> {
        self.update_approval(
            actor,
            approval_id,
            ApprovalUpdate::decision(status, actor.display_name(), review_comment),
        )
        .await
    }
}
