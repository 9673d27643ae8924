use partnerdesk_core::AppError;
use partnerdesk_domain::{ApprovalId, ApprovalRequest};

use crate::{ApprovalListQuery, ApprovalStatusSummary};

use super::*;

impl ApprovalService {
    /// Returns one request, or `None` when the id is unknown.
    pub async fn get_approval_by_id(
        &self,
        actor: &UserIdentity,
        approval_id: &ApprovalId,
    ) -> AppResult<Option<ApprovalRequest>> {
        self.require(actor, Privilege::ApprovalsView)?;
        self.repository.find_approval(approval_id).await
    }

    /// Returns one request or `NotFound`.
    pub async fn get_approval(
        &self,
        actor: &UserIdentity,
        approval_id: &ApprovalId,
    ) -> AppResult<ApprovalRequest> {
        self.get_approval_by_id(actor, approval_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("approval '{approval_id}' does not exist")))
    }

    /// Returns pending requests, most recent first.
    pub async fn get_pending_approvals(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<ApprovalRequest>> {
        self.list_approvals(actor, ApprovalListQuery::pending())
            .await
    }

    /// Lists requests matching the query, most recent first.
    pub async fn list_approvals(
        &self,
        actor: &UserIdentity,
        query: ApprovalListQuery,
    ) -> AppResult<Vec<ApprovalRequest>> {
        self.require(actor, Privilege::ApprovalsView)?;
        self.repository.list_approvals(query).await
    }

    /// Returns request counts per status.
    pub async fn status_summary(&self, actor: &UserIdentity) -> AppResult<ApprovalStatusSummary> {
        self.require(actor, Privilege::ApprovalsView)?;
        self.repository.status_summary().await
    }
}
