use async_trait::async_trait;
use chrono::{DateTime, Utc};
use partnerdesk_core::AppResult;
use partnerdesk_domain::{
    ApprovalId, ApprovalMetadata, ApprovalPriority, ApprovalRequest, ApprovalStatus, ApprovalType,
    ApprovalUpdate, NewApproval,
};

/// Input payload for submitting an approval request.
///
/// Requester attribution comes from the acting identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddApprovalInput {
    /// Request type.
    pub approval_type: ApprovalType,
    /// Short subject line.
    pub subject: String,
    /// Free-text description.
    pub description: String,
    /// Display priority.
    pub priority: ApprovalPriority,
    /// Status asked for by the caller. Ignored: requests always start pending.
    pub requested_status: Option<ApprovalStatus>,
    /// Type-specific attributes.
    pub metadata: ApprovalMetadata,
}

/// Filter and pagination for approval listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalListQuery {
    /// Optional status filter.
    pub status: Option<ApprovalStatus>,
    /// Optional type filter.
    pub approval_type: Option<ApprovalType>,
    /// Maximum rows returned, unbounded when absent.
    pub limit: Option<usize>,
    /// Number of rows skipped.
    pub offset: usize,
}

impl ApprovalListQuery {
    /// Query for every pending request.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            status: Some(ApprovalStatus::Pending),
            ..Self::default()
        }
    }

    /// Returns whether `request` passes the filters.
    #[must_use]
    pub fn matches(&self, request: &ApprovalRequest) -> bool {
        self.status.is_none_or(|status| request.status() == status)
            && self
                .approval_type
                .is_none_or(|approval_type| request.approval_type() == approval_type)
    }
}

/// Request counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApprovalStatusSummary {
    /// Requests awaiting review.
    pub pending: usize,
    /// Approved requests.
    pub approved: usize,
    /// Rejected requests.
    pub rejected: usize,
}

impl ApprovalStatusSummary {
    /// Counts one request.
    pub fn record(&mut self, status: ApprovalStatus) {
        match status {
            ApprovalStatus::Pending => self.pending += 1,
            ApprovalStatus::Approved => self.approved += 1,
            ApprovalStatus::Rejected => self.rejected += 1,
        }
    }

    /// Returns the total request count.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// Repository port owning approval requests.
///
/// Implementations must allocate ids and apply updates atomically.
#[async_trait]
pub trait ApprovalRepository: Send + Sync {
    /// Assigns the next sequential id and stores a new pending request.
    async fn insert_approval(
        &self,
        draft: NewApproval,
        created_at: DateTime<Utc>,
    ) -> AppResult<ApprovalRequest>;

    /// Finds one request by id.
    async fn find_approval(&self, approval_id: &ApprovalId) -> AppResult<Option<ApprovalRequest>>;

    /// Lists requests most recent first.
    async fn list_approvals(&self, query: ApprovalListQuery) -> AppResult<Vec<ApprovalRequest>>;

    /// Applies an update under the store lock and returns the updated request.
    ///
    /// Returns `NotFound` for unknown ids and `Conflict` when the request is
    /// no longer pending.
    async fn update_approval(
        &self,
        approval_id: &ApprovalId,
        update: ApprovalUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<ApprovalRequest>;

    /// Counts requests per status.
    async fn status_summary(&self) -> AppResult<ApprovalStatusSummary>;
}
