use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use partnerdesk_application::{ApprovalListQuery, ApprovalRepository, ApprovalStatusSummary};
use partnerdesk_core::{AppError, AppResult};
use partnerdesk_domain::{ApprovalId, ApprovalRequest, ApprovalUpdate, NewApproval};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ApprovalLedger {
    last_sequence: u32,
    // Most recent first.
    requests: VecDeque<ApprovalRequest>,
}

/// In-memory approval repository.
///
/// One lock guards both the id sequence and the request list, so id
/// allocation and review transitions are atomic.
#[derive(Debug, Default)]
pub struct InMemoryApprovalRepository {
    ledger: RwLock<ApprovalLedger>,
}

impl InMemoryApprovalRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApprovalRepository for InMemoryApprovalRepository {
    async fn insert_approval(
        &self,
        draft: NewApproval,
        created_at: DateTime<Utc>,
    ) -> AppResult<ApprovalRequest> {
        let mut ledger = self.ledger.write().await;
        let sequence = ledger.last_sequence.checked_add(1).ok_or_else(|| {
            AppError::Internal("approval id sequence is exhausted".to_owned())
        })?;

        let request = ApprovalRequest::create(ApprovalId::from_sequence(sequence), draft, created_at);
        ledger.last_sequence = sequence;
        ledger.requests.push_front(request.clone());

        tracing::debug!(approval_id = %request.id(), "approval request stored");
        Ok(request)
    }

    async fn find_approval(&self, approval_id: &ApprovalId) -> AppResult<Option<ApprovalRequest>> {
        Ok(self
            .ledger
            .read()
            .await
            .requests
            .iter()
            .find(|request| request.id() == approval_id)
            .cloned())
    }

    async fn list_approvals(&self, query: ApprovalListQuery) -> AppResult<Vec<ApprovalRequest>> {
        let ledger = self.ledger.read().await;

        Ok(ledger
            .requests
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
        let mut ledger = self.ledger.write().await;
        let request = ledger
            .requests
            .iter_mut()
            .find(|request| request.id() == approval_id)
            .ok_or_else(|| AppError::NotFound(format!("approval '{approval_id}' does not exist")))?;

        request.apply_update(update, now)?;

        tracing::debug!(
            approval_id = %approval_id,
            status = request.status().as_str(),
            "approval request updated"
        );
        Ok(request.clone())
    }

    async fn status_summary(&self) -> AppResult<ApprovalStatusSummary> {
        let ledger = self.ledger.read().await;

        let mut summary = ApprovalStatusSummary::default();
        for request in &ledger.requests {
            summary.record(request.status());
        }

        Ok(summary)
    }
}
