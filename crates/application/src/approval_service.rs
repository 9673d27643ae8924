//! Approval workflow use-cases.
//!
//! Every operation runs behind a privilege guard. Creations and decisions
//! are appended to the audit trail.

use std::sync::Arc;

use partnerdesk_core::{AppResult, UserIdentity};
use partnerdesk_domain::Privilege;

use tracing::warn;

use crate::{ApprovalRepository, AuditEvent, AuditRepository, AuthorizationService};

mod commands;
mod queries;

/// Resource type label used for approval audit events.
const APPROVAL_RESOURCE_TYPE: &str = "approval_request";

/// Application service for approval request workflows.
#[derive(Clone)]
pub struct ApprovalService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn ApprovalRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl ApprovalService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn ApprovalRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    fn require(&self, actor: &UserIdentity, privilege: Privilege) -> AppResult<()> {
        self.authorization_service
            .require_privilege(actor, privilege)
    }

    /// Appends an audit event for a change that is already stored.
    ///
    /// The change stands even when the audit sink fails.
    async fn record_committed(&self, event: AuditEvent) {
        let action = event.action;
        let resource_id = event.resource_id.clone();
        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(
                error = %error,
                action = action.as_str(),
                resource_id = %resource_id,
                "audit append failed after approval change was stored"
            );
        }
    }
}

#[cfg(test)]
mod tests;
