use std::sync::Arc;

use partnerdesk_core::{AppResult, UserIdentity};
use partnerdesk_domain::Privilege;

use crate::{AuditLogEntry, AuditLogQuery, AuditLogRepository, AuthorizationService};

/// Read access to the audit trail for reporting roles.
#[derive(Clone)]
pub struct AuditLogService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
        }
    }

    /// Lists audit entries newest first.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.authorization_service
            .require_privilege(actor, Privilege::ReportsView)?;

        self.repository.list_recent_entries(query).await
    }
}
