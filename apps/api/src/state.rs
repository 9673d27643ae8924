use partnerdesk_application::{ApprovalService, AuditLogService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub approval_service: ApprovalService,
    pub audit_log_service: AuditLogService,
    pub user_service: UserService,
    pub frontend_url: String,
}
