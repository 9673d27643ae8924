mod sessions;

use std::sync::Arc;

use partnerdesk_application::{
    ApprovalService, AuditLogService, AuthorizationService, PasswordHasher, UserService,
};
use partnerdesk_infrastructure::{
    Argon2PasswordHasher, InMemoryApprovalRepository, InMemoryAuditRepository,
    InMemoryUserDirectory,
};

use crate::state::AppState;

pub use sessions::build_session_layer;

/// Wires services over in-memory adapters and the production password hasher.
pub fn build_app_state(frontend_url: &str) -> AppState {
    build_app_state_with_hasher(frontend_url, Arc::new(Argon2PasswordHasher::new()))
}

pub fn build_app_state_with_hasher(
    frontend_url: &str,
    password_hasher: Arc<dyn PasswordHasher>,
) -> AppState {
    let audit_repository = Arc::new(InMemoryAuditRepository::new());

    let approval_service = ApprovalService::new(
        AuthorizationService::new(),
        Arc::new(InMemoryApprovalRepository::new()),
        audit_repository.clone(),
    );
    let user_service = UserService::new(
        Arc::new(InMemoryUserDirectory::new()),
        password_hasher,
        audit_repository.clone(),
    );
    let audit_log_service = AuditLogService::new(AuthorizationService::new(), audit_repository);

    AppState {
        approval_service,
        audit_log_service,
        user_service,
        frontend_url: frontend_url.to_owned(),
    }
}
