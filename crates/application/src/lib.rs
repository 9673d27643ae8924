//! Application services and ports.

#![forbid(unsafe_code)]

mod approval_ports;
mod approval_service;
mod audit_log_service;
mod audit_ports;
mod authorization_service;
mod authorization_store;
mod user_service;

pub use approval_ports::{
    AddApprovalInput, ApprovalListQuery, ApprovalRepository, ApprovalStatusSummary,
};
pub use approval_service::ApprovalService;
pub use audit_log_service::AuditLogService;
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use authorization_service::AuthorizationService;
pub use authorization_store::AuthorizationStore;
pub use user_service::{
    DirectoryUser, PasswordHasher, ProvisionUserInput, UserDirectory, UserService,
};
