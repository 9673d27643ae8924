//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod approval;
mod navigation;
mod role;
mod security;
mod user;

pub use approval::{
    ApprovalId, ApprovalMetadata, ApprovalPriority, ApprovalRequest, ApprovalStatus, ApprovalType,
    ApprovalUpdate, NewApproval,
};
pub use navigation::NavigationEntry;
pub use role::RoleTemplate;
pub use security::{ALL_PRIVILEGES_TOKEN, AuditAction, Privilege, PrivilegeSet};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserId, validate_password,
};
