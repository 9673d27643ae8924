mod approvals;
mod audit;
mod auth;
mod common;
mod navigation;

pub use approvals::{
    ApprovalListParams, ApprovalResponse, ApprovalStatusSummaryResponse, CreateApprovalRequest,
    CreateApprovalResponse, ReviewDecisionRequest, UpdateApprovalRequest,
};
pub use audit::{AuditLogEntryResponse, AuditLogParams};
pub use auth::AuthLoginRequest;
pub use common::{HealthResponse, UserIdentityResponse};
pub use navigation::NavigationEntryResponse;
