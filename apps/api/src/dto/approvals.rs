use std::collections::BTreeMap;

use chrono::SecondsFormat;
use partnerdesk_application::ApprovalStatusSummary;
use partnerdesk_domain::ApprovalRequest;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for submitting an approval request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-approval-request.ts"
)]
pub struct CreateApprovalRequest {
    pub approval_type: String,
    pub subject: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// Accepted for compatibility; new requests always start pending.
    pub status: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Identifier assigned to a submitted request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-approval-response.ts"
)]
pub struct CreateApprovalResponse {
    pub approval_id: String,
}

/// Incoming payload for partial approval updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-approval-request.ts"
)]
pub struct UpdateApprovalRequest {
    pub status: Option<String>,
    pub review_comment: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Optional reviewer note attached to approve/reject.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/review-decision-request.ts"
)]
pub struct ReviewDecisionRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

/// API representation of an approval request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approval-response.ts"
)]
pub struct ApprovalResponse {
    pub id: String,
    pub approval_type: String,
    pub requested_by: String,
    pub requested_by_email: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub created_at: String,
    pub updated_at: String,
    pub reviewed_by: Option<String>,
    pub review_comment: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl From<ApprovalRequest> for ApprovalResponse {
    fn from(value: ApprovalRequest) -> Self {
        Self {
            id: value.id().to_string(),
            approval_type: value.approval_type().as_str().to_owned(),
            requested_by: value.requested_by().to_owned(),
            requested_by_email: value.requested_by_email().to_owned(),
            subject: value.subject().to_owned(),
            description: value.description().to_owned(),
            status: value.status().as_str().to_owned(),
            priority: value.priority().as_str().to_owned(),
            created_at: value
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: value
                .updated_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            reviewed_by: value.reviewed_by().map(ToOwned::to_owned),
            review_comment: value.review_comment().map(ToOwned::to_owned),
            metadata: value.metadata().clone(),
        }
    }
}

/// Request counts per status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approval-status-summary-response.ts"
)]
pub struct ApprovalStatusSummaryResponse {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

impl From<ApprovalStatusSummary> for ApprovalStatusSummaryResponse {
    fn from(value: ApprovalStatusSummary) -> Self {
        Self {
            pending: value.pending,
            approved: value.approved,
            rejected: value.rejected,
            total: value.total(),
        }
    }
}

/// Query string accepted by the approval listing.
#[derive(Debug, Default, Deserialize)]
pub struct ApprovalListParams {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub approval_type: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
