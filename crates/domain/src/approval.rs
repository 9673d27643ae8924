//! Approval request entity and its review state machine.
//!
//! A request is created `pending` and may move exactly once to `approved` or
//! `rejected`. Both decisions are terminal.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use partnerdesk_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{EmailAddress, Privilege};

/// Free-form per-type attributes attached to a request (for example `cardNumber`).
pub type ApprovalMetadata = BTreeMap<String, String>;

/// Sequential approval identifier rendered as `APR-NNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApprovalId(String);

impl ApprovalId {
    /// Identifier prefix shared by every approval.
    pub const PREFIX: &'static str = "APR-";

    /// Formats the identifier for a store-local sequence number.
    #[must_use]
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("{}{sequence:03}", Self::PREFIX))
    }

    /// Parses and validates a transport identifier.
    pub fn parse(value: &str) -> AppResult<Self> {
        let digits = value.strip_prefix(Self::PREFIX).ok_or_else(|| {
            AppError::Validation(format!(
                "approval id '{value}' must start with '{}'",
                Self::PREFIX
            ))
        })?;

        if digits.len() < 3 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "approval id '{value}' must end with at least three digits"
            )));
        }

        let sequence = digits.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("approval id '{value}' is out of range: {error}"))
        })?;

        // Reject non-canonical forms such as APR-0001 so ids compare by value.
        let canonical = Self::from_sequence(sequence);
        if canonical.0 != value {
            return Err(AppError::Validation(format!(
                "approval id '{value}' is not in canonical form '{canonical}'"
            )));
        }

        Ok(canonical)
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ApprovalId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl FromStr for ApprovalId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ApprovalId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApprovalId> for String {
    fn from(value: ApprovalId) -> Self {
        value.0
    }
}

/// Administrative action awaiting sign-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalType {
    /// New card production request.
    CardRequest,
    /// Card spending limit change.
    LimitChange,
    /// Card hotlisting (lost, stolen, fraud).
    Hotlist,
    /// Card reissue.
    Reissue,
    /// Card status change such as block or unblock.
    StatusChange,
    /// Portal user creation.
    UserCreate,
    /// Program configuration change.
    ConfigChange,
}

impl ApprovalType {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardRequest => "card_request",
            Self::LimitChange => "limit_change",
            Self::Hotlist => "hotlist",
            Self::Reissue => "reissue",
            Self::StatusChange => "status_change",
            Self::UserCreate => "user_create",
            Self::ConfigChange => "config_change",
        }
    }

    /// Returns all approval types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ApprovalType] = &[
            ApprovalType::CardRequest,
            ApprovalType::LimitChange,
            ApprovalType::Hotlist,
            ApprovalType::Reissue,
            ApprovalType::StatusChange,
            ApprovalType::UserCreate,
            ApprovalType::ConfigChange,
        ];

        ALL
    }

    /// Returns the privilege needed to submit a request of this type.
    #[must_use]
    pub fn submit_privilege(&self) -> Privilege {
        match self {
            Self::CardRequest => Privilege::CardRequestsCreate,
            Self::LimitChange | Self::Hotlist | Self::Reissue | Self::StatusChange => {
                Privilege::CardsManage
            }
            Self::UserCreate => Privilege::UsersManage,
            Self::ConfigChange => Privilege::SettingsManage,
        }
    }
}

impl FromStr for ApprovalType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|approval_type| approval_type.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown approval type '{value}'")))
    }
}

/// Review status of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved by a reviewer. Terminal.
    Approved,
    /// Rejected by a reviewer. Terminal.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns whether `next` is a legal transition from this status.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl FromStr for ApprovalStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown approval status '{value}'"
            ))),
        }
    }
}

/// Display and sort priority of a request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl ApprovalPriority {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for ApprovalPriority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(AppError::Validation(format!(
                "unknown approval priority '{value}'"
            ))),
        }
    }
}

/// Validated submission payload for a new approval request.
///
/// There is no status field: every request starts `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApproval {
    approval_type: ApprovalType,
    requested_by: NonEmptyString,
    requested_by_email: EmailAddress,
    subject: NonEmptyString,
    description: String,
    priority: ApprovalPriority,
    metadata: ApprovalMetadata,
}

impl NewApproval {
    /// Validates submission fields.
    pub fn new(
        approval_type: ApprovalType,
        requested_by: impl Into<String>,
        requested_by_email: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        priority: ApprovalPriority,
        metadata: ApprovalMetadata,
    ) -> AppResult<Self> {
        Ok(Self {
            approval_type,
            requested_by: NonEmptyString::for_field("requested_by", requested_by)?,
            requested_by_email: EmailAddress::new(requested_by_email)?,
            subject: NonEmptyString::for_field("subject", subject)?,
            description: description.into().trim().to_owned(),
            priority,
            metadata,
        })
    }

    /// Returns the request type.
    #[must_use]
    pub fn approval_type(&self) -> ApprovalType {
        self.approval_type
    }

    /// Returns the requester name.
    #[must_use]
    pub fn requested_by(&self) -> &str {
        self.requested_by.as_str()
    }

    /// Returns the request subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}

/// Partial update merged into a pending request.
///
/// Setting a terminal `status` is a review decision and needs `reviewed_by`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalUpdate {
    /// Target status.
    pub status: Option<ApprovalStatus>,
    /// Reviewer attribution for a decision.
    pub reviewed_by: Option<String>,
    /// Optional reviewer comment for a decision.
    pub review_comment: Option<String>,
    /// Metadata entries merged over the existing mapping.
    pub metadata: ApprovalMetadata,
}

impl ApprovalUpdate {
    /// Builds a review decision update.
    #[must_use]
    pub fn decision(
        status: ApprovalStatus,
        reviewed_by: impl Into<String>,
        review_comment: Option<String>,
    ) -> Self {
        Self {
            status: Some(status),
            reviewed_by: Some(reviewed_by.into()),
            review_comment,
            metadata: ApprovalMetadata::new(),
        }
    }

    /// Returns the terminal status this update decides, if any.
    #[must_use]
    pub fn decided_status(&self) -> Option<ApprovalStatus> {
        self.status.filter(ApprovalStatus::is_terminal)
    }

    /// Returns whether the update touches reviewer-only fields.
    #[must_use]
    pub fn is_review(&self) -> bool {
        self.decided_status().is_some()
            || self.reviewed_by.is_some()
            || self.review_comment.is_some()
    }
}

/// Approval request record.
///
/// Only [`ApprovalRequest::create`] and [`ApprovalRequest::apply_update`]
/// produce values, so every instance went through the review state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalRequest {
    id: ApprovalId,
    approval_type: ApprovalType,
    requested_by: String,
    requested_by_email: String,
    subject: String,
    description: String,
    status: ApprovalStatus,
    priority: ApprovalPriority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    reviewed_by: Option<String>,
    review_comment: Option<String>,
    metadata: ApprovalMetadata,
}

impl ApprovalRequest {
    /// Materializes a submission as a new pending request.
    #[must_use]
    pub fn create(id: ApprovalId, draft: NewApproval, now: DateTime<Utc>) -> Self {
        Self {
            id,
            approval_type: draft.approval_type,
            requested_by: draft.requested_by.into(),
            requested_by_email: draft.requested_by_email.into(),
            subject: draft.subject.into(),
            description: draft.description,
            status: ApprovalStatus::Pending,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
            reviewed_by: None,
            review_comment: None,
            metadata: draft.metadata,
        }
    }

    /// Merges an update, enforcing the review state machine.
    ///
    /// On error the request is left untouched.
    pub fn apply_update(&mut self, update: ApprovalUpdate, now: DateTime<Utc>) -> AppResult<()> {
        if self.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "approval '{}' was already {} and can no longer change",
                self.id,
                self.status.as_str()
            )));
        }

        let reviewed_by = update
            .reviewed_by
            .map(|value| NonEmptyString::for_field("reviewed_by", value))
            .transpose()?;
        let review_comment = update
            .review_comment
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let next_status = update.status.unwrap_or(self.status);
        if next_status.is_terminal() {
            if !self.status.can_transition_to(next_status) {
                return Err(AppError::Conflict(format!(
                    "approval '{}' cannot move from {} to {}",
                    self.id,
                    self.status.as_str(),
                    next_status.as_str()
                )));
            }
            if reviewed_by.is_none() {
                return Err(AppError::Validation(format!(
                    "reviewed_by is required to mark approval '{}' as {}",
                    self.id,
                    next_status.as_str()
                )));
            }
        } else if reviewed_by.is_some() || review_comment.is_some() {
            return Err(AppError::Validation(
                "reviewed_by and review_comment can only be set when approving or rejecting"
                    .to_owned(),
            ));
        }

        self.status = next_status;
        if let Some(reviewed_by) = reviewed_by {
            self.reviewed_by = Some(reviewed_by.into());
            self.review_comment = review_comment;
        }
        self.metadata.extend(update.metadata);
        self.updated_at = now.max(self.created_at);

        Ok(())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &ApprovalId {
        &self.id
    }

    /// Returns the request type.
    #[must_use]
    pub fn approval_type(&self) -> ApprovalType {
        self.approval_type
    }

    /// Returns the requester name.
    #[must_use]
    pub fn requested_by(&self) -> &str {
        self.requested_by.as_str()
    }

    /// Returns the requester email.
    #[must_use]
    pub fn requested_by_email(&self) -> &str {
        self.requested_by_email.as_str()
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub fn priority(&self) -> ApprovalPriority {
        self.priority
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the reviewer, once decided.
    #[must_use]
    pub fn reviewed_by(&self) -> Option<&str> {
        self.reviewed_by.as_deref()
    }

    /// Returns the reviewer comment, if one was given.
    #[must_use]
    pub fn review_comment(&self) -> Option<&str> {
        self.review_comment.as_deref()
    }

    /// Returns the metadata mapping.
    #[must_use]
    pub fn metadata(&self) -> &ApprovalMetadata {
        &self.metadata
    }
}
