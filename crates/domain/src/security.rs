use std::borrow::Cow;
use std::collections::BTreeSet;
use std::str::FromStr;

use partnerdesk_core::{AppError, UserIdentity};
use serde::{Deserialize, Serialize};

/// Wildcard token that grants every privilege.
pub const ALL_PRIVILEGES_TOKEN: &str = "all";

/// Well-known portal privileges, stored as `<module>.<action>` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Privilege {
    /// Allows viewing the dashboard overview.
    #[serde(rename = "dashboard.view")]
    DashboardView,
    /// Allows viewing cards.
    #[serde(rename = "cards.view")]
    CardsView,
    /// Allows hotlist, reissue, limit and status actions on cards.
    #[serde(rename = "cards.manage")]
    CardsManage,
    /// Allows viewing card production requests.
    #[serde(rename = "card_requests.view")]
    CardRequestsView,
    /// Allows submitting card production requests.
    #[serde(rename = "card_requests.create")]
    CardRequestsCreate,
    /// Allows viewing disputes.
    #[serde(rename = "disputes.view")]
    DisputesView,
    /// Allows opening and updating disputes.
    #[serde(rename = "disputes.manage")]
    DisputesManage,
    /// Allows viewing approval requests.
    #[serde(rename = "approvals.view")]
    ApprovalsView,
    /// Allows submitting approval requests.
    #[serde(rename = "approvals.create")]
    ApprovalsCreate,
    /// Allows approving or rejecting approval requests.
    #[serde(rename = "approvals.review")]
    ApprovalsReview,
    /// Allows viewing reports.
    #[serde(rename = "reports.view")]
    ReportsView,
    /// Allows exporting reports.
    #[serde(rename = "reports.export")]
    ReportsExport,
    /// Allows viewing portal users.
    #[serde(rename = "users.view")]
    UsersView,
    /// Allows creating and editing portal users.
    #[serde(rename = "users.manage")]
    UsersManage,
    /// Allows managing roles.
    #[serde(rename = "roles.manage")]
    RolesManage,
    /// Allows changing program configuration.
    #[serde(rename = "settings.manage")]
    SettingsManage,
}

impl Privilege {
    /// Returns the stable token for this privilege.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DashboardView => "dashboard.view",
            Self::CardsView => "cards.view",
            Self::CardsManage => "cards.manage",
            Self::CardRequestsView => "card_requests.view",
            Self::CardRequestsCreate => "card_requests.create",
            Self::DisputesView => "disputes.view",
            Self::DisputesManage => "disputes.manage",
            Self::ApprovalsView => "approvals.view",
            Self::ApprovalsCreate => "approvals.create",
            Self::ApprovalsReview => "approvals.review",
            Self::ReportsView => "reports.view",
            Self::ReportsExport => "reports.export",
            Self::UsersView => "users.view",
            Self::UsersManage => "users.manage",
            Self::RolesManage => "roles.manage",
            Self::SettingsManage => "settings.manage",
        }
    }

    /// Returns all known privileges.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Privilege] = &[
            Privilege::DashboardView,
            Privilege::CardsView,
            Privilege::CardsManage,
            Privilege::CardRequestsView,
            Privilege::CardRequestsCreate,
            Privilege::DisputesView,
            Privilege::DisputesManage,
            Privilege::ApprovalsView,
            Privilege::ApprovalsCreate,
            Privilege::ApprovalsReview,
            Privilege::ReportsView,
            Privilege::ReportsExport,
            Privilege::UsersView,
            Privilege::UsersManage,
            Privilege::RolesManage,
            Privilege::SettingsManage,
        ];

        ALL
    }
}

impl FromStr for Privilege {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|privilege| privilege.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown privilege value '{value}'")))
    }
}

/// Privilege tokens held by one identity.
///
/// Tokens are kept verbatim, so membership is literal except for the
/// [`ALL_PRIVILEGES_TOKEN`] wildcard. A set built for an identity borrows
/// its tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeSet<'a> {
    tokens: Cow<'a, BTreeSet<String>>,
}

impl PrivilegeSet<'static> {
    /// Builds a set from raw tokens.
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Cow::Owned(tokens.into_iter().map(Into::into).collect()),
        }
    }
}

impl<'a> PrivilegeSet<'a> {
    /// Views the set held by an identity without copying it.
    #[must_use]
    pub fn for_identity(identity: &'a UserIdentity) -> Self {
        Self {
            tokens: Cow::Borrowed(identity.privileges()),
        }
    }

    /// Returns whether the wildcard token is held.
    #[must_use]
    pub fn grants_all(&self) -> bool {
        self.tokens.contains(ALL_PRIVILEGES_TOKEN)
    }

    /// Returns whether `token` is granted.
    #[must_use]
    pub fn grants(&self, token: &str) -> bool {
        self.grants_all() || self.tokens.contains(token)
    }

    /// Returns whether a well-known privilege is granted.
    #[must_use]
    pub fn grants_privilege(&self, privilege: Privilege) -> bool {
        self.grants(privilege.as_str())
    }

    /// Returns whether at least one of `tokens` is granted.
    ///
    /// The wildcard grants even an empty request list.
    #[must_use]
    pub fn grants_any<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.grants_all()
            || tokens
                .iter()
                .any(|token| self.tokens.contains(token.as_ref()))
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Emitted when an approval request is submitted.
    #[serde(rename = "approval.created")]
    ApprovalCreated,
    /// Emitted when a pending approval request is edited without a decision.
    #[serde(rename = "approval.updated")]
    ApprovalUpdated,
    /// Emitted when an approval request is approved.
    #[serde(rename = "approval.approved")]
    ApprovalApproved,
    /// Emitted when an approval request is rejected.
    #[serde(rename = "approval.rejected")]
    ApprovalRejected,
    /// Emitted when a login succeeds.
    #[serde(rename = "session.login_succeeded")]
    SessionLoginSucceeded,
    /// Emitted when a login fails.
    #[serde(rename = "session.login_failed")]
    SessionLoginFailed,
    /// Emitted when a session is closed.
    #[serde(rename = "session.logout")]
    SessionLogout,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApprovalCreated => "approval.created",
            Self::ApprovalUpdated => "approval.updated",
            Self::ApprovalApproved => "approval.approved",
            Self::ApprovalRejected => "approval.rejected",
            Self::SessionLoginSucceeded => "session.login_succeeded",
            Self::SessionLoginFailed => "session.login_failed",
            Self::SessionLogout => "session.logout",
        }
    }
}
