use crate::{ALL_PRIVILEGES_TOKEN, Privilege};

/// Built-in role: a display label and the privilege tokens it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTemplate {
    /// Display label copied into identities.
    pub name: &'static str,
    /// Privilege tokens, possibly the wildcard.
    pub privileges: &'static [&'static str],
}

impl RoleTemplate {
    /// Returns the built-in role templates.
    #[must_use]
    pub fn built_in() -> &'static [Self] {
        BUILT_IN_ROLES
    }

    /// Finds a built-in template by label, ignoring ASCII case.
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        BUILT_IN_ROLES
            .iter()
            .find(|template| template.name.eq_ignore_ascii_case(name.trim()))
    }
}

const BUILT_IN_ROLES: &[RoleTemplate] = &[
    RoleTemplate {
        name: "Super Admin",
        privileges: &[ALL_PRIVILEGES_TOKEN],
    },
    RoleTemplate {
        name: "Operations Manager",
        privileges: &[
            Privilege::DashboardView.as_str(),
            Privilege::CardsView.as_str(),
            Privilege::CardRequestsView.as_str(),
            Privilege::DisputesView.as_str(),
            Privilege::ApprovalsView.as_str(),
            Privilege::ApprovalsReview.as_str(),
            Privilege::ReportsView.as_str(),
            Privilege::ReportsExport.as_str(),
            Privilege::UsersView.as_str(),
        ],
    },
    RoleTemplate {
        name: "Card Operations",
        privileges: &[
            Privilege::DashboardView.as_str(),
            Privilege::CardsView.as_str(),
            Privilege::CardsManage.as_str(),
            Privilege::CardRequestsView.as_str(),
            Privilege::CardRequestsCreate.as_str(),
            Privilege::ApprovalsView.as_str(),
            Privilege::ApprovalsCreate.as_str(),
        ],
    },
    RoleTemplate {
        name: "Support Agent",
        privileges: &[
            Privilege::DashboardView.as_str(),
            Privilege::CardsView.as_str(),
            Privilege::DisputesView.as_str(),
            Privilege::DisputesManage.as_str(),
        ],
    },
    RoleTemplate {
        name: "Auditor",
        privileges: &[
            Privilege::DashboardView.as_str(),
            Privilege::ApprovalsView.as_str(),
            Privilege::ReportsView.as_str(),
        ],
    },
];
