use serde::Serialize;

use crate::Privilege;

/// Portal navigation entry gated by privileges (logical OR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    /// Stable entry key.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Front-end route.
    pub path: &'static str,
    /// Privileges of which at least one must be held to show the entry.
    pub required_privileges: &'static [Privilege],
}

impl NavigationEntry {
    /// Returns the required privileges as raw tokens.
    #[must_use]
    pub fn required_tokens(&self) -> Vec<&'static str> {
        self.required_privileges
            .iter()
            .map(Privilege::as_str)
            .collect()
    }

    /// Returns the portal navigation catalog in display order.
    #[must_use]
    pub fn catalog() -> &'static [Self] {
        PORTAL_NAVIGATION
    }
}

const PORTAL_NAVIGATION: &[NavigationEntry] = &[
    NavigationEntry {
        key: "dashboard",
        label: "Dashboard",
        path: "/dashboard",
        required_privileges: &[Privilege::DashboardView],
    },
    NavigationEntry {
        key: "cards",
        label: "Cards",
        path: "/cards",
        required_privileges: &[Privilege::CardsView, Privilege::CardsManage],
    },
    NavigationEntry {
        key: "card_requests",
        label: "Card Requests",
        path: "/card-requests",
        required_privileges: &[Privilege::CardRequestsView, Privilege::CardRequestsCreate],
    },
    NavigationEntry {
        key: "disputes",
        label: "Disputes",
        path: "/disputes",
        required_privileges: &[Privilege::DisputesView, Privilege::DisputesManage],
    },
    NavigationEntry {
        key: "approvals",
        label: "Approvals",
        path: "/approvals",
        required_privileges: &[Privilege::ApprovalsView, Privilege::ApprovalsReview],
    },
    NavigationEntry {
        key: "reports",
        label: "Reports",
        path: "/reports",
        required_privileges: &[Privilege::ReportsView, Privilege::ReportsExport],
    },
    NavigationEntry {
        key: "users",
        label: "Users",
        path: "/users",
        required_privileges: &[Privilege::UsersView, Privilege::UsersManage],
    },
    NavigationEntry {
        key: "roles",
        label: "Roles",
        path: "/roles",
        required_privileges: &[Privilege::RolesManage],
    },
    NavigationEntry {
        key: "settings",
        label: "Settings",
        path: "/settings",
        required_privileges: &[Privilege::SettingsManage],
    },
];
