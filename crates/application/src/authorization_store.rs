use std::sync::{Arc, PoisonError, RwLock};

use partnerdesk_core::{AppError, AppResult, UserIdentity};
use partnerdesk_domain::{NavigationEntry, PrivilegeSet};

/// Session-scoped identity slot answering privilege questions.
///
/// Checks are advisory: they drive navigation and page gates. Mutations are
/// guarded again by [`crate::AuthorizationService`].
#[derive(Debug, Clone, Default)]
pub struct AuthorizationStore {
    identity: Arc<RwLock<Option<UserIdentity>>>,
}

impl AuthorizationStore {
    /// Creates an empty store with no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `identity`.
    #[must_use]
    pub fn with_identity(identity: UserIdentity) -> Self {
        Self {
            identity: Arc::new(RwLock::new(Some(identity))),
        }
    }

    /// Replaces the current identity wholesale.
    pub fn set_identity(&self, identity: Option<UserIdentity>) {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = identity;
    }

    /// Clears the current identity.
    pub fn logout(&self) {
        self.set_identity(None);
    }

    /// Returns a snapshot of the current identity.
    #[must_use]
    pub fn identity(&self) -> Option<UserIdentity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current identity or `Unauthorized` when none is set.
    pub fn require_identity(&self) -> AppResult<UserIdentity> {
        self.identity()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
    }

    /// Returns whether the current identity holds `token`.
    #[must_use]
    pub fn has_privilege(&self, token: &str) -> bool {
        self.check(|privileges| privileges.grants(token))
    }

    /// Returns whether the current identity holds at least one of `tokens`.
    #[must_use]
    pub fn has_any_privilege<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.check(|privileges| privileges.grants_any(tokens))
    }

    /// Returns the navigation entries visible to the current identity.
    #[must_use]
    pub fn visible_navigation(&self) -> Vec<NavigationEntry> {
        let guard = self.identity.read().unwrap_or_else(PoisonError::into_inner);
        let Some(identity) = guard.as_ref() else {
            return Vec::new();
        };

        let privileges = PrivilegeSet::for_identity(identity);
        NavigationEntry::catalog()
            .iter()
            .filter(|entry| privileges.grants_any(&entry.required_tokens()))
            .copied()
            .collect()
    }

    fn check(&self, predicate: impl FnOnce(&PrivilegeSet<'_>) -> bool) -> bool {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|identity| predicate(&PrivilegeSet::for_identity(identity)))
    }
}

#[cfg(test)]
mod tests {
    use partnerdesk_core::{AppError, UserIdentity};
    use partnerdesk_domain::{ALL_PRIVILEGES_TOKEN, RoleTemplate};

    use super::AuthorizationStore;

    fn identity_with(privileges: &[&str]) -> UserIdentity {
        UserIdentity::new(
            "usr-7",
            "Sam Operator",
            "sam@partnerdesk.test",
            "Card Operations",
            privileges.iter().copied(),
        )
    }

    #[test]
    fn empty_store_denies_everything() {
        let store = AuthorizationStore::new();

        assert!(!store.has_privilege("cards.view"));
        assert!(!store.has_privilege(""));
        assert!(!store.has_privilege("not a token"));
        assert!(!store.has_privilege(ALL_PRIVILEGES_TOKEN));
        assert!(!store.has_any_privilege(&["cards.view", ""]));
        assert!(!store.has_any_privilege::<&str>(&[]));
        assert!(store.visible_navigation().is_empty());
        assert!(matches!(
            store.require_identity(),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn literal_membership_without_wildcard() {
        let store = AuthorizationStore::with_identity(identity_with(&[
            "cards.view",
            "approvals.view",
        ]));

        assert!(store.has_privilege("cards.view"));
        assert!(!store.has_privilege("cards.manage"));
        assert!(store.has_any_privilege(&["reports.view", "approvals.view"]));
        assert!(!store.has_any_privilege(&["reports.view"]));
        assert!(!store.has_any_privilege::<&str>(&[]));
    }

    #[test]
    fn wildcard_grants_every_token() {
        let store = AuthorizationStore::with_identity(identity_with(&[ALL_PRIVILEGES_TOKEN]));

        assert!(store.has_privilege("cards.view"));
        assert!(store.has_privilege("made.up"));
        assert!(store.has_privilege(""));
        assert!(store.has_any_privilege(&["anything"]));
        assert_eq!(
            store.visible_navigation().len(),
            partnerdesk_domain::NavigationEntry::catalog().len()
        );
    }

    #[test]
    fn set_identity_replaces_and_logout_clears() {
        let store = AuthorizationStore::new();
        store.set_identity(Some(identity_with(&["cards.view"])));
        assert!(store.has_privilege("cards.view"));

        store.set_identity(Some(identity_with(&["reports.view"])));
        assert!(!store.has_privilege("cards.view"));
        assert!(store.has_privilege("reports.view"));

        store.logout();
        assert!(store.identity().is_none());
        assert!(!store.has_privilege("reports.view"));
    }

    #[test]
    fn clones_share_the_session_slot() {
        let store = AuthorizationStore::new();
        let navigation_view = store.clone();

        store.set_identity(Some(identity_with(&["approvals.view"])));
        assert!(navigation_view.has_privilege("approvals.view"));
    }

    #[test]
    fn auditor_navigation_hides_card_operations() {
        let auditor = RoleTemplate::find("Auditor").map(|template| template.privileges);
        let store = AuthorizationStore::with_identity(identity_with(auditor.unwrap_or(&[])));

        let keys: Vec<&str> = store
            .visible_navigation()
            .iter()
            .map(|entry| entry.key)
            .collect();
        assert_eq!(keys, vec!["dashboard", "approvals", "reports"]);
    }
}
