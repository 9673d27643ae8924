use partnerdesk_core::{AppError, AppResult, UserIdentity};
use partnerdesk_domain::{Privilege, PrivilegeSet};

/// Server-side privilege guard applied at the mutation boundary.
///
/// Privileges travel with the identity, so the guard holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Ensures the actor holds `privilege`.
    pub fn require_privilege(&self, actor: &UserIdentity, privilege: Privilege) -> AppResult<()> {
        if self.has_privilege(actor, privilege) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing privilege '{}'",
            actor.subject(),
            privilege.as_str()
        )))
    }

    /// Ensures the actor holds every privilege in `privileges`.
    pub fn require_all(&self, actor: &UserIdentity, privileges: &[Privilege]) -> AppResult<()> {
        privileges
            .iter()
            .try_for_each(|privilege| self.require_privilege(actor, *privilege))
    }

    /// Returns whether the actor holds `privilege`.
    #[must_use]
    pub fn has_privilege(&self, actor: &UserIdentity, privilege: Privilege) -> bool {
        PrivilegeSet::for_identity(actor).grants_privilege(privilege)
    }
}
