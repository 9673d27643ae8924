use partnerdesk_core::AppError;
use partnerdesk_domain::{AuditAction, EmailAddress};

use crate::{AuditEvent, AuthorizationStore};

use super::*;

const SESSION_RESOURCE_TYPE: &str = "session";
const INVALID_CREDENTIALS: &str = "invalid email or password";

impl UserService {
    /// Authenticates a portal user with email and password.
    ///
    /// Every failure returns the same `Unauthorized` message.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserIdentity> {
        let account = match EmailAddress::new(email) {
            Ok(email_address) => self.directory.find_by_email(email_address.as_str()).await?,
            Err(_) => None,
        };

        let Some(account) = account else {
            // Hash anyway so response time does not reveal unknown emails.
            let _ = self.password_hasher.hash_password(password);
            self.record_login_failure(email).await?;
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        if !self
            .password_hasher
            .verify_password(password, &account.password_hash)?
        {
            self.record_login_failure(&account.email).await?;
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        let identity = account.identity();
        self.audit_repository
            .append_event(AuditEvent {
                subject: identity.subject().to_owned(),
                action: AuditAction::SessionLoginSucceeded,
                resource_type: SESSION_RESOURCE_TYPE.to_owned(),
                resource_id: identity.email().to_owned(),
                detail: Some(format!("signed in as '{}'", identity.role())),
            })
            .await?;

        Ok(identity)
    }

    /// Authenticates and installs the identity into a session store.
    pub async fn login_into(
        &self,
        store: &AuthorizationStore,
        email: &str,
        password: &str,
    ) -> AppResult<UserIdentity> {
        let identity = self.login(email, password).await?;
        store.set_identity(Some(identity.clone()));
        Ok(identity)
    }

    /// Records a logout and clears the session store.
    pub async fn logout(&self, store: &AuthorizationStore) -> AppResult<()> {
        let Some(identity) = store.identity() else {
            return Ok(());
        };
        store.logout();

        self.audit_repository
            .append_event(AuditEvent {
                subject: identity.subject().to_owned(),
                action: AuditAction::SessionLogout,
                resource_type: SESSION_RESOURCE_TYPE.to_owned(),
                resource_id: identity.email().to_owned(),
                detail: None,
            })
            .await
    }

    async fn record_login_failure(&self, email: &str) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: "anonymous".to_owned(),
                action: AuditAction::SessionLoginFailed,
                resource_type: SESSION_RESOURCE_TYPE.to_owned(),
                resource_id: email.trim().to_lowercase(),
                detail: None,
            })
            .await
    }
}
