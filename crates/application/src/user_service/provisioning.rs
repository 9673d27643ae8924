use partnerdesk_core::{AppError, NonEmptyString};
use partnerdesk_domain::{EmailAddress, RoleTemplate, validate_password};

use super::*;

impl UserService {
    /// Creates a directory account carrying a built-in role's privileges.
    pub async fn provision_user(&self, input: ProvisionUserInput) -> AppResult<UserId> {
        let email_address = EmailAddress::new(input.email)?;
        let display_name = NonEmptyString::for_field("display_name", input.display_name)?;
        let template = RoleTemplate::find(&input.role).ok_or_else(|| {
            AppError::Validation(format!("unknown role template '{}'", input.role.trim()))
        })?;
        validate_password(&input.password)?;

        if self
            .directory
            .find_by_email(email_address.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "a user with email '{}' already exists",
                email_address.as_str()
            )));
        }

        let user_id = UserId::new();
        let password_hash = self.password_hasher.hash_password(&input.password)?;
        self.directory
            .save_user(DirectoryUser {
                user_id,
                email: email_address.into(),
                display_name: display_name.into(),
                role: template.name.to_owned(),
                privileges: template
                    .privileges
                    .iter()
                    .map(|token| (*token).to_owned())
                    .collect(),
                password_hash,
            })
            .await?;

        Ok(user_id)
    }
}
