use chrono::Utc;
use validator::Validate;

use super::actions::UserAction;
use crate::actor_framework::Entity;
use crate::domain::{Role, User, UserCreate, UserId, UserProfilePatch};

impl Entity for User {
    const KIND: &'static str = "User";

    type Id = UserId;
    type CreateParams = UserCreate;
    type Patch = UserProfilePatch;
    type Action = UserAction;
    type ActionResult = bool;

    fn id(&self) -> &UserId {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// New users always start with the `user` role.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, String> {
        if params.user_name.trim().is_empty() {
            return Err("user name must not be empty".to_string());
        }
        params.validate().map_err(|e| e.to_string())?;

        Ok(Self {
            id,
            user_name: params.user_name,
            email: params.email,
            fullname: params.fullname,
            phone_no: params.phone_no,
            address: None,
            post_code: None,
            role: Role::User,
            created_at: Utc::now(),
        })
    }

    /// User names and email addresses are unique. Emails compare case-insensitively.
    fn unique_keys(&self) -> Vec<String> {
        vec![
            format!("user_name {}", self.user_name),
            format!("email {}", self.email.to_lowercase()),
        ]
    }

    /// Applies the provided profile fields.
    ///
    /// Admin profiles are managed out of band and cannot be edited here.
    fn on_update(&mut self, patch: UserProfilePatch) -> Result<(), String> {
        if self.is_admin() {
            return Err("Admins are not authorized to update user data".to_string());
        }
        patch.validate().map_err(|e| e.to_string())?;
        if let Some(fullname) = patch.fullname {
            self.fullname = Some(fullname);
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone_no) = patch.phone_no {
            self.phone_no = Some(phone_no);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(post_code) = patch.post_code {
            self.post_code = Some(post_code);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<bool, String> {
        match action {
            UserAction::PromoteToAdmin => {
                if self.is_admin() {
                    Ok(false)
                } else {
                    self.role = Role::Admin;
                    Ok(true)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["x@y@z.", "x@.", "no-at-sign", "@example.com"] {
            let result = User::from_create_params(1, UserCreate::new("cat", email));
            assert!(result.is_err(), "{email} should be rejected");
        }
        assert!(User::from_create_params(1, UserCreate::new("cat", "cat@example.com")).is_ok());
    }

    #[test]
    fn profile_patch_validates_email_and_keeps_old_value() {
        let mut user = User::from_create_params(1, UserCreate::new("cat", "cat@example.com")).unwrap();
        let patch = UserProfilePatch {
            email: Some("x@y@z.".to_string()),
            ..UserProfilePatch::default()
        };

        assert!(user.on_update(patch).is_err());
        assert_eq!(user.email, "cat@example.com");
    }

    #[test]
    fn email_key_ignores_case() {
        let lower = User::from_create_params(1, UserCreate::new("a", "dup@example.com")).unwrap();
        let upper = User::from_create_params(2, UserCreate::new("b", "DUP@example.com")).unwrap();

        assert!(lower.unique_keys().iter().any(|key| upper.unique_keys().contains(key)));
    }
}
