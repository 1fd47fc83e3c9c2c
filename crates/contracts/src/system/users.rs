use serde::{Deserialize, Serialize};

use crate::shared::serde_helpers::string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role: UserRole,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if !self.email.contains('@') {
            return Err("Email is not valid".into());
        }
        if self.password.len() < 6 {
            return Err("Password must be at least 6 characters".into());
        }
        Ok(())
    }
}

/// Partial body for `PATCH /user/:id`; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

impl ChangePasswordDto {
    pub fn validate(&self, confirmation: &str) -> Result<(), String> {
        if self.new_password.len() < 6 {
            return Err("New password must be at least 6 characters".into());
        }
        if self.new_password != confirmation {
            return Err("Passwords do not match".into());
        }
        if self.new_password == self.old_password {
            return Err("New password must differ from the current one".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_update_skips_absent_fields() {
        let dto = UpdateUserDto {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&dto).unwrap(), json!({ "role": "admin" }));
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "Ann",
            "email": "ann@example.com"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!user.role.is_admin());
    }

    #[test]
    fn test_change_password_validation() {
        let dto = ChangePasswordDto {
            old_password: "secret1".into(),
            new_password: "secret2".into(),
        };
        assert!(dto.validate("secret2").is_ok());
        assert_eq!(dto.validate("other").unwrap_err(), "Passwords do not match");

        let same = ChangePasswordDto {
            old_password: "secret1".into(),
            new_password: "secret1".into(),
        };
        assert!(same.validate("secret1").is_err());
    }

    #[test]
    fn test_create_user_validation() {
        let mut dto = CreateUserDto {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "hunter22".into(),
            address: None,
            role: UserRole::User,
        };
        assert!(dto.validate().is_ok());
        dto.email = "bob".into();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_user_with_numeric_id() {
        let users: Vec<User> = serde_json::from_value(json!([
            { "id": 42, "name": "Ann", "email": "ann@example.com", "role": "admin" }
        ]))
        .unwrap();
        assert_eq!(users[0].id, "42");
        assert!(users[0].role.is_admin());
    }
}
