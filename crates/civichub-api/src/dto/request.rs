//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use civichub_auth::{CredentialChanges, NewCredential};
use civichub_core::error::AppError;
use civichub_entity::account::AccountRole;

/// `POST /api/login` body. Missing fields deserialize as empty and are
/// caught by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Account password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /api/admins` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateAdminRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    /// Email.
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Role; admin when omitted.
    pub role: Option<AccountRole>,
}

impl From<CreateAdminRequest> for NewCredential {
    fn from(req: CreateAdminRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            secret: req.password,
            role: Some(req.role.unwrap_or(AccountRole::Admin)),
        }
    }
}

/// `PUT /api/admins/{id}` body. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    /// New username.
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    /// New email.
    #[validate(email)]
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New role.
    pub role: Option<AccountRole>,
}

impl From<UpdateAdminRequest> for CredentialChanges {
    fn from(req: UpdateAdminRequest) -> Self {
        Self {
            email: req.email,
            username: req.username,
            secret: req.password,
            role: req.role,
        }
    }
}

/// Run the derive-generated validation, flattening failures into a
/// single `Validation` error.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate().map_err(validation_error)?;
    Ok(req)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for '{field}'"),
            })
        })
        .collect();
    messages.sort();
    AppError::validation(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_login_fields_fail_validation() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        let err = validated(req).unwrap_err();
        assert!(err.message.contains("Email is required"));
        assert!(err.message.contains("Password is required"));
    }

    #[test]
    fn test_create_defaults_to_admin() {
        let req = CreateAdminRequest {
            username: "ops".into(),
            email: "ops@civichub.org".into(),
            password: "long-enough".into(),
            role: None,
        };
        let input = NewCredential::from(validated(req).unwrap());
        assert_eq!(input.role, Some(AccountRole::Admin));
    }

    #[test]
    fn test_update_rejects_bad_email() {
        let req = UpdateAdminRequest {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(validated(req).is_err());
    }
}
