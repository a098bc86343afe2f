use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;
use crate::validation::{self, FieldErrors};

/// Request body for login. Fields are optional so absence is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated login credentials.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = validation::required(&mut errors, "email", self.email.as_deref());
        if let Some(email) = email {
            validation::email(&mut errors, "email", email);
        }
        // Passwords are taken verbatim; only absence is rejected.
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => Some(p),
            _ => {
                errors.add("password", "The password field is required.");
                None
            }
        };
        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
