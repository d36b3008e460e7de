use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Input accepted by the account service. The password is taken but never stored.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Sign-up form as entered by the user, before validation.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RegisterForm {
    pub fn validate(self) -> AppResult<RegisterRequest> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(AppError::Validation(
                "Please fill in all required fields".into(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(AppError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::WeakPassword);
        }

        Ok(RegisterRequest {
            name: self.name,
            email: self.email,
            password: self.password,
            phone: self.phone.filter(|phone| !phone.is_empty()),
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
