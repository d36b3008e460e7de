use thiserror::Error;

use crate::models::OrderStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long")]
    WeakPassword,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("User not found")]
    UserNotFound,

    #[error("Login failed")]
    LoginFailed,

    #[error("Registration failed")]
    RegistrationFailed,

    #[error("You must be logged in")]
    NotLoggedIn,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please fill in all address fields")]
    IncompleteAddress,

    #[error("Please fill in all payment fields")]
    IncompletePayment,

    #[error("There was an error processing your order")]
    OrderFailed,

    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("Product has already been reviewed")]
    DuplicateReview,

    #[error("Only delivered products can be reviewed")]
    NotEligibleForReview,

    #[error("Storage error")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal Error")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
