//! Request/response types for the auth endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::account::Account;

/// Fields are optional so a missing field reads as empty rather than as a
/// malformed body.
#[derive(ToSchema, Serialize, Deserialize, Default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Default)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for SigninRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigninRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Public view of an account.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
