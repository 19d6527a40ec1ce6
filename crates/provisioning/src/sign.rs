//! Sign-up/sign-down wire types.

use serde::{Deserialize, Serialize};

use staffhub_core::AccountId;

use crate::bind::BindType;

/// An external authentication account, as the identity service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
}

/// Registration request for a new authentication account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub account_type: BindType,
    /// ISO-3166 alpha-2 country code.
    pub iso: String,
    /// Phone number or email address, depending on `account_type`.
    pub account: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Result of a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpResult {
    pub user_id: AccountId,
    pub username: String,
}
