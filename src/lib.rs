//! # Authgate (account signup & signin)
//!
//! `authgate` registers accounts and authenticates them by email and password.
//!
//! ## Accounts
//!
//! An account is a display name, a normalized email and a bcrypt password hash.
//!
//! - **Email Normalization:** Emails are trimmed and lower-cased before any lookup,
//!   so `A@B.com ` and `a@b.com` are the same account.
//! - **Uniqueness:** The store enforces one account per normalized email. A signup
//!   that loses a race against a concurrent signup for the same email is rejected
//!   exactly like one that found the email already registered.
//! - **Secrets:** Password hashes never leave the store layer; responses only carry
//!   `id`, `name` and `email`.
//!
//! ## Errors
//!
//! Validation and business rule failures are `400` with a specific reason.
//! Infrastructure failures (store unreachable, timeouts, hashing errors) are `500`
//! with a generic message; the cause is only logged.

pub mod account;
pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
