//! Auth handlers and supporting modules.
//!
//! This module owns the account lifecycle: registration with an Argon2id
//! password hash, single-use email verification, login that issues an HS256
//! session token, and the bearer gate that guards every protected route.
//!
//! ## Session Secret
//!
//! The signing secret is read once at startup and handed to
//! [`token::SessionCodec::new`]. There is no fallback value; a missing or short
//! secret aborts startup.

pub(crate) mod flow;
pub mod gate;
pub mod login;
pub mod password;
pub mod profile;
pub mod register;
mod state;
pub mod token;
pub(crate) mod types;
pub mod verification;

pub use gate::{authenticate, CurrentUser};
pub use state::{AuthConfig, AuthState};
pub use token::{SessionClaims, SessionCodec, TokenError};
