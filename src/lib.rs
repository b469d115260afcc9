//! # JobStar (Job Application Tracker)
//!
//! `jobstar` is an HTTP API where registered users record the jobs they applied
//! for, move them through a small status pipeline, and look at aggregated
//! statistics.
//!
//! ## Accounts
//!
//! Registration stores an Argon2id password hash and a single-use, 80 hex
//! character verification token. The token is mailed as a link; following it
//! flips the account to verified and clears the token. Only verified accounts
//! can log in.
//!
//! ## Sessions
//!
//! Login returns an HS256-signed JWT valid for two hours. The signing secret is
//! required configuration; there is no built-in fallback. Protected routes run
//! behind an authentication gate that decodes the token once into typed claims
//! and injects the caller's id into the request.
//!
//! ## Ownership
//!
//! Every job records its creator in `createdBy`. Updates and deletes look the
//! job up by id alone, then compare `createdBy` with the caller: a missing job
//! is `404 Not Found`, someone else's job is `403 Forbidden`.

pub mod api;
pub mod cli;
pub mod models;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
