// ABOUTME: Session verification seam between callers and the tracking services
// ABOUTME: Maps an opaque session token to a user id or an authentication error
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Authentication
//!
//! Session issuance lives outside this crate. Callers hand in the opaque token they
//! received and a [`SessionVerifier`] resolves it to a [`UserId`]. Every service
//! operation that touches user records starts with [`require_user`].

use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::UserId;
use async_trait::async_trait;
use std::collections::HashMap;

/// Result of verifying a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Token maps to this user
    Authenticated(UserId),
    /// Token missing, expired or unknown
    Unauthenticated,
}

/// Resolves session tokens to users
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify a session token
    ///
    /// # Errors
    ///
    /// Returns an error only when the verifier itself fails; an unknown token is
    /// [`AuthOutcome::Unauthenticated`]
    async fn verify(&self, token: &str) -> AppResult<AuthOutcome>;
}

/// Verify `token` and return the user, or fail with `AUTH_REQUIRED` (401)
///
/// # Errors
///
/// Returns `ErrorCode::AuthRequired` for unauthenticated sessions, or the
/// verifier's own error
pub async fn require_user(verifier: &dyn SessionVerifier, token: Option<&str>) -> AppResult<UserId> {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        AppLogger::log_auth_event(None, "missing_token", false);
        return Err(AppError::auth_required());
    };

    match verifier.verify(token).await? {
        AuthOutcome::Authenticated(user_id) => {
            AppLogger::log_auth_event(Some(user_id.as_str()), "session_verified", true);
            Ok(user_id)
        }
        AuthOutcome::Unauthenticated => {
            AppLogger::log_auth_event(None, "session_rejected", false);
            Err(AppError::auth_required())
        }
    }
}

/// Fixed token → user map, for tests and local tooling
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    sessions: HashMap<String, UserId>,
}

impl StaticTokenVerifier {
    /// Empty verifier; every token is rejected
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a user
    #[must_use]
    pub fn with_session(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.sessions.insert(token.into(), user_id);
        self
    }
}

#[async_trait]
impl SessionVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> AppResult<AuthOutcome> {
        Ok(self
            .sessions
            .get(token)
            .cloned()
            .map_or(AuthOutcome::Unauthenticated, AuthOutcome::Authenticated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[tokio::test]
    async fn test_require_user_accepts_known_token() {
        let verifier = StaticTokenVerifier::new().with_session("token-a", UserId::new("user-a"));
        let user = require_user(&verifier, Some("token-a")).await.unwrap();
        assert_eq!(user, UserId::new("user-a"));
    }

    #[tokio::test]
    async fn test_require_user_rejects_unknown_and_missing() {
        let verifier = StaticTokenVerifier::new().with_session("token-a", UserId::new("user-a"));

        let unknown = require_user(&verifier, Some("token-b")).await.unwrap_err();
        assert_eq!(unknown.code, ErrorCode::AuthRequired);
        assert_eq!(unknown.http_status(), 401);

        let missing = require_user(&verifier, None).await.unwrap_err();
        assert_eq!(missing.code, ErrorCode::AuthRequired);

        let blank = require_user(&verifier, Some("  ")).await.unwrap_err();
        assert_eq!(blank.code, ErrorCode::AuthRequired);
    }
}
