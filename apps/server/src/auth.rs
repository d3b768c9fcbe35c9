//! Caller identity boundary.
//!
//! Authentication happens upstream: the API gateway validates the session
//! and forwards the caller as an `X-User-Id` header before a request ever
//! reaches this service. This module only extracts that fact and answers
//! the admin question; it never validates credentials itself.

use axum::http::HeaderMap;

/// Header the gateway sets after authenticating the caller.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extract the authenticated user id, if the gateway attached one.
pub fn extract_user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Check if the authenticated user is the admin.
pub fn is_admin(user_id: &str, admin_user_id: &str) -> bool {
    !admin_user_id.is_empty() && user_id == admin_user_id
}

// ── Tests ──
