//! Shared frontend utilities for API access, configuration, errors, logging,
//! and build metadata.
//!
//! ## OTP Verification Flow
//!
//! 1. **Register:** The role's registration page (served elsewhere) creates the
//!    account and the backend mails a 6-digit code.
//! 2. **Verify:** The user lands on `/{role}/verify-otp?email=...` and POSTs the
//!    code to `/api/{role}/otpverify`.
//! 3. **Resend:** After the cooldown the user may POST the held email to
//!    `/api/{role}/resend-otp` for a fresh code.
//! 4. **Sign in:** On success the page redirects to the role's login route.
//!
//! Only `api`, `build_info` and parts of `config`/`telemetry` touch browser
//! APIs; everything else compiles and is tested on the host.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
#[cfg(target_arch = "wasm32")]
#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub(crate) mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod telemetry;

#[cfg(target_arch = "wasm32")]
pub(crate) const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(target_arch = "wasm32")]
pub(crate) use api::post_json_text;
pub(crate) use errors::AppError;

/// Joins an API base URL and a path without doubling or dropping slashes.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
