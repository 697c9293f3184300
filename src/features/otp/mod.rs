//! Email verification by one-time code, shared by every role that registers
//! with one.
//!
//! Flow Overview: the page mounts with the email handed over by the
//! registration step and a running resend cooldown. The user fills six digit
//! cells and submits; success redirects to the role's login route, failure
//! clears the cells after a short delay. Once the cooldown expires the user
//! may request a new code, which restarts it.
//!
//! `code`, `machine`, `role` and `types` are browser-independent; `client`
//! performs the requests.

#[cfg(target_arch = "wasm32")]
pub(crate) mod client;
pub(crate) mod code;
pub(crate) mod machine;
pub(crate) mod role;
pub(crate) mod types;

pub(crate) use code::CODE_LENGTH;
pub(crate) use machine::{
    NoticeKind, OtpEffect, OtpWidget, RESEND_COOLDOWN_SECS, TICK_INTERVAL_MS, VerificationState,
};
pub(crate) use role::{OtpFlow, Role};
