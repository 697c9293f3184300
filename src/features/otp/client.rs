//! Client wrappers for the role-scoped OTP endpoints. Paths come from the
//! `OtpFlow` so the page never hardcodes a role. Must never log the code.

use crate::{
    app_lib::{AppError, post_json_text},
    features::otp::{
        role::OtpFlow,
        types::{ResendOtpRequest, ServiceReply, VerifyOtpRequest},
    },
};

/// Submits a code. `Ok` carries the server's confirmation text, if any.
pub async fn verify_otp(
    flow: OtpFlow,
    request: &VerifyOtpRequest,
) -> Result<Option<String>, AppError> {
    let body = post_json_text(flow.verify_path, request).await?;
    ServiceReply::from_body(&body)?.into_result()
}

/// Asks the service to mail a fresh code to `request.email`.
pub async fn resend_otp(
    flow: OtpFlow,
    request: &ResendOtpRequest,
) -> Result<Option<String>, AppError> {
    let body = post_json_text(flow.resend_path, request).await?;
    ServiceReply::from_body(&body)?.into_result()
}
