//! Verification widget state machine.
//!
//! `OtpWidget` owns everything the page shows and decides every transition.
//! Each operation returns the `OtpEffect`s the page must carry out (focus,
//! requests, timers, toasts), so the rules here run without a browser.

use super::code::{CODE_LENGTH, CellEdit, OtpCode};
use crate::app_lib::AppError;

/// Seconds the user waits before another code may be requested.
pub const RESEND_COOLDOWN_SECS: u32 = 30;
/// Period of the cooldown tick.
pub const TICK_INTERVAL_MS: u32 = 1_000;
/// Delay between a failed verification and the code being cleared.
pub const FAILURE_RESET_DELAY_MS: u32 = 1_000;
/// Delay between a successful verification and the redirect to login.
pub const SUCCESS_REDIRECT_DELAY_MS: u32 = 2_000;

const INCOMPLETE_CODE_MESSAGE: &str = "Please enter the complete 6-digit code.";
const VERIFIED_MESSAGE: &str = "Email verified. Redirecting to login...";
const RESENT_MESSAGE: &str = "A new code has been sent to your email.";
const MISSING_EMAIL_MESSAGE: &str =
    "No email address is known for this verification. Please register again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerificationState {
    #[default]
    Idle,
    Error,
    Success,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// One-shot user notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// Work the page performs on behalf of the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OtpEffect {
    Focus(usize),
    /// POST the code to the verification endpoint.
    Verify(String),
    /// POST the email to the resend endpoint.
    Resend(String),
    /// Call `reset_elapsed` after the delay.
    ScheduleReset { after_ms: u32 },
    /// Navigate to the login route after the delay.
    ScheduleRedirect { after_ms: u32 },
    /// Cancel the cooldown ticker.
    StopTimer,
    Notify(Notice),
}

#[derive(Clone, Debug, PartialEq)]
pub struct OtpWidget {
    code: OtpCode,
    state: VerificationState,
    cooldown: u32,
    email: String,
    verify_pending: bool,
    resend_pending: bool,
    /// A failed code is still shown and a reset is scheduled.
    reset_pending: bool,
}

impl OtpWidget {
    /// Fresh widget for a mount. The cooldown starts running immediately
    /// since a code was just sent by the registration step.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            code: OtpCode::new(),
            state: VerificationState::Idle,
            cooldown: RESEND_COOLDOWN_SECS,
            email: email.into().trim().to_string(),
            verify_pending: false,
            resend_pending: false,
            reset_pending: false,
        }
    }

    pub fn code(&self) -> &OtpCode {
        &self.code
    }

    pub fn state(&self) -> VerificationState {
        self.state
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_verifying(&self) -> bool {
        self.verify_pending
    }

    pub fn is_resending(&self) -> bool {
        self.resend_pending
    }

    pub fn is_verified(&self) -> bool {
        self.state == VerificationState::Success
    }

    pub fn can_submit(&self) -> bool {
        !self.is_verified()
            && !self.verify_pending
            && !self.reset_pending
            && self.code.is_complete()
    }

    pub fn can_resend(&self) -> bool {
        !self.is_verified() && !self.resend_pending && self.cooldown == 0
    }

    /// Whether the cooldown ticker still has work to do.
    pub fn needs_tick(&self) -> bool {
        !self.is_verified() && self.cooldown > 0
    }

    /// Applies the value of the input at `index`. A value that is a whole
    /// code (browser one-time-code autofill) fills every cell.
    pub fn input(&mut self, index: usize, value: &str) -> Vec<OtpEffect> {
        if self.is_verified() {
            return Vec::new();
        }
        let edit = if is_whole_code(value) {
            self.code.paste(0, value)
        } else {
            self.code.input(index, value)
        };
        self.after_edit(edit)
    }

    pub fn backspace(&mut self, index: usize) -> Vec<OtpEffect> {
        if self.is_verified() {
            return Vec::new();
        }
        let edit = self.code.backspace(index);
        self.after_edit(edit)
    }

    pub fn paste(&mut self, index: usize, text: &str) -> Vec<OtpEffect> {
        if self.is_verified() {
            return Vec::new();
        }
        let edit = self.code.paste(index, text);
        self.after_edit(edit)
    }

    fn after_edit(&mut self, edit: CellEdit) -> Vec<OtpEffect> {
        match edit {
            CellEdit::Changed { focus } => {
                if self.state == VerificationState::Error {
                    self.state = VerificationState::Idle;
                }
                focus.map(OtpEffect::Focus).into_iter().collect()
            }
            CellEdit::Moved { focus } => vec![OtpEffect::Focus(focus)],
            CellEdit::Rejected | CellEdit::Unchanged => Vec::new(),
        }
    }

    /// Starts a verification. Repeated calls while one is pending, or while
    /// a rejected code waits to be cleared, do nothing.
    pub fn submit(&mut self) -> Vec<OtpEffect> {
        if self.is_verified() || self.verify_pending || self.reset_pending {
            return Vec::new();
        }

        match self.code.value() {
            Some(code) => {
                tracing::debug!("submitting verification code");
                self.verify_pending = true;
                vec![OtpEffect::Verify(code)]
            }
            None => {
                self.state = VerificationState::Error;
                vec![OtpEffect::Notify(Notice::error(INCOMPLETE_CODE_MESSAGE))]
            }
        }
    }

    /// Applies the outcome of a verification request. `Ok` may carry the
    /// server's own confirmation text.
    pub fn verify_resolved(&mut self, result: Result<Option<String>, AppError>) -> Vec<OtpEffect> {
        if self.is_verified() {
            return Vec::new();
        }
        self.verify_pending = false;

        match result {
            Ok(message) => {
                tracing::info!("email verified");
                self.state = VerificationState::Success;
                vec![
                    OtpEffect::StopTimer,
                    OtpEffect::Notify(Notice::success(
                        message.unwrap_or_else(|| VERIFIED_MESSAGE.to_string()),
                    )),
                    OtpEffect::ScheduleRedirect {
                        after_ms: SUCCESS_REDIRECT_DELAY_MS,
                    },
                ]
            }
            Err(err) => {
                tracing::info!(error = %err, "verification failed");
                self.state = VerificationState::Error;
                self.reset_pending = true;
                vec![
                    OtpEffect::Notify(Notice::error(err.user_message())),
                    OtpEffect::ScheduleReset {
                        after_ms: FAILURE_RESET_DELAY_MS,
                    },
                ]
            }
        }
    }

    /// Clears the code once the failure delay has passed.
    pub fn reset_elapsed(&mut self) -> Vec<OtpEffect> {
        if self.is_verified() || !self.reset_pending {
            return Vec::new();
        }
        self.reset_pending = false;
        self.code.clear();
        self.state = VerificationState::Idle;
        vec![OtpEffect::Focus(0)]
    }

    /// One cooldown second. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        if !self.needs_tick() {
            return false;
        }
        self.cooldown -= 1;
        if self.cooldown == 0 {
            tracing::debug!("resend available");
        }
        true
    }

    pub fn resend(&mut self) -> Vec<OtpEffect> {
        if !self.can_resend() {
            return Vec::new();
        }
        if self.email.is_empty() {
            tracing::warn!("resend requested without an email address");
            return vec![OtpEffect::Notify(Notice::error(MISSING_EMAIL_MESSAGE))];
        }

        tracing::debug!("requesting a new code");
        self.resend_pending = true;
        vec![OtpEffect::Resend(self.email.clone())]
    }

    pub fn resend_resolved(&mut self, result: Result<Option<String>, AppError>) -> Vec<OtpEffect> {
        if self.is_verified() {
            return Vec::new();
        }
        self.resend_pending = false;

        match result {
            Ok(message) => {
                self.code.clear();
                self.state = VerificationState::Idle;
                self.reset_pending = false;
                self.cooldown = RESEND_COOLDOWN_SECS;
                vec![
                    OtpEffect::Notify(Notice::info(
                        message.unwrap_or_else(|| RESENT_MESSAGE.to_string()),
                    )),
                    OtpEffect::Focus(0),
                ]
            }
            Err(err) => {
                tracing::info!(error = %err, "resend failed");
                vec![OtpEffect::Notify(Notice::error(err.user_message()))]
            }
        }
    }
}

fn is_whole_code(value: &str) -> bool {
    value.len() == CODE_LENGTH && value.chars().all(|digit| digit.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::errors::GENERIC_FAILURE_MESSAGE;

    const EMAIL: &str = "ada@campus.edu";

    fn enter(widget: &mut OtpWidget, digits: &str) {
        for (index, digit) in digits.chars().enumerate() {
            widget.input(index, &digit.to_string());
        }
    }

    fn ready_widget() -> OtpWidget {
        let mut widget = OtpWidget::new(EMAIL);
        enter(&mut widget, "452917");
        widget
    }

    fn drain_cooldown(widget: &mut OtpWidget) {
        while widget.tick() {}
    }

    fn invalid_otp() -> AppError {
        AppError::Http {
            status: 400,
            message: "Invalid OTP".to_string(),
        }
    }

    #[test]
    fn new_widget_is_idle_with_full_cooldown() {
        let widget = OtpWidget::new("  ada@campus.edu ");
        assert_eq!(widget.state(), VerificationState::Idle);
        assert_eq!(widget.cooldown(), RESEND_COOLDOWN_SECS);
        assert_eq!(widget.email(), EMAIL);
        assert!(!widget.can_submit());
        assert!(!widget.can_resend());
    }

    #[test]
    fn submit_enabled_exactly_when_all_cells_filled() {
        let mut widget = OtpWidget::new(EMAIL);
        for (index, digit) in "452917".chars().enumerate() {
            assert!(!widget.can_submit());
            widget.input(index, &digit.to_string());
        }
        assert!(widget.can_submit());

        widget.backspace(3);
        assert!(!widget.can_submit());
        widget.input(3, "9");
        assert!(widget.can_submit());
    }

    #[test]
    fn digit_entry_advances_focus_until_last_cell() {
        let mut widget = OtpWidget::new(EMAIL);
        for index in 0..CODE_LENGTH - 1 {
            assert_eq!(widget.input(index, "1"), vec![OtpEffect::Focus(index + 1)]);
        }
        assert!(widget.input(CODE_LENGTH - 1, "1").is_empty());
    }

    #[test]
    fn non_digit_input_changes_nothing() {
        let mut widget = OtpWidget::new(EMAIL);
        widget.input(0, "4");
        let before = widget.clone();
        assert!(widget.input(1, "x").is_empty());
        assert!(widget.input(1, "45").is_empty());
        assert_eq!(widget, before);
    }

    #[test]
    fn backspace_focus_rules() {
        let mut widget = OtpWidget::new(EMAIL);
        enter(&mut widget, "12");

        assert_eq!(widget.backspace(2), vec![OtpEffect::Focus(1)]);
        assert_eq!(widget.code().cell(1), Some('2'));
        assert!(widget.backspace(1).is_empty());
        assert_eq!(widget.code().cell(1), None);

        assert!(widget.backspace(0).is_empty());
        assert_eq!(widget.code().cell(0), None);
        assert!(widget.backspace(0).is_empty());
    }

    #[test]
    fn incomplete_submit_sets_error_without_request() {
        let mut widget = OtpWidget::new(EMAIL);
        enter(&mut widget, "452");
        let effects = widget.submit();
        assert_eq!(widget.state(), VerificationState::Error);
        assert_eq!(
            effects,
            vec![OtpEffect::Notify(Notice::error(INCOMPLETE_CODE_MESSAGE))]
        );
        assert!(!widget.is_verifying());
    }

    #[test]
    fn editing_clears_error() {
        let mut widget = OtpWidget::new(EMAIL);
        widget.submit();
        assert_eq!(widget.state(), VerificationState::Error);
        widget.input(0, "x");
        assert_eq!(widget.state(), VerificationState::Error);
        widget.input(0, "4");
        assert_eq!(widget.state(), VerificationState::Idle);
    }

    #[test]
    fn complete_submit_requests_verification_once() {
        let mut widget = ready_widget();
        assert_eq!(widget.submit(), vec![OtpEffect::Verify("452917".to_string())]);
        assert!(widget.is_verifying());
        assert!(!widget.can_submit());
        assert!(widget.submit().is_empty());
        assert!(widget.submit().is_empty());
    }

    #[test]
    fn successful_verification_schedules_redirect() {
        let mut widget = ready_widget();
        widget.submit();
        let effects = widget.verify_resolved(Ok(None));

        assert_eq!(widget.state(), VerificationState::Success);
        assert_eq!(
            effects,
            vec![
                OtpEffect::StopTimer,
                OtpEffect::Notify(Notice::success(VERIFIED_MESSAGE)),
                OtpEffect::ScheduleRedirect { after_ms: 2_000 },
            ]
        );
        assert!(!widget.is_verifying());
    }

    #[test]
    fn verified_widget_accepts_no_further_edits() {
        let mut widget = ready_widget();
        widget.submit();
        widget.verify_resolved(Ok(Some("Verified".to_string())));
        let before = widget.clone();

        assert!(widget.input(0, "1").is_empty());
        assert!(widget.backspace(5).is_empty());
        assert!(widget.paste(0, "111111").is_empty());
        assert!(widget.submit().is_empty());
        assert!(widget.resend().is_empty());
        assert!(widget.reset_elapsed().is_empty());
        assert!(!widget.tick());
        assert!(widget.verify_resolved(Err(invalid_otp())).is_empty());
        assert!(widget.resend_resolved(Ok(None)).is_empty());
        assert_eq!(widget, before);
        assert!(!widget.can_submit());
        assert!(!widget.can_resend());
    }

    #[test]
    fn failed_verification_clears_after_delay() {
        let mut widget = OtpWidget::new(EMAIL);
        enter(&mut widget, "452917");
        widget.submit();

        let effects = widget.verify_resolved(Err(invalid_otp()));
        assert_eq!(widget.state(), VerificationState::Error);
        assert_eq!(
            effects,
            vec![
                OtpEffect::Notify(Notice::error("Invalid OTP")),
                OtpEffect::ScheduleReset { after_ms: 1_000 },
            ]
        );
        assert_eq!(widget.code().value(), Some("452917".to_string()));

        assert_eq!(widget.reset_elapsed(), vec![OtpEffect::Focus(0)]);
        assert_eq!(widget.state(), VerificationState::Idle);
        assert!((0..CODE_LENGTH).all(|index| widget.code().cell(index).is_none()));
        assert!(!widget.can_submit());
    }

    #[test]
    fn rejected_code_cannot_be_resubmitted_before_reset() {
        let mut widget = ready_widget();
        widget.submit();
        widget.verify_resolved(Err(AppError::Network("offline".to_string())));

        assert_eq!(widget.state(), VerificationState::Error);
        assert_eq!(widget.code().value(), Some("452917".to_string()));
        assert!(!widget.can_submit());
        assert!(widget.submit().is_empty());
        assert!(!widget.is_verifying());

        assert_eq!(widget.reset_elapsed(), vec![OtpEffect::Focus(0)]);
        enter(&mut widget, "452918");
        assert!(widget.can_submit());
        assert_eq!(widget.submit(), vec![OtpEffect::Verify("452918".to_string())]);
    }

    #[test]
    fn reset_without_a_failure_does_nothing() {
        let mut widget = OtpWidget::new(EMAIL);
        enter(&mut widget, "45");
        assert!(widget.reset_elapsed().is_empty());
        assert_eq!(widget.code().cell(1), Some('5'));
    }

    #[test]
    fn stale_reset_after_resend_keeps_new_entry() {
        let mut widget = ready_widget();
        widget.submit();
        widget.verify_resolved(Err(invalid_otp()));
        drain_cooldown(&mut widget);
        widget.resend();
        widget.resend_resolved(Ok(None));
        enter(&mut widget, "12");

        assert!(widget.reset_elapsed().is_empty());
        assert_eq!(widget.code().cell(1), Some('2'));
    }

    #[test]
    fn autofilled_whole_code_fills_every_cell() {
        let mut widget = OtpWidget::new(EMAIL);
        assert_eq!(widget.input(0, "452917"), vec![OtpEffect::Focus(5)]);
        assert_eq!(widget.code().value(), Some("452917".to_string()));
        assert!(widget.can_submit());

        let mut partial = OtpWidget::new(EMAIL);
        assert!(partial.input(0, "4529").is_empty());
        assert!(partial.input(0, "45291a").is_empty());
        assert_eq!(partial.code().value(), None);
    }

    #[test]
    fn transport_failure_uses_generic_message() {
        let mut widget = ready_widget();
        widget.submit();
        let effects =
            widget.verify_resolved(Err(AppError::Timeout("Request timed out.".to_string())));
        assert_eq!(
            effects[0],
            OtpEffect::Notify(Notice::error(GENERIC_FAILURE_MESSAGE))
        );
        assert!(!widget.is_verifying());
    }

    #[test]
    fn cooldown_ticks_down_to_resend() {
        let mut widget = OtpWidget::new(EMAIL);
        for remaining in (0..RESEND_COOLDOWN_SECS).rev() {
            assert!(!widget.can_resend());
            assert!(widget.tick());
            assert_eq!(widget.cooldown(), remaining);
        }
        assert!(widget.can_resend());
        assert!(!widget.needs_tick());
        assert!(!widget.tick());
        assert_eq!(widget.cooldown(), 0);
    }

    #[test]
    fn resend_resets_code_state_and_cooldown() {
        let mut widget = ready_widget();
        widget.submit();
        widget.verify_resolved(Err(invalid_otp()));
        drain_cooldown(&mut widget);

        assert_eq!(widget.resend(), vec![OtpEffect::Resend(EMAIL.to_string())]);
        assert!(widget.is_resending());
        assert!(!widget.can_resend());
        assert!(widget.resend().is_empty());

        let effects = widget.resend_resolved(Ok(None));
        assert_eq!(
            effects,
            vec![
                OtpEffect::Notify(Notice::info(RESENT_MESSAGE)),
                OtpEffect::Focus(0),
            ]
        );
        assert_eq!(widget.state(), VerificationState::Idle);
        assert_eq!(widget.cooldown(), RESEND_COOLDOWN_SECS);
        assert_eq!(widget.code(), &OtpCode::new());
        assert!(!widget.can_resend());
    }

    #[test]
    fn failed_resend_keeps_cooldown_open() {
        let mut widget = OtpWidget::new(EMAIL);
        enter(&mut widget, "45");
        drain_cooldown(&mut widget);
        widget.resend();

        let effects = widget.resend_resolved(Err(AppError::Http {
            status: 429,
            message: "Too many requests".to_string(),
        }));
        assert_eq!(
            effects,
            vec![OtpEffect::Notify(Notice::error("Too many requests"))]
        );
        assert_eq!(widget.cooldown(), 0);
        assert!(widget.can_resend());
        assert_eq!(widget.code().cell(1), Some('5'));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn resend_logs_never_include_the_email() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut widget = ready_widget();
            drain_cooldown(&mut widget);
            widget.resend();
            widget.resend_resolved(Err(invalid_otp()));
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("requesting a new code"));
        assert!(!output.contains(EMAIL));
    }

    #[test]
    fn resend_without_email_notifies_instead_of_requesting() {
        let mut widget = OtpWidget::new("   ");
        drain_cooldown(&mut widget);
        let effects = widget.resend();
        assert_eq!(
            effects,
            vec![OtpEffect::Notify(Notice::error(MISSING_EMAIL_MESSAGE))]
        );
        assert!(!widget.is_resending());
    }

    #[test]
    fn success_freezes_cooldown() {
        let mut widget = ready_widget();
        widget.tick();
        widget.submit();
        widget.verify_resolved(Ok(None));
        assert_eq!(widget.cooldown(), RESEND_COOLDOWN_SECS - 1);
        assert!(!widget.needs_tick());
    }

    #[test]
    fn paste_fills_code_and_focuses_last_cell() {
        let mut widget = OtpWidget::new(EMAIL);
        widget.submit();
        assert_eq!(widget.paste(0, "452917"), vec![OtpEffect::Focus(5)]);
        assert_eq!(widget.state(), VerificationState::Idle);
        assert!(widget.can_submit());
    }

    #[test]
    fn failing_scenario_ends_empty_with_focus_on_first_cell() {
        let mut widget = OtpWidget::new(EMAIL);
        for (index, digit) in ["4", "5", "2", "9", "1", "7"].into_iter().enumerate() {
            widget.input(index, digit);
        }
        let Some(OtpEffect::Verify(code)) = widget.submit().into_iter().next() else {
            panic!("expected a verification request");
        };
        assert_eq!(code, "452917");

        widget.verify_resolved(Err(AppError::Network("offline".to_string())));
        assert_eq!(widget.state(), VerificationState::Error);
        let effects = widget.reset_elapsed();
        assert_eq!(effects, vec![OtpEffect::Focus(0)]);
        assert_eq!(widget.code().value(), None);
        assert_eq!(widget.state(), VerificationState::Idle);
    }
}
