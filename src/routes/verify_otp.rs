//! OTP verification route.
//!
//! One page serves every role; the role segment picks the `OtpFlow`. All
//! decisions are made by `OtpWidget`; this module owns the DOM, the requests
//! and the timers, and performs the effects the widget hands back.

use crate::{
    components::{Alert, AlertKind, AppShell, Button, Spinner, Toasts, use_toasts},
    features::otp::{
        CODE_LENGTH, NoticeKind, OtpEffect, OtpFlow, OtpWidget, RESEND_COOLDOWN_SECS, Role,
        TICK_INTERVAL_MS, VerificationState, client,
        types::{ResendOtpRequest, VerifyOtpRequest},
    },
    routes::NotFoundPage,
};
use gloo_timers::callback::{Interval, Timeout};
use leptos::{html, prelude::*, task::spawn_local};
use leptos_router::{
    components::A,
    hooks::{use_navigate, use_params_map, use_query_map},
};

/// Resolves `/:role/verify-otp?email=...` into a page for that role.
#[component]
pub fn VerifyOtpRoute() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();

    let role = params
        .with_untracked(|params| params.get("role"))
        .and_then(|slug| Role::from_slug(&slug));
    let email = query
        .with_untracked(|query| query.get("email"))
        .unwrap_or_default();

    match role {
        Some(role) => view! { <VerifyOtpPage flow=role.flow() email=email /> }.into_any(),
        None => view! { <NotFoundPage /> }.into_any(),
    }
}

/// Timers owned by one page instance. Dropping a gloo timer cancels it.
#[derive(Default)]
struct OtpTimers {
    ticker: Option<Interval>,
    reset: Option<Timeout>,
    redirect: Option<Timeout>,
}

impl OtpTimers {
    fn cancel_all(&mut self) {
        self.ticker.take();
        self.reset.take();
        self.redirect.take();
    }
}

/// Handles shared by every event handler of the page.
#[derive(Clone, Copy)]
struct OtpPage {
    flow: OtpFlow,
    widget: RwSignal<OtpWidget>,
    cells: [NodeRef<html::Input>; CODE_LENGTH],
    timers: StoredValue<OtpTimers, LocalStorage>,
    toasts: Toasts,
    redirect_due: RwSignal<bool>,
}

impl OtpPage {
    /// Runs one widget operation and performs whatever it asks for.
    fn apply(self, step: impl FnOnce(&mut OtpWidget) -> Vec<OtpEffect>) {
        // None once the page is gone; late responses and timers land here.
        if let Some(effects) = self.widget.try_update(step) {
            self.perform(effects);
        }
    }

    fn perform(self, effects: Vec<OtpEffect>) {
        for effect in effects {
            match effect {
                OtpEffect::Focus(index) => self.focus(index),
                OtpEffect::Verify(otp) => {
                    let flow = self.flow;
                    spawn_local(async move {
                        let result = client::verify_otp(flow, &VerifyOtpRequest { otp }).await;
                        self.apply(|widget| widget.verify_resolved(result));
                    });
                }
                OtpEffect::Resend(email) => {
                    let flow = self.flow;
                    spawn_local(async move {
                        let result = client::resend_otp(flow, &ResendOtpRequest { email }).await;
                        self.apply(|widget| widget.resend_resolved(result));
                    });
                }
                OtpEffect::ScheduleReset { after_ms } => {
                    let timeout = Timeout::new(after_ms, move || self.apply(OtpWidget::reset_elapsed));
                    self.timers.update_value(|timers| timers.reset = Some(timeout));
                }
                OtpEffect::ScheduleRedirect { after_ms } => {
                    let redirect_due = self.redirect_due;
                    let timeout = Timeout::new(after_ms, move || {
                        redirect_due.try_set(true);
                    });
                    self.timers.update_value(|timers| timers.redirect = Some(timeout));
                }
                OtpEffect::StopTimer => {
                    self.timers.update_value(|timers| {
                        timers.ticker.take();
                    });
                }
                OtpEffect::Notify(notice) => {
                    self.toasts.push(alert_kind(notice.kind), notice.message);
                }
            }
        }
    }

    fn focus(self, index: usize) {
        if let Some(input) = self.cells.get(index).and_then(|cell| cell.get_untracked()) {
            let _ = input.focus();
            input.select();
        }
    }
}

fn alert_kind(kind: NoticeKind) -> AlertKind {
    match kind {
        NoticeKind::Success => AlertKind::Success,
        NoticeKind::Error => AlertKind::Error,
        NoticeKind::Info => AlertKind::Info,
    }
}

#[component]
pub fn VerifyOtpPage(flow: OtpFlow, email: String) -> impl IntoView {
    let navigate = use_navigate();
    let page = OtpPage {
        flow,
        widget: RwSignal::new(OtpWidget::new(email)),
        cells: std::array::from_fn(|_| NodeRef::new()),
        timers: StoredValue::new_local(OtpTimers::default()),
        toasts: use_toasts(),
        redirect_due: RwSignal::new(false),
    };
    let widget = page.widget;
    tracing::debug!(role = flow.role.slug(), "verification page mounted");

    let ticker = Interval::new(TICK_INTERVAL_MS, move || {
        widget.try_update(OtpWidget::tick);
    });
    page.timers.update_value(|timers| timers.ticker = Some(ticker));

    let timers = page.timers;
    on_cleanup(move || {
        timers.update_value(OtpTimers::cancel_all);
    });

    Effect::new(move |_| page.focus(0));

    Effect::new(move |_| {
        if page.redirect_due.get() {
            navigate(flow.login_route, Default::default());
        }
    });

    let shown_email = widget.with_untracked(|widget| widget.email().to_string());
    let destination = if shown_email.is_empty() {
        "your email address".to_string()
    } else {
        shown_email
    };

    let cells = (0..CODE_LENGTH)
        .map(|index| {
            view! {
                <input
                    node_ref=page.cells[index]
                    type="text"
                    inputmode="numeric"
                    pattern="[0-9]*"
                    maxlength={if index == 0 { CODE_LENGTH.to_string() } else { "1".to_string() }}
                    autocomplete={if index == 0 { "one-time-code" } else { "off" }}
                    aria-label={format!("Digit {}", index + 1)}
                    class="h-14 w-12 rounded-xl border border-slate-300 bg-white text-center text-2xl font-semibold text-slate-900 focus:border-indigo-500 focus:ring-2 focus:ring-indigo-200 disabled:bg-slate-100 dark:border-gray-600 dark:bg-gray-700 dark:text-white"
                    class:border-red-400=move || {
                        widget.with(|widget| widget.state() == VerificationState::Error)
                    }
                    prop:value=move || {
                        widget.with(|widget| {
                            widget.code().cell(index).map(String::from).unwrap_or_default()
                        })
                    }
                    prop:disabled=move || widget.with(OtpWidget::is_verified)
                    on:input=move |event| {
                        let value = event_target_value(&event);
                        page.apply(|widget| widget.input(index, &value));
                    }
                    on:keydown=move |event| match event.key().as_str() {
                        "Backspace" => {
                            event.prevent_default();
                            page.apply(|widget| widget.backspace(index));
                        }
                        "Enter" => {
                            event.prevent_default();
                            page.apply(OtpWidget::submit);
                        }
                        _ => {}
                    }
                    on:paste=move |event| {
                        event.prevent_default();
                        let text = event
                            .clipboard_data()
                            .and_then(|data| data.get_data("text").ok())
                            .unwrap_or_default();
                        page.apply(|widget| widget.paste(index, &text));
                    }
                />
            }
        })
        .collect_view();

    view! {
        <AppShell>
            <div class="w-full max-w-md mx-auto rounded-2xl border border-slate-200 bg-white/90 p-6 shadow-[0_20px_60px_-40px_rgba(15,23,42,0.35)] sm:p-8 dark:border-gray-700 dark:bg-gray-800">
                <div class="space-y-2">
                    <p class="text-[11px] font-semibold uppercase tracking-[0.2em] text-slate-400">
                        {format!("{} verification", flow.label)}
                    </p>
                    <h1 class="text-2xl font-semibold text-slate-900 dark:text-white">
                        "Verify your email"
                    </h1>
                    <p class="text-sm text-slate-500 dark:text-gray-300">
                        "Enter the 6-digit code we sent to "
                        <span class="font-medium text-slate-700 dark:text-white">{destination}</span>
                    </p>
                </div>

                <div class="mt-6 flex justify-between gap-2">{cells}</div>

                <Show when=move || !widget.with(OtpWidget::is_verified)>
                    <div class="mt-6">
                        <Button
                            button_type="button"
                            disabled=Signal::derive(move || !widget.with(OtpWidget::can_submit))
                            on:click=move |_| page.apply(OtpWidget::submit)
                        >
                            {move || {
                                if widget.with(OtpWidget::is_verifying) {
                                    "Verifying..."
                                } else {
                                    "Verify"
                                }
                            }}
                        </Button>
                    </div>
                    <div class="mt-4 flex items-center justify-between text-sm">
                        <span class="text-slate-500 dark:text-gray-400">
                            {move || {
                                let seconds = widget.with(OtpWidget::cooldown);
                                if seconds > 0 {
                                    format!("Resend available in {seconds}s")
                                } else {
                                    "Didn't get a code?".to_string()
                                }
                            }}
                        </span>
                        <button
                            type="button"
                            class="font-medium text-indigo-600 underline decoration-indigo-300 underline-offset-4 hover:text-indigo-800 disabled:cursor-not-allowed disabled:text-slate-400 disabled:no-underline"
                            disabled=move || !widget.with(OtpWidget::can_resend)
                            on:click=move |_| page.apply(OtpWidget::resend)
                        >
                            {move || {
                                if widget.with(OtpWidget::is_resending) {
                                    "Sending..."
                                } else {
                                    "Resend code"
                                }
                            }}
                        </button>
                    </div>
                    <p class="mt-2 text-xs text-slate-400">
                        {format!("A new code can be requested every {RESEND_COOLDOWN_SECS} seconds.")}
                    </p>
                    {move || {
                        widget
                            .with(|widget| widget.is_verifying() || widget.is_resending())
                            .then(|| view! { <div class="mt-4 flex justify-center"><Spinner /></div> })
                    }}
                </Show>

                <Show when=move || widget.with(OtpWidget::is_verified)>
                    <div class="mt-6 space-y-4">
                        <Alert
                            kind=AlertKind::Success
                            message="Email verified. Taking you to sign in...".to_string()
                        />
                        <A
                            href=flow.login_route
                            {..}
                            class="inline-flex w-full justify-center rounded-lg border border-slate-200 px-5 py-2.5 text-sm font-medium text-slate-700 hover:bg-slate-50 dark:border-gray-600 dark:text-white dark:hover:bg-gray-700"
                        >
                            "Go to login"
                        </A>
                    </div>
                </Show>
            </div>
        </AppShell>
    }
}
