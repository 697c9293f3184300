//! Transient notifications. Any component under `ToastProvider` may push a
//! message; each one removes itself after `TOAST_TTL_MS`.

use super::alert::{Alert, AlertKind};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// How long a toast stays on screen (milliseconds).
const TOAST_TTL_MS: u32 = 4_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    id: u64,
    kind: AlertKind,
    message: String,
}

/// Toast queue shared through Leptos context.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Shows a message and schedules its removal.
    pub fn push(&self, kind: AlertKind, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.items.update(|items| {
            items.push(Toast {
                id,
                kind,
                message: message.into(),
            });
        });

        let items = self.items;
        Timeout::new(TOAST_TTL_MS, move || {
            items.try_update(|items| items.retain(|toast| toast.id != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|toast| toast.id != id));
    }
}

/// Provides the toast queue and renders it above the page.
#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    let toasts = Toasts::new();
    provide_context(toasts);

    view! {
        {children()}
        <div class="fixed top-4 right-4 z-50 flex w-80 flex-col gap-2">
            <For
                each=move || toasts.items.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class="shadow-lg cursor-pointer" on:click=move |_| toasts.dismiss(id)>
                            <Alert kind=toast.kind message=toast.message />
                        </div>
                    }
                }
            />
        </div>
    }
}

/// Returns the toast queue or a detached one when no provider is mounted.
pub fn use_toasts() -> Toasts {
    use_context::<Toasts>().unwrap_or_else(Toasts::new)
}
