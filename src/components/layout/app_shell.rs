//! Shared layout wrapper with the header and content container. Navigation is
//! client-side; the backend enforces access control.

use leptos::prelude::*;
use leptos_router::components::A;

/// Wraps routes with a header and main content container.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col bg-slate-50 dark:bg-gray-900">
            <header class="border-b border-gray-200 bg-white dark:border-gray-700 dark:bg-gray-800">
                <div class="max-w-screen-xl flex items-center justify-between mx-auto p-4">
                    <A href="/" {..} class="flex items-center space-x-3">
                        <span class="material-symbols-outlined text-indigo-600">"event"</span>
                        <span class="font-semibold whitespace-nowrap text-gray-900 dark:text-white">
                            "Campus Events"
                        </span>
                    </A>
                </div>
            </header>
            <main class="flex-1 px-4 py-10">{children()}</main>
        </div>
    }
}
