//! 404 page for unknown routes and unknown role segments.

use crate::components::AppShell;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <AppShell>
            <div class="flex flex-col items-center justify-center min-h-[50vh] text-center px-4">
                <h1 class="text-8xl font-black text-gray-200 dark:text-gray-700 select-none">"404"</h1>
                <p class="mt-2 text-2xl font-bold text-gray-900 dark:text-white">"Page not found"</p>
                <p class="mt-4 text-gray-500 dark:text-gray-400 max-w-sm">
                    "The page you requested does not exist."
                </p>
                <A
                    href="/"
                    {..}
                    class="mt-6 inline-flex items-center px-5 py-2.5 text-sm font-medium text-white bg-indigo-700 rounded-lg hover:bg-indigo-800"
                >
                    <span class="material-symbols-outlined mr-2 text-base">"home"</span>
                    "Go Home"
                </A>
            </div>
        </AppShell>
    }
}
