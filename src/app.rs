use crate::components::ToastProvider;
use crate::routes::AppRoutes;
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ToastProvider>
            <Router>
                <AppRoutes />
            </Router>
        </ToastProvider>
    }
}
