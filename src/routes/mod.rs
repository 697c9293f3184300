mod health;
mod not_found;
mod verify_otp;

pub(crate) use health::HealthPage;
pub(crate) use not_found::NotFoundPage;
pub(crate) use verify_otp::VerifyOtpRoute;

use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/health") view=HealthPage />
            <Route path=path!("/:role/verify-otp") view=VerifyOtpRoute />
            <Route path=path!("/*any") view=NotFoundPage />
        </Routes>
    }
}
