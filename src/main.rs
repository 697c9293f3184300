// Off wasm only the browser-independent core is built (for tests), which
// leaves the page-facing parts of it unused.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code, unused_imports))]

#[cfg(target_arch = "wasm32")]
mod app;
#[path = "lib/mod.rs"]
mod app_lib;
#[cfg(target_arch = "wasm32")]
mod components;
mod features;
#[cfg(target_arch = "wasm32")]
mod routes;

#[cfg(target_arch = "wasm32")]
use crate::app::App;
#[cfg(target_arch = "wasm32")]
use leptos::prelude::mount_to_body;

#[cfg(target_arch = "wasm32")]
pub fn main() {
    let config = app_lib::config::AppConfig::load();
    if let Err(err) = app_lib::telemetry::init(config.log_level) {
        web_sys::console::error_1(&err.to_string().into());
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = app_lib::GIT_COMMIT_HASH,
        "starting campus events client"
    );
    mount_to_body(App);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
