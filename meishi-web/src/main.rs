//! Meishi business card page with wallet connect.
//!
//! Everything wallet-related lives in `lib-wallet`; this crate binds it to
//! the injected provider and renders the header widgets.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod services;
mod state;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Library crates log through `tracing`; its "log" feature lands here
    wasm_logger::init(wasm_logger::Config::default());

    if let Err(e) = lib_core::config::init_config() {
        log::error!("invalid build configuration, using defaults: {e}");
    }
    log::info!("meishi starting");

    leptos::mount::mount_to_body(|| view! { <App/> });
}
