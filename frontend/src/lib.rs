pub mod api;
pub mod config;
pub mod geocode;
pub mod geolocation;
#[cfg(target_arch = "wasm32")]
mod pages;
pub mod utils;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use leptos::*;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("Starting check-in frontend (wasm)");

    mount_to_body(|| view! { <pages::CheckInPage/> });
}
