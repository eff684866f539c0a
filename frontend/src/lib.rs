use log::info;

pub mod api;
pub mod config;
pub mod navigation;
pub mod notify;
pub mod session;

pub use api::{Api, ApiClient, ApiError, ApiRequest, ServiceClient, Services};
pub use config::{ClientConfig, ServiceUrls};

/// Sets up logging once per process.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    console_error_panic_hook::set_once();
    info!("Logger initialized");
}

/// Sets up logging once per process. Honours `RUST_LOG`.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    info!("Logger initialized");
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    init_logging();
    ClientConfig::default().log_configuration();
}
