pub mod auth;
pub mod client;
pub mod error;
pub mod refresh;
pub mod services;
pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(test)]
mod test_support;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiRequest};
pub use error::ApiError;
pub use refresh::RefreshGuard;
pub use services::{ServiceClient, Services};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

use crate::config::ClientConfig;
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::session::SessionStore;
use std::rc::Rc;

/// Everything a page needs to talk to the backend: the service clients,
/// the auth calls and the shared pipeline behind them.
#[derive(Clone)]
pub struct Api {
    pub client: Rc<ApiClient>,
    pub services: Services,
    pub auth: AuthApi,
}

impl Api {
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn HttpTransport>,
        session: Rc<dyn SessionStore>,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let client = Rc::new(ApiClient::new(config, transport, session, notifier, navigator));
        let services = Services::new(Rc::clone(&client), &config.services);
        let auth = AuthApi::new(Rc::clone(&client), services.auth.clone());
        Self {
            client,
            services,
            auth,
        }
    }

    /// Browser wiring: fetch with cookies, local storage, window redirects.
    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: &ClientConfig, notifier: Rc<dyn Notifier>) -> Self {
        Self::new(
            config,
            Rc::new(BrowserTransport),
            Rc::new(crate::session::LocalSessionStore),
            notifier,
            Rc::new(crate::navigation::BrowserNavigator),
        )
    }
}
