//! Single-flight session refresh.
//!
//! When many requests hit 401 at once, only the first one to reach the
//! guard issues `POST <auth>/refresh`; everyone arriving while that call is
//! pending awaits the same outcome. The flight is dropped from the guard as
//! soon as it settles, so the next failure episode starts a fresh call.

use super::transport::{HttpRequest, HttpTransport, Method, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Flight = Shared<LocalBoxFuture<'static, bool>>;

pub struct RefreshGuard {
    transport: Rc<dyn HttpTransport>,
    refresh_url: String,
    timeout: Option<Duration>,
    flight: RefCell<Option<Flight>>,
}

impl RefreshGuard {
    pub fn new(
        transport: Rc<dyn HttpTransport>,
        refresh_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            refresh_url: refresh_url.into(),
            timeout,
            flight: RefCell::new(None),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.flight.borrow().is_some()
    }

    /// Refreshes the session credentials, joining an in-flight refresh if
    /// there is one. True iff the refresh endpoint answered 2xx.
    pub async fn try_refresh(&self) -> bool {
        let flight = {
            let mut slot = self.flight.borrow_mut();
            match slot.as_ref() {
                Some(current) => {
                    debug!("Refresh already in flight, waiting for its outcome");
                    current.clone()
                }
                None => {
                    let started = self.start_flight();
                    *slot = Some(started.clone());
                    started
                }
            }
        };

        let refreshed = flight.clone().await;

        let mut slot = self.flight.borrow_mut();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&flight)) {
            *slot = None;
        }
        refreshed
    }

    fn start_flight(&self) -> Flight {
        let transport = Rc::clone(&self.transport);
        let mut request = HttpRequest::new(Method::Post, self.refresh_url.clone())
            .header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE);
        request.timeout = self.timeout;

        debug!("Refreshing session via {}", request.url);
        async move {
            match transport.send(request).await {
                Ok(response) if response.is_success() => {
                    info!("Session refreshed");
                    true
                }
                Ok(response) => {
                    warn!("Session refresh rejected with status {}", response.status);
                    false
                }
                Err(e) => {
                    warn!("Session refresh failed: {}", e);
                    false
                }
            }
        }
        .boxed_local()
        .shared()
    }
}
