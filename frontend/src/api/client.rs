//! The request pipeline every service call goes through.
//!
//! Per request: `PENDING -> success | error`, and on an eligible 401
//! `REFRESHING -> (RETRY-PENDING -> success | error) | AUTH-FAILED`.
//! There is no other retry.

use super::error::ApiError;
use super::refresh::RefreshGuard;
use super::transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE,
    TENANT_HEADER,
};
use crate::config::ClientConfig;
use crate::navigation::Navigator;
use crate::notify::{Notifier, Toast};
use crate::session::SessionStore;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{validate_tenant_slug, Session, User};
use std::cell::Cell;
use std::rc::Rc;

/// A call to be made through [`ApiClient::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    url: String,
    body: Option<String>,
    skip_auth: bool,
    tenant_slug: Option<String>,
    is_retry: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            skip_auth: false,
            tenant_slug: None,
            is_retry: false,
        }
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    /// A 401 on this request is returned as-is instead of triggering a
    /// session refresh. Used by login and logout.
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Tenant to scope this request to, overriding the stored one.
    pub fn tenant(mut self, slug: impl Into<String>) -> Self {
        self.tenant_slug = Some(slug.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn eligible_for_refresh(&self) -> bool {
        !self.skip_auth && !self.is_retry
    }
}

pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
    session: Rc<dyn SessionStore>,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    refresh: RefreshGuard,
    login_route: String,
    auth_failed: Cell<bool>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn HttpTransport>,
        session: Rc<dyn SessionStore>,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let refresh = RefreshGuard::new(
            Rc::clone(&transport),
            config.refresh_url(),
            config.refresh_timeout,
        );
        Self {
            transport,
            session,
            notifier,
            navigator,
            refresh,
            login_route: config.login_route.clone(),
            auth_failed: Cell::new(false),
        }
    }

    pub fn session(&self) -> Session {
        self.session.load()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    /// Records a freshly authenticated user and re-arms the pipeline after
    /// an auth failure.
    pub fn begin_session(&self, user: User) {
        info!(
            "Signed in as {} ({}) in tenant {}",
            user.login_id, user.role, user.tenant_slug
        );
        self.session.set_tenant_slug(Some(&user.tenant_slug));
        self.session.save(&Session::authenticated(user));
        self.auth_failed.set(false);
    }

    /// Replaces the stored user without touching the auth-failure state.
    pub fn replace_user(&self, user: User) {
        debug!("Updating stored user {}", user.login_id);
        self.session.set_tenant_slug(Some(&user.tenant_slug));
        self.session.save(&Session::authenticated(user));
    }

    pub fn end_session(&self) {
        info!("Signed out");
        self.session.clear();
    }

    /// Runs one logical request, including the refresh-and-retry path.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let result = self.run(request).await;
        if let Err(err) = &result {
            if err.is_user_visible() {
                self.notifier.notify(Toast::error(err.message()));
            }
        }
        result
    }

    async fn run<T: DeserializeOwned>(&self, mut request: ApiRequest) -> Result<T, ApiError> {
        if !request.skip_auth && self.auth_failed.get() {
            debug!("Not sending {} {}: session has expired", request.method, request.url);
            return Err(ApiError::SessionExpired);
        }

        loop {
            let response = self.dispatch(&request).await?;

            if response.status == 401 && !request.skip_auth {
                if self.auth_failed.get() {
                    debug!(
                        "{} {} returned 401 after the session expired",
                        request.method, request.url
                    );
                    return Err(ApiError::SessionExpired);
                }
                if request.eligible_for_refresh() {
                    debug!("{} {} returned 401, refreshing session", request.method, request.url);
                    let refreshed = self.refresh.try_refresh().await;
                    // Another request may have failed the session while this one waited.
                    if self.auth_failed.get() {
                        return Err(ApiError::SessionExpired);
                    }
                    if refreshed {
                        request.is_retry = true;
                        continue;
                    }
                } else {
                    warn!("{} {} still unauthorized after refresh", request.method, request.url);
                }
                self.handle_auth_failure();
                return Err(ApiError::SessionExpired);
            }

            return decode(response);
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let mut http = HttpRequest::new(request.method, request.url.clone())
            .header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE);
        if let Some(slug) = self.resolve_tenant(request)? {
            http = http.header(TENANT_HEADER, &slug);
        }
        http.body = request.body.clone();

        debug!(
            "{} {}{}",
            request.method,
            request.url,
            if request.is_retry { " (retry)" } else { "" }
        );
        self.transport
            .send(http)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn resolve_tenant(&self, request: &ApiRequest) -> Result<Option<String>, ApiError> {
        let slug = request
            .tenant_slug
            .clone()
            .or_else(|| self.session.tenant_slug())
            .filter(|slug| !slug.is_empty());
        if let Some(slug) = &slug {
            validate_tenant_slug(slug)?;
        }
        Ok(slug)
    }

    /// Like [`execute`](Self::execute), but a 204 or empty body yields
    /// `T::default()` for any `T`, so `Vec<_>` and friends work too.
    pub async fn execute_or_default<T>(&self, request: ApiRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        match self.execute(request).await {
            Err(ApiError::NoContent) => Ok(T::default()),
            other => other,
        }
    }

    /// Clears the local session and sends the user to the login route.
    /// Runs once per failure episode; later failures in the same episode
    /// only log.
    pub fn handle_auth_failure(&self) {
        if self.auth_failed.replace(true) {
            debug!("Auth failure already handled");
            return;
        }
        warn!("Session could not be refreshed, signing out locally");
        self.session.clear();
        self.navigator.redirect(&self.login_route);
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::from_response(response.status, &response.body));
    }
    // 204 and empty bodies decode from `null`: fine for `()`, `Option<_>`
    // and `serde_json::Value`.
    if response.status == 204 || response.body.trim().is_empty() {
        return serde_json::from_value(serde_json::Value::Null).map_err(|_| ApiError::NoContent);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
