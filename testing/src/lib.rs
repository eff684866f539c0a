//! End-to-end test infrastructure for the academy API client.
//!
//! [`MockBackend`] runs an in-process actix-web server that imitates the
//! auth, academy, exam and content services closely enough to exercise the
//! client's cookie-based session handling: login sets an access cookie and
//! a refresh cookie, protected routes answer 401 once the access token is
//! expired, and `/auth/refresh` issues a new access cookie.
//!
//! The server is stopped when [`MockBackend::stop`] is called or the test's
//! actix system shuts down.

use actix_web::cookie::Cookie;
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use frontend::api::ReqwestTransport;
use frontend::navigation::MemoryNavigator;
use frontend::notify::ToastQueue;
use frontend::session::MemorySessionStore;
use frontend::{Api, ClientConfig, ServiceUrls};
use serde::Deserialize;
use serde_json::json;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const TEST_PASSWORD: &str = "password123";

/// Knobs for a [`MockBackend`].
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// How long `/auth/refresh` takes to answer
    pub refresh_delay: Duration,
    /// Whether `/auth/refresh` renews the session
    pub refresh_enabled: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_millis(300),
            refresh_enabled: true,
        }
    }
}

pub struct MockState {
    access_token: Mutex<String>,
    refresh_enabled: AtomicBool,
    refresh_delay: Duration,
    refresh_calls: AtomicUsize,
    tenant_headers: Mutex<Vec<Option<String>>>,
}

impl MockState {
    fn new(options: &MockOptions) -> Self {
        Self {
            access_token: Mutex::new(Uuid::new_v4().to_string()),
            refresh_enabled: AtomicBool::new(options.refresh_enabled),
            refresh_delay: options.refresh_delay,
            refresh_calls: AtomicUsize::new(0),
            tenant_headers: Mutex::new(Vec::new()),
        }
    }

    fn current_token(&self) -> String {
        self.access_token.lock().unwrap().clone()
    }

    fn is_authorized(&self, req: &HttpRequest) -> bool {
        req.cookie(ACCESS_COOKIE)
            .map(|c| c.value() == self.current_token())
            .unwrap_or(false)
    }

    fn record_tenant(&self, req: &HttpRequest) {
        let tenant = req
            .headers()
            .get("X-Tenant-Slug")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.tenant_headers.lock().unwrap().push(tenant);
    }
}

fn access_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(ACCESS_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

fn refresh_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({
        "message": "Access token expired",
        "code": "TOKEN_EXPIRED"
    }))
}

fn test_user(login_id: &str, tenant_slug: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "loginId": login_id,
        "name": "Kim Student",
        "role": "STUDENT",
        "tenantSlug": tenant_slug,
        "tenantId": 3
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    login_id: String,
    password: String,
}

async fn login(
    req: HttpRequest,
    body: web::Json<LoginBody>,
    state: web::Data<MockState>,
) -> HttpResponse {
    state.record_tenant(&req);
    if body.password != TEST_PASSWORD {
        return HttpResponse::Unauthorized().json(json!({
            "message": "Invalid login ID or password",
            "code": "INVALID_CREDENTIALS"
        }));
    }
    let tenant = req
        .headers()
        .get("X-Tenant-Slug")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("acme")
        .to_string();

    HttpResponse::Ok()
        .cookie(access_cookie(&state.current_token()))
        .cookie(refresh_cookie(&Uuid::new_v4().to_string()))
        .json(json!({ "user": test_user(&body.login_id, &tenant) }))
}

async fn refresh(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.refresh_delay).await;

    let has_refresh_cookie = req.cookie(REFRESH_COOKIE).is_some();
    if !state.refresh_enabled.load(Ordering::SeqCst) || !has_refresh_cookie {
        return HttpResponse::Unauthorized().json(json!({
            "message": "Refresh token expired",
            "code": "REFRESH_EXPIRED"
        }));
    }
    HttpResponse::NoContent()
        .cookie(access_cookie(&state.current_token()))
        .finish()
}

async fn logout() -> HttpResponse {
    let mut expired_access = access_cookie("");
    expired_access.make_removal();
    let mut expired_refresh = refresh_cookie("");
    expired_refresh.make_removal();
    HttpResponse::NoContent()
        .cookie(expired_access)
        .cookie(expired_refresh)
        .finish()
}

async fn me(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    if !state.is_authorized(&req) {
        return unauthorized();
    }
    HttpResponse::Ok().json(test_user("kim01", "acme"))
}

/// Protected list endpoint returning `[{ "id": n, "source": source }]`.
fn protected_list(req: &HttpRequest, state: &MockState, source: &str) -> HttpResponse {
    state.record_tenant(req);
    if !state.is_authorized(req) {
        return unauthorized();
    }
    HttpResponse::Ok().json(json!([
        { "id": 1, "source": source },
        { "id": 2, "source": source }
    ]))
}

async fn list_exams(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    protected_list(&req, &state, "exams")
}

async fn list_students(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    protected_list(&req, &state, "students")
}

async fn list_announcements(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    protected_list(&req, &state, "announcements")
}

async fn get_exam(
    req: HttpRequest,
    path: web::Path<i64>,
    state: web::Data<MockState>,
) -> HttpResponse {
    if !state.is_authorized(&req) {
        return unauthorized();
    }
    let id = path.into_inner();
    if id == 404 {
        return HttpResponse::NotFound().json(json!({
            "message": "Exam not found",
            "code": "EXAM_NOT_FOUND"
        }));
    }
    HttpResponse::Ok().json(json!({ "id": id, "title": "Midterm", "status": "PUBLISHED" }))
}

async fn delete_exam(req: HttpRequest, state: web::Data<MockState>) -> HttpResponse {
    if !state.is_authorized(&req) {
        return unauthorized();
    }
    HttpResponse::NoContent().finish()
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    )
    .service(
        web::scope("/exam")
            .route("/exams", web::get().to(list_exams))
            .route("/exams/{id}", web::get().to(get_exam))
            .route("/exams/{id}", web::delete().to(delete_exam)),
    )
    .service(web::scope("/academy").route("/students", web::get().to(list_students)))
    .service(
        web::scope("/content")
            .route("/announcements", web::get().to(list_announcements)),
    );
}

/// Mock services listening on an ephemeral localhost port.
pub struct MockBackend {
    origin: String,
    state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        Self::start_with(MockOptions::default()).await
    }

    /// Must be called from inside an actix system (`#[actix_web::test]`).
    pub async fn start_with(options: MockOptions) -> Result<Self> {
        let state = web::Data::new(MockState::new(&options));
        let app_state = state.clone();

        let server = HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .context("Failed to bind mock backend")?;
        let addr = *server
            .addrs()
            .first()
            .context("Mock backend has no listening address")?;

        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);

        let origin = format!("http://{}", addr);
        log::info!("Started mock backend at {}", origin);
        Ok(Self {
            origin,
            state,
            handle,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn service_urls(&self) -> ServiceUrls {
        ServiceUrls::under(&self.origin)
    }

    /// Invalidates every access token handed out so far, as if they had
    /// all timed out. Refresh cookies stay valid.
    pub fn expire_access_tokens(&self) {
        *self.state.access_token.lock().unwrap() = Uuid::new_v4().to_string();
    }

    pub fn set_refresh_enabled(&self, enabled: bool) {
        self.state.refresh_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// `X-Tenant-Slug` values seen by login and list endpoints, in order.
    pub fn tenant_headers(&self) -> Vec<Option<String>> {
        self.state.tenant_headers.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// An API client wired for native use, with handles on its side effects.
pub struct TestClient {
    pub api: Api,
    pub store: Rc<MemorySessionStore>,
    pub toasts: ToastQueue,
    pub navigator: MemoryNavigator,
}

impl TestClient {
    pub fn new(backend: &MockBackend) -> Result<Self> {
        Self::with_config(ClientConfig::with_services(backend.service_urls()))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new().context("Failed to build HTTP transport")?;
        let store = Rc::new(MemorySessionStore::new());
        let toasts = ToastQueue::new();
        let navigator = MemoryNavigator::new();
        let api = Api::new(
            &config,
            Rc::new(transport),
            store.clone(),
            Rc::new(toasts.clone()),
            Rc::new(navigator.clone()),
        );
        Ok(Self {
            api,
            store,
            toasts,
            navigator,
        })
    }
}
