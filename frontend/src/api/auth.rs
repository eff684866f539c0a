use super::client::ApiClient;
use super::error::ApiError;
use super::services::ServiceClient;
use super::transport::Method;
use log::debug;
use shared::{AuthResponse, LoginRequest, RegisterRequest, User};
use std::rc::Rc;
use validator::Validate;

/// Session lifecycle calls against the auth service. These are the only
/// operations that create or destroy the stored session.
#[derive(Clone)]
pub struct AuthApi {
    api: Rc<ApiClient>,
    service: ServiceClient,
}

impl AuthApi {
    pub fn new(api: Rc<ApiClient>, service: ServiceClient) -> Self {
        Self { api, service }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        request.validate()?;
        debug!("Attempting login for {}", request.login_id);

        let mut call = self.service.request(Method::Post, "/login").json(request)?.skip_auth();
        if let Some(slug) = &request.tenant_slug {
            call = call.tenant(slug.clone());
        }
        let response: AuthResponse = self.service.send(call).await?;
        response.user.validate_fields()?;

        self.api.begin_session(response.user.clone());
        Ok(response.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        request.validate()?;
        debug!("Registering {}", request.login_id);

        let mut call = self
            .service
            .request(Method::Post, "/register")
            .json(request)?
            .skip_auth();
        if let Some(slug) = &request.tenant_slug {
            call = call.tenant(slug.clone());
        }
        let response: AuthResponse = self.service.send(call).await?;
        response.user.validate_fields()?;

        self.api.begin_session(response.user.clone());
        Ok(response.user)
    }

    /// Signs out on the server and locally. The local session is dropped
    /// even when the server call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = self
            .service
            .send(self.service.request(Method::Post, "/logout").skip_auth())
            .await;
        self.api.end_session();
        result
    }

    /// Reloads the signed-in user and replaces the stored session with it.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let user: User = self.service.get("/me").await?;
        user.validate_fields()?;
        self.api.replace_user(user.clone());
        Ok(user)
    }
}
