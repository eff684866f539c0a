pub mod models {
    pub mod auth;
}

pub mod dto {
    pub mod auth;
    pub mod common;
}

pub mod error;

// Re-export commonly used items
pub use error::{Result, SharedError};

pub use models::auth::{validate_tenant_slug, Role, Session, SessionRecord, User};

pub use dto::{
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    common::{ErrorResponse, GENERIC_ERROR_MESSAGE},
};
