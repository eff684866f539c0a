use crate::models::auth::{User, TENANT_SLUG_RE};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for user login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login identifier, unique within a tenant
    #[validate(length(min = 1, max = 100, message = "Login ID is required"))]
    pub login_id: String,

    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Academy the user signs in to; sent as the tenant header, not in the body
    #[serde(skip)]
    #[validate(regex = "TENANT_SLUG_RE")]
    pub tenant_slug: Option<String>,
}

/// Request for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 100))]
    pub login_id: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(skip)]
    #[validate(regex = "TENANT_SLUG_RE")]
    pub tenant_slug: Option<String>,
}

/// Response for successful authentication (login/register)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use serde_json::json;
    use test_case::test_case;

    fn login(login_id: &str, password: &str, tenant: Option<&str>) -> LoginRequest {
        LoginRequest {
            login_id: login_id.to_string(),
            password: password.to_string(),
            tenant_slug: tenant.map(str::to_string),
        }
    }

    #[test]
    fn test_login_request_body_omits_tenant() {
        let body = serde_json::to_value(login("kim01", "secret", Some("acme"))).unwrap();
        pretty_assertions::assert_eq!(body, json!({ "loginId": "kim01", "password": "secret" }));
    }

    #[test_case("kim01", "secret", Some("acme") => true ; "valid with tenant")]
    #[test_case("kim01", "secret", None => true ; "valid without tenant")]
    #[test_case("", "secret", None => false ; "empty login id")]
    #[test_case("kim01", "", None => false ; "empty password")]
    #[test_case("kim01", "secret", Some("Bad Slug") => false ; "invalid tenant")]
    fn test_login_request_validation(login_id: &str, password: &str, tenant: Option<&str>) -> bool {
        login(login_id, password, tenant).validate().is_ok()
    }

    #[test]
    fn test_register_request_password_length() {
        let mut request = RegisterRequest {
            login_id: "newbie".to_string(),
            password: "1234567".to_string(),
            name: "New Student".to_string(),
            tenant_slug: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        request.password = "12345678".to_string();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_auth_response_parses_user() {
        let body = json!({
            "user": {
                "id": 1,
                "loginId": "kim01",
                "name": "Kim",
                "role": "STUDENT",
                "tenantSlug": "acme",
                "tenantId": 3
            }
        });
        let response: AuthResponse = serde_json::from_value(body).unwrap();
        pretty_assertions::assert_eq!(response.user.role, Role::Student);
        pretty_assertions::assert_eq!(response.user.tenant_slug, "acme");
    }
}
