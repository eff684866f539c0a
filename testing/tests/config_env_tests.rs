//! Run-time configuration of native clients. Kept in one test because it
//! mutates process environment variables.

use frontend::ClientConfig;
use pretty_assertions::assert_eq;
use std::env;
use std::time::Duration;

#[test]
fn config_from_env_overrides_defaults() {
    env::set_var("ACADEMY_API_ORIGIN", "http://gateway:9000");
    env::set_var("ACADEMY_EXAM_URL", "http://exam:7000/v2");
    env::set_var("ACADEMY_LOGIN_ROUTE", "/signin");
    env::set_var("ACADEMY_REFRESH_TIMEOUT_MS", "2500");

    let config = ClientConfig::from_env();

    assert_eq!(config.services.auth, "http://gateway:9000/auth");
    assert_eq!(config.services.exam, "http://exam:7000/v2");
    assert_eq!(config.login_route, "/signin");
    assert_eq!(config.refresh_timeout, Some(Duration::from_millis(2500)));
    assert_eq!(config.refresh_url(), "http://gateway:9000/auth/refresh");

    env::set_var("ACADEMY_REFRESH_TIMEOUT_MS", "0");
    assert_eq!(ClientConfig::from_env().refresh_timeout, None);

    env::set_var("ACADEMY_REFRESH_TIMEOUT_MS", "soon");
    assert_eq!(
        ClientConfig::from_env().refresh_timeout,
        Some(Duration::from_secs(10))
    );

    for key in [
        "ACADEMY_API_ORIGIN",
        "ACADEMY_EXAM_URL",
        "ACADEMY_LOGIN_ROUTE",
        "ACADEMY_REFRESH_TIMEOUT_MS",
    ] {
        env::remove_var(key);
    }
}
