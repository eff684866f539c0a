use log::info;
use std::time::Duration;

pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_REFRESH_PATH: &str = "/refresh";
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL of every backend service the frontend talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUrls {
    pub auth: String,
    pub academy: String,
    pub exam: String,
    pub content: String,
    pub file: String,
    pub audio: String,
}

impl ServiceUrls {
    /// Every service mounted under one origin, e.g. `http://localhost:8080/auth`.
    pub fn under(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            auth: format!("{}/auth", origin),
            academy: format!("{}/academy", origin),
            exam: format!("{}/exam", origin),
            content: format!("{}/content", origin),
            file: format!("{}/file", origin),
            audio: format!("{}/audio", origin),
        }
    }

    /// URLs baked in at build time. Browser builds cannot read the
    /// environment at run time, so deployments set these when compiling.
    /// Unset values fall back to relative paths proxied by the web server.
    pub fn compiled() -> Self {
        Self {
            auth: option_env!("ACADEMY_AUTH_URL").unwrap_or("/api/auth").to_string(),
            academy: option_env!("ACADEMY_ACADEMY_URL").unwrap_or("/api/academy").to_string(),
            exam: option_env!("ACADEMY_EXAM_URL").unwrap_or("/api/exam").to_string(),
            content: option_env!("ACADEMY_CONTENT_URL").unwrap_or("/api/content").to_string(),
            file: option_env!("ACADEMY_FILE_URL").unwrap_or("/api/file").to_string(),
            audio: option_env!("ACADEMY_AUDIO_URL").unwrap_or("/api/audio").to_string(),
        }
    }
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self::compiled()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub services: ServiceUrls,
    /// Where the browser is sent once the session cannot be recovered
    pub login_route: String,
    /// Path of the refresh endpoint on the auth service
    pub refresh_path: String,
    /// Upper bound on a refresh call; every waiting request is blocked by it
    pub refresh_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            services: ServiceUrls::default(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn with_services(services: ServiceUrls) -> Self {
        Self {
            services,
            ..Self::default()
        }
    }

    pub fn refresh_url(&self) -> String {
        join_url(&self.services.auth, &self.refresh_path)
    }

    /// Loads configuration from the process environment and an optional
    /// `.env` file. Unset keys keep their compiled defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        use std::env;

        dotenv::dotenv().ok();

        let defaults = Self::default();
        let var = |key: &str, fallback: &str| env::var(key).unwrap_or_else(|_| fallback.to_string());

        let services = match env::var("ACADEMY_API_ORIGIN") {
            Ok(origin) if !origin.is_empty() => ServiceUrls::under(&origin),
            _ => defaults.services.clone(),
        };
        let services = ServiceUrls {
            auth: var("ACADEMY_AUTH_URL", &services.auth),
            academy: var("ACADEMY_ACADEMY_URL", &services.academy),
            exam: var("ACADEMY_EXAM_URL", &services.exam),
            content: var("ACADEMY_CONTENT_URL", &services.content),
            file: var("ACADEMY_FILE_URL", &services.file),
            audio: var("ACADEMY_AUDIO_URL", &services.audio),
        };

        let refresh_timeout = match env::var("ACADEMY_REFRESH_TIMEOUT_MS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    log::warn!("Ignoring invalid ACADEMY_REFRESH_TIMEOUT_MS: {}", raw);
                    defaults.refresh_timeout
                }
            },
            Err(_) => defaults.refresh_timeout,
        };

        let config = Self {
            services,
            login_route: var("ACADEMY_LOGIN_ROUTE", &defaults.login_route),
            refresh_path: var("ACADEMY_REFRESH_PATH", &defaults.refresh_path),
            refresh_timeout,
        };
        config.log_configuration();
        config
    }

    pub fn log_configuration(&self) {
        info!("Auth service: {}", self.services.auth);
        info!("Academy service: {}", self.services.academy);
        info!("Exam service: {}", self.services.exam);
        info!("Content service: {}", self.services.content);
        info!("File service: {}", self.services.file);
        info!("Audio service: {}", self.services.audio);
        info!(
            "Refresh endpoint: {} (timeout: {:?})",
            self.refresh_url(),
            self.refresh_timeout
        );
    }
}

/// Concatenates a base URL and a path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}
