use super::client::{ApiClient, ApiRequest};
use super::error::ApiError;
use super::transport::Method;
use crate::config::{join_url, ServiceUrls};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// Verb helpers bound to one backend service's base URL. Every client
/// shares the same [`ApiClient`], so a 401 from any service joins the same
/// session refresh.
#[derive(Clone)]
pub struct ServiceClient {
    base_url: String,
    api: Rc<ApiClient>,
}

impl ServiceClient {
    pub fn new(api: Rc<ApiClient>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Starts a request against this service for callers that need
    /// [`ApiRequest::skip_auth`] or a tenant override.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.url(path))
    }

    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.api.execute(request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::Get, path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::Post, path).json(body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::Put, path).json(body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::Patch, path).json(body)?).await
    }

    /// Deletes usually answer 204, which comes back as `T::default()`.
    pub async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        self.api
            .execute_or_default(self.request(Method::Delete, path))
            .await
    }
}

/// One client per backend service.
#[derive(Clone)]
pub struct Services {
    pub auth: ServiceClient,
    pub academy: ServiceClient,
    pub exam: ServiceClient,
    pub content: ServiceClient,
    pub file: ServiceClient,
    pub audio: ServiceClient,
}

impl Services {
    pub fn new(api: Rc<ApiClient>, urls: &ServiceUrls) -> Self {
        Self {
            auth: ServiceClient::new(Rc::clone(&api), urls.auth.clone()),
            academy: ServiceClient::new(Rc::clone(&api), urls.academy.clone()),
            exam: ServiceClient::new(Rc::clone(&api), urls.exam.clone()),
            content: ServiceClient::new(Rc::clone(&api), urls.content.clone()),
            file: ServiceClient::new(Rc::clone(&api), urls.file.clone()),
            audio: ServiceClient::new(api, urls.audio.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::ScriptedTransport;
    use crate::api::transport::HttpResponse;
    use crate::config::ClientConfig;
    use crate::navigation::MemoryNavigator;
    use crate::notify::ToastQueue;
    use crate::session::MemorySessionStore;
    use futures::executor::block_on;
    use futures::join;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn services(transport: &Rc<ScriptedTransport>) -> Services {
        let urls = ServiceUrls::under("http://api");
        let config = ClientConfig::with_services(urls.clone());
        let api = ApiClient::new(
            &config,
            transport.clone(),
            Rc::new(MemorySessionStore::with_tenant("acme")),
            Rc::new(ToastQueue::new()),
            Rc::new(MemoryNavigator::new()),
        );
        Services::new(Rc::new(api), &urls)
    }

    #[test]
    fn test_each_verb_hits_its_service() {
        let transport = ScriptedTransport::new();
        let ok = || vec![HttpResponse::new(200, "{}")];
        transport.respond(Method::Get, "http://api/academy/students", ok());
        transport.respond(Method::Post, "http://api/content/announcements", ok());
        transport.respond(Method::Put, "http://api/exam/exams/3", ok());
        transport.respond(Method::Patch, "http://api/file/files/9", ok());
        transport.respond(Method::Delete, "http://api/audio/tracks/2", ok());
        let services = services(&transport);

        block_on(async {
            let _: Value = services.academy.get("/students").await.unwrap();
            let _: Value = services
                .content
                .post("/announcements", &json!({ "title": "Holiday" }))
                .await
                .unwrap();
            let _: Value = services
                .exam
                .put("/exams/3", &json!({ "status": "CLOSED" }))
                .await
                .unwrap();
            let _: Value = services
                .file
                .patch("files/9", &json!({ "name": "notes.pdf" }))
                .await
                .unwrap();
            let _: Value = services.audio.delete("/tracks/2").await.unwrap();
        });

        let sent: Vec<(Method, String)> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::Get, "http://api/academy/students".to_string()),
                (Method::Post, "http://api/content/announcements".to_string()),
                (Method::Put, "http://api/exam/exams/3".to_string()),
                (Method::Patch, "http://api/file/files/9".to_string()),
                (Method::Delete, "http://api/audio/tracks/2".to_string()),
            ]
        );
        assert!(transport
            .requests()
            .iter()
            .all(|r| r.header_value("X-Tenant-Slug") == Some("acme")));
    }

    #[test]
    fn test_services_share_one_refresh_guard() {
        let transport = ScriptedTransport::new();
        let expired = || HttpResponse::new(401, "{}");
        for url in ["http://api/exam/exams", "http://api/file/files"] {
            transport.respond(Method::Get, url, vec![expired(), HttpResponse::new(200, "[]")]);
        }
        transport.respond(
            Method::Post,
            "http://api/auth/refresh",
            vec![HttpResponse::new(200, "")],
        );
        transport.hold("http://api/auth/refresh");
        let services = services(&transport);

        let (exams, files) = block_on(async {
            join!(
                services.exam.get::<Vec<Value>>("/exams"),
                services.file.get::<Vec<Value>>("/files"),
            )
        });

        assert!(exams.is_ok() && files.is_ok());
        assert_eq!(transport.requests_to("http://api/auth/refresh").len(), 1);
    }

    #[test]
    fn test_delete_with_no_content_returns_default() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::Delete,
            "http://api/exam/exams/7/questions",
            vec![HttpResponse::new(204, "")],
        );
        let services = services(&transport);

        let removed: Vec<Value> = block_on(services.exam.delete("/exams/7/questions")).unwrap();

        assert!(removed.is_empty());
    }
}
