//! In-memory transport with scripted responses for pipeline tests.

use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Polls a held response goes through before it resolves. Large enough
/// for every concurrent caller in a test to reach the refresh guard first.
const HOLD_POLLS: usize = 16;

type Scripted = Result<HttpResponse, TransportError>;

#[derive(Default)]
pub struct ScriptedTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<Scripted>>>,
    held: RefCell<HashSet<String>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Queues responses for a route. The last one repeats forever.
    pub fn respond(&self, method: Method, url: &str, responses: Vec<HttpResponse>) {
        self.routes
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .extend(responses.into_iter().map(Ok));
    }

    pub fn fail(&self, method: Method, url: &str, error: TransportError) {
        self.routes
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(Err(error));
    }

    /// Keeps responses for `url` pending for a while.
    pub fn hold(&self, url: &str) {
        self.held.borrow_mut().insert(url.to_string());
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.sent
            .borrow()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    fn next_response(&self, method: Method, url: &str) -> Scripted {
        let mut routes = self.routes.borrow_mut();
        match routes.get_mut(&(method, url.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().expect("queue is not empty"),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(HttpResponse::new(404, r#"{"message":"No route scripted"}"#)),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.next_response(request.method, &request.url);
        let held = self.held.borrow().contains(&request.url);
        self.sent.borrow_mut().push(request);
        if held {
            YieldNow(HOLD_POLLS).await;
        }
        response
    }
}

struct YieldNow(usize);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
