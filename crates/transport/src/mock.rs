use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Scripted answer for a [`MockTransport`] route
#[derive(Debug, Clone)]
pub enum MockReply {
    Status(u16),
    StatusWithBody(u16, String),
    Error(TransportError),
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn delayed(delay: Duration, reply: MockReply) -> Self {
        MockReply::Delayed(delay, Box::new(reply))
    }
}

struct Route {
    prefix: String,
    replies: VecDeque<MockReply>,
}

/// Mock transport for testing
///
/// Records every request and answers from routes matched by URL prefix.
/// A route with several replies hands them out in order and then keeps
/// repeating the last one.
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    fallback: MockReply,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Every unmatched request gets HTTP 200
    pub fn new() -> Self {
        Self::with_fallback(MockReply::Status(200))
    }

    pub fn with_fallback(fallback: MockReply) -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(self, prefix: impl Into<String>, reply: MockReply) -> Self {
        self.replies(prefix, vec![reply])
    }

    pub fn replies(self, prefix: impl Into<String>, replies: Vec<MockReply>) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Route {
                prefix: prefix.into(),
                replies: replies.into(),
            });
        self
    }

    /// All requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.starts_with(prefix))
            .collect()
    }

    fn next_reply(&self, url: &str) -> MockReply {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let Some(route) = routes
            .iter_mut()
            .find(|r| url.starts_with(r.prefix.as_str()))
        else {
            return self.fallback.clone();
        };

        if route.replies.len() > 1 {
            route.replies.pop_front().unwrap_or(MockReply::Status(200))
        } else {
            route
                .replies
                .front()
                .cloned()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut reply = self.next_reply(&request.url);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        loop {
            match reply {
                MockReply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
                MockReply::Status(status) => return Ok(HttpResponse::new(status, "")),
                MockReply::StatusWithBody(status, body) => {
                    return Ok(HttpResponse::new(status, body))
                }
                MockReply::Error(e) => return Err(e),
            }
        }
    }
}
