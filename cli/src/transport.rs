//! Blocking ureq round trips, run off the async executor by the caller.

use todo_sync::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use tracing::trace;

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// 4xx/5xx come back as responses; only failed round trips are errors.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Blocks until the round trip finishes.
    pub fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = &self.agent;
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => agent
                .post(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
            (HttpMethod::Put, Some(body)) => agent
                .put(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;
        trace!(status, path = %req.path, "response received");
        Ok(HttpResponse::new(status, body))
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}
