use http::Request;
use std::net::SocketAddr;
use std::task::{Context, Poll};
use tonic::transport::server::TcpConnectInfo;
use tower::{Layer, Service};

/// Metadata key carrying the caller's correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags extracted from an inbound call, stored in the request extensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallTags {
    /// Fully qualified service, e.g. `todo.v1.ToDoService`
    pub service: String,
    /// Method name, e.g. `Read`
    pub method: String,
    /// Remote address when the connection is TCP
    pub peer: Option<SocketAddr>,
    /// Caller supplied `x-request-id`, or a fresh UUID v4
    pub request_id: String,
}

impl CallTags {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let (service, method) = split_path(request.uri().path());

        let peer = request
            .extensions()
            .get::<TcpConnectInfo>()
            .and_then(|info| info.remote_addr());

        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            service,
            method,
            peer,
            request_id,
        }
    }

    /// Peer address for logging, `unknown` when not a TCP connection.
    pub fn peer_string(&self) -> String {
        self.peer
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// gRPC paths are `/<package>.<Service>/<Method>`.
fn split_path(path: &str) -> (String, String) {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((service, method)) => (service.to_string(), method.to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Layer that attaches [`CallTags`] to every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagsLayer;

impl<S> Layer<S> for TagsLayer {
    type Service = Tags<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Tags { inner }
    }
}

#[derive(Clone, Debug)]
pub struct Tags<S> {
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for Tags<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let tags = CallTags::from_request(&request);
        request.extensions_mut().insert(tags);
        self.inner.call(request)
    }
}
