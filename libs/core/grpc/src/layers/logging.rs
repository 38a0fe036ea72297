use super::level::{level_for, status_code};
use super::tags::CallTags;
use futures::future::BoxFuture;
use http::{Request, Response};
use http_body::{Body, Frame, SizeHint};
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::time::{Duration, Instant};
use tonic::Code;
use tower::{Layer, Service};
use tracing::{Instrument, Level, Span, field};

/// Layer that logs the start and end of every call inside a `grpc` span.
///
/// The span carries `grpc.service`, `grpc.method`, `peer.address` and
/// `request.id`. `api` and `todo.id` start empty; handlers record them with
/// `tracing::Span::current().record(..)`.
///
/// A call is finished when its status is known: immediately for
/// trailers-only responses, otherwise when the body yields its trailers.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging { inner }
    }
}

#[derive(Clone, Debug)]
pub struct Logging<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Logging<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<LoggedBody<ResBody>>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        // The clone may not be ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let tags = request
            .extensions()
            .get::<CallTags>()
            .cloned()
            .unwrap_or_else(|| CallTags::from_request(&request));

        let span = tracing::info_span!(
            "grpc",
            grpc.service = %tags.service,
            grpc.method = %tags.method,
            peer.address = %tags.peer_string(),
            request.id = %tags.request_id,
            api = field::Empty,
            todo.id = field::Empty,
        );

        Box::pin(
            async move {
                tracing::debug!("started call");
                let started = Instant::now();

                let response = match inner.call(request).await {
                    Ok(response) => response,
                    Err(err) => {
                        log_finished(Code::Unknown, started.elapsed());
                        return Err(err);
                    }
                };

                if let Some(code) = status_code(response.headers()) {
                    log_finished(code, started.elapsed());
                    return Ok(response.map(LoggedBody::finished));
                }

                let pending = PendingCall {
                    span: Span::current(),
                    started,
                };
                Ok(response.map(|body| LoggedBody::pending(body, pending)))
            }
            .instrument(span),
        )
    }
}

/// A call whose status arrives in the trailers.
struct PendingCall {
    span: Span,
    started: Instant,
}

impl PendingCall {
    fn finish(self, code: Code) {
        let elapsed = self.started.elapsed();
        self.span.in_scope(|| log_finished(code, elapsed));
    }
}

/// Response body that logs the call once its trailers go out.
///
/// A stream that fails is logged as `Unknown`, one that ends without
/// trailers as `Unknown`, and one dropped before the end as `Cancelled`.
pub struct LoggedBody<B> {
    inner: Pin<Box<B>>,
    pending: Option<PendingCall>,
}

impl<B> LoggedBody<B> {
    fn finished(inner: B) -> Self {
        Self {
            inner: Box::pin(inner),
            pending: None,
        }
    }

    fn pending(inner: B, pending: PendingCall) -> Self {
        Self {
            inner: Box::pin(inner),
            pending: Some(pending),
        }
    }

    fn finish(&mut self, code: Code) {
        if let Some(pending) = self.pending.take() {
            pending.finish(code);
        }
    }
}

impl<B: Body> Body for LoggedBody<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let frame = ready!(this.inner.as_mut().poll_frame(cx));

        match &frame {
            Some(Ok(frame)) => {
                if let Some(trailers) = frame.trailers_ref() {
                    this.finish(status_code(trailers).unwrap_or(Code::Unknown));
                }
            }
            Some(Err(_)) | None => this.finish(Code::Unknown),
        }

        Poll::Ready(frame)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for LoggedBody<B> {
    fn drop(&mut self) {
        self.finish(Code::Cancelled);
    }
}

fn log_finished(code: Code, elapsed: Duration) {
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let level = level_for(code);
    let code = format!("{code:?}");

    match level {
        Level::ERROR => tracing::error!(grpc.code = %code, elapsed_ms, "finished call"),
        Level::WARN => tracing::warn!(grpc.code = %code, elapsed_ms, "finished call"),
        Level::INFO => tracing::info!(grpc.code = %code, elapsed_ms, "finished call"),
        _ => tracing::debug!(grpc.code = %code, elapsed_ms, "finished call"),
    }
}
