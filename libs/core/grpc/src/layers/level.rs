use http::HeaderMap;
use tonic::Code;
use tracing::Level;

/// Log severity for a finished call.
///
/// `Ok` is DEBUG. Client-side mistakes are INFO, transient or policy failures
/// are WARN, and server faults are ERROR.
pub fn level_for(code: Code) -> Level {
    match code {
        Code::Ok => Level::DEBUG,

        Code::Cancelled
        | Code::InvalidArgument
        | Code::NotFound
        | Code::AlreadyExists
        | Code::Unauthenticated => Level::INFO,

        Code::DeadlineExceeded
        | Code::PermissionDenied
        | Code::ResourceExhausted
        | Code::FailedPrecondition
        | Code::Aborted
        | Code::OutOfRange
        | Code::Unavailable => Level::WARN,

        Code::Unknown | Code::Unimplemented | Code::Internal | Code::DataLoss => Level::ERROR,
    }
}

/// Status code carried in a header or trailer map, if any.
///
/// Errors raised before the first message are sent trailers-only, so
/// `grpc-status` lands in the response headers. Everything else carries it
/// in the trailers at the end of the body.
pub fn status_code(headers: &HeaderMap) -> Option<Code> {
    tonic::Status::from_header_map(headers).map(|status| status.code())
}
