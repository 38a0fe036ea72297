use tonic::Code;

// ============================================================================
// Generic Error Conversion Traits
// ============================================================================

/// Extension trait for Result types to convert errors to tonic::Status
///
/// This trait provides ergonomic methods to convert domain errors into gRPC Status errors.
///
/// # Example
/// ```ignore
/// use core_grpc::error::ToTonicResult;
/// use core_grpc::conversions::timestamp_to_datetime;
///
/// // Convert String error to tonic::Status with INVALID_ARGUMENT
/// let reminder = timestamp_to_datetime(&ts).to_tonic()?;
/// ```
pub trait ToTonicResult<T> {
  /// Convert the error in this Result to a tonic::Status with INVALID_ARGUMENT code
  fn to_tonic(self) -> Result<T, tonic::Status>;
}

impl<T> ToTonicResult<T> for Result<T, String> {
  fn to_tonic(self) -> Result<T, tonic::Status> {
    self.map_err(tonic::Status::invalid_argument)
  }
}

/// Extension trait for Option types to convert None to tonic::Status errors
///
/// # Example
/// ```ignore
/// use core_grpc::error::ToTonicOption;
///
/// let to_do = request.to_do.ok_or_invalid("to_do is required")?;
/// ```
pub trait ToTonicOption<T> {
  /// Convert None to a tonic::Status with INVALID_ARGUMENT code
  fn ok_or_invalid(self, message: impl Into<String>) -> Result<T, tonic::Status>;
}

impl<T> ToTonicOption<T> for Option<T> {
  fn ok_or_invalid(self, message: impl Into<String>) -> Result<T, tonic::Status> {
    self.ok_or_else(|| tonic::Status::invalid_argument(message.into()))
  }
}

// ============================================================================
// Gateway Mapping
// ============================================================================

/// HTTP status the JSON gateway answers with for a gRPC status code.
///
/// Follows the grpc-gateway table: `NotFound` is 404, `InvalidArgument` is 400,
/// `Internal` is 500, `Ok` is 200. `Cancelled` maps to the non-standard 499.
pub fn http_status_for(code: Code) -> u16 {
  match code {
    Code::Ok => 200,
    Code::Cancelled => 499,
    Code::Unknown => 500,
    Code::InvalidArgument => 400,
    Code::DeadlineExceeded => 504,
    Code::NotFound => 404,
    Code::AlreadyExists => 409,
    Code::PermissionDenied => 403,
    Code::ResourceExhausted => 429,
    Code::FailedPrecondition => 400,
    Code::Aborted => 409,
    Code::OutOfRange => 400,
    Code::Unimplemented => 501,
    Code::Internal => 500,
    Code::Unavailable => 503,
    Code::DataLoss => 500,
    Code::Unauthenticated => 401,
  }
}
