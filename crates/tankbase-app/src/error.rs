use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Persistence and other internal failures are fatal for the request and
/// surface as a generic server error.
pub struct ApiError(anyhow::Error);

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(value: E) -> Self {
        ApiError(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
