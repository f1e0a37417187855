//! The HTTP API. Every route is one parameterized SQL statement against the `todos` table.

use axum::{
    async_trait,
    body::Bytes,
    extract::{
        rejection::{BytesRejection, FormRejection, JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::{header::CONTENT_TYPE, request::Parts, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

pub mod headers;
pub mod routes;
pub mod validation;

pub use routes::router;

/// The result of an API route handler.
pub type Response<T> = Result<(StatusCode, Json<T>), Error>;

/// An API error. Its [`Display`](std::fmt::Display) text is exactly what clients receive, so it
/// must never include configuration values or other secrets.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request body lacked a nonempty `todo` field.
    #[error("Todo is required in the request body.")]
    TodoRequired,

    /// The request body couldn't be parsed.
    #[error("Invalid request body.")]
    InvalidBody,

    /// The todo ID in the URI path wasn't an integer.
    #[error("Invalid todo ID.")]
    InvalidId,

    /// No todo exists with the requested ID.
    #[error("Todo not found.")]
    TodoNotFound,

    /// The request matched no route.
    #[error("Not found.")]
    RouteNotFound,

    /// A database query failed. The details are logged, not sent.
    #[error("Database query failed.")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Gets the HTTP response status code corresponding to the API error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TodoRequired | Self::InvalidBody | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::TodoNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Gets the SQLSTATE code of a failed query, if the database reported one.
    pub fn code(&self) -> Option<String> {
        match self {
            Self::Database(sqlx::Error::Database(error)) => {
                error.code().map(|code| code.into_owned())
            }
            _ => None,
        }
    }
}

/// The JSON body of an error response.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    /// A human-readable message.
    pub error: String,

    /// The SQLSTATE code of a failed query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if let Self::Database(source) = &self {
            error!(error = %source, "Database query failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected JSON body");
        Self::InvalidBody
    }
}

impl From<FormRejection> for Error {
    fn from(rejection: FormRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected form body");
        Self::InvalidBody
    }
}

impl From<BytesRejection> for Error {
    fn from(rejection: BytesRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Failed to read body");
        Self::InvalidBody
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected path parameters");
        Self::InvalidId
    }
}

/// A request body extractor accepting either JSON or a URL-encoded form.
///
/// An empty body, or a request with neither content type, is treated as an empty object, so a
/// missing field is reported by validation rather than as a parse failure.
#[derive(Clone, Copy, Debug)]
pub struct Body<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Body<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(request, state).await?;
            return Ok(Self(value));
        }

        if content_type.starts_with("application/json") || content_type.ends_with("+json") {
            let bytes = Bytes::from_request(request, state).await?;

            if bytes.is_empty() {
                return empty_object().map(Self);
            }

            let Json(value) = Json::<T>::from_bytes(&bytes)?;
            return Ok(Self(value));
        }

        empty_object().map(Self)
    }
}

/// Deserializes a value from an empty JSON object, standing in for an absent body.
fn empty_object<T: DeserializeOwned>() -> Result<T, Error> {
    serde_json::from_value(Value::Object(Map::new())).map_err(|error| {
        debug!(%error, "Request without a parsable body");
        Error::InvalidBody
    })
}

/// A URI path parameter extractor that rejects with [`Error::InvalidId`].
#[derive(Clone, Copy, Debug)]
pub struct Path<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Path<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;

        Ok(Self(value))
    }
}
