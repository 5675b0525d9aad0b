use thiserror::Error as ThisError;

/// The error type used by the `Router` while building the routing table and while
/// serving a request.
///
/// Errors produced by route handlers and middlewares are never wrapped into this type,
/// they are boxed into [`RouteError`](./type.RouteError.html) and propagated unchanged.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A route was registered without any handler.
    #[error("route {method} {path} must have at least one handler")]
    EmptyHandlers { method: String, path: String },

    /// A method name could not be parsed into an HTTP method.
    #[error("invalid http method: {0}")]
    InvalidMethod(String),

    /// Two routes declare differently named parameters at the same position.
    #[error("conflicting parameter names at {path}: `:{existing}` is already registered, got `:{new}`")]
    ConflictingParam { path: String, existing: String, new: String },

    #[error("couldn't percent decode request path: {0}")]
    PathDecode(String),

    #[error("couldn't read the request body: {0}")]
    Body(String),

    #[error("couldn't serialize the response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// A boxed error type which can hold any error thrown by route handlers and middlewares.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;
