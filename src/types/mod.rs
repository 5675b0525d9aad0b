use crate::RouteError;
use http_body_util::combinators::UnsyncBoxBody;
use hyper::body::Bytes;

pub use self::route_match::{Match, MatchOutcome};
pub use self::route_params::RouteParams;

mod route_match;
mod route_params;

/// The request body type seen by route handlers and middlewares.
///
/// Any incoming body is boxed into this type by the [`RequestService`](./struct.RequestService.html),
/// so handlers don't have to be generic over the body type of the underlying server.
pub type RequestBody = UnsyncBoxBody<Bytes, RouteError>;
