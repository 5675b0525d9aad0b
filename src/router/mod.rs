use crate::context::Context;
use crate::data_map::SharedDataMap;
use crate::types::{Match, MatchOutcome, RequestBody};
use crate::trie::Trie;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use std::fmt::{self, Debug, Formatter};
use std::net::SocketAddr;
use std::sync::Arc;

pub use self::builder::RouterBuilder;

mod builder;

/// Represents a modular, lightweight and mountable router type.
///
/// A router consists of the routing trie built from the registered routes and middlewares, the app
/// state shared by the handlers and the router options. It's immutable once built: use the
/// [RouterBuilder](./struct.RouterBuilder.html) to register routes, and
/// [`RouterService::reload`](./struct.RouterService.html#method.reload) to swap in a new router while serving.
///
/// This `Router<E>` type accepts a single type parameter: `E`.
///
/// * The `E` represents any error type which will be used by route handlers and the middlewares. This error
///   type must be convertible into [`RouteError`](./type.RouteError.html) to be served.
///
/// # Examples
///
/// ```
/// use routerify_trie::{Context, HandlerFuture, Handler, Router};
/// use hyper::StatusCode;
/// use std::convert::Infallible;
///
/// fn home(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
///     Box::pin(async move {
///         ctx.text("home", StatusCode::OK);
///         Ok(())
///     })
/// }
///
/// fn run() -> Router<Infallible> {
///     let router = Router::builder().get("/", Handler::new(home)).build().unwrap();
///     router
/// }
/// # run();
/// ```
pub struct Router<E> {
    trie: Trie<E>,
    shared: Arc<SharedDataMap>,
    method_not_allowed: bool,
}

impl<E> Router<E> {
    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder() -> RouterBuilder<E> {
        RouterBuilder::new()
    }

    /// Resolves a method and a concrete path to the ordered handler sequence and the route parameters.
    ///
    /// A result without a terminal handler means the request must be answered as not found.
    pub fn search(&self, method: &Method, path: &str) -> Match<E> {
        self.trie.search(method, path)
    }

    /// Returns every registered `(method, path pattern)` pair.
    pub fn routes(&self) -> Vec<(Method, String)> {
        self.trie.routes()
    }

    pub(crate) async fn process(
        &self,
        target_path: &str,
        req: Request<RequestBody>,
        remote_addr: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, E> {
        let (handlers, params, outcome) = self.search(req.method(), target_path).into_parts();

        match outcome {
            MatchOutcome::Found => {
                let mut ctx = Context::new(req, params, handlers, Arc::clone(&self.shared), remote_addr);
                ctx.run().await?;
                Ok(ctx.into_response())
            }
            MatchOutcome::MethodNotAllowed { allowed } if self.method_not_allowed => {
                tracing::debug!(method = %req.method(), path = target_path, "Method not allowed");
                Ok(method_not_allowed_response(&allowed))
            }
            _ => {
                tracing::debug!(method = %req.method(), path = target_path, "No route found");
                Ok(plain_response(StatusCode::NOT_FOUND))
            }
        }
    }
}

fn plain_response(status: StatusCode) -> Response<Full<Bytes>> {
    let reason = status.canonical_reason().unwrap_or_default();
    let mut res = Response::new(Full::new(Bytes::from(reason)));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    res
}

fn method_not_allowed_response(allowed: &[Method]) -> Response<Full<Bytes>> {
    let mut res = plain_response(StatusCode::METHOD_NOT_ALLOWED);
    let allow = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
    if let Ok(val) = HeaderValue::from_str(&allow) {
        res.headers_mut().insert(ALLOW, val);
    }
    res
}

impl<E> Debug for Router<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routes: {:?}, shared: {:?}, method_not_allowed: {:?} }}",
            self.routes(),
            self.shared,
            self.method_not_allowed
        )
    }
}
