//! `routerify-trie` is a trie based router with an explicit middleware chain for the Rust HTTP library [hyper](https://hyper.rs/).
//!
//! Core features:
//!
//! - 🌲 Segment trie route matching: literal segments win over `:param` segments, which win over `*wildcard` segments
//!
//! - 🧅 Middlewares wrap the downstream handlers: code before `ctx.next().await` runs on the way in, code after it on the way out
//!
//! - 🛑 A middleware short-circuits the chain simply by not calling `ctx.next()`
//!
//! - 📍 Middlewares are scoped to a path prefix, `/` being the global scope
//!
//! - 🔥 Route handlers and middlewares may share app state and per request values
//!
//! - ♻️ The router can be swapped while serving, without dropping in-flight requests
//!
//! ## Basic Example
//!
//! A simple example using `routerify-trie` with `hyper` would look like the following:
//!
//! ```no_run
//! use hyper::service::Service;
//! use hyper::StatusCode;
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! use routerify_trie::{Context, Handler, HandlerFuture, RouteError, Router, RouterService};
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! // Define an app state to share it across the route handlers and middlewares.
//! struct State(u64);
//!
//! // A handler for "/" page.
//! fn home(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
//!     Box::pin(async move {
//!         // Access the app state.
//!         let state = ctx.data::<State>().map(|s| s.0).unwrap_or_default();
//!         ctx.text(format!("Home page, state {}", state), StatusCode::OK);
//!         Ok(())
//!     })
//! }
//!
//! // A handler for "/users/:userId" page.
//! fn user(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
//!     Box::pin(async move {
//!         let user_id = ctx.param("userId").unwrap_or_default().to_owned();
//!         ctx.text(format!("Hello {}", user_id), StatusCode::OK);
//!         Ok(())
//!     })
//! }
//!
//! // A middleware which logs an http request and passes the control downstream.
//! fn logger(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
//!     Box::pin(async move {
//!         println!("{} {} {}", ctx.remote_addr(), ctx.method(), ctx.path());
//!         ctx.next().await
//!     })
//! }
//!
//! fn router() -> Router<RouteError> {
//!     Router::builder()
//!         .data(State(100))
//!         .middleware(Handler::new(logger))
//!         .get("/", Handler::new(home))
//!         .get("/users/:userId", Handler::new(user))
//!         .build()
//!         .unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let service = Arc::new(RouterService::new(router()));
//!
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await?;
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let router_service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = router_service.call(&stream).await.unwrap();
//!
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A route handler is any function or closure taking `&mut Context<E>` and returning a boxed
//! future, wrapped into a [`Handler`](./struct.Handler.html). The handler writes the response
//! into the context.
//!
//! ```
//! use routerify_trie::{Context, Handler, HandlerFuture, Router};
//! use hyper::StatusCode;
//! # use std::convert::Infallible;
//!
//! fn about(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
//!     Box::pin(async move {
//!         ctx.text("About page", StatusCode::OK);
//!         Ok(())
//!     })
//! }
//!
//! # fn run() -> Router<Infallible> {
//! let router = Router::builder()
//!     .get("/about", Handler::new(about))
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Route Paths
//!
//! A path is split on `/` into segments, empty segments are ignored, so `/users/`, `users` and
//! `//users` all name the same route. A segment is one of:
//!
//! - a literal, matched byte for byte,
//! - `:name`, matching any single segment and capturing it under `name`,
//! - `*name`, matching the rest of the path and capturing it under `name`.
//!
//! Literal children are always tried first, then the parameter child, then the wildcard child.
//! The search doesn't backtrack.
//!
//! ```
//! use routerify_trie::{Context, Handler, HandlerFuture, MatchOutcome, Router};
//! use hyper::{Method, StatusCode};
//! # use std::convert::Infallible;
//!
//! fn ok(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
//!     Box::pin(async move {
//!         ctx.status(StatusCode::OK);
//!         Ok(())
//!     })
//! }
//!
//! # fn run() -> Router<Infallible> {
//! let router = Router::builder()
//!     .get("/users/me", Handler::new(ok))
//!     .get("/users/:id", Handler::new(ok))
//!     .get("/static/*file", Handler::new(ok))
//!     .build()
//!     .unwrap();
//!
//! let m = router.search(&Method::GET, "/users/42");
//! assert_eq!(m.params().get("id").map(String::as_str), Some("42"));
//!
//! let m = router.search(&Method::GET, "/static/css/site.css");
//! assert_eq!(m.params().get("file").map(String::as_str), Some("css/site.css"));
//!
//! let m = router.search(&Method::POST, "/users/me");
//! assert!(matches!(m.outcome(), MatchOutcome::MethodNotAllowed { .. }));
//! # router
//! # }
//! # run();
//! ```
//!
//! #### Handle 404 Pages
//!
//! A request with no registered handler for its method and path is answered with `404 Not Found`
//! and none of the middlewares run. Enable
//! [`method_not_allowed`](./struct.RouterBuilder.html#method.method_not_allowed) to answer
//! `405 Method Not Allowed` with an `Allow` header when only the method doesn't match.
//!
//! ### Route Parameters
//!
//! Captured parameters are read from the context:
//!
//! ```
//! use routerify_trie::{Context, Handler, HandlerFuture, Router};
//! use hyper::StatusCode;
//! # use std::convert::Infallible;
//!
//! fn book(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
//!     Box::pin(async move {
//!         let msg = format!(
//!             "book {} of {}",
//!             ctx.param("bookName").unwrap_or_default(),
//!             ctx.param("userName").unwrap_or_default()
//!         );
//!         ctx.text(msg, StatusCode::OK);
//!         Ok(())
//!     })
//! }
//!
//! # fn run() -> Router<Infallible> {
//! let router = Router::builder()
//!     .get("/users/:userName/books/:bookName", Handler::new(book))
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Middleware
//!
//! A middleware is a [`Handler`](./struct.Handler.html) registered for a path prefix. A request
//! runs, in order, the middlewares of every prefix of its matched route, outermost first, then the
//! route handler. Every middleware decides whether the chain continues by awaiting
//! [`ctx.next()`](./struct.Context.html#method.next).
//!
//! ```
//! use routerify_trie::{Context, Handler, HandlerFuture, Middleware, Router};
//! use hyper::StatusCode;
//! use std::time::Instant;
//! # use std::convert::Infallible;
//!
//! // Wraps the whole chain.
//! fn timing(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
//!     Box::pin(async move {
//!         let start = Instant::now();
//!         ctx.next().await?;
//!         println!("{} {} took {:?}", ctx.method(), ctx.path(), start.elapsed());
//!         Ok(())
//!     })
//! }
//!
//! // Stops the chain unless the request is authorized.
//! fn auth(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
//!     Box::pin(async move {
//!         if ctx.headers().contains_key("authorization") {
//!             ctx.next().await
//!         } else {
//!             ctx.text("Unauthorized", StatusCode::UNAUTHORIZED);
//!             Ok(())
//!         }
//!     })
//! }
//!
//! fn dashboard(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
//!     Box::pin(async move {
//!         ctx.text("Dashboard", StatusCode::OK);
//!         Ok(())
//!     })
//! }
//!
//! # fn run() -> Router<Infallible> {
//! let router = Router::builder()
//!     .middleware(Handler::new(timing))
//!     .middleware(Middleware::with_path("/admin", Handler::new(auth)))
//!     .get("/admin/dashboard", Handler::new(dashboard))
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! A list of handlers can be given to a route too: every handler but the last one becomes a
//! middleware of the route path.
//!
//! ```
//! # use routerify_trie::{Context, Handler, HandlerFuture, Router};
//! # use hyper::StatusCode;
//! # use std::convert::Infallible;
//! # fn auth(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> { Box::pin(async move { ctx.next().await }) }
//! # fn create(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> { Box::pin(async move { ctx.status(StatusCode::CREATED); Ok(()) }) }
//! # fn run() -> Router<Infallible> {
//! let router = Router::builder()
//!     .post("/posts", [Handler::new(auth), Handler::new(create)])
//!     .build()
//!     .unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ## Data and State Sharing
//!
//! App state registered with [`RouterBuilder::data`](./struct.RouterBuilder.html#method.data) is
//! shared by all requests and read with [`ctx.data::<T>()`](./struct.Context.html#method.data).
//! Values set with [`ctx.set`](./struct.Context.html#method.set) live as long as the request and
//! are how a middleware hands something to the handlers downstream.
//!
//! ## Hot Reload
//!
//! [`RouterService::reload`](./struct.RouterService.html#method.reload) swaps in a freshly built
//! router. New requests see the new routes, requests in flight complete with the router they
//! started with.
//!
//! ## Error Handling
//!
//! Any handler or middleware may return an error of the router error type `E`. The error travels
//! back up the chain through every `ctx.next().await`, so an outer middleware can inspect it,
//! recover from it by writing a response and returning `Ok(())`, or propagate it. An error
//! reaching the service closes the connection like any hyper service error.
//!
//! Registration errors, like an empty handler list or two parameter names at the same position,
//! are reported by [`RouterBuilder::build`](./struct.RouterBuilder.html#method.build) as an
//! [`Error`](./enum.Error.html).

pub use self::context::Context;
pub use self::error::{Error, RouteError};
pub use self::handler::{Handler, HandlerFuture, IntoHandlers};
pub use self::middleware::Middleware;
pub use self::router::{Router, RouterBuilder};
#[doc(hidden)]
pub use self::service::RequestService;
pub use self::service::RequestServiceBuilder;
pub use self::service::RouterService;
pub use self::types::{Match, MatchOutcome, RequestBody, RouteParams};

mod constants;
mod context;
mod data_map;
mod error;
mod handler;
mod helpers;
mod middleware;
pub mod prelude;
mod route;
mod router;
mod service;
mod trie;
mod types;

/// A Result type often returned from methods that can have routerify errors.
pub type Result<T> = std::result::Result<T, Error>;
