use crate::constants::ROOT_PATH;
use crate::handler::{Handler, IntoHandlers};
use std::fmt::{self, Debug, Formatter};

/// A group of middlewares mounted at a path. Please refer to the [Middleware](./index.html#middleware) for more info.
///
/// Middlewares mounted at `/` are global: they run first, in registration order, for every request.
/// Middlewares mounted at any other path run for every request whose matched route passes through that
/// path. A path ending with a wildcard segment (e.g. `/users/*`) also covers the position right before the
/// wildcard, so it applies to every route below `/users`.
///
/// This `Middleware<E>` type accepts a single type parameter: `E`.
///
/// * The `E` represents any error type which will be used by route handlers and the middlewares.
pub struct Middleware<E> {
    pub(crate) path: String,
    pub(crate) handlers: Vec<Handler<E>>,
}

impl<E> Middleware<E> {
    /// Creates global middlewares which run for every request.
    ///
    /// # Examples
    ///
    /// ```
    /// use routerify_trie::{Handler, Middleware, Router};
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Infallible> {
    ///     let logger: Handler<Infallible> = Handler::new(|ctx| {
    ///         Box::pin(async move {
    ///             println!("{} {}", ctx.method(), ctx.path());
    ///             ctx.next().await
    ///         })
    ///     });
    ///
    ///     Router::builder().middleware(Middleware::global(logger)).build().unwrap()
    /// }
    /// # run();
    /// ```
    pub fn global<H: IntoHandlers<E>>(handlers: H) -> Middleware<E> {
        Middleware::with_path(ROOT_PATH, handlers)
    }

    /// Creates middlewares scoped to the specified path.
    ///
    /// # Examples
    ///
    /// ```
    /// use routerify_trie::{Handler, Middleware, Router};
    /// use hyper::StatusCode;
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Infallible> {
    ///     let auth: Handler<Infallible> = Handler::new(|ctx| {
    ///         Box::pin(async move {
    ///             if ctx.headers().contains_key("authorization") {
    ///                 ctx.next().await
    ///             } else {
    ///                 ctx.text("Unauthorized", StatusCode::UNAUTHORIZED);
    ///                 Ok(())
    ///             }
    ///         })
    ///     });
    ///
    ///     Router::builder().middleware(Middleware::with_path("/admin/*", auth)).build().unwrap()
    /// }
    /// # run();
    /// ```
    pub fn with_path<P: Into<String>, H: IntoHandlers<E>>(path: P, handlers: H) -> Middleware<E> {
        Middleware {
            path: path.into(),
            handlers: handlers.into_handlers(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<E> From<Handler<E>> for Middleware<E> {
    fn from(handler: Handler<E>) -> Middleware<E> {
        Middleware::global(handler)
    }
}

impl<E> Debug for Middleware<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ path: {:?}, handlers: {:?} }}", self.path, self.handlers)
    }
}
