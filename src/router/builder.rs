use crate::data_map::SharedDataMap;
use crate::handler::{Handler, IntoHandlers};
use crate::middleware::Middleware;
use crate::route::Route;
use crate::router::Router;
use crate::trie::Trie;
use crate::Error;
use hyper::Method;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// Builder for the [Router](./struct.Router.html) type.
///
/// This `RouterBuilder<E>` type accepts a single type parameter: `E`.
///
/// * The `E` represents any error type which will be used by route handlers and the middlewares.
///
/// Every registration method accepts a single [`Handler`](./struct.Handler.html) or a list of them. In a
/// list, every handler but the last one is registered as a middleware scoped to the route path and the last
/// one is the terminal route handler. A configuration mistake, e.g. an empty handler list, is reported by
/// [`build`](#method.build).
///
/// # Examples
///
/// ```
/// use routerify_trie::{Context, Handler, HandlerFuture, Middleware, Router};
/// use hyper::StatusCode;
/// use std::convert::Infallible;
///
/// fn logger(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
///     Box::pin(async move {
///         println!("{} {} {}", ctx.remote_addr(), ctx.method(), ctx.path());
///         ctx.next().await
///     })
/// }
///
/// fn list_users(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
///     Box::pin(async move {
///         ctx.text("User List", StatusCode::OK);
///         Ok(())
///     })
/// }
///
/// fn show_user(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
///     Box::pin(async move {
///         let id = ctx.param("id").unwrap_or_default().to_owned();
///         ctx.text(format!("User {}", id), StatusCode::OK);
///         Ok(())
///     })
/// }
///
/// fn run() -> Router<Infallible> {
///     Router::builder()
///         .middleware(Middleware::global(Handler::new(logger)))
///         .get("/users", Handler::new(list_users))
///         // `logger` runs a second time, scoped to this route only.
///         .get("/users/:id", [Handler::new(logger), Handler::new(show_user)])
///         .build()
///         .unwrap()
/// }
/// # run();
/// ```
pub struct RouterBuilder<E> {
    inner: crate::Result<BuilderInner<E>>,
}

struct BuilderInner<E> {
    trie: Trie<E>,
    shared: SharedDataMap,
    method_not_allowed: bool,
}

impl<E> BuilderInner<E> {
    fn register(&mut self, route: Route<E>) -> crate::Result<()> {
        if !route.middlewares.is_empty() {
            self.trie.add_middleware(&route.path, route.middlewares);
        }
        self.trie.insert(route.method, &route.path, route.handler)
    }
}

impl<E> RouterBuilder<E> {
    /// Creates a new `RouterBuilder` instance with default options.
    pub fn new() -> RouterBuilder<E> {
        RouterBuilder::default()
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    pub fn build(self) -> crate::Result<Router<E>> {
        self.inner.map(|inner| {
            tracing::debug!(routes = ?inner.trie.routes(), "Router built");
            Router {
                trie: inner.trie,
                shared: Arc::new(inner.shared),
                method_not_allowed: inner.method_not_allowed,
            }
        })
    }

    fn and_then<F>(self, func: F) -> Self
    where
        F: FnOnce(BuilderInner<E>) -> crate::Result<BuilderInner<E>>,
    {
        let inner = match self.inner {
            Ok(inner) => func(inner).map_err(|err| {
                tracing::warn!(error = %err, "Router configuration error");
                err
            }),
            Err(err) => Err(err),
        };
        RouterBuilder { inner }
    }
}

impl<E> RouterBuilder<E> {
    /// Adds a new route with `GET` method and the handlers at the specified path.
    pub fn get<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::GET, path, handlers)
    }

    /// Adds a new route with `POST` method and the handlers at the specified path.
    pub fn post<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::POST, path, handlers)
    }

    /// Adds a new route with `PUT` method and the handlers at the specified path.
    pub fn put<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::PUT, path, handlers)
    }

    /// Adds a new route with `PATCH` method and the handlers at the specified path.
    pub fn patch<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::PATCH, path, handlers)
    }

    /// Adds a new route with `DELETE` method and the handlers at the specified path.
    pub fn delete<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::DELETE, path, handlers)
    }

    /// Adds a new route with `HEAD` method and the handlers at the specified path.
    pub fn head<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::HEAD, path, handlers)
    }

    /// Adds a new route with `OPTIONS` method and the handlers at the specified path.
    pub fn options<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::OPTIONS, path, handlers)
    }

    /// Adds a new route with `CONNECT` method and the handlers at the specified path.
    pub fn connect<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::CONNECT, path, handlers)
    }

    /// Adds a new route with `TRACE` method and the handlers at the specified path.
    pub fn trace<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.add(Method::TRACE, path, handlers)
    }

    /// Adds a new route with the specified method and the handlers at the specified path.
    ///
    /// The method can be a [`Method`](https://docs.rs/http/1/http/method/struct.Method.html) or a method name,
    /// an invalid name is reported by [`build`](#method.build).
    ///
    /// # Examples
    ///
    /// ```
    /// use routerify_trie::{Handler, Router};
    /// use hyper::StatusCode;
    /// use std::convert::Infallible;
    ///
    /// fn run() -> Router<Infallible> {
    ///     let purge: Handler<Infallible> = Handler::new(|ctx| {
    ///         Box::pin(async move {
    ///             ctx.status(StatusCode::NO_CONTENT);
    ///             Ok(())
    ///         })
    ///     });
    ///
    ///     Router::builder().handle("PURGE", "/cache/*", purge).build().unwrap()
    /// }
    /// # run();
    /// ```
    pub fn handle<M, P, H>(self, method: M, path: P, handlers: H) -> Self
    where
        M: TryInto<Method>,
        M::Error: Display,
        P: Into<String>,
        H: IntoHandlers<E>,
    {
        match method.try_into() {
            Ok(method) => self.add(method, path, handlers),
            Err(err) => self.and_then(move |_| Err(Error::InvalidMethod(err.to_string()))),
        }
    }

    fn add<P: Into<String>, H: IntoHandlers<E>>(self, method: Method, path: P, handlers: H) -> Self {
        let path = path.into();
        let handlers = handlers.into_handlers();
        self.and_then(move |mut inner| {
            let route = Route::new(method, path, handlers)?;
            inner.register(route)?;
            Ok(inner)
        })
    }

    /// Registers a terminal handler for a method and a path without any path-scoped middleware.
    pub fn insert<P: Into<String>>(self, method: Method, path: P, handler: Handler<E>) -> Self {
        let path = path.into();
        self.and_then(move |mut inner| {
            inner.trie.insert(method, &path, handler)?;
            Ok(inner)
        })
    }

    /// Appends middlewares at a path. A root path registers global middlewares.
    pub fn add_middleware<P: Into<String>, H: IntoHandlers<E>>(self, path: P, handlers: H) -> Self {
        self.middleware(Middleware::with_path(path, handlers))
    }
}

impl<E> RouterBuilder<E> {
    /// Adds a middleware group, either global or scoped to a path.
    ///
    /// A bare [`Handler`](./struct.Handler.html) is mounted as a global middleware.
    pub fn middleware<M: Into<Middleware<E>>>(self, m: M) -> Self {
        let m = m.into();
        self.and_then(move |mut inner| {
            inner.trie.add_middleware(&m.path, m.handlers);
            Ok(inner)
        })
    }

    /// Specify app data to be shared across route handlers and middlewares.
    ///
    /// A single value is kept per data type, a later value replaces an earlier one of the same type.
    pub fn data<T: Send + Sync + 'static>(self, data: T) -> Self {
        self.and_then(move |mut inner| {
            inner.shared.insert(data);
            Ok(inner)
        })
    }

    /// Answers requests whose path matched a route registered for other methods with
    /// `405 Method Not Allowed` and an `Allow` header, instead of `404 Not Found`.
    pub fn method_not_allowed(self, enabled: bool) -> Self {
        self.and_then(move |mut inner| {
            inner.method_not_allowed = enabled;
            Ok(inner)
        })
    }
}

impl<E> Default for RouterBuilder<E> {
    fn default() -> RouterBuilder<E> {
        RouterBuilder {
            inner: Ok(BuilderInner {
                trie: Trie::new(),
                shared: SharedDataMap::new(),
                method_not_allowed: false,
            }),
        }
    }
}

impl<E> Debug for RouterBuilder<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Ok(inner) => write!(f, "RouterBuilder {{ trie: {:?} }}", inner.trie),
            Err(err) => write!(f, "RouterBuilder {{ error: {} }}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchOutcome;
    use std::convert::Infallible;

    fn handler() -> Handler<Infallible> {
        Handler::new(|_| Box::pin(async { Ok(()) }))
    }

    #[test]
    fn should_fail_on_empty_handler_list() {
        let err = Router::<Infallible>::builder()
            .get("/ok", handler())
            .post("/users", Vec::new())
            .get("/after", handler())
            .build()
            .unwrap_err();

        match err {
            Error::EmptyHandlers { method, path } => {
                assert_eq!(method, "POST");
                assert_eq!(path, "/users");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn should_split_route_handlers_into_scoped_middlewares() {
        let (mw, h) = (handler(), handler());
        let router = Router::builder()
            .get("/users/:id", [mw.clone(), h.clone()])
            .get("/users/:id/posts", handler())
            .build()
            .unwrap();

        let m = router.search(&Method::GET, "/users/1");
        assert_eq!(m.handlers().len(), 2);
        assert!(m.handlers()[0].ptr_eq(&mw));
        assert!(m.terminal().unwrap().ptr_eq(&h));

        // The route middleware is scoped to the route path, and every path below it.
        let m = router.search(&Method::GET, "/users/1/posts");
        assert_eq!(m.handlers().len(), 2);
        assert!(m.handlers()[0].ptr_eq(&mw));
    }

    #[test]
    fn should_register_every_method() {
        let router = Router::builder()
            .get("/r", handler())
            .post("/r", handler())
            .put("/r", handler())
            .patch("/r", handler())
            .delete("/r", handler())
            .head("/r", handler())
            .options("/r", handler())
            .connect("/r", handler())
            .trace("/r", handler())
            .handle("PURGE", "/r", handler())
            .handle(Method::GET, "/s", handler())
            .build()
            .unwrap();

        let methods = router
            .routes()
            .into_iter()
            .filter(|(_, path)| path == "/r")
            .map(|(method, _)| method.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            methods,
            vec!["CONNECT", "DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PURGE", "PUT", "TRACE"]
        );
        assert!(router.search(&Method::GET, "/s").is_found());
    }

    #[test]
    fn should_fail_on_invalid_method_name() {
        let err = Router::<Infallible>::builder()
            .handle("GE T", "/", handler())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMethod(_)));
    }

    #[test]
    fn should_mount_bare_handler_as_global_middleware() {
        let (global, scoped, h) = (handler(), handler(), handler());
        let router = Router::builder()
            .middleware(global.clone())
            .add_middleware("/admin/*", scoped.clone())
            .insert(Method::GET, "/admin/panel", h.clone())
            .build()
            .unwrap();

        let m = router.search(&Method::GET, "/admin/panel");
        assert_eq!(m.handlers().len(), 3);
        assert!(m.handlers()[0].ptr_eq(&global));
        assert!(m.handlers()[1].ptr_eq(&scoped));
        assert!(m.handlers()[2].ptr_eq(&h));

        let m = router.search(&Method::GET, "/elsewhere");
        assert_eq!(m.outcome(), &MatchOutcome::NotFound);
        assert_eq!(m.handlers().len(), 1);
    }

    #[test]
    fn should_fail_on_conflicting_param_names() {
        let err = Router::<Infallible>::builder()
            .get("/a/:x", handler())
            .get("/a/:y/edit", handler())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingParam { .. }));
    }
}
