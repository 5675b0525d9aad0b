use crate::context::Context;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The future returned by every route handler and middleware.
///
/// It borrows the request [`Context`](./struct.Context.html) for its whole lifetime, so a handler
/// can call [`Context::next`](./struct.Context.html#method.next) and keep working with the same
/// context after the downstream handlers returned.
pub type HandlerFuture<'a, E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send + 'a>>;

type BoxedHandler<E> = Arc<dyn for<'a> Fn(&'a mut Context<E>) -> HandlerFuture<'a, E> + Send + Sync + 'static>;

/// A single step of a request chain: a middleware or a terminal route handler.
///
/// Middlewares and route handlers share this one type. The only thing that makes a handler a
/// middleware is its position in the chain and whether it calls `ctx.next()` to pass the control
/// downstream.
///
/// # Examples
///
/// ```
/// use routerify_trie::{Context, Handler, HandlerFuture};
/// use std::convert::Infallible;
///
/// // A handler written as a function.
/// fn hello(ctx: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
///     Box::pin(async move {
///         ctx.text("Hello", hyper::StatusCode::OK);
///         Ok(())
///     })
/// }
///
/// let from_fn: Handler<Infallible> = Handler::new(hello);
///
/// // A middleware written as a closure.
/// let from_closure: Handler<Infallible> = Handler::new(|ctx| {
///     Box::pin(async move {
///         ctx.set("visited", true);
///         ctx.next().await
///     })
/// });
/// ```
pub struct Handler<E> {
    inner: BoxedHandler<E>,
    name: &'static str,
}

impl<E> Handler<E> {
    /// Wraps a function or a closure into a `Handler`.
    pub fn new<F>(f: F) -> Handler<E>
    where
        F: for<'a> Fn(&'a mut Context<E>) -> HandlerFuture<'a, E> + Send + Sync + 'static,
    {
        Handler {
            inner: Arc::new(f),
            name: std::any::type_name::<F>(),
        }
    }

    /// Returns `true` if both values point to the same registered handler.
    pub fn ptr_eq(&self, other: &Handler<E>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn call<'a>(&self, ctx: &'a mut Context<E>) -> HandlerFuture<'a, E> {
        (self.inner)(ctx)
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Handler {
            inner: Arc::clone(&self.inner),
            name: self.name,
        }
    }
}

impl<E> Debug for Handler<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", self.name)
    }
}

/// Conversion into the list of handlers accepted by the route registration methods.
///
/// A list is split by the router: every handler but the last one is registered as a path-scoped
/// middleware and the last one becomes the terminal route handler.
pub trait IntoHandlers<E> {
    fn into_handlers(self) -> Vec<Handler<E>>;
}

impl<E> IntoHandlers<E> for Handler<E> {
    fn into_handlers(self) -> Vec<Handler<E>> {
        vec![self]
    }
}

impl<E> IntoHandlers<E> for Vec<Handler<E>> {
    fn into_handlers(self) -> Vec<Handler<E>> {
        self
    }
}

impl<E, const N: usize> IntoHandlers<E> for [Handler<E>; N] {
    fn into_handlers(self) -> Vec<Handler<E>> {
        Vec::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn noop(_: &mut Context<Infallible>) -> HandlerFuture<'_, Infallible> {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn should_compare_handlers_by_identity() {
        let a = Handler::new(noop);
        let b = Handler::new(noop);
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn should_convert_into_handler_lists() {
        let a = Handler::new(noop);
        assert_eq!(a.clone().into_handlers().len(), 1);
        assert_eq!([a.clone(), a.clone()].into_handlers().len(), 2);
        assert!(Vec::<Handler<Infallible>>::new().into_handlers().is_empty());
    }

    #[test]
    fn should_debug_with_handler_name() {
        let a = Handler::new(noop);
        assert!(format!("{:?}", a).contains("noop"));
    }
}
