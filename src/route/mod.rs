use crate::handler::Handler;
use crate::Error;
use hyper::Method;
use std::fmt::{self, Debug, Formatter};

/// A route registration: a method, a path pattern, the path-scoped middlewares and the terminal handler.
///
/// It's created by the [RouterBuilder](./struct.RouterBuilder.html) methods from the handler list passed
/// to them. Every handler but the last one becomes a path-scoped middleware, the last one becomes the
/// terminal handler.
pub(crate) struct Route<E> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) middlewares: Vec<Handler<E>>,
    pub(crate) handler: Handler<E>,
}

impl<E> Route<E> {
    pub(crate) fn new<P: Into<String>>(method: Method, path: P, mut handlers: Vec<Handler<E>>) -> crate::Result<Route<E>> {
        let path = path.into();
        let handler = handlers.pop().ok_or_else(|| Error::EmptyHandlers {
            method: method.to_string(),
            path: path.clone(),
        })?;

        Ok(Route {
            method,
            path,
            middlewares: handlers,
            handler,
        })
    }
}

impl<E> Debug for Route<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ method: {:?}, path: {:?}, middlewares: {:?}, handler: {:?} }}",
            self.method, self.path, self.middlewares, self.handler
        )
    }
}
