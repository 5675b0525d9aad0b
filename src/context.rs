use crate::data_map::{SharedDataMap, ValueMap};
use crate::handler::{Handler, HandlerFuture};
use crate::helpers;
use crate::types::{RequestBody, RouteParams};
use crate::{Error, RouteError};
use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full};
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use std::net::SocketAddr;
use std::sync::Arc;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// The handler sequence of one request and the position of the handler currently running.
pub(crate) struct Chain<E> {
    handlers: Vec<Handler<E>>,
    cursor: usize,
}

impl<E> Chain<E> {
    pub(crate) fn new(handlers: Vec<Handler<E>>) -> Chain<E> {
        Chain { handlers, cursor: 0 }
    }

    fn current(&self) -> Option<Handler<E>> {
        self.handlers.get(self.cursor).cloned()
    }

    fn advance(&mut self) -> Option<Handler<E>> {
        self.cursor = self.cursor.saturating_add(1);
        self.current()
    }
}

/// The request context passed by reference through a matched handler chain.
///
/// It owns the request, the response being built, the extracted route parameters and a
/// key/value bag private to the request. A handler passes the control to the next handler by
/// calling [`next`](#method.next); a handler which doesn't call it ends the chain.
///
/// # Examples
///
/// ```
/// use routerify_trie::{Context, Handler, HandlerFuture, RouteError};
/// use hyper::StatusCode;
/// use std::time::Instant;
///
/// // Wraps every downstream handler and logs the elapsed time.
/// fn timing(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
///     Box::pin(async move {
///         let start = Instant::now();
///         ctx.next().await?;
///         println!("{} {} took {:?}", ctx.method(), ctx.path(), start.elapsed());
///         Ok(())
///     })
/// }
///
/// fn show_user(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
///     Box::pin(async move {
///         let id = ctx.param("id").unwrap_or_default().to_owned();
///         ctx.text(format!("user {}", id), StatusCode::OK);
///         Ok(())
///     })
/// }
/// # let _ = (Handler::new(timing), Handler::new(show_user));
/// ```
pub struct Context<E> {
    request: Request<RequestBody>,
    response: Response<Full<Bytes>>,
    params: RouteParams,
    chain: Chain<E>,
    values: ValueMap,
    shared: Arc<SharedDataMap>,
    remote_addr: SocketAddr,
}

impl<E> Context<E> {
    pub(crate) fn new(
        request: Request<RequestBody>,
        params: RouteParams,
        handlers: Vec<Handler<E>>,
        shared: Arc<SharedDataMap>,
        remote_addr: SocketAddr,
    ) -> Context<E> {
        Context {
            request,
            response: Response::new(Full::new(Bytes::new())),
            params,
            chain: Chain::new(handlers),
            values: ValueMap::new(),
            shared,
            remote_addr,
        }
    }

    /// Invokes the head of the chain.
    pub(crate) fn run(&mut self) -> HandlerFuture<'_, E> {
        Box::pin(async move {
            match self.chain.current() {
                Some(handler) => handler.call(self).await,
                None => Ok(()),
            }
        })
    }

    /// Passes the control to the next handler in the chain and waits until it and everything
    /// downstream of it finished.
    ///
    /// It's a no-op once the end of the chain is reached. The error of a downstream handler is
    /// returned unchanged.
    pub fn next(&mut self) -> HandlerFuture<'_, E> {
        Box::pin(async move {
            match self.chain.advance() {
                Some(handler) => handler.call(self).await,
                None => Ok(()),
            }
        })
    }

    pub fn request(&self) -> &Request<RequestBody> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<RequestBody> {
        &mut self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Returns the first value of a query string parameter.
    pub fn query(&self, key: &str) -> Option<String> {
        self.uri().query().and_then(|query| helpers::query_value(query, key))
    }

    /// Returns the route parameter value captured under `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// The remote address of the connection which sent the request.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Accesses the app state registered with [`RouterBuilder::data`](./struct.RouterBuilder.html#method.data).
    pub fn data<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.shared.get::<T>()
    }

    /// Stores a value in the per-request key/value bag.
    pub fn set<K: Into<String>, T: Send + Sync + 'static>(&mut self, key: K, val: T) {
        self.values.insert(key.into(), val);
    }

    /// Reads a value of the per-request key/value bag, `None` when it's missing or of another type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key)
    }

    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key)
    }

    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values.remove(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains(key)
    }

    /// Reads the whole request body. The body can only be read once, later calls see an empty body.
    pub async fn body_bytes(&mut self) -> crate::Result<Bytes> {
        let body = std::mem::replace(self.request.body_mut(), empty_body());
        body.collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| Error::Body(e.to_string()))
    }

    pub fn response(&self) -> &Response<Full<Bytes>> {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response<Full<Bytes>> {
        &mut self.response
    }

    pub fn status(&mut self, status: StatusCode) {
        *self.response.status_mut() = status;
    }

    /// Sets a response header, replacing any previous value.
    pub fn header(&mut self, name: &str, value: &str) -> crate::Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader(e.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader(e.to_string()))?;
        self.response.headers_mut().insert(name, value);
        Ok(())
    }

    /// Responds with a plain text body.
    pub fn text<T: Into<String>>(&mut self, body: T, status: StatusCode) {
        self.write(TEXT_PLAIN, Bytes::from(body.into()), status);
    }

    /// Responds with `value` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T, status: StatusCode) -> crate::Result<()> {
        let body = serde_json::to_vec(value)?;
        self.write(APPLICATION_JSON, Bytes::from(body), status);
        Ok(())
    }

    fn write(&mut self, content_type: &'static str, body: Bytes, status: StatusCode) {
        self.response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        *self.response.status_mut() = status;
        *self.response.body_mut() = Full::new(body);
    }

    /// Consumes the context and returns the response written by the chain.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        self.response
    }
}

impl<E> Debug for Context<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", self.method())
            .field("uri", self.uri())
            .field("params", &self.params)
            .field("cursor", &self.chain.cursor)
            .field("chain", &self.chain.handlers)
            .field("values", &self.values)
            .field("remote_addr", &self.remote_addr)
            .finish()
    }
}

pub(crate) fn empty_body() -> RequestBody {
    Empty::<Bytes>::new()
        .map_err(|never| -> RouteError { match never {} })
        .boxed_unsync()
}
