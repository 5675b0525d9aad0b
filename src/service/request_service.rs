use crate::helpers;
use crate::router::Router;
use crate::types::RequestBody;
use crate::RouteError;
use arc_swap::ArcSwap;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{service::Service, Request, Response};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response<Full<Bytes>>, RouteError>> + Send + 'static>>;

/// A router snapshot with its error type erased.
///
/// The conversion of the handler error into `RouteError` is resolved once, where the router is
/// wrapped, so serving a connection doesn't depend on the router error type.
trait Dispatch: Send + Sync {
    fn dispatch(&self, target_path: String, req: Request<RequestBody>, remote_addr: SocketAddr) -> ResponseFuture;
}

impl<E> Dispatch for ArcSwap<Router<E>>
where
    E: Into<RouteError> + Send + 'static,
{
    fn dispatch(&self, target_path: String, req: Request<RequestBody>, remote_addr: SocketAddr) -> ResponseFuture {
        let router = self.load_full();
        Box::pin(async move {
            let res: Result<Response<Full<Bytes>>, RouteError> = router
                .process(target_path.as_str(), req, remote_addr)
                .await
                .map_err(Into::into);
            res
        })
    }
}

/// Serves the requests of a single connection.
///
/// Every request loads the current router snapshot, so a router swapped in by
/// [`RouterService::reload`](./struct.RouterService.html#method.reload) is used from the next request on.
pub struct RequestService {
    dispatcher: Arc<dyn Dispatch>,
    remote_addr: SocketAddr,
}

impl<B> Service<Request<B>> for RequestService
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<RouteError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = RouteError;
    type Future = ResponseFuture;

    fn call(&self, req: Request<B>) -> Self::Future {
        Box::pin(serve_request(Arc::clone(&self.dispatcher), req, self.remote_addr))
    }
}

async fn serve_request<B>(
    dispatcher: Arc<dyn Dispatch>,
    req: Request<B>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, RouteError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<RouteError>,
{
    let target_path = helpers::percent_decode_request_path(req.uri().path())?;
    let req = req.map(|body| -> RequestBody { body.map_err(Into::into).boxed_unsync() });

    dispatcher.dispatch(target_path, req, remote_addr).await
}

impl Debug for RequestService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ remote_addr: {:?} }}", self.remote_addr)
    }
}

/// Creates a [`RequestService`](./struct.RequestService.html) per connection, all of them sharing one
/// swappable router snapshot.
pub struct RequestServiceBuilder<E> {
    router: Arc<ArcSwap<Router<E>>>,
    dispatcher: Arc<dyn Dispatch>,
}

impl<E> RequestServiceBuilder<E> {
    pub fn new(router: Router<E>) -> Self
    where
        E: Into<RouteError> + Send + 'static,
    {
        let router = Arc::new(ArcSwap::from_pointee(router));
        let dispatcher: Arc<dyn Dispatch> = router.clone();
        Self { router, dispatcher }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService {
        RequestService {
            dispatcher: Arc::clone(&self.dispatcher),
            remote_addr,
        }
    }

    /// Atomically replaces the router used by every request service built by this builder.
    pub fn reload(&self, router: Router<E>) {
        self.router.store(Arc::new(router));
    }

    pub fn router(&self) -> Arc<Router<E>> {
        self.router.load_full()
    }
}

impl<E> Debug for RequestServiceBuilder<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ router: {:?} }}", self.router.load_full())
    }
}
