use crate::router::Router;
use crate::RouteError;
use crate::service::request_service::{RequestService, RequestServiceBuilder};
use hyper::service::Service;
use std::convert::Infallible;
use std::future::{ready, Ready};
use std::sync::Arc;
use tokio::net::TcpStream;

/// A [`Service`](https://docs.rs/hyper/1/hyper/service/trait.Service.html) to process incoming connections.
///
/// It's called once per accepted connection and returns the [`RequestService`](./struct.RequestService.html)
/// which serves the requests of that connection.
///
/// This `RouterService<E>` type accepts a single type parameter: `E`.
///
/// * The `E` represents any error type which will be used by route handlers and the middlewares.
///
/// # Examples
///
/// ```no_run
/// use hyper::service::Service;
/// use hyper::StatusCode;
/// use hyper_util::rt::{TokioExecutor, TokioIo};
/// use hyper_util::server::conn::auto::Builder;
/// use routerify_trie::{Context, Handler, HandlerFuture, RouteError, Router, RouterService};
/// use std::net::SocketAddr;
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// fn home(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
///     Box::pin(async move {
///         ctx.text("Home page", StatusCode::OK);
///         Ok(())
///     })
/// }
///
/// fn router() -> Router<RouteError> {
///     Router::builder().get("/", Handler::new(home)).build().unwrap()
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     // Create a Service from the router above to handle incoming requests.
///     let service = Arc::new(RouterService::new(router()));
///
///     let addr: SocketAddr = SocketAddr::from(([127, 0, 0, 1], 3001));
///     let listener = TcpListener::bind(addr).await?;
///
///     loop {
///         let (stream, _) = listener.accept().await?;
///         let router_service = service.clone();
///
///         tokio::spawn(async move {
///             // Get the request service for this connection
///             let request_service = router_service.call(&stream).await.unwrap();
///
///             let io = TokioIo::new(stream);
///             let builder = Builder::new(TokioExecutor::new());
///             if let Err(err) = builder.serve_connection(io, request_service).await {
///                 eprintln!("Error serving connection: {:?}", err);
///             }
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RouterService<E> {
    builder: RequestServiceBuilder<E>,
}

impl<E> RouterService<E> {
    /// Creates a new service with the provided router and it's ready to be used with the hyper
    /// [`serve_connection`](https://docs.rs/hyper-util/0.1/hyper_util/server/conn/auto/struct.Builder.html#method.serve_connection)
    /// method.
    pub fn new(router: Router<E>) -> RouterService<E>
    where
        E: Into<RouteError> + Send + 'static,
    {
        RouterService {
            builder: RequestServiceBuilder::new(router),
        }
    }

    /// Swaps in a new router. Requests already being processed finish with the router they started with.
    pub fn reload(&self, router: Router<E>) {
        tracing::info!(routes = router.routes().len(), "Reloading router");
        self.builder.reload(router);
    }

    /// Returns the router currently used to serve new requests.
    pub fn router(&self) -> Arc<Router<E>> {
        self.builder.router()
    }
}

impl<E> Service<&TcpStream> for RouterService<E> {
    type Response = RequestService;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, conn: &TcpStream) -> Self::Future {
        let addr = match conn.peer_addr() {
            Ok(addr) => addr,
            Err(_) => std::net::SocketAddr::from(([0, 0, 0, 0], 0)),
        };
        let req_service = self.builder.build(addr);

        ready(Ok(req_service))
    }
}
