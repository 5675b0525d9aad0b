#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use routerify_trie::{RouteError, Router, RouterService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot::{self, Sender};

pub struct Serve {
    addr: SocketAddr,
    service: Arc<RouterService<RouteError>>,
    tx: Sender<()>,
}

impl Serve {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn service(&self) -> &RouterService<RouteError> {
        &self.service
    }

    pub fn new_request(&self, method: &str, route: &str) -> http::request::Builder {
        http::request::Request::builder()
            .method(method.to_ascii_uppercase().as_str())
            .uri(format!("http://{}{}", self.addr(), route))
    }

    pub async fn send(&self, req: Request<Full<Bytes>>) -> Response<hyper::body::Incoming> {
        let client: Client<HttpConnector, Full<Bytes>> = Client::builder(TokioExecutor::new()).build_http();
        client.request(req).await.unwrap()
    }

    pub async fn get(&self, route: &str) -> Response<hyper::body::Incoming> {
        let req = self.new_request("GET", route).body(Full::new(Bytes::new())).unwrap();
        self.send(req).await
    }

    pub fn shutdown(self) {
        let _ = self.tx.send(());
    }
}

pub async fn serve(router: Router<RouteError>) -> Serve {
    // Bind a TCP listener to an available port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router_service = Arc::new(RouterService::new(router));
    let (tx, mut rx) = oneshot::channel::<()>();
    let service = router_service.clone();

    tokio::spawn(async move {
        loop {
            let stream = tokio::select! {
                conn = listener.accept() => match conn {
                    Ok((stream, _)) => stream,
                    Err(_) => continue,
                },
                _ = &mut rx => break,
            };
            let router_service = router_service.clone();
            tokio::spawn(async move {
                let request_service = router_service.call(&stream).await.expect("RouterService failed");
                let io = TokioIo::new(stream);
                let builder = Builder::new(TokioExecutor::new());
                let _ = builder.serve_connection(io, request_service).await;
            });
        }
    });

    Serve { addr, service, tx }
}

pub async fn into_text<B>(body: B) -> String
where
    B: hyper::body::Body<Data = Bytes> + Send,
    B::Error: std::fmt::Debug,
{
    String::from_utf8_lossy(&body.collect().await.unwrap().to_bytes()).to_string()
}
