use clap::Parser;
use hyper::service::Service;
use hyper::StatusCode;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use routerify_trie::prelude::*;
use routerify_trie::RouteError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A demo server for the trie router.
#[derive(Parser, Debug)]
#[command(name = "routerify-trie", version, about, long_about = None)]
struct Cli {
    /// The address to listen on.
    #[arg(long, env = "ROUTERIFY_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Log filter directives, e.g. `routerify_trie=trace`. Falls back to `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

// Define an app state to share it across the route handlers and middlewares.
struct State {
    name: &'static str,
}

#[derive(Debug, Deserialize, Serialize)]
struct User {
    id: u64,
    name: String,
}

// Logs every request with its latency, wraps the whole chain.
fn logger(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
    Box::pin(async move {
        let start = Instant::now();
        let res = ctx.next().await;
        tracing::info!(
            remote_addr = %ctx.remote_addr(),
            method = %ctx.method(),
            path = ctx.path(),
            status = ctx.response().status().as_u16(),
            elapsed = ?start.elapsed(),
            "Served request"
        );
        res
    })
}

// Rejects write requests without a token.
fn auth(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
    Box::pin(async move {
        match ctx.headers().get("x-token") {
            Some(token) if token == "secret" => ctx.next().await,
            _ => {
                ctx.text("Unauthorized", StatusCode::UNAUTHORIZED);
                Ok(())
            }
        }
    })
}

fn home(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
    Box::pin(async move {
        let name = ctx.data::<State>().map(|s| s.name).unwrap_or("routerify-trie");
        ctx.text(format!("Welcome to {}", name), StatusCode::OK);
        Ok(())
    })
}

fn show_user(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
    Box::pin(async move {
        let id = match ctx.param("id").and_then(|id| id.parse::<u64>().ok()) {
            Some(id) => id,
            None => {
                ctx.text("Invalid user id", StatusCode::BAD_REQUEST);
                return Ok(());
            }
        };
        let user = User {
            id,
            name: format!("user-{}", id),
        };
        ctx.json(&user, StatusCode::OK)?;
        Ok(())
    })
}

fn create_user(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
    Box::pin(async move {
        let body = ctx.body_bytes().await?;
        match serde_json::from_slice::<User>(&body) {
            Ok(user) => ctx.json(&user, StatusCode::CREATED)?,
            Err(err) => ctx.text(err.to_string(), StatusCode::UNPROCESSABLE_ENTITY),
        }
        Ok(())
    })
}

fn serve_file(ctx: &mut Context<RouteError>) -> HandlerFuture<'_, RouteError> {
    Box::pin(async move {
        let path = ctx.param("path").unwrap_or_default().to_owned();
        ctx.text(format!("File: {}", path), StatusCode::OK);
        Ok(())
    })
}

fn router() -> routerify_trie::Result<Router<RouteError>> {
    Router::builder()
        .data(State { name: "routerify-trie" })
        .middleware(Handler::new(logger))
        .get("/", Handler::new(home))
        .get("/users/:id", Handler::new(show_user))
        .post("/users", [Handler::new(auth), Handler::new(create_user)])
        .get("/files/*path", Handler::new(serve_file))
        .method_not_allowed(true)
        .build()
}

#[tokio::main]
async fn main() -> Result<(), RouteError> {
    let cli = Cli::parse();

    let filter = match cli.log.as_deref() {
        Some(directives) => tracing_subscriber::EnvFilter::try_new(directives)?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "routerify_trie=debug,info".into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Create a Service from the router above to handle incoming requests.
    let service = Arc::new(RouterService::new(router()?));

    let listener = TcpListener::bind(cli.addr).await?;
    tracing::info!(addr = %cli.addr, "App is running");

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::error!(%err, "Error accepting connection");
                continue;
            }
        };
        let service = Arc::clone(&service);

        tokio::task::spawn(async move {
            let request_service = match service.call(&stream).await {
                Ok(svc) => svc,
                Err(err) => match err {},
            };
            let io = TokioIo::new(stream);
            let builder = Builder::new(TokioExecutor::new());
            if let Err(err) = builder.serve_connection(io, request_service).await {
                tracing::warn!(err = %err, "Error serving connection");
            }
        });
    }
}
