//! The items needed by almost every router: `use routerify_trie::prelude::*;`

pub use crate::context::Context;
pub use crate::handler::{Handler, HandlerFuture};
pub use crate::middleware::Middleware;
pub use crate::router::Router;
pub use crate::service::RouterService;
