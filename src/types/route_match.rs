use crate::handler::Handler;
use crate::types::RouteParams;
use hyper::Method;

/// How a request path and method resolved against the routing trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A terminal handler is registered for the method at the matched node.
    Found,

    /// The path resolved to a node, but no handler is registered for the requested method.
    MethodNotAllowed { allowed: Vec<Method> },

    /// The walk hit a dead end, or the resolved node is not a route at all.
    NotFound,
}

/// The result of a trie search.
///
/// It always carries the middlewares collected along the walked prefix. Only a [`Found`](./enum.MatchOutcome.html#variant.Found)
/// match ends with a terminal handler; any other outcome must be answered with a not-found style response
/// without invoking the collected handlers.
#[derive(Debug)]
pub struct Match<E> {
    pub(crate) handlers: Vec<Handler<E>>,
    pub(crate) params: RouteParams,
    pub(crate) outcome: MatchOutcome,
}

impl<E> Match<E> {
    /// The ordered handler sequence: global middlewares, node middlewares and, if found, the terminal handler.
    pub fn handlers(&self) -> &[Handler<E>] {
        &self.handlers
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn outcome(&self) -> &MatchOutcome {
        &self.outcome
    }

    pub fn is_found(&self) -> bool {
        self.outcome == MatchOutcome::Found
    }

    /// The terminal route handler, present only when the match is found.
    pub fn terminal(&self) -> Option<&Handler<E>> {
        if self.is_found() {
            self.handlers.last()
        } else {
            None
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<Handler<E>>, RouteParams, MatchOutcome) {
        (self.handlers, self.params, self.outcome)
    }
}
