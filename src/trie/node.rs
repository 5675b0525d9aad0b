use crate::constants::{PARAM_KEY, PATH_SEPARATOR, WILDCARD_KEY};
use crate::handler::Handler;
use hyper::Method;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// One vertex of the routing trie.
///
/// A node is reached through a literal segment, through the shared `:` key of every parameter
/// segment, or through the shared `*` key of a wildcard segment.
pub(crate) struct Node<E> {
    pub(crate) children: HashMap<String, Node<E>>,
    pub(crate) handlers: HashMap<Method, Handler<E>>,
    // Applied to every request whose walk passes through this node, in registration order.
    pub(crate) middlewares: Vec<Handler<E>>,
    pub(crate) is_end_of_word: bool,
    pub(crate) param_name: Option<String>,
    pub(crate) wildcard_name: Option<String>,
}

impl<E> Node<E> {
    pub(crate) fn new() -> Node<E> {
        Node {
            children: HashMap::new(),
            handlers: HashMap::new(),
            middlewares: Vec::new(),
            is_end_of_word: false,
            param_name: None,
            wildcard_name: None,
        }
    }

    pub(crate) fn child_or_insert(&mut self, key: &str) -> &mut Node<E> {
        self.children.entry(key.to_owned()).or_insert_with(Node::new)
    }

    /// Methods which have a terminal handler on this node, in a stable order.
    pub(crate) fn allowed_methods(&self) -> Vec<Method> {
        let mut methods = self.handlers.keys().cloned().collect::<Vec<_>>();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Collects the registered `(method, path pattern)` pairs below this node.
    pub(crate) fn collect_routes(&self, prefix: &str, out: &mut Vec<(Method, String)>) {
        if self.is_end_of_word {
            let path = if prefix.is_empty() { PATH_SEPARATOR.to_string() } else { prefix.to_owned() };
            for method in self.allowed_methods() {
                out.push((method, path.clone()));
            }
        }

        for (key, child) in &self.children {
            let label = match key.as_str() {
                PARAM_KEY => format!(":{}", child.param_name.as_deref().unwrap_or_default()),
                WILDCARD_KEY => format!("*{}", child.wildcard_name.as_deref().unwrap_or_default()),
                literal => literal.to_owned(),
            };
            child.collect_routes(&format!("{}{}{}", prefix, PATH_SEPARATOR, label), out);
        }
    }
}

impl<E> Debug for Node<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("children", &self.children)
            .field("methods", &self.allowed_methods())
            .field("middlewares", &self.middlewares.len())
            .field("is_end_of_word", &self.is_end_of_word)
            .field("param_name", &self.param_name)
            .field("wildcard_name", &self.wildcard_name)
            .finish()
    }
}
