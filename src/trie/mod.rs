use crate::constants::{PARAM_KEY, PATH_SEPARATOR, WILDCARD_KEY};
use crate::handler::Handler;
use crate::types::{Match, MatchOutcome, RouteParams};
use crate::Error;
use hyper::Method;
use std::fmt::{self, Debug, Formatter};

pub(crate) use self::node::Node;

mod node;

/// A path segment of a registered pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
    Wildcard(&'a str),
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Segment<'a> {
        if let Some(name) = raw.strip_prefix(PARAM_KEY) {
            Segment::Param(name)
        } else if let Some(name) = raw.strip_prefix(WILDCARD_KEY) {
            Segment::Wildcard(name)
        } else {
            Segment::Literal(raw)
        }
    }

    fn key(&self) -> &'a str {
        match *self {
            Segment::Literal(literal) => literal,
            Segment::Param(_) => PARAM_KEY,
            Segment::Wildcard(_) => WILDCARD_KEY,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

fn is_root(path: &str) -> bool {
    segments(path).next().is_none()
}

/// The segment trie which maps a method and a path to an ordered handler sequence.
///
/// It's populated once while the router is being built and only read afterwards.
pub(crate) struct Trie<E> {
    root: Node<E>,
    global_middlewares: Vec<Handler<E>>,
}

impl<E> Trie<E> {
    pub(crate) fn new() -> Trie<E> {
        Trie {
            root: Node::new(),
            global_middlewares: Vec::new(),
        }
    }

    /// Appends middlewares to every node on the path.
    ///
    /// A root path registers global middlewares. A wildcard segment also attaches the middlewares to
    /// the node right before it, so the wildcard position is covered by the walk of `search`. The root
    /// node is never collected by `search`, so a wildcard right after it (`/*`) registers global
    /// middlewares.
    pub(crate) fn add_middleware(&mut self, path: &str, handlers: Vec<Handler<E>>) {
        if is_root(path) {
            tracing::debug!(count = handlers.len(), "Registered global middlewares");
            self.global_middlewares.extend(handlers);
            return;
        }

        let mut node = &mut self.root;
        for (depth, raw) in segments(path).enumerate() {
            let segment = Segment::parse(raw);
            if let Segment::Wildcard(_) = segment {
                if depth == 0 {
                    self.global_middlewares.extend(handlers.iter().cloned());
                } else {
                    node.middlewares.extend(handlers.iter().cloned());
                }
            }
            node = node.child_or_insert(segment.key());
        }

        tracing::debug!(path, count = handlers.len(), "Registered path middlewares");
        node.middlewares.extend(handlers);
    }

    /// Registers the terminal handler of `method` at `path`, replacing a previous one.
    pub(crate) fn insert(&mut self, method: Method, path: &str, handler: Handler<E>) -> crate::Result<()> {
        let mut node = &mut self.root;
        for raw in segments(path) {
            let segment = Segment::parse(raw);
            node = node.child_or_insert(segment.key());

            match segment {
                Segment::Param(name) if !name.is_empty() => {
                    check_name(path, node.param_name.as_deref(), name)?;
                    node.param_name = Some(name.to_owned());
                }
                Segment::Wildcard(name) if !name.is_empty() => {
                    check_name(path, node.wildcard_name.as_deref(), name)?;
                    node.wildcard_name = Some(name.to_owned());
                }
                _ => {}
            }
        }

        node.is_end_of_word = true;
        if node.handlers.insert(method.clone(), handler).is_some() {
            tracing::debug!(%method, path, "Replaced route handler");
        } else {
            tracing::debug!(%method, path, "Registered route");
        }
        Ok(())
    }

    /// Walks the trie for a concrete request path.
    ///
    /// Literal children win over the `:` child which wins over the `*` child. The walk never
    /// backtracks, so the first child taken at each position decides the result.
    pub(crate) fn search(&self, method: &Method, path: &str) -> Match<E> {
        let mut handlers = self.global_middlewares.clone();
        let mut params = RouteParams::new();
        let segments = segments(path).collect::<Vec<_>>();

        let mut node = &self.root;
        for (idx, segment) in segments.iter().copied().enumerate() {
            if let Some(child) = literal_child(node, segment) {
                node = child;
            } else if let Some(child) = node.children.get(PARAM_KEY) {
                node = child;
                if let Some(name) = child.param_name.as_deref() {
                    params.set(name, segment);
                }
            } else if let Some(child) = node.children.get(WILDCARD_KEY) {
                node = child;
                if let Some(name) = child.wildcard_name.as_deref() {
                    params.set(name, segments[idx..].join("/"));
                }
                break;
            } else {
                tracing::trace!(%method, path, segment, "No route matched the path");
                return Match {
                    handlers,
                    params,
                    outcome: MatchOutcome::NotFound,
                };
            }

            handlers.extend(node.middlewares.iter().cloned());
        }

        let outcome = match node.handlers.get(method) {
            Some(handler) => {
                handlers.push(handler.clone());
                MatchOutcome::Found
            }
            None if !node.handlers.is_empty() => MatchOutcome::MethodNotAllowed {
                allowed: node.allowed_methods(),
            },
            None => MatchOutcome::NotFound,
        };

        tracing::trace!(%method, path, ?outcome, chain = handlers.len(), "Searched route");
        Match {
            handlers,
            params,
            outcome,
        }
    }

    /// Every registered `(method, path pattern)` pair, sorted by path then method.
    pub(crate) fn routes(&self) -> Vec<(Method, String)> {
        let mut routes = Vec::new();
        self.root.collect_routes("", &mut routes);
        routes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        routes
    }
}

fn literal_child<'t, E>(node: &'t Node<E>, segment: &str) -> Option<&'t Node<E>> {
    if segment == PARAM_KEY || segment == WILDCARD_KEY {
        return None;
    }
    node.children.get(segment)
}

fn check_name(path: &str, existing: Option<&str>, new: &str) -> crate::Result<()> {
    match existing {
        Some(existing) if existing != new => Err(Error::ConflictingParam {
            path: path.to_owned(),
            existing: existing.to_owned(),
            new: new.to_owned(),
        }),
        _ => Ok(()),
    }
}

impl<E> Debug for Trie<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("global_middlewares", &self.global_middlewares)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn handler() -> Handler<Infallible> {
        Handler::new(|_| Box::pin(async { Ok(()) }))
    }

    fn assert_chain(actual: &[Handler<Infallible>], expected: &[&Handler<Infallible>]) {
        assert_eq!(actual.len(), expected.len(), "chain length: {:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.ptr_eq(e));
        }
    }

    #[test]
    fn should_end_literal_route_with_terminal_handler() {
        let mut trie = Trie::new();
        let about = handler();
        let contact = handler();
        trie.insert(Method::GET, "/about", about.clone()).unwrap();
        trie.insert(Method::POST, "/about/contact", contact.clone()).unwrap();

        let m = trie.search(&Method::GET, "/about");
        assert!(m.is_found());
        assert!(m.terminal().unwrap().ptr_eq(&about));

        let m = trie.search(&Method::POST, "/about/contact/");
        assert!(m.terminal().unwrap().ptr_eq(&contact));
    }

    #[test]
    fn should_extract_params_positionally() {
        let mut trie = Trie::new();
        trie.insert(Method::GET, "/users/:userName/books/:bookName", handler())
            .unwrap();

        let m = trie.search(&Method::GET, "/users/alice/books/HarryPotter");
        assert!(m.is_found());
        assert_eq!(m.params().get("userName").unwrap(), "alice");
        assert_eq!(m.params().get("bookName").unwrap(), "HarryPotter");
    }

    #[test]
    fn should_prefer_literal_over_param_over_wildcard() {
        let mut trie = Trie::new();
        let settings = handler();
        let show = handler();
        let files = handler();
        trie.insert(Method::GET, "/user/:id", show.clone()).unwrap();
        trie.insert(Method::GET, "/user/settings", settings.clone()).unwrap();
        trie.insert(Method::GET, "/user/*", files.clone()).unwrap();

        let m = trie.search(&Method::GET, "/user/settings");
        assert!(m.terminal().unwrap().ptr_eq(&settings));
        assert!(m.params().is_empty());

        let m = trie.search(&Method::GET, "/user/42");
        assert!(m.terminal().unwrap().ptr_eq(&show));
        assert_eq!(m.params().get("id").unwrap(), "42");

        // The `:` child is chosen for `42` and the walk never falls back to `*`.
        let m = trie.search(&Method::GET, "/user/42/avatar");
        assert_eq!(m.outcome(), &MatchOutcome::NotFound);
    }

    #[test]
    fn should_run_global_middlewares_first() {
        let mut trie = Trie::new();
        let m1 = handler();
        let m2 = handler();
        let scoped = handler();
        let h = handler();
        trie.add_middleware("/", vec![m1.clone()]);
        trie.add_middleware("/api", vec![scoped.clone()]);
        trie.add_middleware("/", vec![m2.clone()]);
        trie.insert(Method::GET, "/api", h.clone()).unwrap();

        let m = trie.search(&Method::GET, "/api");
        assert_chain(m.handlers(), &[&m1, &m2, &scoped, &h]);

        let m = trie.search(&Method::GET, "/anything/else");
        assert_chain(m.handlers(), &[&m1, &m2]);
        assert!(!m.is_found());
    }

    #[test]
    fn should_match_wildcard_remainder() {
        let mut trie = Trie::new();
        let mw = handler();
        let h = handler();
        trie.add_middleware("/files/*", vec![mw.clone()]);
        trie.insert(Method::GET, "/files/*", h.clone()).unwrap();

        for path in &["/files/a", "/files/a/b/c"] {
            let m = trie.search(&Method::GET, path);
            assert_chain(m.handlers(), &[&mw, &h]);
        }

        assert!(!trie.search(&Method::GET, "/files").is_found());
    }

    #[test]
    fn should_expose_named_wildcard() {
        let mut trie = Trie::new();
        trie.insert(Method::GET, "/static/*rest", handler()).unwrap();

        let m = trie.search(&Method::GET, "/static/css/site.css");
        assert!(m.is_found());
        assert_eq!(m.params().get("rest").unwrap(), "css/site.css");
    }

    #[test]
    fn should_replace_handler_on_reregistration() {
        let mut trie = Trie::new();
        let old = handler();
        let new = handler();
        trie.insert(Method::GET, "/ping", old).unwrap();
        trie.insert(Method::GET, "/ping", new.clone()).unwrap();

        let m = trie.search(&Method::GET, "/ping");
        assert_chain(m.handlers(), &[&new]);
        assert_eq!(trie.routes(), vec![(Method::GET, "/ping".to_owned())]);
    }

    #[test]
    fn should_collect_user_scenario_chain() {
        let mut trie = Trie::new();
        let m1 = handler();
        let m2 = handler();
        let h1 = handler();
        trie.add_middleware("/", vec![m1.clone()]);
        trie.add_middleware("/user/*", vec![m2.clone()]);
        trie.insert(Method::GET, "/user/:id", h1.clone()).unwrap();

        let m = trie.search(&Method::GET, "/user/42");
        assert!(m.is_found());
        assert_chain(m.handlers(), &[&m1, &m2, &h1]);
        assert_eq!(m.params().len(), 1);
        assert_eq!(m.params().get("id").unwrap(), "42");
    }

    #[test]
    fn should_return_global_middlewares_on_empty_trie() {
        let mut trie = Trie::new();
        let m1 = handler();
        trie.add_middleware("/", vec![m1.clone()]);

        let m = trie.search(&Method::GET, "/nonexistent");
        assert_chain(m.handlers(), &[&m1]);
        assert_eq!(m.outcome(), &MatchOutcome::NotFound);
        assert!(m.terminal().is_none());
    }

    #[test]
    fn should_not_match_wrong_method() {
        let mut trie = Trie::new();
        let mreg = handler();
        trie.add_middleware("/register", vec![mreg.clone()]);
        trie.insert(Method::POST, "/register", handler()).unwrap();

        let m = trie.search(&Method::GET, "/register");
        assert_chain(m.handlers(), &[&mreg]);
        assert!(m.terminal().is_none());
        assert_eq!(
            m.outcome(),
            &MatchOutcome::MethodNotAllowed {
                allowed: vec![Method::POST]
            }
        );
    }

    #[test]
    fn should_run_root_wildcard_middlewares_for_every_route() {
        let mut trie = Trie::new();
        let mw = handler();
        let page = handler();
        let fallback = handler();
        trie.add_middleware("/*", vec![mw.clone()]);
        trie.insert(Method::GET, "/a", page.clone()).unwrap();
        trie.insert(Method::GET, "/*", fallback.clone()).unwrap();

        let m = trie.search(&Method::GET, "/a");
        assert_chain(m.handlers(), &[&mw, &page]);

        let m = trie.search(&Method::GET, "/zzz/y");
        assert_chain(m.handlers(), &[&mw, &fallback]);

        let m = trie.search(&Method::POST, "/a");
        assert_chain(m.handlers(), &[&mw]);
    }

    #[test]
    fn should_reject_conflicting_wildcard_names() {
        let mut trie = Trie::new();
        trie.insert(Method::GET, "/s/*a", handler()).unwrap();
        trie.insert(Method::POST, "/s/*a", handler()).unwrap();

        let err = trie.insert(Method::GET, "/s/*b", handler()).unwrap_err();
        match err {
            Error::ConflictingParam { existing, new, .. } => {
                assert_eq!(existing, "a");
                assert_eq!(new, "b");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn should_reject_conflicting_param_names() {
        let mut trie = Trie::new();
        trie.insert(Method::GET, "/a/:x", handler()).unwrap();
        trie.insert(Method::POST, "/a/:x", handler()).unwrap();

        let err = trie.insert(Method::GET, "/a/:y/b", handler()).unwrap_err();
        match err {
            Error::ConflictingParam { existing, new, .. } => {
                assert_eq!(existing, "x");
                assert_eq!(new, "y");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn should_serve_root_route() {
        let mut trie = Trie::new();
        let home = handler();
        trie.insert(Method::GET, "/", home.clone()).unwrap();

        let m = trie.search(&Method::GET, "/");
        assert!(m.terminal().unwrap().ptr_eq(&home));
        assert_eq!(trie.routes(), vec![(Method::GET, "/".to_owned())]);
    }

    #[test]
    fn should_list_route_patterns() {
        let mut trie = Trie::new();
        trie.insert(Method::GET, "/users/:id", handler()).unwrap();
        trie.insert(Method::DELETE, "/users/:id", handler()).unwrap();
        trie.insert(Method::GET, "/assets/*path", handler()).unwrap();

        assert_eq!(
            trie.routes(),
            vec![
                (Method::GET, "/assets/*path".to_owned()),
                (Method::DELETE, "/users/:id".to_owned()),
                (Method::GET, "/users/:id".to_owned()),
            ]
        );
    }
}
