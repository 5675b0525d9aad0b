/// Child key shared by every `:name` segment at one trie position.
pub(crate) const PARAM_KEY: &str = ":";

/// Child key shared by every `*` / `*name` segment at one trie position.
pub(crate) const WILDCARD_KEY: &str = "*";

pub(crate) const PATH_SEPARATOR: char = '/';

pub(crate) const ROOT_PATH: &str = "/";
