use percent_encoding::percent_decode_str;

pub(crate) fn percent_decode_request_path(val: &str) -> crate::Result<String> {
    percent_decode_str(val)
        .decode_utf8()
        .map_err(|e| crate::Error::PathDecode(e.to_string()))
        .map(|val| val.to_string())
}

/// Finds the first value of `key` in an `application/x-www-form-urlencoded` query string.
pub(crate) fn query_value(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_query_component(k), decode_query_component(v)),
            None => (decode_query_component(pair), String::new()),
        })
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

fn decode_query_component(val: &str) -> String {
    let val = val.replace('+', " ");
    percent_decode_str(&val).decode_utf8_lossy().into_owned()
}
