use oxigraph::model::TermRef;

/// Last segment of a repository path, ignoring one trailing slash.
pub fn path_name(path: &str) -> &str {
    let p = path.strip_suffix('/').unwrap_or(path);
    p.rsplit('/').next().unwrap_or(p)
}

/// The path one level up, or the empty (root) path.
pub fn parent_path(path: &str) -> &str {
    let p = path.strip_suffix('/').unwrap_or(path);
    match p.rfind('/') {
        Some(idx) => &p[..idx],
        None => "",
    }
}

/// ETags arrive quoted (`"abc"`); the client keeps the bare token.
pub fn unquote_etag(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// The lexical value of a term: literal value, IRI, or blank node label.
pub fn term_value(term: TermRef<'_>) -> String {
    match term {
        TermRef::Literal(lit) => lit.value().to_string(),
        TermRef::NamedNode(node) => node.as_str().to_string(),
        other => other.to_string(),
    }
}

/// Strips `base` from `uri`, returning the remaining repository path.
pub fn strip_base<'a>(uri: &'a str, base: &str) -> Option<&'a str> {
    uri.strip_prefix(base)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
