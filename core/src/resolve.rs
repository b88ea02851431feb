//! Joining a configured base URL with a caller-supplied request path.
//!
//! # Rules
//! - A path that already carries a scheme (`https://host/x`) is returned
//!   verbatim and the base URL is ignored.
//! - Otherwise exactly one leading `/` is stripped from the path and the
//!   remainder is appended to the base URL with a single `/` separator.
//!
//! Only one leading slash is removed: `//auth/login` keeps its second slash
//! and resolves to `{base}//auth/login`. Query strings and fragments are never
//! inspected.

/// Resolve `path` against `base_url`, producing the URL that goes on the wire.
///
/// Trailing slashes on `base_url` are ignored, so `http://h/` and `http://h`
/// behave the same. Never fails; empty inputs produce `"/"`-joined output.
pub fn resolve(base_url: &str, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    format!("{}/{}", trim_base(base_url), strip_leading_slash(path))
}

/// Strip trailing slashes from a base URL.
pub fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Remove at most one leading `/` from a relative path.
pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Returns true when `path` starts with a URL scheme followed by `://`.
///
/// The scheme must be an ASCII letter followed by letters, digits, `+`, `-`
/// or `.`, so `auth/login?next=http://x` is still treated as relative.
pub fn is_absolute(path: &str) -> bool {
    let Some((scheme, _)) = path.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
