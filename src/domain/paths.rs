//! Textual path utilities.
//!
//! These functions operate on strings only and never touch the filesystem.
//! Internally every path uses `/` as its separator.

const SEPARATOR: char = '/';
const PARENT_SEGMENT: &str = "/../";

/// Replace every backslash separator with `/`.
pub fn fix_separator(path: &str) -> String {
    path.replace('\\', "/")
}

/// Build an absolute path by prefixing `scheme` and, when needed, `base`.
///
/// A `path` that already starts with `base` is returned as `scheme + path`.
/// Otherwise the result is `scheme + base + path`, with separators fixed and
/// leading slashes trimmed from `path`.
pub fn absolute_path(base: &str, path: &str, scheme: &str) -> String {
    if path.starts_with(base) {
        return format!("{scheme}{path}");
    }
    let fixed = fix_separator(path);
    format!("{scheme}{base}{}", fixed.trim_start_matches(SEPARATOR))
}

/// Derive `path` relative to `base`.
///
/// Returns an empty string when `base` is `path` plus a trailing slash, and
/// `path` (with separators fixed) when it does not live under `base`.
pub fn relative_path(base: &str, path: &str) -> String {
    let fixed = fix_separator(path);
    if let Some(rest) = fixed.strip_prefix(base) {
        return rest.to_owned();
    }
    if base.strip_suffix(SEPARATOR) == Some(fixed.as_str()) {
        return String::new();
    }
    fixed
}

/// Eliminate `.` and `..` segments textually.
///
/// Paths without a `/../` segment are returned unchanged. A `..` with nothing
/// left to pop is dropped; the root of an absolute path is never popped.
/// Symlinks are not consulted.
pub fn real_path_safety(path: &str) -> String {
    if !path.contains(PARENT_SEGMENT) {
        return path.to_owned();
    }

    let absolute = path.starts_with(SEPARATOR);
    let mut kept: Vec<&str> = Vec::new();
    for (index, segment) in path.split(SEPARATOR).enumerate() {
        match segment {
            // Leading empty segment is the root marker.
            "" if index == 0 => {}
            "." => {}
            ".." => {
                kept.pop();
            }
            other => kept.push(other),
        }
    }

    let joined = kept.join("/");
    if absolute { format!("/{joined}") } else { joined }
}
