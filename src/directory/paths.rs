use once_cell::sync::Lazy;
use regex::Regex;

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new("/{2,}").unwrap());

/// brings a server-relative folder path into the one form the cache stores:
/// a single leading `/`, no repeated `/`, and no trailing `/` unless the path is the root.
///
/// An empty path is the root. Case is preserved
pub fn normalize(path: &str) -> String {
    let collapsed = REPEATED_SLASHES.replace_all(path, "/");
    let trimmed = collapsed.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// the string every proper descendant of the (normalized) `path` starts with
pub fn descendant_prefix(path: &str) -> String {
    if path == "/" {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

#[cfg(test)]
mod tests {
    use super::{descendant_prefix, normalize};

    #[test]
    fn normalize_adds_leading_slash() {
        assert_eq!("/Photos/2024", normalize("Photos/2024"));
    }

    #[test]
    fn normalize_removes_trailing_slash() {
        assert_eq!("/Photos", normalize("/Photos/"));
        assert_eq!("/Photos", normalize("/Photos///"));
    }

    #[test]
    fn normalize_collapses_repeated_slashes() {
        assert_eq!("/a/b/c", normalize("//a///b//c"));
    }

    #[test]
    fn normalize_root() {
        assert_eq!("/", normalize(""));
        assert_eq!("/", normalize("/"));
        assert_eq!("/", normalize("////"));
    }

    #[test]
    fn normalize_keeps_case_and_spaces() {
        assert_eq!("/My Documents/CV ", normalize("/My Documents/CV "));
    }

    #[test]
    fn descendant_prefix_of_root_is_root() {
        assert_eq!("/", descendant_prefix("/"));
        assert_eq!("/a/", descendant_prefix("/a"));
    }
}
