use url::Url;

/// Extracts the host from a URL
///
/// Returns the lowercase host portion. URLs without a host (which should
/// not occur for valid HTTP(S) URLs) yield None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use lantern::url::extract_host;
///
/// let url = Url::parse("https://Blog.Example.com/post").unwrap();
/// assert_eq!(extract_host(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Counts the non-empty path segments of a URL
///
/// Used by the link priority heuristic: deeper paths rank lower.
pub fn path_depth(url: &Url) -> usize {
    url.path().split('/').filter(|s| !s.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_host() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://api.v2.example.com/endpoint").unwrap();
        assert_eq!(extract_host(&url), Some("api.v2.example.com".to_string()));
    }

    #[test]
    fn test_extract_host_ignores_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_path_depth_root() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(path_depth(&url), 0);
    }

    #[test]
    fn test_path_depth_nested() {
        let url = Url::parse("https://a.com/x/y/z").unwrap();
        assert_eq!(path_depth(&url), 3);
    }

    #[test]
    fn test_path_depth_trailing_slash() {
        let url = Url::parse("https://a.com/x/y/").unwrap();
        assert_eq!(path_depth(&url), 2);
    }
}
