//! Turning relative API paths into absolute URLs.

/// `hostname:port`.
pub fn netloc(hostname: &str, port: &str) -> String {
    format!("{hostname}:{port}")
}

/// Resolve `path_or_url` against `http://hostname:port`.
///
/// Anything that already starts with `http` is taken to be absolute and is
/// returned unchanged; the server hands out absolute ids in its manifest.
pub fn resolve(path_or_url: &str, hostname: &str, port: &str) -> String {
    if path_or_url.starts_with("http") {
        return path_or_url.to_owned();
    }

    let netloc = netloc(hostname, port);
    if path_or_url.is_empty() || path_or_url.starts_with('/') {
        format!("http://{netloc}{path_or_url}")
    } else {
        format!("http://{netloc}/{path_or_url}")
    }
}

/// Append `/`-separated segments to `base`. No segments → `base` as is.
pub fn join<S: AsRef<str>>(base: &str, segments: &[S]) -> String {
    let mut url = base.to_owned();
    for segment in segments {
        url.push('/');
        url.push_str(segment.as_ref());
    }
    url
}

/// A resolver bound to one server's host and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    hostname: String,
    port: String,
}

impl UrlResolver {
    pub fn new(hostname: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: port.into(),
        }
    }

    pub fn resolve(&self, path_or_url: &str) -> String {
        resolve(path_or_url, &self.hostname, &self.port)
    }

    pub fn netloc(&self) -> String {
        netloc(&self.hostname, &self.port)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> &str {
        &self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_gets_scheme_and_netloc() {
        assert_eq!(resolve("/api", "h", "9090"), "http://h:9090/api");
    }

    #[test]
    fn absolute_url_untouched() {
        assert_eq!(resolve("http://other/x", "h", "9090"), "http://other/x");
        assert_eq!(
            resolve("https://secure:8151/api", "h", "9090"),
            "https://secure:8151/api"
        );
    }

    #[test]
    fn path_without_leading_slash() {
        assert_eq!(
            resolve("api/collections", "h", "9090"),
            "http://h:9090/api/collections"
        );
    }

    #[test]
    fn empty_path_is_server_root() {
        assert_eq!(resolve("", "h", "9090"), "http://h:9090");
    }

    #[test]
    fn netloc_joins_with_colon() {
        assert_eq!(netloc("some_host", "some_port"), "some_host:some_port");
    }

    #[test]
    fn join_segments() {
        assert_eq!(join("U", &["a", "b"]), "U/a/b");
        assert_eq!(join("U", &["5"]), "U/5");
        assert_eq!(join::<&str>("U", &[]), "U");
    }

    #[test]
    fn bound_resolver() {
        let r = UrlResolver::new("razor", "8150");
        assert_eq!(r.netloc(), "razor:8150");
        assert_eq!(r.resolve("/api"), "http://razor:8150/api");
    }
}
