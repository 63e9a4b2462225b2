use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Cookie the backend issues the CSRF token under.
const CSRF_COOKIE: &str = "csrftoken";

/// Client-side cookie store, read from a simple `name=value` lines file.
///
/// The backend sets the CSRF token as a cookie during the browser login
/// flow; this store reads the exported cookie file so state-changing
/// requests can echo the token back in a header. A missing file or a
/// missing cookie is not an error - state-changing requests then carry an
/// empty token value and the backend rejects them itself.
pub struct CookieStore {
    path: PathBuf,
    cookies: HashMap<String, String>,
}

impl CookieStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cookies: HashMap::new(),
        }
    }

    /// Load cookies from disk. Returns false if the file does not exist.
    pub fn load(&mut self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cookie file {}", self.path.display()))?;
        self.cookies = Self::parse(&contents);
        Ok(true)
    }

    /// Parse `name=value` lines; blank lines and `#` comments are skipped.
    fn parse(contents: &str) -> HashMap<String, String> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                line.split_once('=')
                    .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// The current CSRF token, or an empty string when the cookie is
    /// absent. Callers inject this into each state-changing request.
    pub fn csrf_token(&self) -> String {
        self.get(CSRF_COOKIE).unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(contents: &str) -> CookieStore {
        let mut store = CookieStore::new(PathBuf::from("/nonexistent/cookies.txt"));
        store.cookies = CookieStore::parse(contents);
        store
    }

    #[test]
    fn test_parse_cookie_lines() {
        let store = store_with("# exported cookies\ncsrftoken=abc123\nsessionid=xyz\n\n");
        assert_eq!(store.get("csrftoken"), Some("abc123"));
        assert_eq!(store.get("sessionid"), Some("xyz"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_csrf_token_present() {
        let store = store_with("csrftoken=tok-1");
        assert_eq!(store.csrf_token(), "tok-1");
    }

    #[test]
    fn test_missing_cookie_yields_empty_token() {
        let store = store_with("sessionid=xyz");
        assert_eq!(store.csrf_token(), "");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let mut store = CookieStore::new(PathBuf::from("/nonexistent/cookies.txt"));
        assert!(!store.load().expect("Missing file should load as empty"));
        assert_eq!(store.csrf_token(), "");
    }

    #[test]
    fn test_values_may_contain_equals() {
        let store = store_with("csrftoken=a=b");
        assert_eq!(store.csrf_token(), "a=b");
    }
}
