/// Base endpoint of the Flavortown REST API.
pub const DEFAULT_BASE_URL: &str = "https://flavortown.hackclub.com/api/v1";

#[derive(Debug, Clone)]
pub struct FlavortownURL(String);

impl AsRef<str> for FlavortownURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FlavortownURL {
    /// Creates a URL pointing at the production API.
    pub fn new() -> Self {
        Self(DEFAULT_BASE_URL.to_string())
    }

    /// Creates a URL with a custom base, e.g. a local mock server.
    pub fn custom(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}

impl Default for FlavortownURL {
    fn default() -> Self {
        Self::new()
    }
}
