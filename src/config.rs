//! Configuration for the Zammad client.
//!
//! A [`Config`] is built either programmatically with [`Config::new`] and the
//! `with_*` builder methods, or from environment variables with
//! [`Config::from_env`]. Both paths run the same validation.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ZammadError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of records requested per page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Credentials used to authenticate against Zammad.
///
/// `Debug` output never contains the secret values.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Personal access token, sent as `Authorization: Token token=<token>`.
    HttpToken(String),

    /// OAuth2 access token, sent as `Authorization: Bearer <token>`.
    OAuth2Token(String),

    /// HTTP basic authentication.
    Basic {
        /// Login name or email.
        username: String,
        /// Password.
        password: String,
    },
}

impl Credentials {
    /// Picks credentials from the optional values, in order of precedence:
    /// HTTP token, OAuth2 token, then username and password.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::Config` if no token is given and the username or
    /// password is missing.
    pub fn resolve(
        http_token: Option<String>,
        oauth2_token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ZammadError> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(token) = present(http_token) {
            return Ok(Credentials::HttpToken(token));
        }
        if let Some(token) = present(oauth2_token) {
            return Ok(Credentials::OAuth2Token(token));
        }
        let username =
            present(username).ok_or_else(|| ZammadError::invalid_config("missing username"))?;
        let password =
            present(password).ok_or_else(|| ZammadError::invalid_config("missing password"))?;

        Ok(Credentials::Basic { username, password })
    }

    /// Returns the secret strings held by these credentials.
    ///
    /// Used to scrub error messages.
    pub(crate) fn secrets(&self) -> Vec<&str> {
        match self {
            Credentials::HttpToken(token) | Credentials::OAuth2Token(token) => vec![token.as_str()],
            Credentials::Basic { password, .. } => vec![password.as_str()],
        }
    }

    /// Applies these credentials to an outgoing request.
    pub(crate) fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Credentials::HttpToken(token) => {
                req.header(reqwest::header::AUTHORIZATION, format!("Token token={}", token))
            }
            Credentials::OAuth2Token(token) => req.bearer_auth(token),
            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::HttpToken(_) => f.write_str("HttpToken([REDACTED])"),
            Credentials::OAuth2Token(_) => f.write_str("OAuth2Token([REDACTED])"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Configuration for connecting to a Zammad instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the REST API, always ending in `/`
    /// (e.g. `https://zammad.example.com/api/v1/`).
    pub url: String,

    /// How to authenticate.
    pub credentials: Credentials,

    /// Value for the `X-On-Behalf-Of` header (user id, login or email).
    pub on_behalf_of: Option<String>,

    /// Extra headers sent with every request.
    pub additional_headers: Vec<(String, String)>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Default page size for list and search calls.
    pub per_page: u32,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Config {
    /// Creates a configuration with default timeout, page size and user agent.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::Config` if the URL is empty, not an `http(s)`
    /// URL, or carries a query string or fragment.
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Result<Self, ZammadError> {
        let url = Self::validate_url(url.into())?;

        Ok(Config {
            url,
            credentials,
            on_behalf_of: None,
            additional_headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            per_page: DEFAULT_PER_PAGE,
            user_agent: format!("zammad-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ZAMMAD_URL` (required): API base URL
    /// - `ZAMMAD_HTTP_TOKEN`, `ZAMMAD_OAUTH2_TOKEN`: token authentication
    /// - `ZAMMAD_USERNAME`, `ZAMMAD_PASSWORD`: basic authentication
    /// - `ZAMMAD_ON_BEHALF_OF`: default impersonation target
    /// - `ZAMMAD_TIMEOUT_SECS`: request timeout (default 30)
    /// - `ZAMMAD_PER_PAGE`: page size (default 10)
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::Config` if a required variable is missing or a
    /// value fails validation.
    pub fn from_env() -> Result<Self, ZammadError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads a `.env` file if one exists, then calls [`Config::from_env`].
    pub fn from_dotenv() -> Result<Self, ZammadError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        Self::from_env()
    }

    /// Builds a configuration from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ZammadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("ZAMMAD_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ZammadError::missing_env("ZAMMAD_URL"))?;

        let credentials = Credentials::resolve(
            lookup("ZAMMAD_HTTP_TOKEN"),
            lookup("ZAMMAD_OAUTH2_TOKEN"),
            lookup("ZAMMAD_USERNAME"),
            lookup("ZAMMAD_PASSWORD"),
        )?;

        let mut config = Config::new(url, credentials)?;

        if let Some(user) = lookup("ZAMMAD_ON_BEHALF_OF").filter(|v| !v.trim().is_empty()) {
            config.on_behalf_of = Some(user);
        }

        if let Some(raw) = lookup("ZAMMAD_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ZammadError::invalid_config(
                        "ZAMMAD_TIMEOUT_SECS must be a positive number of seconds",
                    )
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("ZAMMAD_PER_PAGE") {
            let per_page = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ZammadError::invalid_config("ZAMMAD_PER_PAGE must be a positive integer")
                })?;
            config.per_page = per_page;
        }

        Ok(config)
    }

    /// Sets the `X-On-Behalf-Of` value.
    pub fn with_on_behalf_of(mut self, user: impl Into<String>) -> Self {
        self.on_behalf_of = Some(user.into());
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers.push((name.into(), value.into()));
        self
    }

    /// Sets the per-request timeout. Zero is ignored.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }

    /// Sets the default page size. Zero is ignored.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        if per_page > 0 {
            self.per_page = per_page;
        }
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the URL and makes sure it ends with exactly one `/`.
    fn validate_url(url: String) -> Result<String, ZammadError> {
        let url = url.trim();

        if url.is_empty() {
            return Err(ZammadError::invalid_config("missing url"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ZammadError::invalid_config(
                "url must start with http:// or https://",
            ));
        }

        let parsed =
            Url::parse(url).map_err(|e| ZammadError::invalid_config(format!("invalid url: {}", e)))?;

        // Paths are joined onto the base, so a query or fragment would be lost.
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ZammadError::invalid_config(
                "url must not contain a query string or fragment",
            ));
        }

        Ok(format!("{}/", url.trim_end_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn basic() -> Credentials {
        Credentials::Basic {
            username: "agent".to_string(),
            password: "secret".to_string(),
        }
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_validate_url_appends_trailing_slash() {
        let config = Config::new("https://zammad.example.com", basic()).unwrap();
        assert_eq!(config.url, "https://zammad.example.com/");

        let config = Config::new("https://zammad.example.com/", basic()).unwrap();
        assert_eq!(config.url, "https://zammad.example.com/");

        let config = Config::new("https://zammad.example.com/api/v1//", basic()).unwrap();
        assert_eq!(config.url, "https://zammad.example.com/api/v1/");
    }

    #[test]
    fn test_validate_url_requires_scheme() {
        assert!(Config::new("zammad.example.com", basic()).is_err());
    }

    #[test]
    fn test_validate_url_rejects_empty() {
        let err = Config::new("   ", basic()).unwrap_err();
        assert!(err.to_string().contains("missing url"));
    }

    #[test]
    fn test_validate_url_rejects_query_and_fragment() {
        let err = Config::new("https://zammad.example.com/api/v1?locale=de", basic()).unwrap_err();
        assert!(err.to_string().contains("query string or fragment"));

        assert!(Config::new("https://zammad.example.com/api/v1#top", basic()).is_err());
        assert!(Config::new("https://zammad.example.com/api/v1?", basic()).is_err());
    }

    #[test]
    fn test_base_path_survives_join() {
        let config = Config::new("https://zammad.example.com/api/v1", basic()).unwrap();
        let joined = Url::parse(&config.url).unwrap().join("users/1").unwrap();
        assert_eq!(joined.as_str(), "https://zammad.example.com/api/v1/users/1");
    }

    #[test]
    fn test_resolve_prefers_http_token() {
        let creds = Credentials::resolve(
            Some("tok".to_string()),
            Some("oauth".to_string()),
            Some("user".to_string()),
            Some("pass".to_string()),
        )
        .unwrap();
        assert_eq!(creds, Credentials::HttpToken("tok".to_string()));
    }

    #[test]
    fn test_resolve_oauth_before_basic() {
        let creds =
            Credentials::resolve(None, Some("oauth".to_string()), Some("user".to_string()), None)
                .unwrap();
        assert_eq!(creds, Credentials::OAuth2Token("oauth".to_string()));
    }

    #[test]
    fn test_resolve_requires_username_and_password() {
        let err = Credentials::resolve(None, None, None, Some("pass".to_string())).unwrap_err();
        assert!(err.to_string().contains("missing username"));

        let err = Credentials::resolve(None, None, Some("user".to_string()), None).unwrap_err();
        assert!(err.to_string().contains("missing password"));
    }

    #[test]
    fn test_resolve_treats_blank_token_as_missing() {
        let creds = Credentials::resolve(
            Some("  ".to_string()),
            None,
            Some("user".to_string()),
            Some("pass".to_string()),
        )
        .unwrap();
        assert!(matches!(creds, Credentials::Basic { .. }));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("https://zammad.example.com", basic()).unwrap();
        let out = format!("{:?}", config);
        assert!(!out.contains("secret"));
        assert!(out.contains("[REDACTED]"));
        assert!(out.contains("agent"));

        let token = format!("{:?}", Credentials::HttpToken("tok-123".to_string()));
        assert!(!token.contains("tok-123"));
    }

    #[test]
    fn test_from_lookup_full() {
        let config = Config::from_lookup(lookup_from(&[
            ("ZAMMAD_URL", "https://zammad.example.com/api/v1"),
            ("ZAMMAD_HTTP_TOKEN", "tok"),
            ("ZAMMAD_ON_BEHALF_OF", "nicole.braun@zammad.org"),
            ("ZAMMAD_TIMEOUT_SECS", "5"),
            ("ZAMMAD_PER_PAGE", "50"),
        ]))
        .unwrap();

        assert_eq!(config.url, "https://zammad.example.com/api/v1/");
        assert_eq!(config.credentials, Credentials::HttpToken("tok".to_string()));
        assert_eq!(config.on_behalf_of.as_deref(), Some("nicole.braun@zammad.org"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.per_page, 50);
    }

    #[test]
    fn test_from_lookup_missing_url() {
        let err = Config::from_lookup(lookup_from(&[("ZAMMAD_HTTP_TOKEN", "tok")])).unwrap_err();
        assert!(err.to_string().contains("ZAMMAD_URL"));
    }

    #[test]
    fn test_from_lookup_rejects_zero_per_page() {
        let err = Config::from_lookup(lookup_from(&[
            ("ZAMMAD_URL", "https://zammad.example.com"),
            ("ZAMMAD_HTTP_TOKEN", "tok"),
            ("ZAMMAD_PER_PAGE", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ZAMMAD_PER_PAGE"));
    }

    #[test]
    fn test_from_lookup_rejects_zero_timeout() {
        let err = Config::from_lookup(lookup_from(&[
            ("ZAMMAD_URL", "https://zammad.example.com"),
            ("ZAMMAD_HTTP_TOKEN", "tok"),
            ("ZAMMAD_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ZAMMAD_TIMEOUT_SECS"));
    }

    #[test]
    fn test_with_timeout_ignores_zero() {
        let config = Config::new("https://zammad.example.com", basic())
            .unwrap()
            .with_timeout(Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new("https://zammad.example.com", basic())
            .unwrap()
            .with_on_behalf_of("USERX")
            .with_header("X-Trace", "1")
            .with_timeout(Duration::from_secs(3))
            .with_per_page(0)
            .with_user_agent("agent/1.0");

        assert_eq!(config.on_behalf_of.as_deref(), Some("USERX"));
        assert_eq!(
            config.additional_headers,
            vec![("X-Trace".to_string(), "1".to_string())]
        );
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.per_page, DEFAULT_PER_PAGE);
        assert_eq!(config.user_agent, "agent/1.0");
    }
}
