//! HTTP client for the Zammad REST API.
//!
//! This module provides [`ZammadClient`], which owns the connection pool,
//! applies authentication and impersonation headers, and turns responses into
//! JSON values or errors. Resource accessors hand out lightweight wrappers that
//! share the same client.
//!
//! No request is retried: transport failures, error statuses and malformed
//! bodies all propagate to the caller.
//!
//! # Security
//!
//! Credentials are never logged. Error bodies are scrubbed before they are
//! stored in an error.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::{Config, Credentials};
use crate::error::ZammadError;
use crate::knowledge_base::{KnowledgeBaseAnswers, KnowledgeBaseCategories, KnowledgeBases};
use crate::pagination::Record;
use crate::resource::{
    Groups, Links, ObjectAttributes, OnlineNotifications, Organizations, Resource, Roles,
    TagList, TicketArticleAttachments, TicketArticlePlain, TicketArticles, TicketPriorities,
    TicketStates, Tickets, Users,
};

/// Header carrying the user to impersonate.
pub const ON_BEHALF_OF_HEADER: &str = "X-On-Behalf-Of";

/// Maximum length kept from a response body when it is stored in an error.
const MAX_ERROR_BODY_LEN: usize = 2000;

/// Request payload variants.
pub(crate) enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Client for a single Zammad instance.
///
/// Cloning is cheap: clones share the underlying connection pool.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = ZammadClient::new(&config)?;
///
/// let me = client.user().me().await?;
/// let tickets = client.ticket().all().await?;
/// for ticket in &tickets {
///     println!("{}", ticket["title"]);
/// }
/// ```
#[derive(Clone)]
pub struct ZammadClient {
    /// The underlying HTTP client.
    http: Client,

    /// API base URL, always ending in `/`.
    base_url: Url,

    /// SECURITY: never log these.
    credentials: Credentials,

    /// Current `X-On-Behalf-Of` value.
    on_behalf_of: Option<String>,

    /// Default page size handed to resources.
    per_page: u32,

    /// Configured request timeout, kept for error reporting.
    timeout: Duration,
}

impl ZammadClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::Config` if the URL or an additional header is
    /// invalid, and `ZammadError::HttpClient` if the HTTP client fails to
    /// initialize.
    pub fn new(config: &Config) -> Result<Self, ZammadError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.additional_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ZammadError::invalid_config(format!("invalid header name: {:?}", name))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ZammadError::invalid_config(format!("invalid value for header {:?}", name))
            })?;
            headers.insert(header_name, header_value);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(ZammadError::HttpClient)?;

        let base_url = Url::parse(&config.url)
            .map_err(|e| ZammadError::invalid_config(format!("invalid url: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials.clone(),
            on_behalf_of: config.on_behalf_of.clone(),
            per_page: config.per_page,
            timeout: config.timeout,
        })
    }

    /// Returns the API base URL (always ending in `/`).
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns the default page size for list and search calls.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns the current `X-On-Behalf-Of` value.
    pub fn on_behalf_of(&self) -> Option<&str> {
        self.on_behalf_of.as_deref()
    }

    /// Sets or clears the `X-On-Behalf-Of` value for subsequent requests.
    pub fn set_on_behalf_of(&mut self, user: Option<String>) {
        self.on_behalf_of = user;
    }

    /// Returns a copy of this client that acts on behalf of `user`.
    ///
    /// The value can be a user id, login or email. `self` is left untouched,
    /// so the override ends when the returned client is dropped.
    #[must_use]
    pub fn acting_on_behalf_of(&self, user: impl Into<String>) -> ZammadClient {
        let mut scoped = self.clone();
        scoped.on_behalf_of = Some(user.into());
        scoped
    }

    /// Tests connectivity by fetching the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::ConnectionTest` describing why the call failed.
    pub async fn test_connection(&self) -> Result<(), ZammadError> {
        tracing::debug!("Testing connection to Zammad");

        match self.user().me().await {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(e) if e.is_unauthorized() => Err(ZammadError::connection_test(
                "authentication failed - verify the configured credentials",
            )),
            Err(ZammadError::Timeout { duration, .. }) => {
                Err(ZammadError::connection_test(format!(
                    "connection timed out after {:?} - verify the url and that the server is reachable",
                    duration
                )))
            }
            Err(e) => Err(ZammadError::connection_test(self.scrub(&e.to_string()))),
        }
    }

    // ========================================================================
    // Resource accessors
    // ========================================================================

    /// Groups (`groups`).
    pub fn group(&self) -> Resource<Groups> {
        Resource::new(self.clone())
    }

    /// Organizations (`organizations`).
    pub fn organization(&self) -> Resource<Organizations> {
        Resource::new(self.clone())
    }

    /// Roles (`roles`).
    pub fn role(&self) -> Resource<Roles> {
        Resource::new(self.clone())
    }

    /// Tickets (`tickets`).
    pub fn ticket(&self) -> Resource<Tickets> {
        Resource::new(self.clone())
    }

    /// Ticket links (`links`).
    pub fn link(&self) -> Resource<Links> {
        Resource::new(self.clone())
    }

    /// Ticket articles (`ticket_articles`).
    pub fn ticket_article(&self) -> Resource<TicketArticles> {
        Resource::new(self.clone())
    }

    /// Ticket article attachments (`ticket_attachment`).
    pub fn ticket_article_attachment(&self) -> Resource<TicketArticleAttachments> {
        Resource::new(self.clone())
    }

    /// Plain-text ticket articles (`ticket_article_plain`).
    pub fn ticket_article_plain(&self) -> Resource<TicketArticlePlain> {
        Resource::new(self.clone())
    }

    /// Ticket priorities (`ticket_priorities`).
    pub fn ticket_priority(&self) -> Resource<TicketPriorities> {
        Resource::new(self.clone())
    }

    /// Ticket states (`ticket_states`).
    pub fn ticket_state(&self) -> Resource<TicketStates> {
        Resource::new(self.clone())
    }

    /// Users (`users`).
    pub fn user(&self) -> Resource<Users> {
        Resource::new(self.clone())
    }

    /// Object manager attributes (`object_manager_attributes`).
    pub fn object(&self) -> Resource<ObjectAttributes> {
        Resource::new(self.clone())
    }

    /// Online notifications (`online_notifications`).
    pub fn online_notification(&self) -> Resource<OnlineNotifications> {
        Resource::new(self.clone())
    }

    /// Tag list (`tag_list`).
    pub fn tag_list(&self) -> Resource<TagList> {
        Resource::new(self.clone())
    }

    /// Knowledge bases.
    pub fn knowledge_bases(&self) -> KnowledgeBases {
        KnowledgeBases::new(self.clone())
    }

    /// Knowledge base answers.
    pub fn knowledge_base_answers(&self) -> KnowledgeBaseAnswers {
        KnowledgeBaseAnswers::new(self.clone())
    }

    /// Knowledge base categories.
    pub fn knowledge_base_categories(&self) -> KnowledgeBaseCategories {
        KnowledgeBaseCategories::new(self.clone())
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Resolves an API path relative to the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ZammadError> {
        self.base_url
            .join(path)
            .map_err(|e| ZammadError::validation(format!("invalid path {:?}: {}", path, e)))
    }

    /// Sends a request and checks the response status.
    ///
    /// This is the single place where requests leave the process.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> Result<Response, ZammadError> {
        let url = self.endpoint(path)?;

        tracing::debug!(
            method = %method,
            path = %path,
            "Making Zammad API request"
        );

        let mut req = self.credentials.apply(self.http.request(method.clone(), url));

        if let Some(ref user) = self.on_behalf_of {
            req = req.header(ON_BEHALF_OF_HEADER, user.as_str());
        }

        if !query.is_empty() {
            req = req.query(query);
        }

        req = match body {
            Body::Empty => req,
            Body::Json(value) => req.json(&value),
            Body::Multipart(form) => req.multipart(form),
        };

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return ZammadError::timeout(self.timeout, format!("{} {}", method, path));
            }
            ZammadError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, response).await);
        }

        Ok(response)
    }

    /// Converts a non-success response into `ZammadError::HttpStatus`.
    async fn status_error(&self, status: StatusCode, response: Response) -> ZammadError {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read error response body");
                String::new()
            }
        };
        tracing::warn!(status = %status, "Zammad API returned an error status");
        ZammadError::HttpStatus {
            status,
            body: self.scrub(&body),
        }
    }

    /// Sends a request and decodes the body as JSON.
    ///
    /// An empty body decodes to `Value::Null`.
    pub(crate) async fn request_json(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Body,
    ) -> Result<Value, ZammadError> {
        let response = self.send(method, path, query, body).await?;
        let bytes = response.bytes().await.map_err(ZammadError::Transport)?;

        tracing::trace!(body = %String::from_utf8_lossy(&bytes), "Zammad API response");

        if is_blank(&bytes) {
            return Ok(Value::Null);
        }
        self.decode(&bytes)
    }

    /// Decodes a response body, keeping decode failures apart from HTTP ones.
    ///
    /// Invalid UTF-8 is a decode error, never silently replaced.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ZammadError> {
        serde_json::from_slice(bytes).map_err(|source| ZammadError::Decode {
            source,
            body: self.scrub(&String::from_utf8_lossy(bytes)),
        })
    }

    /// Removes credentials from `text` and truncates it.
    fn scrub(&self, text: &str) -> String {
        let text = ZammadError::sanitize_message(text, &self.credentials.secrets());
        match text.char_indices().nth(MAX_ERROR_BODY_LEN) {
            Some((cut, _)) => format!("{}...[truncated]", &text[..cut]),
            None => text,
        }
    }

    /// Makes a GET request.
    pub(crate) async fn get(&self, path: &str) -> Result<Value, ZammadError> {
        self.request_json(Method::GET, path, &[], Body::Empty).await
    }

    /// Makes a GET request with query parameters.
    pub(crate) async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, ZammadError> {
        self.request_json(Method::GET, path, query, Body::Empty).await
    }

    /// Makes a GET request expecting a JSON array of records.
    ///
    /// An empty body yields no records.
    pub(crate) async fn get_records(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Record>, ZammadError> {
        let response = self.send(Method::GET, path, query, Body::Empty).await?;
        let bytes = response.bytes().await.map_err(ZammadError::Transport)?;

        tracing::trace!(body = %String::from_utf8_lossy(&bytes), "Zammad API response");

        if is_blank(&bytes) {
            return Ok(Vec::new());
        }
        self.decode(&bytes)
    }

    /// Makes a GET request and returns the raw body.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ZammadError> {
        let response = self.send(Method::GET, path, &[], Body::Empty).await?;
        let bytes = response.bytes().await.map_err(ZammadError::Transport)?;
        Ok(bytes.to_vec())
    }

    /// Makes a POST request with a JSON body.
    pub(crate) async fn post(&self, path: &str, body: Value) -> Result<Value, ZammadError> {
        self.request_json(Method::POST, path, &[], Body::Json(body))
            .await
    }

    /// Makes a POST request without a body.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<Value, ZammadError> {
        self.request_json(Method::POST, path, &[], Body::Empty).await
    }

    /// Makes a multipart POST request.
    pub(crate) async fn post_multipart(&self, path: &str, form: Form) -> Result<Value, ZammadError> {
        self.request_json(Method::POST, path, &[], Body::Multipart(form))
            .await
    }

    /// Makes a PUT request with a JSON body.
    pub(crate) async fn put(&self, path: &str, body: Value) -> Result<Value, ZammadError> {
        self.request_json(Method::PUT, path, &[], Body::Json(body))
            .await
    }

    /// Makes a PUT request without a body.
    pub(crate) async fn put_empty(&self, path: &str) -> Result<Value, ZammadError> {
        self.request_json(Method::PUT, path, &[], Body::Empty).await
    }

    /// Makes a PATCH request with a JSON body.
    pub(crate) async fn patch(&self, path: &str, body: Value) -> Result<Value, ZammadError> {
        self.request_json(Method::PATCH, path, &[], Body::Json(body))
            .await
    }

    /// Makes a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<Value, ZammadError> {
        self.request_json(Method::DELETE, path, &[], Body::Empty)
            .await
    }

    /// Makes a DELETE request with a JSON body.
    pub(crate) async fn delete_with_body(
        &self,
        path: &str,
        body: Value,
    ) -> Result<Value, ZammadError> {
        self.request_json(Method::DELETE, path, &[], Body::Json(body))
            .await
    }
}

impl fmt::Debug for ZammadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZammadClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("on_behalf_of", &self.on_behalf_of)
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// True if a body holds nothing but whitespace.
fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Percent-encodes an id for use as a single path segment.
///
/// # Errors
///
/// Returns `ZammadError::Validation` for empty ids and for `.`/`..`, which
/// would change the path instead of naming a record.
pub(crate) fn segment(id: impl fmt::Display) -> Result<String, ZammadError> {
    let raw = id.to_string();
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(ZammadError::validation(format!(
            "id must be a non-empty path segment, got: {:?}",
            raw.chars().take(50).collect::<String>()
        )));
    }
    Ok(urlencoding::encode(&raw).into_owned())
}
