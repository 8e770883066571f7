//! # zammad-client
//!
//! An async client for the [Zammad](https://zammad.org) helpdesk REST API.
//!
//! ## Features
//!
//! - **Resources**: tickets, articles, attachments, users, organizations,
//!   groups, roles, links, priorities, states, object attributes, online
//!   notifications, tag list, and knowledge bases
//! - **CRUD mapping**: `all`, `search`, `find`, `create`, `update`, `destroy`
//!   map onto `GET`/`POST`/`PUT`/`DELETE`
//! - **Pagination**: list and search results come back as a [`Page`] that can
//!   fetch its neighbours without restating the query
//! - **Authentication**: HTTP token, OAuth2 bearer token or basic auth, plus
//!   `X-On-Behalf-Of` impersonation
//! - **Errors**: status errors, transport errors and decode errors are kept
//!   apart; nothing is retried behind the caller's back
//!
//! ## Architecture
//!
//! - [`config`] - Configuration, programmatic or from environment variables
//! - [`error`] - The [`ZammadError`] type
//! - [`client`] - [`ZammadClient`], request plumbing and resource accessors
//! - [`resource`] - Generic CRUD wrapper and endpoint-specific operations
//! - [`pagination`] - The [`Page`] cursor
//! - [`knowledge_base`] - Knowledge base, answer and category resources
//! - [`models`] - Typed request bodies and the change-tracking user record
//!
//! ## Configuration
//!
//! [`Config::from_env`] reads `ZAMMAD_URL` plus either `ZAMMAD_HTTP_TOKEN`,
//! `ZAMMAD_OAUTH2_TOKEN`, or `ZAMMAD_USERNAME` and `ZAMMAD_PASSWORD`.
//!
//! ## Example
//!
//! ```ignore
//! use zammad_client::{Config, ZammadClient};
//!
//! async fn example() -> Result<(), zammad_client::ZammadError> {
//!     let config = Config::from_env()?;
//!     let client = ZammadClient::new(&config)?;
//!
//!     let mut page = client.user().with_per_page(50).all().await?;
//!     loop {
//!         for user in &page {
//!             println!("{} {}", user["firstname"], user["lastname"]);
//!         }
//!         match page.next_page().await? {
//!             Some(next) => page = next,
//!             None => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod knowledge_base;
pub mod models;
pub mod pagination;
pub mod resource;

pub use client::ZammadClient;
pub use config::{Config, Credentials};
pub use error::ZammadError;
pub use pagination::{Filters, Page, PageQuery, Record};
pub use resource::{Endpoint, Resource};
