//! Generic CRUD access to Zammad endpoints.
//!
//! Each endpoint is a zero-sized marker type implementing [`Endpoint`].
//! [`Resource<E>`] maps the CRUD verbs onto HTTP requests for that endpoint,
//! and endpoint-specific operations live in `impl Resource<Marker>` blocks.
//!
//! | operation    | request                 |
//! |--------------|-------------------------|
//! | `all`        | `GET {path}`            |
//! | `search`     | `GET {path}/search`     |
//! | `find`       | `GET {path}/{id}`       |
//! | `create`     | `POST {path}`           |
//! | `update`     | `PUT {path}/{id}`       |
//! | `destroy`    | `DELETE {path}/{id}`    |

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::client::{segment, ZammadClient};
use crate::error::ZammadError;
use crate::models::TicketLink;
use crate::pagination::{Filters, Page, PageQuery};

/// A named remote collection.
pub trait Endpoint {
    /// Path relative to the API base URL.
    const PATH: &'static str;

    /// Human-readable name used in logs and errors.
    const NAME: &'static str;
}

macro_rules! endpoints {
    ($($(#[$meta:meta])* $name:ident => $path:literal),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub enum $name {}

            impl Endpoint for $name {
                const PATH: &'static str = $path;
                const NAME: &'static str = stringify!($name);
            }
        )*
    };
}

endpoints! {
    /// `groups`
    Groups => "groups",
    /// `roles`
    Roles => "roles",
    /// `organizations`
    Organizations => "organizations",
    /// `tickets`
    Tickets => "tickets",
    /// `links`
    Links => "links",
    /// `ticket_articles`
    TicketArticles => "ticket_articles",
    /// `ticket_attachment`
    TicketArticleAttachments => "ticket_attachment",
    /// `ticket_article_plain`
    TicketArticlePlain => "ticket_article_plain",
    /// `ticket_priorities`
    TicketPriorities => "ticket_priorities",
    /// `ticket_states`
    TicketStates => "ticket_states",
    /// `users`
    Users => "users",
    /// `online_notifications`
    OnlineNotifications => "online_notifications",
    /// `object_manager_attributes`
    ObjectAttributes => "object_manager_attributes",
    /// `tag_list`
    TagList => "tag_list",
}

/// CRUD wrapper for endpoint `E`.
pub struct Resource<E> {
    client: ZammadClient,
    per_page: u32,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> Resource<E> {
    pub(crate) fn new(client: ZammadClient) -> Self {
        let per_page = client.per_page();
        Self {
            client,
            per_page,
            _endpoint: PhantomData,
        }
    }

    /// Endpoint path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        E::PATH
    }

    /// Full URL of the endpoint.
    pub fn url(&self) -> String {
        format!("{}{}", self.client.base_url(), E::PATH)
    }

    /// Page size used by `all` and `search`.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Sets the page size. Zero is ignored.
    pub fn set_per_page(&mut self, per_page: u32) {
        if per_page > 0 {
            self.per_page = per_page;
        }
    }

    /// Returns this resource with a different page size. Zero is ignored.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.set_per_page(per_page);
        self
    }

    /// Fetches the first page of records.
    pub async fn all(&self) -> Result<Page, ZammadError> {
        self.all_with(1, Filters::new()).await
    }

    /// Fetches page `page` of records, with extra query parameters.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::Validation` for page 0.
    pub async fn all_with(&self, page: u32, filters: Filters) -> Result<Page, ZammadError> {
        let query = PageQuery::list(E::PATH, self.per_page, filters);
        Page::fetch(self.client.clone(), query, page).await
    }

    /// Fetches the first page of records matching `query`.
    pub async fn search(&self, query: &str) -> Result<Page, ZammadError> {
        self.search_with(query, 1, Filters::new()).await
    }

    /// Fetches page `page` of records matching `query`, with extra query
    /// parameters.
    pub async fn search_with(
        &self,
        query: &str,
        page: u32,
        filters: Filters,
    ) -> Result<Page, ZammadError> {
        let query = PageQuery::search(E::PATH, query, self.per_page, filters);
        Page::fetch(self.client.clone(), query, page).await
    }

    /// Fetches a single record.
    pub async fn find(&self, id: impl fmt::Display) -> Result<Value, ZammadError> {
        self.client.get(&Self::member_path(id)?).await
    }

    /// Creates a record.
    pub async fn create<B>(&self, params: &B) -> Result<Value, ZammadError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(params)?;
        tracing::debug!(resource = E::NAME, "Creating record");
        self.client.post(E::PATH, body).await
    }

    /// Updates a record.
    pub async fn update<B>(&self, id: impl fmt::Display, params: &B) -> Result<Value, ZammadError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(params)?;
        self.client.put(&Self::member_path(id)?, body).await
    }

    /// Deletes a record. The body of the answer is returned as-is
    /// (`Value::Null` when empty).
    pub async fn destroy(&self, id: impl fmt::Display) -> Result<Value, ZammadError> {
        self.client.delete(&Self::member_path(id)?).await
    }

    fn member_path(id: impl fmt::Display) -> Result<String, ZammadError> {
        Ok(format!("{}/{}", E::PATH, segment(id)?))
    }
}

impl<E> Clone for Resource<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            per_page: self.per_page,
            _endpoint: PhantomData,
        }
    }
}

impl<E: Endpoint> fmt::Debug for Resource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("endpoint", &E::NAME)
            .field("path", &E::PATH)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl Resource<Tickets> {
    /// Fetches all articles of a ticket.
    pub async fn articles(&self, id: impl fmt::Display) -> Result<Value, ZammadError> {
        let path = format!("{}/by_ticket/{}", TicketArticles::PATH, segment(id)?);
        self.client
            .get_with_query(&path, &[("expand", "true")])
            .await
    }

    /// Merges ticket `id` into the ticket with number `number`.
    ///
    /// Zammad only accepts this with password authentication.
    pub async fn merge(
        &self,
        id: impl fmt::Display,
        number: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        let path = format!("ticket_merge/{}/{}", segment(id)?, segment(number)?);
        self.client.put_empty(&path).await
    }
}

impl Resource<Links> {
    /// Links two objects.
    pub async fn add(&self, link: &TicketLink) -> Result<Value, ZammadError> {
        let body = serde_json::to_value(link)?;
        self.client.post(&format!("{}/add", Links::PATH), body).await
    }

    /// Removes a link between two objects.
    pub async fn remove(&self, link: &TicketLink) -> Result<Value, ZammadError> {
        let body = serde_json::to_value(link)?;
        self.client
            .delete_with_body(&format!("{}/remove", Links::PATH), body)
            .await
    }

    /// Fetches all links of a ticket.
    pub async fn get(&self, ticket_id: impl fmt::Display) -> Result<Value, ZammadError> {
        let ticket_id = ticket_id.to_string();
        self.client
            .get_with_query(
                Links::PATH,
                &[("link_object", "Ticket"), ("link_object_value", ticket_id.as_str())],
            )
            .await
    }
}

impl Resource<TicketArticleAttachments> {
    /// Downloads an attachment as raw bytes.
    pub async fn download(
        &self,
        id: impl fmt::Display,
        article_id: impl fmt::Display,
        ticket_id: impl fmt::Display,
    ) -> Result<Vec<u8>, ZammadError> {
        let path = format!(
            "{}/{}/{}/{}",
            TicketArticleAttachments::PATH,
            segment(ticket_id)?,
            segment(article_id)?,
            segment(id)?
        );
        self.client.get_bytes(&path).await
    }
}

impl Resource<Users> {
    /// Fetches the authenticated user.
    pub async fn me(&self) -> Result<Value, ZammadError> {
        self.client.get(&format!("{}/me", Users::PATH)).await
    }
}

impl Resource<OnlineNotifications> {
    /// Marks every online notification as read.
    pub async fn mark_all_read(&self) -> Result<Value, ZammadError> {
        self.client
            .post_empty(&format!("{}/mark_all_as_read", OnlineNotifications::PATH))
            .await
    }
}

impl Resource<ObjectAttributes> {
    /// Runs pending object manager migrations.
    pub async fn execute_migrations(&self) -> Result<Value, ZammadError> {
        self.client
            .post_empty("object_manager_attributes_execute_migrations")
            .await
    }
}
