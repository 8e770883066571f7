//! Page-at-a-time access to list and search results.
//!
//! A [`Page`] is an immutable value: the records of one page plus the
//! [`PageQuery`] that produced them. Navigating with [`Page::next_page`] or
//! [`Page::prev_page`] issues a new request with the same query and returns a
//! new page; the receiver never changes. Iterating a page only walks the
//! records it already holds.

use std::collections::BTreeMap;
use std::ops::Index;

use serde_json::{Map, Value};

use crate::client::ZammadClient;
use crate::error::ZammadError;

/// One record as returned by the API: field name to JSON value.
pub type Record = Map<String, Value>;

/// Extra query parameters for list and search calls.
///
/// `page` is always taken from the cursor and ignored here. `per_page`
/// overrides the resource page size.
pub type Filters = BTreeMap<String, String>;

/// The explicit key of a paged query: everything needed to fetch any page of
/// it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Endpoint path relative to the API base, e.g. `users`.
    path: String,

    /// Search string; `None` for plain listings.
    search: Option<String>,

    /// Caller filters, without `page`, `per_page` or `query`.
    filters: Filters,

    /// Records per page.
    per_page: u32,
}

impl PageQuery {
    /// A listing of `path`.
    pub(crate) fn list(path: impl Into<String>, per_page: u32, filters: Filters) -> Self {
        Self::build(path.into(), None, per_page, filters)
    }

    /// A search on `path`.
    pub(crate) fn search(
        path: impl Into<String>,
        search: impl Into<String>,
        per_page: u32,
        filters: Filters,
    ) -> Self {
        Self::build(path.into(), Some(search.into()), per_page, filters)
    }

    fn build(path: String, search: Option<String>, per_page: u32, mut filters: Filters) -> Self {
        filters.remove("page");
        if search.is_some() {
            filters.remove("query");
        }
        let per_page = filters
            .remove("per_page")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(per_page);

        Self {
            path,
            search,
            filters,
            per_page,
        }
    }

    /// Endpoint path this query lists.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Search string, if this is a search.
    pub fn search_string(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Caller filters.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Records per page.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Path the request is sent to.
    fn request_path(&self) -> String {
        match self.search {
            Some(_) => format!("{}/search", self.path),
            None => self.path.clone(),
        }
    }

    /// Query parameters for page `number`.
    fn params(&self, number: u32) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Some(ref search) = self.search {
            params.push(("query".to_string(), search.clone()));
        }
        params.push(("page".to_string(), number.to_string()));
        params.push(("per_page".to_string(), self.per_page.to_string()));
        if !self.filters.contains_key("expand") {
            params.push(("expand".to_string(), "true".to_string()));
        }

        params
    }
}

/// One fetched page of a list or search result.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    number: u32,
    items: Vec<Record>,
    query: PageQuery,
    client: ZammadClient,
}

impl Page {
    /// Fetches page `number` of `query`.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::Validation` for page 0, and any HTTP, transport
    /// or decode error from the request.
    pub(crate) async fn fetch(
        client: ZammadClient,
        query: PageQuery,
        number: u32,
    ) -> Result<Page, ZammadError> {
        if number == 0 {
            return Err(ZammadError::validation("page number must be at least 1"));
        }

        let params = query.params(number);
        let params: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let items = client
            .get_records(&query.request_path(), &params)
            .await?;

        tracing::debug!(
            path = %query.path,
            page = number,
            count = items.len(),
            "Fetched page"
        );

        Ok(Page {
            number,
            items,
            query,
            client,
        })
    }

    /// Page number, starting at 1.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The query this page belongs to.
    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    /// Records on this page, in server order.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Consumes the page and returns its records.
    pub fn into_items(self) -> Vec<Record> {
        self.items
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.items.get(index)
    }

    /// Iterates over this page's records. Can be called any number of times.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.items.iter()
    }

    /// True on page 1.
    pub fn is_first_page(&self) -> bool {
        self.number == 1
    }

    /// True if the page holds fewer records than the requested page size.
    ///
    /// This is a heuristic: Zammad caps `per_page` on the server, so with a
    /// large page size every page can look short. Walk with
    /// [`Page::next_page`] until it returns `None` to be sure.
    pub fn is_last_page(&self) -> bool {
        self.items.len() < self.query.per_page as usize
    }

    /// Fetches the following page with the same query.
    ///
    /// Returns `Ok(None)` when the server has no records for it.
    pub async fn next_page(&self) -> Result<Option<Page>, ZammadError> {
        let number = self
            .number
            .checked_add(1)
            .ok_or_else(|| ZammadError::validation("page number overflow"))?;
        self.neighbour(number).await
    }

    /// Fetches the preceding page with the same query.
    ///
    /// Returns `Ok(None)` on page 1 without sending a request, and when the
    /// server has no records for the preceding page.
    pub async fn prev_page(&self) -> Result<Option<Page>, ZammadError> {
        if self.number <= 1 {
            return Ok(None);
        }
        self.neighbour(self.number - 1).await
    }

    async fn neighbour(&self, number: u32) -> Result<Option<Page>, ZammadError> {
        let page = Page::fetch(self.client.clone(), self.query.clone(), number).await?;
        Ok((!page.is_empty()).then_some(page))
    }
}

/// Two pages are equal when they hold the same records for the same page of
/// the same query.
impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.query == other.query && self.items == other.items
    }
}

impl Index<usize> for Page {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Page {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
