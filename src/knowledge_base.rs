//! Knowledge base resources.
//!
//! Knowledge bases, their answers and their categories live under nested
//! paths (`knowledge_bases/{kb}/answers/...`) and do not support the generic
//! list/search/find/destroy verbs of [`Resource`](crate::resource::Resource).
//! The types here only expose the operations Zammad actually offers, so the
//! unsupported verbs are not callable at all.

use std::fmt;

use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};

use crate::client::{segment, ZammadClient};
use crate::error::{json_type_name, ZammadError};
use crate::models::{KnowledgeBaseAnswerPublicity, KnowledgeBaseSettings};

const BASE: &str = "knowledge_bases";

/// Checks that `params` is a JSON object.
fn require_object<'a>(
    resource: &'static str,
    params: &'a Value,
) -> Result<&'a Map<String, Value>, ZammadError> {
    params.as_object().ok_or(ZammadError::InvalidType {
        resource,
        expected: "object",
        found: json_type_name(params),
    })
}

/// Reads the id stored under `key` in `params`.
fn required_id(
    resource: &'static str,
    params: &Map<String, Value>,
    key: &str,
) -> Result<String, ZammadError> {
    match params.get(key) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ZammadError::missing_parameter(resource, key)),
    }
}

/// Knowledge bases themselves.
#[derive(Debug, Clone)]
pub struct KnowledgeBases {
    client: ZammadClient,
}

impl KnowledgeBases {
    pub(crate) fn new(client: ZammadClient) -> Self {
        Self { client }
    }

    /// Fetches the full knowledge base structure (bases, locales, categories).
    pub async fn init(&self) -> Result<Value, ZammadError> {
        self.client.post_empty(&format!("{}/init", BASE)).await
    }

    /// Updates knowledge base settings. Unset settings are left alone.
    pub async fn manage(
        &self,
        kb_id: impl fmt::Display,
        settings: &KnowledgeBaseSettings,
    ) -> Result<Value, ZammadError> {
        let path = format!("{}/manage/{}", BASE, segment(kb_id)?);
        self.client
            .patch(&path, serde_json::to_value(settings)?)
            .await
    }

    /// Fetches role permissions of a knowledge base.
    pub async fn show_permissions(&self, kb_id: impl fmt::Display) -> Result<Value, ZammadError> {
        let path = format!("{}/{}/permissions", BASE, segment(kb_id)?);
        self.client.get(&path).await
    }

    /// Replaces role permissions of a knowledge base.
    pub async fn change_permissions(
        &self,
        kb_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let path = format!("{}/{}/permissions", BASE, segment(kb_id)?);
        self.client.put(&path, params.clone()).await
    }

    /// Reorders the sub-categories of a category
    /// (`{"ordered_ids": [...]}`).
    pub async fn reorder_sub_categories(
        &self,
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let path = format!(
            "{}/{}/categories/{}/reorder_categories",
            BASE,
            segment(kb_id)?,
            segment(category_id)?
        );
        self.client.patch(&path, params.clone()).await
    }

    /// Reorders the root categories (`{"ordered_ids": [...]}`).
    pub async fn reorder_root_categories(
        &self,
        kb_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let path = format!(
            "{}/{}/categories/reorder_root_categories",
            BASE,
            segment(kb_id)?
        );
        self.client.patch(&path, params.clone()).await
    }
}

/// Answers inside a knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseAnswers {
    client: ZammadClient,
}

impl KnowledgeBaseAnswers {
    const NAME: &'static str = "KnowledgeBaseAnswers";

    pub(crate) fn new(client: ZammadClient) -> Self {
        Self { client }
    }

    fn answers_path(kb_id: impl fmt::Display) -> Result<String, ZammadError> {
        Ok(format!("{}/{}/answers", BASE, segment(kb_id)?))
    }

    fn answer_path(
        kb_id: impl fmt::Display,
        answer_id: impl fmt::Display,
    ) -> Result<String, ZammadError> {
        Ok(format!(
            "{}/{}",
            Self::answers_path(kb_id)?,
            segment(answer_id)?
        ))
    }

    /// Creates an answer.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::InvalidType` unless `params` is an object, and
    /// `ZammadError::MissingParameter` unless it holds `knowledge_base_id`.
    pub async fn create(&self, params: &Value) -> Result<Value, ZammadError> {
        let map = require_object(Self::NAME, params)?;
        let kb_id = required_id(Self::NAME, map, "knowledge_base_id")?;
        self.client
            .post(&Self::answers_path(kb_id)?, params.clone())
            .await
    }

    /// Fetches an answer with its content and assets.
    pub async fn find_answer(
        &self,
        kb_id: impl fmt::Display,
        answer_id: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        let path = Self::answer_path(kb_id, answer_id)?;
        self.client
            .get_with_query(&path, &[("full", "true")])
            .await
    }

    /// Updates the answer named by `answer_id` in `params`.
    pub async fn update(
        &self,
        kb_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let map = require_object(Self::NAME, params)?;
        let answer_id = required_id(Self::NAME, map, "answer_id")?;
        self.client
            .patch(&Self::answer_path(kb_id, answer_id)?, params.clone())
            .await
    }

    /// Moves an answer to another visibility state.
    pub async fn change_answer_visibility(
        &self,
        kb_id: impl fmt::Display,
        answer_id: impl fmt::Display,
        publicity: KnowledgeBaseAnswerPublicity,
    ) -> Result<Value, ZammadError> {
        let path = format!(
            "{}/{}",
            Self::answer_path(kb_id, answer_id)?,
            publicity.as_str()
        );
        self.client.post_empty(&path).await
    }

    /// Uploads an attachment to an answer.
    pub async fn add_attachment(
        &self,
        kb_id: impl fmt::Display,
        answer_id: impl fmt::Display,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> Result<Value, ZammadError> {
        let path = format!("{}/attachments", Self::answer_path(kb_id, answer_id)?);
        let form = Form::new().part("file", Part::bytes(content).file_name(file_name.into()));
        self.client.post_multipart(&path, form).await
    }

    /// Removes an attachment from an answer.
    pub async fn delete_attachment(
        &self,
        kb_id: impl fmt::Display,
        answer_id: impl fmt::Display,
        attachment_id: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        let path = format!(
            "{}/attachments/{}",
            Self::answer_path(kb_id, answer_id)?,
            segment(attachment_id)?
        );
        self.client.delete(&path).await
    }

    /// Deletes an answer.
    pub async fn destroy_answer(
        &self,
        kb_id: impl fmt::Display,
        answer_id: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        self.client
            .delete(&Self::answer_path(kb_id, answer_id)?)
            .await
    }
}

/// Categories inside a knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseCategories {
    client: ZammadClient,
}

impl KnowledgeBaseCategories {
    const NAME: &'static str = "KnowledgeBaseCategories";

    pub(crate) fn new(client: ZammadClient) -> Self {
        Self { client }
    }

    fn categories_path(kb_id: impl fmt::Display) -> Result<String, ZammadError> {
        Ok(format!("{}/{}/categories", BASE, segment(kb_id)?))
    }

    fn category_path(
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
    ) -> Result<String, ZammadError> {
        Ok(format!(
            "{}/{}",
            Self::categories_path(kb_id)?,
            segment(category_id)?
        ))
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::InvalidType` unless `params` is an object, and
    /// `ZammadError::MissingParameter` unless it holds `knowledge_base_id`.
    pub async fn create(&self, params: &Value) -> Result<Value, ZammadError> {
        let map = require_object(Self::NAME, params)?;
        let kb_id = required_id(Self::NAME, map, "knowledge_base_id")?;
        self.client
            .post(&Self::categories_path(kb_id)?, params.clone())
            .await
    }

    /// Fetches a category.
    pub async fn find_category(
        &self,
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        self.client
            .get(&Self::category_path(kb_id, category_id)?)
            .await
    }

    /// Updates the category named by `category_id` in `params`.
    pub async fn update(
        &self,
        kb_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let map = require_object(Self::NAME, params)?;
        let category_id = required_id(Self::NAME, map, "category_id")?;
        self.client
            .patch(&Self::category_path(kb_id, category_id)?, params.clone())
            .await
    }

    /// Fetches role permissions of a category.
    pub async fn show_permissions(
        &self,
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        let path = format!("{}/permissions", Self::category_path(kb_id, category_id)?);
        self.client.get(&path).await
    }

    /// Replaces role permissions of a category.
    pub async fn change_permissions(
        &self,
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let path = format!("{}/permissions", Self::category_path(kb_id, category_id)?);
        self.client.put(&path, params.clone()).await
    }

    /// Reorders the answers of a category (`{"ordered_ids": [...]}`).
    pub async fn reorder_answers(
        &self,
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
        params: &Value,
    ) -> Result<Value, ZammadError> {
        let path = format!(
            "{}/reorder_answers",
            Self::category_path(kb_id, category_id)?
        );
        self.client.patch(&path, params.clone()).await
    }

    /// Deletes a category.
    pub async fn destroy_category(
        &self,
        kb_id: impl fmt::Display,
        category_id: impl fmt::Display,
    ) -> Result<Value, ZammadError> {
        self.client
            .delete(&Self::category_path(kb_id, category_id)?)
            .await
    }
}
