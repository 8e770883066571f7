//! Knowledge base models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings accepted by the knowledge base manage call.
///
/// Only fields that are set are serialized, so a call changes nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseSettings {
    /// Icon set name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iconset: Option<String>,

    /// Highlight colour, e.g. `#38ae6a`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_highlight: Option<String>,

    /// Header link colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_header_link: Option<String>,

    /// Homepage layout, e.g. `grid` or `list`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_layout: Option<String>,

    /// Category layout, e.g. `grid` or `list`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_layout: Option<String>,

    /// Whether the knowledge base is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Whether to show the feed icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_feed_icon: Option<bool>,

    /// Custom public address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_address: Option<String>,
}

impl KnowledgeBaseSettings {
    /// Creates empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the knowledge base is active.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the homepage layout.
    pub fn with_homepage_layout(mut self, layout: impl Into<String>) -> Self {
        self.homepage_layout = Some(layout.into());
        self
    }

    /// Sets the category layout.
    pub fn with_category_layout(mut self, layout: impl Into<String>) -> Self {
        self.category_layout = Some(layout.into());
        self
    }

    /// Sets the highlight colour.
    pub fn with_color_highlight(mut self, color: impl Into<String>) -> Self {
        self.color_highlight = Some(color.into());
        self
    }

    /// Sets the header link colour.
    pub fn with_color_header_link(mut self, color: impl Into<String>) -> Self {
        self.color_header_link = Some(color.into());
        self
    }

    /// Sets the icon set.
    pub fn with_iconset(mut self, iconset: impl Into<String>) -> Self {
        self.iconset = Some(iconset.into());
        self
    }

    /// Sets whether to show the feed icon.
    pub fn with_show_feed_icon(mut self, show: bool) -> Self {
        self.show_feed_icon = Some(show);
        self
    }

    /// Sets the custom public address.
    pub fn with_custom_address(mut self, address: impl Into<String>) -> Self {
        self.custom_address = Some(address.into());
        self
    }
}

/// Visibility transitions for a knowledge base answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeBaseAnswerPublicity {
    /// Visible to agents only.
    Internally,
    /// Published.
    Publicly,
    /// Archived.
    Archive,
    /// Restored from the archive.
    Unarchive,
}

impl KnowledgeBaseAnswerPublicity {
    /// Path segment of the transition.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeBaseAnswerPublicity::Internally => "internal",
            KnowledgeBaseAnswerPublicity::Publicly => "publish",
            KnowledgeBaseAnswerPublicity::Archive => "archive",
            KnowledgeBaseAnswerPublicity::Unarchive => "unarchive",
        }
    }
}

impl fmt::Display for KnowledgeBaseAnswerPublicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
