//! Link models for connecting tickets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relationship between two linked objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Plain link.
    #[default]
    Normal,
    /// Source is the parent of the target.
    Parent,
    /// Source is a child of the target.
    Child,
}

impl LinkType {
    /// Wire name of the link type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Normal => "normal",
            LinkType::Parent => "parent",
            LinkType::Child => "child",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for adding or removing a link.
///
/// Zammad currently only links tickets, so both object kinds default to
/// `Ticket`. Note the asymmetry: the target is addressed by ticket **id**,
/// the source by ticket **number**.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketLink {
    /// Kind of link.
    pub link_type: LinkType,

    /// Target object kind.
    pub link_object_target: String,

    /// Target ticket id.
    pub link_object_target_value: String,

    /// Source object kind.
    pub link_object_source: String,

    /// Source ticket number.
    pub link_object_source_number: String,
}

impl TicketLink {
    /// A normal link from ticket number `source_number` to ticket id
    /// `target_id`.
    pub fn new(target_id: impl fmt::Display, source_number: impl fmt::Display) -> Self {
        Self {
            link_type: LinkType::Normal,
            link_object_target: "Ticket".to_string(),
            link_object_target_value: target_id.to_string(),
            link_object_source: "Ticket".to_string(),
            link_object_source_number: source_number.to_string(),
        }
    }

    /// Sets the link type.
    pub fn with_type(mut self, link_type: LinkType) -> Self {
        self.link_type = link_type;
        self
    }

    /// Sets the target object kind.
    pub fn with_target_object(mut self, object: impl Into<String>) -> Self {
        self.link_object_target = object.into();
        self
    }

    /// Sets the source object kind.
    pub fn with_source_object(mut self, object: impl Into<String>) -> Self {
        self.link_object_source = object.into();
        self
    }
}
