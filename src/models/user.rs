//! Change-tracking user record.
//!
//! [`UserRecord`] keeps a user's fields as a JSON map and remembers which
//! ones were modified, so `update` only sends what changed.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::client::ZammadClient;
use crate::error::ZammadError;
use crate::pagination::Record;

/// Relation fields that are never sent back to the server.
pub const NOT_EXPORTED: &[&str] = &[
    "role_ids",
    "organization_id",
    "organization_ids",
    "authorization_ids",
    "karma_user_ids",
    "group_ids",
];

const RESOURCE: &str = "UserRecord";

/// A user whose modified fields are tracked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRecord {
    fields: Record,
    changed: BTreeSet<String>,
}

impl UserRecord {
    /// A new, unsaved user with the minimum fields Zammad needs.
    pub fn new(
        login: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let mut fields = Record::new();
        fields.insert("login".to_string(), Value::String(login.into()));
        fields.insert("firstname".to_string(), Value::String(firstname.into()));
        fields.insert("lastname".to_string(), Value::String(lastname.into()));
        fields.insert("email".to_string(), Value::String(email.into()));
        Self {
            fields,
            changed: BTreeSet::new(),
        }
    }

    /// Wraps fields as returned by the API. Nothing is marked as changed.
    pub fn from_fields(fields: Record) -> Self {
        Self {
            fields,
            changed: BTreeSet::new(),
        }
    }

    /// Server id, once the user exists.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id").filter(|v| !v.is_null())
    }

    /// Field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All fields.
    pub fn fields(&self) -> &Record {
        &self.fields
    }

    /// Sets a field, marking it changed if the value differs.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if self.fields.get(&name) != Some(&value) {
            self.changed.insert(name.clone());
        }
        self.fields.insert(name, value);
    }

    /// Names of changed fields, sorted.
    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    /// True if any field changed since the last save.
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Every exportable field.
    pub fn to_payload(&self) -> Record {
        self.fields
            .iter()
            .filter(|(k, _)| !NOT_EXPORTED.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Exportable fields that changed.
    pub fn changed_payload(&self) -> Record {
        self.changed
            .iter()
            .filter(|k| !NOT_EXPORTED.contains(&k.as_str()))
            .filter_map(|k| self.fields.get(k).map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Creates the user on the server and takes over the returned fields.
    pub async fn create(&mut self, client: &ZammadClient) -> Result<(), ZammadError> {
        let created = client.user().create(&self.to_payload()).await?;
        self.merge(created);
        self.changed.clear();
        Ok(())
    }

    /// Sends the changed fields and takes over the returned fields.
    ///
    /// # Errors
    ///
    /// Returns `ZammadError::MissingParameter` if the user has no id yet.
    pub async fn update(&mut self, client: &ZammadClient) -> Result<(), ZammadError> {
        let id = self.id_segment()?;
        let updated = client.user().update(id, &self.changed_payload()).await?;
        self.changed.clear();
        self.merge(updated);
        Ok(())
    }

    /// Deletes the user on the server.
    pub async fn delete(&self, client: &ZammadClient) -> Result<Value, ZammadError> {
        client.user().destroy(self.id_segment()?).await
    }

    fn id_segment(&self) -> Result<String, ZammadError> {
        match self.id() {
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            _ => Err(ZammadError::missing_parameter(RESOURCE, "id")),
        }
    }

    fn merge(&mut self, value: Value) {
        if let Value::Object(map) = value {
            self.fields.extend(map);
        }
    }
}
