//! Contact record and the typed payloads that create or replace one.

use serde::{Deserialize, Serialize};

use super::StoreError;

/// A stored contact.
///
/// Serializes with all four keys present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn new(id: i64, fields: ContactFields) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
        }
    }
}

/// The three mutable fields of a contact (PUT body).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactFields {
    /// Reject a blank name; email and phone are free text.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation("field `name` must not be empty".to_string()));
        }
        Ok(())
    }
}

/// POST body.
///
/// `id` is only honoured by backends that take caller-supplied ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateContact {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub fields: ContactFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_without_id() {
        let payload: CreateContact =
            serde_json::from_str(r#"{"name":"Ann","email":"a@x.com","phone":"111"}"#).unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.fields.name, "Ann");
    }

    #[test]
    fn test_create_payload_missing_field_is_rejected() {
        let err = serde_json::from_str::<CreateContact>(r#"{"name":"Ann","phone":"111"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("email"), "got: {err}");
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let fields = ContactFields {
            name: "   ".to_string(),
            email: String::new(),
            phone: String::new(),
        };
        assert!(matches!(fields.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_contact_serializes_all_keys() {
        let contact = Contact {
            id: 7,
            name: "Ann".to_string(),
            email: String::new(),
            phone: String::new(),
        };
        let value = serde_json::to_value(&contact).unwrap();
        for key in ["id", "name", "email", "phone"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
