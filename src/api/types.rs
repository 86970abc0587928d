// API response bodies

use serde::Serialize;

use crate::store::Contact;

pub const CONTACT_ADDED: &str = "Contact added successfully!";
pub const CONTACT_UPDATED: &str = "Contact updated successfully!";
pub const CONTACT_DELETED: &str = "Contact deleted successfully!";

/// Confirmation body for POST, PUT and DELETE
#[derive(Debug, Serialize)]
pub struct MessageResponse<'a> {
    pub message: &'static str,
    /// Record as stored after the write (absent for DELETE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<&'a Contact>,
}

impl<'a> MessageResponse<'a> {
    pub const fn with_contact(message: &'static str, contact: &'a Contact) -> Self {
        Self {
            message,
            contact: Some(contact),
        }
    }

    pub const fn message(message: &'static str) -> Self {
        Self {
            message,
            contact: None,
        }
    }
}
